use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::kind::ContentKind;
use super::validate::{validate_document_fields, ValidationError};

/// A stored content document: the storage unit for all editable site content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Opaque document body; its shape depends on `kind`.
    pub content: Value,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub revision: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or overwriting a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentDocument {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object")]
    pub content: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn default_active() -> bool {
    true
}

impl NewContentDocument {
    pub fn new(kind: ContentKind, title: impl Into<String>, content: Value) -> Self {
        Self {
            kind,
            title: title.into(),
            description: String::new(),
            content,
            is_active: true,
            metadata: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_document_fields(&self.title, &self.content)
    }
}

impl ContentDocument {
    /// Materialise a brand new document with a fresh id and revision.
    pub fn create(new: NewContentDocument, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title,
            description: new.description,
            content: new.content,
            is_active: new.is_active,
            metadata: new.metadata,
            revision: new_revision(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every editable field, keeping identity and creation time.
    pub fn overwrite(&mut self, new: NewContentDocument, now: DateTime<Utc>) {
        self.kind = new.kind;
        self.title = new.title;
        self.description = new.description;
        self.content = new.content;
        self.is_active = new.is_active;
        self.metadata = new.metadata;
        self.revision = new_revision();
        self.updated_at = now;
    }

    pub fn to_new(&self) -> NewContentDocument {
        NewContentDocument {
            kind: self.kind.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            is_active: self.is_active,
            metadata: self.metadata.clone(),
        }
    }
}

pub fn new_revision() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Database row representation of a document.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub doc_type: String,
    pub title: String,
    pub description: String,
    pub content: Value,
    pub is_active: bool,
    pub metadata: Option<Value>,
    pub revision: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for ContentDocument {
    type Error = ValidationError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            kind: ContentKind::parse(&row.doc_type)?,
            title: row.title,
            description: row.description,
            content: row.content,
            is_active: row.is_active,
            metadata: row.metadata,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_uses_type_and_camel_case() {
        let doc = ContentDocument::create(
            NewContentDocument::new(ContentKind::Footer, "Footer", json!({"copyright": "2024"})),
            Utc::now(),
        );
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(wire["type"], "footer");
        assert_eq!(wire["isActive"], true);
        assert!(wire.get("metadata").is_none());
        assert!(wire.get("createdAt").is_some());
    }

    #[test]
    fn new_document_defaults() {
        let new: NewContentDocument =
            serde_json::from_value(json!({"type": "settings", "title": "Settings"})).unwrap();
        assert!(new.is_active);
        assert_eq!(new.content, json!({}));
        assert!(new.validate().is_ok());
    }

    #[test]
    fn overwrite_bumps_revision_and_keeps_identity() {
        let created = Utc::now();
        let mut doc = ContentDocument::create(
            NewContentDocument::new(ContentKind::BlogPage, "Blog", json!({})),
            created,
        );
        let (id, rev) = (doc.id, doc.revision.clone());
        doc.overwrite(
            NewContentDocument::new(ContentKind::BlogPage, "Blog v2", json!({"posts": []})),
            Utc::now(),
        );
        assert_eq!(doc.id, id);
        assert_ne!(doc.revision, rev);
        assert_eq!(doc.created_at, created);
        assert_eq!(doc.title, "Blog v2");
    }
}
