//! Typed bodies for the well-known content kinds.

pub mod blog;
pub mod clients;
pub mod footer;
pub mod leads;
pub mod modules;
pub mod settings;
pub mod snippets;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::document::{ContentKind, ValidationError};

/// A typed view of the `content` object of one content kind.
pub trait ContentBody: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    fn kind() -> ContentKind;

    /// Title used when the document is first created.
    fn title() -> &'static str;

    /// Checks run before a save is accepted.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn check<T: ContentBody>(content: &Value) -> Result<(), ValidationError> {
    let body: T = serde_json::from_value(content.clone())
        .map_err(|e| ValidationError::invalid("content", e.to_string()))?;
    body.validate()
}

/// Validate `content` against the typed body of a known kind. Content of
/// other kinds is opaque and always accepted.
pub fn validate_content(kind: &ContentKind, content: &Value) -> Result<(), ValidationError> {
    match kind {
        ContentKind::Footer => check::<footer::Footer>(content),
        ContentKind::Settings => check::<settings::SiteSettings>(content),
        ContentKind::ClientsPage => check::<clients::ClientsPage>(content),
        ContentKind::BlogPage => check::<blog::BlogPage>(content),
        ContentKind::ModulesPage => check::<modules::ModulesPage>(content),
        ContentKind::Snippets => check::<snippets::SnippetSet>(content),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_kinds_are_checked() {
        let dup = json!({"clientCases": [
            {"name": "A", "slug": "a"},
            {"name": "B", "slug": "a"}
        ]});
        assert!(matches!(
            validate_content(&ContentKind::ClientsPage, &dup),
            Err(ValidationError::Duplicate { .. })
        ));
        assert!(matches!(
            validate_content(&ContentKind::Footer, &json!({"columns": 3})),
            Err(ValidationError::InvalidField { field, .. }) if field == "content"
        ));
        assert!(validate_content(&ContentKind::Footer, &json!({"copyright": "2024"})).is_ok());
    }

    #[test]
    fn other_kinds_are_opaque() {
        let kind = ContentKind::parse("landing-hero").unwrap();
        assert!(validate_content(&kind, &json!({"anything": [1, 2]})).is_ok());
        assert!(validate_content(&ContentKind::ContactForm, &json!({"fields": "x"})).is_ok());
    }
}
