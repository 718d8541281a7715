use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_revision, AnalyticsStore, ContentStore, LeadStore, StoreError};
use crate::content::leads::{ContactSubmission, LeadPatch};
use crate::dashboard::{ButtonClickCount, PageViewCount};
use crate::document::{ContentDocument, ContentKind, NewContentDocument};

/// Process-local backend used in development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<Uuid, ContentDocument>>,
    leads: RwLock<Vec<ContactSubmission>>,
    page_views: RwLock<HashMap<String, u64>>,
    button_clicks: RwLock<HashMap<(String, String), u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut docs: Vec<ContentDocument>) -> Vec<ContentDocument> {
    docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
    docs
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_by_kind(&self, kind: &ContentKind) -> Result<Vec<ContentDocument>, StoreError> {
        let docs = self.documents.read().await;
        Ok(newest_first(docs.values().filter(|d| &d.kind == kind).cloned().collect()))
    }

    async fn list_all(&self) -> Result<Vec<ContentDocument>, StoreError> {
        let docs = self.documents.read().await;
        Ok(newest_first(docs.values().cloned().collect()))
    }

    async fn get(&self, id: Uuid) -> Result<ContentDocument, StoreError> {
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::document(id))
    }

    async fn create(&self, new: NewContentDocument) -> Result<ContentDocument, StoreError> {
        new.validate()?;
        let doc = ContentDocument::create(new, Utc::now());
        self.documents.write().await.insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn replace(
        &self,
        id: Uuid,
        new: NewContentDocument,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, StoreError> {
        new.validate()?;
        let mut docs = self.documents.write().await;
        let doc = docs.get_mut(&id).ok_or_else(|| StoreError::document(id))?;
        check_revision(if_revision, &doc.revision)?;
        doc.overwrite(new, Utc::now());
        Ok(doc.clone())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn insert(&self, lead: ContactSubmission) -> Result<ContactSubmission, StoreError> {
        self.leads.write().await.push(lead.clone());
        Ok(lead)
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>, StoreError> {
        let mut leads = self.leads.read().await.clone();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    async fn get(&self, id: Uuid) -> Result<ContactSubmission, StoreError> {
        self.leads
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| StoreError::lead(id))
    }

    async fn update(&self, id: Uuid, patch: LeadPatch) -> Result<ContactSubmission, StoreError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| StoreError::lead(id))?;
        lead.apply(patch, Utc::now());
        Ok(lead.clone())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn record_page_view(&self, path: &str) -> Result<(), StoreError> {
        *self.page_views.write().await.entry(path.to_string()).or_default() += 1;
        Ok(())
    }

    async fn record_button_click(&self, button: &str, page: &str) -> Result<(), StoreError> {
        *self
            .button_clicks
            .write()
            .await
            .entry((button.to_string(), page.to_string()))
            .or_default() += 1;
        Ok(())
    }

    async fn page_views(&self) -> Result<Vec<PageViewCount>, StoreError> {
        Ok(self
            .page_views
            .read()
            .await
            .iter()
            .map(|(path, views)| PageViewCount {
                path: path.clone(),
                views: *views,
            })
            .collect())
    }

    async fn button_clicks(&self) -> Result<Vec<ButtonClickCount>, StoreError> {
        Ok(self
            .button_clicks
            .read()
            .await
            .iter()
            .map(|((button, page), clicks)| ButtonClickCount {
                button: button.clone(),
                page: page.clone(),
                clicks: *clicks,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::leads::{LeadStatus, NewContactSubmission};
    use serde_json::json;

    #[tokio::test]
    async fn documents_by_kind() {
        let store = MemoryStore::new();
        store
            .create(NewContentDocument::new(ContentKind::Footer, "Footer", json!({})))
            .await
            .unwrap();
        let settings = store
            .create(NewContentDocument::new(ContentKind::Settings, "Settings", json!({})))
            .await
            .unwrap();

        let found = store.list_by_kind(&ContentKind::Settings).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, settings.id);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert!(matches!(
            ContentStore::get(&store, Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lead_lifecycle() {
        let store = MemoryStore::new();
        let lead = NewContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hi".into(),
            ..NewContactSubmission::default()
        }
        .into_submission(Utc::now());
        let id = lead.id;
        store.insert(lead).await.unwrap();

        let updated = store.update(id, LeadPatch::status(LeadStatus::Qualified)).await.unwrap();
        assert_eq!(updated.status, LeadStatus::Qualified);
        assert_eq!(LeadStore::get(&store, id).await.unwrap().status, LeadStatus::Qualified);
        assert!(store.update(Uuid::new_v4(), LeadPatch::default()).await.is_err());
    }

    #[tokio::test]
    async fn counters_accumulate() {
        let store = MemoryStore::new();
        store.record_page_view("/").await.unwrap();
        store.record_page_view("/").await.unwrap();
        store.record_button_click("cta", "/").await.unwrap();

        let views = store.page_views().await.unwrap();
        assert_eq!(views, vec![PageViewCount { path: "/".into(), views: 2 }]);
        assert_eq!(store.button_clicks().await.unwrap()[0].clicks, 1);
    }
}
