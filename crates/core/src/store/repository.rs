use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{find_by_kind, upsert_kind, ContentStore, StoreError};
use crate::content::ContentBody;
use crate::document::{ContentDocument, NewContentDocument};

/// Typed access to the single document of one content kind.
///
/// After a successful [`save`](Self::save), [`load`](Self::load) returns the
/// saved body without going back to the store until [`refresh`](Self::refresh).
pub struct ContentRepository<T: ContentBody> {
    store: Arc<dyn ContentStore>,
    cached: RwLock<Option<Cached<T>>>,
    _kind: PhantomData<fn() -> T>,
}

#[derive(Clone)]
struct Cached<T> {
    body: T,
    revision: Option<String>,
}

impl<T: ContentBody> ContentRepository<T> {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(None),
            _kind: PhantomData,
        }
    }

    /// Current body of the kind. A missing document, or one whose content
    /// does not fit `T`, yields `T::default()`.
    pub async fn load(&self) -> Result<T, StoreError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(cached.body.clone());
        }
        let fetched = self.fetch().await?;
        let body = fetched.body.clone();
        *self.cached.write().await = Some(fetched);
        Ok(body)
    }

    /// Revision of the last loaded or saved document, if any.
    pub async fn revision(&self) -> Option<String> {
        self.cached.read().await.as_ref().and_then(|c| c.revision.clone())
    }

    /// Validate and upsert `body`. The write is conditional on the revision
    /// this repository last saw, so a concurrent editor's save is reported
    /// as a conflict instead of being overwritten.
    pub async fn save(&self, body: T) -> Result<ContentDocument, StoreError> {
        body.validate()?;
        let expected = self.revision().await;
        let new = NewContentDocument::new(T::kind(), T::title(), serde_json::to_value(&body)?);
        let (doc, _) = upsert_kind(self.store.as_ref(), new, expected.as_deref()).await?;
        *self.cached.write().await = Some(Cached {
            body,
            revision: Some(doc.revision.clone()),
        });
        Ok(doc)
    }

    /// Drop the cached body and read the store again.
    pub async fn refresh(&self) -> Result<T, StoreError> {
        *self.cached.write().await = None;
        self.load().await
    }

    async fn fetch(&self) -> Result<Cached<T>, StoreError> {
        let kind = T::kind();
        let Some(doc) = find_by_kind(self.store.as_ref(), &kind).await? else {
            tracing::warn!(kind = %kind, "no document stored; using defaults");
            return Ok(Cached {
                body: T::default(),
                revision: None,
            });
        };
        let body = match serde_json::from_value::<T>(doc.content) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(kind = %kind, id = %doc.id, error = %e, "malformed content; using defaults");
                T::default()
            }
        };
        Ok(Cached {
            body,
            revision: Some(doc.revision),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::footer::Footer;
    use crate::content::settings::SiteSettings;
    use crate::document::ContentKind;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn settings(name: &str) -> SiteSettings {
        let mut s = SiteSettings::default();
        s.general.site_name = name.into();
        s
    }

    #[tokio::test]
    async fn missing_document_falls_back_to_default() {
        let repo = ContentRepository::<SiteSettings>::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load().await.unwrap(), SiteSettings::default());
        assert!(repo.revision().await.is_none());
    }

    #[tokio::test]
    async fn malformed_content_falls_back_to_default() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewContentDocument::new(
                ContentKind::Footer,
                "Footer",
                json!({"columns": "not a list"}),
            ))
            .await
            .unwrap();
        let repo = ContentRepository::<Footer>::new(store);
        assert_eq!(repo.load().await.unwrap(), Footer::default());
        assert!(repo.revision().await.is_some());
    }

    #[tokio::test]
    async fn read_after_write_until_refresh() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
        let repo = ContentRepository::<SiteSettings>::new(store.clone());
        repo.save(settings("Northwind")).await.unwrap();

        // Another writer changes the stored document behind our back.
        let other = ContentRepository::<SiteSettings>::new(store.clone());
        other.load().await.unwrap();
        other.save(settings("Changed elsewhere")).await.unwrap();

        assert_eq!(repo.load().await.unwrap().general.site_name, "Northwind");
        assert_eq!(repo.refresh().await.unwrap().general.site_name, "Changed elsewhere");
    }

    #[tokio::test]
    async fn stale_save_conflicts() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
        let first = ContentRepository::<SiteSettings>::new(store.clone());
        let second = ContentRepository::<SiteSettings>::new(store.clone());
        first.save(settings("One")).await.unwrap();
        second.load().await.unwrap();
        second.save(settings("Two")).await.unwrap();

        assert!(matches!(
            first.save(settings("Three")).await,
            Err(StoreError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_body_is_not_saved() {
        let repo = ContentRepository::<SiteSettings>::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            repo.save(SiteSettings::default()).await,
            Err(StoreError::Validation(_))
        ));
    }
}
