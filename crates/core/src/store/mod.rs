//! Persistence seams: content documents, leads and analytics counters.
//!
//! Each concern is an object-safe trait so the API can hold
//! `Arc<dyn ...>` and swap the Postgres backend for the in-memory one.

pub mod memory;
pub mod postgres;
pub mod repository;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::content::leads::{ContactSubmission, LeadPatch, NewContactSubmission};
use crate::content::validate_content;
use crate::dashboard::{ButtonClickCount, PageViewCount};
use crate::document::{ContentDocument, ContentKind, NewContentDocument, ValidationError};
use crate::mutation::{apply_patch, MutationError, PatchOperations};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::ContentRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("revision mismatch: expected {expected}, found {actual}")]
    Conflict { expected: String, actual: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn document(id: Uuid) -> Self {
        StoreError::NotFound(format!("document {id}"))
    }

    pub fn lead(id: Uuid) -> Self {
        StoreError::NotFound(format!("lead {id}"))
    }
}

/// Fail with [`StoreError::Conflict`] unless `expected` is absent or matches.
pub fn check_revision(expected: Option<&str>, actual: &str) -> Result<(), StoreError> {
    match expected {
        Some(expected) if expected != actual => Err(StoreError::Conflict {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Documents of one kind, most recently updated first.
    async fn list_by_kind(&self, kind: &ContentKind) -> Result<Vec<ContentDocument>, StoreError>;

    async fn list_all(&self) -> Result<Vec<ContentDocument>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<ContentDocument, StoreError>;

    async fn create(&self, new: NewContentDocument) -> Result<ContentDocument, StoreError>;

    /// Overwrite a whole document. With `if_revision`, a stale revision is
    /// rejected instead of silently losing the other write.
    async fn replace(
        &self,
        id: Uuid,
        new: NewContentDocument,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert(&self, lead: ContactSubmission) -> Result<ContactSubmission, StoreError>;

    /// Every lead, newest first.
    async fn list(&self) -> Result<Vec<ContactSubmission>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<ContactSubmission, StoreError>;

    async fn update(&self, id: Uuid, patch: LeadPatch) -> Result<ContactSubmission, StoreError>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn record_page_view(&self, path: &str) -> Result<(), StoreError>;

    async fn record_button_click(&self, button: &str, page: &str) -> Result<(), StoreError>;

    async fn page_views(&self) -> Result<Vec<PageViewCount>, StoreError>;

    async fn button_clicks(&self) -> Result<Vec<ButtonClickCount>, StoreError>;
}

/// The document of `kind`, if one exists. Kinds are singletons; when
/// several documents share a kind the most recently updated one wins.
pub async fn find_by_kind(
    store: &dyn ContentStore,
    kind: &ContentKind,
) -> Result<Option<ContentDocument>, StoreError> {
    Ok(store.list_by_kind(kind).await?.into_iter().next())
}

/// Replace the document of `new.kind`, or create it when there is none.
/// Known kinds are checked against their typed body first.
/// Returns the stored document and whether it was created.
pub async fn upsert_kind(
    store: &dyn ContentStore,
    new: NewContentDocument,
    if_revision: Option<&str>,
) -> Result<(ContentDocument, bool), StoreError> {
    new.validate()?;
    validate_content(&new.kind, &new.content)?;
    match find_by_kind(store, &new.kind).await? {
        Some(existing) => {
            let doc = store.replace(existing.id, new, if_revision).await?;
            Ok((doc, false))
        }
        None => {
            if let Some(expected) = if_revision {
                return Err(StoreError::Conflict {
                    expected: expected.to_string(),
                    actual: "none".to_string(),
                });
            }
            Ok((store.create(new).await?, true))
        }
    }
}

/// Apply path operations to a stored document's `content`.
///
/// The write is conditional on the revision that was read, so a patch
/// never clobbers a concurrent save.
pub async fn patch_document(
    store: &dyn ContentStore,
    id: Uuid,
    ops: &PatchOperations,
) -> Result<ContentDocument, StoreError> {
    let current = store.get(id).await?;
    let mut new = current.to_new();
    new.content = apply_patch(&current.content, ops)?;
    new.validate()?;
    validate_content(&new.kind, &new.content)?;
    store.replace(id, new, Some(&current.revision)).await
}

/// Build a fresh lead from a form post.
pub fn new_lead(form: NewContactSubmission) -> Result<ContactSubmission, StoreError> {
    form.validate()?;
    Ok(form.into_submission(Utc::now()))
}
