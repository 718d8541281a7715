use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{check_revision, AnalyticsStore, ContentStore, LeadStore, StoreError};
use crate::content::leads::{ContactSubmission, LeadPatch, LeadStatus, SubmissionStatus};
use crate::dashboard::{ButtonClickCount, PageViewCount};
use crate::document::model::{new_revision, DocumentRow};
use crate::document::{ContentDocument, ContentKind, NewContentDocument, ValidationError};

const DOCUMENT_COLUMNS: &str =
    "id, doc_type, title, description, content, is_active, metadata, revision, created_at, updated_at";

const LEAD_COLUMNS: &str = "id, name, email, phone, company, message, submission_status, status, \
     sent_to_hubspot, hubspot_contact_id, country_code, source_page, created_at, updated_at";

/// Postgres backend over the tables created by the embedded migrations.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_documents(rows: Vec<DocumentRow>) -> Result<Vec<ContentDocument>, StoreError> {
    rows.into_iter()
        .map(|row| ContentDocument::try_from(row).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_by_kind(&self, kind: &ContentKind) -> Result<Vec<ContentDocument>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM content_documents WHERE doc_type = $1 ORDER BY updated_at DESC"
        ))
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        to_documents(rows)
    }

    async fn list_all(&self) -> Result<Vec<ContentDocument>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM content_documents ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        to_documents(rows)
    }

    async fn get(&self, id: Uuid) -> Result<ContentDocument, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM content_documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::document(id))?;
        Ok(ContentDocument::try_from(row)?)
    }

    async fn create(&self, new: NewContentDocument) -> Result<ContentDocument, StoreError> {
        new.validate()?;
        let doc = ContentDocument::create(new, Utc::now());
        sqlx::query(
            "INSERT INTO content_documents \
             (id, doc_type, title, description, content, is_active, metadata, revision, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(doc.id)
        .bind(doc.kind.as_str())
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(&doc.content)
        .bind(doc.is_active)
        .bind(&doc.metadata)
        .bind(&doc.revision)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(doc)
    }

    async fn replace(
        &self,
        id: Uuid,
        new: NewContentDocument,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, StoreError> {
        new.validate()?;
        let revision = new_revision();
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "UPDATE content_documents SET doc_type = $2, title = $3, description = $4, content = $5, \
             is_active = $6, metadata = $7, revision = $8, updated_at = $9 \
             WHERE id = $1 AND ($10::text IS NULL OR revision = $10) \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(new.kind.as_str())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.content)
        .bind(new.is_active)
        .bind(&new.metadata)
        .bind(&revision)
        .bind(Utc::now())
        .bind(if_revision)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(ContentDocument::try_from(row)?),
            None => {
                // Either the row is gone or its revision moved on.
                let current = ContentStore::get(self, id).await?;
                check_revision(if_revision, &current.revision)?;
                Err(StoreError::document(id))
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
    message: String,
    submission_status: String,
    status: String,
    sent_to_hubspot: bool,
    hubspot_contact_id: Option<String>,
    country_code: Option<String>,
    source_page: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for ContactSubmission {
    type Error = StoreError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let status: LeadStatus = row
            .status
            .parse()
            .map_err(|_| ValidationError::invalid("status", row.status.clone()))?;
        let submission_status: SubmissionStatus = row
            .submission_status
            .parse()
            .map_err(|_| ValidationError::invalid("submissionStatus", row.submission_status.clone()))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            message: row.message,
            submission_status,
            status,
            sent_to_hubspot: row.sent_to_hubspot,
            hubspot_contact_id: row.hubspot_contact_id,
            country_code: row.country_code,
            source_page: row.source_page,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl LeadStore for PgStore {
    async fn insert(&self, lead: ContactSubmission) -> Result<ContactSubmission, StoreError> {
        sqlx::query(&format!(
            "INSERT INTO contact_submissions ({LEAD_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(lead.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.message)
        .bind(lead.submission_status.as_str())
        .bind(lead.status.as_str())
        .bind(lead.sent_to_hubspot)
        .bind(&lead.hubspot_contact_id)
        .bind(&lead.country_code)
        .bind(&lead.source_page)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(lead)
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>, StoreError> {
        let rows = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {LEAD_COLUMNS} FROM contact_submissions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ContactSubmission::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<ContactSubmission, StoreError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {LEAD_COLUMNS} FROM contact_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::lead(id))?;
        ContactSubmission::try_from(row)
    }

    async fn update(&self, id: Uuid, patch: LeadPatch) -> Result<ContactSubmission, StoreError> {
        let mut lead = LeadStore::get(self, id).await?;
        lead.apply(patch, Utc::now());
        sqlx::query(
            "UPDATE contact_submissions SET status = $2, submission_status = $3, sent_to_hubspot = $4, \
             hubspot_contact_id = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(lead.id)
        .bind(lead.status.as_str())
        .bind(lead.submission_status.as_str())
        .bind(lead.sent_to_hubspot)
        .bind(&lead.hubspot_contact_id)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(lead)
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn record_page_view(&self, path: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO page_views (path, views) VALUES ($1, 1) \
             ON CONFLICT (path) DO UPDATE SET views = page_views.views + 1, updated_at = now()",
        )
        .bind(path)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_button_click(&self, button: &str, page: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO button_clicks (button, page, clicks) VALUES ($1, $2, 1) \
             ON CONFLICT (button, page) DO UPDATE SET clicks = button_clicks.clicks + 1, updated_at = now()",
        )
        .bind(button)
        .bind(page)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn page_views(&self) -> Result<Vec<PageViewCount>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT path, views FROM page_views")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(path, views)| PageViewCount {
                path,
                views: views.max(0) as u64,
            })
            .collect())
    }

    async fn button_clicks(&self) -> Result<Vec<ButtonClickCount>, StoreError> {
        let rows: Vec<(String, String, i64)> =
            sqlx::query_as("SELECT button, page, clicks FROM button_clicks")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(button, page, clicks)| ButtonClickCount {
                button,
                page,
                clicks: clicks.max(0) as u64,
            })
            .collect())
    }
}
