use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sitedesk_core::content::blog::BlogPost;
use sitedesk_core::content::clients::ClientCase;
use sitedesk_core::content::leads::{ContactSubmission, LeadPatch, LeadStatus, NewContactSubmission};
use sitedesk_core::content::modules::PageMetadata;
use sitedesk_core::content::snippets::{Snippet, SnippetLocation};
use sitedesk_core::content::ContentBody;
use sitedesk_core::dashboard::{ButtonClickReport, LeadSummary, PageViewReport};
use sitedesk_core::document::{ContentDocument, ContentKind, NewContentDocument};
use sitedesk_core::mutation::PatchOperations;
use sitedesk_core::seo::Analysis;
use sitedesk_query::Listing;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::{ClientConfig, METADATA_TIMEOUT};
use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnippets {
    pub page: String,
    pub location: SnippetLocation,
    pub snippets: Vec<Snippet>,
    pub html: String,
}

/// A downloaded CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentBody<'a> {
    title: &'a str,
    content: Value,
}

/// HTTP client for the sitedesk API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SiteClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SiteClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sitedesk-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let request = builder.build().map_err(|e| ClientError::Config(e.to_string()))?;
        let method = request.method().to_string();
        let url = request.url().to_string();
        tracing::debug!(%method, %url, "sending request");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ClientError::Request {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let raw = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &raw);
        tracing::warn!(%method, %url, status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send_raw(builder).await?;
        let url = response.url().to_string();
        let raw = response.text().await.map_err(|e| ClientError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ClientError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        self.send_raw(builder).await.map(|_| ())
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "/api/health")).await
    }

    /// Log in as admin and keep the token for later calls.
    pub async fn login(&mut self, password: &str) -> Result<LoginResponse, ClientError> {
        let response: LoginResponse = self
            .send(
                self.request(Method::POST, "/api/auth/login")
                    .json(&json!({ "password": password })),
            )
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    // Content documents

    pub async fn list_content(&self, kind: Option<&ContentKind>) -> Result<Vec<ContentDocument>, ClientError> {
        let mut builder = self.request(Method::GET, "/api/content");
        if let Some(kind) = kind {
            builder = builder.query(&[("type", kind.as_str())]);
        }
        self.send(builder).await
    }

    /// The document of `kind`, or `None` when none is stored.
    pub async fn content_by_kind(&self, kind: &ContentKind) -> Result<Option<ContentDocument>, ClientError> {
        Ok(self.list_content(Some(kind)).await?.into_iter().next())
    }

    pub async fn get_document(&self, id: Uuid) -> Result<ContentDocument, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/content/{id}"))).await
    }

    pub async fn create_document(&self, new: &NewContentDocument) -> Result<ContentDocument, ClientError> {
        self.send(self.request(Method::POST, "/api/content").json(new)).await
    }

    /// Upsert the document of `kind` with a new `content` object.
    pub async fn save_content(
        &self,
        kind: &ContentKind,
        title: &str,
        content: Value,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, ClientError> {
        let mut builder = self
            .request(Method::PUT, "/api/content")
            .query(&[("type", kind.as_str())])
            .json(&DocumentBody { title, content });
        if let Some(rev) = if_revision {
            builder = builder.query(&[("ifRevision", rev)]);
        }
        self.send(builder).await
    }

    pub async fn patch_content(
        &self,
        kind: &ContentKind,
        ops: &PatchOperations,
    ) -> Result<ContentDocument, ClientError> {
        self.send(
            self.request(Method::PATCH, "/api/content")
                .query(&[("type", kind.as_str())])
                .json(ops),
        )
        .await
    }

    pub async fn replace_document(
        &self,
        id: Uuid,
        new: &NewContentDocument,
        if_revision: Option<&str>,
    ) -> Result<ContentDocument, ClientError> {
        let mut builder = self.request(Method::PUT, &format!("/api/content/{id}")).json(new);
        if let Some(rev) = if_revision {
            builder = builder.query(&[("ifRevision", rev)]);
        }
        self.send(builder).await
    }

    /// Typed body of a content kind. Missing or malformed content yields
    /// the default body.
    pub async fn load<T: ContentBody>(&self) -> Result<T, ClientError> {
        let kind = T::kind();
        let Some(doc) = self.content_by_kind(&kind).await? else {
            tracing::warn!(kind = %kind, "no document stored; using defaults");
            return Ok(T::default());
        };
        Ok(serde_json::from_value(doc.content).unwrap_or_else(|e| {
            tracing::warn!(kind = %kind, error = %e, "malformed content; using defaults");
            T::default()
        }))
    }

    pub async fn save<T: ContentBody>(&self, body: &T) -> Result<ContentDocument, ClientError> {
        let content = serde_json::to_value(body).map_err(|e| ClientError::Decode {
            url: self.url("/api/content"),
            reason: e.to_string(),
        })?;
        self.save_content(&T::kind(), T::title(), content, None).await
    }

    // Leads

    pub async fn submit_contact(&self, form: &NewContactSubmission) -> Result<Uuid, ClientError> {
        let response: SubmitResponse = self.send(self.request(Method::POST, "/api/contact").json(form)).await?;
        Ok(response.id)
    }

    /// Filtered, paged leads. `params` are the listing query parameters
    /// (`search`, `status`, `hubspot`, `sort`, `page`, `limit`, ...).
    pub async fn list_leads(&self, params: &[(&str, &str)]) -> Result<Listing<ContactSubmission>, ClientError> {
        self.send(self.request(Method::GET, "/api/contact").query(params)).await
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<ContactSubmission, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/contact/{id}"))).await
    }

    pub async fn update_lead(&self, id: Uuid, patch: &LeadPatch) -> Result<ContactSubmission, ClientError> {
        self.send(self.request(Method::PATCH, &format!("/api/contact/{id}")).json(patch))
            .await
    }

    /// Set `status` on every lead at once. Requests run concurrently; the
    /// result holds one entry per id, in input order.
    pub async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        status: LeadStatus,
    ) -> Vec<(Uuid, Result<ContactSubmission, ClientError>)> {
        let mut tasks = JoinSet::new();
        for (index, id) in ids.iter().copied().enumerate() {
            let client = self.clone();
            tasks.spawn(async move { (index, id, client.update_lead(id, &LeadPatch::status(status)).await) });
        }

        let mut results: Vec<Option<(Uuid, Result<ContactSubmission, ClientError>)>> =
            ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, id, result)) => results[index] = Some((id, result)),
                Err(e) => tracing::error!(error = %e, "bulk update task failed"),
            }
        }
        results
            .into_iter()
            .zip(ids)
            .map(|(result, id)| {
                result.unwrap_or_else(|| {
                    (
                        *id,
                        Err(ClientError::Config("update task did not complete".to_string())),
                    )
                })
            })
            .collect()
    }

    pub async fn export_leads(&self, params: &[(&str, &str)]) -> Result<CsvExport, ClientError> {
        let response = self
            .send_raw(self.request(Method::GET, "/api/leads/export").query(params))
            .await?;
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename);
        let url = response.url().to_string();
        let body = response.text().await.map_err(|e| ClientError::Decode {
            url,
            reason: e.to_string(),
        })?;
        Ok(CsvExport { filename, body })
    }

    // Dashboard and tracking

    pub async fn page_views(&self) -> Result<PageViewReport, ClientError> {
        self.send(self.request(Method::GET, "/api/dashboard/page-views")).await
    }

    pub async fn button_clicks(&self) -> Result<ButtonClickReport, ClientError> {
        self.send(self.request(Method::GET, "/api/dashboard/button-clicks")).await
    }

    pub async fn lead_summary(&self) -> Result<LeadSummary, ClientError> {
        self.send(self.request(Method::GET, "/api/dashboard/summary")).await
    }

    pub async fn track_page_view(&self, path: &str) -> Result<(), ClientError> {
        self.send_empty(
            self.request(Method::POST, "/api/track/page-view")
                .json(&json!({ "path": path })),
        )
        .await
    }

    pub async fn track_button_click(&self, button: &str, page: &str) -> Result<(), ClientError> {
        self.send_empty(
            self.request(Method::POST, "/api/track/button-click")
                .json(&json!({ "button": button, "page": page })),
        )
        .await
    }

    // Page data

    pub async fn client_case(&self, slug: &str) -> Result<ClientCase, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/pages/clients/{slug}"))).await
    }

    pub async fn blog_post(&self, slug: &str) -> Result<BlogPost, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/pages/blog/{slug}"))).await
    }

    /// Head metadata of a module page, bounded by a fixed timeout.
    pub async fn module_metadata(&self, slug: &str) -> Result<PageMetadata, ClientError> {
        self.send(
            self.request(Method::GET, &format!("/api/pages/modules/{slug}/metadata"))
                .timeout(METADATA_TIMEOUT),
        )
        .await
    }

    pub async fn snippets(&self, page: &str, location: SnippetLocation) -> Result<PageSnippets, ClientError> {
        self.send(
            self.request(Method::GET, "/api/snippets")
                .query(&[("page", page), ("location", location.as_str())]),
        )
        .await
    }

    pub async fn analyze_seo(
        &self,
        title: &str,
        content: &str,
        focus_keyword: &str,
        meta_description: &str,
    ) -> Result<Analysis, ClientError> {
        self.send(self.request(Method::POST, "/api/seo/analyze").json(&json!({
            "title": title,
            "content": content,
            "focusKeyword": focus_keyword,
            "metaDescription": meta_description,
        })))
        .await
    }
}

/// `filename` parameter of a `Content-Disposition: attachment` header.
fn attachment_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
    })
}
