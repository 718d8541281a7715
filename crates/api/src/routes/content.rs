use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sitedesk_core::content::validate_content;
use sitedesk_core::document::{ContentDocument, ContentKind, NewContentDocument};
use sitedesk_core::events::{ContentSavedEvent, SiteEvent};
use sitedesk_core::mutation::PatchOperations;
use sitedesk_core::store::{find_by_kind, patch_document, upsert_kind};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AdminClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/content",
            get(list_documents)
                .post(create_document)
                .put(upsert_document)
                .patch(patch_kind),
        )
        .route("/api/content/{id}", get(get_document).put(replace_document))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    if_revision: Option<String>,
}

/// Body of `PUT /api/content?type=`; the kind comes from the query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    title: Option<String>,
    description: Option<String>,
    content: Value,
    is_active: Option<bool>,
    metadata: Option<Value>,
}

fn parse_kind(raw: Option<&str>) -> ApiResult<ContentKind> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest("missing `type` query parameter".to_string()))?;
    Ok(ContentKind::parse(raw)?)
}

pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id: {raw}")))
}

fn publish_saved(state: &AppState, doc: &ContentDocument, operation: &str, previous_rev: Option<String>) {
    state.event_bus().publish(SiteEvent::ContentSaved(ContentSavedEvent {
        document_id: doc.id,
        kind: doc.kind.clone(),
        operation: operation.to_string(),
        previous_rev,
        result_rev: doc.revision.clone(),
        timestamp: Utc::now(),
    }));
}

async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<ContentDocument>>> {
    let docs = match params.kind.as_deref() {
        Some(raw) => state.content().list_by_kind(&ContentKind::parse(raw)?).await?,
        None => state.content().list_all().await?,
    };
    let docs = match params.active {
        Some(active) => docs.into_iter().filter(|d| d.is_active == active).collect(),
        None => docs,
    };
    Ok(Json(docs))
}

async fn get_document(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<ContentDocument>> {
    Ok(Json(state.content().get(parse_id(&id)?).await?))
}

async fn create_document(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Json(new): Json<NewContentDocument>,
) -> ApiResult<(StatusCode, Json<ContentDocument>)> {
    validate_content(&new.kind, &new.content)?;
    let doc = state.content().create(new).await?;
    tracing::info!(id = %doc.id, kind = %doc.kind, "document created");
    publish_saved(&state, &doc, "create", None);
    Ok((StatusCode::CREATED, Json(doc)))
}

/// Upsert the single document of `?type=`.
async fn upsert_document(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Query(params): Query<WriteParams>,
    Json(body): Json<DocumentBody>,
) -> ApiResult<(StatusCode, Json<ContentDocument>)> {
    let kind = parse_kind(params.kind.as_deref())?;
    let existing = find_by_kind(state.content(), &kind).await?;
    let previous_rev = existing.as_ref().map(|d| d.revision.clone());

    let mut new = match &existing {
        Some(doc) => doc.to_new(),
        None => NewContentDocument::new(kind.clone(), kind.to_string(), Value::Null),
    };
    new.content = body.content;
    if let Some(title) = body.title {
        new.title = title;
    }
    if let Some(description) = body.description {
        new.description = description;
    }
    if let Some(active) = body.is_active {
        new.is_active = active;
    }
    if body.metadata.is_some() {
        new.metadata = body.metadata;
    }

    let (doc, created) = upsert_kind(state.content(), new, params.if_revision.as_deref()).await?;
    tracing::info!(id = %doc.id, kind = %doc.kind, created, "document saved");
    publish_saved(&state, &doc, if created { "create" } else { "update" }, previous_rev);
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(doc)))
}

async fn patch_kind(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Query(params): Query<WriteParams>,
    Json(ops): Json<PatchOperations>,
) -> ApiResult<Json<ContentDocument>> {
    if ops.is_empty() {
        return Err(ApiError::BadRequest("patch has no operations".to_string()));
    }
    let kind = parse_kind(params.kind.as_deref())?;
    let current = find_by_kind(state.content(), &kind)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{kind} document")))?;
    if let Some(expected) = params.if_revision.as_deref() {
        sitedesk_core::store::check_revision(Some(expected), &current.revision)?;
    }

    let doc = patch_document(state.content(), current.id, &ops).await?;
    tracing::info!(id = %doc.id, kind = %doc.kind, "document patched");
    publish_saved(&state, &doc, "patch", Some(current.revision));
    Ok(Json(doc))
}

async fn replace_document(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Path(id): Path<String>,
    Query(params): Query<WriteParams>,
    Json(new): Json<NewContentDocument>,
) -> ApiResult<Json<ContentDocument>> {
    let id = parse_id(&id)?;
    validate_content(&new.kind, &new.content)?;
    let previous = state.content().get(id).await?;
    let doc = state
        .content()
        .replace(id, new, params.if_revision.as_deref())
        .await?;
    tracing::info!(id = %doc.id, kind = %doc.kind, "document replaced");
    publish_saved(&state, &doc, "update", Some(previous.revision));
    Ok(Json(doc))
}
