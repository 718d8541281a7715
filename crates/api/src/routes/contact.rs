use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sitedesk_core::content::leads::{lead_filter_schema, ContactSubmission, LeadPatch, NewContactSubmission};
use sitedesk_core::events::{LeadEvent, SiteEvent};
use sitedesk_core::export::{export_filename, leads_csv};
use sitedesk_core::store::new_lead;
use sitedesk_query::Listing;

use super::content::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AdminClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", get(list_leads).post(submit_contact))
        .route("/api/contact/{id}", get(get_lead).patch(update_lead))
        .route("/api/leads/export", get(export_leads))
}

fn lead_event(lead: &ContactSubmission) -> LeadEvent {
    LeadEvent {
        lead_id: lead.id,
        status: lead.status,
        timestamp: Utc::now(),
    }
}

/// Public contact form endpoint.
async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<NewContactSubmission>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let lead = state.leads().insert(new_lead(form)?).await?;
    tracing::info!(id = %lead.id, source = lead.source_page.as_deref().unwrap_or("-"), "contact form submitted");
    state.event_bus().publish(SiteEvent::LeadReceived(lead_event(&lead)));
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": lead.id }))))
}

async fn list_leads(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Listing<ContactSubmission>>> {
    let schema = lead_filter_schema();
    let query = schema.query_from_params(&params)?;
    let leads = state.leads().list().await?;
    Ok(Json(query.run(&leads, &schema.sort_fields)))
}

async fn get_lead(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactSubmission>> {
    Ok(Json(state.leads().get(parse_id(&id)?).await?))
}

async fn update_lead(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Path(id): Path<String>,
    Json(patch): Json<LeadPatch>,
) -> ApiResult<Json<ContactSubmission>> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest("nothing to update".to_string()));
    }
    let lead = state.leads().update(parse_id(&id)?, patch).await?;
    tracing::info!(id = %lead.id, status = %lead.status, "lead updated");
    state.event_bus().publish(SiteEvent::LeadUpdated(lead_event(&lead)));
    Ok(Json(lead))
}

/// Every lead matching the listing filters, unpaged, as CSV.
async fn export_leads(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let schema = lead_filter_schema();
    let mut query = schema.query_from_params(&params)?;
    query.page = None;
    let leads = state.leads().list().await?;
    let listing = query.run(&leads, &schema.sort_fields);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now().date_naive())
    );
    tracing::info!(rows = listing.total, "leads exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        leads_csv(&listing.items),
    ))
}
