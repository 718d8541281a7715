use axum::{extract::State, routing::get, Json, Router};
use sitedesk_core::dashboard::{
    button_click_report, lead_summary, page_view_report, ButtonClickReport, LeadSummary, PageViewReport,
};

use crate::error::ApiResult;
use crate::middleware::auth::AdminClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/page-views", get(page_views))
        .route("/api/dashboard/button-clicks", get(button_clicks))
        .route("/api/dashboard/summary", get(summary))
}

async fn page_views(State(state): State<AppState>, AdminClaims(_): AdminClaims) -> ApiResult<Json<PageViewReport>> {
    let counts = state.analytics().page_views().await?;
    Ok(Json(page_view_report(&counts)))
}

async fn button_clicks(
    State(state): State<AppState>,
    AdminClaims(_): AdminClaims,
) -> ApiResult<Json<ButtonClickReport>> {
    let counts = state.analytics().button_clicks().await?;
    Ok(Json(button_click_report(&counts)))
}

async fn summary(State(state): State<AppState>, AdminClaims(_): AdminClaims) -> ApiResult<Json<LeadSummary>> {
    let leads = state.leads().list().await?;
    Ok(Json(lead_summary(&leads)))
}
