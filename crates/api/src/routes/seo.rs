use axum::{routing::post, Json, Router};
use serde::Deserialize;
use sitedesk_core::seo::{analyze, Analysis};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/seo/analyze", post(analyze_draft))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    title: String,
    content: String,
    focus_keyword: String,
    meta_description: String,
}

async fn analyze_draft(Json(body): Json<AnalyzeRequest>) -> Json<Analysis> {
    Json(analyze(
        &body.title,
        &body.content,
        &body.focus_keyword,
        &body.meta_description,
    ))
}
