use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sitedesk_core::content::snippets::{Snippet, SnippetLocation, SnippetSet};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/snippets", get(snippets_for_page))
}

#[derive(Debug, Deserialize)]
pub struct SnippetParams {
    page: Option<String>,
    location: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnippets {
    page: String,
    location: SnippetLocation,
    snippets: Vec<Snippet>,
    html: String,
}

async fn snippets_for_page(
    State(state): State<AppState>,
    Query(params): Query<SnippetParams>,
) -> ApiResult<Json<PageSnippets>> {
    let location: SnippetLocation = params
        .location
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown snippet location {:?}", params.location)))?;
    let page = params.page.unwrap_or_else(|| "/".to_string());
    let set = state.repository::<SnippetSet>().load().await?;
    Ok(Json(PageSnippets {
        snippets: set.snippets_for(&page, location).into_iter().cloned().collect(),
        html: set.render(&page, location),
        page,
        location,
    }))
}
