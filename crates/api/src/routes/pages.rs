//! Page data for the public site, read straight from the typed content.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sitedesk_core::content::blog::{blog_filter_schema, BlogPage, BlogPost};
use sitedesk_core::content::clients::{client_filter_schema, ClientCase, ClientsPage};
use sitedesk_core::content::modules::{ModulesPage, PageMetadata};
use sitedesk_query::Listing;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/pages/clients", get(clients))
        .route("/api/pages/clients/{slug}", get(client_case))
        .route("/api/pages/blog", get(blog))
        .route("/api/pages/blog/{slug}", get(blog_post))
        .route("/api/pages/modules/{slug}/metadata", get(module_metadata))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientsPageData {
    heading: String,
    intro: String,
    sectors: Vec<String>,
    #[serde(flatten)]
    listing: Listing<ClientCase>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPageData {
    heading: String,
    intro: String,
    categories: Vec<String>,
    #[serde(flatten)]
    listing: Listing<BlogPost>,
}

async fn clients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ClientsPageData>> {
    let schema = client_filter_schema();
    let query = schema.query_from_params(&params)?;
    let page = state.repository::<ClientsPage>().load().await?;
    let listing = query.run(&page.client_cases, &schema.sort_fields);
    Ok(Json(ClientsPageData {
        sectors: page.sectors().into_iter().map(str::to_string).collect(),
        heading: page.heading,
        intro: page.intro,
        listing,
    }))
}

async fn client_case(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<ClientCase>> {
    let page = state.repository::<ClientsPage>().load().await?;
    page.find(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("client {slug}")))
}

async fn blog(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<BlogPageData>> {
    let schema = blog_filter_schema();
    let query = schema.query_from_params(&params)?;
    let page = state.repository::<BlogPage>().load().await?;
    let listing = query.run(&page.published(), &schema.sort_fields);
    Ok(Json(BlogPageData {
        heading: page.heading,
        intro: page.intro,
        categories: page.categories,
        listing,
    }))
}

async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<BlogPost>> {
    let page = state.repository::<BlogPage>().load().await?;
    page.find_published(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("post {slug}")))
}

async fn module_metadata(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageMetadata>> {
    let page = state.repository::<ModulesPage>().load().await?;
    page.find(&slug)
        .map(|m| Json(m.resolved_metadata()))
        .ok_or_else(|| ApiError::NotFound(format!("module {slug}")))
}
