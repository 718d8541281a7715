use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MAX_LABEL_LEN: usize = 512;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/track/page-view", post(page_view))
        .route("/api/track/button-click", post(button_click))
}

#[derive(Debug, Deserialize)]
pub struct PageView {
    path: String,
}

#[derive(Debug, Deserialize)]
pub struct ButtonClick {
    button: String,
    page: String,
}

fn label<'a>(field: &str, value: &'a str) -> ApiResult<&'a str> {
    let value = value.trim();
    if value.is_empty() || value.len() > MAX_LABEL_LEN {
        return Err(ApiError::BadRequest(format!("{field} must be 1-{MAX_LABEL_LEN} characters")));
    }
    Ok(value)
}

async fn page_view(State(state): State<AppState>, Json(body): Json<PageView>) -> ApiResult<StatusCode> {
    let path = label("path", &body.path)?;
    state.analytics().record_page_view(path).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn button_click(State(state): State<AppState>, Json(body): Json<ButtonClick>) -> ApiResult<StatusCode> {
    let button = label("button", &body.button)?;
    let page = label("page", &body.page)?;
    state.analytics().record_button_click(button, page).await?;
    Ok(StatusCode::NO_CONTENT)
}
