use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_core::auth::{issue_token, verify_password};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    let config = state.config();
    let Some(hash) = config.admin_password_hash.as_deref() else {
        tracing::warn!("login attempted but ADMIN_PASSWORD_HASH is not set");
        return Err(ApiError::Unauthorized);
    };
    verify_password(&body.password, hash).inspect_err(|_| tracing::warn!("admin login rejected"))?;

    let ttl = Duration::minutes(config.token_ttl_minutes);
    let token = issue_token(ADMIN_SUBJECT, &config.jwt_secret, ttl)?;
    tracing::info!("admin logged in");
    Ok(Json(LoginResponse {
        token,
        expires_at: Utc::now() + ttl,
    }))
}
