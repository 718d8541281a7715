pub mod auth;
pub mod contact;
pub mod content;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod seo;
pub mod snippets;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(content::routes())
        .merge(contact::routes())
        .merge(dashboard::routes())
        .merge(track::routes())
        .merge(pages::routes())
        .merge(snippets::routes())
        .merge(seo::routes())
        .with_state(state)
}
