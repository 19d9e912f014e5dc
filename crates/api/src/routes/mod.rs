pub mod diary;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /diaries                 create (supplied content)
/// /diaries/ai              create (generated content)
/// /diaries/{id}            get, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/diaries", diary::router())
}
