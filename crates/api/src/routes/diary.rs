//! Route definitions for the `/diaries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::diary;
use crate::state::AppState;

/// Routes mounted at `/diaries`.
///
/// ```text
/// POST   /        -> create
/// POST   /ai      -> create_ai
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(diary::create))
        .route("/ai", post(diary::create_ai))
        .route(
            "/{id}",
            get(diary::get_by_id)
                .patch(diary::update)
                .delete(diary::delete),
        )
}
