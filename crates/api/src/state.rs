use std::sync::Arc;

use crate::config::ServerConfig;
use crate::diary::DiaryOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: petlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Diary orchestrator holding the remote clients.
    pub diaries: Arc<DiaryOrchestrator>,
}
