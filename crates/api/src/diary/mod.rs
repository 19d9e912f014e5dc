//! Diary orchestration: existence checks, content resolution, persistence
//! and photo archive forwarding.

pub mod clients;
pub mod forwarding;
pub mod orchestrator;

pub use clients::build_http_clients;
pub use orchestrator::{ContentSource, DiaryClients, DiaryDraft, DiaryOrchestrator};
