//! Response bodies shared by handlers.

use petlog_core::types::DbId;
use serde::Serialize;

/// Body returned by the diary creation endpoints alongside `201 Created`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryCreatedResponse {
    pub diary_id: DbId,
    pub message: &'static str,
}

impl DiaryCreatedResponse {
    pub fn new(diary_id: DbId) -> Self {
        Self {
            diary_id,
            message: "Diary created successfully.",
        }
    }
}
