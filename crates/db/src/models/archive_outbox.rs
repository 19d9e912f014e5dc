//! Photo archive outbox model.

use petlog_core::diary::PhotoArchiveEntry;
use petlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `photo_archive_outbox` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArchiveOutboxEntry {
    pub id: DbId,
    pub diary_id: DbId,
    pub user_id: DbId,
    pub image_url: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    /// Set while a sender holds the row.
    pub claimed_until: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ArchiveOutboxEntry {
    /// The payload sent to the photo archive for this row.
    pub fn to_entry(&self) -> PhotoArchiveEntry {
        PhotoArchiveEntry {
            user_id: self.user_id,
            image_url: self.image_url.clone(),
        }
    }
}
