//! Delivery of queued outbox rows to the photo archive.
//!
//! Shared by the creation path (one immediate attempt) and the redelivery
//! worker. Rows are claimed before they are sent so the two never deliver
//! the same photo concurrently. The outcome is written back to the outbox;
//! nothing here ever returns an error to the caller.

use std::time::Duration;

use petlog_clients::PhotoArchive;
use petlog_core::types::DbId;
use petlog_db::models::archive_outbox::ArchiveOutboxEntry;
use petlog_db::repositories::ArchiveOutboxRepo;
use sqlx::PgPool;

/// How long a sender may hold outbox rows before another may take them over.
pub const DEFAULT_CLAIM_LEASE: Duration = Duration::from_secs(300);

/// Claim the given rows and deliver the ones this caller won.
///
/// Rows already held by a redelivery worker are left to it. Returns the
/// number of rows delivered.
pub async fn claim_and_deliver(
    pool: &PgPool,
    archive: &dyn PhotoArchive,
    ids: &[DbId],
    lease: Duration,
) -> usize {
    if ids.is_empty() {
        return 0;
    }

    let claimed = match ArchiveOutboxRepo::claim(pool, ids, lease).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, ?ids, "Failed to claim outbox rows, leaving them for redelivery");
            return 0;
        }
    };
    if claimed.len() < ids.len() {
        tracing::debug!(
            requested = ids.len(),
            claimed = claimed.len(),
            "Some outbox rows are held by another sender"
        );
    }

    if deliver_batch(pool, archive, &claimed).await {
        claimed.len()
    } else {
        0
    }
}

/// Send already-claimed `rows` as a single batch and record the outcome,
/// which also releases the claim.
///
/// Returns `true` when the archive accepted the batch. An empty batch makes
/// no call.
pub async fn deliver_batch(
    pool: &PgPool,
    archive: &dyn PhotoArchive,
    rows: &[ArchiveOutboxEntry],
) -> bool {
    if rows.is_empty() {
        return true;
    }

    let entries: Vec<_> = rows.iter().map(ArchiveOutboxEntry::to_entry).collect();
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

    match archive.save_photos(&entries).await {
        Ok(()) => {
            tracing::info!(photos = entries.len(), "Photos transferred to archive");
            if let Err(e) = ArchiveOutboxRepo::mark_delivered(pool, &ids).await {
                tracing::error!(error = %e, ?ids, "Failed to mark outbox rows delivered");
            }
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, photos = entries.len(), "Photo archive transfer failed");
            if let Err(db_err) = ArchiveOutboxRepo::record_failure(pool, &ids, &e.to_string()).await
            {
                tracing::error!(error = %db_err, ?ids, "Failed to record outbox delivery failure");
            }
            false
        }
    }
}
