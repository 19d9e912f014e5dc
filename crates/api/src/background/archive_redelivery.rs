//! Periodic redelivery of photo archive outbox rows.
//!
//! Rows whose immediate forward failed stay pending in
//! `photo_archive_outbox`. This job claims them and retries in batches
//! grouped by diary until they are delivered or reach the attempt limit.
//! Rows held by another sender are skipped. Rows at the limit are left in
//! place.

use std::collections::BTreeMap;
use std::sync::Arc;

use petlog_clients::PhotoArchive;
use petlog_core::types::DbId;
use petlog_db::models::archive_outbox::ArchiveOutboxEntry;
use petlog_db::repositories::ArchiveOutboxRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::ArchiveRetryConfig;
use crate::diary::forwarding;

/// Maximum number of pending rows loaded per pass.
const BATCH_LIMIT: i64 = 500;

/// Summary of one redelivery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    pub delivered: usize,
    pub failed: usize,
}

/// Run one pass over the claimable pending rows.
pub async fn redeliver_pending(
    pool: &PgPool,
    archive: &dyn PhotoArchive,
    config: &ArchiveRetryConfig,
) -> Result<PassOutcome, sqlx::Error> {
    let pending =
        ArchiveOutboxRepo::claim_pending(pool, config.max_attempts, BATCH_LIMIT, config.claim_lease)
            .await?;

    let mut by_diary: BTreeMap<DbId, Vec<ArchiveOutboxEntry>> = BTreeMap::new();
    for row in pending {
        by_diary.entry(row.diary_id).or_default().push(row);
    }

    let mut outcome = PassOutcome::default();
    for (diary_id, rows) in by_diary {
        if forwarding::deliver_batch(pool, archive, &rows).await {
            outcome.delivered += rows.len();
        } else {
            tracing::debug!(diary_id, rows = rows.len(), "Archive redelivery: batch still pending");
            outcome.failed += rows.len();
        }
    }
    Ok(outcome)
}

/// Run the redelivery loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    archive: Arc<dyn PhotoArchive>,
    config: ArchiveRetryConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        max_attempts = config.max_attempts,
        "Archive redelivery job started"
    );

    let mut interval = tokio::time::interval(config.interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Archive redelivery job stopping");
                break;
            }
            _ = interval.tick() => {
                match redeliver_pending(&pool, archive.as_ref(), &config).await {
                    Ok(outcome) if outcome == PassOutcome::default() => {
                        tracing::debug!("Archive redelivery: nothing pending");
                    }
                    Ok(outcome) => {
                        tracing::info!(
                            delivered = outcome.delivered,
                            failed = outcome.failed,
                            "Archive redelivery: pass complete"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Archive redelivery: failed to load pending rows");
                    }
                }
            }
        }
    }
}
