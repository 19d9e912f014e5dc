//! Repository for the `photo_archive_outbox` table.
//!
//! Delivery is claim-based: a sender first takes a time-limited claim on the
//! rows it is about to send, so the creation path and any number of
//! redelivery workers never send the same row concurrently. Finishing a
//! delivery, successful or not, releases the claim.

use std::time::Duration;

use petlog_core::diary::PhotoArchiveEntry;
use petlog_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::archive_outbox::ArchiveOutboxEntry;

const COLUMNS: &str = "id, diary_id, user_id, image_url, attempts, last_error, \
                       claimed_until, delivered_at, created_at";

/// Rows that can be claimed right now.
const CLAIMABLE: &str =
    "delivered_at IS NULL AND (claimed_until IS NULL OR claimed_until < NOW())";

/// Outbox of photo forwards awaiting delivery to the archive service.
pub struct ArchiveOutboxRepo;

impl ArchiveOutboxRepo {
    /// Queue one unclaimed row per entry on the given connection.
    pub async fn enqueue(
        conn: &mut PgConnection,
        diary_id: DbId,
        entries: &[PhotoArchiveEntry],
    ) -> Result<Vec<ArchiveOutboxEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO photo_archive_outbox (diary_id, user_id, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, ArchiveOutboxEntry>(&query)
                .bind(diary_id)
                .bind(entry.user_id)
                .bind(&entry.image_url)
                .fetch_one(&mut *conn)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Claim the given rows for `lease`.
    ///
    /// Rows that are delivered or held by another sender are skipped, so the
    /// result may be a subset of `ids`.
    pub async fn claim(
        pool: &PgPool,
        ids: &[DbId],
        lease: Duration,
    ) -> Result<Vec<ArchiveOutboxEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE photo_archive_outbox
             SET claimed_until = NOW() + make_interval(secs => $2)
             WHERE id IN (
                 SELECT id FROM photo_archive_outbox
                 WHERE id = ANY($1) AND {CLAIMABLE}
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, ArchiveOutboxEntry>(&query)
            .bind(ids)
            .bind(lease.as_secs_f64())
            .fetch_all(pool)
            .await?;
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    /// Claim up to `limit` undelivered rows with fewer than `max_attempts`
    /// attempts, oldest first.
    pub async fn claim_pending(
        pool: &PgPool,
        max_attempts: i32,
        limit: i64,
        lease: Duration,
    ) -> Result<Vec<ArchiveOutboxEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE photo_archive_outbox
             SET claimed_until = NOW() + make_interval(secs => $3)
             WHERE id IN (
                 SELECT id FROM photo_archive_outbox
                 WHERE {CLAIMABLE} AND attempts < $1
                 ORDER BY created_at ASC, id ASC
                 LIMIT $2
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, ArchiveOutboxEntry>(&query)
            .bind(max_attempts)
            .bind(limit)
            .bind(lease.as_secs_f64())
            .fetch_all(pool)
            .await?;
        rows.sort_by_key(|r| (r.created_at, r.id));
        Ok(rows)
    }

    /// All rows for a diary, in insertion order.
    pub async fn list_by_diary(
        pool: &PgPool,
        diary_id: DbId,
    ) -> Result<Vec<ArchiveOutboxEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photo_archive_outbox WHERE diary_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ArchiveOutboxEntry>(&query)
            .bind(diary_id)
            .fetch_all(pool)
            .await
    }

    /// Mark rows delivered, count the successful attempt and release the claim.
    pub async fn mark_delivered(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE photo_archive_outbox
             SET delivered_at = NOW(), attempts = attempts + 1, last_error = NULL,
                 claimed_until = NULL
             WHERE id = ANY($1) AND delivered_at IS NULL",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count a failed attempt, keep the error text and release the claim.
    pub async fn record_failure(
        pool: &PgPool,
        ids: &[DbId],
        error: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE photo_archive_outbox
             SET attempts = attempts + 1, last_error = $2, claimed_until = NULL
             WHERE id = ANY($1) AND delivered_at IS NULL",
        )
        .bind(ids)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
