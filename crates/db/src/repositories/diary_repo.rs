//! Repository for the `diaries` table.

use petlog_core::diary::select_archive_entries;
use petlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::archive_outbox::ArchiveOutboxEntry;
use crate::models::diary::{CreateDiary, Diary, DiaryChanges, DiaryImage, DiaryWithImages};
use crate::repositories::{ArchiveOutboxRepo, DiaryImageRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "diary_id, user_id, pet_id, content, visibility, is_ai_gen, \
                       weather, mood, created_at, updated_at";

/// Result of [`DiaryRepo::create_with_images`].
#[derive(Debug, Clone)]
pub struct CreatedDiary {
    pub diary: Diary,
    pub images: Vec<DiaryImage>,
    /// Outbox rows queued for the gallery images, in image order.
    pub pending_archive: Vec<ArchiveOutboxEntry>,
}

/// Provides CRUD operations for diaries.
pub struct DiaryRepo;

impl DiaryRepo {
    /// Insert a diary, its images, and archive outbox rows for the gallery
    /// images, all in one transaction.
    ///
    /// Visibility defaults to `PRIVATE` and `is_ai_gen` to `false`.
    pub async fn create_with_images(
        pool: &PgPool,
        input: &CreateDiary,
    ) -> Result<CreatedDiary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO diaries (user_id, pet_id, content, visibility, is_ai_gen, weather, mood)
             VALUES ($1, $2, $3, COALESCE($4, 'PRIVATE'), COALESCE($5, false), $6, $7)
             RETURNING {COLUMNS}"
        );
        let diary = sqlx::query_as::<_, Diary>(&query)
            .bind(input.user_id)
            .bind(input.pet_id)
            .bind(&input.content)
            .bind(&input.visibility)
            .bind(input.is_ai_gen)
            .bind(&input.weather)
            .bind(&input.mood)
            .fetch_one(&mut *tx)
            .await?;

        let images =
            DiaryImageRepo::insert_many(&mut *tx, diary.diary_id, diary.user_id, &input.images)
                .await?;

        let entries = select_archive_entries(&images);
        let pending_archive = ArchiveOutboxRepo::enqueue(&mut *tx, diary.diary_id, &entries).await?;

        tx.commit().await?;

        tracing::debug!(
            diary_id = diary.diary_id,
            images = images.len(),
            pending_archive = pending_archive.len(),
            "Diary persisted"
        );

        Ok(CreatedDiary {
            diary,
            images,
            pending_archive,
        })
    }

    /// Find a diary by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Diary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM diaries WHERE diary_id = $1");
        sqlx::query_as::<_, Diary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a diary and its images. Returns `None` if the diary does not exist.
    pub async fn find_with_images(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DiaryWithImages>, sqlx::Error> {
        let Some(diary) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let images = DiaryImageRepo::list_by_diary(pool, id).await?;
        Ok(Some(DiaryWithImages { diary, images }))
    }

    /// Apply column changes. Columns whose change is `None` keep their value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &DiaryChanges,
    ) -> Result<Option<Diary>, sqlx::Error> {
        let query = format!(
            "UPDATE diaries SET
                content = CASE WHEN $2 THEN $3 ELSE content END,
                visibility = COALESCE($4, visibility),
                weather = CASE WHEN $5 THEN $6 ELSE weather END,
                mood = CASE WHEN $7 THEN $8 ELSE mood END,
                updated_at = NOW()
             WHERE diary_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Diary>(&query)
            .bind(id)
            .bind(changes.content.is_some())
            .bind(changes.content.clone().flatten())
            .bind(&changes.visibility)
            .bind(changes.weather.is_some())
            .bind(changes.weather.clone().flatten())
            .bind(changes.mood.is_some())
            .bind(changes.mood.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a diary by ID. Images and outbox rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM diaries WHERE diary_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
