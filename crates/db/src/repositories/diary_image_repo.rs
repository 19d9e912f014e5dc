//! Repository for the `diary_images` table.

use petlog_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::diary::{CreateDiaryImage, DiaryImage};

const COLUMNS: &str =
    "image_id, diary_id, user_id, image_url, img_order, main_image, source, created_at";

/// Provides read and batch-insert operations for diary images.
///
/// Images have no standalone update or delete; they live and die with
/// their diary.
pub struct DiaryImageRepo;

impl DiaryImageRepo {
    /// Insert all images for a diary on the given connection, returning the
    /// rows in input order.
    ///
    /// `img_order` and `main_image` are stored exactly as supplied.
    pub async fn insert_many(
        conn: &mut PgConnection,
        diary_id: DbId,
        user_id: DbId,
        images: &[CreateDiaryImage],
    ) -> Result<Vec<DiaryImage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO diary_images (diary_id, user_id, image_url, img_order, main_image, source)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );

        let mut rows = Vec::with_capacity(images.len());
        for image in images {
            let row = sqlx::query_as::<_, DiaryImage>(&query)
                .bind(diary_id)
                .bind(user_id)
                .bind(&image.image_url)
                .bind(image.img_order)
                .bind(image.main_image)
                .bind(&image.source)
                .fetch_one(&mut *conn)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// List a diary's images by display order, then insertion order.
    pub async fn list_by_diary(
        pool: &PgPool,
        diary_id: DbId,
    ) -> Result<Vec<DiaryImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diary_images WHERE diary_id = $1 \
             ORDER BY img_order ASC, image_id ASC"
        );
        sqlx::query_as::<_, DiaryImage>(&query)
            .bind(diary_id)
            .fetch_all(pool)
            .await
    }
}
