//! Diary and diary image models and DTOs.

use petlog_core::diary::{empty_to_none, ArchiveCandidate};
use petlog_core::patch::Patch;
use petlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `diaries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diary {
    pub diary_id: DbId,
    pub user_id: DbId,
    pub pet_id: DbId,
    pub content: Option<String>,
    pub visibility: String,
    pub is_ai_gen: bool,
    pub weather: Option<String>,
    pub mood: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `diary_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryImage {
    pub image_id: DbId,
    pub diary_id: DbId,
    pub user_id: DbId,
    pub image_url: String,
    pub img_order: i32,
    pub main_image: bool,
    pub source: String,
    pub created_at: Timestamp,
}

impl ArchiveCandidate for DiaryImage {
    fn owner_id(&self) -> DbId {
        self.user_id
    }

    fn image_url(&self) -> &str {
        &self.image_url
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// A diary together with its images, ordered by `img_order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryWithImages {
    #[serde(flatten)]
    pub diary: Diary,
    pub images: Vec<DiaryImage>,
}

/// DTO for inserting a diary and its images in one transaction.
///
/// Visibility and image sources must already be validated.
#[derive(Debug, Clone)]
pub struct CreateDiary {
    pub user_id: DbId,
    pub pet_id: DbId,
    pub content: Option<String>,
    /// Defaults to `PRIVATE` if omitted.
    pub visibility: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_ai_gen: Option<bool>,
    pub weather: Option<String>,
    pub mood: Option<String>,
    pub images: Vec<CreateDiaryImage>,
}

/// One image attached at creation time. The owner is taken from the diary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaryImage {
    pub image_url: String,
    #[serde(default)]
    pub img_order: i32,
    #[serde(default)]
    pub main_image: bool,
    pub source: String,
}

/// Request body for a partial diary update.
///
/// A missing key or an explicit `null` keeps the stored value. For the
/// nullable text fields an empty string clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiary {
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub visibility: Patch<String>,
    #[serde(default)]
    pub weather: Patch<String>,
    #[serde(default)]
    pub mood: Patch<String>,
}

/// Column-level changes derived from an [`UpdateDiary`].
///
/// Outer `None` keeps the column; `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryChanges {
    pub content: Option<Option<String>>,
    pub visibility: Option<String>,
    pub weather: Option<Option<String>>,
    pub mood: Option<Option<String>>,
}

impl DiaryChanges {
    pub fn is_empty(&self) -> bool {
        self == &DiaryChanges::default()
    }
}

impl From<UpdateDiary> for DiaryChanges {
    fn from(update: UpdateDiary) -> Self {
        Self {
            content: update.content.into_value().map(empty_to_none),
            visibility: update.visibility.into_value(),
            weather: update.weather.into_value().map(empty_to_none),
            mood: update.mood.into_value().map(empty_to_none),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> UpdateDiary {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn content_only_update_touches_only_content() {
        let changes = DiaryChanges::from(parse(r#"{"content": "walk"}"#));
        assert_eq!(changes.content, Some(Some("walk".to_string())));
        assert_eq!(changes.visibility, None);
        assert_eq!(changes.weather, None);
        assert_eq!(changes.mood, None);
    }

    #[test]
    fn all_null_update_is_empty() {
        let changes = DiaryChanges::from(parse(
            r#"{"content": null, "visibility": null, "weather": null, "mood": null}"#,
        ));
        assert!(changes.is_empty());
    }

    #[test]
    fn empty_string_clears_nullable_field() {
        let changes = DiaryChanges::from(parse(r#"{"weather": ""}"#));
        assert_eq!(changes.weather, Some(None));
        assert!(!changes.is_empty());
    }

    #[test]
    fn create_image_defaults() {
        let image: CreateDiaryImage =
            serde_json::from_str(r#"{"imageUrl": "a.jpg", "source": "GALLERY"}"#).unwrap();
        assert_eq!(image.img_order, 0);
        assert!(!image.main_image);
    }
}
