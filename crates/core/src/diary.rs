//! Diary constants, validation, and archive-entry selection.
//!
//! Visibility and image-source values are stored as TEXT and validated
//! here before they reach the database.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Entity names (used in `CoreError::NotFound`)
// ---------------------------------------------------------------------------

pub const ENTITY_DIARY: &str = "Diary";
pub const ENTITY_USER: &str = "User";
pub const ENTITY_PET: &str = "Pet";

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Only the owner can read the diary.
pub const VISIBILITY_PRIVATE: &str = "PRIVATE";

/// Visible to the owner's friends.
pub const VISIBILITY_SHARED: &str = "SHARED";

/// Visible to everyone.
pub const VISIBILITY_PUBLIC: &str = "PUBLIC";

/// Applied when a create request omits visibility.
pub const DEFAULT_VISIBILITY: &str = VISIBILITY_PRIVATE;

const VALID_VISIBILITIES: &[&str] = &[VISIBILITY_PRIVATE, VISIBILITY_SHARED, VISIBILITY_PUBLIC];

/// Validate that `visibility` is one of `PRIVATE`, `SHARED`, `PUBLIC`.
pub fn validate_visibility(visibility: &str) -> Result<(), CoreError> {
    if VALID_VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid visibility '{visibility}'. Must be one of: {VALID_VISIBILITIES:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Image source
// ---------------------------------------------------------------------------

/// Photo picked from the user's live photo library. Forwarded to the archive.
pub const SOURCE_GALLERY: &str = "GALLERY";

/// Photo already held in the archive. Never forwarded.
pub const SOURCE_ARCHIVE: &str = "ARCHIVE";

const VALID_SOURCES: &[&str] = &[SOURCE_GALLERY, SOURCE_ARCHIVE];

/// Validate that `source` is either `GALLERY` or `ARCHIVE`.
pub fn validate_image_source(source: &str) -> Result<(), CoreError> {
    if VALID_SOURCES.contains(&source) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image source '{source}'. Must be one of: {VALID_SOURCES:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Archive entries
// ---------------------------------------------------------------------------

/// One `(owner, image)` pair sent to the photo archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoArchiveEntry {
    pub user_id: DbId,
    pub image_url: String,
}

/// Minimal view of an image needed to decide whether it is archived.
pub trait ArchiveCandidate {
    fn owner_id(&self) -> DbId;
    fn image_url(&self) -> &str;
    fn source(&self) -> &str;
}

/// Build archive entries for every `GALLERY` image, preserving input order.
///
/// `ARCHIVE` images are skipped; they already live in the archive.
pub fn select_archive_entries<I: ArchiveCandidate>(images: &[I]) -> Vec<PhotoArchiveEntry> {
    images
        .iter()
        .filter(|img| img.source() == SOURCE_GALLERY)
        .map(|img| PhotoArchiveEntry {
            user_id: img.owner_id(),
            image_url: img.image_url().to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text normalisation
// ---------------------------------------------------------------------------

/// Map the empty-string sentinel to `None` so that clearing a nullable text
/// field stores NULL.
pub fn empty_to_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
