//! Fixed-response implementations of the client traits.
//!
//! Used by tests and local runs that have no sibling services. Each stand-in
//! records the calls it receives so assertions can check what was sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use petlog_core::diary::PhotoArchiveEntry;
use petlog_core::lookup::Lookup;
use petlog_core::types::DbId;

use crate::content::{ContentGenerator, GeneratedContent, GenerationError};
use crate::directory::{PetDetail, PetDirectory, UserDetail, UserDirectory};
use crate::storage::{PhotoArchive, StorageError};

// ---------------------------------------------------------------------------
// Directories
// ---------------------------------------------------------------------------

/// Outcome a [`FixedDirectory`] reports for every id except the overrides.
#[derive(Debug, Clone)]
pub enum FixedOutcome {
    Found,
    Absent,
    Indeterminate(String),
}

/// A user and pet directory that answers every lookup the same way,
/// except for ids listed as missing.
#[derive(Debug)]
pub struct FixedDirectory {
    outcome: FixedOutcome,
    missing: Vec<DbId>,
    calls: Mutex<Vec<DbId>>,
}

impl FixedDirectory {
    /// Every id exists.
    pub fn found() -> Self {
        Self::with_outcome(FixedOutcome::Found)
    }

    /// No id exists.
    pub fn absent() -> Self {
        Self::with_outcome(FixedOutcome::Absent)
    }

    /// Every lookup fails with the given cause.
    pub fn indeterminate(cause: impl Into<String>) -> Self {
        Self::with_outcome(FixedOutcome::Indeterminate(cause.into()))
    }

    pub fn with_outcome(outcome: FixedOutcome) -> Self {
        Self {
            outcome,
            missing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Report the given ids as absent regardless of the default outcome.
    #[must_use]
    pub fn with_missing(mut self, ids: &[DbId]) -> Self {
        self.missing.extend_from_slice(ids);
        self
    }

    /// Ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<DbId> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lookup<T>(&self, id: DbId, detail: impl FnOnce() -> T) -> Lookup<T> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(id);
        }
        if self.missing.contains(&id) {
            return Lookup::Absent;
        }
        match &self.outcome {
            FixedOutcome::Found => Lookup::Found(detail()),
            FixedOutcome::Absent => Lookup::Absent,
            FixedOutcome::Indeterminate(cause) => Lookup::Indeterminate(cause.clone()),
        }
    }
}

#[async_trait]
impl UserDirectory for FixedDirectory {
    async fn get_user_info(&self, user_id: DbId) -> Lookup<UserDetail> {
        self.lookup(user_id, || UserDetail {
            username: Some(format!("user-{user_id}")),
            ..Default::default()
        })
    }
}

#[async_trait]
impl PetDirectory for FixedDirectory {
    async fn get_pet_info(&self, pet_id: DbId) -> Lookup<PetDetail> {
        self.lookup(pet_id, || PetDetail {
            pet_id: Some(pet_id),
            pet_name: Some(format!("pet-{pet_id}")),
            ..Default::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Photo archive
// ---------------------------------------------------------------------------

/// A photo archive that records every batch it is sent.
///
/// Starts accepting; call [`RecordingPhotoArchive::set_failing`] to make
/// it reject batches (they are still recorded).
#[derive(Debug, Default)]
pub struct RecordingPhotoArchive {
    failing: AtomicBool,
    batches: Mutex<Vec<Vec<PhotoArchiveEntry>>>,
}

impl RecordingPhotoArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// An archive that rejects every batch.
    pub fn failing() -> Self {
        let archive = Self::default();
        archive.set_failing(true);
        archive
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Batches received so far, in call order.
    pub fn batches(&self) -> Vec<Vec<PhotoArchiveEntry>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PhotoArchive for RecordingPhotoArchive {
    async fn save_photos(&self, entries: &[PhotoArchiveEntry]) -> Result<(), StorageError> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(entries.to_vec());
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::ApiError {
                status: 503,
                body: "storage unavailable".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Content generator
// ---------------------------------------------------------------------------

/// A content generator that returns the same content for every image.
#[derive(Debug)]
pub struct FixedContentGenerator {
    content: GeneratedContent,
    calls: Mutex<Vec<String>>,
}

impl FixedContentGenerator {
    pub fn new(content: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            content: GeneratedContent {
                content: content.into(),
                mood: mood.into(),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Image references received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ContentGenerator for FixedContentGenerator {
    async fn generate(&self, image_url: &str) -> Result<GeneratedContent, GenerationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(image_url.to_string());
        }
        Ok(self.content.clone())
    }
}

/// A content generator that always fails.
#[derive(Debug, Clone)]
pub struct FailingContentGenerator {
    parse_failure: bool,
}

impl FailingContentGenerator {
    /// Fails as if the provider returned HTTP 500.
    pub fn api_error() -> Self {
        Self {
            parse_failure: false,
        }
    }

    /// Fails as if the provider's reply was not the expected JSON.
    pub fn parse_error() -> Self {
        Self {
            parse_failure: true,
        }
    }
}

#[async_trait]
impl ContentGenerator for FailingContentGenerator {
    async fn generate(&self, _image_url: &str) -> Result<GeneratedContent, GenerationError> {
        if self.parse_failure {
            Err(GenerationError::Parse("reply was not a JSON object".to_string()))
        } else {
            Err(GenerationError::ApiError {
                status: 500,
                body: "provider error".to_string(),
            })
        }
    }
}
