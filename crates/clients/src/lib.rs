//! Outbound integrations of the diary service.
//!
//! Each integration is an `async_trait` seam with a reqwest-backed
//! implementation. The orchestrator holds them as trait objects, so tests
//! can swap in the fixed-response implementations from [`mock`].

pub mod content;
pub mod directory;
pub mod mock;
pub mod storage;

pub use content::{ContentGenerator, GeneratedContent, GenerationError, OpenAiContentGenerator};
pub use directory::{HttpPetDirectory, HttpUserDirectory, PetDetail, PetDirectory, UserDetail, UserDirectory};
pub use storage::{HttpPhotoArchive, PhotoArchive, StorageError};
