//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must join an
//! outer transaction take `&mut PgConnection` instead.

pub mod archive_outbox_repo;
pub mod diary_image_repo;
pub mod diary_repo;

pub use archive_outbox_repo::ArchiveOutboxRepo;
pub use diary_image_repo::DiaryImageRepo;
pub use diary_repo::DiaryRepo;
