//! The diary orchestrator.
//!
//! Every write goes through here so that user/pet validation, content
//! resolution and archive forwarding apply the same way regardless of which
//! endpoint the request came in on.

use std::sync::Arc;
use std::time::Duration;

use petlog_clients::{ContentGenerator, PetDirectory, PhotoArchive, UserDirectory};
use petlog_core::diary::{
    empty_to_none, validate_image_source, validate_visibility, ENTITY_DIARY, ENTITY_PET,
    ENTITY_USER, SOURCE_GALLERY,
};
use petlog_core::error::CoreError;
use petlog_core::lookup::{ExistencePolicy, Lookup};
use petlog_core::types::DbId;
use petlog_db::models::diary::{
    CreateDiary, CreateDiaryImage, DiaryChanges, DiaryWithImages, UpdateDiary,
};
use petlog_db::repositories::DiaryRepo;
use sqlx::PgPool;

use crate::diary::forwarding;
use crate::error::{AppError, AppResult};

/// Display position given to the photo of a generated diary.
const GENERATED_IMAGE_ORDER: i32 = 1;

/// Where a new diary's narrative comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Written by the caller, with any number of images.
    Supplied {
        content: Option<String>,
        mood: Option<String>,
        is_ai_gen: Option<bool>,
        images: Vec<CreateDiaryImage>,
    },
    /// Generated from one photo, which becomes the diary's main image.
    Generated { image_url: String },
}

/// Caller input common to every creation path.
#[derive(Debug, Clone)]
pub struct DiaryDraft {
    pub user_id: DbId,
    pub pet_id: DbId,
    pub visibility: Option<String>,
    pub weather: Option<String>,
    pub source: ContentSource,
}

/// Remote collaborators of the orchestrator.
#[derive(Clone)]
pub struct DiaryClients {
    pub users: Arc<dyn UserDirectory>,
    pub pets: Arc<dyn PetDirectory>,
    pub archive: Arc<dyn PhotoArchive>,
    pub generator: Arc<dyn ContentGenerator>,
}

/// Coordinates diary writes across the database and remote services.
pub struct DiaryOrchestrator {
    pool: PgPool,
    clients: DiaryClients,
    policy: ExistencePolicy,
    claim_lease: Duration,
}

impl DiaryOrchestrator {
    pub fn new(pool: PgPool, clients: DiaryClients, policy: ExistencePolicy) -> Self {
        Self {
            pool,
            clients,
            policy,
            claim_lease: forwarding::DEFAULT_CLAIM_LEASE,
        }
    }

    /// How long the immediate forward may hold outbox rows.
    #[must_use]
    pub fn with_claim_lease(mut self, lease: Duration) -> Self {
        self.claim_lease = lease;
        self
    }

    /// The photo archive, shared with the redelivery worker.
    pub fn archive(&self) -> Arc<dyn PhotoArchive> {
        Arc::clone(&self.clients.archive)
    }

    /// Create a diary and return its id.
    ///
    /// User and pet are checked before anything else touches the generator
    /// or the database. Archive forwarding happens after commit and its
    /// failure is only logged and recorded on the outbox.
    pub async fn create_diary(&self, draft: DiaryDraft) -> AppResult<DbId> {
        if let Some(visibility) = &draft.visibility {
            validate_visibility(visibility)?;
        }
        if let ContentSource::Supplied { images, .. } = &draft.source {
            for image in images {
                validate_image_source(&image.source)?;
            }
        }

        self.ensure_user_exists(draft.user_id).await?;
        self.ensure_pet_exists(draft.pet_id).await?;

        let input = self.resolve_content(draft).await?;
        let created = DiaryRepo::create_with_images(&self.pool, &input).await?;
        let diary_id = created.diary.diary_id;

        tracing::info!(
            diary_id,
            user_id = input.user_id,
            pet_id = input.pet_id,
            is_ai_gen = created.diary.is_ai_gen,
            "Diary created"
        );

        let outbox_ids: Vec<DbId> = created.pending_archive.iter().map(|r| r.id).collect();
        forwarding::claim_and_deliver(
            &self.pool,
            self.clients.archive.as_ref(),
            &outbox_ids,
            self.claim_lease,
        )
        .await;

        Ok(diary_id)
    }

    /// Load a diary with its images.
    pub async fn get_diary(&self, diary_id: DbId) -> AppResult<DiaryWithImages> {
        DiaryRepo::find_with_images(&self.pool, diary_id)
            .await?
            .ok_or_else(|| diary_not_found(diary_id))
    }

    /// Apply a partial update. Absent and null fields keep their values.
    pub async fn update_diary(&self, diary_id: DbId, patch: UpdateDiary) -> AppResult<()> {
        if let Some(visibility) = patch.visibility.value() {
            validate_visibility(visibility)?;
        }

        let changes = DiaryChanges::from(patch);
        if changes.is_empty() {
            return DiaryRepo::find_by_id(&self.pool, diary_id)
                .await?
                .map(|_| ())
                .ok_or_else(|| diary_not_found(diary_id));
        }

        let updated = DiaryRepo::update(&self.pool, diary_id, &changes)
            .await?
            .ok_or_else(|| diary_not_found(diary_id))?;

        tracing::info!(diary_id = updated.diary_id, "Diary updated");
        Ok(())
    }

    /// Delete a diary together with its images and outbox rows.
    pub async fn delete_diary(&self, diary_id: DbId) -> AppResult<()> {
        if !DiaryRepo::delete(&self.pool, diary_id).await? {
            return Err(diary_not_found(diary_id));
        }
        tracing::info!(diary_id, "Diary deleted");
        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: DbId) -> AppResult<()> {
        let lookup = self.clients.users.get_user_info(user_id).await;
        self.check_existence(ENTITY_USER, user_id, &lookup)
    }

    async fn ensure_pet_exists(&self, pet_id: DbId) -> AppResult<()> {
        let lookup = self.clients.pets.get_pet_info(pet_id).await;
        self.check_existence(ENTITY_PET, pet_id, &lookup)
    }

    fn check_existence<T>(
        &self,
        entity: &'static str,
        id: DbId,
        lookup: &Lookup<T>,
    ) -> AppResult<()> {
        let admitted = self.policy.admits(lookup);
        if let Lookup::Indeterminate(cause) = lookup {
            if admitted {
                tracing::warn!(entity, id, %cause, "Existence check inconclusive, proceeding");
            } else {
                tracing::warn!(entity, id, %cause, "Existence check inconclusive, rejecting");
            }
        }

        if admitted {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity, id }.into())
        }
    }

    /// Turn a draft into a row to insert, calling the generator if needed.
    async fn resolve_content(&self, draft: DiaryDraft) -> AppResult<CreateDiary> {
        let DiaryDraft {
            user_id,
            pet_id,
            visibility,
            weather,
            source,
        } = draft;

        let (content, mood, is_ai_gen, images) = match source {
            ContentSource::Supplied {
                content,
                mood,
                is_ai_gen,
                images,
            } => (
                content.and_then(empty_to_none),
                mood.and_then(empty_to_none),
                is_ai_gen,
                images,
            ),
            ContentSource::Generated { image_url } => {
                let generated = self
                    .clients
                    .generator
                    .generate(&image_url)
                    .await
                    .map_err(AppError::Generation)?;
                let image = CreateDiaryImage {
                    image_url,
                    img_order: GENERATED_IMAGE_ORDER,
                    main_image: true,
                    source: SOURCE_GALLERY.to_string(),
                };
                (
                    empty_to_none(generated.content),
                    empty_to_none(generated.mood),
                    Some(true),
                    vec![image],
                )
            }
        };

        Ok(CreateDiary {
            user_id,
            pet_id,
            content,
            visibility,
            is_ai_gen,
            weather: weather.and_then(empty_to_none),
            mood,
            images,
        })
    }
}

fn diary_not_found(id: DbId) -> AppError {
    CoreError::NotFound {
        entity: ENTITY_DIARY,
        id,
    }
    .into()
}
