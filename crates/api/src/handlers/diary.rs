//! Handlers for the `/diaries` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use petlog_core::error::CoreError;
use petlog_core::types::DbId;
use petlog_db::models::diary::{CreateDiaryImage, DiaryWithImages, UpdateDiary};
use serde::Deserialize;
use validator::Validate;

use crate::diary::{ContentSource, DiaryDraft};
use crate::error::{AppError, AppResult};
use crate::response::DiaryCreatedResponse;
use crate::state::AppState;

/// Body of `POST /api/diaries`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaryRequest {
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<DbId>,
    #[validate(required(message = "petId is required"))]
    pub pet_id: Option<DbId>,
    pub content: Option<String>,
    pub visibility: Option<String>,
    pub is_ai_gen: Option<bool>,
    pub weather: Option<String>,
    pub mood: Option<String>,
    #[serde(default)]
    pub images: Vec<CreateDiaryImage>,
}

/// Body of `POST /api/diaries/ai`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAiDiaryRequest {
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<DbId>,
    #[validate(required(message = "petId is required"))]
    pub pet_id: Option<DbId>,
    pub visibility: Option<String>,
    #[validate(
        required(message = "imageUrl is required"),
        length(min = 1, message = "imageUrl must not be empty")
    )]
    pub image_url: Option<String>,
}

type Created = (StatusCode, HeaderMap, Json<DiaryCreatedResponse>);

/// POST /api/diaries
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateDiaryRequest>, JsonRejection>,
) -> AppResult<Created> {
    let Json(input) = payload?;
    validate_request(&input)?;
    let (user_id, pet_id) = required_ids(input.user_id, input.pet_id)?;

    let draft = DiaryDraft {
        user_id,
        pet_id,
        visibility: input.visibility,
        weather: input.weather,
        source: ContentSource::Supplied {
            content: input.content,
            mood: input.mood,
            is_ai_gen: input.is_ai_gen,
            images: input.images,
        },
    };
    let diary_id = state.diaries.create_diary(draft).await?;
    created(diary_id)
}

/// POST /api/diaries/ai
pub async fn create_ai(
    State(state): State<AppState>,
    payload: Result<Json<CreateAiDiaryRequest>, JsonRejection>,
) -> AppResult<Created> {
    let Json(input) = payload?;
    validate_request(&input)?;
    let (user_id, pet_id) = required_ids(input.user_id, input.pet_id)?;
    let image_url = input
        .image_url
        .ok_or_else(|| CoreError::Validation("imageUrl is required".into()))?;

    let draft = DiaryDraft {
        user_id,
        pet_id,
        visibility: input.visibility,
        weather: None,
        source: ContentSource::Generated { image_url },
    };
    let diary_id = state.diaries.create_diary(draft).await?;
    created(diary_id)
}

/// GET /api/diaries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DiaryWithImages>> {
    let diary = state.diaries.get_diary(id).await?;
    Ok(Json(diary))
}

/// PATCH /api/diaries/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateDiary>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(input) = payload?;
    state.diaries.update_diary(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/diaries/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.diaries.delete_diary(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_request(input: &impl Validate) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}

fn required_ids(user_id: Option<DbId>, pet_id: Option<DbId>) -> Result<(DbId, DbId), AppError> {
    match (user_id, pet_id) {
        (Some(user_id), Some(pet_id)) => Ok((user_id, pet_id)),
        (None, _) => Err(CoreError::Validation("userId is required".into()).into()),
        (_, None) => Err(CoreError::Validation("petId is required".into()).into()),
    }
}

fn created(diary_id: DbId) -> AppResult<Created> {
    let location = HeaderValue::from_str(&format!("/api/diaries/{diary_id}"))
        .map_err(|e| AppError::InternalError(format!("invalid Location header: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);
    Ok((
        StatusCode::CREATED,
        headers,
        Json(DiaryCreatedResponse::new(diary_id)),
    ))
}
