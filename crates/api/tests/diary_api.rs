//! End-to-end tests for the `/api/diaries` resource.
//!
//! The router runs against a real database with fixed-response stand-ins for
//! the user, pet, storage and generator services.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, delete, diary_count, get, patch_json, post_json, send, TestServices};
use petlog_api::background::archive_redelivery::{redeliver_pending, PassOutcome};
use petlog_api::config::ArchiveRetryConfig;
use petlog_api::diary::{ContentSource, DiaryClients, DiaryDraft, DiaryOrchestrator};
use petlog_clients::mock::{FailingContentGenerator, FixedContentGenerator, FixedDirectory, RecordingPhotoArchive};
use petlog_clients::{PhotoArchive, StorageError};
use petlog_core::diary::PhotoArchiveEntry;
use petlog_core::lookup::ExistencePolicy;
use petlog_db::models::diary::CreateDiaryImage;
use petlog_db::repositories::ArchiveOutboxRepo;
use serde_json::json;
use sqlx::PgPool;

fn retry(max_attempts: i32) -> ArchiveRetryConfig {
    ArchiveRetryConfig {
        max_attempts,
        ..Default::default()
    }
}

fn walk_diary() -> serde_json::Value {
    json!({
        "userId": 1,
        "petId": 1,
        "content": "walk",
        "images": [
            { "imageUrl": "a.jpg", "imgOrder": 1, "mainImage": true, "source": "GALLERY" }
        ]
    })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_persists_diary_and_forwards_gallery_image(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app.clone(), "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();
    let json = body_json(response).await;
    let id = json["diaryId"].as_i64().unwrap();
    assert_eq!(location, format!("/api/diaries/{id}"));
    assert!(json["message"].is_string());

    let response = get(app, &location).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["diaryId"], id);
    assert_eq!(json["userId"], 1);
    assert_eq!(json["petId"], 1);
    assert_eq!(json["content"], "walk");
    assert_eq!(json["visibility"], "PRIVATE");
    assert_eq!(json["isAiGen"], false);
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["imageUrl"], "a.jpg");
    assert_eq!(images[0]["source"], "GALLERY");
    assert_eq!(images[0]["mainImage"], true);

    assert_eq!(
        services.archive.batches(),
        vec![vec![PhotoArchiveEntry {
            user_id: 1,
            image_url: "a.jpg".into(),
        }]]
    );
    let outbox = ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0].delivered_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_and_pet_are_checked_in_order(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool, &services);

    let response = post_json(app, "/api/diaries", json!({"userId": 7, "petId": 9})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(services.users.calls(), vec![7]);
    assert_eq!(services.pets.calls(), vec![9]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_images_are_never_forwarded(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool.clone(), &services);

    let body = json!({
        "userId": 1,
        "petId": 1,
        "images": [
            { "imageUrl": "old.jpg", "imgOrder": 1, "mainImage": true, "source": "ARCHIVE" },
            { "imageUrl": "new.jpg", "imgOrder": 2, "mainImage": false, "source": "GALLERY" },
            { "imageUrl": "older.jpg", "imgOrder": 3, "mainImage": false, "source": "ARCHIVE" }
        ]
    });
    let response = post_json(app, "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(
        services.archive.batches(),
        vec![vec![PhotoArchiveEntry {
            user_id: 1,
            image_url: "new.jpg".into(),
        }]]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_only_diary_makes_no_forward_call(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool, &services);

    let body = json!({
        "userId": 1,
        "petId": 1,
        "images": [{ "imageUrl": "old.jpg", "imgOrder": 1, "mainImage": true, "source": "ARCHIVE" }]
    });
    let response = post_json(app, "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(services.archive.batches().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_pet_is_rejected_before_persisting(pool: PgPool) {
    let services = TestServices {
        pets: Arc::new(FixedDirectory::absent()),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PET_NOT_FOUND");
    assert_eq!(json["error"], "Pet with id 1 not found");

    assert_eq!(diary_count(&pool).await, 0);
    assert!(services.archive.batches().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_user_is_rejected_without_pet_lookup(pool: PgPool) {
    let services = TestServices {
        users: Arc::new(FixedDirectory::found().with_missing(&[1])),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "USER_NOT_FOUND");

    assert!(services.pets.calls().is_empty());
    assert_eq!(diary_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn indeterminate_lookup_fails_closed_by_default(pool: PgPool) {
    let services = TestServices {
        users: Arc::new(FixedDirectory::indeterminate("connection refused")),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "USER_NOT_FOUND");
    assert_eq!(diary_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn indeterminate_lookup_proceeds_when_fail_open(pool: PgPool) {
    let services = TestServices {
        users: Arc::new(FixedDirectory::indeterminate("timeout")),
        pets: Arc::new(FixedDirectory::indeterminate("timeout")),
        policy: ExistencePolicy::FailOpen,
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(diary_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fail_open_still_rejects_confirmed_absence(pool: PgPool) {
    let services = TestServices {
        pets: Arc::new(FixedDirectory::absent()),
        policy: ExistencePolicy::FailOpen,
        ..Default::default()
    };
    let app = common::build_test_app_with(pool, &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "PET_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failing_archive_does_not_fail_creation(pool: PgPool) {
    let services = TestServices {
        archive: Arc::new(RecordingPhotoArchive::failing()),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app.clone(), "/api/diaries", walk_diary()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["diaryId"].as_i64().unwrap();

    let response = get(app, &format!("/api/diaries/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let outbox = ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0].delivered_at.is_none());
    assert_eq!(outbox[0].attempts, 1);
    assert!(outbox[0].last_error.is_some());

    // The redelivery worker picks the row up once storage recovers.
    services.archive.set_failing(false);
    let outcome = redeliver_pending(&pool, services.archive.as_ref(), &retry(5))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PassOutcome {
            delivered: 1,
            failed: 0
        }
    );
    assert_eq!(services.archive.batches().len(), 2);

    let outbox = ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap();
    assert!(outbox[0].delivered_at.is_some());

    let outcome = redeliver_pending(&pool, services.archive.as_ref(), &retry(5))
        .await
        .unwrap();
    assert_eq!(outcome, PassOutcome::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivery_stops_at_attempt_limit(pool: PgPool) {
    let services = TestServices {
        archive: Arc::new(RecordingPhotoArchive::failing()),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_json(app, "/api/diaries", walk_diary()).await;
    let id = body_json(response).await["diaryId"].as_i64().unwrap();

    let outcome = redeliver_pending(&pool, services.archive.as_ref(), &retry(2))
        .await
        .unwrap();
    assert_eq!(outcome.failed, 1);

    let outcome = redeliver_pending(&pool, services.archive.as_ref(), &retry(2))
        .await
        .unwrap();
    assert_eq!(outcome, PassOutcome::default());

    let outbox = ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap();
    assert_eq!(outbox[0].attempts, 2);
    assert!(outbox[0].delivered_at.is_none());
}

/// Records batches like [`RecordingPhotoArchive`] but takes a while to answer.
struct SlowPhotoArchive {
    inner: RecordingPhotoArchive,
    delay: Duration,
}

#[async_trait]
impl PhotoArchive for SlowPhotoArchive {
    async fn save_photos(&self, entries: &[PhotoArchiveEntry]) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.save_photos(entries).await
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivery_skips_rows_held_by_in_flight_forward(pool: PgPool) {
    let archive = Arc::new(SlowPhotoArchive {
        inner: RecordingPhotoArchive::new(),
        delay: Duration::from_millis(500),
    });
    let clients = DiaryClients {
        users: Arc::new(FixedDirectory::found()),
        pets: Arc::new(FixedDirectory::found()),
        archive: archive.clone(),
        generator: Arc::new(FixedContentGenerator::new("x", "y")),
    };
    let orchestrator = Arc::new(DiaryOrchestrator::new(
        pool.clone(),
        clients,
        ExistencePolicy::FailClosed,
    ));

    let draft = DiaryDraft {
        user_id: 1,
        pet_id: 1,
        visibility: None,
        weather: None,
        source: ContentSource::Supplied {
            content: Some("walk".into()),
            mood: None,
            is_ai_gen: None,
            images: vec![CreateDiaryImage {
                image_url: "a.jpg".into(),
                img_order: 1,
                main_image: true,
                source: "GALLERY".into(),
            }],
        },
    };
    let create = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.create_diary(draft).await }
    });

    // The immediate forward is still waiting on the archive here.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let outcome = redeliver_pending(&pool, archive.as_ref(), &retry(5))
        .await
        .unwrap();
    assert_eq!(outcome, PassOutcome::default());

    let id = create.await.unwrap().unwrap();
    assert_eq!(archive.inner.batches().len(), 1);

    let outbox = ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0].delivered_at.is_some());
    assert!(outbox[0].claimed_until.is_none());
    assert_eq!(outbox[0].attempts, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_strings_on_create_are_stored_as_null(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({"userId": 1, "petId": 1, "content": "", "weather": "", "mood": ""});
    let response = post_json(app.clone(), "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["diaryId"].as_i64().unwrap();

    let json = body_json(get(app, &format!("/api/diaries/{id}")).await).await;
    assert!(json["content"].is_null());
    assert!(json["weather"].is_null());
    assert!(json["mood"].is_null());
}

async fn post_raw(app: axum::Router, uri: &str, body: &'static str) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_is_bad_request(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool.clone(), &services);

    let response = post_raw(app.clone(), "/api/diaries", "{").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());

    let response = post_raw(app, "/api/diaries/ai", r#"{"userId": "one", "petId": 1, "imageUrl": "a.jpg"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    assert!(services.users.calls().is_empty());
    assert_eq!(diary_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_user_id_is_validation_error(pool: PgPool) {
    let services = TestServices::default();
    let app = common::build_test_app_with(pool, &services);

    let response = post_json(app, "/api/diaries", json!({"petId": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(services.users.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_visibility_is_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({"userId": 1, "petId": 1, "visibility": "EVERYONE"});
    let response = post_json(app, "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_image_source_is_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = json!({
        "userId": 1,
        "petId": 1,
        "images": [{ "imageUrl": "a.jpg", "imgOrder": 1, "mainImage": true, "source": "CAMERA" }]
    });
    let response = post_json(app, "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(diary_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// AI create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_create_stores_generated_content(pool: PgPool) {
    let generator = Arc::new(FixedContentGenerator::new("I napped in the sun", "sleepy"));
    let services = TestServices {
        generator: generator.clone(),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool, &services);

    let body = json!({"userId": 3, "petId": 4, "visibility": "PUBLIC", "imageUrl": "https://img/sun.jpg"});
    let response = post_json(app.clone(), "/api/diaries/ai", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["diaryId"].as_i64().unwrap();

    assert_eq!(generator.calls(), vec!["https://img/sun.jpg".to_string()]);
    assert_eq!(services.users.calls(), vec![3]);
    assert_eq!(services.pets.calls(), vec![4]);

    let json = body_json(get(app, &format!("/api/diaries/{id}")).await).await;
    assert_eq!(json["isAiGen"], true);
    assert_eq!(json["content"], "I napped in the sun");
    assert_eq!(json["mood"], "sleepy");
    assert_eq!(json["visibility"], "PUBLIC");
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["imageUrl"], "https://img/sun.jpg");
    assert_eq!(images[0]["imgOrder"], 1);
    assert_eq!(images[0]["mainImage"], true);
    assert_eq!(images[0]["source"], "GALLERY");

    assert_eq!(
        services.archive.batches(),
        vec![vec![PhotoArchiveEntry {
            user_id: 3,
            image_url: "https://img/sun.jpg".into(),
        }]]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_create_checks_pet_before_generating(pool: PgPool) {
    let generator = Arc::new(FixedContentGenerator::new("x", "y"));
    let services = TestServices {
        pets: Arc::new(FixedDirectory::absent()),
        generator: generator.clone(),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool, &services);

    let body = json!({"userId": 1, "petId": 2, "imageUrl": "a.jpg"});
    let response = post_json(app, "/api/diaries/ai", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(generator.calls().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_generation_failure_is_bad_gateway(pool: PgPool) {
    let services = TestServices {
        generator: Arc::new(FailingContentGenerator::api_error()),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool.clone(), &services);

    let body = json!({"userId": 1, "petId": 1, "imageUrl": "a.jpg"});
    let response = post_json(app, "/api/diaries/ai", body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GENERATION_FAILED");
    assert_eq!(diary_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_parse_failure_has_its_own_code(pool: PgPool) {
    let services = TestServices {
        generator: Arc::new(FailingContentGenerator::parse_error()),
        ..Default::default()
    };
    let app = common::build_test_app_with(pool, &services);

    let body = json!({"userId": 1, "petId": 1, "imageUrl": "a.jpg"});
    let response = post_json(app, "/api/diaries/ai", body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GENERATION_PARSE_FAILED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_create_requires_image_url(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/diaries/ai", json!({"userId": 1, "petId": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

async fn create_full_diary(app: axum::Router) -> i64 {
    let body = json!({
        "userId": 1,
        "petId": 1,
        "content": "walk",
        "visibility": "SHARED",
        "weather": "sunny",
        "mood": "happy"
    });
    let response = post_json(app, "/api/diaries", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["diaryId"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_only_patch_keeps_other_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_full_diary(app.clone()).await;
    let uri = format!("/api/diaries/{id}");

    let response = patch_json(app.clone(), &uri, json!({"content": "long walk"})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["content"], "long walk");
    assert_eq!(json["visibility"], "SHARED");
    assert_eq!(json["weather"], "sunny");
    assert_eq!(json["mood"], "happy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_null_patch_is_a_no_op(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_full_diary(app.clone()).await;
    let uri = format!("/api/diaries/{id}");

    let body = json!({"content": null, "visibility": null, "weather": null, "mood": null});
    let response = patch_json(app.clone(), &uri, body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["content"], "walk");
    assert_eq!(json["visibility"], "SHARED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_string_clears_nullable_text(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_full_diary(app.clone()).await;
    let uri = format!("/api/diaries/{id}");

    let response = patch_json(app.clone(), &uri, json!({"weather": ""})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &uri).await).await;
    assert!(json["weather"].is_null());
    assert_eq!(json["mood"], "happy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_rejects_unknown_visibility(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_full_diary(app.clone()).await;

    let response = patch_json(app, &format!("/api/diaries/{id}"), json!({"visibility": "ALL"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Missing diary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_diary_is_not_found_everywhere(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = get(app.clone(), "/api/diaries/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DIARY_NOT_FOUND");
    assert_eq!(json["error"], "Diary with id 999 not found");

    let response = patch_json(app.clone(), "/api/diaries/999", json!({"content": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "DIARY_NOT_FOUND");

    let response = patch_json(app.clone(), "/api/diaries/999", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app, "/api/diaries/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "DIARY_NOT_FOUND");

    assert_eq!(diary_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_diary_images_and_outbox(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(app.clone(), "/api/diaries", walk_diary()).await;
    let id = body_json(response).await["diaryId"].as_i64().unwrap();
    let uri = format!("/api/diaries/{id}");

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ArchiveOutboxRepo::list_by_diary(&pool, id).await.unwrap().is_empty());

    let response = delete(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
