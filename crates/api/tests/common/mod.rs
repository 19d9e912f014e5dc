#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use petlog_clients::mock::{FixedContentGenerator, FixedDirectory, RecordingPhotoArchive};
use petlog_clients::ContentGenerator;
use petlog_core::lookup::ExistencePolicy;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use petlog_api::config::{ArchiveRetryConfig, ServerConfig, ServiceConfig};
use petlog_api::diary::{DiaryClients, DiaryOrchestrator};
use petlog_api::routes;
use petlog_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Service URLs are never dialled; tests inject fixed-response clients.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        services: ServiceConfig {
            user_service_url: "http://127.0.0.1:1".to_string(),
            pet_service_url: "http://127.0.0.1:1".to_string(),
            storage_service_url: "http://127.0.0.1:1".to_string(),
            client_timeout_secs: 1,
            existence_policy: ExistencePolicy::FailClosed,
            openai_api_key: String::new(),
            openai_api_url: "http://127.0.0.1:1".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_timeout_secs: 5,
        },
        archive_retry: ArchiveRetryConfig::default(),
    }
}

/// Stand-ins for the remote services, kept so tests can inspect the calls.
pub struct TestServices {
    pub users: Arc<FixedDirectory>,
    pub pets: Arc<FixedDirectory>,
    pub archive: Arc<RecordingPhotoArchive>,
    pub generator: Arc<dyn ContentGenerator>,
    pub policy: ExistencePolicy,
}

impl Default for TestServices {
    fn default() -> Self {
        Self {
            users: Arc::new(FixedDirectory::found()),
            pets: Arc::new(FixedDirectory::found()),
            archive: Arc::new(RecordingPhotoArchive::new()),
            generator: Arc::new(FixedContentGenerator::new("I chased a ball", "joyful")),
            policy: ExistencePolicy::FailClosed,
        }
    }
}

impl TestServices {
    pub fn clients(&self) -> DiaryClients {
        DiaryClients {
            users: self.users.clone(),
            pets: self.pets.clone(),
            archive: self.archive.clone(),
            generator: Arc::clone(&self.generator),
        }
    }
}

/// Build the full application router with every remote service found and
/// accepting.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, &TestServices::default())
}

/// Build the full application router with all middleware layers, using the
/// given database pool and remote stand-ins.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app_with(pool: PgPool, services: &TestServices) -> Router {
    let mut config = test_config();
    config.services.existence_policy = services.policy;

    let diaries = Arc::new(DiaryOrchestrator::new(
        pool.clone(),
        services.clients(),
        services.policy,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        diaries,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([LOCATION])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Number of rows in `diaries`.
pub async fn diary_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM diaries")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PATCH, uri, body).await
}

async fn json_request(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
