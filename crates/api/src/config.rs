use std::time::Duration;

use petlog_core::lookup::ExistencePolicy;

use crate::diary::forwarding::DEFAULT_CLAIM_LEASE;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Sibling service endpoints and lookup behaviour.
    pub services: ServiceConfig,
    /// Archive redelivery worker settings.
    pub archive_retry: ArchiveRetryConfig,
}

/// Where the remote collaborators live and how to talk to them.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub user_service_url: String,
    pub pet_service_url: String,
    pub storage_service_url: String,
    /// Per-request timeout for directory and storage calls.
    pub client_timeout_secs: u64,
    /// What an indeterminate user/pet lookup means.
    pub existence_policy: ExistencePolicy,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    /// Per-request timeout for content generation, which is much slower
    /// than the directory lookups.
    pub openai_timeout_secs: u64,
}

/// Settings for the archive redelivery worker.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveRetryConfig {
    pub interval: Duration,
    /// Rows that failed this many times are left for manual inspection.
    pub max_attempts: i32,
    /// How long a sender may hold outbox rows before they can be reclaimed.
    /// Must exceed the storage client timeout.
    pub claim_lease: Duration,
}

impl Default for ArchiveRetryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: 5,
            claim_lease: DEFAULT_CLAIM_LEASE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                                      |
    /// |-------------------------------|----------------------------------------------|
    /// | `HOST`                        | `0.0.0.0`                                    |
    /// | `PORT`                        | `8080`                                       |
    /// | `CORS_ORIGINS`                | `http://localhost:3000`                      |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                                         |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                                         |
    /// | `USER_SERVICE_URL`            | `http://localhost:8081`                      |
    /// | `PET_SERVICE_URL`             | `http://localhost:8082`                      |
    /// | `STORAGE_SERVICE_URL`         | `http://localhost:8083`                      |
    /// | `CLIENT_TIMEOUT_SECS`         | `10`                                         |
    /// | `LOOKUP_FAIL_OPEN`            | `false`                                      |
    /// | `OPENAI_API_KEY`              | empty                                        |
    /// | `OPENAI_API_URL`              | `https://api.openai.com/v1/chat/completions` |
    /// | `OPENAI_MODEL`                | `gpt-4o`                                     |
    /// | `OPENAI_TIMEOUT_SECS`         | `60`                                         |
    /// | `ARCHIVE_RETRY_INTERVAL_SECS` | `60` (must be non-zero)                      |
    /// | `ARCHIVE_MAX_ATTEMPTS`        | `5` (must be positive)                       |
    /// | `ARCHIVE_CLAIM_LEASE_SECS`    | `300` (must be non-zero)                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            services: ServiceConfig::from_env(),
            archive_retry: ArchiveRetryConfig::from_env(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let client_timeout_secs: u64 = std::env::var("CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("CLIENT_TIMEOUT_SECS must be a valid u64");

        let openai_timeout_secs: u64 = std::env::var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("OPENAI_TIMEOUT_SECS must be a valid u64");

        let fail_open = std::env::var("LOOKUP_FAIL_OPEN")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            user_service_url: std::env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".into()),
            pet_service_url: std::env::var("PET_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8082".into()),
            storage_service_url: std::env::var("STORAGE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".into()),
            client_timeout_secs,
            existence_policy: if fail_open {
                ExistencePolicy::FailOpen
            } else {
                ExistencePolicy::FailClosed
            },
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| petlog_clients::content::DEFAULT_ENDPOINT.into()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| petlog_clients::content::DEFAULT_MODEL.into()),
            openai_timeout_secs,
        }
    }
}

impl ArchiveRetryConfig {
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("ARCHIVE_RETRY_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("ARCHIVE_RETRY_INTERVAL_SECS must be a valid u64");

        let max_attempts: i32 = std::env::var("ARCHIVE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("ARCHIVE_MAX_ATTEMPTS must be a valid i32");

        let claim_lease_secs: u64 = std::env::var("ARCHIVE_CLAIM_LEASE_SECS")
            .unwrap_or_else(|_| DEFAULT_CLAIM_LEASE.as_secs().to_string())
            .parse()
            .expect("ARCHIVE_CLAIM_LEASE_SECS must be a valid u64");

        Self::new(interval_secs, max_attempts, claim_lease_secs)
            .expect("Invalid archive redelivery configuration")
    }

    /// Build and check the worker settings.
    pub fn new(interval_secs: u64, max_attempts: i32, claim_lease_secs: u64) -> Result<Self, String> {
        if interval_secs == 0 {
            return Err("ARCHIVE_RETRY_INTERVAL_SECS must be greater than zero".into());
        }
        if max_attempts < 1 {
            return Err("ARCHIVE_MAX_ATTEMPTS must be at least 1".into());
        }
        if claim_lease_secs == 0 {
            return Err("ARCHIVE_CLAIM_LEASE_SECS must be greater than zero".into());
        }
        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            max_attempts,
            claim_lease: Duration::from_secs(claim_lease_secs),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
