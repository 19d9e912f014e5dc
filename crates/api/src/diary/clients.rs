//! Construction of the HTTP-backed remote clients.

use std::sync::Arc;
use std::time::Duration;

use petlog_clients::content::OpenAiConfig;
use petlog_clients::{HttpPetDirectory, HttpPhotoArchive, HttpUserDirectory, OpenAiContentGenerator};

use crate::config::ServiceConfig;
use crate::diary::DiaryClients;

/// Build the production clients.
///
/// Directory and storage calls share one connection pool with
/// `client_timeout_secs`; the content generator gets its own pool with
/// `openai_timeout_secs`.
pub fn build_http_clients(services: &ServiceConfig) -> Result<DiaryClients, reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(services.client_timeout_secs))
        .build()?;
    let generation_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(services.openai_timeout_secs))
        .build()?;

    let openai = OpenAiConfig::new(services.openai_api_key.clone())
        .with_endpoint(services.openai_api_url.clone())
        .with_model(services.openai_model.clone());

    Ok(DiaryClients {
        users: Arc::new(HttpUserDirectory::new(
            http.clone(),
            services.user_service_url.clone(),
        )),
        pets: Arc::new(HttpPetDirectory::new(
            http.clone(),
            services.pet_service_url.clone(),
        )),
        archive: Arc::new(HttpPhotoArchive::new(http, services.storage_service_url.clone())),
        generator: Arc::new(OpenAiContentGenerator::new(generation_http, openai)),
    })
}
