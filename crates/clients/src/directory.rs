//! User and pet directory clients.
//!
//! Both sibling services expose a detail endpoint and nothing else, so
//! existence is checked by fetching the detail record. The HTTP status is
//! mapped to a three-way [`Lookup`]: 2xx is `Found`, 404 is `Absent`, and
//! anything else (including transport failures) is `Indeterminate`.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use petlog_core::lookup::Lookup;
use petlog_core::types::DbId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Profile returned by the user service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub username: Option<String>,
    pub gender_type: Option<String>,
    pub age: Option<i32>,
    pub profile_image: Option<String>,
    pub status_message: Option<String>,
}

/// Pet record returned by the pet service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetail {
    pub pet_id: Option<DbId>,
    pub pet_name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender_type: Option<String>,
    #[serde(rename = "is_neutered", default)]
    pub is_neutered: bool,
    pub profile_image: Option<String>,
    pub age: Option<i32>,
    pub birth: Option<NaiveDateTime>,
    pub status: Option<String>,
}

/// Looks up users in the user service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_info(&self, user_id: DbId) -> Lookup<UserDetail>;
}

/// Looks up pets in the pet service.
#[async_trait]
pub trait PetDirectory: Send + Sync {
    async fn get_pet_info(&self, pet_id: DbId) -> Lookup<PetDetail>;
}

// ---------------------------------------------------------------------------
// HTTP implementations
// ---------------------------------------------------------------------------

/// `GET {base_url}/api/users/{id}`.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user_info(&self, user_id: DbId) -> Lookup<UserDetail> {
        let url = format!("{}/api/users/{user_id}", self.base_url);
        fetch_detail(&self.client, &url).await
    }
}

/// `GET {base_url}/api/pets/{id}`.
pub struct HttpPetDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPetDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl PetDirectory for HttpPetDirectory {
    async fn get_pet_info(&self, pet_id: DbId) -> Lookup<PetDetail> {
        let url = format!("{}/api/pets/{pet_id}", self.base_url);
        fetch_detail(&self.client, &url).await
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Fetch a detail record and classify the outcome.
async fn fetch_detail<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Lookup<T> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(url, error = %e, "Directory request failed");
            return Lookup::Indeterminate(format!("request failed: {e}"));
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Lookup::Absent;
    }
    if !status.is_success() {
        tracing::warn!(url, status = status.as_u16(), "Directory returned unexpected status");
        return Lookup::Indeterminate(format!("unexpected status {}", status.as_u16()));
    }

    match response.json::<T>().await {
        Ok(detail) => Lookup::Found(detail),
        Err(e) => {
            tracing::warn!(url, error = %e, "Directory response could not be decoded");
            Lookup::Indeterminate(format!("invalid response body: {e}"))
        }
    }
}
