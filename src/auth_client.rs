use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api_client::{classify_error, ApiError};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_verified: bool,
}

/// Cookie-session client for the account endpoints. Token refresh and retry
/// live server-side behind these routes; this layer only classifies
/// failures so auth errors keep their message.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    client: Client,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .cookie_store(true)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response = self
            .client
            .post(format!("{}/users/login/", self.base_url))
            .json(credentials)
            .send()?;
        Ok(check(response)?.json()?)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/users/logout/", self.base_url))
            .send()?;
        check(response)?;
        Ok(())
    }

    pub fn current_user(&self) -> Result<User, ApiError> {
        debug!("fetching current user");
        let response = self
            .client
            .get(format!("{}/users/me/", self.base_url))
            .send()?;
        Ok(check(response)?.json()?)
    }

}

fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(classify_error(status, &body))
}
