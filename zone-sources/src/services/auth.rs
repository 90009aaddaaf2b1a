//! Login endpoint. Credential checking happens entirely server-side.

use serde::Serialize;

use crate::config::SourcesConfig;
use crate::error::{Result, SourceError};
use crate::http;
use crate::types::Identity;

const SERVICE: &str = "auth";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Client for the login endpoint.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client using `config.auth_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.auth_url)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(config: &SourcesConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.to_owned(),
        })
    }

    /// Exchange credentials for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Auth`] when the endpoint answers 401 or 403,
    /// otherwise a transport, status or parse error.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity> {
        let request = self
            .client
            .post(http::endpoint(&self.base_url, "login"))
            .json(&LoginRequest { username, password });

        match http::send_json(SERVICE, request).await {
            Err(SourceError::Status { status: 401 | 403, .. }) => Err(SourceError::Auth(
                "username or password was not accepted".into(),
            )),
            other => other,
        }
    }
}
