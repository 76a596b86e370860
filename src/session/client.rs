//! HTTP client for the control-plane auth endpoints

use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::api;
use crate::context::Edition;
use crate::error::{Result, SbError};

use super::models::{
    IssuedToken, LoginPayload, OssLoginResponse, RefreshPayload, RefreshResponse,
    RegisterPayload, SaasTokenResponse,
};

/// Auth API client. Endpoints are passed per call since each context may
/// point at a different server.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthClient {
    /// Create a client with bounded timeouts so a hung server cannot wedge the CLI
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(api::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn url(endpoint: &str, path: &str) -> String {
        format!("{}{}", endpoint.trim_end_matches('/'), path)
    }

    /// Probe the registration endpoint: 404 means OSS, anything else SaaS
    pub async fn detect_edition(&self, endpoint: &str) -> Result<Edition> {
        let url = Self::url(endpoint, api::REGISTRATION);
        debug!("Probing server edition: POST {}", url);

        let response = self.client.post(&url).send().await?;
        let edition = if response.status() == StatusCode::NOT_FOUND {
            Edition::Oss
        } else {
            Edition::Saas
        };

        debug!(
            "Edition probe returned {} -> {}",
            response.status().as_u16(),
            edition
        );
        Ok(edition)
    }

    /// Exchange username/password for tokens at the edition's login endpoint
    pub async fn obtain_token(
        &self,
        endpoint: &str,
        edition: Edition,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken> {
        let path = match edition {
            Edition::Oss => api::OSS_LOGIN,
            Edition::Saas => api::SAAS_TOKEN,
        };
        let url = Self::url(endpoint, path);
        debug!("Logging in as '{}': POST {}", username, url);

        let response = self
            .client
            .post(&url)
            .json(&LoginPayload { username, password })
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;

        match edition {
            Edition::Oss => {
                let body: OssLoginResponse = Self::parse(response).await?;
                Ok(IssuedToken {
                    access: body.key,
                    refresh: None,
                })
            }
            Edition::Saas => {
                let body: SaasTokenResponse = Self::parse(response).await?;
                Ok(IssuedToken {
                    access: body.access,
                    refresh: Some(body.refresh),
                })
            }
        }
    }

    /// Trade a refresh token for a new access token (SaaS)
    pub async fn refresh_access_token(
        &self,
        endpoint: &str,
        refresh_token: &str,
    ) -> Result<IssuedToken> {
        let url = Self::url(endpoint, api::SAAS_TOKEN_REFRESH);
        debug!("Refreshing access token: POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&RefreshPayload {
                refresh: refresh_token,
            })
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;
        let body: RefreshResponse = Self::parse(response).await?;

        Ok(IssuedToken {
            access: body.access,
            refresh: body.refresh.filter(|r| !r.is_empty()),
        })
    }

    /// Create an account on the server
    pub async fn register(&self, endpoint: &str, email: &str, password: &str) -> Result<()> {
        let url = Self::url(endpoint, api::REGISTER);
        debug!("Registering '{}': POST {}", email, url);

        let response = self
            .client
            .post(&url)
            .json(&RegisterPayload {
                email,
                password1: password,
                password2: password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = Self::error_message(response).await;
            return Err(SbError::Auth { status, message });
        }
        Ok(())
    }

    /// Only HTTP 200 counts as a successful token exchange
    async fn expect_ok(response: Response) -> Result<Response> {
        if response.status() == StatusCode::OK {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = Self::error_message(response).await;
        Err(SbError::Auth { status, message })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Server-provided reason (`detail` / `non_field_errors`) or the status text
    async fn error_message(response: Response) -> String {
        let status = response.status();
        let fallback = status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string();

        let Ok(text) = response.text().await else {
            return fallback;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            return fallback;
        };

        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
        if let Some(first) = value
            .get("non_field_errors")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
            .and_then(|e| e.as_str())
        {
            return first.to_string();
        }
        fallback
    }
}
