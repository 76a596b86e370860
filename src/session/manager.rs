//! Login, token refresh and logout against a context's server

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

use crate::config::session as ttl;
use crate::context::{normalize_server_url, ConfigStore, Context, ContextRegistry, Edition};
use crate::error::{Result, SbError};

use super::client::AuthClient;
use super::models::{IssuedToken, LoginRequest};

/// Result of [`SessionManager::logout`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Nothing was stored
    NoContexts,
    /// Contexts exist but none is current
    NoCurrentContext,
    /// The current context was removed; `remaining` contexts are left
    /// and none of them is current
    LoggedOut { key: String, remaining: usize },
}

/// Drives the token lifecycle for contexts persisted in a [`ConfigStore`]
pub struct SessionManager<'a> {
    store: &'a ConfigStore,
    client: AuthClient,
}

impl<'a> SessionManager<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self::with_client(store, AuthClient::new())
    }

    pub fn with_client(store: &'a ConfigStore, client: AuthClient) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// Edition of the server at `server_url` (scheme optional)
    pub async fn detect_edition(&self, server_url: &str) -> Result<Edition> {
        let endpoint = normalize_server_url(server_url)?;
        self.client.detect_edition(&endpoint).await
    }

    /// Authenticate and store the resulting context as current.
    ///
    /// Logging in again to the same server overwrites its tokens and keeps
    /// its cluster/project scope. Nothing is written when the server rejects
    /// the credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<(String, Context)> {
        let endpoint = normalize_server_url(&request.server)?;
        let mut registry = ContextRegistry::new(self.store.load()?);

        let edition = self.client.detect_edition(&endpoint).await?;
        let issued = self
            .client
            .obtain_token(&endpoint, edition, &request.username, &request.password)
            .await?;
        if issued.access.is_empty() {
            return Err(SbError::Auth {
                status: 200,
                message: "server returned an empty token".to_string(),
            });
        }

        let mut context = build_context(&endpoint, edition, issued, Utc::now());
        if let Ok(existing) = registry.get(&endpoint) {
            context.scope = existing.scope.clone();
        }

        registry.upsert(&endpoint, context.clone())?;
        registry.set_current(&endpoint)?;
        self.store.save(registry.document())?;

        info!(
            "Logged in to {} ({}) as {}",
            endpoint, edition, request.username
        );
        Ok((endpoint, context))
    }

    /// Return a context whose access token is usable now.
    ///
    /// Unexpired contexts are returned as-is without any network call. An
    /// expired context without a refresh token, or whose refresh is rejected,
    /// yields [`SbError::LoginRequired`].
    pub async fn refresh(&self, key: &str, context: &Context) -> Result<Context> {
        let now = Utc::now();
        if !context.is_expired_at(now) {
            debug!("Token for '{}' still valid, no refresh needed", key);
            return Ok(context.clone());
        }

        let Some(refresh_token) = context.refresh_token() else {
            return Err(SbError::LoginRequired(format!(
                "access token for '{}' has expired and no refresh token is stored",
                key
            )));
        };

        debug!("Token for '{}' expired, refreshing", key);
        let issued = match self
            .client
            .refresh_access_token(&context.endpoint, refresh_token)
            .await
        {
            Ok(issued) => issued,
            Err(SbError::Auth { status, message }) => {
                warn!(
                    "Refresh for '{}' rejected (status {}): {}",
                    key, status, message
                );
                return Err(SbError::LoginRequired(format!(
                    "session for '{}' has expired",
                    key
                )));
            }
            Err(e) => return Err(e),
        };

        let now = Utc::now();
        let mut updated = context.clone();
        updated.token = issued.access;
        if let Some(rotated) = issued.refresh {
            updated.refresh_token = Some(rotated);
        }
        updated.issued_at = Some(now);
        updated.expires_at = Some(expiry_for(context.edition, now));

        let mut registry = ContextRegistry::new(self.store.load()?);
        registry.upsert(key, updated.clone())?;
        self.store.save(registry.document())?;

        info!("Refreshed access token for '{}'", key);
        Ok(updated)
    }

    /// Create an account; returns the normalized server URL
    pub async fn register(&self, server_url: &str, email: &str, password: &str) -> Result<String> {
        let endpoint = normalize_server_url(server_url)?;
        self.client.register(&endpoint, email, password).await?;
        info!("Registered {} at {}", email, endpoint);
        Ok(endpoint)
    }

    /// Forget the current context. With a single context the whole document
    /// is cleared; otherwise the current one is removed and none is selected.
    pub fn logout(&self) -> Result<LogoutOutcome> {
        let mut registry = ContextRegistry::new(self.store.load()?);

        let outcome = match registry.len() {
            0 => return Ok(LogoutOutcome::NoContexts),
            1 => {
                let key = registry
                    .list()
                    .into_iter()
                    .next()
                    .map(|e| e.key)
                    .unwrap_or_default();
                registry.clear();
                LogoutOutcome::LoggedOut { key, remaining: 0 }
            }
            _ => {
                let Some(key) = registry.current_name().map(str::to_string) else {
                    return Ok(LogoutOutcome::NoCurrentContext);
                };
                registry.remove(&key)?;
                LogoutOutcome::LoggedOut {
                    key,
                    remaining: registry.len(),
                }
            }
        };

        self.store.save(registry.document())?;
        debug!("Logout: {:?}", outcome);
        Ok(outcome)
    }
}

fn expiry_for(edition: Edition, issued_at: DateTime<Utc>) -> DateTime<Utc> {
    match edition {
        Edition::Oss => issued_at + Duration::days(ttl::OSS_TOKEN_TTL_DAYS),
        Edition::Saas => issued_at + Duration::minutes(ttl::SAAS_ACCESS_TOKEN_TTL_MINUTES),
    }
}

fn build_context(
    endpoint: &str,
    edition: Edition,
    issued: IssuedToken,
    now: DateTime<Utc>,
) -> Context {
    Context {
        endpoint: endpoint.to_string(),
        edition,
        token: issued.access,
        refresh_token: match edition {
            Edition::Oss => None,
            Edition::Saas => issued.refresh,
        },
        issued_at: Some(now),
        expires_at: Some(expiry_for(edition, now)),
        scope: None,
    }
}
