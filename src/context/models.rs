//! Context configuration data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SbError};

/// Server variant, decides auth endpoints and the Authorization scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Self-hosted open-source server (`Token <t>` auth, no refresh)
    #[default]
    Oss,
    /// Hosted server (`Bearer <t>` auth, refreshable access tokens)
    Saas,
}

impl Edition {
    /// Scheme word used in the Authorization header
    pub fn auth_scheme(&self) -> &'static str {
        match self {
            Edition::Oss => "Token",
            Edition::Saas => "Bearer",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Oss => write!(f, "oss"),
            Edition::Saas => write!(f, "saas"),
        }
    }
}

/// Cluster/project selection used by project-scoped commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cluster_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cluster_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_name: Option<String>,
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        self.cluster_id.is_none()
            && self.cluster_name.is_none()
            && self.project_id.is_none()
            && self.project_name.is_none()
    }

    /// Short `cluster/project` label for listings
    pub fn label(&self) -> String {
        let cluster = self
            .cluster_name
            .as_deref()
            .or(self.cluster_id.as_deref())
            .unwrap_or("-");
        let project = self
            .project_name
            .as_deref()
            .or(self.project_id.as_deref())
            .unwrap_or("-");
        format!("{}/{}", cluster, project)
    }
}

/// One named credential bundle, keyed by server URL in [`ConfigDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Base URL of the control plane
    pub endpoint: String,
    /// Server edition
    #[serde(rename = "server", default)]
    pub edition: Edition,
    /// Access token
    #[serde(default)]
    pub token: String,
    /// Refresh token (SaaS only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
    /// When the access token was issued
    #[serde(rename = "timestamp", skip_serializing_if = "Option::is_none", default)]
    pub issued_at: Option<DateTime<Utc>>,
    /// When the access token stops being usable
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Selected cluster/project
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scope: Option<Scope>,
}

impl Context {
    /// Whether the access token must be refreshed before use at `now`.
    ///
    /// Contexts without an expiry (migrated data) are trusted for OSS and
    /// considered stale for SaaS.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => self.edition == Edition::Saas,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Refresh token, if one is stored and non-empty
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Persisted root of the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Key of the active context, or empty
    #[serde(rename = "current-context", default)]
    pub current_context: String,
    /// Map of server URL to context
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

/// Normalize a user-supplied server address into a context key.
///
/// Trims whitespace and trailing slashes and prepends `https://` when no
/// scheme is given.
pub fn normalize_server_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SbError::InvalidInput("server URL cannot be empty".to_string()));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{}", trimmed))
    }
}
