//! Auth API request/response payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials gathered for a login attempt
#[derive(Clone)]
pub struct LoginRequest {
    /// Server address as typed (scheme optional)
    pub server: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct LoginPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /api/auth/login/` response (OSS)
#[derive(Deserialize, Debug)]
pub(crate) struct OssLoginResponse {
    pub key: String,
}

/// `POST /api/auth/token/` response (SaaS)
#[derive(Deserialize, Debug)]
pub(crate) struct SaasTokenResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct RefreshPayload<'a> {
    pub refresh: &'a str,
}

/// `POST /api/auth/token/refresh/` response. Servers with refresh-token
/// rotation also return a new `refresh`.
#[derive(Deserialize, Debug)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Serialize, Debug)]
pub(crate) struct RegisterPayload<'a> {
    pub email: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
}

/// Tokens returned by a successful login or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access: String,
    pub refresh: Option<String>,
}
