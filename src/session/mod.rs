//! Session management module
//!
//! Logs users in against a server's auth endpoints, refreshes expiring
//! access tokens and resolves the credentials API commands use.

mod client;
mod commands;
mod manager;
mod models;
mod provider;

pub use client::AuthClient;
pub use commands::{
    run_login_command, run_logout_command, run_register_command, run_token_command,
};
pub use manager::{LogoutOutcome, SessionManager};
pub use models::{IssuedToken, LoginRequest};
pub use provider::{ActiveCredentials, CredentialProvider, LoginPrompt};
