//! sb - ShapeBlock command line client
//!
//! Session and identity layer: logs in to ShapeBlock servers, keeps one
//! context per server in a local config file, refreshes expiring access
//! tokens and hands API commands a working credential.
//!
//! # Example
//!
//! ```bash
//! # Log in and make the server current
//! sb login --server dashboard.shapeblock.com --username alice
//!
//! # List contexts and switch between them
//! sb context list
//! sb context switch https://shapeblock.example.com
//!
//! # Print a valid token for scripts
//! sb token --header
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod ui;

pub use cli::{Cli, Command, ContextAction};
pub use context::{
    run_context_command, ConfigDocument, ConfigStore, Context, ContextRegistry, ContextSwitcher,
    Edition, Scope,
};
pub use error::{Result, SbError};
pub use session::{
    run_login_command, run_logout_command, run_register_command, run_token_command,
    ActiveCredentials, AuthClient, CredentialProvider, LoginPrompt, LoginRequest, SessionManager,
};
pub use ui::TerminalPrompt;
