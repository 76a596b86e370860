//! Context management module
//!
//! Provides named contexts that bundle a server endpoint, its credentials
//! and an optional cluster/project scope, for switching between servers.

mod commands;
mod legacy;
mod models;
mod registry;
mod store;
mod switcher;

pub use commands::run_context_command;
pub use models::{normalize_server_url, ConfigDocument, Context, Edition, Scope};
pub use registry::{ContextEntry, ContextRegistry};
pub use store::ConfigStore;
pub use switcher::{ContextSwitcher, SwitchOutcome, UnsetOutcome};
