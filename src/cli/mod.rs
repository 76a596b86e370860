//! CLI argument parsing

mod context;
mod session;

use clap::{Parser, Subcommand};

use crate::config::{context as context_config, defaults};

pub use context::{ContextAction, SetContextArgs, SwitchContextArgs, UnsetContextArgs};
pub use session::{LoginArgs, RegisterArgs, TokenArgs};

/// ShapeBlock CLI
#[derive(Parser, Debug)]
#[command(name = "sb")]
#[command(version)]
#[command(about = "Log in to ShapeBlock servers and manage contexts", long_about = None)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Use this context for one command; the current context is left as is
    #[arg(long, global = true, env = context_config::ENV_VAR)]
    pub context: Option<String>,

    /// Suppress spinners
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in to a ShapeBlock server and make it the current context
    Login(LoginArgs),

    /// Log out of the current context
    Logout,

    /// Create an account on a ShapeBlock server
    #[command(visible_alias = "reg")]
    Register(RegisterArgs),

    /// Manage contexts
    #[command(visible_alias = "con")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Print a valid access token for the active context
    Token(TokenArgs),
}
