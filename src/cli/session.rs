//! Login, registration and token CLI arguments

use clap::Parser;

/// Arguments for 'login'
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
        sb login\n  \
        sb login --server dashboard.shapeblock.com --username alice")]
pub struct LoginArgs {
    /// Server address (https:// is assumed when no scheme is given)
    #[arg(long)]
    pub server: Option<String>,
    /// Username
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (prompted when omitted)
    #[arg(long, env = "SB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for 'register'
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Server address
    #[arg(long)]
    pub server: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

/// Arguments for 'token'
#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Print the full Authorization header value
    #[arg(long)]
    pub header: bool,
}
