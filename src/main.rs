//! sb - Main entry point

use clap::Parser;
use log::{debug, info};

use sb::{
    run_context_command, run_login_command, run_logout_command, run_register_command,
    run_token_command, Cli, Command, ConfigStore,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting sb v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "CLI args: log_level={}, context={:?}, quiet={}",
        cli.log_level, cli.context, cli.quiet
    );

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new();
    debug!("Using config file {}", store.path().display());

    match &cli.command {
        Command::Login(args) => run_login_command(args, &store, cli.quiet).await,
        Command::Logout => run_logout_command(&store),
        Command::Register(args) => run_register_command(args, &store, cli.quiet).await,
        Command::Context { action } => run_context_command(action, &store),
        Command::Token(args) => run_token_command(args, &store, cli.context.as_deref()).await,
    }
}
