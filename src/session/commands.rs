//! Login, logout, register and token command handlers

use log::debug;

use crate::cli::{LoginArgs, RegisterArgs, TokenArgs};
use crate::config::defaults;
use crate::context::ConfigStore;
use crate::ui::{create_spinner, finish_spinner, prompt_password, prompt_text, TerminalPrompt};

use super::manager::{LogoutOutcome, SessionManager};
use super::provider::{CredentialProvider, LoginPrompt};

/// Log in and make the server the current context
pub async fn run_login_command(
    args: &LoginArgs,
    store: &ConfigStore,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = TerminalPrompt::with_presets(
        args.server.clone(),
        args.username.clone(),
        args.password.clone(),
    );
    let request = prompt.prompt_login(None)?;
    debug!("Login request: {:?}", request);

    let session = SessionManager::new(store);
    let spinner = create_spinner(&format!("Logging in to {}...", request.server), quiet);
    let result = session.login(&request).await;
    finish_spinner(spinner);

    let (key, context) = result?;
    println!("✓ Logged in to '{}' ({})", key, context.edition);
    Ok(())
}

/// Forget the current context
pub fn run_logout_command(store: &ConfigStore) -> Result<(), Box<dyn std::error::Error>> {
    match SessionManager::new(store).logout()? {
        LogoutOutcome::NoContexts => println!("Not logged in."),
        LogoutOutcome::NoCurrentContext => {
            println!("No current context set. Use 'sb context switch' to pick one first.")
        }
        LogoutOutcome::LoggedOut { key, remaining } => {
            println!("✓ Logged out of '{}'", key);
            if remaining > 0 {
                println!(
                    "{} context(s) left; use 'sb context switch' to activate one.",
                    remaining
                );
            }
        }
    }
    Ok(())
}

/// Create an account on a server
pub async fn run_register_command(
    args: &RegisterArgs,
    store: &ConfigStore,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = match &args.server {
        Some(server) => server.clone(),
        None => prompt_text("ShapeBlock server", Some(defaults::SERVER))?,
    };
    let email = match &args.email {
        Some(email) => email.clone(),
        None => prompt_text("Email", None)?,
    };
    let password = prompt_password("Password", true)?;

    let session = SessionManager::new(store);
    let spinner = create_spinner(&format!("Registering {}...", email), quiet);
    let result = session.register(&server, &email, &password).await;
    finish_spinner(spinner);

    let endpoint = result?;
    println!("✓ Registered '{}' at {}", email, endpoint);
    println!("\nUse 'sb login --server {}' to sign in.", endpoint);
    Ok(())
}

/// Print a usable access token, logging in or refreshing first if needed
pub async fn run_token_command(
    args: &TokenArgs,
    store: &ConfigStore,
    context_override: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    run_token_with_prompt(args, store, context_override, TerminalPrompt::new()).await
}

async fn run_token_with_prompt<P: LoginPrompt>(
    args: &TokenArgs,
    store: &ConfigStore,
    context_override: Option<&str>,
    prompt: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = CredentialProvider::new(SessionManager::new(store), prompt)
        .with_context_override(context_override.map(str::to_string));
    let creds = provider.get_active().await?;
    debug!("Active context '{}' ({})", creds.key, creds.edition);

    if args.header {
        println!("{}", creds.authorization_header());
    } else {
        println!("{}", creds.token);
    }
    Ok(())
}
