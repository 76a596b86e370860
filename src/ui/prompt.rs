//! Interactive credential and selection prompts

use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use log::debug;

use crate::config::defaults;
use crate::context::ContextEntry;
use crate::error::{Result, SbError};
use crate::session::{LoginPrompt, LoginRequest};

/// Terminal implementation of [`LoginPrompt`]. Values supplied on the
/// command line are used as-is; the rest are asked for.
#[derive(Debug, Default, Clone)]
pub struct TerminalPrompt {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presets(
        server: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            server,
            username,
            password,
        }
    }
}

impl LoginPrompt for TerminalPrompt {
    fn prompt_login(&self, default_server: Option<&str>) -> Result<LoginRequest> {
        let server = match &self.server {
            Some(server) => server.clone(),
            None => prompt_text(
                "ShapeBlock server",
                Some(default_server.unwrap_or(defaults::SERVER)),
            )?,
        };
        let username = match &self.username {
            Some(username) => username.clone(),
            None => prompt_text("Username", None)?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_password("Password", false)?,
        };

        debug!("Collected login credentials for '{}' on {}", username, server);
        Ok(LoginRequest {
            server,
            username,
            password,
        })
    }
}

/// Ask for a non-empty line of text
pub fn prompt_text(label: &str, default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(label);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    let value = input.interact_text()?;

    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(SbError::InvalidInput(format!("{} cannot be empty", label)));
    }
    Ok(value)
}

/// Ask for a hidden password, optionally twice
pub fn prompt_password(label: &str, confirm: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut password = Password::with_theme(&theme).with_prompt(label);
    if confirm {
        password = password.with_confirmation("Re-enter the password", "Passwords do not match");
    }
    Ok(password.interact()?)
}

/// Pick a context from a list; the current one is preselected and marked
pub fn select_context(entries: &[ContextEntry]) -> Result<String> {
    if entries.is_empty() {
        return Err(SbError::NotFound(
            "No contexts configured. Use 'sb login' to create one.".to_string(),
        ));
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|e| {
            if e.is_current {
                format!("{} (current)", e.key)
            } else {
                e.key.clone()
            }
        })
        .collect();
    let default = entries.iter().position(|e| e.is_current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select context")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(entries[selection].key.clone())
}
