//! User confirmation prompts for destructive operations

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::error::Result;

/// Ask the user to confirm `prompt`. Defaults to "no".
///
/// Returns `true` immediately when `assume_yes` is set.
pub fn confirm_action(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
