//! UI utilities for terminal output
//!
//! This module provides user interface components like progress spinners,
//! confirmation and credential prompts.

mod confirm;
mod prompt;
mod spinner;

pub use confirm::confirm_action;
pub use prompt::{prompt_password, prompt_text, select_context, TerminalPrompt};
pub use spinner::{create_spinner, finish_spinner};
