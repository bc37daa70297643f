use std::fmt;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::output;
use crate::errors::{IntakeError, Result};

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

/// Print a warning message via the standard CLI output helpers.
pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

/// Print an error message via the standard CLI output helpers.
pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Print a success message via the standard CLI output helpers.
pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

fn from_prompt_error(err: dialoguer::Error) -> IntakeError {
    IntakeError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
}

/// Prompt for free-form text. Empty input is allowed so step validation can
/// decide what is actually required.
pub fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if !initial.is_empty() {
        input = input.with_initial_text(initial.to_string());
    }
    input.interact_text().map_err(from_prompt_error)
}

/// Prompt for one option out of a fixed list, returning the chosen label.
pub fn prompt_select(prompt: &str, options: &[&str], current: &str) -> Result<String> {
    let default = options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(current))
        .unwrap_or(0);
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()
        .map_err(from_prompt_error)?;
    Ok(options[index].to_string())
}
