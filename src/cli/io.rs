use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::CommandError;
use crate::cli::output;

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

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for a whole number, re-asking until `accept` approves it.
pub fn prompt_number<F>(
    theme: &ColorfulTheme,
    prompt: &str,
    default: Option<u64>,
    accept: F,
) -> Result<u64, CommandError>
where
    F: Fn(u64) -> Result<(), String>,
{
    let mut input = Input::<u64>::with_theme(theme).with_prompt(prompt);
    if let Some(value) = default {
        input = input.default(value);
    }
    input
        .validate_with(|value: &u64| accept(*value))
        .interact_text()
        .map_err(CommandError::from)
}

/// Let the user pick one of `items`; returns the chosen index.
pub fn select_index<T: ToString>(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[T],
    default: usize,
) -> Result<usize, CommandError> {
    Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
