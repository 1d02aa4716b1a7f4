//! Core CLI loop, dispatch, and error reporting.

use std::io;

use impulse_config::ConfigError;
use impulse_core::CoreError;
use impulse_domain::ValueError;
use strsim::levenshtein;
use thiserror::Error;

pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::errors::CliError;

use super::io as cli_io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValueError> for CommandError {
    fn from(err: ValueError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_hint(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit Impulse Stopper?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                self.print_usage_hint();
                Ok(())
            }
            CommandError::Core(CoreError::Validation(err)) => {
                cli_io::print_error(err);
                self.print_usage_hint();
                Ok(())
            }
            CommandError::Core(CoreError::CooldownActive(id)) => {
                cli_io::print_error(CoreError::CooldownActive(id));
                cli_io::print_hint(
                    "Use `cooldown resolve avoided` or `cooldown resolve purchased` first.",
                );
                Ok(())
            }
            CommandError::Config(
                err @ (ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. }),
            ) => {
                cli_io::print_error(err);
                self.print_usage_hint();
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    fn print_usage_hint(&self) {
        match self.last_command_entry() {
            Some(usage) => cli_io::print_hint(format!("Usage: {}", usage)),
            None => cli_io::print_hint("Use `help <command>` for usage details."),
        }
    }

    fn last_command_entry(&self) -> Option<&'static str> {
        let line = self.last_command.as_deref()?;
        let name = line.split_whitespace().next()?.to_lowercase();
        self.command(&name).map(|entry| entry.usage)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use impulse_config::{Config, ConfigManager};
    use impulse_core::{ImpulseTracker, Store};
    use tempfile::TempDir;

    use super::*;
    use crate::cli::system_clock::SystemClock;

    fn script_context() -> (TempDir, ShellContext) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::new(dir.path().join("config.json"));
        let config = Config {
            plain_output: true,
            ..Config::default()
        };
        let tracker = ImpulseTracker::new(Store::in_memory(), Arc::new(SystemClock));
        let context = ShellContext::with_tracker(CliMode::Script, manager, config, tracker);
        (dir, context)
    }

    #[test]
    fn typo_suggests_nearest_command() {
        let (_dir, context) = script_context();
        assert_eq!(context.closest_command("stast"), Some("stats"));
        assert_eq!(context.closest_command("COOLDOWN"), Some("cooldown"));
        assert_eq!(context.closest_command("completely-unrelated"), None);
    }

    #[test]
    fn exit_stops_the_loop() {
        let (_dir, mut context) = script_context();
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert_eq!(context.process_line("   ").unwrap(), LoopControl::Continue);
        assert_eq!(context.process_line("nonsense").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn record_routes_through_the_tracker() {
        let (_dir, mut context) = script_context();

        context.process_line("record 3000 4 1 food").expect("immediate");
        assert_eq!(context.tracker.report().expense_count, 1);

        context.process_line("record 8000 2 2 shopping").expect("deferred");
        assert!(context.tracker.active_cooldown().is_some());

        let err = context
            .process_line("record 9000 2 2 shopping")
            .expect_err("second cooldown");
        assert!(matches!(
            err,
            CommandError::Core(CoreError::CooldownActive(_))
        ));
    }

    #[test]
    fn record_without_arguments_fails_in_script_mode() {
        let (_dir, mut context) = script_context();
        let err = context.process_line("record").expect_err("missing args");
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn invalid_mood_is_a_validation_error() {
        let (_dir, mut context) = script_context();
        let err = context
            .process_line("record 3000 9 1 food")
            .expect_err("mood out of range");
        assert!(matches!(
            err,
            CommandError::Core(CoreError::Validation(ValueError::MoodOutOfRange(9)))
        ));
        assert_eq!(context.tracker.report().expense_count, 0);
    }

    #[test]
    fn config_set_updates_preferences_and_file() {
        let (_dir, mut context) = script_context();
        context.process_line("config set currency $").expect("currency");
        assert_eq!(context.config.currency_symbol, "$");
        assert_eq!(context.amount(3_000), "$3,000");

        let stored = context.config_manager.load().expect("reload");
        assert_eq!(stored.currency_symbol, "$");
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let (_dir, mut context) = script_context();
        let err = context
            .process_line("config set language fr")
            .expect_err("unknown key");
        assert!(matches!(err, CommandError::Config(ConfigError::UnknownKey(_))));
        assert!(!context.config_manager.config_path().exists());
    }
}
