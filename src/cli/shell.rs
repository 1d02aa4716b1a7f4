use std::{
    collections::HashMap,
    io::{self, BufRead},
    path::Path,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};
use shell_words::{split, ParseError};
use tracing::{debug, warn};

use crate::cli::commands::CommandRegistry;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::info as output_info;

/// Set to run one command per stdin line without prompts.
pub const SCRIPT_ENV: &str = "IMPULSE_STOPPER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    debug!(?mode, "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_registry(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = context.history_path();
    if let Some(path) = history.as_deref().filter(|path| path.exists()) {
        if let Err(err) = editor.load_history(path) {
            warn!(path = %path.display(), error = %err, "could not load command history");
        }
    }

    output_info("Impulse Stopper. Type `help` to list commands, `?` to complete.");
    if let Some(timer) = context.tracker.active_cooldown() {
        cli_io::print_hint(format!(
            "A cooldown for {} is running. Type `cooldown` to see it.",
            context.amount(timer.amount)
        ));
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(path) = history.as_deref() {
        save_history(&mut editor, path);
    }
    Ok(())
}

fn save_history(editor: &mut Editor<CommandHelper, DefaultHistory>, path: &Path) {
    if let Err(err) = editor.save_history(path) {
        warn!(path = %path.display(), error = %err, "could not save command history");
    }
}

/// Runs one command per input line until the input ends or `exit` is read.
pub(crate) fn run_script<R: BufRead>(context: &mut ShellContext, input: R) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input)
}

/// Completes command names first, then each command's own argument table.
/// `help` completes command names in its argument slot.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandHelper {
    commands: Vec<&'static str>,
    arguments: HashMap<&'static str, Vec<Vec<&'static str>>>,
}

impl CommandHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        Self {
            commands: registry.names().collect(),
            arguments: registry
                .iter()
                .map(|definition| (definition.name, definition.arguments.clone()))
                .collect(),
        }
    }

    /// Start offset of the word under the cursor and the matching candidates.
    fn candidates(&self, prefix: &str) -> (usize, Vec<&'static str>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let preceding: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: &[&'static str] = match preceding.split_first() {
            None => &self.commands,
            Some((command, args)) => {
                let command = command.to_ascii_lowercase();
                if command == "help" && args.is_empty() {
                    &self.commands
                } else {
                    self.arguments
                        .get(command.as_str())
                        .and_then(|table| table.get(args.len()))
                        .map(Vec::as_slice)
                        .unwrap_or(&[])
                }
            }
        };

        let matches = pool
            .iter()
            .copied()
            .filter(|candidate| candidate.starts_with(&needle))
            .collect();
        (start, matches)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}
