use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "reset",
        "Delete every recorded expense, cooldown and setting",
        "reset [--yes]",
        cmd_reset,
    )
    .with_arguments(vec![vec!["--yes"]])]
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed = match args {
        [] => {
            if !context.is_interactive() {
                return Err(CommandError::InvalidArguments(
                    "Pass `--yes` to reset without a prompt.".into(),
                ));
            }
            io::confirm_action(
                &context.theme,
                "Delete all Impulse Stopper data? This cannot be undone",
                false,
            )?
        }
        ["--yes"] | ["-y"] => true,
        _ => {
            return Err(CommandError::InvalidArguments(
                "Only `--yes` is accepted.".into(),
            ))
        }
    };

    if !confirmed {
        io::print_info("Reset cancelled.");
        return Ok(());
    }

    let removed = context.tracker.reset()?;
    io::print_success(format!("All data cleared ({} store entries removed).", removed));
    Ok(())
}
