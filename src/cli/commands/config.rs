use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

const KEYS: [&str; 3] = ["currency", "color", "plain"];
const SWITCHES: [&str; 2] = ["on", "off"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change display preferences",
        "config [show | set <currency|color|plain> <value>]",
        cmd_config,
    )
    .with_arguments(vec![vec!["show", "set"], KEYS.to_vec(), SWITCHES.to_vec()])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(context);
            Ok(())
        }
        ["set", key, value] => {
            let config = context.config_manager.set(key, value)?;
            context.apply_config(config);
            io::print_success(format!("Preference `{}` saved.", key.to_lowercase()));
            show(context);
            Ok(())
        }
        ["set", ..] => Err(CommandError::InvalidArguments(
            "Give a preference and its value, e.g. `config set currency $`.".into(),
        )),
        [other, ..] => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{}`.",
            other
        ))),
    }
}

fn show(context: &ShellContext) {
    let config = &context.config;
    output_section("Preferences");
    io::print_info(format!("  Currency     : {}", config.currency_symbol));
    io::print_info(format!("  Color        : {}", on_off(config.ui_color_enabled)));
    io::print_info(format!("  Plain output : {}", on_off(config.plain_output)));
    io::print_info(format!(
        "  Config file  : {}",
        context.config_manager.config_path().display()
    ));
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
