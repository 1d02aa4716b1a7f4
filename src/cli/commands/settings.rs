use impulse_domain::{
    Settings, SliderBounds, TimerDuration, BUDGET_BOUNDS, THRESHOLD_BOUNDS,
};

use crate::cli::commands::{parse_number, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "settings",
        "Show or change the budget, threshold and cooldown length",
        "settings [show | set <budget|threshold|duration> <value>]",
        cmd_settings,
    )
    .with_arguments(vec![
        vec!["show", "set"],
        vec!["budget", "threshold", "duration"],
        vec!["24", "48", "72"],
    ])]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Budget,
    Threshold,
    Duration,
}

impl Field {
    fn parse(raw: &str) -> Result<Self, CommandError> {
        match raw.to_lowercase().as_str() {
            "budget" => Ok(Field::Budget),
            "threshold" => Ok(Field::Threshold),
            "duration" | "timer" => Ok(Field::Duration),
            other => Err(CommandError::InvalidArguments(format!(
                "Unknown setting `{}`. Use budget, threshold or duration.",
                other
            ))),
        }
    }
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => {
            show(context);
            Ok(())
        }
        Some("set") => set(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "Unknown settings action `{}`.",
            other
        ))),
    }
}

fn show(context: &ShellContext) {
    let settings = context.tracker.settings();
    output_section("Settings");
    io::print_info(format!(
        "  Monthly budget    : {}",
        context.amount(settings.monthly_budget)
    ));
    io::print_info(format!(
        "  Impulse threshold : {} (purchases at or above it wait)",
        context.amount(settings.impulse_threshold)
    ));
    io::print_info(format!("  Cooldown length   : {}", settings.timer_duration));
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = match args.first() {
        Some(raw) => Field::parse(raw)?,
        None => {
            return Err(CommandError::InvalidArguments(
                "Name the setting to change: budget, threshold or duration.".into(),
            ))
        }
    };

    let current = context.tracker.settings();
    let updated = match (field, args.get(1)) {
        (Field::Duration, Some(raw)) => Settings {
            timer_duration: parse_duration(raw)?,
            ..current
        },
        (Field::Duration, None) if context.is_interactive() => {
            let index = TimerDuration::ALL
                .iter()
                .position(|duration| *duration == current.timer_duration)
                .unwrap_or(0);
            let choice = io::select_index(
                &context.theme,
                "Cooldown length",
                &TimerDuration::ALL,
                index,
            )?;
            Settings {
                timer_duration: TimerDuration::ALL
                    .get(choice)
                    .copied()
                    .unwrap_or_default(),
                ..current
            }
        }
        (Field::Budget, raw) => Settings {
            monthly_budget: amount_value(context, raw, BUDGET_BOUNDS, current.monthly_budget)?,
            ..current
        },
        (Field::Threshold, raw) => Settings {
            impulse_threshold: amount_value(
                context,
                raw,
                THRESHOLD_BOUNDS,
                current.impulse_threshold,
            )?,
            ..current
        },
        (Field::Duration, None) => {
            return Err(CommandError::InvalidArguments(
                "Give a duration of 24, 48 or 72 hours.".into(),
            ))
        }
    };

    context.tracker.save_settings(updated)?;
    io::print_success("Settings saved.");
    show(context);
    Ok(())
}

fn amount_value(
    context: &ShellContext,
    raw: Option<&&str>,
    bounds: SliderBounds,
    current: u64,
) -> Result<u64, CommandError> {
    let message = format!(
        "Choose a value from {} to {} in steps of {}.",
        context.amount(bounds.min),
        context.amount(bounds.max),
        context.amount(bounds.step)
    );
    match raw {
        Some(raw) => {
            let value: u64 = parse_number(raw, "amount")?;
            if bounds.accepts(value) {
                Ok(value)
            } else {
                Err(CommandError::InvalidArguments(message))
            }
        }
        None if context.is_interactive() => {
            io::prompt_number(&context.theme, "New value", Some(current), move |value| {
                if bounds.accepts(value) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            })
        }
        None => Err(CommandError::InvalidArguments(message)),
    }
}

fn parse_duration(raw: &str) -> Result<TimerDuration, CommandError> {
    let hours: u32 = parse_number(raw.trim_end_matches(['h', 'H']), "duration")?;
    Ok(TimerDuration::from_hours(hours)?)
}
