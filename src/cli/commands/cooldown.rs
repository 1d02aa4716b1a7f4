use dialoguer::theme::ColorfulTheme;
use impulse_domain::{CooldownState, CooldownTimer};
use uuid::Uuid;

use crate::cli::alternatives;
use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::io;
use crate::cli::output::section as output_section;

const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "cooldown",
        "Show, list, or resolve cooldowns",
        "cooldown [show | list | resolve <avoided|purchased> [id]]",
        cmd_cooldown,
    )
    .with_arguments(vec![
        vec!["show", "list", "resolve"],
        vec!["avoided", "purchased"],
    ])]
}

fn cmd_cooldown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let subcommand = args.first().map(|arg| arg.to_lowercase());
    match subcommand.as_deref() {
        None | Some("show") => show(context),
        Some("list") => list(context),
        Some("resolve") => resolve(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "Unknown cooldown action `{}`.",
            other
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let Some(timer) = displayed(context) else {
        io::print_info("No active cooldown.");
        return Ok(());
    };

    let now = context.tracker.now();
    let state = timer.state(now);
    output_section("Cooldown");
    io::print_info(format!(
        "  Purchase     : {} ({})",
        context.amount(timer.amount),
        timer.category
    ));
    io::print_info(format!(
        "  Remaining    : {}",
        format::remaining(timer.remaining(now))
    ));
    let progress = timer.progress(now);
    io::print_info(format!(
        "  Progress     : {:.0}% {}",
        progress,
        format::bar(progress.round() as usize, 100)
    ));
    io::print_info(format!("  Ends at      : {}", format::local_time(timer.end_time)));
    io::print_info(format!("  Mood         : {}", format::mood(timer.mood)));
    io::print_info(format!("  Fatigue      : {}", format::fatigue(timer.fatigue)));
    if state == CooldownState::Expired {
        io::print_warning("The cooldown has finished. Time to decide.");
    }

    output_section("Now vs later");
    io::print_info("  Before buying: \"This might be what I need.\"");
    io::print_info("  After buying : \"Did I really need it?\"");

    output_section("Instead you could");
    for alternative in alternatives::for_state(timer.mood, timer.fatigue) {
        io::print_info(format!(
            "  - {}: {}",
            alternative.title, alternative.description
        ));
    }
    io::print_hint(
        "Decide any time with `cooldown resolve avoided` or `cooldown resolve purchased`.",
    );
    Ok(())
}

/// The running cooldown, or else the oldest one that ended without a decision.
fn displayed(context: &ShellContext) -> Option<CooldownTimer> {
    context
        .tracker
        .active_cooldown()
        .or_else(|| context.tracker.unresolved_cooldowns().into_iter().next())
}

fn list(context: &ShellContext) -> CommandResult {
    let timers = context.tracker.unresolved_cooldowns();
    if timers.is_empty() {
        io::print_info("No unresolved cooldowns.");
        return Ok(());
    }

    let now = context.tracker.now();
    output_section("Unresolved cooldowns");
    for timer in &timers {
        let detail = match timer.state(now) {
            CooldownState::Active => format!("{} left", format::remaining(timer.remaining(now))),
            _ => format!("ended {}", format::local_time(timer.end_time)),
        };
        io::print_info(format!(
            "  {}  {:<8} {:>10}  {:<14} {}",
            short_id(timer.id),
            timer.state(now),
            context.amount(timer.amount),
            timer.category,
            detail
        ));
    }
    Ok(())
}

fn resolve(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let avoided = match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        Some("avoided") | Some("skip") => true,
        Some("purchased") | Some("bought") => false,
        _ => {
            return Err(CommandError::InvalidArguments(
                "Say whether you `avoided` the purchase or `purchased` it.".into(),
            ))
        }
    };

    let timers = context.tracker.unresolved_cooldowns();
    let timer = match args.get(1) {
        Some(prefix) => find_by_prefix(&timers, prefix)?,
        None => pick_single(context, &timers)?,
    };

    match context.tracker.resolve_cooldown(timer.id, avoided)? {
        Some(expense) if avoided => io::print_success(format!(
            "Well done. You kept {} by skipping this {} purchase.",
            context.amount(expense.amount),
            expense.category
        )),
        Some(expense) => io::print_success(format!(
            "Recorded {} for {}. Logging it is what counts.",
            context.amount(expense.amount),
            expense.category
        )),
        None => io::print_warning("That cooldown was already resolved."),
    }
    Ok(())
}

fn find_by_prefix(
    timers: &[CooldownTimer],
    prefix: &str,
) -> Result<CooldownTimer, CommandError> {
    let needle = prefix.trim().to_lowercase();
    let matches: Vec<&CooldownTimer> = timers
        .iter()
        .filter(|timer| timer.id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [timer] => Ok((*timer).clone()),
        [] => Err(CommandError::Message(format!(
            "No unresolved cooldown matches `{}`.",
            prefix
        ))),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` matches several cooldowns; use more of the id.",
            prefix
        ))),
    }
}

fn pick_single(
    context: &ShellContext,
    timers: &[CooldownTimer],
) -> Result<CooldownTimer, CommandError> {
    match timers {
        [] => Err(CommandError::Message("There is no cooldown to resolve.".into())),
        [timer] => Ok(timer.clone()),
        _ if context.is_interactive() => {
            let labels = labels(context, timers);
            let index = choose(&context.theme, &labels)?;
            timers
                .get(index)
                .cloned()
                .ok_or_else(|| CommandError::Message("No cooldown selected.".into()))
        }
        _ => Err(CommandError::InvalidArguments(
            "Several cooldowns are unresolved; pass an id from `cooldown list`.".into(),
        )),
    }
}

fn labels(context: &ShellContext, timers: &[CooldownTimer]) -> Vec<String> {
    timers
        .iter()
        .map(|timer| {
            format!(
                "{} {} ({})",
                short_id(timer.id),
                context.amount(timer.amount),
                timer.category
            )
        })
        .collect()
}

fn choose(theme: &ColorfulTheme, labels: &[String]) -> Result<usize, CommandError> {
    io::select_index(theme, "Which cooldown?", labels, 0)
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}
