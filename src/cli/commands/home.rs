use impulse_core::HomeSummary;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "home",
        "Show this month's spending and any running cooldown",
        "home",
        cmd_home,
    )]
}

fn cmd_home(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.tracker.home();
    render(context, &summary);
    Ok(())
}

fn render(context: &ShellContext, summary: &HomeSummary) {
    let budget = &summary.budget;
    output_section("This month");
    io::print_info(format!(
        "  Spent        : {} of {}",
        context.amount(budget.spent),
        context.amount(budget.monthly_budget)
    ));
    io::print_info(format!(
        "  Remaining    : {}",
        context.signed_amount(budget.remaining)
    ));
    if let Some(percent) = budget.percent_used {
        io::print_info(format!(
            "  Used         : {:.0}% {}",
            percent,
            format::bar(percent.round() as usize, 100)
        ));
    }
    io::print_info(format!("  Avoided      : {}", summary.avoided_count));

    if budget.is_over_budget() {
        io::print_warning("You are over this month's budget.");
    }

    match &summary.active_cooldown {
        Some(timer) => {
            let remaining = context.tracker.cooldowns().remaining(timer);
            io::print_warning(format!(
                "Cooldown running for {} ({}): {} left.",
                context.amount(timer.amount),
                timer.category,
                format::remaining(remaining)
            ));
            io::print_hint("Use `cooldown` to see it.");
        }
        None => {
            let waiting = context.tracker.unresolved_cooldowns().len();
            if waiting > 0 {
                io::print_hint(format!(
                    "{} finished cooldown(s) await a decision. Use `cooldown list`.",
                    waiting
                ));
            }
        }
    }
}
