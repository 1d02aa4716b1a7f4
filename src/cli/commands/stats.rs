use impulse_core::{SpendingReport, HISTOGRAM_DAYS};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "stats",
        "Show spending patterns by mood, weekday and category",
        "stats",
        cmd_stats,
    )]
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.tracker.report();
    if report.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    render(context, &report);
    Ok(())
}

fn render(context: &ShellContext, report: &SpendingReport) {
    output_section("Overview");
    io::print_info(format!("  Records      : {}", report.expense_count));
    io::print_info(format!("  Avoided      : {}", report.avoided_count));
    io::print_info(format!(
        "  Avg mood     : {} / 5",
        format::average(report.average_mood)
    ));
    io::print_info(format!(
        "  Avg fatigue  : {} / 3",
        format::average(report.average_fatigue)
    ));

    output_section("By weekday");
    let max = report.histogram.iter().copied().max().unwrap_or(0);
    for (day, count) in HISTOGRAM_DAYS.iter().zip(report.histogram.iter()) {
        io::print_info(format!(
            "  {} {:>3} {}",
            format::weekday(*day),
            count,
            format::bar(*count, max)
        ));
    }
    if let Some(day) = report.busiest_day {
        io::print_info(format!("  Busiest day: {}", format::weekday(day)));
    }

    output_section("By category");
    for total in &report.categories {
        io::print_info(format!(
            "  {:<14} {:>3}x {:>10}  avg {}",
            total.category,
            total.count,
            context.amount(total.total),
            context.amount(total.average())
        ));
    }

    if !report.insights.is_empty() {
        output_section("Insights");
        for insight in &report.insights {
            io::print_hint(insight);
        }
    }
}
