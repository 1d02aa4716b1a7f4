use std::str::FromStr;

use impulse_core::RecordingOutcome;
use impulse_domain::{Category, Fatigue, Mood, PurchaseDraft, AMOUNT_BOUNDS};

use crate::cli::alternatives;
use crate::cli::commands::{parse_number, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::io;

const USAGE: &str = "record <amount> <mood 1-5> <fatigue 1-3> <category>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "record",
        "Record a purchase together with how you feel",
        USAGE,
        cmd_record,
    )
    .with_arguments(vec![
        Vec::new(),
        vec!["1", "2", "3", "4", "5"],
        vec!["1", "2", "3"],
        Category::ALL.iter().map(|category| category.key()).collect(),
    ])]
}

fn cmd_record(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = match args.len() {
        4 => draft_from_args(args)?,
        0 if context.is_interactive() => prompt_draft(context)?,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "Expected amount, mood, fatigue and category. Categories: {}.",
                category_list()
            )))
        }
    };

    match context.tracker.record(&draft)? {
        RecordingOutcome::Immediate(expense) => {
            io::print_success(format!(
                "Recorded {} for {}.",
                context.amount(expense.amount),
                expense.category
            ));
            let budget = context.tracker.stats().budget_status();
            io::print_info(format!(
                "Spent this month: {} of {}.",
                context.amount(budget.spent),
                context.amount(budget.monthly_budget)
            ));
            if budget.is_over_budget() {
                io::print_warning("This month's budget is exceeded.");
            }
        }
        RecordingOutcome::Deferred(timer) => {
            io::print_warning(format!(
                "{} is at or above your impulse threshold of {}.",
                context.amount(timer.amount),
                context.amount(context.tracker.settings().impulse_threshold)
            ));
            io::print_info(format!(
                "Cooldown started. Decide after {} ({} from now).",
                format::local_time(timer.end_time),
                format::remaining(timer.window())
            ));
            io::print_info("Meanwhile you could:");
            for alternative in alternatives::for_state(timer.mood, timer.fatigue) {
                io::print_info(format!(
                    "  - {}: {}",
                    alternative.title, alternative.description
                ));
            }
        }
    }
    Ok(())
}

fn draft_from_args(args: &[&str]) -> Result<PurchaseDraft, CommandError> {
    Ok(PurchaseDraft {
        amount: parse_number(args[0], "amount")?,
        mood: parse_number(args[1], "mood")?,
        fatigue: parse_number(args[2], "fatigue")?,
        category: Some(Category::from_str(args[3])?),
    })
}

fn prompt_draft(context: &ShellContext) -> Result<PurchaseDraft, CommandError> {
    let min = context.amount(AMOUNT_BOUNDS.min);
    let max = context.amount(AMOUNT_BOUNDS.max);
    let amount = io::prompt_number(&context.theme, "Amount", None, move |value| {
        if AMOUNT_BOUNDS.contains(value) {
            Ok(())
        } else {
            Err(format!("Enter an amount between {} and {}.", min, max))
        }
    })?;

    let moods: Vec<String> = (Mood::MIN..=Mood::MAX)
        .filter_map(|value| Mood::new(value).ok())
        .map(format::mood)
        .collect();
    let mood = io::select_index(&context.theme, "How do you feel?", &moods, 2)?;

    let fatigues: Vec<String> = (Fatigue::MIN..=Fatigue::MAX)
        .filter_map(|value| Fatigue::new(value).ok())
        .map(format::fatigue)
        .collect();
    let fatigue = io::select_index(&context.theme, "How tired are you?", &fatigues, 1)?;

    let category = io::select_index(&context.theme, "Category", &Category::ALL, 0)?;

    Ok(PurchaseDraft {
        amount,
        mood: Mood::MIN + mood as u8,
        fatigue: Fatigue::MIN + fatigue as u8,
        category: Category::ALL.get(category).copied(),
    })
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|category| category.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use impulse_domain::ValueError;

    use super::*;

    #[test]
    fn arguments_become_a_draft() {
        let draft = draft_from_args(&["8,000", "2", "3", "Shopping"]).unwrap();
        assert_eq!(
            draft,
            PurchaseDraft {
                amount: 8_000,
                mood: 2,
                fatigue: 3,
                category: Some(Category::Shopping),
            }
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = draft_from_args(&["800", "2", "3", "cars"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert_eq!(
            err.to_string(),
            ValueError::UnknownCategory("cars".into()).to_string()
        );
    }
}
