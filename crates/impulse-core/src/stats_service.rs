//! Aggregation helpers for the home summary and the statistics report.
//!
//! The free functions are pure over an expense slice; [`StatsService`] wires
//! them to the store, the clock and the local timezone.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Datelike, Local, TimeZone, Utc, Weekday};
use tracing::debug;

use impulse_domain::{Category, Expense};

use crate::{
    repository::{ExpenseRepository, SettingsRepository},
    time::Clock,
};

/// Weekdays in histogram order (index 0 is Sunday).
pub const HISTOGRAM_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const FATIGUE_INSIGHT_THRESHOLD: f64 = 2.5;
const MOOD_INSIGHT_THRESHOLD: f64 = 2.5;

/// Budget usage for the current calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    pub monthly_budget: u64,
    pub spent: u64,
    pub remaining: i64,
    /// `None` when the budget is zero.
    pub percent_used: Option<f64>,
}

impl BudgetStatus {
    pub fn new(monthly_budget: u64, spent: u64) -> Self {
        let percent_used = if monthly_budget == 0 {
            None
        } else {
            Some((spent as f64 * 100.0 / monthly_budget as f64).min(100.0))
        };
        Self {
            monthly_budget,
            spent,
            remaining: monthly_budget as i64 - spent as i64,
            percent_used,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining < 0
    }
}

/// Spending grouped under one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: usize,
    pub total: u64,
}

impl CategoryTotal {
    /// Mean amount per purchase, rounded to the nearest unit.
    pub fn average(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        (self.total as f64 / self.count as f64).round() as u64
    }
}

/// Heuristic observations shown under the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    FatigueDriven,
    MoodDriven,
    FridaySpending,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Insight::FatigueDriven => {
                "You tend to spend when tired. Make sure you get enough rest."
            }
            Insight::MoodDriven => {
                "Much of your spending happens in a low mood. A different way to unwind might help."
            }
            Insight::FridaySpending => {
                "Fridays see more spending than Mondays. It may be an end-of-week stress release."
            }
        };
        f.write_str(message)
    }
}

/// Everything the statistics view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingReport {
    pub expense_count: usize,
    pub avoided_count: usize,
    pub average_mood: Option<f64>,
    pub average_fatigue: Option<f64>,
    pub histogram: [usize; 7],
    pub busiest_day: Option<Weekday>,
    pub categories: Vec<CategoryTotal>,
    pub insights: Vec<Insight>,
}

impl SpendingReport {
    pub fn from_expenses<Tz: TimeZone>(expenses: &[Expense], tz: &Tz) -> Self {
        let average_mood = average_mood(expenses);
        let average_fatigue = average_fatigue(expenses);
        let histogram = day_of_week_histogram(expenses, tz);
        Self {
            expense_count: expenses.len(),
            avoided_count: avoided_count(expenses),
            average_mood,
            average_fatigue,
            histogram,
            busiest_day: busiest_day(&histogram),
            categories: category_breakdown(expenses),
            insights: insights(average_mood, average_fatigue, &histogram),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }
}

/// First instant of the calendar month containing `now`, in `tz`.
pub fn start_of_month<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local_date = now.with_timezone(tz).date_naive();
    let first = local_date.with_day(1).unwrap_or(local_date);
    first
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Sum of non-avoided amounts recorded since the start of the current month.
pub fn monthly_spend<Tz: TimeZone>(expenses: &[Expense], now: DateTime<Utc>, tz: &Tz) -> u64 {
    let month_start = start_of_month(now, tz);
    expenses
        .iter()
        .filter(|expense| expense.timestamp >= month_start && !expense.is_avoided())
        .map(|expense| expense.amount)
        .sum()
}

pub fn avoided_count(expenses: &[Expense]) -> usize {
    expenses.iter().filter(|expense| expense.is_avoided()).count()
}

/// Mean mood over every expense, avoided ones included. `None` when empty.
pub fn average_mood(expenses: &[Expense]) -> Option<f64> {
    mean(expenses, |expense| expense.mood.value())
}

/// Mean fatigue over every expense, avoided ones included. `None` when empty.
pub fn average_fatigue(expenses: &[Expense]) -> Option<f64> {
    mean(expenses, |expense| expense.fatigue.value())
}

fn mean(expenses: &[Expense], value: impl Fn(&Expense) -> u8) -> Option<f64> {
    if expenses.is_empty() {
        return None;
    }
    let sum: u64 = expenses.iter().map(|expense| u64::from(value(expense))).sum();
    Some(sum as f64 / expenses.len() as f64)
}

/// Expense counts per weekday in `tz`, Sunday first.
pub fn day_of_week_histogram<Tz: TimeZone>(expenses: &[Expense], tz: &Tz) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for expense in expenses {
        let day = expense.timestamp.with_timezone(tz).weekday();
        counts[day.num_days_from_sunday() as usize] += 1;
    }
    counts
}

/// Weekday with the most expenses; the earliest wins ties.
pub fn busiest_day(histogram: &[usize; 7]) -> Option<Weekday> {
    let mut best: Option<(usize, usize)> = None;
    for (index, &count) in histogram.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| HISTOGRAM_DAYS[index])
}

/// Count and total per category, largest total first. Ties keep the order
/// in which categories were first seen.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals
            .iter_mut()
            .find(|entry| entry.category == expense.category)
        {
            Some(entry) => {
                entry.count += 1;
                entry.total += expense.amount;
            }
            None => totals.push(CategoryTotal {
                category: expense.category,
                count: 1,
                total: expense.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

pub fn insights(
    average_mood: Option<f64>,
    average_fatigue: Option<f64>,
    histogram: &[usize; 7],
) -> Vec<Insight> {
    let mut found = Vec::new();
    if average_fatigue.is_some_and(|fatigue| fatigue >= FATIGUE_INSIGHT_THRESHOLD) {
        found.push(Insight::FatigueDriven);
    }
    if average_mood.is_some_and(|mood| mood <= MOOD_INSIGHT_THRESHOLD) {
        found.push(Insight::MoodDriven);
    }
    let friday = Weekday::Fri.num_days_from_sunday() as usize;
    let monday = Weekday::Mon.num_days_from_sunday() as usize;
    if histogram[friday] > histogram[monday] {
        found.push(Insight::FridaySpending);
    }
    found
}

/// Read-only statistics over the persisted expenses, evaluated in the
/// machine's local timezone.
#[derive(Clone)]
pub struct StatsService {
    expenses: ExpenseRepository,
    settings: SettingsRepository,
    clock: Arc<dyn Clock>,
}

impl StatsService {
    pub fn new(
        expenses: ExpenseRepository,
        settings: SettingsRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expenses,
            settings,
            clock,
        }
    }

    pub fn budget_status(&self) -> BudgetStatus {
        let settings = self.settings.load();
        let spent = monthly_spend(&self.expenses.all(), self.clock.now(), &Local);
        debug!(spent, budget = settings.monthly_budget, "computed monthly spend");
        BudgetStatus::new(settings.monthly_budget, spent)
    }

    pub fn avoided_count(&self) -> usize {
        avoided_count(&self.expenses.all())
    }

    pub fn report(&self) -> SpendingReport {
        SpendingReport::from_expenses(&self.expenses.all(), &Local)
    }
}
