//! Text rendering shared by the command handlers.

use chrono::{DateTime, Duration, Local, Utc, Weekday};
use impulse_domain::{Fatigue, Mood};

const MOOD_LABELS: [&str; 5] = ["very bad", "bad", "neutral", "good", "very good"];
const FATIGUE_LABELS: [&str; 3] = ["energetic", "a bit tired", "exhausted"];
const BAR_WIDTH: usize = 20;

/// `Hh Mm`, rounding partial minutes down.
pub fn remaining(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn local_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn mood(mood: Mood) -> String {
    let label = MOOD_LABELS
        .get(usize::from(mood.value()).saturating_sub(1))
        .copied()
        .unwrap_or("unknown");
    format!("{}/5 ({})", mood.value(), label)
}

pub fn fatigue(fatigue: Fatigue) -> String {
    let label = FATIGUE_LABELS
        .get(usize::from(fatigue.value()).saturating_sub(1))
        .copied()
        .unwrap_or("unknown");
    format!("{}/3 ({})", fatigue.value(), label)
}

pub fn average(value: Option<f64>) -> String {
    value
        .map(|avg| format!("{:.1}", avg))
        .unwrap_or_else(|| "no data".into())
}

pub fn weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Horizontal bar scaled so `max` fills the full width.
pub fn bar(value: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (value * BAR_WIDTH + max - 1) / max;
    "#".repeat(filled.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_shows_hours_and_minutes() {
        assert_eq!(remaining(Duration::minutes(23 * 60 + 59)), "23h 59m");
        assert_eq!(remaining(Duration::seconds(59)), "0h 0m");
        assert_eq!(remaining(Duration::hours(-2)), "0h 0m");
    }

    #[test]
    fn labels_follow_the_scale() {
        assert_eq!(mood(Mood::new(1).unwrap()), "1/5 (very bad)");
        assert_eq!(fatigue(Fatigue::new(3).unwrap()), "3/3 (exhausted)");
        assert_eq!(average(None), "no data");
        assert_eq!(average(Some(2.26)), "2.3");
    }

    #[test]
    fn bars_scale_to_the_busiest_day() {
        assert_eq!(bar(0, 4), "");
        assert_eq!(bar(4, 4).len(), BAR_WIDTH);
        assert_eq!(bar(1, 4).len(), 5);
        assert_eq!(bar(3, 0), "");
    }
}
