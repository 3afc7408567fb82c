use chrono::{Datelike, NaiveDate};
use crate::models::{DiaryEntry, Inspiration, Task};
use super::tasks::Progress;

pub const FALLBACK_SPARK: &str = "Simplicity is the ultimate sophistication.";

/// Check-in mood picked on the dashboard. Only lives in view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckIn {
    Happy,
    Calm,
    Melancholy,
    Inspired,
}

impl CheckIn {
    pub const ALL: [CheckIn; 4] = [CheckIn::Happy, CheckIn::Calm, CheckIn::Melancholy, CheckIn::Inspired];

    pub fn label(&self) -> &'static str {
        match self {
            CheckIn::Happy => "Happy",
            CheckIn::Calm => "Calm",
            CheckIn::Melancholy => "Melancholy",
            CheckIn::Inspired => "Inspired",
        }
    }

    pub fn cycle(self) -> CheckIn {
        let i = CheckIn::ALL.iter().position(|c| *c == self).unwrap_or(0);
        CheckIn::ALL[(i + 1) % CheckIn::ALL.len()]
    }
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 18 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Saturday, October 17th"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day())
    )
}

/// "Last Entry: Yesterday" style label for the reflection card.
pub fn last_entry_label(today: NaiveDate, last: Option<NaiveDate>) -> String {
    let Some(last) = last else {
        return "No entries yet".to_string();
    };
    match (today - last).num_days() {
        d if d <= 0 => "Last Entry: Today".to_string(),
        1 => "Last Entry: Yesterday".to_string(),
        d => format!("Last Entry: {} days ago", d),
    }
}

/// Newest idea not yet practiced.
pub fn daily_spark(inspirations: &[Inspiration]) -> Option<&Inspiration> {
    inspirations
        .iter()
        .filter(|i| !i.is_practiced)
        .max_by_key(|i| i.created_at)
}

/// Replaces every visible character with a bullet when privacy mode is on.
pub fn mask(text: &str, private: bool) -> String {
    if !private {
        return text.to_string();
    }
    text.chars().map(|c| if c.is_whitespace() { c } else { '•' }).collect()
}

/// Everything the overview screen shows, computed from one fetch.
#[derive(Debug, Clone)]
pub struct Overview {
    pub today: NaiveDate,
    pub heading: String,
    pub greeting: &'static str,
    pub name: String,
    pub tasks: Vec<Task>,
    pub progress: Progress,
    pub last_entry: String,
    pub spark: String,
}

impl Overview {
    pub fn build(
        today: NaiveDate,
        hour: u32,
        name: &str,
        tasks: Vec<Task>,
        latest_entry: Option<&DiaryEntry>,
        inspirations: &[Inspiration],
    ) -> Self {
        let progress = Progress::of(&tasks);
        Self {
            today,
            heading: long_date(today),
            greeting: greeting(hour),
            name: name.to_string(),
            tasks,
            progress,
            last_entry: last_entry_label(today, latest_entry.map(|e| e.entry_date)),
            spark: daily_spark(inspirations)
                .map(|i| i.label().to_string())
                .unwrap_or_else(|| FALLBACK_SPARK.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting(0), "Good Morning");
        assert_eq!(greeting(11), "Good Morning");
        assert_eq!(greeting(12), "Good Afternoon");
        assert_eq!(greeting(17), "Good Afternoon");
        assert_eq!(greeting(18), "Good Evening");
    }

    #[test]
    fn long_date_uses_ordinals() {
        assert_eq!(long_date(date("2026-10-17")), "Saturday, October 17th");
        assert_eq!(long_date(date("2026-10-01")), "Thursday, October 1st");
        assert_eq!(long_date(date("2026-10-22")), "Thursday, October 22nd");
        assert_eq!(long_date(date("2026-10-13")), "Tuesday, October 13th");
        assert_eq!(long_date(date("2026-10-23")), "Friday, October 23rd");
    }

    #[test]
    fn last_entry_labels() {
        let today = date("2026-10-17");
        assert_eq!(last_entry_label(today, None), "No entries yet");
        assert_eq!(last_entry_label(today, Some(today)), "Last Entry: Today");
        assert_eq!(last_entry_label(today, Some(date("2026-10-16"))), "Last Entry: Yesterday");
        assert_eq!(last_entry_label(today, Some(date("2026-10-12"))), "Last Entry: 5 days ago");
    }

    #[test]
    fn spark_prefers_newest_unpracticed_idea() {
        let base = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        let idea = |id: &str, practiced: bool, age_days: i64| Inspiration {
            id: id.into(),
            user_id: "u".into(),
            title: Some(id.into()),
            content: id.into(),
            category: None,
            is_practiced: practiced,
            created_at: base - Duration::days(age_days),
        };
        let ideas = vec![idea("old", false, 5), idea("done", true, 0), idea("fresh", false, 1)];
        assert_eq!(daily_spark(&ideas).unwrap().id, "fresh");
        assert!(daily_spark(&[]).is_none());
    }

    #[test]
    fn privacy_mask_keeps_spacing() {
        assert_eq!(mask("hi you", true), "•• •••");
        assert_eq!(mask("hi you", false), "hi you");
    }

    #[test]
    fn check_in_cycles() {
        assert_eq!(CheckIn::Inspired.cycle(), CheckIn::Happy);
        assert_eq!(CheckIn::Happy.cycle(), CheckIn::Calm);
    }
}
