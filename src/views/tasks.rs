use chrono::{NaiveDate, NaiveTime};
use crate::error::{Error, Result};
use crate::models::{NewTask, Task};

/// Completed-of-total for a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|t| t.is_completed).count(),
            total: tasks.len(),
        }
    }

    /// 0.0 ..= 1.0; an empty list has made no progress.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u16 {
        (self.ratio() * 100.0).round() as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Done => "Done",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.is_completed,
            StatusFilter::Done => task.is_completed,
        }
    }
}

/// Scheduled tasks by time, unscheduled ones after them, ties by title.
pub fn sort_for_day(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.scheduled_time, b.scheduled_time) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    });
}

/// "08:00 AM"
pub fn time_label(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%I:%M %p").to_string(),
        None => "Anytime".to_string(),
    }
}

/// Accepts `14:30`, `2:30 pm`, `2:30PM` and `9am`.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let s = input.trim().to_lowercase().replace(' ', "");
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = NaiveTime::parse_from_str(&s, "%H:%M") {
        return Some(t);
    }
    let (body, pm) = if let Some(b) = s.strip_suffix("pm") {
        (b, true)
    } else if let Some(b) = s.strip_suffix("am") {
        (b, false)
    } else {
        return None;
    };
    let (h, m) = match body.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (body.parse::<u32>().ok()?, 0),
    };
    if !(1..=12).contains(&h) {
        return None;
    }
    let hour = match (h, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, m, 0)
}

/// Fields collected by the add-task form before they become a `NewTask`.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub time: String,
    pub category: String,
    pub note: String,
}

impl TaskDraft {
    pub fn into_new(self, user_id: &str, date: NaiveDate) -> Result<NewTask> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::validation("Please give the task a title"));
        }
        let scheduled_time = if self.time.trim().is_empty() {
            None
        } else {
            Some(parse_time(&self.time).ok_or_else(|| {
                Error::validation(format!("Could not read '{}' as a time (try 08:30 or 2pm)", self.time.trim()))
            })?)
        };
        Ok(NewTask {
            user_id: user_id.to_string(),
            task_date: date,
            title: title.to_string(),
            scheduled_time,
            is_completed: false,
            description: non_empty(&self.note),
            category: non_empty(&self.category),
        })
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, time: Option<(u32, u32)>, done: bool) -> Task {
        Task {
            id: title.into(),
            user_id: "u".into(),
            task_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            title: title.into(),
            scheduled_time: time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            is_completed: done,
            completed_at: None,
            description: None,
            category: None,
        }
    }

    #[test]
    fn progress_counts_completed() {
        let tasks = vec![task("a", None, true), task("b", None, false), task("c", None, false)];
        let p = Progress::of(&tasks);
        assert_eq!((p.completed, p.total), (1, 3));
        assert_eq!(p.percent(), 33);
        assert_eq!(Progress::of(&[]).ratio(), 0.0);
    }

    #[test]
    fn unscheduled_tasks_sort_last() {
        let mut tasks = vec![
            task("Read", None, false),
            task("Lunch", Some((12, 30)), false),
            task("Yoga", Some((8, 0)), true),
        ];
        sort_for_day(&mut tasks);
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Yoga", "Lunch", "Read"]);
    }

    #[test]
    fn filter_matches_status() {
        let done = task("a", None, true);
        let open = task("b", None, false);
        assert!(StatusFilter::Done.matches(&done) && !StatusFilter::Done.matches(&open));
        assert!(StatusFilter::Pending.matches(&open) && !StatusFilter::Pending.matches(&done));
        assert_eq!(StatusFilter::Done.cycle(), StatusFilter::All);
    }

    #[test]
    fn times_parse_in_both_clocks() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(parse_time("14:30"), t(14, 30));
        assert_eq!(parse_time("2:30 pm"), t(14, 30));
        assert_eq!(parse_time("9am"), t(9, 0));
        assert_eq!(parse_time("12am"), t(0, 0));
        assert_eq!(parse_time("12:15PM"), t(12, 15));
        assert_eq!(parse_time("13pm"), None);
        assert_eq!(parse_time("soon"), None);
        assert_eq!(time_label(t(8, 0)), "08:00 AM");
        assert_eq!(time_label(None), "Anytime");
    }

    #[test]
    fn draft_requires_title_and_readable_time() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let empty = TaskDraft { title: "  ".into(), ..Default::default() };
        assert!(matches!(empty.into_new("u", day), Err(Error::Validation(_))));

        let bad_time = TaskDraft { title: "Yoga".into(), time: "later".into(), ..Default::default() };
        assert!(bad_time.into_new("u", day).is_err());

        let ok = TaskDraft {
            title: " Yoga ".into(),
            time: "8am".into(),
            category: "".into(),
            note: "stretch more".into(),
        }
        .into_new("u", day)
        .unwrap();
        assert_eq!(ok.title, "Yoga");
        assert_eq!(ok.category, None);
        assert_eq!(ok.description.as_deref(), Some("stretch more"));
        assert_eq!(ok.scheduled_time, NaiveTime::from_hms_opt(8, 0, 0));
    }
}
