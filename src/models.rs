use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood tag attached to a diary entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Loved,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Neutral, Mood::Sad, Mood::Loved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Loved => "loved",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Mood::Happy => ":)",
            Mood::Neutral => ":|",
            Mood::Sad => ":(",
            Mood::Loved => "<3",
        }
    }

    /// Next mood in picker order, wrapping around.
    pub fn cycle(self) -> Mood {
        let i = Mood::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mood::ALL[(i + 1) % Mood::ALL.len()]
    }

    /// Happy and loved entries render as bright notes on the canvas.
    pub fn is_bright(&self) -> bool {
        matches!(self, Mood::Happy | Mood::Loved)
    }

    pub fn parse(s: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|m| m.as_str() == s.trim().to_lowercase())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather tag attached to a diary entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Sunny, Weather::Cloudy, Weather::Rainy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
        }
    }

    pub fn cycle(self) -> Weather {
        let i = Weather::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Weather::ALL[(i + 1) % Weather::ALL.len()]
    }

    pub fn parse(s: &str) -> Option<Weather> {
        Weather::ALL.into_iter().find(|w| w.as_str() == s.trim().to_lowercase())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an inspiration belongs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Games,
    Cocktails,
    Travel,
    Books,
    Cooking,
    Fitness,
    Art,
    Nature,
    Language,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Games,
        Category::Cocktails,
        Category::Travel,
        Category::Books,
        Category::Cooking,
        Category::Fitness,
        Category::Art,
        Category::Nature,
        Category::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Games => "games",
            Category::Cocktails => "cocktails",
            Category::Travel => "travel",
            Category::Books => "books",
            Category::Cooking => "cooking",
            Category::Fitness => "fitness",
            Category::Art => "art",
            Category::Nature => "nature",
            Category::Language => "language",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Cocktails => "Cocktails",
            Category::Travel => "Travel",
            Category::Books => "Books",
            Category::Cooking => "Cooking",
            Category::Fitness => "Fitness",
            Category::Art => "Art",
            Category::Nature => "Nature",
            Category::Language => "Language",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s.trim().to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A diary entry as stored by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    /// Identifier assigned by the backend.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Day the entry is about.
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub weather: Option<Weather>,
    /// Creation timestamp assigned by the backend.
    pub created_at: DateTime<Utc>,
}

/// A task on the daily list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    /// Day the task is planned for.
    pub task_date: NaiveDate,
    pub title: String,
    /// Optional time of day the task is scheduled at.
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_completed: bool,
    /// Set when the task is marked done, cleared when reopened.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-text note shown under the task.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A captured idea on the inspiration board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Inspiration {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_practiced: bool,
    pub created_at: DateTime<Utc>,
}

impl Inspiration {
    /// Title if present, otherwise the raw content.
    pub fn label(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(&self.content)
    }
}

/// Read-only user profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Insert payload for `diary_entries`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewDiaryEntry {
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<Mood>,
    pub weather: Option<Weather>,
}

/// Partial update for a diary entry. `None` leaves a column untouched;
/// `Some(None)` on a nullable column clears it.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DiaryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Option<Mood>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Option<Weather>>,
}

/// Insert payload for `tasks`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewTask {
    pub user_id: String,
    pub task_date: NaiveDate,
    pub title: String,
    pub scheduled_time: Option<NaiveTime>,
    pub is_completed: bool,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Partial update for a task.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<Option<NaiveTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
}

/// Insert payload for `inspirations`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewInspiration {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub category: Option<Category>,
    pub is_practiced: bool,
}

/// Partial update for an inspiration.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct InspirationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_practiced: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_only_serializes_touched_columns() {
        let patch = TaskPatch {
            is_completed: Some(true),
            description: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "is_completed": true, "description": null }));
    }

    #[test]
    fn task_row_tolerates_missing_optional_columns() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "user_id": "u1",
            "task_date": "2026-10-17",
            "title": "Morning Yoga",
            "scheduled_time": "08:00:00"
        }))
        .unwrap();
        assert!(!task.is_completed);
        assert_eq!(task.scheduled_time, NaiveTime::from_hms_opt(8, 0, 0));
        assert!(task.description.is_none());
    }

    #[test]
    fn mood_cycles_through_all_values() {
        let mut mood = Mood::Happy;
        for _ in 0..Mood::ALL.len() {
            mood = mood.cycle();
        }
        assert_eq!(mood, Mood::Happy);
        assert_eq!(Mood::parse(" Loved "), Some(Mood::Loved));
        assert_eq!(Category::parse("art"), Some(Category::Art));
        assert_eq!(Weather::parse("foggy"), None);
    }
}
