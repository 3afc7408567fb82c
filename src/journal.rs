//! Typed record API scoped to one signed-in user.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use crate::auth;
use crate::config::{BackendKind, Settings};
use crate::error::{Error, Result};
use crate::models::{
    DiaryEntry, DiaryPatch, Inspiration, InspirationPatch, NewDiaryEntry, NewInspiration, NewTask,
    Profile, Task, TaskPatch,
};
use crate::store::{Backend, FileBackend, Query, RestBackend, Table};

const DEFAULT_NAME: &str = "Faye";

pub struct Journal {
    backend: Box<dyn Backend>,
    user_id: String,
}

fn decode<T: DeserializeOwned>(row: Value) -> Result<T> {
    Ok(serde_json::from_value(row)?)
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter().map(decode).collect()
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

impl Journal {
    pub fn new(backend: Box<dyn Backend>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        log::debug!("journal for {} on {}", user_id, backend.describe());
        Self { backend, user_id }
    }

    /// Picks the backend from settings. The remote backend needs a session
    /// cached by `faye login`.
    pub fn open(settings: &Settings) -> Result<Self> {
        match settings.backend_kind() {
            BackendKind::Local => {
                let backend = FileBackend::open(settings.data_dir())?;
                Ok(Self::new(Box::new(backend), settings.local_user.clone()))
            }
            BackendKind::Remote => {
                let (url, anon_key) = settings.supabase()?;
                let session = auth::load_session()?.ok_or(Error::NotSignedIn)?;
                let backend = RestBackend::new(url, anon_key, &session.access_token);
                Ok(Self::new(Box::new(backend), session.user_id))
            }
        }
    }

    /// Profile name, else the configured one, else "Faye". A failed profile
    /// lookup is logged and falls through.
    pub fn display_name(&self, configured: Option<&str>) -> String {
        let from_profile = match self.profile() {
            Ok(p) => p.and_then(|p| p.display_name).filter(|n| !n.trim().is_empty()),
            Err(e) => {
                log::warn!("profile lookup failed: {}", e);
                None
            }
        };
        from_profile
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }

    fn mine(&self) -> Query {
        Query::new().eq("user_id", self.user_id.as_str())
    }

    /// Display profile of the current user, if one exists.
    pub fn profile(&self) -> Result<Option<Profile>> {
        let rows = self
            .backend
            .select(Table::Profiles, &Query::new().eq("id", self.user_id.as_str()).limit(1))?;
        rows.into_iter().next().map(decode).transpose()
    }

    // Diary

    /// All entries, newest day first.
    pub fn diary_entries(&self) -> Result<Vec<DiaryEntry>> {
        let rows = self
            .backend
            .select(Table::DiaryEntries, &self.mine().order_desc("entry_date"))?;
        let mut entries: Vec<DiaryEntry> = decode_all(rows)?;
        // same-day entries: latest written first
        entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then(b.created_at.cmp(&a.created_at)));
        Ok(entries)
    }

    pub fn diary_entries_on(&self, date: NaiveDate) -> Result<Vec<DiaryEntry>> {
        let query = self.mine().eq("entry_date", date.to_string()).order_desc("created_at");
        decode_all(self.backend.select(Table::DiaryEntries, &query)?)
    }

    pub fn latest_diary_entry(&self) -> Result<Option<DiaryEntry>> {
        Ok(self.diary_entries()?.into_iter().next())
    }

    pub fn save_diary_entry(&self, entry: &NewDiaryEntry) -> Result<DiaryEntry> {
        let stored = self.backend.insert(Table::DiaryEntries, encode(entry)?)?;
        log::info!("saved diary entry for {}", entry.entry_date);
        decode(stored)
    }

    pub fn update_diary_entry(&self, id: &str, patch: &DiaryPatch) -> Result<DiaryEntry> {
        decode(self.backend.update(Table::DiaryEntries, id, encode(patch)?)?)
    }

    pub fn delete_diary_entry(&self, id: &str) -> Result<()> {
        self.backend.delete(Table::DiaryEntries, id)
    }

    // Tasks

    pub fn tasks_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let query = self.mine().eq("task_date", date.to_string()).order_asc("scheduled_time");
        decode_all(self.backend.select(Table::Tasks, &query)?)
    }

    pub fn add_task(&self, task: &NewTask) -> Result<Task> {
        let stored = self.backend.insert(Table::Tasks, encode(task)?)?;
        log::info!("added task '{}' on {}", task.title, task.task_date);
        decode(stored)
    }

    /// Marks a task done (stamping `completed_at`) or reopens it.
    pub fn set_task_completed(&self, id: &str, completed: bool) -> Result<Task> {
        let patch = TaskPatch {
            is_completed: Some(completed),
            completed_at: Some(if completed { Some(Utc::now()) } else { None }),
            ..Default::default()
        };
        self.update_task(id, &patch)
    }

    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        decode(self.backend.update(Table::Tasks, id, encode(patch)?)?)
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        self.backend.delete(Table::Tasks, id)
    }

    // Inspirations

    /// All captured ideas, newest first.
    pub fn inspirations(&self) -> Result<Vec<Inspiration>> {
        let query = self.mine().order_desc("created_at");
        decode_all(self.backend.select(Table::Inspirations, &query)?)
    }

    pub fn capture_inspiration(&self, idea: &NewInspiration) -> Result<Inspiration> {
        let stored = self.backend.insert(Table::Inspirations, encode(idea)?)?;
        log::info!("captured inspiration {:?}", idea.title);
        decode(stored)
    }

    pub fn set_practiced(&self, id: &str, practiced: bool) -> Result<Inspiration> {
        let patch = InspirationPatch { is_practiced: Some(practiced), ..Default::default() };
        self.update_inspiration(id, &patch)
    }

    pub fn update_inspiration(&self, id: &str, patch: &InspirationPatch) -> Result<Inspiration> {
        decode(self.backend.update(Table::Inspirations, id, encode(patch)?)?)
    }

    pub fn delete_inspiration(&self, id: &str) -> Result<()> {
        self.backend.delete(Table::Inspirations, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(user: &str, title: &str, day: &str) -> NewTask {
        NewTask {
            user_id: user.into(),
            task_date: date(day),
            title: title.into(),
            scheduled_time: None,
            is_completed: false,
            description: None,
            category: None,
        }
    }

    #[test]
    fn lists_only_the_current_users_records() {
        let mem = MemoryBackend::new();
        let faye = Journal::new(Box::new(mem.clone()), "faye");
        let other = Journal::new(Box::new(mem.clone()), "other");

        faye.add_task(&new_task("faye", "Mine", "2026-10-17")).unwrap();
        other.add_task(&new_task("other", "Theirs", "2026-10-17")).unwrap();

        let tasks = faye.tasks_on(date("2026-10-17")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Mine");
        assert_eq!(mem.rows(Table::Tasks).len(), 2);
    }

    #[test]
    fn completing_stamps_and_reopening_clears() {
        let journal = Journal::new(Box::new(MemoryBackend::new()), "faye");
        let task = journal.add_task(&new_task("faye", "Yoga", "2026-10-17")).unwrap();

        let done = journal.set_task_completed(&task.id, true).unwrap();
        assert!(done.is_completed);
        assert!(done.completed_at.is_some());

        let reopened = journal.set_task_completed(&task.id, false).unwrap();
        assert!(!reopened.is_completed);
        assert!(reopened.completed_at.is_none());
    }

    #[test]
    fn missing_profile_is_none() {
        let mem = MemoryBackend::new();
        let journal = Journal::new(Box::new(mem.clone()), "faye");
        assert!(journal.profile().unwrap().is_none());

        assert_eq!(journal.display_name(Some("Configured")), "Configured");
        assert_eq!(journal.display_name(None), "Faye");

        mem.seed(Table::Profiles, json!({ "id": "faye", "display_name": "Faye W." }));
        let profile = journal.profile().unwrap().unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Faye W."));
        assert_eq!(journal.display_name(Some("Configured")), "Faye W.");
    }

    #[test]
    fn local_settings_open_a_file_journal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: Some(dir.path().to_path_buf()),
            local_user: "faye".into(),
            ..Default::default()
        };
        let journal = Journal::open(&settings).unwrap();
        assert_eq!(journal.user_id(), "faye");
        assert!(journal.backend_name().starts_with("file:"));
    }

    #[test]
    fn diary_entries_come_back_newest_first() {
        let journal = Journal::new(Box::new(MemoryBackend::new()), "faye");
        for day in ["2026-10-12", "2026-10-18", "2026-10-14"] {
            journal
                .save_diary_entry(&NewDiaryEntry {
                    user_id: "faye".into(),
                    entry_date: date(day),
                    title: None,
                    content: format!("entry {}", day),
                    mood: None,
                    weather: None,
                })
                .unwrap();
        }
        let days: Vec<_> = journal.diary_entries().unwrap().iter().map(|e| e.entry_date).collect();
        assert_eq!(days, vec![date("2026-10-18"), date("2026-10-14"), date("2026-10-12")]);
        assert_eq!(journal.diary_entries_on(date("2026-10-14")).unwrap().len(), 1);
        assert_eq!(journal.latest_diary_entry().unwrap().unwrap().entry_date, date("2026-10-18"));
    }
}
