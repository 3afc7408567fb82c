use std::collections::HashMap;
use chrono::NaiveDate;
use rand::Rng;
use crate::error::{Error, Result};
use crate::models::{DiaryEntry, Mood, NewDiaryEntry, Weather};
use super::layout::{rng_for, Placement};
use super::tasks::non_empty;

/// Text being written in the diary's Write view.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub weather: Weather,
}

impl Default for DiaryDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            mood: Mood::Happy,
            weather: Weather::Sunny,
        }
    }
}

impl DiaryDraft {
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Throws the draft away, tags included.
    pub fn discard(&mut self) {
        *self = DiaryDraft::default();
    }

    /// Builds the insert payload; blank content is rejected.
    pub fn to_new(&self, user_id: &str, date: NaiveDate) -> Result<NewDiaryEntry> {
        if self.content.trim().is_empty() {
            return Err(Error::validation("Please write something before saving"));
        }
        Ok(NewDiaryEntry {
            user_id: user_id.to_string(),
            entry_date: date,
            title: non_empty(&self.title),
            content: self.content.trim().to_string(),
            mood: Some(self.mood),
            weather: Some(self.weather),
        })
    }

    /// After a successful save title and text clear; the tags stay picked.
    pub fn clear_text(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

/// Canvas filter: everything or a single mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodFilter {
    #[default]
    All,
    Only(Mood),
}

impl MoodFilter {
    pub fn cycle(self) -> Self {
        match self {
            MoodFilter::All => MoodFilter::Only(Mood::ALL[0]),
            MoodFilter::Only(m) => {
                let next = m.cycle();
                if next == Mood::ALL[0] { MoodFilter::All } else { MoodFilter::Only(next) }
            }
        }
    }

    pub fn matches(&self, entry: &DiaryEntry) -> bool {
        match self {
            MoodFilter::All => true,
            MoodFilter::Only(m) => entry.mood == Some(*m),
        }
    }

    pub fn label(&self) -> String {
        match self {
            MoodFilter::All => "All".to_string(),
            MoodFilter::Only(m) => m.to_string(),
        }
    }
}

pub const CANVAS_WIDTH: u16 = 110;
pub const CANVAS_HEIGHT: u16 = 36;
pub const NOTE_WIDTH: u16 = 28;
pub const NOTE_HEIGHT: u16 = 8;

/// One diary entry pinned to the canvas.
#[derive(Debug, Clone)]
pub struct StickyNote {
    pub entry: DiaryEntry,
    pub place: Placement,
    /// Tilt in degrees, -3..=3.
    pub rotation: i8,
}

impl StickyNote {
    pub fn new(entry: DiaryEntry) -> Self {
        let mut rng = rng_for(&entry.id);
        let place = Placement {
            x: rng.gen_range(0..=CANVAS_WIDTH - NOTE_WIDTH),
            y: rng.gen_range(0..=CANVAS_HEIGHT - NOTE_HEIGHT),
            width: NOTE_WIDTH,
            height: NOTE_HEIGHT,
        };
        let rotation = rng.gen_range(-3..=3);
        Self { entry, place, rotation }
    }

    /// "Oct 12"
    pub fn date_label(&self) -> String {
        self.entry.entry_date.format("%b %d").to_string()
    }

    pub fn title(&self) -> &str {
        self.entry.title.as_deref().unwrap_or("Untitled")
    }
}

/// Memory Canvas: every entry as a draggable note plus per-note reflections.
/// Positions and reflections are view state and reset on the next fetch.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    notes: Vec<StickyNote>,
    pub filter: MoodFilter,
    reflections: HashMap<String, String>,
}

impl Canvas {
    pub fn new(entries: Vec<DiaryEntry>) -> Self {
        Self {
            notes: entries.into_iter().map(StickyNote::new).collect(),
            filter: MoodFilter::All,
            reflections: HashMap::new(),
        }
    }

    pub fn visible(&self) -> Vec<&StickyNote> {
        self.notes.iter().filter(|n| self.filter.matches(&n.entry)).collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Drags a note by `(dx, dy)` cells, keeping it fully on the canvas.
    pub fn drag(&mut self, id: &str, dx: i32, dy: i32) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.entry.id == id) {
            let max_x = i32::from(CANVAS_WIDTH - note.place.width);
            let max_y = i32::from(CANVAS_HEIGHT - note.place.height);
            note.place.x = (i32::from(note.place.x) + dx).clamp(0, max_x) as u16;
            note.place.y = (i32::from(note.place.y) + dy).clamp(0, max_y) as u16;
        }
    }

    /// Brings a note to the top of the stack.
    pub fn raise(&mut self, id: &str) {
        if let Some(i) = self.notes.iter().position(|n| n.entry.id == id) {
            let note = self.notes.remove(i);
            self.notes.push(note);
        }
    }

    pub fn reflect(&mut self, id: &str, text: &str) {
        match non_empty(text) {
            Some(t) => {
                self.reflections.insert(id.to_string(), t);
            }
            None => {
                self.reflections.remove(id);
            }
        }
    }

    pub fn reflection(&self, id: &str) -> Option<&str> {
        self.reflections.get(id).map(String::as_str)
    }

    /// Replaces an entry after an update, keeping where it was dragged to.
    pub fn replace(&mut self, entry: DiaryEntry) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.entry.id == entry.id) {
            note.entry = entry;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.notes.retain(|n| n.entry.id != id);
        self.reflections.remove(id);
    }
}
