use std::time::{Duration, Instant};
use chrono::{Local, NaiveDate, Timelike, Utc};
use ratatui::widgets::TableState;
use crate::error::Result;
use crate::journal::Journal;
use crate::models::{Inspiration, Task, TaskPatch};
use crate::views::dashboard::{CheckIn, Overview};
use crate::views::diary::{Canvas, DiaryDraft};
use crate::views::inspiration::{Bubble, BubbleMap, CaptureDraft, PracticeFilter, QUICK_TAGS};
use crate::views::tasks::{sort_for_day, Progress, StatusFilter, TaskDraft};

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Diary,
    Inspiration,
    Tasks,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Dashboard, Section::Diary, Section::Inspiration, Section::Tasks];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Diary => "Diary",
            Section::Inspiration => "Inspiration",
            Section::Tasks => "Daily Tasks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryView {
    Write,
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspirationView {
    Capture,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    None,
    DiaryTitle,
    DiaryContent,
    Reflection,
    IdeaContent,
    CustomTag,
    TaskNote,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Debug, Default)]
pub struct AddState {
    pub draft: TaskDraft,
    pub step: usize, // 0: Title, 1: Time, 2: Category, 3: Note
}

pub struct App {
    journal: Journal,
    configured_name: Option<String>,
    pub section: Section,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub toast: Option<Toast>,

    pub overview: Option<Overview>,
    pub privacy: bool,
    pub check_in: Option<CheckIn>,

    pub diary_view: DiaryView,
    pub draft: DiaryDraft,
    pub canvas: Canvas,
    pub selected_note: Option<String>,

    pub inspiration_view: InspirationView,
    pub capture: CaptureDraft,
    pub tag_cursor: usize,
    pub ideas: Vec<Inspiration>,
    bubble_map: BubbleMap,
    pub bubbles: Vec<Bubble>,
    pub practice_filter: PracticeFilter,
    pub selected_idea: Option<String>,

    pub task_date: NaiveDate,
    pub tasks: Vec<Task>,
    pub task_filter: StatusFilter,
    pub task_state: TableState,
    pub add_state: AddState,
    pub target_id: Option<String>,
}

/// Next (or previous) id in `ids` after `current`, wrapping around.
fn step_id(ids: &[&str], current: Option<&str>, forward: bool) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    let next = match current.and_then(|c| ids.iter().position(|id| *id == c)) {
        Some(i) if forward => (i + 1) % ids.len(),
        Some(i) => (i + ids.len() - 1) % ids.len(),
        None => 0,
    };
    Some(ids[next].to_string())
}

impl App {
    /// Creates the app on the dashboard and loads it.
    pub fn new(journal: Journal, configured_name: Option<String>) -> App {
        let mut app = App {
            journal,
            configured_name,
            section: Section::Dashboard,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            toast: None,
            overview: None,
            privacy: false,
            check_in: None,
            diary_view: DiaryView::Write,
            draft: DiaryDraft::default(),
            canvas: Canvas::default(),
            selected_note: None,
            inspiration_view: InspirationView::Capture,
            capture: CaptureDraft::default(),
            tag_cursor: 0,
            ideas: Vec::new(),
            bubble_map: BubbleMap::default(),
            bubbles: Vec::new(),
            practice_filter: PracticeFilter::All,
            selected_idea: None,
            task_date: Local::now().date_naive(),
            tasks: Vec::new(),
            task_filter: StatusFilter::All,
            task_state: TableState::default(),
            add_state: AddState::default(),
            target_id: None,
        };
        app.reload();
        app
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), is_error: false, shown_at: Instant::now() });
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.toast = Some(Toast { message, is_error: true, shown_at: Instant::now() });
    }

    /// Turns a failed action into an error toast.
    fn check<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    /// Drops the toast once it has been up for `TOAST_TTL`.
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_TTL) {
            self.toast = None;
        }
    }

    /// Switches section. Entering a section discards its view state and
    /// fetches fresh data.
    pub fn enter(&mut self, section: Section) {
        self.section = section;
        match section {
            Section::Diary => {
                self.diary_view = DiaryView::Write;
                self.draft = DiaryDraft::default();
                self.canvas = Canvas::default();
                self.selected_note = None;
            }
            Section::Inspiration => {
                self.inspiration_view = InspirationView::Capture;
                self.capture.clear();
                self.tag_cursor = 0;
                self.bubble_map = BubbleMap::default();
                self.practice_filter = PracticeFilter::All;
                self.selected_idea = None;
            }
            Section::Tasks => {
                self.task_date = Local::now().date_naive();
                self.task_filter = StatusFilter::All;
                self.task_state.select(None);
            }
            Section::Dashboard => {
                self.privacy = false;
                self.check_in = None;
            }
        }
        self.reload();
    }

    /// Refetches the records the current section shows.
    pub fn reload(&mut self) {
        match self.section {
            Section::Dashboard => {
                let overview = self.load_overview();
                self.overview = self.check(overview);
            }
            Section::Diary => {
                let entries = self.journal.diary_entries();
                if let Some(entries) = self.check(entries) {
                    let filter = self.canvas.filter;
                    self.canvas = Canvas::new(entries);
                    self.canvas.filter = filter;
                }
            }
            Section::Inspiration => {
                let ideas = self.journal.inspirations();
                if let Some(ideas) = self.check(ideas) {
                    self.ideas = ideas;
                    self.relayout();
                }
            }
            Section::Tasks => {
                let tasks = self.journal.tasks_on(self.task_date);
                if let Some(mut tasks) = self.check(tasks) {
                    sort_for_day(&mut tasks);
                    self.tasks = tasks;
                }
                self.clamp_task_selection();
            }
        }
    }

    fn load_overview(&self) -> Result<Overview> {
        let now = Local::now();
        let today = now.date_naive();
        let mut tasks = self.journal.tasks_on(today)?;
        sort_for_day(&mut tasks);
        let latest = self.journal.latest_diary_entry()?;
        let ideas = self.journal.inspirations()?;
        let name = self.journal.display_name(self.configured_name.as_deref());
        Ok(Overview::build(today, now.hour(), &name, tasks, latest.as_ref(), &ideas))
    }

    // Dashboard

    pub fn toggle_privacy(&mut self) {
        self.privacy = !self.privacy;
    }

    pub fn cycle_check_in(&mut self) {
        let next = match self.check_in {
            None => CheckIn::ALL[0],
            Some(c) => c.cycle(),
        };
        self.check_in = Some(next);
    }

    // Diary

    /// Saves the draft, then shows it on the canvas.
    pub fn save_diary(&mut self) {
        let today = Local::now().date_naive();
        let saved = self
            .draft
            .to_new(self.journal.user_id(), today)
            .and_then(|entry| self.journal.save_diary_entry(&entry));
        if let Some(entry) = self.check(saved) {
            self.draft.clear_text();
            self.diary_view = DiaryView::Canvas;
            self.reload();
            self.selected_note = Some(entry.id);
            self.notify("Diary entry saved");
        }
    }

    pub fn discard_diary(&mut self) {
        self.draft.discard();
    }

    pub fn toggle_diary_view(&mut self) {
        self.diary_view = match self.diary_view {
            DiaryView::Write => DiaryView::Canvas,
            DiaryView::Canvas => DiaryView::Write,
        };
        if self.diary_view == DiaryView::Canvas {
            self.reload();
        }
    }

    /// Selects the next visible note and brings it to the front.
    pub fn select_note(&mut self, forward: bool) {
        let next = {
            let visible = self.canvas.visible();
            let ids: Vec<&str> = visible.iter().map(|n| n.entry.id.as_str()).collect();
            step_id(&ids, self.selected_note.as_deref(), forward)
        };
        if let Some(id) = &next {
            self.canvas.raise(id);
        }
        self.selected_note = next;
    }

    pub fn drag_note(&mut self, dx: i32, dy: i32) {
        if let Some(id) = self.selected_note.clone() {
            self.canvas.drag(&id, dx, dy);
        }
    }

    pub fn cycle_mood_filter(&mut self) {
        self.canvas.filter = self.canvas.filter.cycle();
        let still_visible = self
            .selected_note
            .as_deref()
            .is_some_and(|id| self.canvas.visible().iter().any(|n| n.entry.id == id));
        if !still_visible {
            self.selected_note = None;
        }
    }

    pub fn delete_selected_note(&mut self) {
        if let Some(id) = self.selected_note.take() {
            let deleted = self.journal.delete_diary_entry(&id);
            if self.check(deleted).is_some() {
                self.canvas.remove(&id);
                self.notify("Diary entry deleted");
            }
        }
    }

    // Inspiration

    pub fn visible_ideas(&self) -> Vec<Inspiration> {
        self.ideas.iter().filter(|i| self.practice_filter.matches(i)).cloned().collect()
    }

    /// Places every idea, not just the visible ones, so the filter never
    /// moves a bubble.
    fn relayout(&mut self) {
        self.bubbles = self.bubble_map.layout(&self.ideas, Utc::now());
    }

    pub fn visible_bubbles(&self) -> Vec<&Bubble> {
        self.bubbles.iter().filter(|b| self.practice_filter.matches(&b.idea)).collect()
    }

    pub fn save_idea(&mut self) {
        let saved = self
            .capture
            .to_new(self.journal.user_id())
            .and_then(|idea| self.journal.capture_inspiration(&idea));
        if let Some(idea) = self.check(saved) {
            self.capture.clear();
            self.tag_cursor = 0;
            self.inspiration_view = InspirationView::Map;
            self.reload();
            self.selected_idea = Some(idea.id);
            self.notify("Inspiration captured");
        }
    }

    pub fn cancel_capture(&mut self) {
        self.capture.clear();
        self.tag_cursor = 0;
    }

    pub fn next_tag(&mut self) {
        self.tag_cursor = (self.tag_cursor + 1) % QUICK_TAGS.len();
    }

    pub fn toggle_current_tag(&mut self) {
        self.capture.toggle_tag(QUICK_TAGS[self.tag_cursor]);
    }

    pub fn toggle_inspiration_view(&mut self) {
        self.inspiration_view = match self.inspiration_view {
            InspirationView::Capture => InspirationView::Map,
            InspirationView::Map => InspirationView::Capture,
        };
        if self.inspiration_view == InspirationView::Map {
            self.reload();
        }
    }

    pub fn select_idea(&mut self, forward: bool) {
        let visible = self.visible_ideas();
        let ids: Vec<&str> = visible.iter().map(|i| i.id.as_str()).collect();
        self.selected_idea = step_id(&ids, self.selected_idea.as_deref(), forward);
    }

    pub fn cycle_practice_filter(&mut self) {
        self.practice_filter = self.practice_filter.cycle();
        let still_visible = self
            .selected_idea
            .as_deref()
            .is_some_and(|id| self.visible_ideas().iter().any(|i| i.id == id));
        if !still_visible {
            self.selected_idea = None;
        }
    }

    pub fn toggle_practiced(&mut self) {
        let Some(id) = self.selected_idea.clone() else { return };
        let Some(current) = self.ideas.iter().find(|i| i.id == id).map(|i| i.is_practiced) else { return };
        let updated = self.journal.set_practiced(&id, !current);
        if let Some(idea) = self.check(updated) {
            let msg = if idea.is_practiced { "Marked as practiced" } else { "Marked as not practiced yet" };
            if let Some(slot) = self.ideas.iter_mut().find(|i| i.id == idea.id) {
                *slot = idea;
            }
            self.relayout();
            self.notify(msg);
        }
    }

    pub fn delete_selected_idea(&mut self) {
        if let Some(id) = self.selected_idea.take() {
            let deleted = self.journal.delete_inspiration(&id);
            if self.check(deleted).is_some() {
                self.ideas.retain(|i| i.id != id);
                self.relayout();
                self.notify("Inspiration deleted");
            }
        }
    }

    // Tasks

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.task_filter.matches(t)).collect()
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.tasks)
    }

    fn selected_task(&self) -> Option<Task> {
        let i = self.task_state.selected()?;
        self.visible_tasks().get(i).map(|t| (*t).clone())
    }

    fn clamp_task_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.task_state.select(None);
        } else if let Some(i) = self.task_state.selected() {
            if i >= len {
                self.task_state.select(Some(len - 1));
            }
        } else {
            self.task_state.select(Some(0));
        }
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 { return; }
        let i = match self.task_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.task_state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 { return; }
        let i = match self.task_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.task_state.select(Some(i));
    }

    pub fn toggle_selected_task(&mut self) {
        let Some(task) = self.selected_task() else { return };
        let updated = self.journal.set_task_completed(&task.id, !task.is_completed);
        if let Some(updated) = self.check(updated) {
            if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
            }
            self.clamp_task_selection();
        }
    }

    pub fn delete_selected_task(&mut self) {
        let Some(task) = self.selected_task() else { return };
        let deleted = self.journal.delete_task(&task.id);
        if self.check(deleted).is_some() {
            self.tasks.retain(|t| t.id != task.id);
            self.clamp_task_selection();
            self.notify("Task deleted");
        }
    }

    pub fn cycle_task_filter(&mut self) {
        self.task_filter = self.task_filter.cycle();
        self.clamp_task_selection();
    }

    /// Moves the list to another day, relative to the one shown.
    pub fn shift_day(&mut self, days: i64) {
        self.task_date += chrono::Duration::days(days);
        self.task_state.select(None);
        self.reload();
    }

    pub fn go_to_today(&mut self) {
        self.task_date = Local::now().date_naive();
        self.task_state.select(None);
        self.reload();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Opens a text field, pre-filled with its current value.
    pub fn start_edit(&mut self, field: InputField) {
        self.input_buffer = match field {
            InputField::DiaryTitle => self.draft.title.clone(),
            InputField::DiaryContent => self.draft.content.clone(),
            InputField::IdeaContent => self.capture.content.clone(),
            InputField::CustomTag => String::new(),
            InputField::Reflection => {
                let Some(id) = self.selected_note.clone() else { return };
                let text = self.canvas.reflection(&id).unwrap_or_default().to_string();
                self.target_id = Some(id);
                text
            }
            InputField::TaskNote => {
                let Some(task) = self.selected_task() else { return };
                self.target_id = Some(task.id.clone());
                task.description.unwrap_or_default()
            }
            InputField::None => return,
        };
        self.input_field = field;
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
        self.target_id = None;
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        match self.add_state.step {
            0 => { // Title
                if !value.trim().is_empty() {
                    self.add_state.draft.title = value;
                    self.add_state.step += 1;
                }
            }
            1 => { // Time
                self.add_state.draft.time = value;
                self.add_state.step += 1;
            }
            2 => { // Category
                self.add_state.draft.category = value;
                self.add_state.step += 1;
            }
            _ => { // Note
                self.add_state.draft.note = value;
                let draft = std::mem::take(&mut self.add_state.draft);
                let added = draft
                    .into_new(self.journal.user_id(), self.task_date)
                    .and_then(|task| self.journal.add_task(&task));
                self.input_mode = InputMode::Normal;
                if self.check(added).is_some() {
                    self.reload();
                    self.notify("Task added");
                }
            }
        }
    }

    /// Commits the open text field.
    fn handle_editing_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        let target = self.target_id.take();
        match self.input_field {
            InputField::DiaryTitle => self.draft.title = value,
            InputField::DiaryContent => self.draft.content = value,
            InputField::IdeaContent => self.capture.content = value,
            InputField::CustomTag => self.capture.add_custom_tag(&value),
            InputField::Reflection => {
                if let Some(id) = target {
                    self.canvas.reflect(&id, &value);
                }
            }
            InputField::TaskNote => {
                if let Some(id) = target {
                    let note = value.trim();
                    let patch = TaskPatch {
                        description: Some(if note.is_empty() { None } else { Some(note.to_string()) }),
                        ..Default::default()
                    };
                    let updated = self.journal.update_task(&id, &patch);
                    if let Some(task) = self.check(updated) {
                        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                            *slot = task;
                        }
                    }
                }
            }
            InputField::None => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, Table};
    use crate::views::diary::MoodFilter;

    fn app_with(mem: &MemoryBackend) -> App {
        App::new(Journal::new(Box::new(mem.clone()), "faye"), Some("Faye".into()))
    }

    fn type_in(app: &mut App, text: &str) {
        app.input_buffer = text.to_string();
        app.handle_input();
    }

    #[test]
    fn wizard_adds_a_task_and_toggling_updates_progress() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Tasks);

        app.start_add();
        type_in(&mut app, "Morning yoga");
        type_in(&mut app, "7:30am");
        type_in(&mut app, "wellness");
        type_in(&mut app, "");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.progress(), Progress { completed: 0, total: 1 });

        app.toggle_selected_task();
        assert_eq!(app.progress().completed, 1);
        app.toggle_selected_task();
        assert_eq!(app.progress().completed, 0);
    }

    #[test]
    fn blank_diary_entry_is_not_saved() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Diary);

        app.start_edit(InputField::DiaryContent);
        type_in(&mut app, "   ");
        app.save_diary();

        let toast = app.toast.as_ref().unwrap();
        assert!(toast.is_error);
        assert_eq!(toast.message, "Please write something before saving");
        assert_eq!(app.diary_view, DiaryView::Write);
        assert!(mem.rows(Table::DiaryEntries).is_empty());
    }

    #[test]
    fn saving_a_diary_entry_opens_the_canvas() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Diary);

        app.start_edit(InputField::DiaryContent);
        type_in(&mut app, "Walked along the river at dusk.");
        app.save_diary();

        assert_eq!(app.diary_view, DiaryView::Canvas);
        assert_eq!(app.canvas.len(), 1);
        assert!(app.selected_note.is_some());
        assert!(app.draft.content.is_empty());

        app.start_edit(InputField::Reflection);
        type_in(&mut app, "Felt calm");
        let id = app.selected_note.clone().unwrap();
        assert_eq!(app.canvas.reflection(&id), Some("Felt calm"));
    }

    #[test]
    fn practiced_filter_narrows_the_map() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Inspiration);

        for idea in ["Learn a cocktail", "Visit Lisbon in spring"] {
            app.start_edit(InputField::IdeaContent);
            type_in(&mut app, idea);
            app.save_idea();
        }
        assert_eq!(app.inspiration_view, InspirationView::Map);
        assert_eq!(app.ideas.len(), 2);

        app.toggle_practiced();
        app.cycle_practice_filter();
        assert_eq!(app.practice_filter, PracticeFilter::Practiced);
        let practiced = app.visible_ideas();
        assert_eq!(practiced.len(), 1);
        assert!(practiced[0].is_practiced);

        app.cycle_practice_filter();
        let open = app.visible_ideas();
        assert_eq!(open.len(), 1);
        assert!(!open[0].is_practiced);
        assert_eq!(app.visible_bubbles().len(), 1);
    }

    #[test]
    fn map_spots_hold_through_filtering_and_deletes() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Inspiration);
        for idea in ["Learn a cocktail", "Visit Lisbon in spring", "Paint the fence", "Write to grandma"] {
            app.start_edit(InputField::IdeaContent);
            type_in(&mut app, idea);
            app.save_idea();
        }
        let spots = |app: &App| -> Vec<(String, crate::views::layout::Placement)> {
            app.visible_bubbles().iter().map(|b| (b.idea.id.clone(), b.place)).collect()
        };
        let before = spots(&app);
        assert_eq!(before.len(), 4);

        app.selected_idea = Some(before[1].0.clone());
        app.toggle_practiced();
        app.cycle_practice_filter();
        app.cycle_practice_filter();
        let open = spots(&app);
        assert_eq!(open.len(), 3);
        assert!(open.iter().all(|spot| before.contains(spot)));

        app.practice_filter = PracticeFilter::All;
        app.selected_idea = Some(before[2].0.clone());
        app.delete_selected_idea();
        let after = spots(&app);
        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|spot| before.contains(spot)));
    }

    #[test]
    fn reentering_a_section_discards_its_view_state() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Diary);
        app.start_edit(InputField::DiaryContent);
        type_in(&mut app, "Half a thought");
        app.cycle_mood_filter();
        assert!(!app.draft.content.is_empty());
        assert_ne!(app.canvas.filter, MoodFilter::All);

        app.enter(Section::Inspiration);
        app.start_edit(InputField::IdeaContent);
        type_in(&mut app, "Unsaved idea");
        app.next_tag();
        app.enter(Section::Diary);
        assert!(app.draft.content.is_empty());
        assert_eq!(app.canvas.filter, MoodFilter::All);

        app.enter(Section::Inspiration);
        assert!(app.capture.content.is_empty());
        assert_eq!(app.tag_cursor, 0);
    }

    #[test]
    fn entering_a_section_refetches() {
        let mem = MemoryBackend::new();
        let mut app = app_with(&mem);
        app.enter(Section::Tasks);
        assert!(app.tasks.is_empty());

        let other = Journal::new(Box::new(mem.clone()), "faye");
        crate::commands::cmd_task_add(&other, "Call mom".into(), None, None, None, None, true).unwrap();
        assert!(app.tasks.is_empty());

        app.enter(Section::Tasks);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.task_state.selected(), Some(0));
    }

    #[test]
    fn toast_expires_after_its_ttl() {
        let mut app = app_with(&MemoryBackend::new());
        app.notify("Saved");
        let shown = app.toast.as_ref().unwrap().shown_at;
        app.expire_toast(shown + Duration::from_secs(1));
        assert!(app.toast.is_some());
        app.expire_toast(shown + TOAST_TTL);
        assert!(app.toast.is_none());
    }

    #[test]
    fn days_step_back_and_forth() {
        let mut app = app_with(&MemoryBackend::new());
        app.enter(Section::Tasks);
        let today = app.task_date;
        app.shift_day(-1);
        assert_eq!(app.task_date, today.pred_opt().unwrap());
        app.go_to_today();
        assert_eq!(app.task_date, Local::now().date_naive());
    }
}
