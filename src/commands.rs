use chrono::{Local, NaiveDate, Timelike};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::auth::{self, AuthClient, Credentials};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::journal::Journal;
use crate::models::{Category, DiaryEntry, DiaryPatch, Inspiration, InspirationPatch, Mood, Task, TaskPatch, Weather};
use crate::views::dashboard::Overview;
use crate::views::diary::DiaryDraft;
use crate::views::inspiration::{CaptureDraft, PracticeFilter};
use crate::views::tasks::{parse_time, sort_for_day, time_label, StatusFilter, TaskDraft};

/// Parses `YYYY-MM-DD`, defaulting to today.
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(d) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
            .map_err(|e| Error::validation(format!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e))),
    }
}

fn parse_mood(s: &str) -> Result<Mood> {
    Mood::parse(s).ok_or_else(|| Error::validation(format!("Unknown mood '{}'. Use happy, neutral, sad or loved.", s)))
}

fn parse_weather(s: &str) -> Result<Weather> {
    Weather::parse(s).ok_or_else(|| Error::validation(format!("Unknown weather '{}'. Use sunny, cloudy or rainy.", s)))
}

fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        Error::validation(format!("Unknown category '{}'. Use one of: {}.", s, names.join(", ")))
    })
}

/// First eight characters, enough to tell records apart on screen.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Finds the single record whose id starts with `prefix`.
pub fn resolve<'a, T>(items: &'a [T], prefix: &str, id_of: impl Fn(&T) -> &str, what: &str) -> Result<&'a T> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(Error::validation("Please give a record id"));
    }
    if let Some(exact) = items.iter().find(|t| id_of(t) == prefix) {
        return Ok(exact);
    }
    let matches: Vec<&T> = items.iter().filter(|t| id_of(t).starts_with(prefix)).collect();
    match matches.len() {
        0 => Err(Error::NotFound { table: what.to_string(), id: prefix.to_string() }),
        1 => Ok(matches[0]),
        n => Err(Error::validation(format!("'{}' matches {} {} records, use a longer id", prefix, n, what))),
    }
}

fn bold(s: &str) -> Cell {
    Cell::new(s).add_attribute(Attribute::Bold)
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| bold(h)).collect::<Vec<_>>());
    table
}

/// Prints today's overview: greeting, task progress, last entry and spark.
pub fn cmd_dashboard(journal: &Journal, configured_name: Option<&str>) -> Result<Overview> {
    let now = Local::now();
    let today = now.date_naive();
    let mut tasks = journal.tasks_on(today)?;
    sort_for_day(&mut tasks);
    let latest = journal.latest_diary_entry()?;
    let ideas = journal.inspirations()?;
    let name = journal.display_name(configured_name);
    let overview = Overview::build(today, now.hour(), &name, tasks, latest.as_ref(), &ideas);

    println!("{}", overview.heading.to_uppercase());
    println!("{}, {}\n", overview.greeting, overview.name);
    println!("Reflect & Unwind   ({})", overview.last_entry);
    println!(
        "Daily Focus        {} of {} completed ({}%)",
        overview.progress.completed,
        overview.progress.total,
        overview.progress.percent()
    );
    for t in &overview.tasks {
        let mark = if t.is_completed { "[x]" } else { "[ ]" };
        println!("  {} {}  {}", mark, time_label(t.scheduled_time), t.title);
    }
    println!("Daily Spark        \"{}\"", overview.spark);
    Ok(overview)
}

// Diary

/// Saves a diary entry for `date` (default today).
pub fn cmd_diary_write(
    journal: &Journal,
    content: String,
    title: Option<String>,
    mood: Option<String>,
    weather: Option<String>,
    date: Option<String>,
    silent: bool,
) -> Result<DiaryEntry> {
    let mut draft = DiaryDraft { content, title: title.unwrap_or_default(), ..Default::default() };
    if let Some(m) = mood {
        draft.mood = parse_mood(&m)?;
    }
    if let Some(w) = weather {
        draft.weather = parse_weather(&w)?;
    }
    let day = parse_date(date.as_deref())?;
    let entry = journal.save_diary_entry(&draft.to_new(journal.user_id(), day)?)?;
    if !silent { println!("Diary entry saved (id = {})", short_id(&entry.id)); }
    Ok(entry)
}

/// Lists diary entries, newest first, optionally for one day or mood.
pub fn cmd_diary_list(journal: &Journal, date: Option<String>, mood: Option<String>, silent: bool) -> Result<Vec<DiaryEntry>> {
    let mut entries = match date {
        Some(d) => journal.diary_entries_on(parse_date(Some(&d))?)?,
        None => journal.diary_entries()?,
    };
    if let Some(m) = mood {
        let mood = parse_mood(&m)?;
        entries.retain(|e| e.mood == Some(mood));
    }
    if silent {
        return Ok(entries);
    }
    if entries.is_empty() {
        println!("No diary entries found.");
        return Ok(entries);
    }

    let mut table = new_table(&["ID", "Date", "Title", "Mood", "Weather", "Entry"]);
    for e in &entries {
        let mood_color = match e.mood {
            Some(m) if m.is_bright() => Color::Magenta,
            Some(_) => Color::Blue,
            None => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(short_id(&e.id)),
            Cell::new(e.entry_date),
            Cell::new(e.title.clone().unwrap_or_default()),
            Cell::new(e.mood.map(|m| m.to_string()).unwrap_or_default()).fg(mood_color),
            Cell::new(e.weather.map(|w| w.to_string()).unwrap_or_default()),
            Cell::new(&e.content),
        ]);
    }
    println!("{table}");
    Ok(entries)
}

/// Edits text or tags of an existing entry.
pub fn cmd_diary_edit(
    journal: &Journal,
    id: String,
    title: Option<String>,
    content: Option<String>,
    mood: Option<String>,
    weather: Option<String>,
    silent: bool,
) -> Result<DiaryEntry> {
    let entries = journal.diary_entries()?;
    let target = resolve(&entries, &id, |e| e.id.as_str(), "diary_entries")?;
    let mut patch = DiaryPatch::default();
    if let Some(t) = title {
        let t = t.trim().to_string();
        patch.title = Some(if t.is_empty() { None } else { Some(t) });
    }
    if let Some(c) = content {
        if c.trim().is_empty() {
            return Err(Error::validation("Please write something before saving"));
        }
        patch.content = Some(c.trim().to_string());
    }
    if let Some(m) = mood {
        patch.mood = Some(Some(parse_mood(&m)?));
    }
    if let Some(w) = weather {
        patch.weather = Some(Some(parse_weather(&w)?));
    }
    let updated = journal.update_diary_entry(&target.id, &patch)?;
    if !silent { println!("Diary entry {} updated.", short_id(&updated.id)); }
    Ok(updated)
}

pub fn cmd_diary_remove(journal: &Journal, id: String, silent: bool) -> Result<()> {
    let entries = journal.diary_entries()?;
    let target = resolve(&entries, &id, |e| e.id.as_str(), "diary_entries")?;
    journal.delete_diary_entry(&target.id)?;
    if !silent { println!("Diary entry {} removed.", short_id(&target.id)); }
    Ok(())
}

// Tasks

/// Adds a task to the list for `date` (default today).
pub fn cmd_task_add(
    journal: &Journal,
    title: String,
    time: Option<String>,
    category: Option<String>,
    note: Option<String>,
    date: Option<String>,
    silent: bool,
) -> Result<Task> {
    let draft = TaskDraft {
        title,
        time: time.unwrap_or_default(),
        category: category.unwrap_or_default(),
        note: note.unwrap_or_default(),
    };
    let day = parse_date(date.as_deref())?;
    let task = journal.add_task(&draft.into_new(journal.user_id(), day)?)?;
    if !silent { println!("Task added (id = {})", short_id(&task.id)); }
    Ok(task)
}

/// Lists the day's tasks in schedule order with a progress line.
pub fn cmd_task_list(journal: &Journal, date: Option<String>, filter: StatusFilter, silent: bool) -> Result<Vec<Task>> {
    let day = parse_date(date.as_deref())?;
    let mut tasks = journal.tasks_on(day)?;
    sort_for_day(&mut tasks);
    let done = tasks.iter().filter(|t| t.is_completed).count();
    let total = tasks.len();
    tasks.retain(|t| filter.matches(t));
    if silent {
        return Ok(tasks);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(tasks);
    }

    let mut table = new_table(&["ID", "Time", "Task", "Category", "Note", "Status"]);
    for t in &tasks {
        let (status, status_color) = if t.is_completed { ("Done", Color::Green) } else { ("Pending", Color::Yellow) };
        table.add_row(vec![
            Cell::new(short_id(&t.id)),
            Cell::new(time_label(t.scheduled_time)),
            Cell::new(&t.title),
            Cell::new(t.category.clone().unwrap_or_default()),
            Cell::new(t.description.clone().unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
    }
    println!("{table}");
    println!("{} of {} completed", done, total);
    Ok(tasks)
}

fn find_task(journal: &Journal, id: &str, date: Option<&str>) -> Result<Task> {
    let tasks = journal.tasks_on(parse_date(date)?)?;
    resolve(&tasks, id, |t| t.id.as_str(), "tasks").cloned()
}

/// Marks a task done or reopens it.
pub fn cmd_task_set_done(journal: &Journal, id: String, done: bool, date: Option<String>, silent: bool) -> Result<Task> {
    let task = find_task(journal, &id, date.as_deref())?;
    let updated = journal.set_task_completed(&task.id, done)?;
    if !silent {
        let state = if done { "complete" } else { "pending" };
        println!("Task {} marked as {}.", short_id(&updated.id), state);
    }
    Ok(updated)
}

/// Sets the note under a task; an empty note removes it.
pub fn cmd_task_note(journal: &Journal, id: String, note: String, date: Option<String>, silent: bool) -> Result<Task> {
    let task = find_task(journal, &id, date.as_deref())?;
    let trimmed = note.trim();
    let patch = TaskPatch {
        description: Some(if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }),
        ..Default::default()
    };
    let updated = journal.update_task(&task.id, &patch)?;
    if !silent { println!("Task {} note updated.", short_id(&updated.id)); }
    Ok(updated)
}

/// Edits a task. `time` of "none" unschedules it; `move_to` reschedules it
/// to another day.
#[allow(clippy::too_many_arguments)]
pub fn cmd_task_edit(
    journal: &Journal,
    id: String,
    title: Option<String>,
    time: Option<String>,
    category: Option<String>,
    move_to: Option<String>,
    date: Option<String>,
    silent: bool,
) -> Result<Task> {
    let task = find_task(journal, &id, date.as_deref())?;
    let mut patch = TaskPatch::default();
    if let Some(t) = title {
        if t.trim().is_empty() {
            return Err(Error::validation("Please give the task a title"));
        }
        patch.title = Some(t.trim().to_string());
    }
    if let Some(t) = time {
        patch.scheduled_time = Some(if t.trim().eq_ignore_ascii_case("none") {
            None
        } else {
            Some(parse_time(&t).ok_or_else(|| Error::validation(format!("Could not read '{}' as a time", t)))?)
        });
    }
    if let Some(c) = category {
        let c = c.trim().to_string();
        patch.category = Some(if c.is_empty() { None } else { Some(c) });
    }
    if let Some(d) = move_to {
        patch.task_date = Some(parse_date(Some(&d))?);
    }
    let updated = journal.update_task(&task.id, &patch)?;
    if !silent { println!("Task {} updated.", short_id(&updated.id)); }
    Ok(updated)
}

pub fn cmd_task_remove(journal: &Journal, id: String, date: Option<String>, silent: bool) -> Result<()> {
    let task = find_task(journal, &id, date.as_deref())?;
    journal.delete_task(&task.id)?;
    if !silent { println!("Task {} removed.", short_id(&task.id)); }
    Ok(())
}

// Inspirations

/// Captures an idea; its title is the first three words.
pub fn cmd_idea_add(journal: &Journal, content: String, category: Option<String>, silent: bool) -> Result<Inspiration> {
    let draft = CaptureDraft {
        category: category.as_deref().map(parse_category).transpose()?,
        content,
        tags: Vec::new(),
    };
    let idea = journal.capture_inspiration(&draft.to_new(journal.user_id())?)?;
    if !silent { println!("Inspiration saved (id = {})", short_id(&idea.id)); }
    Ok(idea)
}

pub fn cmd_idea_list(journal: &Journal, filter: PracticeFilter, silent: bool) -> Result<Vec<Inspiration>> {
    let mut ideas = journal.inspirations()?;
    ideas.retain(|i| filter.matches(i));
    if silent {
        return Ok(ideas);
    }
    if ideas.is_empty() {
        println!("No inspirations found.");
        return Ok(ideas);
    }

    let mut table = new_table(&["ID", "Title", "Category", "Idea", "Practiced", "Captured"]);
    for i in &ideas {
        table.add_row(vec![
            Cell::new(short_id(&i.id)),
            Cell::new(i.title.clone().unwrap_or_default()),
            Cell::new(i.category.map(|c| c.label()).unwrap_or("")),
            Cell::new(&i.content),
            Cell::new(if i.is_practiced { "Yes" } else { "No" })
                .fg(if i.is_practiced { Color::Green } else { Color::Grey }),
            Cell::new(i.created_at.with_timezone(&Local).format("%Y-%m-%d")),
        ]);
    }
    println!("{table}");
    Ok(ideas)
}

pub fn cmd_idea_practice(journal: &Journal, id: String, practiced: bool, silent: bool) -> Result<Inspiration> {
    let ideas = journal.inspirations()?;
    let target = resolve(&ideas, &id, |i| i.id.as_str(), "inspirations")?;
    let updated = journal.set_practiced(&target.id, practiced)?;
    if !silent {
        let state = if practiced { "practiced" } else { "not practiced yet" };
        println!("Inspiration {} marked as {}.", short_id(&updated.id), state);
    }
    Ok(updated)
}

/// Rewrites an idea (its title follows the new text) or recategorizes it.
/// A category of "none" clears it.
pub fn cmd_idea_edit(
    journal: &Journal,
    id: String,
    content: Option<String>,
    category: Option<String>,
    silent: bool,
) -> Result<Inspiration> {
    let ideas = journal.inspirations()?;
    let target = resolve(&ideas, &id, |i| i.id.as_str(), "inspirations")?;
    let mut patch = InspirationPatch::default();
    if let Some(c) = content {
        let draft = CaptureDraft { content: c, ..Default::default() };
        let new = draft.to_new(journal.user_id())?;
        patch.title = Some(new.title);
        patch.content = Some(new.content);
    }
    if let Some(c) = category {
        patch.category = Some(if c.trim().eq_ignore_ascii_case("none") { None } else { Some(parse_category(&c)?) });
    }
    let updated = journal.update_inspiration(&target.id, &patch)?;
    if !silent { println!("Inspiration {} updated.", short_id(&updated.id)); }
    Ok(updated)
}

pub fn cmd_idea_remove(journal: &Journal, id: String, silent: bool) -> Result<()> {
    let ideas = journal.inspirations()?;
    let target = resolve(&ideas, &id, |i| i.id.as_str(), "inspirations")?;
    journal.delete_inspiration(&target.id)?;
    if !silent { println!("Inspiration {} removed.", short_id(&target.id)); }
    Ok(())
}

// Account

fn auth_client(settings: &Settings) -> Result<AuthClient> {
    let (url, anon_key) = settings.supabase()?;
    Ok(AuthClient::new(url, anon_key))
}

pub fn cmd_login(settings: &Settings, email: String, password: String) -> Result<()> {
    let creds = Credentials::new(&email, &password)?;
    let session = auth_client(settings)?.sign_in(&creds)?;
    auth::save_session(&session)?;
    println!("Signed in. Welcome back!");
    Ok(())
}

pub fn cmd_signup(settings: &Settings, email: String, password: String, display_name: Option<String>) -> Result<()> {
    let creds = Credentials::new(&email, &password)?;
    match auth_client(settings)?.sign_up(&creds, display_name.as_deref())? {
        Some(session) => {
            auth::save_session(&session)?;
            println!("Welcome to Faye's Diary! You are signed in.");
        }
        None => println!("Account created. Confirm your email, then run `faye login`."),
    }
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    if auth::clear_session()? {
        println!("Signed out.");
    } else {
        println!("No session to sign out of.");
    }
    Ok(())
}

pub fn cmd_whoami(journal: &Journal, settings: &Settings) -> Result<()> {
    println!("{} ({})", journal.display_name(settings.display_name.as_deref()), journal.user_id());
    println!("backend: {}", journal.backend_name());
    Ok(())
}
