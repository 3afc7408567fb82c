pub mod app;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::error::Result;
use crate::journal::Journal;
use app::{App, DiaryView, InputField, InputMode, InspirationView, Section};
use ui::ui;

const TICK: Duration = Duration::from_millis(250);

pub fn run_tui(journal: Journal, display_name: Option<String>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(journal, display_name);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(res?)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.expire_toast(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        // Poll so toasts expire without a key press.
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => {
                    if !handle_normal(app, key) {
                        return Ok(());
                    }
                }
                InputMode::Editing | InputMode::Adding => handle_text(app, key),
            }
        }
    }
}

/// Text entry. Diary text takes newlines, so it is committed with Tab.
fn handle_text(app: &mut App, key: KeyEvent) {
    let multiline = app.input_field == InputField::DiaryContent;
    match key.code {
        KeyCode::Enter if multiline => app.input_buffer.push('\n'),
        KeyCode::Tab if multiline => app.handle_input(),
        KeyCode::Enter => app.handle_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Char(c) => app.input_buffer.push(c),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        _ => {}
    }
}

/// Returns false when the user quits.
fn handle_normal(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('1') => app.enter(Section::Dashboard),
        KeyCode::Char('2') => app.enter(Section::Diary),
        KeyCode::Char('3') => app.enter(Section::Inspiration),
        KeyCode::Char('4') => app.enter(Section::Tasks),
        KeyCode::Char('R') => app.reload(),
        code => match app.section {
            Section::Dashboard => match code {
                KeyCode::Char('p') => app.toggle_privacy(),
                KeyCode::Char('c') => app.cycle_check_in(),
                _ => {}
            },
            Section::Diary => match app.diary_view {
                DiaryView::Write => match code {
                    KeyCode::Char('t') => app.start_edit(InputField::DiaryTitle),
                    KeyCode::Char('e') | KeyCode::Enter => app.start_edit(InputField::DiaryContent),
                    KeyCode::Char('w') => app.draft.weather = app.draft.weather.cycle(),
                    KeyCode::Char('m') => app.draft.mood = app.draft.mood.cycle(),
                    KeyCode::Char('s') => app.save_diary(),
                    KeyCode::Char('x') => app.discard_diary(),
                    KeyCode::Char('v') => app.toggle_diary_view(),
                    _ => {}
                },
                DiaryView::Canvas => match code {
                    KeyCode::Char('n') | KeyCode::Tab => app.select_note(true),
                    KeyCode::Char('b') | KeyCode::BackTab => app.select_note(false),
                    KeyCode::Left | KeyCode::Char('h') => app.drag_note(-1, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.drag_note(1, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.drag_note(0, -1),
                    KeyCode::Down | KeyCode::Char('j') => app.drag_note(0, 1),
                    KeyCode::Char('H') => app.drag_note(-5, 0),
                    KeyCode::Char('L') => app.drag_note(5, 0),
                    KeyCode::Char('K') => app.drag_note(0, -3),
                    KeyCode::Char('J') => app.drag_note(0, 3),
                    KeyCode::Char('f') => app.cycle_mood_filter(),
                    KeyCode::Char('r') => app.start_edit(InputField::Reflection),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_note(),
                    KeyCode::Char('v') => app.toggle_diary_view(),
                    _ => {}
                },
            },
            Section::Inspiration => match app.inspiration_view {
                InspirationView::Capture => match code {
                    KeyCode::Char('e') | KeyCode::Enter => app.start_edit(InputField::IdeaContent),
                    KeyCode::Char('c') => app.capture.cycle_category(),
                    KeyCode::Tab => app.next_tag(),
                    KeyCode::Char(' ') => app.toggle_current_tag(),
                    KeyCode::Char('#') => app.start_edit(InputField::CustomTag),
                    KeyCode::Char('s') => app.save_idea(),
                    KeyCode::Char('x') => app.cancel_capture(),
                    KeyCode::Char('v') => app.toggle_inspiration_view(),
                    _ => {}
                },
                InspirationView::Map => match code {
                    KeyCode::Char('n') | KeyCode::Tab | KeyCode::Right => app.select_idea(true),
                    KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Left => app.select_idea(false),
                    KeyCode::Char(' ') => app.toggle_practiced(),
                    KeyCode::Char('f') => app.cycle_practice_filter(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_idea(),
                    KeyCode::Char('v') => app.toggle_inspiration_view(),
                    _ => {}
                },
            },
            Section::Tasks => match code {
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.toggle_selected_task(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('o') => app.start_edit(InputField::TaskNote),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_task(),
                KeyCode::Char('f') => app.cycle_task_filter(),
                KeyCode::Char('[') => app.shift_day(-1),
                KeyCode::Char(']') => app.shift_day(1),
                KeyCode::Char('t') => app.go_to_today(),
                _ => {}
            },
        },
    }
    true
}
