use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use crate::models::Mood;
use crate::views::dashboard::{long_date, mask};
use crate::views::diary::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::views::inspiration::{MAP_HEIGHT, MAP_WIDTH, QUICK_TAGS};
use crate::views::layout::Placement;
use crate::views::tasks::time_label;
use super::app::{App, DiaryView, InputField, InputMode, InspirationView, Section};

const ACCENT: Color = Color::Cyan;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Sections
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    match app.section {
        Section::Dashboard => draw_dashboard(f, app, chunks[1]),
        Section::Diary => match app.diary_view {
            DiaryView::Write => draw_diary_write(f, app, chunks[1]),
            DiaryView::Canvas => draw_canvas(f, app, chunks[1]),
        },
        Section::Inspiration => match app.inspiration_view {
            InspirationView::Capture => draw_capture(f, app, chunks[1]),
            InspirationView::Map => draw_map(f, app, chunks[1]),
        },
        Section::Tasks => draw_tasks(f, app, chunks[1]),
    }

    let help = Paragraph::new(help_text(app))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if app.input_mode != InputMode::Normal {
        draw_input(f, app);
    }
    draw_toast(f, app);
}

fn help_text(app: &App) -> &'static str {
    match app.input_mode {
        InputMode::Editing if app.input_field == InputField::DiaryContent => "Enter: New line | Tab: Done | Esc: Cancel",
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::Normal => match app.section {
            Section::Dashboard => "q: Quit | 1-4: Section | p: Privacy | c: Check in | R: Refresh",
            Section::Diary => match app.diary_view {
                DiaryView::Write => "q: Quit | t: Title | e: Write | m: Mood | w: Weather | s: Save | x: Discard | v: Canvas",
                DiaryView::Canvas => "q: Quit | n/b: Select | Arrows/hjkl: Drag (HJKL: far) | f: Mood filter | r: Reflect | d: Del | v: Write",
            },
            Section::Inspiration => match app.inspiration_view {
                InspirationView::Capture => "q: Quit | e: Idea | c: Category | Tab: Next tag | Space: Toggle tag | #: Custom tag | s: Save | x: Cancel | v: Map",
                InspirationView::Map => "q: Quit | n/b: Select | Space: Practiced | f: Filter | d: Del | v: Capture",
            },
            Section::Tasks => "q: Quit | a: Add | Space: Done | o: Note | d: Del | f: Filter | [ ]: Day | t: Today",
        },
    }
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let selected = Section::ALL.iter().position(|s| *s == app.section).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("Faye's Diary"))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn mood_color(mood: Option<Mood>) -> Color {
    match mood {
        Some(Mood::Happy) => Color::Yellow,
        Some(Mood::Loved) => Color::LightMagenta,
        Some(Mood::Sad) => Color::LightBlue,
        Some(Mood::Neutral) | None => Color::Gray,
    }
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let Some(overview) = &app.overview else {
        let empty = Paragraph::new("Nothing to show yet.").block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)].as_ref())
        .split(area);

    let check_in = match app.check_in {
        Some(c) => format!("Feeling {} today", c.label()),
        None => "How are you feeling? (c to check in)".to_string(),
    };
    let privacy = if app.privacy { "Privacy Mode: on" } else { "Privacy Mode: off" };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(overview.heading.to_uppercase(), Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}, {}", overview.greeting, overview.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}   |   {}", check_in, privacy)),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, rows[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(40), Constraint::Percentage(30)].as_ref())
        .split(rows[1]);

    let reflect = Paragraph::new(vec![
        Line::from(overview.last_entry.clone()),
        Line::from(""),
        Line::from(Span::styled("Press 2 to write today's entry", Style::default().fg(Color::Gray))),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Reflect & Unwind"));
    f.render_widget(reflect, cards[0]);

    let focus = Block::default().borders(Borders::ALL).title("Daily Focus");
    let inner = focus.inner(cards[1]);
    f.render_widget(focus, cards[1]);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(inner);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(overview.progress.ratio())
        .label(format!("{} of {} completed", overview.progress.completed, overview.progress.total));
    f.render_widget(gauge, parts[0]);
    let lines: Vec<Line> = if overview.tasks.is_empty() {
        vec![Line::from(Span::styled("No tasks for today", Style::default().fg(Color::Gray)))]
    } else {
        overview
            .tasks
            .iter()
            .map(|t| {
                let style = if t.is_completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(if t.is_completed { "[x] " } else { "[ ] " }),
                    Span::styled(format!("{}  ", time_label(t.scheduled_time)), Style::default().fg(Color::Gray)),
                    Span::styled(mask(&t.title, app.privacy), style),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines), parts[1]);

    let spark = Paragraph::new(format!("\"{}\"", mask(&overview.spark, app.privacy)))
        .wrap(Wrap { trim: true })
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL).title("Daily Spark"));
    f.render_widget(spark, cards[2]);
}

fn draw_diary_write(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let title = if app.draft.title.is_empty() { "Untitled" } else { app.draft.title.as_str() };
    let title = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Today's Entry  {}", long_date(chrono::Local::now().date_naive()))),
    );
    f.render_widget(title, rows[0]);

    let picker = |label: &str, options: Vec<(String, bool)>| {
        let mut spans = vec![Span::raw(format!("{}: ", label))];
        for (name, on) in options {
            let style = if on {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", name), style));
            spans.push(Span::raw(" "));
        }
        spans
    };
    let mut spans = picker(
        "Weather",
        crate::models::Weather::ALL.iter().map(|w| (w.to_string(), *w == app.draft.weather)).collect(),
    );
    spans.push(Span::raw("   "));
    spans.extend(picker(
        "Mood",
        Mood::ALL.iter().map(|m| (format!("{} {}", m.icon(), m), *m == app.draft.mood)).collect(),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)), rows[1]);

    let body = if app.draft.content.is_empty() {
        Paragraph::new(Span::styled("What's on your mind today? (e to write)", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(app.draft.content.as_str())
    };
    let body = body.wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} characters", app.draft.char_count())),
    );
    f.render_widget(body, rows[2]);
}

/// Maps a placement on a virtual surface of `space` cells into `area`,
/// shrinking it to fit when the terminal is smaller.
fn project(place: &Placement, space: (u16, u16), area: Rect) -> Rect {
    let scale = |v: u16, from: u16, to: u16| (u32::from(v) * u32::from(to) / u32::from(from.max(1))) as u16;
    let width = place.width.min(area.width);
    let height = place.height.min(area.height);
    let x = scale(place.x, space.0, area.width).min(area.width.saturating_sub(width));
    let y = scale(place.y, space.1, area.height).min(area.height.saturating_sub(height));
    Rect::new(area.x + x, area.y + y, width, height)
}

fn draw_canvas(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Memory Canvas  [{}]  {} notes", app.canvas.filter.label(), app.canvas.visible().len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let notes = app.canvas.visible();
    if notes.is_empty() {
        let empty = Paragraph::new("No entries yet. Press v to write your first one.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    for note in notes {
        let rect = project(&note.place, (CANVAS_WIDTH, CANVAS_HEIGHT), inner);
        let selected = app.selected_note.as_deref() == Some(note.entry.id.as_str());
        let color = mood_color(note.entry.mood);
        let border = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        // Tilt shows as a title that leans left or right.
        let tilt = match note.rotation {
            r if r < 0 => Alignment::Left,
            0 => Alignment::Center,
            _ => Alignment::Right,
        };
        let mut lines = vec![Line::from(Span::styled(
            mask(note.title(), app.privacy),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(mask(&note.entry.content, app.privacy)));
        if let Some(r) = app.canvas.reflection(&note.entry.id) {
            lines.push(Line::from(Span::styled(format!("> {}", r), Style::default().add_modifier(Modifier::ITALIC))));
        }
        let tags = format!(
            "{} {}",
            note.entry.mood.map(|m| m.icon()).unwrap_or(""),
            note.entry.weather.map(|w| w.as_str()).unwrap_or("")
        );
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Line::from(note.date_label()).alignment(tilt))
                    .title_bottom(Line::from(tags.trim().to_string()).alignment(Alignment::Right)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(widget, rect);
    }
}

fn draw_capture(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(area);

    let category = app.capture.category.map(|c| c.label()).unwrap_or("Pick a category (c)");
    f.render_widget(
        Paragraph::new(category).block(Block::default().borders(Borders::ALL).title("Category")),
        rows[0],
    );

    let body = if app.capture.content.is_empty() {
        Paragraph::new(Span::styled("What sparked your curiosity? (e to write)", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(app.capture.content.as_str())
    };
    f.render_widget(
        body.wrap(Wrap { trim: false }).block(Block::default().borders(Borders::ALL).title("Capture an Idea")),
        rows[1],
    );

    let mut spans = Vec::new();
    for (i, tag) in QUICK_TAGS.iter().enumerate() {
        let mut style = if app.capture.tags.iter().any(|t| t == tag) {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if i == app.tag_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(tag.to_string(), style));
        spans.push(Span::raw("  "));
    }
    for tag in app.capture.tags.iter().filter(|t| !QUICK_TAGS.contains(&t.as_str())) {
        spans.push(Span::styled(tag.clone(), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw("  "));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("Tags")),
        rows[2],
    );
}

fn draw_map(f: &mut Frame, app: &App, area: Rect) {
    let bubbles = app.visible_bubbles();
    let selected = app
        .selected_idea
        .as_deref()
        .and_then(|id| bubbles.iter().find(|b| b.idea.id == id));
    let footer = match selected {
        Some(b) => format!(
            "{}{}",
            b.idea.content,
            if b.idea.is_practiced { "  (practiced)" } else { "" }
        ),
        None => String::new(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Inspiration Map  [{}]", app.practice_filter.label()))
        .title_bottom(footer);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if bubbles.is_empty() {
        let empty = Paragraph::new("No ideas here yet. Press v to capture one.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    for bubble in &bubbles {
        let rect = project(&bubble.place, (MAP_WIDTH, MAP_HEIGHT), inner);
        let is_selected = selected.is_some_and(|s| s.idea.id == bubble.idea.id);
        let color = if bubble.idea.is_practiced { Color::Green } else { ACCENT };
        let mut style = Style::default().fg(color);
        if is_selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style);
        if bubble.is_new {
            block = block.title(Line::from("NEW").alignment(Alignment::Right));
        }
        if let Some(c) = bubble.idea.category {
            block = block.title_bottom(Line::from(c.label()).alignment(Alignment::Center));
        }
        let widget = Paragraph::new(bubble.idea.label().to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(color))
            .block(block);
        f.render_widget(Clear, rect);
        f.render_widget(widget, rect);
    }
}

fn draw_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let progress = app.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Daily Tasks  {}", long_date(app.task_date))))
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(progress.ratio())
        .label(format!("{} of {} completed", progress.completed, progress.total));
    f.render_widget(gauge, rows[0]);

    let table_rows: Vec<Row> = app
        .visible_tasks()
        .into_iter()
        .map(|t| {
            let style = if t.is_completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(if t.is_completed { "[x]" } else { "[ ]" }),
                Cell::from(time_label(t.scheduled_time)),
                Cell::from(t.title.clone()),
                Cell::from(t.category.clone().unwrap_or_default()),
                Cell::from(t.description.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(9),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(table_rows, widths)
        .header(Row::new(vec!["", "Time", "Task", "Category", "Note"])
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(format!("Show: {}", app.task_filter.label())))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, rows[1], &mut app.task_state);
}

fn draw_input(f: &mut Frame, app: &App) {
    let multiline = app.input_field == InputField::DiaryContent;
    let area = centered_rect(60, if multiline { 10 } else { 3 }, f.area());
    f.render_widget(Clear, area);

    let title = match app.input_mode {
        InputMode::Adding => match app.add_state.step {
            0 => "Add Task: Enter Title",
            1 => "Add Task: Enter Time, e.g. 08:30 or 2pm (Optional)",
            2 => "Add Task: Enter Category (Optional)",
            _ => "Add Task: Enter Note (Optional)",
        },
        _ => match app.input_field {
            InputField::DiaryTitle => "Entry Title (Optional)",
            InputField::DiaryContent => "Write your thoughts",
            InputField::Reflection => "Reflection",
            InputField::IdeaContent => "Your Idea",
            InputField::CustomTag => "Custom Tag",
            InputField::TaskNote => "Task Note",
            InputField::None => "",
        },
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn draw_toast(f: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else { return };
    let screen = f.area();
    let width = (toast.message.chars().count() as u16 + 4).min(screen.width);
    let height = 3.min(screen.height);
    let area = Rect::new(
        screen.right().saturating_sub(width),
        screen.bottom().saturating_sub(height + 3),
        width,
        height,
    );
    let color = if toast.is_error { Color::Red } else { Color::Green };
    let widget = Paragraph::new(toast.message.as_str())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Journal;
    use crate::store::MemoryBackend;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn projected_rect_stays_inside_the_area() {
        let area = Rect::new(2, 3, 50, 12);
        let place = Placement { x: 100, y: 30, width: 28, height: 8 };
        let r = project(&place, (110, 36), area);
        assert!(r.x >= area.x && r.right() <= area.right());
        assert!(r.y >= area.y && r.bottom() <= area.bottom());
        assert_eq!((r.width, r.height), (28, 8));

        let tiny = Rect::new(0, 0, 10, 4);
        let r = project(&place, (110, 36), tiny);
        assert_eq!((r.width, r.height), (10, 4));
    }

    #[test]
    fn every_section_renders() {
        let mut app = App::new(Journal::new(Box::new(MemoryBackend::new()), "faye"), Some("Faye".into()));
        assert!(render(&mut app).contains("Daily Focus"));

        app.enter(Section::Diary);
        app.start_edit(InputField::DiaryContent);
        app.input_buffer = "Rain on the window".into();
        app.handle_input();
        app.save_diary();
        let screen = render(&mut app);
        assert!(screen.contains("Memory Canvas"));
        assert!(screen.contains("Diary entry saved"));

        app.enter(Section::Inspiration);
        app.start_edit(InputField::IdeaContent);
        app.input_buffer = "Bake a lemon tart".into();
        app.handle_input();
        app.save_idea();
        assert!(render(&mut app).contains("Inspiration Map"));

        app.enter(Section::Tasks);
        app.start_add();
        let screen = render(&mut app);
        assert!(screen.contains("Add Task: Enter Title"));
        assert!(screen.contains("0 of 0 completed"));
    }

    #[test]
    fn privacy_mode_hides_task_titles() {
        let mem = MemoryBackend::new();
        let journal = Journal::new(Box::new(mem.clone()), "faye");
        crate::commands::cmd_task_add(&journal, "Secret plan".into(), None, None, None, None, true).unwrap();
        let mut app = App::new(Journal::new(Box::new(mem), "faye"), None);
        assert!(render(&mut app).contains("Secret plan"));
        app.toggle_privacy();
        let screen = render(&mut app);
        assert!(!screen.contains("Secret plan"));
        assert!(screen.contains("Privacy Mode: on"));
    }
}
