//! # Faye's Diary
//!
//! A personal journaling app for the terminal: a daily dashboard, a diary with
//! a sticky-note canvas, an inspiration board drawn as a bubble map, and a
//! daily task list. Records live in Supabase when it is configured, or in
//! local JSON files otherwise.
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run without arguments to open the interactive UI:
//!
//! ```bash
//! faye
//! # or explicitly
//! faye ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `1`-`4`: Dashboard, Diary, Inspiration, Daily Tasks
//! *   `q`: Quit
//!
//! **Dashboard**
//! *   `p`: Toggle privacy mode
//! *   `c`: Cycle the check-in mood
//!
//! **Diary**
//! *   `t` / `e`: Edit title / entry, `w` / `m`: cycle weather / mood
//! *   `s`: Save, `x`: Discard, `v`: Switch to the canvas
//! *   Canvas: `n` / `b` select, arrows or `HJKL` drag, `f` mood filter,
//!     `r` reflect, `d` delete
//!
//! **Inspiration**
//! *   `e`: Edit idea, `c`: category, `Tab` / `Space`: pick / toggle a quick tag, `#`: custom tag
//! *   `s`: Save, `x`: Cancel, `v`: Switch to the map
//! *   Map: `n` / `b` select, `Space` toggle practiced, `f` filter, `d` delete
//!
//! **Daily Tasks**
//! *   `a`: Add, `Space`: Toggle done, `o`: Note, `d`: Delete, `f`: Filter
//! *   `[` / `]`: Previous / next day, `t`: Today
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! faye diary write "A quiet walk by the river" --title "Sunday" --mood loved --weather cloudy
//! faye task add "Morning yoga" --time 7:30am --category wellness
//! faye task done 3f2a
//! faye idea add "Learn to make a negroni" --category cocktails
//! faye idea list --filter unpracticed
//! faye dashboard
//! faye login faye@example.com   # prompts for the password
//! ```
//!
//! Record ids may be shortened to any unique prefix.
//!
//! ## Data Storage
//!
//! With `SUPABASE_URL` and `SUPABASE_ANON_KEY` set (or a `[supabase]` table in
//! `config.toml`), records go to the hosted tables after `faye login`.
//! Otherwise they are kept in your local data directory:
//! *   Linux: `~/.local/share/faye-diary/`
//! *   macOS: `~/Library/Application Support/faye-diary/`
//! *   Windows: `%APPDATA%\faye-diary\`
//!
//! You can override this by setting the `FAYE_DATA_DIR` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::process;
use faye_diary::commands::*;
use faye_diary::config::Settings;
use faye_diary::tui::run_tui;
use faye_diary::views::inspiration::PracticeFilter;
use faye_diary::views::tasks::StatusFilter;
use faye_diary::{Journal, Result};

#[derive(Parser)]
#[command(name = "faye")]
#[command(about = "Faye's Diary: journal, inspirations and daily tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's overview
    Dashboard,
    /// Write and review diary entries
    Diary {
        #[command(subcommand)]
        command: DiaryCommands,
    },
    /// Manage the daily task list
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Capture and practice inspirations
    Idea {
        #[command(subcommand)]
        command: IdeaCommands,
    },
    /// Sign in to the hosted backend
    Login {
        email: String,
        /// Read from the terminal when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account on the hosted backend
    Signup {
        email: String,
        /// Read from the terminal when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Name shown on the dashboard
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Forget the cached session
    Logout,
    /// Show the current user and backend
    Whoami,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum DiaryCommands {
    /// Save a new entry
    Write {
        /// Entry text (quoted if it has spaces)
        content: String,
        #[arg(short, long)]
        title: Option<String>,
        /// happy, neutral, sad or loved
        #[arg(short, long)]
        mood: Option<String>,
        /// sunny, cloudy or rainy
        #[arg(short, long)]
        weather: Option<String>,
        /// Entry date in YYYY-MM-DD (default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Only this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Only this mood
        #[arg(short, long)]
        mood: Option<String>,
    },
    /// Edit an entry
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        mood: Option<String>,
        #[arg(short, long)]
        weather: Option<String>,
    },
    /// Remove an entry
    Remove { id: String },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task
    Add {
        title: String,
        /// Scheduled time, e.g. 14:30 or 2:30pm
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Day in YYYY-MM-DD (default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List the day's tasks
    List {
        #[arg(short, long)]
        date: Option<String>,
        /// all, pending or done
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Mark a task as done
    Done {
        id: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Reopen a completed task
    Undo {
        id: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Set the note under a task (empty to remove)
    Note {
        id: String,
        note: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit a task
    Edit {
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New time, or "none" to unschedule
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Move the task to another day
        #[arg(short, long)]
        move_to: Option<String>,
        /// Day the task is currently on
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove a task
    Remove {
        id: String,
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum IdeaCommands {
    /// Capture an idea
    Add {
        content: String,
        /// games, cocktails, travel, books, cooking, fitness, art, nature or language
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List ideas, newest first
    List {
        /// all, practiced or unpracticed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Mark an idea as practiced
    Practice { id: String },
    /// Mark an idea as not practiced yet
    Unpractice { id: String },
    /// Edit an idea
    Edit {
        id: String,
        #[arg(short, long)]
        content: Option<String>,
        /// New category, or "none" to clear it
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// Remove an idea
    Remove { id: String },
}

fn status_filter(s: &str) -> Result<StatusFilter> {
    match s {
        "all" => Ok(StatusFilter::All),
        "pending" => Ok(StatusFilter::Pending),
        "done" => Ok(StatusFilter::Done),
        _ => Err(faye_diary::Error::validation(format!("Unknown filter '{}'. Use all, pending or done.", s))),
    }
}

fn practice_filter(s: &str) -> Result<PracticeFilter> {
    match s {
        "all" => Ok(PracticeFilter::All),
        "practiced" => Ok(PracticeFilter::Practiced),
        "unpracticed" => Ok(PracticeFilter::Unpracticed),
        _ => Err(faye_diary::Error::validation(format!("Unknown filter '{}'. Use all, practiced or unpracticed.", s))),
    }
}

/// Prompts on stderr and reads the password without echo. Piped input is
/// read as a plain line.
fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    enable_raw_mode()?;
    let mut password = String::new();
    let outcome = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter => break Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    break Err(faye_diary::Error::validation("Cancelled"));
                }
                KeyCode::Esc => break Err(faye_diary::Error::validation("Cancelled")),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            },
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };
    disable_raw_mode()?;
    eprintln!();
    outcome.map(|_| password)
}

/// Logs to stderr for CLI commands and to a file for the TUI.
fn init_logging(settings: &Settings, tui: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if tui {
        let dir = settings.data_dir();
        let file = std::fs::create_dir_all(&dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(dir.join("faye.log")));
        match file {
            Ok(f) => {
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let password = password.map_or_else(read_password, Ok)?;
            return cmd_login(settings, email, password);
        }
        Commands::Signup { email, password, name } => {
            let password = password.map_or_else(read_password, Ok)?;
            return cmd_signup(settings, email, password, name);
        }
        Commands::Logout => return cmd_logout(),
        _ => {}
    }

    let journal = Journal::open(settings)?;
    match command {
        Commands::Dashboard => cmd_dashboard(&journal, settings.display_name.as_deref()).map(drop),
        Commands::Diary { command } => match command {
            DiaryCommands::Write { content, title, mood, weather, date } => {
                cmd_diary_write(&journal, content, title, mood, weather, date, false).map(drop)
            }
            DiaryCommands::List { date, mood } => cmd_diary_list(&journal, date, mood, false).map(drop),
            DiaryCommands::Edit { id, title, content, mood, weather } => {
                cmd_diary_edit(&journal, id, title, content, mood, weather, false).map(drop)
            }
            DiaryCommands::Remove { id } => cmd_diary_remove(&journal, id, false),
        },
        Commands::Task { command } => match command {
            TaskCommands::Add { title, time, category, note, date } => {
                cmd_task_add(&journal, title, time, category, note, date, false).map(drop)
            }
            TaskCommands::List { date, filter } => {
                cmd_task_list(&journal, date, status_filter(&filter)?, false).map(drop)
            }
            TaskCommands::Done { id, date } => cmd_task_set_done(&journal, id, true, date, false).map(drop),
            TaskCommands::Undo { id, date } => cmd_task_set_done(&journal, id, false, date, false).map(drop),
            TaskCommands::Note { id, note, date } => cmd_task_note(&journal, id, note, date, false).map(drop),
            TaskCommands::Edit { id, title, time, category, move_to, date } => {
                cmd_task_edit(&journal, id, title, time, category, move_to, date, false).map(drop)
            }
            TaskCommands::Remove { id, date } => cmd_task_remove(&journal, id, date, false),
        },
        Commands::Idea { command } => match command {
            IdeaCommands::Add { content, category } => cmd_idea_add(&journal, content, category, false).map(drop),
            IdeaCommands::List { filter } => cmd_idea_list(&journal, practice_filter(&filter)?, false).map(drop),
            IdeaCommands::Practice { id } => cmd_idea_practice(&journal, id, true, false).map(drop),
            IdeaCommands::Unpractice { id } => cmd_idea_practice(&journal, id, false, false).map(drop),
            IdeaCommands::Edit { id, content, category } => {
                cmd_idea_edit(&journal, id, content, category, false).map(drop)
            }
            IdeaCommands::Remove { id } => cmd_idea_remove(&journal, id, false),
        },
        Commands::Whoami => cmd_whoami(&journal, settings),
        Commands::Ui => run_tui(journal, settings.display_name.clone()),
        Commands::Login { .. } | Commands::Signup { .. } | Commands::Logout | Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    if let Commands::Completions { shell } = &command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => {
                eprintln!("Unsupported shell: {}", shell);
                process::exit(2);
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "faye", &mut io::stdout());
        return;
    }

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };
    init_logging(&settings, matches!(command, Commands::Ui));

    if let Err(e) = run(command, &settings) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
