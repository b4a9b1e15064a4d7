mod config;
pub mod infrastructure;
pub mod views;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use ciel_core::domain::{EventId, NewEvent, SongId};
use ciel_core::services::{BrowseService, ImportService, ImportStatus};
use ciel_storage::{SqliteArchive, StorageConfig};

pub use crate::config::ImportConfig;
use crate::views::song_catalogue::{render_catalogue, render_song_detail};
use crate::views::status::render_status;
use crate::views::{CalendarLayout, CalendarView, EventListView};

/// Importing and browsing the Gran☆Ciel live setlist archive.
#[derive(Parser, Debug)]
#[command(name = "ciel")]
#[command(version)]
pub struct Cli {
  /// SQLite database to use instead of the `[storage]` section of ciel.toml
  #[arg(long, global = true, env = "CIEL_DB")]
  pub db: Option<PathBuf>,

  /// Raise log verbosity (repeatable). `RUST_LOG` takes precedence.
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Import an event and its setlist from pasted announcement text
  Import {
    /// Read the text from a file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Free-form notes stored with the event
    #[arg(long)]
    notes: Option<String>,

    /// Print the import status as JSON
    #[arg(long)]
    json: bool,
  },

  /// Register an event from explicit fields
  Register {
    #[arg(long)]
    name: String,

    #[arg(long)]
    location: String,

    /// Event date as YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,

    #[arg(long)]
    notes: Option<String>,

    /// File with one setlist line per row
    #[arg(long)]
    setlist_file: Option<PathBuf>,

    #[arg(long)]
    json: bool,
  },

  /// List events, newest first
  Events {
    /// Start with every setlist collapsed
    #[arg(long)]
    collapsed: bool,

    /// Flip the expanded state of one event (repeatable)
    #[arg(long = "toggle", value_name = "EVENT_ID")]
    toggled: Vec<EventId>,
  },

  /// Show a month of events
  Calendar {
    /// Month as YYYY-MM; defaults to the current month
    #[arg(long, value_parser = parse_month)]
    month: Option<NaiveDate>,

    /// Move forward one month per flag
    #[arg(long, action = clap::ArgAction::Count, conflicts_with = "prev")]
    next: u8,

    /// Move back one month per flag
    #[arg(long, action = clap::ArgAction::Count)]
    prev: u8,

    #[arg(long, value_enum, default_value_t = CalendarLayout::MonthGrid)]
    layout: CalendarLayout,

    /// Open the setlist of a past event on this day (YYYY-MM-DD)
    #[arg(long)]
    day: Option<NaiveDate>,
  },

  /// List the song catalogue
  Songs,

  /// Show one song and where it was performed
  Song { id: SongId },
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM: {e}"))
}

/// Mes de partida (`--month`, el de `--day` o el actual) desplazado con `--next`/`--prev`.
fn calendar_view(
  month: Option<NaiveDate>,
  day: Option<NaiveDate>,
  next: u8,
  prev: u8,
  layout: CalendarLayout,
  today: NaiveDate,
) -> CalendarView {
  let mut view = CalendarView::new(month.or(day).unwrap_or(today), layout, today);
  for _ in 0..next {
    view.next_month();
  }
  for _ in 0..prev {
    view.previous_month();
  }
  view
}

fn open_archive(db: Option<&Path>) -> Result<SqliteArchive> {
  let archive = match db {
    Some(path) => SqliteArchive::from_config(&StorageConfig::with_db_path(path)),
    None => SqliteArchive::new_from_config(),
  };
  archive.context("failed to open the setlist archive")
}

fn read_input(file: Option<&Path>) -> Result<String> {
  match file {
    Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
    None => {
      let mut text = String::new();
      std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
      Ok(text)
    }
  }
}

fn print_status(status: &ImportStatus, json: bool) -> Result<ExitCode> {
  if json {
    println!("{}", serde_json::to_string_pretty(status)?);
  } else {
    print!("{}", render_status(status));
  }
  Ok(if status.is_failure() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Ejecuta un subcomando ya parseado contra el archivo configurado.
pub async fn run(cli: Cli) -> Result<ExitCode> {
  let archive = open_archive(cli.db.as_deref())?;
  debug!(command = ?cli.command, "running");

  match cli.command {
    Command::Import { file, notes, json } => {
      let text = read_input(file.as_deref())?;
      let options = ImportConfig::load().context("failed to load [import] config")?;
      let service = ImportService::new(archive.clone(), archive.clone(), archive).with_options(options.into());

      let result = service.import_text(&text, notes).await;
      if let Err(err) = &result {
        info!(error = %err, "import did not complete");
      }
      print_status(&ImportStatus::from_result(&result), json)
    }

    Command::Register { name, location, date, notes, setlist_file, json } => {
      if name.trim().is_empty() || location.trim().is_empty() {
        bail!("event name and location must not be empty");
      }
      let setlist = match setlist_file {
        Some(path) => read_input(Some(&path))?,
        None => String::new(),
      };
      let service = ImportService::new(archive.clone(), archive.clone(), archive);

      let result = service.register(NewEvent { name, location, date, notes }, &setlist).await;
      print_status(&ImportStatus::from_result(&result), json)
    }

    Command::Events { collapsed, toggled } => {
      let browse = BrowseService::new(archive.clone(), archive);
      let events = browse.events().await?;

      let mut view = if collapsed { EventListView::all_collapsed() } else { EventListView::all_expanded() };
      for id in toggled {
        view.toggle(id);
      }
      print!("{}", view.render(&events));
      Ok(ExitCode::SUCCESS)
    }

    Command::Calendar { month, next, prev, layout, day } => {
      let today = Local::now().date_naive();
      let browse = BrowseService::new(archive.clone(), archive);
      let events = browse.events().await?;

      let view = calendar_view(month, day, next, prev, layout, today);
      match day {
        Some(day) => print!("{}", view.render_selection(&events, day)),
        None => print!("{}", view.render(&events)),
      }
      Ok(ExitCode::SUCCESS)
    }

    Command::Songs => {
      let browse = BrowseService::new(archive.clone(), archive);
      print!("{}", render_catalogue(&browse.songs().await?));
      Ok(ExitCode::SUCCESS)
    }

    Command::Song { id } => {
      let browse = BrowseService::new(archive.clone(), archive);
      let history = browse.song_history(id).await.with_context(|| format!("song {id}"))?;
      print!("{}", render_song_detail(&history));
      Ok(ExitCode::SUCCESS)
    }
  }
}
