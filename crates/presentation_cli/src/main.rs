//! Calendar CLI
//!
//! Terminal front end for the calendar backend: month grids, events and
//! public holidays.

#![allow(clippy::print_stdout)]

mod input;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use application::{CalendarApiPort, CalendarStore, FetchOutcome};
use clap::{Args, Parser, Subcommand};
use domain::{EventId, EventPayload};
use infrastructure::{AppConfig, CalendarApiAdapter, init_logging};
use input::{When, parse_when};

/// Calendar CLI
#[derive(Parser)]
#[command(name = "calendar-cli")]
#[command(author, version, about = "Calendar client with Japanese holidays and rokuyō", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend base URL (overrides configuration and CALENDAR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Configuration file (default: ./calendar.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid (default: the current month)
    Show {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Step one month forward from the selected month
        #[arg(long, conflicts_with = "prev")]
        next: bool,

        /// Step one month back from the selected month
        #[arg(long)]
        prev: bool,
    },

    /// Manage events
    #[command(subcommand)]
    Events(EventCommands),

    /// List the public holidays of a year
    Holidays { year: i32 },

    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum EventCommands {
    /// List all events
    List,

    /// Create an event
    ///
    /// Example: calendar-cli events create --title Hanami --start 2024-03-20T10:00 --end 2024-03-20T15:00
    Create(EventArgs),

    /// Update an event; omitted fields keep their current value
    Update {
        id: i64,

        #[command(flatten)]
        fields: EventArgs,
    },

    /// Delete an event
    Delete { id: i64 },
}

#[derive(Args, Default)]
struct EventArgs {
    #[arg(short, long)]
    title: Option<String>,

    #[arg(short, long)]
    description: Option<String>,

    /// RFC 3339, YYYY-MM-DDTHH:MM (UTC) or YYYY-MM-DD
    #[arg(short, long)]
    start: Option<String>,

    /// Same formats as --start (default: the start)
    #[arg(short, long)]
    end: Option<String>,

    /// Mark as all-day (implied when both dates are bare)
    #[arg(long)]
    all_day: bool,
}

impl EventArgs {
    /// Build a payload for a new event
    fn into_new_payload(self) -> anyhow::Result<EventPayload> {
        let title = self.title.context("--title is required")?;
        let start = parse_when(&self.start.context("--start is required")?)?;
        let end = self.end.as_deref().map(parse_when).transpose()?.unwrap_or(start);

        let mut payload = EventPayload::new(title, start.to_utc(), end.to_utc())?;
        payload.all_day = self.all_day || (start.is_date() && end.is_date());
        if let Some(description) = self.description {
            payload = payload.with_description(description);
        }
        Ok(payload)
    }

    /// Overlay the given fields on an existing payload
    fn apply_to(self, mut payload: EventPayload) -> anyhow::Result<EventPayload> {
        if let Some(title) = self.title {
            payload.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            payload.description = description;
        }
        let start = self.start.as_deref().map(parse_when).transpose()?;
        let end = self.end.as_deref().map(parse_when).transpose()?;
        if let Some(start) = start {
            payload.start_date = start.to_utc();
        }
        if let Some(end) = end {
            payload.end_date = end.to_utc();
        }
        if self.all_day || (start.is_some_and(When::is_date) && end.is_some_and(When::is_date)) {
            payload.all_day = true;
        }
        payload.ensure_valid()?;
        Ok(payload)
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let logging = if cli.verbose > 0 {
        config
            .logging
            .clone()
            .with_filter(log_filter_from_verbosity(cli.verbose))
    } else {
        config.logging.clone()
    };
    init_logging(&logging)?;

    let api = Arc::new(CalendarApiAdapter::with_config(config.api.clone())?);
    let store = CalendarStore::builder().api(api.clone()).build()?;

    match cli.command {
        Commands::Show {
            year,
            month,
            next,
            prev,
        } => {
            if year.is_some() || month.is_some() {
                let current = store.current();
                store.set_current_date(
                    year.unwrap_or_else(|| current.year()),
                    month.unwrap_or_else(|| current.month()),
                )?;
            }
            if next {
                store.next_month();
            } else if prev {
                store.previous_month();
            }

            if store.refresh().await == FetchOutcome::Failed {
                bail!(store.error().unwrap_or_default());
            }
            print!("{}", render::render_grid(&store.grid()));
        },

        Commands::Events(EventCommands::List) => {
            store.fetch_events().await;
            let events = store.snapshot().events;
            if events.is_empty() {
                println!("No events.");
            }
            for event in &events {
                println!("{}", render::format_event(event));
            }
        },

        Commands::Events(EventCommands::Create(args)) => {
            let payload = args.into_new_payload()?;
            let event = store.create_event(&payload).await?;
            println!("✅ Created {}", render::format_event(&event));
        },

        Commands::Events(EventCommands::Update { id, fields }) => {
            let id = EventId::new(id);
            store.fetch_events().await;
            let existing = store
                .snapshot()
                .events
                .into_iter()
                .find(|e| e.id == id)
                .with_context(|| format!("Event {id} not found"))?;

            let payload = fields.apply_to(existing.to_payload())?;
            let event = store.update_event(id, &payload).await?;
            println!("✅ Updated {}", render::format_event(&event));
        },

        Commands::Events(EventCommands::Delete { id }) => {
            let id = EventId::new(id);
            store.delete_event(id).await?;
            println!("🗑️  Deleted event #{id}");
        },

        Commands::Holidays { year } => {
            let holidays = store.fetch_holidays(year).await?;
            if holidays.is_empty() {
                println!("No holidays for {year}.");
            }
            for holiday in &holidays {
                println!("{}", render::format_holiday(holiday));
            }
        },

        Commands::Health => {
            if api.is_available().await {
                println!("✅ Backend at {} is healthy", config.api.base_url);
            } else {
                bail!("Backend at {} is not reachable", config.api.base_url);
            }
        },
    }

    Ok(())
}
