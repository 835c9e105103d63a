use anyhow::{Context, Result, bail};
use cadence_core::time::parse_local_datetime_to_utc;
use cadence_core::{
    Category, NewTask, Period, Task, TaskStore, TaskUpdate, build_stats_report, list_tasks,
};
use cadence_ingest::{EventFormat, events_to_new_tasks, parse_google_events_json, parse_ics};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod config;
mod logging;
mod state;
mod stats_cmd;

use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "cadence",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CADENCE_BUILD_SHA"), ")"),
    about = "Schedule alignment scores and period stats"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule a task (times are local, "YYYY-MM-DD HH:MM")
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long)]
        description: Option<String>,

        /// work, personal, health, learning, other (default: from title keywords)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Mark a task completed, optionally recording when it actually ran
    Complete {
        id: String,

        #[arg(long)]
        actual_start: Option<String>,

        #[arg(long)]
        actual_end: Option<String>,
    },

    /// Flip completion; completing stamps missing actual times
    Toggle { id: String },

    /// Print one task as JSON
    Show { id: String },

    /// List tasks scheduled in a week or month
    List {
        #[arg(long, default_value = "week")]
        period: Period,

        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Current vs previous period stats plus a 12-period trend
    Stats {
        #[arg(long, default_value = "week")]
        period: Period,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the trend buckets to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Import calendar events (Google events.list JSON or .ics) as tasks
    Import {
        file: PathBuf,

        /// google or ics (default: by file extension)
        #[arg(long)]
        format: Option<EventFormat>,

        /// Show what would be imported without saving
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.cadence/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    logging::init_logging(&cfg.general.log_level)?;
    let tz = cfg.tz()?;

    match cli.command {
        Command::Add {
            title,
            start,
            end,
            description,
            category,
        } => {
            let mut new = NewTask::new(
                title,
                parse_local_datetime_to_utc(&start, tz)?,
                parse_local_datetime_to_utc(&end, tz)?,
            );
            if let Some(d) = description {
                new = new.with_description(d);
            }
            if let Some(c) = category {
                new = new.with_category(c);
            }

            with_store(|store| {
                let task = store.create(new, Utc::now())?;
                info!(target: "cadence::cli", id = %task.id, "created task");
                println!("Created task {} [{}] {}", task.id, task.category, task.title);
                Ok(())
            })?;
        }

        Command::Complete {
            id,
            actual_start,
            actual_end,
        } => {
            let mut update = TaskUpdate::complete();
            if let Some(s) = actual_start {
                update.actual_start = Some(parse_local_datetime_to_utc(&s, tz)?);
            }
            if let Some(e) = actual_end {
                update.actual_end = Some(parse_local_datetime_to_utc(&e, tz)?);
            }

            with_store(|store| {
                let score = store.update(&id, update, &cfg.scoring, Utc::now())?;
                println!(
                    "Task {id}: alignment {} / points {}",
                    score.alignment_score, score.points
                );
                Ok(())
            })?;
        }

        Command::Toggle { id } => {
            with_store(|store| {
                let score = store.toggle(&id, &cfg.scoring, Utc::now())?;
                let task = store.get(&id)?;
                println!(
                    "Task {id}: {} (alignment {} / points {})",
                    if task.is_completed { "completed" } else { "reopened" },
                    score.alignment_score,
                    score.points
                );
                Ok(())
            })?;
        }

        Command::Show { id } => {
            let store = state::load_store(&state::tasks_path()?)?;
            println!("{}", serde_json::to_string_pretty(store.get(&id)?)?);
        }

        Command::List { period, date, json } => {
            let store = state::load_store(&state::tasks_path()?)?;
            let reference = date.unwrap_or_else(|| today(tz));
            let tasks = list_tasks(period, reference, tz, &store)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_tasks(&tasks, tz);
            }
        }

        Command::Stats {
            period,
            date,
            json,
            csv,
        } => {
            let store = state::load_store(&state::tasks_path()?)?;
            let reference = date.unwrap_or_else(|| today(tz));
            let report = build_stats_report(period, reference, tz, &store)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", stats_cmd::render_report(&report));
            }

            if let Some(path) = csv {
                stats_cmd::write_trend_csv(&path, &report)?;
                eprintln!("Wrote {}", path.display());
            }
        }

        Command::Import {
            file,
            format,
            dry_run,
        } => {
            import_events(&file, format, dry_run, tz)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => show_config(&cfg)?,
        },
    }

    Ok(())
}

fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Load the store, run a mutation, and save only if it succeeded.
fn with_store<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut TaskStore) -> Result<()>,
{
    let path = state::tasks_path()?;
    let mut store = state::load_store(&path)?;
    f(&mut store)?;
    state::save_store(&path, &store)
}

fn print_tasks(tasks: &[Task], tz: Tz) {
    if tasks.is_empty() {
        println!("(no tasks)");
        return;
    }
    for t in tasks {
        let start = t.scheduled_start.with_timezone(&tz);
        let end = t.scheduled_end.with_timezone(&tz);
        println!(
            "{:>4} [{}] {:<9} {} - {} ({}m) | {} | align={} points={}",
            t.id,
            if t.is_completed { "x" } else { " " },
            t.category.as_str(),
            start.format("%a %m-%d %H:%M"),
            end.format("%H:%M"),
            t.scheduled_minutes(),
            t.title,
            t.alignment_score,
            t.points
        );
    }
}

fn import_events(file: &Path, format: Option<EventFormat>, dry_run: bool, tz: Tz) -> Result<()> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let text = std::fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let format = format.unwrap_or_else(|| EventFormat::from_extension(file.extension().and_then(|e| e.to_str())));

    let events = match format {
        EventFormat::Google => parse_google_events_json(&text, tz),
        EventFormat::Ics => parse_ics(&text, tz),
    }
    .with_context(|| format!("parsing {}", file.display()))?;

    let plan = events_to_new_tasks(&events);
    for skipped in &plan.skipped {
        warn!(target: "cadence::cli", title = %skipped.title, reason = %skipped.reason, "skipped event");
    }

    let path = state::tasks_path()?;
    let mut store = state::load_store(&path)?;
    let now = Utc::now();
    let (fresh, duplicates) = drop_known_events(plan.tasks, &store);
    let created = fresh.len();

    for new in fresh {
        if dry_run {
            println!("would import: [{}] {}", new.category.unwrap_or(Category::Other), new.title);
            continue;
        }
        store.create(new, now)?;
    }

    if !dry_run {
        state::save_store(&path, &store)?;
    }

    println!(
        "Parsed {} events: {} imported, {} already present, {} skipped",
        events.len(),
        created,
        duplicates,
        plan.skipped.len()
    );
    Ok(())
}

/// Split off tasks whose external id is already stored or appeared earlier
/// in the same import. Returns the remaining tasks and the duplicate count.
fn drop_known_events(tasks: Vec<NewTask>, store: &TaskStore) -> (Vec<NewTask>, usize) {
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    let mut fresh = Vec::with_capacity(tasks.len());

    for new in tasks {
        if let Some(id) = new.external_id.as_deref() {
            if store.contains_external_id(id) || !seen.insert(id.to_string()) {
                duplicates += 1;
                continue;
            }
        }
        fresh.push(new);
    }
    (fresh, duplicates)
}

fn show_config(cfg: &Config) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 12, h, 0, 0).unwrap()
    }

    fn event(title: &str, uid: Option<&str>) -> NewTask {
        let task = NewTask::new(title, at(9), at(10));
        match uid {
            Some(id) => task.with_external_id(id),
            None => task,
        }
    }

    #[test]
    fn test_repeated_uid_in_one_import_counts_as_duplicate() {
        let mut store = TaskStore::new();
        store.create(event("Standup", Some("old@x")), at(8)).unwrap();

        let batch = vec![
            event("Standup", Some("old@x")),
            event("Gym", Some("g1@x")),
            event("Gym again", Some("g1@x")),
            event("No uid", None),
            event("No uid", None),
        ];
        let (fresh, duplicates) = drop_known_events(batch, &store);

        assert_eq!(duplicates, 2);
        let titles: Vec<_> = fresh.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Gym", "No uid", "No uid"]);
    }
}
