mod config;
mod state;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cadence_core::{AllowedDays, Task, TaskType, is_due_on, record_iteration};
use cadence_maintenance::{
    Clock, MaintenanceCoordinator, MemoryStore, StatisticsStore, SystemClock, TaskStore, User,
};

use crate::config::{Config, load_config};
use crate::state::{read_state, write_state};

#[derive(Parser, Debug)]
#[command(name = "cadence", version, about = "Cadence habit-engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config.toml under ~/.cadence
    Init,
    /// Run a maintenance pass now, or keep running on an interval
    Run {
        #[arg(long)]
        watch: bool,
        /// Seconds between passes in watch mode
        #[arg(long, default_value_t = 3600)]
        interval_secs: u64,
    },
    /// Seed a demo user with a few recurring tasks
    Demo,
    /// Record one performed iteration for a task due today
    Record { task_id: u64 },
    /// Show recent statistics for a user
    Stats {
        user_id: u64,
        #[arg(long, default_value_t = 7)]
        days: usize,
        #[arg(long, default_value_t = 4)]
        weeks: usize,
        #[arg(long, default_value_t = 3)]
        months: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init => config::init_config(),
        Command::Run {
            watch,
            interval_secs,
        } => run(watch, interval_secs).await,
        Command::Demo => demo(),
        Command::Record { task_id } => record(task_id),
        Command::Stats {
            user_id,
            days,
            weeks,
            months,
        } => stats(user_id, days, weeks, months),
    }
}

fn clock(cfg: &Config) -> Result<SystemClock> {
    Ok(SystemClock::new(cfg.timezone()?))
}

async fn run(watch: bool, interval_secs: u64) -> Result<()> {
    let cfg = load_config()?;
    let coordinator = MaintenanceCoordinator::new(cfg.maintenance(), clock(&cfg)?);

    run_once(&coordinator)?;
    if !watch {
        return Ok(());
    }

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
    ticker.tick().await; // the immediate tick; the pass above already covered it
    loop {
        ticker.tick().await;
        run_once(&coordinator)?;
    }
}

fn run_once(coordinator: &MaintenanceCoordinator<SystemClock>) -> Result<()> {
    let mut store = read_state()?;
    let report = coordinator.run(&mut store).context("maintenance pass")?;
    write_state(&store)?;

    println!(
        "maintenance: {} user(s), {} day(s) replayed, {} week / {} month rollup(s), {} failure(s)",
        report.users_processed,
        report.days_replayed,
        report.week_rollups,
        report.month_rollups,
        report.failures.len()
    );
    for (user_id, err) in &report.failures {
        println!("  user {user_id}: {err} (will retry next pass)");
    }
    Ok(())
}

fn demo() -> Result<()> {
    let cfg = load_config()?;
    let today = clock(&cfg)?.today();
    let base = cfg.scoring.base_points;

    let mut store = read_state()?;
    let user_id = store.next_user_id();
    store.insert_user(User {
        id: user_id,
        name: format!("demo-{user_id}"),
        statistic_date: today,
    });

    let first = store.next_task_id();
    store.insert_task(
        Task::new(first, user_id, "morning stretch", TaskType::ToDo, today)
            .recurring()
            .with_iteration_limit(1)
            .scored(base),
    );
    store.insert_task(
        Task::new(first + 1, user_id, "no junk food", TaskType::NotToDo, today)
            .recurring()
            .with_difficulty(2)
            .with_iteration_limit(3)
            .scored(base),
    );
    store.insert_task(
        Task::new(first + 2, user_id, "gym session", TaskType::ToDo, today)
            .recurring()
            .optional()
            .with_difficulty(3)
            .with_repeat_interval(2)
            // Mon, Wed, Fri
            .with_allowed_days(AllowedDays::from_iso_weekdays(&[1, 3, 5]))
            .scored(base),
    );

    write_state(&store)?;
    println!("Seeded user {user_id} with 3 tasks, first due {today}");
    Ok(())
}

fn record(task_id: u64) -> Result<()> {
    let cfg = load_config()?;
    let today = clock(&cfg)?.today();

    let mut store = read_state()?;
    let Some(task) = store.task(task_id).cloned() else {
        bail!("no task with id {task_id}");
    };
    if !is_due_on(&task, today) {
        bail!("task {task_id} is not due today ({today})");
    }

    match record_iteration(task, cfg.scoring.base_points) {
        Ok(task) => {
            println!(
                "Recorded: {} now at {}/{} points, iteration {}/{}",
                task.name, task.current_score, task.max_score, task.iteration_count, task.iteration_limit
            );
            store.save(task).context("save task")?;
            write_state(&store)?;
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}

fn stats(user_id: u64, days: usize, weeks: usize, months: usize) -> Result<()> {
    let store = read_state()?;
    if store.user(user_id).is_none() {
        bail!("no user with id {user_id}");
    }

    println!("== days ==");
    for row in store.recent_days(user_id, days)? {
        println!(
            "{}  {}  {:>5} pts  {:>5.1}%",
            row.date,
            partition_tag(row.is_optional),
            row.points,
            row.percentage
        );
    }

    println!("== weeks ==");
    for row in store.recent_weeks(user_id, weeks)? {
        println!(
            "{} W{:02}  {}  {:>5} pts  {:>5.1}%",
            row.year,
            row.week,
            partition_tag(row.is_optional),
            row.points,
            row.percentage
        );
    }

    println!("== months ==");
    for row in store.recent_months(user_id, months)? {
        println!(
            "{}-{:02}  {}  {:>5} pts  {:>5.1}%",
            row.year,
            row.month,
            partition_tag(row.is_optional),
            row.points,
            row.percentage
        );
    }
    Ok(())
}

fn partition_tag(is_optional: bool) -> &'static str {
    if is_optional { "optional " } else { "mandatory" }
}
