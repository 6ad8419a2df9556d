//! `Mindpath` command-line client for the wellness journey and therapy sessions.
//!
//! Reads one command per line from stdin. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/mindpath/config.toml`).
//!
//! ```bash
//! # Built-in seed, records under the platform data directory
//! cargo run --bin mindpath
//!
//! # Fast, reproducible replies and no persistence
//! cargo run --bin mindpath -- --reply-latency-ms 200 --rng-seed 7 --ephemeral
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mindpath::app::{App, AppError, load_seed};
use mindpath::config::{AppConfig, CliArgs};
use mindpath::dashboard::{AchievementFilter, duration_series, mood_series, trait_scores};
use mindpath::notify::{Notification, NotificationSink};
use mindpath::settings::SettingsUpdate;
use mindpath_model::journey::{TaskId, TaskStatus};
use mindpath_model::therapy::{PreferenceId, Role};

const HELP: &str = "\
commands:
  tasks                      list journey tasks by topic
  topics                     task counts per topic
  milestones                 milestone progress
  stats                      journey totals
  begin <task-id>            start a task
  complete <task-id>         complete a task
  prefs                      list therapy preferences
  select <pref-id>           toggle a therapy preference
  start                      start a therapy session
  say <text>                 send a message to the therapist
  end                        end the session
  dashboard                  session statistics, charts and conversations
  achievements [filter]      all | completed | in-progress
  settings                   show settings
  set <field> <value>        change a setting
  apikey <key>               store the AI API key (empty clears it)
  help                       show this help
  quit                       exit";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    // Logs go to a file so stdout stays free for the session.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("mindpath starting");

    let seed = load_seed(config.seed_path.as_deref())?;
    let store = config.open_store();
    let mut app = App::new(seed, &config, store, Arc::new(ConsoleSink));

    let result = run_repl(&mut app).await;

    tracing::info!("mindpath exiting");
    result
}

/// Sends logs to `file_path` (default `$TMPDIR/mindpath.log`).
///
/// `RUST_LOG` overrides `level`. The returned guard flushes the writer when
/// dropped, so it must live as long as the process.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let log_path = file_path.map_or_else(
        || std::env::temp_dir().join("mindpath.log"),
        Path::to_path_buf,
    );
    let (dir, name) = (log_path.parent()?, log_path.file_name()?);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();
    Some(guard)
}

/// Prints notifications inline with the command output.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        println!("{notification}");
    }
}

/// Read commands until `quit` or end of input.
async fn run_repl(app: &mut App) -> Result<(), AppError> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "say" => say(app, rest).await,
            _ => run_command(app, command, rest),
        }
    }
    Ok(())
}

/// Send a message and print the reply once it arrives.
async fn say(app: &mut App, text: &str) {
    match app.send_message(text) {
        Ok(Some(pending)) => {
            println!("(therapist is typing...)");
            if pending.wait().await
                && let Some(reply) = app
                    .session()
                    .messages()
                    .into_iter()
                    .rev()
                    .find(|m| m.role == Role::Assistant)
            {
                println!("therapist: {}", reply.content);
            }
        }
        Ok(None) => {}
        Err(e) => println!("error: {e}"),
    }
}

/// Handle every synchronous command.
#[allow(clippy::too_many_lines)]
fn run_command(app: &mut App, command: &str, rest: &str) {
    match command {
        "tasks" => {
            for group in app.journey().tasks_by_topic() {
                println!("{}", group.key.unwrap_or("Other"));
                for task in &group.tasks {
                    println!(
                        "  {:<8} [{}] {} ({} XP, {} min)",
                        task.id.as_str(),
                        task.status, task.title, task.xp_reward, task.estimated_duration
                    );
                }
            }
        }
        "topics" => {
            for group in app.journey().tasks_by_topic() {
                println!(
                    "{}: {}/{} completed",
                    group.key.unwrap_or("Other"),
                    group.completed_count(),
                    group.len()
                );
            }
        }
        "milestones" => {
            for m in app.journey().milestones() {
                let mark = if m.completed { "x" } else { " " };
                println!(
                    "[{mark}] {} {}/{} ({} XP)",
                    m.title, m.progress, m.tasks_required, m.reward.xp
                );
            }
        }
        "stats" => {
            let stats = app.journey_stats();
            println!(
                "{}/{} tasks completed ({}%), {} XP earned, {} milestones unlocked",
                stats.completed_task_count,
                stats.total_task_count,
                stats.completion_percent(),
                stats.total_xp_earned,
                stats.milestones_unlocked
            );
        }
        "begin" | "complete" => {
            let task_id = TaskId::from(rest);
            let Some(task) = app.journey().task(&task_id) else {
                println!("no such task: {rest}");
                return;
            };
            let was = task.status;
            let status = if command == "begin" {
                TaskStatus::InProgress
            } else {
                TaskStatus::Completed
            };
            if app.set_task_status(&task_id, status).is_empty() && was == status {
                println!("{task_id} is already {status}");
            }
        }
        "prefs" => {
            let session = app.session();
            for pref in session.catalogue() {
                let mark = if session.is_selected(&pref.id) { "x" } else { " " };
                println!(
                    "[{mark}] {:<6} {} - {}",
                    pref.id.as_str(),
                    pref.name,
                    pref.description
                );
            }
        }
        "select" => match app.toggle_preference(&PreferenceId::from(rest)) {
            Ok(true) => println!("selected {rest}"),
            Ok(false) => println!("deselected {rest}"),
            Err(e) => println!("error: {e}"),
        },
        "start" => {
            if let Ok(greeting) = app.start_session() {
                println!("therapist: {}", greeting.content);
            }
        }
        "end" => {
            app.end_session();
            println!("session ended");
        }
        "dashboard" => {
            let stats = app.session_stats();
            println!(
                "{} sessions, {} minutes, average mood improvement {:.1}",
                stats.total_sessions, stats.total_minutes, stats.average_mood_improvement
            );
            for point in mood_series(app.sessions()) {
                println!(
                    "  {}: mood {} -> {} ({})",
                    point.date, point.before, point.after, point.topic
                );
            }
            for point in duration_series(app.sessions()) {
                println!("  {}: {} minutes ({})", point.date, point.minutes, point.topic);
            }
            for (name, score) in trait_scores(app.personality()) {
                println!("  {name}: {score}");
            }
            for conversation in app.conversations() {
                println!(
                    "  {} {} ({} messages)",
                    conversation.date.format("%Y-%m-%d"),
                    conversation.topic,
                    conversation.messages.len()
                );
                for insight in &conversation.insights {
                    println!("    - {insight}");
                }
            }
        }
        "achievements" => {
            let filter = if rest.is_empty() {
                Some(AchievementFilter::All)
            } else {
                AchievementFilter::parse(rest)
            };
            match filter {
                Some(filter) => {
                    for a in app.achievements(filter) {
                        println!("{:<24} {:>3}% {}", a.title, a.progress, a.description);
                    }
                }
                None => println!("unknown filter: {rest}"),
            }
        }
        "settings" => {
            let s = app.settings();
            println!("name: {}", s.name);
            println!("email: {}", s.email);
            println!("theme: {}", s.preferences.theme);
            println!("notifications: {}", s.preferences.notifications);
            println!("sound-effects: {}", s.preferences.sound_effects);
            println!("therapist-style: {}", s.preferences.therapist_style);
            println!("session-duration: {}", s.preferences.session_duration);
        }
        "set" => {
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            match SettingsUpdate::parse(field, value.trim()) {
                Ok(update) => app.update_settings(update),
                Err(e) => println!("error: {e}"),
            }
        }
        "apikey" => {
            if let Err(e) = app.set_api_key(rest) {
                println!("error: {e}");
            }
        }
        other => println!("unknown command: {other} (try `help`)"),
    }
}
