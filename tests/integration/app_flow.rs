//! End-to-end flows through `App`.
//!
//! Wires the application to a `ChannelSink` and an in-memory store and
//! checks that user actions produce the expected state and notifications.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use mindpath::app::{App, load_seed};
use mindpath::config::AppConfig;
use mindpath::dashboard::{AchievementFilter, duration_series};
use mindpath::notify::{ChannelSink, Notification, Severity};
use mindpath::settings::SettingsUpdate;
use mindpath::storage::MemoryStore;
use mindpath::therapy::{SessionConfig, SessionError};
use mindpath_model::journey::TaskId;
use mindpath_model::profile::Theme;
use mindpath_model::therapy::{PreferenceId, Role};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_app(config: &AppConfig) -> (App, mpsc::Receiver<Notification>) {
    let (sink, rx) = ChannelSink::new(32);
    let app = App::new(
        load_seed(None).expect("built-in seed"),
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(sink),
    );
    (app, rx)
}

fn fast_config() -> AppConfig {
    AppConfig {
        ephemeral: true,
        session: SessionConfig {
            reply_latency: Duration::from_millis(200),
            rng_seed: Some(11),
        },
        ..AppConfig::default()
    }
}

fn drain(rx: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// ===========================================================================
// Journey
// ===========================================================================

#[test]
fn quest_flow_notifies_in_order() {
    let (mut app, mut rx) = make_app(&fast_config());

    app.begin_task(&TaskId::from("task-3"));
    app.complete_task(&TaskId::from("task-3"));
    app.complete_task(&TaskId::from("task-3"));

    let seen = drain(&mut rx);
    let titles: Vec<&str> = seen.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Quest started",
            "Quest completed! \u{1f389}",
            "Achievement unlocked! \u{1f3c6}",
            "Quest completed! \u{1f389}",
            "Achievement unlocked! \u{1f3c6}",
        ]
    );
    assert_eq!(
        seen[1].description,
        "You earned 100 XP for completing \"Schedule Worry Time\""
    );
    assert_eq!(app.journey_stats().total_xp_earned, 150);
}

#[test]
fn unknown_task_is_silent() {
    let (mut app, mut rx) = make_app(&fast_config());
    assert!(app.complete_task(&TaskId::from("task-404")).is_empty());
    assert!(drain(&mut rx).is_empty());
}

// ===========================================================================
// Therapy
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn therapy_flow_from_selection_to_reply() {
    let (mut app, mut rx) = make_app(&fast_config());

    assert_eq!(app.start_session(), Err(SessionError::NoPreferencesSelected));
    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].severity, Severity::Destructive);

    app.toggle_preference(&PreferenceId::from("pref-2")).unwrap();
    let greeting = app.start_session().unwrap();
    assert!(greeting.content.contains("mindfulness-based"));

    let pending = app.send_message("I can't sleep").unwrap().unwrap();
    assert!(app.session().is_thinking());
    assert!(pending.wait().await);

    let messages = app.session().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role, Role::Assistant);

    app.end_session();
    assert!(app.session().messages().is_empty());
    assert!(drain(&mut rx).is_empty());
}

// ===========================================================================
// Settings, dashboard and records
// ===========================================================================

#[test]
fn settings_changes_are_confirmed() {
    let (mut app, mut rx) = make_app(&fast_config());
    let update = SettingsUpdate::parse("theme", "dark").unwrap();
    app.update_settings(update);
    app.update_settings(SettingsUpdate::parse("session-duration", "50").unwrap());

    assert_eq!(app.settings().preferences.theme, Theme::Dark);
    assert_eq!(app.settings().preferences.session_duration, 50);
    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|n| n.title == "Settings updated"));
}

#[test]
fn dashboard_views_reflect_seed() {
    let (app, _rx) = make_app(&fast_config());
    let stats = app.session_stats();
    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.total_minutes, 120);
    assert_eq!(app.conversations().len(), 2);
    let minutes: u64 = duration_series(app.sessions())
        .iter()
        .map(|p| u64::from(p.minutes))
        .sum();
    assert_eq!(minutes, stats.total_minutes);
    assert_eq!(app.achievements(AchievementFilter::Completed).len(), 3);
    assert_eq!(app.personality().traits.len(), 5);
}

#[test]
fn api_key_is_kept_in_store() {
    let (app, mut rx) = make_app(&fast_config());
    app.set_api_key("sk-flow").unwrap();
    assert_eq!(app.api_key().unwrap().as_deref(), Some("sk-flow"));
    app.set_api_key("").unwrap();
    assert_eq!(app.api_key().unwrap(), None);

    let titles: Vec<String> = drain(&mut rx).into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["API key saved", "API key removed"]);
}

#[test]
fn full_channel_drops_notifications_without_blocking() {
    let (sink, mut rx) = ChannelSink::new(1);
    let mut app = App::new(
        load_seed(None).unwrap(),
        &fast_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(sink),
    );
    // Task completion plus milestone: two notifications, one slot.
    app.complete_task(&TaskId::from("task-2"));
    assert_eq!(drain(&mut rx).len(), 1);
    assert_eq!(app.journey_stats().completed_task_count, 2);
}
