//! Integration tests for the therapy session simulator.
//!
//! Uses paused Tokio time so reply latency is driven deterministically.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use mindpath::therapy::{PromptTemplates, SessionConfig, SessionError, SessionSimulator};
use mindpath_model::seed::SeedData;
use mindpath_model::therapy::{PreferenceId, Role};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_simulator(templates: PromptTemplates, seed: u64) -> SessionSimulator {
    let data = SeedData::builtin().expect("built-in seed is valid");
    SessionSimulator::new(
        data.therapy_preferences,
        templates,
        &SessionConfig {
            reply_latency: Duration::from_millis(1500),
            rng_seed: Some(seed),
        },
    )
}

fn select(sim: &mut SessionSimulator, ids: &[&str]) {
    for id in ids {
        assert!(sim.toggle_preference(&PreferenceId::from(*id)).unwrap());
    }
}

fn single_reply_templates(greeting: &str, reply: &str) -> PromptTemplates {
    PromptTemplates {
        greetings: vec![greeting.to_string()],
        responses: vec![reply.to_string()],
    }
}

// ===========================================================================
// Session lifecycle
// ===========================================================================

#[test]
fn greeting_replaces_placeholder_with_lowercased_names() {
    let mut sim = make_simulator(
        single_reply_templates("Welcome. Today we use {preferences} techniques.", "Go on."),
        1,
    );
    select(&mut sim, &["pref-4", "pref-2"]);

    let greeting = sim.start_session().unwrap();
    assert_eq!(
        greeting.content,
        "Welcome. Today we use mindfulness-based, compassion-focused techniques."
    );
    assert_eq!(greeting.role, Role::Assistant);
    assert!(sim.is_started());
}

#[test]
fn empty_selection_is_rejected_without_state_change() {
    let mut sim = make_simulator(PromptTemplates::default(), 1);
    select(&mut sim, &["pref-1"]);
    sim.toggle_preference(&PreferenceId::from("pref-1")).unwrap();

    assert_eq!(sim.start_session(), Err(SessionError::NoPreferencesSelected));
    assert!(!sim.is_started());
    assert!(sim.messages().is_empty());
    assert_eq!(
        SessionError::NoPreferencesSelected.to_string(),
        "please select at least one therapy preference"
    );
}

#[test]
fn same_rng_seed_gives_same_greeting() {
    let templates = PromptTemplates {
        greetings: (0..20).map(|i| format!("Greeting {i} for {{preferences}}")).collect(),
        responses: vec!["ok".to_string()],
    };
    let mut a = make_simulator(templates.clone(), 42);
    let mut b = make_simulator(templates, 42);
    select(&mut a, &["pref-3"]);
    select(&mut b, &["pref-3"]);

    let first = a.start_session().unwrap();
    let second = b.start_session().unwrap();
    assert_eq!(first.content, second.content);
    assert!(first.content.ends_with("for solution-focused"));
}

// ===========================================================================
// Message exchange
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn reply_lands_only_after_latency() {
    let mut sim = make_simulator(single_reply_templates("Hi {preferences}", "Tell me more."), 3);
    select(&mut sim, &["pref-1"]);
    sim.start_session().unwrap();

    let pending = sim.send_message("Work has been hard").unwrap().unwrap();
    tokio::time::sleep(Duration::from_millis(1499)).await;
    assert_eq!(sim.messages().len(), 2);
    assert!(sim.is_thinking());

    assert!(pending.wait().await);
    let messages = sim.messages();
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(messages[2].content, "Tell me more.");
    assert!(!sim.is_thinking());
}

#[tokio::test(start_paused = true)]
async fn thinking_stays_set_while_any_reply_is_pending() {
    let mut sim = make_simulator(single_reply_templates("Hi {preferences}", "Mm."), 3);
    select(&mut sim, &["pref-2"]);
    sim.start_session().unwrap();

    let first = sim.send_message("one").unwrap().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = sim.send_message("two").unwrap().unwrap();

    assert!(first.wait().await);
    assert!(sim.is_thinking());
    assert!(second.wait().await);
    assert!(!sim.is_thinking());

    let contents: Vec<String> = sim.messages().into_iter().map(|m| m.content).collect();
    assert_eq!(contents, vec!["Hi mindfulness-based", "one", "two", "Mm.", "Mm."]);
}

#[tokio::test(start_paused = true)]
async fn ending_session_drops_in_flight_replies() {
    let mut sim = make_simulator(PromptTemplates::default(), 9);
    select(&mut sim, &["pref-1", "pref-3"]);
    sim.start_session().unwrap();
    let pending = sim.send_message("hello").unwrap().unwrap();

    sim.end_session();
    assert!(!pending.wait().await);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(sim.messages().is_empty());
    assert!(matches!(sim.send_message("still there?"), Err(SessionError::NotStarted)));
    // Selections survive the session.
    assert_eq!(sim.selected_preferences().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn swapped_templates_apply_to_later_replies() {
    let mut sim = make_simulator(single_reply_templates("Hi {preferences}", "old"), 5);
    select(&mut sim, &["pref-1"]);
    sim.start_session().unwrap();

    sim.set_templates(single_reply_templates("Hey {preferences}", "new"));
    let pending = sim.send_message("hello").unwrap().unwrap();
    assert!(pending.wait().await);
    assert_eq!(sim.messages().last().unwrap().content, "new");
}

#[tokio::test(start_paused = true)]
async fn dropping_simulator_cancels_replies() {
    let mut sim = make_simulator(PromptTemplates::default(), 5);
    select(&mut sim, &["pref-1"]);
    sim.start_session().unwrap();
    let pending = sim.send_message("bye").unwrap().unwrap();
    drop(sim);
    assert!(!pending.wait().await);
}
