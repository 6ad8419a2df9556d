//! Integration tests for the journey progression engine.
//!
//! Drives `JourneyManager` and the pure progression functions against the
//! built-in seed and hand-built collections.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use mindpath::journey::{
    JourneyEvent, JourneyManager, JourneyState, StatusOptions, advance_milestones,
    apply_status_change, set_task_status,
};
use mindpath_model::journey::{Milestone, MilestoneId, Reward, TaskCategory, TaskId, TaskStatus};
use mindpath_model::seed::SeedData;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn seeded_manager() -> JourneyManager {
    JourneyManager::from_seed(&SeedData::builtin().expect("built-in seed is valid"))
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 9, day, 9, 30, 0).unwrap()
}

fn make_milestone(id: &str, tasks_required: u32, progress: u32, xp: u32) -> Milestone {
    Milestone {
        id: MilestoneId::new(id),
        title: format!("Milestone {id}"),
        description: String::new(),
        tasks_required,
        progress,
        completed: progress >= tasks_required,
        reward: Reward {
            xp,
            badge: Some(format!("{id} badge")),
        },
    }
}

// ===========================================================================
// Seed scenarios
// ===========================================================================

#[test]
fn seed_starts_with_one_completed_task() {
    let manager = seeded_manager();
    let stats = manager.stats();
    assert_eq!(stats.total_task_count, 6);
    assert_eq!(stats.completed_task_count, 1);
    assert_eq!(stats.total_xp_earned, 50);
    assert_eq!(stats.milestones_unlocked, 1);
}

#[test]
fn completing_second_task_adds_its_xp() {
    let mut manager = seeded_manager();
    let events = manager.set_status_at(&TaskId::from("task-2"), TaskStatus::Completed, at(12));

    let stats = manager.stats();
    assert_eq!(stats.total_xp_earned, 125);
    assert_eq!(stats.completed_task_count, 2);

    let task = manager.task(&TaskId::from("task-2")).unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.date_completed, Some(at(12)));

    assert!(matches!(
        &events[0],
        JourneyEvent::TaskCompleted { task_id, xp: 75, .. } if task_id.as_str() == "task-2"
    ));
}

#[test]
fn completion_advances_every_open_milestone() {
    let mut manager = seeded_manager();
    let events = manager.complete_task(&TaskId::from("task-3"));

    let progress: Vec<(u32, bool)> = manager
        .milestones()
        .iter()
        .map(|m| (m.progress, m.completed))
        .collect();
    // m1: 1/3 -> 2/3, m2: 2/3 -> 3/3 (completed), m3 already done.
    assert_eq!(progress, vec![(2, false), (3, true), (5, true)]);

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], JourneyEvent::TaskCompleted { .. }));
    assert!(matches!(
        &events[1],
        JourneyEvent::MilestoneCompleted { milestone_id, .. }
            if milestone_id.as_str() == "milestone-2"
    ));
}

#[test]
fn completed_milestone_never_moves_again() {
    let mut manager = seeded_manager();
    for id in ["task-2", "task-3", "task-4", "task-5", "task-6"] {
        manager.complete_task(&TaskId::from(id));
    }
    let m3 = &manager.milestones()[2];
    assert_eq!((m3.progress, m3.completed), (5, true));
    assert!(manager.milestones().iter().all(|m| m.progress <= m.tasks_required));
    assert_eq!(manager.stats().milestones_unlocked, 3);
}

#[test]
fn begin_task_announces_start_without_touching_milestones() {
    let mut manager = seeded_manager();
    let before = manager.milestones().to_vec();
    let events = manager.begin_task(&TaskId::from("task-4"));

    assert_eq!(
        manager.task(&TaskId::from("task-4")).unwrap().status,
        TaskStatus::InProgress
    );
    assert_eq!(manager.milestones(), before.as_slice());
    assert_eq!(events.len(), 1);
    let notification = events[0].to_notification();
    assert_eq!(notification.title, "Quest started");
}

#[test]
fn start_announcement_can_be_disabled() {
    let mut manager = seeded_manager().with_options(StatusOptions {
        announce_task_start: false,
        ..StatusOptions::default()
    });
    assert!(manager.begin_task(&TaskId::from("task-4")).is_empty());
    assert_eq!(
        manager.task(&TaskId::from("task-4")).unwrap().status,
        TaskStatus::InProgress
    );
}

#[test]
fn recompleting_restamps_and_advances_open_milestones() {
    let mut manager = seeded_manager();
    let task_id = TaskId::from("task-1");
    let events = manager.set_status_at(&task_id, TaskStatus::Completed, at(20));

    assert_eq!(manager.task(&task_id).unwrap().date_completed, Some(at(20)));
    let progress: Vec<u32> = manager.milestones().iter().map(|m| m.progress).collect();
    assert_eq!(progress, vec![2, 3, 5]);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        JourneyEvent::TaskCompleted { task_id, xp: 50, .. } if task_id.as_str() == "task-1"
    ));
    // XP is counted per completed task, not per completion.
    assert_eq!(manager.stats().total_xp_earned, 50);
}

#[test]
fn repeat_completion_is_ignored_when_configured() {
    let mut manager = seeded_manager().with_options(StatusOptions {
        ignore_repeats: true,
        ..StatusOptions::default()
    });
    let task_id = TaskId::from("task-1");
    let before = manager.state().clone();
    let events = manager.set_status_at(&task_id, TaskStatus::Completed, at(20));

    assert!(events.is_empty());
    assert_eq!(manager.state(), &before);
    assert_eq!(
        manager.task(&task_id).unwrap().date_completed,
        before.tasks[0].date_completed
    );
}

#[test]
fn reopened_task_keeps_completion_date() {
    let mut manager = seeded_manager();
    let task_id = TaskId::from("task-1");
    let original = manager.task(&task_id).unwrap().date_completed;
    assert!(original.is_some());

    manager.set_status_at(&task_id, TaskStatus::Pending, at(20));
    let task = manager.task(&task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.date_completed, original);
    assert_eq!(manager.stats().total_xp_earned, 0);
}

#[test]
fn unknown_task_leaves_journey_untouched() {
    let mut manager = seeded_manager();
    let before = manager.state().clone();
    assert!(manager.complete_task(&TaskId::from("task-99")).is_empty());
    assert_eq!(manager.state(), &before);
}

#[test]
fn grouping_by_topic_and_category() {
    let manager = seeded_manager();
    let topics = manager.tasks_by_topic();
    let total: usize = topics.iter().map(|g| g.len()).sum();
    assert_eq!(total, 6);
    assert!(topics.iter().all(|g| !g.is_empty()));

    let categories = manager.tasks_by_category();
    let mindfulness = categories
        .iter()
        .find(|g| g.key == TaskCategory::Mindfulness)
        .expect("seed has a mindfulness task");
    assert!(mindfulness.tasks.iter().all(|t| t.category == TaskCategory::Mindfulness));
}

// ===========================================================================
// Pure function scenarios
// ===========================================================================

#[test]
fn milestone_two_of_three_completes_with_one_notification() {
    let milestones = vec![make_milestone("m", 3, 2, 120)];
    let (next, events) = advance_milestones(&milestones);

    assert_eq!(next[0].progress, 3);
    assert!(next[0].completed);
    assert_eq!(events.len(), 1);
    match &events[0] {
        JourneyEvent::MilestoneCompleted { xp, badge, .. } => {
            assert_eq!(*xp, 120);
            assert_eq!(badge.as_deref(), Some("m badge"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        events[0].to_notification().description,
        "You've mastered \"Milestone m\" and earned 120 XP!"
    );
}

#[test]
fn finished_milestone_survives_repeated_advances() {
    let mut milestones = vec![make_milestone("done", 5, 5, 300)];
    for _ in 0..10 {
        let (next, events) = advance_milestones(&milestones);
        assert!(events.is_empty());
        assert_eq!(next, milestones);
        milestones = next;
    }
}

#[test]
fn set_task_status_with_unknown_id_is_deep_equal() {
    let seed = SeedData::builtin().unwrap();
    let next = set_task_status(
        &seed.journey_tasks,
        &TaskId::from("missing"),
        TaskStatus::Completed,
        at(1),
    );
    assert_eq!(next, seed.journey_tasks);
}

#[test]
fn transition_reports_events_in_order() {
    let seed = SeedData::builtin().unwrap();
    let state = JourneyState {
        tasks: seed.journey_tasks,
        milestones: vec![
            make_milestone("a", 1, 0, 10),
            make_milestone("b", 4, 1, 20),
            make_milestone("c", 2, 1, 30),
        ],
    };
    let transition = apply_status_change(
        &state,
        &TaskId::from("task-5"),
        TaskStatus::Completed,
        at(3),
        StatusOptions::default(),
    );
    assert!(transition.changed);

    let kinds: Vec<String> = transition
        .events
        .iter()
        .map(|e| match e {
            JourneyEvent::TaskStarted { task_id, .. } => format!("started:{task_id}"),
            JourneyEvent::TaskCompleted { task_id, .. } => format!("task:{task_id}"),
            JourneyEvent::MilestoneCompleted { milestone_id, .. } => {
                format!("milestone:{milestone_id}")
            }
        })
        .collect();
    assert_eq!(kinds, vec!["task:task-5", "milestone:a", "milestone:c"]);
    assert_eq!(transition.state.milestones[1].progress, 2);
}
