//! Pure progression functions for journey tasks and milestones.
//!
//! Every function takes the current collections by reference and returns
//! the next ones; nothing here owns state or reads the clock. Unknown task
//! ids are ignored rather than reported.
//!
//! Milestone rule: any task completion advances every open milestone by
//! one, regardless of category or topic.

use chrono::{DateTime, Utc};
use mindpath_model::journey::{Milestone, Task, TaskId, TaskStatus};

use super::JourneyEvent;

/// Snapshot of the journey collections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JourneyState {
    /// Tasks in display order.
    pub tasks: Vec<Task>,
    /// Milestones in display order.
    pub milestones: Vec<Milestone>,
}

/// Knobs for [`apply_status_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOptions {
    /// Emit [`JourneyEvent::TaskStarted`] when a task moves to in-progress.
    pub announce_task_start: bool,
    /// Ignore requests for the status a task already has. Off by default,
    /// so completing a completed task stamps a new date, emits its event
    /// again and advances open milestones.
    pub ignore_repeats: bool,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            announce_task_start: true,
            ignore_repeats: false,
        }
    }
}

/// Result of applying a status change to a [`JourneyState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state.
    pub state: JourneyState,
    /// Events in emission order: task event first, then milestones.
    pub events: Vec<JourneyEvent>,
    /// `false` when the change was ignored: an unknown id, or a repeated
    /// status with [`StatusOptions::ignore_repeats`] set.
    pub changed: bool,
}

/// Returns `tasks` with the status of `task_id` replaced by `new_status`.
///
/// Moving to [`TaskStatus::Completed`] always stamps `date_completed` with
/// `now`, even when the task was already completed. Any other target status
/// leaves `date_completed` untouched, so reopening a task keeps its previous
/// completion date.
///
/// An unknown `task_id` returns an unchanged copy of `tasks`.
#[must_use]
pub fn set_task_status(
    tasks: &[Task],
    task_id: &TaskId,
    new_status: TaskStatus,
    now: DateTime<Utc>,
) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if &task.id != task_id {
                return task.clone();
            }
            let mut updated = task.clone();
            updated.status = new_status;
            if new_status == TaskStatus::Completed {
                updated.date_completed = Some(now);
            }
            updated
        })
        .collect()
}

/// Advances every open milestone by one completed task.
///
/// A milestone is open when it is not completed and its progress is below
/// `tasks_required`. Open milestones that reach their target become
/// completed and yield a [`JourneyEvent::MilestoneCompleted`]. Everything
/// else is returned as is.
#[must_use]
pub fn advance_milestones(milestones: &[Milestone]) -> (Vec<Milestone>, Vec<JourneyEvent>) {
    let mut events = Vec::new();
    let next = milestones
        .iter()
        .map(|milestone| {
            if !milestone.is_open() {
                return milestone.clone();
            }
            let mut updated = milestone.clone();
            updated.progress += 1;
            if updated.progress >= updated.tasks_required {
                updated.completed = true;
                events.push(JourneyEvent::MilestoneCompleted {
                    milestone_id: updated.id.clone(),
                    title: updated.title.clone(),
                    xp: updated.reward.xp,
                    badge: updated.reward.badge.clone(),
                });
            }
            updated
        })
        .collect();
    (next, events)
}

/// Applies a user-requested status change to the whole journey.
///
/// Combines [`set_task_status`] and, when the task becomes completed,
/// [`advance_milestones`]. Requests for unknown tasks are ignored and
/// reported with `changed == false`. A request for the status a task already
/// has is applied like any other unless [`StatusOptions::ignore_repeats`] is
/// set.
#[must_use]
pub fn apply_status_change(
    state: &JourneyState,
    task_id: &TaskId,
    new_status: TaskStatus,
    now: DateTime<Utc>,
    options: StatusOptions,
) -> Transition {
    let unchanged = || Transition {
        state: state.clone(),
        events: Vec::new(),
        changed: false,
    };

    let Some(task) = state.tasks.iter().find(|t| &t.id == task_id) else {
        tracing::debug!(%task_id, "ignoring status change for unknown task");
        return unchanged();
    };
    if options.ignore_repeats && task.status == new_status {
        tracing::debug!(%task_id, status = %new_status, "task already has requested status");
        return unchanged();
    }

    let tasks = set_task_status(&state.tasks, task_id, new_status, now);
    let mut events = Vec::new();

    match new_status {
        TaskStatus::Completed => {
            events.push(JourneyEvent::TaskCompleted {
                task_id: task.id.clone(),
                title: task.title.clone(),
                xp: task.xp_reward,
            });
            let (milestones, milestone_events) = advance_milestones(&state.milestones);
            events.extend(milestone_events);
            return Transition {
                state: JourneyState { tasks, milestones },
                events,
                changed: true,
            };
        }
        TaskStatus::InProgress if options.announce_task_start => {
            events.push(JourneyEvent::TaskStarted {
                task_id: task.id.clone(),
                title: task.title.clone(),
            });
        }
        TaskStatus::InProgress | TaskStatus::Pending => {}
    }

    Transition {
        state: JourneyState {
            tasks,
            milestones: state.milestones.clone(),
        },
        events,
        changed: true,
    }
}
