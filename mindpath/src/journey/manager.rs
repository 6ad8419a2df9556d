//! Journey manager: owns the journey state and applies user actions.
//!
//! `JourneyManager` is the single owner of the task and milestone
//! collections. Each action runs the pure progression functions against
//! the current snapshot, stores the result, and hands back the events the
//! caller should surface.

use chrono::{DateTime, Utc};
use mindpath_model::journey::{Milestone, Task, TaskCategory, TaskId, TaskStatus};
use mindpath_model::seed::SeedData;

use super::JourneyEvent;
use super::progression::{JourneyState, StatusOptions, apply_status_change};
use super::stats::{JourneyStats, TaskGroup, group_by_category, group_by_topic};

/// Owns the journey collections for one user context.
#[derive(Debug, Clone)]
pub struct JourneyManager {
    state: JourneyState,
    options: StatusOptions,
}

impl JourneyManager {
    /// Creates a manager over the given collections.
    #[must_use]
    pub fn new(tasks: Vec<Task>, milestones: Vec<Milestone>) -> Self {
        Self {
            state: JourneyState { tasks, milestones },
            options: StatusOptions::default(),
        }
    }

    /// Creates a manager seeded with the journey collections of `seed`.
    #[must_use]
    pub fn from_seed(seed: &SeedData) -> Self {
        Self::new(seed.journey_tasks.clone(), seed.journey_milestones.clone())
    }

    /// Sets the status-change options.
    #[must_use]
    pub const fn with_options(mut self, options: StatusOptions) -> Self {
        self.options = options;
        self
    }

    /// Moves a task to in-progress.
    pub fn begin_task(&mut self, task_id: &TaskId) -> Vec<JourneyEvent> {
        self.set_status(task_id, TaskStatus::InProgress)
    }

    /// Completes a task, advancing milestones.
    pub fn complete_task(&mut self, task_id: &TaskId) -> Vec<JourneyEvent> {
        self.set_status(task_id, TaskStatus::Completed)
    }

    /// Sets a task's status, stamping the current time.
    ///
    /// Unknown ids and same-status requests return no events.
    pub fn set_status(&mut self, task_id: &TaskId, new_status: TaskStatus) -> Vec<JourneyEvent> {
        self.set_status_at(task_id, new_status, Utc::now())
    }

    /// Sets a task's status as of `now`.
    pub fn set_status_at(
        &mut self,
        task_id: &TaskId,
        new_status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Vec<JourneyEvent> {
        let transition = apply_status_change(&self.state, task_id, new_status, now, self.options);
        if transition.changed {
            tracing::info!(
                %task_id,
                status = %new_status,
                events = transition.events.len(),
                "task status changed"
            );
            self.state = transition.state;
        }
        transition.events
    }

    /// Returns the current snapshot.
    #[must_use]
    pub const fn state(&self) -> &JourneyState {
        &self.state
    }

    /// Returns all tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    /// Returns all milestones in display order.
    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.state.milestones
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.state.tasks.iter().find(|t| &t.id == task_id)
    }

    /// Computes the journey statistics.
    #[must_use]
    pub fn stats(&self) -> JourneyStats {
        JourneyStats::compute(&self.state.tasks, &self.state.milestones)
    }

    /// Tasks grouped by related topic.
    #[must_use]
    pub fn tasks_by_topic(&self) -> Vec<TaskGroup<'_, Option<&str>>> {
        group_by_topic(&self.state.tasks)
    }

    /// Tasks grouped by category.
    #[must_use]
    pub fn tasks_by_category(&self) -> Vec<TaskGroup<'_, TaskCategory>> {
        group_by_category(&self.state.tasks)
    }
}
