//! Derived, read-only journey statistics and display grouping.

use mindpath_model::journey::{Milestone, Task, TaskCategory};

/// Summary numbers shown on the journey page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyStats {
    /// Number of completed tasks.
    pub completed_task_count: usize,
    /// Total number of tasks.
    pub total_task_count: usize,
    /// Sum of `xp_reward` over completed tasks.
    pub total_xp_earned: u64,
    /// `completed / total`, or `0.0` when there are no tasks.
    pub completion_rate: f64,
    /// Number of completed milestones.
    pub milestones_unlocked: usize,
}

impl JourneyStats {
    /// Computes the statistics for the given collections.
    #[must_use]
    pub fn compute(tasks: &[Task], milestones: &[Milestone]) -> Self {
        let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
        let total_xp_earned = completed.iter().map(|t| u64::from(t.xp_reward)).sum();
        Self {
            completed_task_count: completed.len(),
            total_task_count: tasks.len(),
            total_xp_earned,
            completion_rate: ratio(completed.len(), tasks.len()),
            milestones_unlocked: milestones.iter().filter(|m| m.completed).count(),
        }
    }

    /// Completion rate as a whole percentage (0-100).
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        // Bounded to 0..=100 by construction.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.completion_rate * 100.0).round() as u8;
        percent
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let part = u32::try_from(part).unwrap_or(u32::MAX);
    let whole = u32::try_from(whole).unwrap_or(u32::MAX);
    f64::from(part) / f64::from(whole)
}

/// Tasks sharing a grouping key, in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup<'a, K> {
    /// The shared key.
    pub key: K,
    /// Member tasks in collection order.
    pub tasks: Vec<&'a Task>,
}

impl<K> TaskGroup<'_, K> {
    /// Number of completed tasks in the group.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed()).count()
    }

    /// Number of tasks in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the group has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Partitions tasks by `key_fn`.
///
/// Groups appear in order of their key's first occurrence.
fn group_by<'a, K: PartialEq>(
    tasks: &'a [Task],
    key_fn: impl Fn(&'a Task) -> K,
) -> Vec<TaskGroup<'a, K>> {
    let mut groups: Vec<TaskGroup<'a, K>> = Vec::new();
    for task in tasks {
        let key = key_fn(task);
        if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
            group.tasks.push(task);
        } else {
            groups.push(TaskGroup {
                key,
                tasks: vec![task],
            });
        }
    }
    groups
}

/// Groups tasks by related topic. Tasks without a topic share the `None` group.
#[must_use]
pub fn group_by_topic(tasks: &[Task]) -> Vec<TaskGroup<'_, Option<&str>>> {
    group_by(tasks, |t| t.related_topic.as_deref())
}

/// Groups tasks by category.
#[must_use]
pub fn group_by_category(tasks: &[Task]) -> Vec<TaskGroup<'_, TaskCategory>> {
    group_by(tasks, |t| t.category)
}
