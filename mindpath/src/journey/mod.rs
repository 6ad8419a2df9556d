//! The wellness journey: tasks, milestones and how they progress.
//!
//! [`progression`] holds the pure transition functions, [`stats`] the
//! derived read-only statistics, and [`JourneyManager`] owns the state and
//! applies transitions on behalf of the application layer.

pub mod manager;
pub mod progression;
pub mod stats;

pub use manager::JourneyManager;
pub use progression::{
    JourneyState, StatusOptions, Transition, advance_milestones, apply_status_change,
    set_task_status,
};
pub use stats::{JourneyStats, TaskGroup, group_by_category, group_by_topic};

use mindpath_model::journey::{MilestoneId, TaskId};

use crate::notify::Notification;

/// Something that just happened on the journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEvent {
    /// A task moved to in-progress.
    TaskStarted {
        /// The task that was started.
        task_id: TaskId,
        /// Its title.
        title: String,
    },
    /// A task was completed and its XP granted.
    TaskCompleted {
        /// The task that was completed.
        task_id: TaskId,
        /// Its title.
        title: String,
        /// XP granted for it.
        xp: u32,
    },
    /// A milestone reached its target.
    MilestoneCompleted {
        /// The milestone that was completed.
        milestone_id: MilestoneId,
        /// Its title.
        title: String,
        /// XP granted by its reward.
        xp: u32,
        /// Badge granted by its reward, if any.
        badge: Option<String>,
    },
}

impl JourneyEvent {
    /// Renders the event as a user-facing notification.
    #[must_use]
    pub fn to_notification(&self) -> Notification {
        match self {
            Self::TaskStarted { title, .. } => {
                Notification::info("Quest started", format!("You've started \"{title}\""))
            }
            Self::TaskCompleted { title, xp, .. } => Notification::info(
                "Quest completed! \u{1f389}",
                format!("You earned {xp} XP for completing \"{title}\""),
            ),
            Self::MilestoneCompleted { title, xp, .. } => Notification::info(
                "Achievement unlocked! \u{1f3c6}",
                format!("You've mastered \"{title}\" and earned {xp} XP!"),
            ),
        }
    }
}
