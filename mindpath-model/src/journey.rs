//! Journey types: wellness tasks, milestones and their rewards.
//!
//! Tasks move through a small status lifecycle and grant XP when they are
//! completed. Milestones count task completions towards a fixed target.
//! Every enumerated field is a closed Rust enum, so unknown values are
//! rejected while deserializing instead of being carried around as strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a journey task (e.g. `task-1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a `TaskId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a journey milestone (e.g. `milestone-1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(String);

impl MilestoneId {
    /// Creates a `MilestoneId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MilestoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle status of a task.
///
/// The normal flow is `Pending -> InProgress -> Completed`, but nothing at
/// the data level forbids other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has not been started.
    Pending,
    /// Task is actively being worked on.
    InProgress,
    /// Task has been completed and its XP granted.
    Completed,
}

impl TaskStatus {
    /// Parses the wire form (`pending`, `in-progress`, `completed`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Wellness category a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Mindfulness,
    Physical,
    Social,
    Emotional,
    Cognitive,
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mindfulness => write!(f, "mindfulness"),
            Self::Physical => write!(f, "physical"),
            Self::Social => write!(f, "social"),
            Self::Emotional => write!(f, "emotional"),
            Self::Cognitive => write!(f, "cognitive"),
        }
    }
}

/// Task difficulty, serialized as the integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Challenging = 3,
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Challenging),
            other => Err(format!("difficulty must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d as Self
    }
}

/// A single wellness activity with a status lifecycle and an XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub difficulty: Difficulty,
    pub category: TaskCategory,
    /// XP granted when the task becomes completed.
    pub xp_reward: u32,
    pub date_created: DateTime<Utc>,
    /// Set when the task transitions to [`TaskStatus::Completed`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<DateTime<Utc>>,
    /// Free-text grouping key used for display buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_topic: Option<String>,
    /// Informational duration in minutes.
    pub estimated_duration: u32,
}

impl Task {
    /// Returns `true` if the task is completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// What a milestone grants once it is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// An aggregate goal unlocked after a fixed number of task completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub description: String,
    /// Number of task completions needed (always positive).
    pub tasks_required: u32,
    /// Completions counted so far, never above `tasks_required`.
    pub progress: u32,
    pub completed: bool,
    pub reward: Reward,
}

impl Milestone {
    /// Returns `true` if the milestone can still take progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.completed && self.progress < self.tasks_required
    }
}
