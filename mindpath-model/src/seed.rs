//! Seed data: the static collections every session starts from.
//!
//! Seed data is the ingestion boundary of the application. Parsing goes
//! through serde (which already rejects unknown enum values) and is followed
//! by [`SeedData::validate`], which enforces the cross-field invariants the
//! type system cannot express on its own.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::journey::{Milestone, Task, TaskStatus};
use crate::profile::{Achievement, UserPersonality, UserSettings};
use crate::therapy::{Conversation, MoodScore, TherapyPreference, TherapySession};

/// Seed document compiled into the binary.
const BUILTIN_SEED: &str = include_str!("../data/seed.json");

/// Highest value on percentage scales (trait scores, achievement progress).
const PERCENT_MAX: u8 = 100;

/// Errors raised while ingesting seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The document is not valid JSON or contains an unknown value.
    #[error("failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records of the same kind share an identifier.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Record kind (`task`, `milestone`, ...).
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },

    /// A task's completion date disagrees with its status.
    #[error("task {task_id}: dateCompleted must be set if and only if status is completed")]
    CompletionDateMismatch {
        /// The offending task.
        task_id: String,
    },

    /// A milestone's counters are inconsistent.
    #[error("milestone {milestone_id}: {reason}")]
    InvalidMilestone {
        /// The offending milestone.
        milestone_id: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A bounded score lies outside its scale.
    #[error("{record}: {field} is {value} (max {max})")]
    OutOfRange {
        /// Identifier of the offending record.
        record: String,
        /// Name of the field.
        field: &'static str,
        /// The value found.
        value: u8,
        /// Upper bound of the scale.
        max: u8,
    },
}

/// Every static collection the application is seeded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub therapy_sessions: Vec<TherapySession>,
    pub conversations: Vec<Conversation>,
    pub therapy_preferences: Vec<TherapyPreference>,
    pub personality: UserPersonality,
    pub settings: UserSettings,
    pub journey_tasks: Vec<Task>,
    pub journey_milestones: Vec<Milestone>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl SeedData {
    /// Parses and validates the seed data compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the embedded document is invalid.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Parses and validates a seed document.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Parse`] for malformed JSON or unknown enum
    /// values, and the other variants for invariant violations.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Checks the invariants serde cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SeedError> {
        ensure_unique("task", self.journey_tasks.iter().map(|t| t.id.as_str()))?;
        ensure_unique(
            "milestone",
            self.journey_milestones.iter().map(|m| m.id.as_str()),
        )?;
        ensure_unique(
            "preference",
            self.therapy_preferences.iter().map(|p| p.id.as_str()),
        )?;
        ensure_unique("achievement", self.achievements.iter().map(|a| a.id.as_str()))?;

        for task in &self.journey_tasks {
            validate_task(task)?;
        }
        for milestone in &self.journey_milestones {
            validate_milestone(milestone)?;
        }
        for session in &self.therapy_sessions {
            ensure_at_most(&session.id, "mood.before", session.mood.before, MoodScore::MAX)?;
            ensure_at_most(&session.id, "mood.after", session.mood.after, MoodScore::MAX)?;
        }
        for (name, score) in &self.personality.traits {
            ensure_at_most(&format!("trait {name}"), "score", *score, PERCENT_MAX)?;
        }
        for achievement in &self.achievements {
            ensure_at_most(&achievement.id, "progress", achievement.progress, PERCENT_MAX)?;
        }
        Ok(())
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn ensure_at_most(record: &str, field: &'static str, value: u8, max: u8) -> Result<(), SeedError> {
    if value > max {
        return Err(SeedError::OutOfRange {
            record: record.to_string(),
            field,
            value,
            max,
        });
    }
    Ok(())
}

fn validate_task(task: &Task) -> Result<(), SeedError> {
    let completed = task.status == TaskStatus::Completed;
    if completed != task.date_completed.is_some() {
        return Err(SeedError::CompletionDateMismatch {
            task_id: task.id.to_string(),
        });
    }
    Ok(())
}

fn validate_milestone(milestone: &Milestone) -> Result<(), SeedError> {
    let reason = if milestone.tasks_required == 0 {
        Some("tasksRequired must be positive")
    } else if milestone.progress > milestone.tasks_required {
        Some("progress exceeds tasksRequired")
    } else if milestone.completed != (milestone.progress >= milestone.tasks_required) {
        Some("completed must be true exactly when progress reaches tasksRequired")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SeedError::InvalidMilestone {
            milestone_id: milestone.id.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
