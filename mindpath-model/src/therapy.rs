//! Therapy types: past sessions, conversations, chat messages and the
//! catalogue of therapy approaches a user can pick from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A recorded conversation from a past session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub date: DateTime<Utc>,
    pub topic: String,
    pub messages: Vec<Message>,
    pub insights: Vec<String>,
}

/// Mood scores (0-10) reported before and after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodScore {
    pub before: u8,
    pub after: u8,
}

impl MoodScore {
    /// Highest score on the mood scale.
    pub const MAX: u8 = 10;

    /// Change in mood over the session (may be negative).
    #[must_use]
    pub fn improvement(&self) -> i32 {
        i32::from(self.after) - i32::from(self.before)
    }
}

/// Summary of a completed therapy session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapySession {
    pub id: String,
    pub date: DateTime<Utc>,
    pub topic: String,
    /// Length of the session in minutes.
    pub duration: u32,
    pub mood: MoodScore,
    pub summary: String,
    pub insights: Vec<String>,
}

/// Identifier of a therapy preference (e.g. `pref-1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceId(String);

impl PreferenceId {
    /// Creates a `PreferenceId` from any string-like value.
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

impl std::fmt::Display for PreferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PreferenceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Icon shown next to a therapy preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceIcon {
    Brain,
    Leaf,
    Lightbulb,
    Heart,
}

/// A therapy approach the user can select before starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyPreference {
    pub id: PreferenceId,
    pub name: String,
    pub description: String,
    pub icon: PreferenceIcon,
}
