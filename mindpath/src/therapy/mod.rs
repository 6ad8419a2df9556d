//! Therapy chat simulation.
//!
//! Contains the [`SessionSimulator`] (preference selection, session
//! lifecycle, message exchange with delayed canned replies) and the
//! user-editable [`PromptTemplates`] it draws from.

pub mod session;
pub mod templates;

pub use session::{DEFAULT_REPLY_LATENCY, PendingReply, SessionConfig, SessionSimulator};
pub use templates::PromptTemplates;

use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A session cannot start without at least one preference.
    #[error("please select at least one therapy preference")]
    NoPreferencesSelected,
    /// The preference id is not in the catalogue.
    #[error("unknown therapy preference: {0}")]
    UnknownPreference(String),
    /// Messages can only be sent during a session.
    #[error("no therapy session in progress")]
    NotStarted,
    /// Replies are scheduled on a Tokio runtime and none is running.
    #[error("no async runtime available to schedule the reply")]
    NoRuntime,
}
