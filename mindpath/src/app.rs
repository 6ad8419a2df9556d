//! Application state shared by every front end.
//!
//! [`App`] owns the journey, the session simulator, the seeded profile
//! collections and the local record store, and forwards every user-visible
//! state change to a [`NotificationSink`].

use std::path::Path;
use std::sync::Arc;

use mindpath_model::journey::{TaskId, TaskStatus};
use mindpath_model::profile::{Achievement, UserPersonality, UserSettings};
use mindpath_model::seed::{SeedData, SeedError};
use mindpath_model::therapy::{Conversation, Message, PreferenceId, TherapySession};

use crate::config::{AppConfig, ConfigError};
use crate::dashboard::{AchievementFilter, SessionStats, filter_achievements};
use crate::journey::{JourneyEvent, JourneyManager, JourneyStats};
use crate::notify::{Notification, NotificationSink};
use crate::settings::{SettingsUpdate, apply_update, saved_notification};
use crate::storage::records::{load_api_key, load_templates, save_api_key, save_templates};
use crate::storage::{KeyValueStore, StoreError};
use crate::therapy::{PendingReply, PromptTemplates, SessionError, SessionSimulator};

/// Errors on the application's startup and persistence paths.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The seed document did not parse or validate.
    #[error("invalid seed data: {0}")]
    Seed(#[from] SeedError),

    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    SeedFile {
        /// File that was attempted.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Prompt templates need at least one greeting and one response.
    #[error("prompt templates need at least one greeting and one response")]
    UnusableTemplates,

    /// A local record could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The therapy session rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Terminal I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Loads the seed document at `path`, or the built-in one when `None`.
///
/// # Errors
///
/// Returns [`AppError::SeedFile`] if the file cannot be read and
/// [`AppError::Seed`] if it does not parse or validate.
pub fn load_seed(path: Option<&Path>) -> Result<SeedData, AppError> {
    let Some(path) = path else {
        return Ok(SeedData::builtin()?);
    };
    let raw = std::fs::read_to_string(path).map_err(|source| AppError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;
    let seed = SeedData::from_json(&raw)?;
    tracing::info!(path = %path.display(), tasks = seed.journey_tasks.len(), "seed loaded");
    Ok(seed)
}

/// The whole client-side state for one user.
pub struct App {
    journey: JourneyManager,
    session: SessionSimulator,
    sessions: Vec<TherapySession>,
    conversations: Vec<Conversation>,
    personality: UserPersonality,
    achievements: Vec<Achievement>,
    settings: UserSettings,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn NotificationSink>,
}

impl App {
    /// Builds the application from seed data.
    ///
    /// Prompt templates are read from `store`, falling back to the defaults.
    #[must_use]
    pub fn new(
        seed: SeedData,
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let journey = JourneyManager::from_seed(&seed).with_options(config.journey);
        let templates = load_templates(store.as_ref());
        let session = SessionSimulator::new(seed.therapy_preferences, templates, &config.session);
        Self {
            journey,
            session,
            sessions: seed.therapy_sessions,
            conversations: seed.conversations,
            personality: seed.personality,
            achievements: seed.achievements,
            settings: seed.settings,
            store,
            sink,
        }
    }

    // -- Journey --

    /// Read access to the journey.
    #[must_use]
    pub const fn journey(&self) -> &JourneyManager {
        &self.journey
    }

    /// Moves a task to in-progress and announces it.
    pub fn begin_task(&mut self, task_id: &TaskId) -> Vec<JourneyEvent> {
        self.set_task_status(task_id, TaskStatus::InProgress)
    }

    /// Completes a task and announces the task and any milestone it finished.
    pub fn complete_task(&mut self, task_id: &TaskId) -> Vec<JourneyEvent> {
        self.set_task_status(task_id, TaskStatus::Completed)
    }

    /// Applies a status change and forwards its events to the sink.
    pub fn set_task_status(&mut self, task_id: &TaskId, status: TaskStatus) -> Vec<JourneyEvent> {
        let events = self.journey.set_status(task_id, status);
        for event in &events {
            self.sink.notify(event.to_notification());
        }
        events
    }

    /// Journey counters.
    #[must_use]
    pub fn journey_stats(&self) -> JourneyStats {
        self.journey.stats()
    }

    // -- Therapy --

    /// Read access to the session simulator.
    #[must_use]
    pub const fn session(&self) -> &SessionSimulator {
        &self.session
    }

    /// Toggles a therapy preference.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPreference`] for ids outside the
    /// catalogue.
    pub fn toggle_preference(&mut self, id: &PreferenceId) -> Result<bool, SessionError> {
        self.session.toggle_preference(id)
    }

    /// Starts a session and returns the greeting.
    ///
    /// With no preference selected, a destructive notification is sent and
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoPreferencesSelected`] in that case.
    pub fn start_session(&mut self) -> Result<Message, SessionError> {
        self.session.start_session().inspect_err(|e| {
            if *e == SessionError::NoPreferencesSelected {
                self.sink.notify(Notification::destructive(
                    "Please select at least one therapy preference",
                ));
            }
        })
    }

    /// Sends a user message; see [`SessionSimulator::send_message`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no session is running or no runtime is
    /// available.
    pub fn send_message(&mut self, text: &str) -> Result<Option<PendingReply>, SessionError> {
        self.session.send_message(text)
    }

    /// Ends the current session.
    pub fn end_session(&mut self) {
        self.session.end_session();
    }

    /// Replaces the prompt templates and persists them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnusableTemplates`] if either pool is empty and
    /// [`AppError::Store`] if the record cannot be written. The templates are
    /// neither saved nor applied in those cases.
    pub fn set_prompt_templates(&mut self, templates: PromptTemplates) -> Result<(), AppError> {
        if !templates.is_usable() {
            return Err(AppError::UnusableTemplates);
        }
        save_templates(self.store.as_ref(), &templates)?;
        self.session.set_templates(templates);
        self.sink.notify(Notification::info(
            "Therapy prompts updated",
            "Your changes have been saved successfully",
        ));
        Ok(())
    }

    /// Stores the external API credential. An empty key clears it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written.
    pub fn set_api_key(&self, key: &str) -> Result<(), StoreError> {
        save_api_key(self.store.as_ref(), key)?;
        let title = if key.is_empty() {
            "API key removed"
        } else {
            "API key saved"
        };
        self.sink.notify(Notification::info(title, ""));
        Ok(())
    }

    /// The stored API credential, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be read.
    pub fn api_key(&self) -> Result<Option<String>, StoreError> {
        load_api_key(self.store.as_ref())
    }

    // -- Dashboard --

    /// Past therapy sessions.
    #[must_use]
    pub fn sessions(&self) -> &[TherapySession] {
        &self.sessions
    }

    /// Past conversations.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Headline session statistics.
    #[must_use]
    pub fn session_stats(&self) -> SessionStats {
        SessionStats::compute(&self.sessions)
    }

    #[must_use]
    pub const fn personality(&self) -> &UserPersonality {
        &self.personality
    }

    /// Achievements matching `filter`.
    #[must_use]
    pub fn achievements(&self, filter: AchievementFilter) -> Vec<&Achievement> {
        filter_achievements(&self.achievements, filter)
    }

    // -- Settings --

    #[must_use]
    pub const fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Applies a settings change and confirms it.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings = apply_update(&self.settings, update);
        tracing::info!("settings updated");
        self.sink.notify(saved_notification());
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("journey", &self.journey)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
