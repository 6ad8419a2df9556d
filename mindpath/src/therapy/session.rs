//! Simulated therapy chat session.
//!
//! The simulator holds the selected therapy preferences and the message
//! log. Each user message schedules a canned assistant reply that arrives
//! after a fixed latency. Pending replies are tied to the session through a
//! [`CancellationToken`]: ending or restarting the session (or dropping the
//! simulator) cancels them, so a stale reply never lands in a new session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mindpath_model::therapy::{Message, PreferenceId, Role, TherapyPreference};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::SessionError;
use super::templates::PromptTemplates;

/// Default delay before the simulated assistant replies.
pub const DEFAULT_REPLY_LATENCY: Duration = Duration::from_millis(1500);

/// Session simulator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay before each assistant reply is delivered.
    pub reply_latency: Duration,
    /// Fixed RNG seed for reproducible template picks.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_latency: DEFAULT_REPLY_LATENCY,
            rng_seed: None,
        }
    }
}

/// Message log shared between the simulator and its reply tasks.
#[derive(Debug, Default)]
struct SessionLog {
    messages: Vec<Message>,
    /// Replies scheduled but not yet delivered.
    pending_replies: usize,
}

/// Handle to an assistant reply that has been scheduled.
#[derive(Debug)]
pub struct PendingReply {
    handle: JoinHandle<bool>,
}

impl PendingReply {
    /// Waits for the reply. Returns `true` if it was delivered, `false` if
    /// the session was cancelled first.
    pub async fn wait(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}

/// A single user's simulated therapy session.
pub struct SessionSimulator {
    catalogue: Vec<TherapyPreference>,
    selected: Vec<PreferenceId>,
    templates: PromptTemplates,
    reply_latency: Duration,
    rng: StdRng,
    log: Arc<Mutex<SessionLog>>,
    cancel: CancellationToken,
    started: bool,
}

impl SessionSimulator {
    /// Creates a simulator over a preference catalogue.
    #[must_use]
    pub fn new(
        catalogue: Vec<TherapyPreference>,
        templates: PromptTemplates,
        config: &SessionConfig,
    ) -> Self {
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            catalogue,
            selected: Vec::new(),
            templates,
            reply_latency: config.reply_latency,
            rng,
            log: Arc::new(Mutex::new(SessionLog::default())),
            cancel: CancellationToken::new(),
            started: false,
        }
    }

    /// All preferences the user can choose from.
    #[must_use]
    pub fn catalogue(&self) -> &[TherapyPreference] {
        &self.catalogue
    }

    /// Returns `true` if the preference is currently selected.
    #[must_use]
    pub fn is_selected(&self, id: &PreferenceId) -> bool {
        self.selected.contains(id)
    }

    /// Selected preferences, in catalogue order.
    #[must_use]
    pub fn selected_preferences(&self) -> Vec<&TherapyPreference> {
        self.catalogue
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .collect()
    }

    /// Selects or deselects a preference. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPreference`] if `id` is not in the
    /// catalogue.
    pub fn toggle_preference(&mut self, id: &PreferenceId) -> Result<bool, SessionError> {
        if !self.catalogue.iter().any(|p| &p.id == id) {
            return Err(SessionError::UnknownPreference(id.to_string()));
        }
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(id.clone());
            Ok(true)
        }
    }

    /// Replaces the template pools used for future messages.
    pub fn set_templates(&mut self, templates: PromptTemplates) {
        self.templates = templates;
    }

    /// Current template pools.
    #[must_use]
    pub const fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Starts a session and returns the greeting.
    ///
    /// Any previous session is ended first, cancelling its pending replies.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoPreferencesSelected`] without changing any
    /// state when nothing is selected.
    pub fn start_session(&mut self) -> Result<Message, SessionError> {
        if self.selected.is_empty() {
            return Err(SessionError::NoPreferencesSelected);
        }
        self.reset();

        let names = self
            .selected_preferences()
            .iter()
            .map(|p| p.name.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        let greeting = make_message(Role::Assistant, self.templates.greeting(&mut self.rng, &names));
        self.log.lock().messages.push(greeting.clone());
        self.started = true;
        tracing::info!(preferences = %names, "therapy session started");
        Ok(greeting)
    }

    /// Sends a user message and schedules the assistant reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before [`start_session`] and
    /// [`SessionError::NoRuntime`] outside a Tokio runtime.
    ///
    /// [`start_session`]: Self::start_session
    pub fn send_message(&mut self, text: &str) -> Result<Option<PendingReply>, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let reply = self.templates.response(&mut self.rng);
        {
            let mut log = self.log.lock();
            log.messages.push(make_message(Role::User, text.to_string()));
            log.pending_replies += 1;
        }

        let log = Arc::clone(&self.log);
        let token = self.cancel.clone();
        let latency = self.reply_latency;
        let handle = runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!("assistant reply cancelled");
                    false
                }
                () = tokio::time::sleep(latency) => {
                    let mut log = log.lock();
                    log.messages.push(make_message(Role::Assistant, reply));
                    log.pending_replies = log.pending_replies.saturating_sub(1);
                    true
                }
            }
        });
        Ok(Some(PendingReply { handle }))
    }

    /// Ends the session: cancels pending replies and clears the log.
    ///
    /// Preference selections are kept.
    pub fn end_session(&mut self) {
        if self.started {
            tracing::info!("therapy session ended");
        }
        self.reset();
        self.started = false;
    }

    /// Returns `true` between [`start_session`](Self::start_session) and
    /// [`end_session`](Self::end_session).
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Returns `true` while at least one reply is pending.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.log.lock().pending_replies > 0
    }

    /// Snapshot of the message log.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.log.lock().messages.clone()
    }

    /// Cancels in-flight replies and swaps in a fresh log.
    fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.log = Arc::new(Mutex::new(SessionLog::default()));
    }
}

impl Drop for SessionSimulator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for SessionSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSimulator")
            .field("selected", &self.selected)
            .field("started", &self.started)
            .field("reply_latency", &self.reply_latency)
            .finish_non_exhaustive()
    }
}

fn make_message(role: Role, content: String) -> Message {
    Message {
        id: uuid::Uuid::now_v7().to_string(),
        role,
        content,
        timestamp: Utc::now(),
    }
}
