//! Greeting and response template pools for the simulated therapist.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Token in greeting templates replaced by the selected preference names.
pub const PREFERENCES_PLACEHOLDER: &str = "{preferences}";

const DEFAULT_GREETING: &str = "Hello! I'm your AI therapist specializing in {preferences} therapy. How are you feeling today?";

const DEFAULT_RESPONSES: [&str; 5] = [
    "Thank you for sharing that. Could you tell me more about how that makes you feel?",
    "I understand this might be difficult. What do you think is underlying these feelings?",
    "That's important insight. How long have you been experiencing this?",
    "I hear you. Let's explore some techniques that might help with this situation. Would that be helpful?",
    "It sounds like this has been challenging for you. What coping strategies have you tried so far?",
];

/// User-editable pools of canned greetings and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Session openers; may contain [`PREFERENCES_PLACEHOLDER`].
    pub greetings: Vec<String>,
    /// Replies to user messages.
    pub responses: Vec<String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            greetings: vec![DEFAULT_GREETING.to_string()],
            responses: DEFAULT_RESPONSES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl PromptTemplates {
    /// Returns `true` if both pools have at least one entry.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.greetings.is_empty() && !self.responses.is_empty()
    }

    /// Picks a greeting and fills in the preference names.
    ///
    /// Falls back to the default greeting when the pool is empty.
    pub fn greeting<R: Rng + ?Sized>(&self, rng: &mut R, preference_names: &str) -> String {
        let template = self
            .greetings
            .choose(rng)
            .map_or(DEFAULT_GREETING, String::as_str);
        template.replace(PREFERENCES_PLACEHOLDER, preference_names)
    }

    /// Picks a response.
    ///
    /// Falls back to the first default response when the pool is empty.
    pub fn response<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.responses
            .choose(rng)
            .map_or(DEFAULT_RESPONSES[0], String::as_str)
            .to_string()
    }
}
