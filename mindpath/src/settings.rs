//! Editable user settings.
//!
//! Each editable field is a [`SettingsUpdate`] variant, so a field name that
//! does not exist cannot be written. Settings live in memory only.

use mindpath_model::profile::{Theme, UserSettings};

use crate::notify::Notification;

/// A change to a single settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    Name(String),
    Email(String),
    Theme(Theme),
    Notifications(bool),
    SoundEffects(bool),
    TherapistStyle(String),
    /// Preferred session length in minutes.
    SessionDuration(u32),
}

/// Errors from parsing a textual settings update.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown settings field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        field: &'static str,
        value: String,
    },
}

impl SettingsUpdate {
    /// Parses `field` and `value` as typed at the prompt.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for unknown fields or unparsable values.
    pub fn parse(field: &str, value: &str) -> Result<Self, SettingsError> {
        let invalid = |field: &'static str| SettingsError::InvalidValue {
            field,
            value: value.to_string(),
        };
        match field {
            "name" => Ok(Self::Name(value.to_string())),
            "email" => Ok(Self::Email(value.to_string())),
            "theme" => Theme::parse(value).map(Self::Theme).ok_or_else(|| invalid("theme")),
            "notifications" => parse_bool(value)
                .map(Self::Notifications)
                .ok_or_else(|| invalid("notifications")),
            "sound-effects" => parse_bool(value)
                .map(Self::SoundEffects)
                .ok_or_else(|| invalid("sound-effects")),
            "therapist-style" => Ok(Self::TherapistStyle(value.to_string())),
            "session-duration" => value
                .parse::<u32>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .map(Self::SessionDuration)
                .ok_or_else(|| invalid("session-duration")),
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns `settings` with `update` applied.
#[must_use]
pub fn apply_update(settings: &UserSettings, update: SettingsUpdate) -> UserSettings {
    let mut next = settings.clone();
    match update {
        SettingsUpdate::Name(name) => next.name = name,
        SettingsUpdate::Email(email) => next.email = email,
        SettingsUpdate::Theme(theme) => next.preferences.theme = theme,
        SettingsUpdate::Notifications(on) => next.preferences.notifications = on,
        SettingsUpdate::SoundEffects(on) => next.preferences.sound_effects = on,
        SettingsUpdate::TherapistStyle(style) => next.preferences.therapist_style = style,
        SettingsUpdate::SessionDuration(minutes) => next.preferences.session_duration = minutes,
    }
    next
}

/// Confirmation shown after settings are saved.
#[must_use]
pub fn saved_notification() -> Notification {
    Notification::info("Settings updated", "Your changes have been saved successfully")
}
