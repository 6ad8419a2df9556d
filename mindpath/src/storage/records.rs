//! Typed records kept in the local key-value store.
//!
//! Two independent records exist: the therapist prompt templates and the
//! API credential for the (unused) external AI integration. Both are JSON.

use crate::therapy::templates::PromptTemplates;

use super::{KeyValueStore, StoreError};

/// Key of the prompt-template record.
pub const PROMPTS_KEY: &str = "therapy-prompts";

/// Key of the API credential record.
pub const API_KEY_KEY: &str = "ai-api-key";

/// Loads the prompt templates, falling back to the defaults.
///
/// A missing record, a read failure, malformed JSON, or a record with an
/// empty pool all yield [`PromptTemplates::default`].
#[must_use]
pub fn load_templates(store: &dyn KeyValueStore) -> PromptTemplates {
    let raw = match store.get(PROMPTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PromptTemplates::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read prompt templates, using defaults");
            return PromptTemplates::default();
        }
    };
    match serde_json::from_str::<PromptTemplates>(&raw) {
        Ok(templates) if templates.is_usable() => templates,
        Ok(_) => {
            tracing::warn!("stored prompt templates have an empty pool, using defaults");
            PromptTemplates::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored prompt templates are malformed, using defaults");
            PromptTemplates::default()
        }
    }
}

/// Writes the prompt templates.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the write fails.
pub fn save_templates(
    store: &dyn KeyValueStore,
    templates: &PromptTemplates,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(templates).map_err(|e| StoreError::Serde {
        key: PROMPTS_KEY.to_string(),
        source: e,
    })?;
    store.set(PROMPTS_KEY, &raw)
}

/// Loads the stored API credential, if any.
///
/// # Errors
///
/// Returns [`StoreError`] if the record cannot be read or is not a JSON string.
pub fn load_api_key(store: &dyn KeyValueStore) -> Result<Option<String>, StoreError> {
    let Some(raw) = store.get(API_KEY_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str::<String>(&raw)
        .map(Some)
        .map_err(|e| StoreError::Serde {
            key: API_KEY_KEY.to_string(),
            source: e,
        })
}

/// Writes the API credential. An empty key removes the record.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the write fails.
pub fn save_api_key(store: &dyn KeyValueStore, key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return store.remove(API_KEY_KEY);
    }
    let raw = serde_json::to_string(key).map_err(|e| StoreError::Serde {
        key: API_KEY_KEY.to_string(),
        source: e,
    })?;
    store.set(API_KEY_KEY, &raw)
}
