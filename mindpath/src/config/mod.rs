//! Configuration system for the `Mindpath` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/mindpath/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::journey::StatusOptions;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::therapy::SessionConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    therapy: TherapyFileConfig,
    journey: JourneyFileConfig,
    seed: SeedFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
}

/// `[therapy]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TherapyFileConfig {
    reply_latency_ms: Option<u64>,
    rng_seed: Option<u64>,
}

/// `[journey]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct JourneyFileConfig {
    announce_task_start: Option<bool>,
    ignore_repeats: Option<bool>,
}

/// `[seed]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SeedFileConfig {
    path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    // -- Storage --
    /// Directory for the local key-value records (`None` = platform default).
    pub data_dir: Option<PathBuf>,
    /// Keep records in memory only.
    pub ephemeral: bool,

    // -- Seed --
    /// Seed document to load instead of the built-in one.
    pub seed_path: Option<PathBuf>,

    // -- Therapy --
    /// Session simulator settings.
    pub session: SessionConfig,

    // -- Journey --
    /// Status-change options for the journey.
    pub journey: StatusOptions,
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or any config file cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone()),
            ephemeral: cli.ephemeral,
            seed_path: cli.seed.clone().or_else(|| file.seed.path.clone()),
            session: SessionConfig {
                reply_latency: cli
                    .reply_latency_ms
                    .or(file.therapy.reply_latency_ms)
                    .map_or(defaults.session.reply_latency, Duration::from_millis),
                rng_seed: cli.rng_seed.or(file.therapy.rng_seed),
            },
            journey: StatusOptions {
                announce_task_start: file
                    .journey
                    .announce_task_start
                    .unwrap_or(defaults.journey.announce_task_start),
                ignore_repeats: file
                    .journey
                    .ignore_repeats
                    .unwrap_or(defaults.journey.ignore_repeats),
            },
        }
    }

    /// Opens the key-value store this configuration points at.
    ///
    /// Falls back to an in-memory store when no data directory is known.
    #[must_use]
    pub fn open_store(&self) -> Arc<dyn KeyValueStore> {
        if self.ephemeral {
            return Arc::new(MemoryStore::new());
        }
        match self.data_dir.clone().or_else(FileStore::default_dir) {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "using file store");
                Arc::new(FileStore::new(dir))
            }
            None => {
                tracing::warn!("no data directory available, records will not persist");
                Arc::new(MemoryStore::new())
            }
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Wellness journey and therapy-session simulator")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/mindpath/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for locally stored records.
    #[arg(long, env = "MINDPATH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep records in memory only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Seed data JSON file to load instead of the built-in data.
    #[arg(long, env = "MINDPATH_SEED")]
    pub seed: Option<PathBuf>,

    /// Delay before the simulated therapist replies, in milliseconds.
    #[arg(long)]
    pub reply_latency_ms: Option<u64>,

    /// Fixed RNG seed for reproducible replies.
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "MINDPATH_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/mindpath.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Reads the TOML config file.
///
/// An explicit path must exist. Without one, `<config_dir>/mindpath/config.toml`
/// is tried and a missing file yields an empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match explicit_path {
        Some(p) => (p.to_path_buf(), true),
        None => match dirs::config_dir() {
            Some(dir) => (dir.join("mindpath").join("config.toml"), false),
            None => return Ok(ConfigFile::default()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ConfigFile::default());
        }
        Err(source) => return Err(ConfigError::ReadFile { path, source }),
    };
    Ok(toml::from_str(&contents)?)
}
