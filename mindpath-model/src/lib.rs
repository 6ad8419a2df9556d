//! Data model for Mindpath.
//!
//! Defines the journey (tasks, milestones), therapy (sessions, messages,
//! preferences) and profile (personality, achievements, settings) records,
//! plus the validated seed-data ingestion boundary.

pub mod journey;
pub mod profile;
pub mod seed;
pub mod therapy;
