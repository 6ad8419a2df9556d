//! `Mindpath` library: journey progression, therapy session simulation,
//! local records and dashboard views.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod journey;
pub mod notify;
pub mod settings;
pub mod storage;
pub mod therapy;
