//! DrillKit Settings Crate
//!
//! Handles configuration loading, validation and persistence.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
