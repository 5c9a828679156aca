//! Configuration module for the inkbunny-downloader.
//!
//! This module handles:
//! - Loading configuration from JSON or TOML files
//! - Writing a default configuration template
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{
    default_config_value, read_raw, write_default_config, ApiConfig, Config, Credentials,
    DelayConfig, DownloadConfig, SubmissionTypes,
};
pub use validation::{validate_config, validation_errors};
