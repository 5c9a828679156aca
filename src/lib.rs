//! Inkbunny Downloader - download an artist's gallery from Inkbunny.
//!
//! This library logs in to the Inkbunny JSON API, walks an artist's
//! gallery page by page and saves every submission file under
//! `save_directory/artist/`.
//!
//! # Features
//!
//! - JSON or TOML configuration with up-front validation
//! - Sequential, polite crawling with configurable delays
//! - Fixed-delay retry for login and file downloads
//! - Files already on disk are never fetched again
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use inkbunny_downloader::{download_artist, Config, InkbunnyApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.json"))?;
//!     let mut api = InkbunnyApi::from_config(&config)?;
//!     let state = download_artist(&mut api, &config).await?;
//!     println!("{} files", state.total_successful());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod logging;
pub mod output;
pub mod retry;

// Re-exports for convenience
pub use api::{InkbunnyApi, Session};
pub use config::{validate_config, Config};
pub use download::{download_artist, run, DownloadOutcome, DownloadState, Downloader};
pub use error::{Error, Result};
pub use retry::{with_retry, RetryPolicy};
