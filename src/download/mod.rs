//! Download module for artist galleries.
//!
//! This module provides:
//! - Gallery page enumeration
//! - Submission file lookup
//! - Streaming file downloads with skip-if-present
//! - The sequential download pipeline
//! - Download state tracking

pub mod file;
pub mod files;
pub mod pages;
pub mod pipeline;
pub mod state;

pub use file::{DownloadOutcome, Downloader, CHUNK_SIZE};
pub use files::get_submission_files;
pub use pages::get_user_submissions;
pub use pipeline::{download_artist, process_submission, run};
pub use state::DownloadState;
