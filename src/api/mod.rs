//! Inkbunny API module.
//!
//! This module provides:
//! - HTTP client for the Inkbunny JSON API
//! - Login session handling
//! - API response types

pub mod client;
pub mod session;
pub mod types;

pub use client::{InkbunnyApi, LOGIN_ENDPOINT, SEARCH_ENDPOINT, SUBMISSIONS_ENDPOINT};
pub use session::Session;
pub use types::*;
