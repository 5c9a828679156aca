//! Filesystem module.
//!
//! Provides:
//! - Artist-scoped directory management
//! - Filename generation and sanitizing

pub mod naming;
pub mod paths;

pub use naming::{
    build_filename, check_remote_name, clean_title, sanitize_path_component, NamingPolicy,
};
pub use paths::{ensure_dir, get_artist_folder};
