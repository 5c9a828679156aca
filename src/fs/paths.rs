//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Get the artist-scoped folder under the save directory.
pub fn get_artist_folder(save_dir: &Path, artist: &str) -> Result<PathBuf> {
    Ok(save_dir.join(sanitize_path_component(artist)?))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
