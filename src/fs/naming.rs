//! Filename generation and manipulation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of characters kept from a submission title.
pub const MAX_TITLE_CHARS: usize = 50;

/// How downloaded files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// `{artist}_{title}_{file_name}`
    #[default]
    ArtistTitle,
    /// `{title}_{file_name}`
    Title,
}

/// Reduce a submission title to alphanumerics, spaces, hyphens and
/// underscores, keeping at most [`MAX_TITLE_CHARS`] characters.
pub fn clean_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// Build the local filename for one file of a submission.
///
/// The remote file name is checked with [`check_remote_name`]; the
/// artist name and title only ever contribute safe characters.
pub fn build_filename(
    policy: NamingPolicy,
    artist: &str,
    title: &str,
    original_name: &str,
) -> Result<String> {
    let original = check_remote_name(original_name)?;
    let title = clean_title(title);

    let name = match policy {
        NamingPolicy::ArtistTitle => {
            format!("{}_{}_{}", sanitize_path_component(artist)?, title, original)
        }
        NamingPolicy::Title => format!("{}_{}", title, original),
    };

    Ok(name)
}

/// Check a file name reported by the API and replace reserved characters.
///
/// Only names that could leave the artist folder are rejected: `.`, `..`,
/// and anything with a path separator or NUL. An empty name is allowed,
/// since it always ends up behind a title prefix.
pub fn check_remote_name(name: &str) -> Result<String> {
    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    Ok(replace_reserved(name))
}

/// Sanitize a path component (folder name) with less strict validation.
///
/// Used for the artist folder, where separators are replaced rather than
/// rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized: String = replace_reserved(name)
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

fn replace_reserved(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
