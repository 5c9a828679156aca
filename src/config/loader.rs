//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::validation::validation_errors;
use crate::error::{Error, Result};
use crate::fs::naming::NamingPolicy;
use crate::retry::RetryPolicy;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub credentials: Credentials,
    pub download: DownloadConfig,
}

/// API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Site root, e.g. `https://inkbunny.net`.
    pub base_url: String,

    /// Submissions requested per search page.
    pub submissions_per_page: u32,

    /// Submission category codes to include.
    pub submission_types: SubmissionTypes,

    /// Fixed pauses between requests.
    pub delay: DelayConfig,

    /// Retry budget for login and file downloads.
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Submission category codes, written either as `"1,2,3"` or `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionTypes {
    Joined(String),
    List(Vec<TypeCode>),
}

/// A single category code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeCode {
    Number(u64),
    Text(String),
}

impl SubmissionTypes {
    /// The comma-joined form sent as the `type` search parameter.
    pub fn joined(&self) -> String {
        match self {
            SubmissionTypes::Joined(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            SubmissionTypes::List(codes) => codes
                .iter()
                .map(|code| match code {
                    TypeCode::Number(n) => n.to_string(),
                    TypeCode::Text(s) => s.trim().to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Pauses between requests, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub between_files: f64,
    pub between_pages: f64,
}

impl DelayConfig {
    pub fn between_files(&self) -> Duration {
        seconds(self.between_files)
    }

    pub fn between_pages(&self) -> Duration {
        seconds(self.between_pages)
    }
}

/// Negative or unrepresentable values become zero.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Inkbunny account credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Download target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Base directory; files land in `save_directory/artist_username/`.
    pub save_directory: PathBuf,

    /// Artist whose gallery is downloaded.
    pub artist_username: String,

    /// How downloaded files are named.
    #[serde(default)]
    pub naming: NamingPolicy,

    /// Whether to show a progress bar for large files.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load, validate and deserialize a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_value(read_raw(path)?)
    }

    /// Validate a raw configuration tree and build the typed config from it.
    pub fn from_value(raw: Value) -> Result<Self> {
        let problems = validation_errors(&raw);
        if !problems.is_empty() {
            for problem in &problems {
                tracing::error!("Configuration validation failed: {}", problem);
            }
            return Err(Error::InvalidConfig(problems.join("; ")));
        }

        let config: Config = serde_json::from_value(raw)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Directory that receives this artist's files.
    pub fn artist_directory(&self) -> Result<PathBuf> {
        crate::fs::paths::get_artist_folder(
            &self.download.save_directory,
            &self.download.artist_username,
        )
    }
}

/// Read a configuration file into an untyped tree.
pub fn read_raw(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config(format!("Configuration file not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    if is_toml(path) {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Template written when no configuration file exists yet.
pub fn default_config_value() -> Value {
    json!({
        "api": {
            "base_url": "https://inkbunny.net",
            "submissions_per_page": 100,
            "submission_types": "1,2,3,4,5,8,9,13,14",
            "delay": {
                "between_files": 1.0,
                "between_pages": 2.0
            }
        },
        "credentials": {
            "username": "",
            "password": ""
        },
        "download": {
            "save_directory": "downloads",
            "artist_username": ""
        }
    })
}

/// Write the default template to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let value = default_config_value();
    let content = if is_toml(path) {
        toml::to_string_pretty(&value)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?
    } else {
        serde_json::to_string_pretty(&value)?
    };

    fs::write(path, content)?;
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
