//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::fs::NamingPolicy;
use crate::logging::DEFAULT_LOG_DIR;

/// Inkbunny gallery downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "inkbunny-downloader",
    version,
    about = "Download an artist's gallery from Inkbunny",
    long_about = "A CLI tool to download every file of an Inkbunny artist's gallery.\n\n\
                  Files already present in the download folder are skipped, so an \
                  interrupted run can simply be started again."
)]
pub struct Args {
    /// Path to configuration file (.json or .toml).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Artist username to download (overrides download.artist_username).
    #[arg(short, long)]
    pub artist: Option<String>,

    /// Base directory for downloads (overrides download.save_directory).
    #[arg(short = 'd', long = "directory")]
    pub save_directory: Option<PathBuf>,

    /// Inkbunny account username.
    #[arg(short, long, env = "INKBUNNY_USERNAME")]
    pub username: Option<String>,

    /// Inkbunny account password.
    #[arg(short, long, env = "INKBUNNY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// File naming policy.
    #[arg(long, value_enum)]
    pub naming: Option<NamingArg>,

    /// Directory for log files.
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Only log to the console.
    #[arg(long)]
    pub no_log_file: bool,

    /// Hide download progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI naming policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NamingArg {
    /// `{artist}_{title}_{file}`
    ArtistTitle,
    /// `{title}_{file}`
    Title,
}

impl From<NamingArg> for NamingPolicy {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::ArtistTitle => NamingPolicy::ArtistTitle,
            NamingArg::Title => NamingPolicy::Title,
        }
    }
}

impl Args {
    /// Merge CLI arguments into a raw config tree, overriding where specified.
    ///
    /// Runs before validation, so overrides can fill in missing keys.
    pub fn merge_into_config(&self, raw: &mut Value) {
        if let Some(artist) = &self.artist {
            set_field(raw, "download", "artist_username", Value::from(artist.as_str()));
        }

        if let Some(dir) = &self.save_directory {
            set_field(
                raw,
                "download",
                "save_directory",
                Value::from(dir.to_string_lossy().into_owned()),
            );
        }

        if let Some(username) = &self.username {
            set_field(raw, "credentials", "username", Value::from(username.as_str()));
        }

        if let Some(password) = &self.password {
            set_field(raw, "credentials", "password", Value::from(password.as_str()));
        }

        if let Some(naming) = self.naming {
            let policy = NamingPolicy::from(naming);
            if let Ok(value) = serde_json::to_value(policy) {
                set_field(raw, "download", "naming", value);
            }
        }

        if self.quiet {
            set_field(raw, "download", "show_progress", Value::Bool(false));
        }
    }
}

fn set_field(raw: &mut Value, section: &str, key: &str, value: Value) {
    if !raw.is_object() {
        *raw = Value::Object(Map::new());
    }
    let Some(root) = raw.as_object_mut() else {
        return;
    };

    let table = root
        .entry(section)
        .or_insert_with(|| Value::Object(Map::new()));
    if !table.is_object() {
        *table = Value::Object(Map::new());
    }
    if let Some(table) = table.as_object_mut() {
        table.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("inkbunny-downloader").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert_eq!(args.log_dir, PathBuf::from("logs"));
        assert!(!args.debug);
    }

    #[test]
    fn test_overrides_fill_raw_config() {
        let args = parse(&[
            "--artist",
            "someone",
            "-d",
            "/tmp/out",
            "--naming",
            "title",
            "--quiet",
        ]);
        let mut raw = json!({ "download": { "artist_username": "old" } });
        args.merge_into_config(&mut raw);

        assert_eq!(raw["download"]["artist_username"], "someone");
        assert_eq!(raw["download"]["save_directory"], "/tmp/out");
        assert_eq!(raw["download"]["naming"], "title");
        assert_eq!(raw["download"]["show_progress"], false);
    }

    #[test]
    fn test_overrides_create_missing_sections() {
        let args = parse(&["--username", "reader", "--password", "pw"]);
        let mut raw = Value::Null;
        args.merge_into_config(&mut raw);
        assert_eq!(raw["credentials"]["username"], "reader");
        assert_eq!(raw["credentials"]["password"], "pw");
    }
}
