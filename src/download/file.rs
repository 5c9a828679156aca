//! Media file downloading.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::api::InkbunnyApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, sanitize_path_component};
use crate::output::create_download_bar;
use crate::retry::{with_retry, RetryPolicy};

/// Write buffer size for streamed bodies (8 KiB).
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Result of a successful [`Downloader::fetch_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was fetched and written; carries the byte count.
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file already existed at the target path; nothing was fetched.
    AlreadyExists { path: PathBuf },
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Downloaded { path, .. } | DownloadOutcome::AlreadyExists { path } => {
                path
            }
        }
    }
}

/// Streams remote files into the artist's folder.
pub struct Downloader<'a> {
    client: &'a Client,
    retry: RetryPolicy,
    artist: String,
    show_progress: bool,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a Client, retry: RetryPolicy, artist: &str) -> Self {
        Self {
            client,
            retry,
            artist: artist.to_string(),
            show_progress: false,
        }
    }

    /// Downloader sharing the API client's connection pool and retry policy.
    pub fn from_config(api: &'a InkbunnyApi, config: &Config) -> Self {
        Self::new(api.http(), *api.retry_policy(), &config.download.artist_username)
            .show_progress(config.download.show_progress)
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Path a file named `filename` is written to: `save_dir/artist/filename`.
    pub fn target_path(&self, save_dir: &Path, filename: &str) -> Result<PathBuf> {
        Ok(save_dir
            .join(sanitize_path_component(&self.artist)?)
            .join(filename))
    }

    /// Download `url` to `save_dir/artist/filename`, reporting success.
    ///
    /// An existing file counts as success and no request is made.
    pub async fn download_file(&self, url: &str, filename: &str, save_dir: &Path) -> bool {
        match self.fetch_file(url, filename, save_dir).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Giving up on {}: {}", filename, e);
                false
            }
        }
    }

    /// Like [`Self::download_file`], but tells a fresh download apart from
    /// an existing file and returns the failure.
    pub async fn fetch_file(
        &self,
        url: &str,
        filename: &str,
        save_dir: &Path,
    ) -> Result<DownloadOutcome> {
        let path = self.target_path(save_dir, filename)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent).await?;
        }

        if tokio::fs::try_exists(&path).await? {
            tracing::info!("File already exists: {}", filename);
            return Ok(DownloadOutcome::AlreadyExists { path });
        }

        let bytes = with_retry(&self.retry, "Download", |_| self.stream_to_file(url, &path)).await?;
        tracing::info!("Successfully downloaded: {}", filename);

        Ok(DownloadOutcome::Downloaded { path, bytes })
    }

    /// One download attempt. A partial file from an earlier attempt is
    /// overwritten.
    async fn stream_to_file(&self, url: &str, output_path: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let file = File::create(output_path).await?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        writer.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}
