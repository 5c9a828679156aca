//! Download state tracking.

use std::path::PathBuf;

/// Counters for one artist run.
#[derive(Debug, Default)]
pub struct DownloadState {
    // Artist info
    pub artist_name: String,
    pub user_id: Option<String>,

    // Paths
    pub artist_path: Option<PathBuf>,

    // Statistics
    pub downloaded_count: u64,
    pub downloaded_bytes: u64,
    pub existing_count: u64,
    pub failed_count: u64,
    pub skipped_entries: u64,
    pub submissions_processed: u64,
    pub pages_processed: u32,
    pub total_pages: u32,
}

impl DownloadState {
    /// Create a new download state for an artist.
    pub fn new(artist_name: impl Into<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            ..Default::default()
        }
    }

    /// Record a file fetched over the network.
    pub fn record_download(&mut self, bytes: u64) {
        self.downloaded_count += 1;
        self.downloaded_bytes += bytes;
    }

    /// Record a file that was already on disk.
    pub fn record_existing(&mut self) {
        self.existing_count += 1;
    }

    /// Record a file whose download attempts all failed.
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
    }

    /// Record a file entry that could not be downloaded at all (no URL or
    /// unusable name).
    pub fn record_skipped_entry(&mut self) {
        self.skipped_entries += 1;
    }

    /// Files now present locally for this run: fresh downloads plus files
    /// that already existed.
    pub fn total_successful(&self) -> u64 {
        self.downloaded_count + self.existing_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut state = DownloadState::new("artist");
        state.record_download(100);
        state.record_download(50);
        state.record_existing();
        state.record_failure();
        state.record_skipped_entry();

        assert_eq!(state.artist_name, "artist");
        assert_eq!(state.downloaded_count, 2);
        assert_eq!(state.downloaded_bytes, 150);
        assert_eq!(state.total_successful(), 3);
        assert_eq!(state.failed_count, 1);
        assert_eq!(state.skipped_entries, 1);
    }
}
