//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for downloads.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_bar_length() {
        let bar = create_download_bar(1024);
        assert_eq!(bar.length(), Some(1024));
        bar.set_position(512);
        assert_eq!(bar.position(), 512);
        bar.finish_and_clear();
    }
}
