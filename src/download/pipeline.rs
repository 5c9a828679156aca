//! Artist gallery download pipeline.
//!
//! Everything runs sequentially: login, artist lookup, then each gallery
//! page in order, each submission on the page in order, and each file of
//! the submission in order.

use serde_json::Value;
use tokio::time::sleep;

use crate::api::{InkbunnyApi, Submission};
use crate::config::Config;
use crate::download::file::{DownloadOutcome, Downloader};
use crate::download::files::get_submission_files;
use crate::download::pages::get_user_submissions;
use crate::download::state::DownloadState;
use crate::error::{Error, Result};
use crate::fs::build_filename;

/// Validate a raw configuration and download the configured artist.
///
/// An invalid configuration fails before any request is made.
pub async fn run(raw: Value) -> Result<DownloadState> {
    let config = Config::from_value(raw)?;
    let mut api = InkbunnyApi::from_config(&config)?;
    download_artist(&mut api, &config).await
}

/// Download every file of the configured artist's gallery.
///
/// Login failure and an unknown artist abort the run; any later failure
/// only skips the affected page, submission or file.
pub async fn download_artist(api: &mut InkbunnyApi, config: &Config) -> Result<DownloadState> {
    let artist = config.download.artist_username.as_str();
    let mut state = DownloadState::new(artist);
    state.artist_path = Some(config.artist_directory()?);

    if !api.login(&config.credentials).await {
        return Err(Error::Authentication(
            "Login failed, check the configured credentials".into(),
        ));
    }

    let api: &InkbunnyApi = api;

    let user_id = api
        .get_user_id(artist)
        .await?
        .ok_or_else(|| Error::AccountNotFound(artist.to_string()))?;
    state.user_id = Some(user_id.clone());

    tracing::info!("Starting download for artist: {} (user {})", artist, user_id);

    let downloader = Downloader::from_config(api, config);

    let first_page = get_user_submissions(api, config, &user_id, 1).await?;
    if first_page.is_empty() {
        tracing::warn!("No submissions found for {}", artist);
        return Ok(state);
    }

    let total_pages = first_page.total_pages.max(1);
    state.total_pages = total_pages;

    let mut prefetched = Some(first_page);
    for page in 1..=total_pages {
        let result = match prefetched.take() {
            Some(result) => result,
            None => get_user_submissions(api, config, &user_id, page).await?,
        };

        if result.is_empty() {
            tracing::warn!(
                "Page {} of {} returned no submissions, stopping early",
                page,
                total_pages
            );
            break;
        }

        tracing::info!("Processing page {} of {}...", page, total_pages);

        for submission in &result.submissions {
            process_submission(api, config, &downloader, &mut state, submission).await?;
        }

        state.pages_processed += 1;
        tracing::info!("Page {} completed", page);

        if page < total_pages {
            sleep(config.api.delay.between_pages()).await;
        }
    }

    tracing::info!(
        "Download completed! Total files downloaded: {} ({} new, {} already present)",
        state.total_successful(),
        state.downloaded_count,
        state.existing_count
    );

    Ok(state)
}

/// Download all files of one submission, returning how many succeeded.
pub async fn process_submission(
    api: &InkbunnyApi,
    config: &Config,
    downloader: &Downloader<'_>,
    state: &mut DownloadState,
    submission: &Submission,
) -> Result<u64> {
    let Some(submission_id) = submission.id() else {
        tracing::warn!("Skipping submission without an id: {}", submission.title());
        return Ok(0);
    };
    let title = submission.title();

    tracing::info!("Processing submission: {} (ID: {})", title, submission_id);
    state.submissions_processed += 1;

    let details = get_submission_files(api, &submission_id).await?;
    let mut succeeded = 0;

    for entry in details.iter().flat_map(|d| d.files.iter()) {
        let Some(url) = entry.download_url() else {
            tracing::warn!("No valid URL found for submission {}", submission_id);
            state.record_skipped_entry();
            continue;
        };

        let filename = match build_filename(
            config.download.naming,
            &config.download.artist_username,
            title,
            entry.file_name(),
        ) {
            Ok(filename) => filename,
            Err(e) => {
                tracing::warn!("Skipping file of submission {}: {}", submission_id, e);
                state.record_skipped_entry();
                continue;
            }
        };

        match downloader
            .fetch_file(url, &filename, &config.download.save_directory)
            .await
        {
            Ok(DownloadOutcome::Downloaded { bytes, .. }) => {
                state.record_download(bytes);
                succeeded += 1;
                sleep(config.api.delay.between_files()).await;
            }
            Ok(DownloadOutcome::AlreadyExists { .. }) => {
                state.record_existing();
                succeeded += 1;
                sleep(config.api.delay.between_files()).await;
            }
            Err(e) => {
                tracing::error!("Failed to download {}: {}", filename, e);
                state.record_failure();
            }
        }
    }

    Ok(succeeded)
}
