//! Gallery page enumeration.

use crate::api::{InkbunnyApi, PageResult, SearchResponse, SEARCH_ENDPOINT};
use crate::config::Config;
use crate::error::Result;

/// Fetch one page of an artist's submissions, newest first.
///
/// Transport and protocol failures are logged and produce an empty page
/// with zero total pages; callers treat that as the end of the gallery.
/// Only a missing session is returned as an error.
pub async fn get_user_submissions(
    api: &InkbunnyApi,
    config: &Config,
    user_id: &str,
    page: u32,
) -> Result<PageResult> {
    api.session()?;

    let params = [
        ("user_id", user_id.to_string()),
        ("page", page.to_string()),
        (
            "submissions_per_page",
            config.api.submissions_per_page.to_string(),
        ),
        ("type", config.api.submission_types.joined()),
        ("orderby", "create_datetime".to_string()),
        ("random", "no".to_string()),
    ];

    match api.get_json::<SearchResponse>(SEARCH_ENDPOINT, &params).await {
        Ok(response) => {
            let result = PageResult::from(response);
            tracing::debug!(
                "Page {}: {} submissions, {} pages total",
                page,
                result.submissions.len(),
                result.total_pages
            );
            Ok(result)
        }
        Err(e) => {
            tracing::error!("Failed to get submissions (page {}): {}", page, e);
            Ok(PageResult::empty())
        }
    }
}
