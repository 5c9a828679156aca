//! Per-submission file metadata.

use crate::api::{InkbunnyApi, SubmissionFiles, SubmissionsResponse, SUBMISSIONS_ENDPOINT};
use crate::error::Result;

/// Fetch the file list of a submission.
///
/// Returns the `submissions` array of the details response (normally one
/// element), or an empty list when the request fails. Only a missing
/// session is returned as an error.
pub async fn get_submission_files(
    api: &InkbunnyApi,
    submission_id: &str,
) -> Result<Vec<SubmissionFiles>> {
    api.session()?;

    let params = [
        ("submission_ids", submission_id.to_string()),
        ("show_description", "yes".to_string()),
        ("show_files", "yes".to_string()),
        ("show_file_urls", "yes".to_string()),
    ];

    match api
        .get_json::<SubmissionsResponse>(SUBMISSIONS_ENDPOINT, &params)
        .await
    {
        Ok(response) => Ok(response.submissions),
        Err(e) => {
            tracing::error!(
                "Failed to get file info for submission {}: {}",
                submission_id,
                e
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Session;
    use crate::error::Error;
    use crate::retry::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(base_url: &str) -> InkbunnyApi {
        InkbunnyApi::new(base_url, RetryPolicy::default())
            .unwrap()
            .with_session(Session::new("abc"))
    }

    #[tokio::test]
    async fn test_files_are_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api_submissions.php"))
            .and(query_param("sid", "abc"))
            .and(query_param("submission_ids", "77"))
            .and(query_param("show_files", "yes"))
            .and(query_param("show_file_urls", "yes"))
            .and(query_param("show_description", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "submissions": [{
                    "submission_id": "77",
                    "files": [
                        { "file_name": "a.png", "file_url_full": "https://x/a.png" },
                        { "file_name": "b.png", "file_url_screen": "https://x/b.png" }
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let details = get_submission_files(&api(&server.uri()), "77").await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].files.len(), 2);
        assert_eq!(details[0].files[1].download_url(), Some("https://x/b.png"));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api_submissions.php"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let details = get_submission_files(&api(&server.uri()), "77").await.unwrap();
        assert!(details.is_empty());
    }

    #[tokio::test]
    async fn test_requires_session() {
        let unauthenticated = InkbunnyApi::new("http://127.0.0.1:9", RetryPolicy::default()).unwrap();
        assert!(matches!(
            get_submission_files(&unauthenticated, "77").await,
            Err(Error::NotLoggedIn)
        ));
    }
}
