//! Inkbunny API HTTP client.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::api::session::Session;
use crate::api::types::*;
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::retry::{with_retry, RetryPolicy};

/// Login endpoint.
pub const LOGIN_ENDPOINT: &str = "api_login.php";

/// Search endpoint, used for user lookup and gallery pages.
pub const SEARCH_ENDPOINT: &str = "api_search.php";

/// Submission details endpoint.
pub const SUBMISSIONS_ENDPOINT: &str = "api_submissions.php";

const USER_AGENT: &str = concat!("inkbunny-downloader/", env!("CARGO_PKG_VERSION"));

/// Inkbunny API client owning the login session.
pub struct InkbunnyApi {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    session: Option<Session>,
}

impl InkbunnyApi {
    /// Create a client for the given site root. No request is made.
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        url::Url::parse(base_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            session: None,
        })
    }

    /// Create a client from the API section of a validated config.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url(), config.api.retry)
    }

    /// Use an existing session instead of logging in.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The current session, or [`Error::NotLoggedIn`].
    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotLoggedIn)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Underlying HTTP client, shared with file downloads.
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Full URL of an API endpoint.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Log in and keep the session id.
    ///
    /// Connection failures are retried after the policy delay. A non-200
    /// status, an `error_code` body or a missing session id uses up an
    /// attempt without waiting.
    pub async fn login(&mut self, credentials: &Credentials) -> bool {
        let this = &*self;
        let result = with_retry(&this.retry, "Login", |_| this.try_login(credentials)).await;

        match result {
            Ok(session) => {
                tracing::info!("Login successful as {}", credentials.username);
                tracing::debug!("Session: {:?}", session);
                self.session = Some(session);
                true
            }
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                false
            }
        }
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.endpoint(LOGIN_ENDPOINT);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("output_mode", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let value: Value = serde_json::from_str(&response.text().await?)?;
        check_api_error(&value)?;

        let login = LoginResponse::deserialize(&value)?;
        login
            .sid
            .filter(|sid| !sid.is_empty())
            .map(Session::new)
            .ok_or(Error::MissingField("sid"))
    }

    /// Look up an artist's user id from their username.
    ///
    /// Returns `Ok(None)` when the artist has no submissions or the lookup
    /// failed; only a missing session is an error.
    pub async fn get_user_id(&self, username: &str) -> Result<Option<String>> {
        self.session()?;

        let params = [
            ("username", username.to_string()),
            ("submissions_per_page", "1".to_string()),
        ];

        match self.get_json::<SearchResponse>(SEARCH_ENDPOINT, &params).await {
            Ok(response) => {
                let user_id = response
                    .submissions
                    .into_iter()
                    .next()
                    .and_then(|s| s.user_id)
                    .map(Id::into_string);
                if user_id.is_none() {
                    tracing::error!("Failed to get user ID for {}", username);
                }
                Ok(user_id)
            }
            Err(e) => {
                tracing::error!("Error getting user ID for {}: {}", username, e);
                Ok(None)
            }
        }
    }

    /// Make an authenticated GET request and decode the JSON body.
    ///
    /// `sid` and `output_mode=json` are added to `params`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let session = self.session()?;
        let url = self.endpoint(endpoint);
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&[("sid", session.sid())])
            .query(params)
            .query(&[("output_mode", "json")])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                endpoint,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })?;
        check_api_error(&value)?;

        Ok(serde_json::from_value(value)?)
    }
}

/// Turn an `error_code` body into [`Error::Api`].
fn check_api_error(value: &Value) -> Result<()> {
    let body = ApiErrorBody::deserialize(value).unwrap_or_default();
    match body.error_code {
        Some(code) => Err(Error::Api(format!(
            "{} (code {})",
            body.error_message.as_deref().unwrap_or("request rejected"),
            code.into_string()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            username: "reader".into(),
            password: "secret".into(),
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api_login.php"))
            .and(body_string_contains("username=reader"))
            .and(body_string_contains("output_mode=json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sid": "s3ss10n",
                "user_id": "5",
                "ratingsmask": "11100"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut api = InkbunnyApi::new(&server.uri(), fast_retry()).unwrap();
        assert!(!api.is_logged_in());
        assert!(api.login(&credentials()).await);
        assert_eq!(api.session().unwrap().sid(), "s3ss10n");
    }

    #[tokio::test]
    async fn test_login_without_sid_uses_every_attempt_without_waiting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api_login.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "user_id": "5" })),
            )
            .expect(3)
            .mount(&server)
            .await;

        let mut api =
            InkbunnyApi::new(&server.uri(), RetryPolicy::new(3, Duration::from_secs(5))).unwrap();
        let start = Instant::now();
        assert!(!api.login(&credentials()).await);
        assert!(matches!(api.session(), Err(Error::NotLoggedIn)));
        assert!(start.elapsed() < Duration::from_secs(5), "waited {:?}", start.elapsed());
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_login_error_code_uses_every_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api_login.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error_code": 0,
                "error_message": "Invalid login"
            })))
            .expect(3)
            .mount(&server)
            .await;

        let mut api = InkbunnyApi::new(&server.uri(), fast_retry()).unwrap();
        assert!(!api.login(&credentials()).await);
        assert!(matches!(api.session(), Err(Error::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_login_non_200_uses_every_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api_login.php"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let mut api = InkbunnyApi::new(&server.uri(), fast_retry()).unwrap();
        assert!(!api.login(&credentials()).await);
    }

    #[tokio::test]
    async fn test_login_transport_failure_waits_between_attempts() {
        // Grab a free port, then close it so connections are refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut api = InkbunnyApi::new(&format!("http://{}", addr), fast_retry()).unwrap();
        let start = Instant::now();
        assert!(!api.login(&credentials()).await);

        // Three attempts, two waits of 50ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(10), "waited {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_get_user_id_requires_session() {
        let api = InkbunnyApi::new("http://127.0.0.1:9", fast_retry()).unwrap();
        assert!(matches!(
            api.get_user_id("artist").await,
            Err(Error::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn test_get_user_id_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api_search.php"))
            .and(query_param("sid", "abc"))
            .and(query_param("username", "artist"))
            .and(query_param("submissions_per_page", "1"))
            .and(query_param("output_mode", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "pages_count": 12,
                "submissions": [{ "submission_id": "1", "user_id": "4242" }]
            })))
            .mount(&server)
            .await;

        let api = InkbunnyApi::new(&server.uri(), fast_retry())
            .unwrap()
            .with_session(Session::new("abc"));
        assert_eq!(
            api.get_user_id("artist").await.unwrap().as_deref(),
            Some("4242")
        );
    }

    #[tokio::test]
    async fn test_get_user_id_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api_search.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "submissions": [] })),
            )
            .mount(&server)
            .await;

        let api = InkbunnyApi::new(&server.uri(), fast_retry())
            .unwrap()
            .with_session(Session::new("abc"));
        assert_eq!(api.get_user_id("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_json_reports_api_error_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api_search.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error_code": 2,
                "error_message": "Invalid Session ID sent as variable 'sid'."
            })))
            .mount(&server)
            .await;

        let api = InkbunnyApi::new(&server.uri(), fast_retry())
            .unwrap()
            .with_session(Session::new("stale"));
        let result = api.get_json::<SearchResponse>(SEARCH_ENDPOINT, &[]).await;
        assert!(matches!(result, Err(Error::Api(msg)) if msg.contains("code 2")));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let api = InkbunnyApi::new("https://inkbunny.net/", RetryPolicy::default()).unwrap();
        assert_eq!(
            api.endpoint(LOGIN_ENDPOINT),
            "https://inkbunny.net/api_login.php"
        );
    }

    #[test]
    fn test_new_rejects_bad_url() {
        assert!(InkbunnyApi::new("not a url", RetryPolicy::default()).is_err());
    }
}
