//! API response type definitions.
//!
//! Inkbunny is loose about JSON types (ids arrive as strings, counts as
//! numbers or strings), so identifiers go through [`Id`] and every field
//! that may be absent is an `Option` or defaults to empty.

use serde::Deserialize;

/// An identifier that may be encoded as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Text(String),
    Number(u64),
}

impl Id {
    pub fn into_string(self) -> String {
        match self {
            Id::Text(s) => s,
            Id::Number(n) => n.to_string(),
        }
    }
}

/// A count that may be encoded as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(u32),
    Text(String),
}

impl Count {
    /// The numeric value, if a string count parses.
    pub fn get(&self) -> Option<u32> {
        match self {
            Count::Number(n) => Some(*n),
            Count::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Error fields the API adds to any response it rejects.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: Option<Id>,
    pub error_message: Option<String>,
}

/// `api_login.php` response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub sid: Option<String>,
    pub user_id: Option<Id>,
    pub ratingsmask: Option<String>,
}

/// `api_search.php` response.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    pub pages_count: Option<Count>,
    pub results_count_all: Option<Count>,
}

/// A submission as listed by a search.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub submission_id: Option<Id>,
    pub title: Option<String>,
    pub user_id: Option<Id>,
    pub username: Option<String>,
}

impl Submission {
    /// Title, or `"untitled"` when the API omitted it.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }

    pub fn id(&self) -> Option<String> {
        self.submission_id.clone().map(Id::into_string)
    }
}

/// `api_submissions.php` response.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionsResponse {
    #[serde(default)]
    pub submissions: Vec<SubmissionFiles>,
}

/// Detailed submission record carrying its file list.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionFiles {
    pub submission_id: Option<Id>,
    pub title: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One file attached to a submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileEntry {
    pub file_id: Option<Id>,
    pub file_name: Option<String>,
    pub file_url_full: Option<String>,
    pub file_url_screen: Option<String>,
    pub mimetype: Option<String>,
}

impl FileEntry {
    /// Download URL: the full-size file, else the screen-size one.
    pub fn download_url(&self) -> Option<&str> {
        self.file_url_full
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.file_url_screen.as_deref().filter(|u| !u.is_empty()))
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("")
    }
}

/// One page of an artist's submission list.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub submissions: Vec<Submission>,
    pub total_pages: u32,
}

impl PageResult {
    /// Result used when a page could not be fetched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

impl From<SearchResponse> for PageResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            submissions: response.submissions,
            total_pages: response
                .pages_count
                .and_then(|count| count.get())
                .unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_defaults() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        let page = PageResult::from(response);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_search_response_mixed_types() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"pages_count":"4","submissions":[{"submission_id":123,"user_id":"77"}]}"#,
        )
        .unwrap();
        let page = PageResult::from(response);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.submissions[0].id().as_deref(), Some("123"));
        assert_eq!(page.submissions[0].title(), "untitled");
    }

    #[test]
    fn test_file_url_preference() {
        let entry = FileEntry {
            file_url_full: Some("https://x/full.png".into()),
            file_url_screen: Some("https://x/screen.png".into()),
            ..Default::default()
        };
        assert_eq!(entry.download_url(), Some("https://x/full.png"));

        let entry = FileEntry {
            file_url_full: Some(String::new()),
            file_url_screen: Some("https://x/screen.png".into()),
            ..Default::default()
        };
        assert_eq!(entry.download_url(), Some("https://x/screen.png"));

        assert_eq!(FileEntry::default().download_url(), None);
    }
}
