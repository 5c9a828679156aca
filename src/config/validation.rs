//! Configuration validation logic.
//!
//! Validation runs on the raw configuration tree, before deserialization,
//! so that every missing key can be reported at once instead of stopping
//! at the first serde error.

use std::time::Duration;

use serde_json::Value;
use url::Url;

/// Required sections and the keys each must contain.
const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    (
        "api",
        &["base_url", "submissions_per_page", "submission_types", "delay"],
    ),
    ("credentials", &["username", "password"]),
    ("download", &["artist_username", "save_directory"]),
];

/// Keys required inside `api.delay`.
const REQUIRED_DELAYS: &[&str] = &["between_files", "between_pages"];

/// Whether `value` is a delay in seconds that a [`Duration`] can hold.
fn is_valid_delay(value: &Value) -> bool {
    value
        .as_f64()
        .map(|secs| Duration::try_from_secs_f64(secs).is_ok())
        .unwrap_or(false)
}

/// Validate a raw configuration tree, logging every problem found.
///
/// Returns `true` only when no required section or key is missing.
pub fn validate_config(raw: &Value) -> bool {
    let problems = validation_errors(raw);
    for problem in &problems {
        tracing::error!("Configuration validation failed: {}", problem);
    }
    problems.is_empty()
}

/// Collect every validation problem in a raw configuration tree.
pub fn validation_errors(raw: &Value) -> Vec<String> {
    let mut problems = Vec::new();

    for (section, fields) in REQUIRED_FIELDS {
        let Some(table) = raw.get(section).filter(|v| v.is_object()) else {
            problems.push(format!("Missing section: {}", section));
            continue;
        };

        for field in *fields {
            match table.get(field) {
                None | Some(Value::Null) => {
                    problems.push(format!("Missing field: {} in section {}", field, section));
                }
                Some(value) if is_empty(value) => {
                    problems.push(format!("Empty field: {} in section {}", field, section));
                }
                Some(_) => {}
            }
        }
    }

    if let Some(delay) = raw.get("api").and_then(|api| api.get("delay")) {
        for key in REQUIRED_DELAYS {
            match delay.get(key) {
                Some(value) if value.is_number() => {
                    if value.as_f64().map(|v| v < 0.0).unwrap_or(false) {
                        problems.push(format!("Negative delay: {}", key));
                    } else if !is_valid_delay(value) {
                        problems.push(format!("Delay {} is out of range", key));
                    }
                }
                Some(_) => problems.push(format!("Delay {} must be a number of seconds", key)),
                None => problems.push(format!("Missing delay configuration: {}", key)),
            }
        }
    }

    if let Some(retry) = raw.get("api").and_then(|api| api.get("retry")) {
        if !retry.is_object() {
            problems.push("retry must be a table".to_string());
        } else {
            if let Some(attempts) = retry.get("attempts") {
                if attempts.as_u64().and_then(|n| u32::try_from(n).ok()).is_none() {
                    problems.push("retry.attempts must be a non-negative integer".to_string());
                }
            }
            if let Some(delay) = retry.get("delay") {
                if !is_valid_delay(delay) {
                    problems.push(
                        "retry.delay must be a non-negative number of seconds".to_string(),
                    );
                }
            }
        }
    }

    if let Some(per_page) = raw.get("api").and_then(|api| api.get("submissions_per_page")) {
        if per_page.is_number() && per_page.as_u64().map(|n| n == 0).unwrap_or(true) {
            problems.push("submissions_per_page must be a positive integer".to_string());
        }
    }

    if let Some(base_url) = raw
        .get("api")
        .and_then(|api| api.get("base_url"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        if let Err(e) = Url::parse(base_url) {
            problems.push(format!("Invalid base_url '{}': {}", base_url, e));
        }
    }

    problems
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "api": {
                "base_url": "https://inkbunny.net",
                "submissions_per_page": 30,
                "submission_types": [1, 2, 3],
                "delay": { "between_files": 0.5, "between_pages": 0 }
            },
            "credentials": { "username": "reader", "password": "secret" },
            "download": { "save_directory": "out", "artist_username": "artist" }
        })
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()));
    }

    #[test]
    fn test_missing_section() {
        let mut raw = valid();
        raw.as_object_mut().unwrap().remove("credentials");
        assert!(!validate_config(&raw));
        assert_eq!(validation_errors(&raw), vec!["Missing section: credentials"]);
    }

    #[test]
    fn test_missing_between_pages() {
        let mut raw = valid();
        raw["api"]["delay"]
            .as_object_mut()
            .unwrap()
            .remove("between_pages");
        assert!(!validate_config(&raw));
        assert_eq!(
            validation_errors(&raw),
            vec!["Missing delay configuration: between_pages"]
        );
    }

    #[test]
    fn test_problems_are_aggregated() {
        let mut raw = valid();
        raw["credentials"]["password"] = json!("");
        raw["download"].as_object_mut().unwrap().remove("artist_username");
        raw["api"]["base_url"] = json!("not a url");

        let problems = validation_errors(&raw);
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("password")));
        assert!(problems.iter().any(|p| p.contains("artist_username")));
        assert!(problems.iter().any(|p| p.contains("base_url")));
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let mut raw = valid();
        raw["api"]["submissions_per_page"] = json!(0);
        assert!(!validate_config(&raw));
    }

    #[test]
    fn test_huge_delay_rejected() {
        let mut raw = valid();
        raw["api"]["delay"]["between_pages"] = json!(1e300);
        assert_eq!(
            validation_errors(&raw),
            vec!["Delay between_pages is out of range"]
        );
    }

    #[test]
    fn test_retry_section_checked() {
        let mut raw = valid();
        raw["api"]["retry"] = json!({ "attempts": 3, "delay": 5.0 });
        assert!(validate_config(&raw));

        raw["api"]["retry"] = json!({ "attempts": -1, "delay": 1e300 });
        let problems = validation_errors(&raw);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("retry.attempts")));
        assert!(problems.iter().any(|p| p.contains("retry.delay")));

        raw["api"]["retry"] = json!({ "delay": -0.5 });
        assert!(!validate_config(&raw));
    }

    #[test]
    fn test_non_numeric_delay_rejected() {
        let mut raw = valid();
        raw["api"]["delay"]["between_files"] = json!("soon");
        assert!(!validate_config(&raw));
    }
}
