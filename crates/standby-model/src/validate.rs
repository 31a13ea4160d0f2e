use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

use crate::{SCRIPT_EXT, TaskRequest};

/// Task body rejection reasons, surfaced verbatim in HTTP 400 responses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("Empty payload")]
    EmptyPayload,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("script_url must use HTTPS protocol")]
    InsecureUrl,
    #[error("script_name '{name}' does not match URL filename '{derived}'")]
    NameMismatch { name: String, derived: String },
    #[error("payload field must be a JSON object")]
    PayloadNotObject,
}

/// Validate a decoded JSON body and build the [`TaskRequest`].
///
/// Rules are checked in order and the first failure wins:
/// empty body, required fields, HTTPS-only URL, name/URL agreement,
/// payload shape. Pure, no side effects.
pub fn validate_task(body: &Value) -> Result<TaskRequest, ValidateError> {
    let obj = body
        .as_object()
        .filter(|m| !m.is_empty())
        .ok_or(ValidateError::EmptyPayload)?;

    let script_url = obj
        .get("script_url")
        .and_then(Value::as_str)
        .ok_or(ValidateError::MissingField("script_url"))?;
    let script_name = obj
        .get("script_name")
        .and_then(Value::as_str)
        .ok_or(ValidateError::MissingField("script_name"))?;

    // Plain HTTP is rejected to prevent script tampering in transit.
    if !script_url.starts_with("https://") {
        return Err(ValidateError::InsecureUrl);
    }

    let derived = filename_from_url(script_url);
    if script_name != derived {
        return Err(ValidateError::NameMismatch {
            name: script_name.to_string(),
            derived,
        });
    }

    let payload = match obj.get("payload") {
        None => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => return Err(ValidateError::PayloadNotObject),
    };

    Ok(TaskRequest {
        script_url: script_url.to_string(),
        script_name: script_name.to_string(),
        payload,
    })
}

/// Derive the script filename from a URL.
///
/// Takes the last `/`-delimited segment of the URL path. When the segment is
/// empty or lacks the script extension, falls back to a name hashed from the
/// whole URL, so two calls with the same URL always agree on a name.
pub fn filename_from_url(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .map(|u| {
            u.path()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .unwrap_or_default();

    if segment.is_empty() || !segment.ends_with(SCRIPT_EXT) {
        let digest = Sha256::digest(url.as_bytes());
        let hex = format!("{digest:x}");
        format!("script_{}{}", &hex[..16], SCRIPT_EXT)
    } else {
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_task_with_payload() {
        let body = json!({
            "script_url": "https://example.com/script_abc123.py",
            "script_name": "script_abc123.py",
            "payload": {"key": "value"}
        });

        let task = validate_task(&body).expect("task should validate");
        assert_eq!(task.script_url, "https://example.com/script_abc123.py");
        assert_eq!(task.script_name, "script_abc123.py");
        assert_eq!(
            task.payload.as_ref().and_then(|p| p.get("key")),
            Some(&json!("value"))
        );
    }

    #[test]
    fn valid_task_without_payload() {
        let body = json!({
            "script_url": "https://example.com/run.py",
            "script_name": "run.py"
        });

        let task = validate_task(&body).unwrap();
        assert!(task.payload.is_none());
    }

    #[test]
    fn missing_script_url() {
        let body = json!({"script_name": "script.py"});
        let err = validate_task(&body).unwrap_err();
        assert_eq!(err, ValidateError::MissingField("script_url"));
        assert!(err.to_string().contains("script_url"));
    }

    #[test]
    fn missing_script_name() {
        let body = json!({"script_url": "https://example.com/script.py"});
        let err = validate_task(&body).unwrap_err();
        assert_eq!(err, ValidateError::MissingField("script_name"));
        assert!(err.to_string().contains("script_name"));
    }

    #[test]
    fn non_https_url_rejected() {
        let body = json!({
            "script_url": "http://example.com/script.py",
            "script_name": "script.py"
        });
        let err = validate_task(&body).unwrap_err();
        assert!(err.to_string().contains("HTTPS"));
    }

    #[test]
    fn script_name_mismatch() {
        let body = json!({
            "script_url": "https://example.com/script_abc.py",
            "script_name": "different_name.py"
        });
        let err = validate_task(&body).unwrap_err();
        assert!(err.to_string().contains("does not match"));
        assert!(err.to_string().contains("different_name.py"));
        assert!(err.to_string().contains("script_abc.py"));
    }

    #[test]
    fn payload_must_be_object() {
        let body = json!({
            "script_url": "https://example.com/script_abc.py",
            "script_name": "script_abc.py",
            "payload": "not a dict"
        });
        let err = validate_task(&body).unwrap_err();
        assert_eq!(err, ValidateError::PayloadNotObject);
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn empty_bodies_rejected() {
        for body in [Value::Null, json!({}), json!("text"), json!(42)] {
            assert_eq!(validate_task(&body).unwrap_err(), ValidateError::EmptyPayload);
        }
    }

    #[test]
    fn filename_from_plain_url() {
        assert_eq!(
            filename_from_url("https://example.com/dir/script.py"),
            "script.py"
        );
    }

    #[test]
    fn filename_fallback_without_segment() {
        let name = filename_from_url("https://example.com/");
        assert!(name.starts_with("script_"));
        assert!(name.ends_with(".py"));
    }

    #[test]
    fn filename_fallback_without_extension() {
        let name = filename_from_url("https://example.com/download?id=7");
        assert!(name.starts_with("script_"));
        assert!(name.ends_with(".py"));
    }

    #[test]
    fn filename_derivation_is_idempotent() {
        for url in [
            "https://example.com/script.py",
            "https://example.com/",
            "https://example.com/blob/42",
            "not a url at all",
        ] {
            assert_eq!(filename_from_url(url), filename_from_url(url));
        }
    }

    #[test]
    fn mismatched_pairs_fail_matching_pairs_pass() {
        let ok = json!({
            "script_url": "https://host/a/b/job.py",
            "script_name": "job.py"
        });
        assert!(validate_task(&ok).is_ok());

        let derived = filename_from_url("https://host/a/b/archive");
        let hashed = json!({
            "script_url": "https://host/a/b/archive",
            "script_name": derived
        });
        assert!(validate_task(&hashed).is_ok());

        let bad = json!({
            "script_url": "https://host/a/b/job.py",
            "script_name": "other.py"
        });
        assert!(validate_task(&bad).is_err());
    }
}
