//! Core error types.

use std::collections::HashMap;

use crate::types::FetchData;

/// Unified error for a single request execution.
///
/// Every variant except `InvalidArgument` is funneled through the
/// `throw_on_error` switch: with it on the error is returned as `Err` after
/// the observers fire, with it off the error is converted into a
/// [`FetchResponse::Failure`](crate::types::FetchResponse) and returned
/// normally. `InvalidArgument` is always an `Err`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Programmer error: missing or malformed request method.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered with a non-2xx status code. No distinction is
    /// made between 4xx and 5xx.
    #[error("Request failed")]
    Http {
        status_code: u16,
        headers: HashMap<String, String>,
        /// Best-effort JSON decode of the error body, `Null` when the body
        /// was not parseable.
        data: FetchData,
    },

    /// A 2xx response whose body failed schema validation.
    #[error("Parsing failed: {}", format_issues(.issues))]
    Validation {
        status_code: u16,
        headers: HashMap<String, String>,
        /// The decoded-but-invalid body, kept for diagnostics.
        data: FetchData,
        /// Issue messages grouped by dot-path.
        issues: HashMap<String, Vec<String>>,
    },

    /// Network-level failure (DNS, TLS, cancellation). One attempt, no
    /// retries.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded as the declared shape.
    #[error("JSON decode error: {0}")]
    Json(String),
}

impl FetchError {
    /// Status code of the underlying response, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } | Self::Validation { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    /// Response headers, when a response was received.
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Http { headers, .. } | Self::Validation { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// Whatever body could be decoded, even on failure.
    pub fn data(&self) -> Option<&FetchData> {
        match self {
            Self::Http { data, .. } | Self::Validation { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Grouped validation issues for `Validation` errors.
    pub fn issues(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            Self::Validation { issues, .. } => Some(issues),
            _ => None,
        }
    }
}

/// Render grouped issues as a deterministic one-line summary.
fn format_issues(issues: &HashMap<String, Vec<String>>) -> String {
    let mut fields: Vec<(&String, &Vec<String>)> = issues.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
        .iter()
        .map(|(path, messages)| format!("field '{path}' {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_diagnostics() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let error = FetchError::Http {
            status_code: 503,
            headers,
            data: FetchData::Null,
        };

        assert_eq!(error.status_code(), Some(503));
        assert!(error.headers().is_some());
        assert_eq!(error.data(), Some(&FetchData::Null));
        assert_eq!(error.to_string(), "Request failed");
    }

    #[test]
    fn validation_error_message_is_sorted_by_path() {
        let mut issues = HashMap::new();
        issues.insert("user.name".to_string(), vec!["is required".to_string()]);
        issues.insert("id".to_string(), vec!["must be a number".to_string()]);
        let error = FetchError::Validation {
            status_code: 200,
            headers: HashMap::new(),
            data: FetchData::Null,
            issues,
        };

        assert_eq!(
            error.to_string(),
            "Parsing failed: field 'id' must be a number. field 'user.name' is required"
        );
    }

    #[test]
    fn transport_error_has_no_response_diagnostics() {
        let error = FetchError::Transport("connection refused".to_string());
        assert_eq!(error.status_code(), None);
        assert!(error.headers().is_none());
        assert!(error.data().is_none());
    }
}
