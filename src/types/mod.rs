//! Core data types: response shapes, request bodies, and the discriminated
//! call result.

use std::collections::HashMap;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Declared shape of the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    /// Parse the body as JSON (the default).
    #[default]
    Json,
    /// Read the body as text.
    Text,
    /// Read the body as raw bytes.
    ArrayBuffer,
}

impl FromStr for ResponseType {
    type Err = std::convert::Infallible;

    /// Permissive by contract: unrecognized values behave as `Json`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "text" => Self::Text,
            "arrayBuffer" => Self::ArrayBuffer,
            _ => Self::Json,
        })
    }
}

/// Outbound request body.
pub enum RequestBody {
    /// Serialized to JSON text on the wire.
    Json(serde_json::Value),
    /// Passed through unencoded; the transport sets the multipart boundary
    /// and no `Content-Type` header is injected.
    Multipart(reqwest::multipart::Form),
    /// Sent verbatim.
    Raw(Bytes),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, FetchError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Multipart(_) => f.write_str("Multipart(..)"),
            Self::Raw(bytes) => f.debug_tuple("Raw").field(&bytes.len()).finish(),
        }
    }
}

/// Decoded response body.
///
/// `Null` is used when nothing could be decoded, so `data` is always present
/// on results and errors alike.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchData {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
    Null,
}

impl FetchData {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Discriminated result of a non-throwing call.
///
/// Exactly one arm holds; consuming code branches exhaustively instead of
/// probing nullable fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Success {
        status_code: u16,
        headers: HashMap<String, String>,
        data: FetchData,
    },
    Failure {
        /// Absent when no response was received (transport/decode failures).
        status_code: Option<u16>,
        headers: HashMap<String, String>,
        data: FetchData,
        error_message: String,
    },
}

impl FetchResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        match self {
            Self::Success { headers, .. } | Self::Failure { headers, .. } => headers,
        }
    }

    pub fn data(&self) -> &FetchData {
        match self {
            Self::Success { data, .. } | Self::Failure { data, .. } => data,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { error_message, .. } => Some(error_message),
            Self::Success { .. } => None,
        }
    }
}

impl From<FetchError> for FetchResponse {
    /// Conversion used by the non-throwing path: errors that carry a
    /// response keep its diagnostics, everything else degrades to a bare
    /// failure with `Null` data.
    fn from(error: FetchError) -> Self {
        let error_message = error.to_string();
        match error {
            FetchError::Http {
                status_code,
                headers,
                data,
            } => Self::Failure {
                status_code: Some(status_code),
                headers,
                data,
                error_message,
            },
            FetchError::Validation {
                status_code,
                headers,
                data,
                ..
            } => Self::Failure {
                status_code: Some(status_code),
                headers,
                data,
                error_message,
            },
            FetchError::Transport(_) | FetchError::Json(_) | FetchError::InvalidArgument(_) => {
                Self::Failure {
                    status_code: None,
                    headers: HashMap::new(),
                    data: FetchData::Null,
                    error_message,
                }
            }
        }
    }
}
