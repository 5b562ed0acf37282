//! Request construction: body eligibility and wire encoding.

use bytes::Bytes;

use crate::error::FetchError;
use crate::types::RequestBody;

/// Wire-ready body handed to the transport.
pub enum EncodedBody {
    /// Serialized JSON text.
    Text(String),
    /// Multipart form, passed through unencoded.
    Multipart(reqwest::multipart::Form),
    /// Raw bytes, sent verbatim.
    Raw(Bytes),
}

impl EncodedBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl std::fmt::Debug for EncodedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Multipart(_) => f.write_str("Multipart(..)"),
            Self::Raw(bytes) => f.debug_tuple("Raw").field(&bytes.len()).finish(),
        }
    }
}

/// Whether the method may carry a request body at all.
///
/// Only POST, PUT, and PATCH are body-eligible; a body supplied with any
/// other method is dropped rather than sent. An empty method is a
/// programmer error, not a runtime failure.
pub fn can_send_body(method: &str) -> Result<bool, FetchError> {
    if method.is_empty() {
        return Err(FetchError::InvalidArgument("no method provided".to_string()));
    }
    Ok(matches!(
        method.to_ascii_uppercase().as_str(),
        "POST" | "PUT" | "PATCH"
    ))
}

/// Parse the extensible method string into a typed method.
pub fn parse_method(method: &str) -> Result<reqwest::Method, FetchError> {
    if method.is_empty() {
        return Err(FetchError::InvalidArgument("no method provided".to_string()));
    }
    reqwest::Method::from_bytes(method.as_bytes())
        .map_err(|_| FetchError::InvalidArgument(format!("invalid method '{method}'")))
}

/// Resolve and encode the body that will actually be sent.
///
/// Returns `None` for body-ineligible methods regardless of what was
/// supplied.
pub fn resolve_body(
    method: &str,
    body: Option<RequestBody>,
) -> Result<Option<EncodedBody>, FetchError> {
    if !can_send_body(method)? {
        return Ok(None);
    }
    let Some(body) = body else {
        return Ok(None);
    };
    let encoded = match body {
        RequestBody::Json(value) => EncodedBody::Text(serde_json::to_string(&value)?),
        RequestBody::Multipart(form) => EncodedBody::Multipart(form),
        RequestBody::Raw(bytes) => EncodedBody::Raw(bytes),
    };
    Ok(Some(encoded))
}
