//! Response body decoding.

use bytes::Bytes;

use crate::error::FetchError;
use crate::types::{FetchData, ResponseType};

/// Decode a successful response body according to the declared response
/// type. Only called for 2xx responses.
pub fn decode_body(body: &Bytes, response_type: ResponseType) -> Result<FetchData, FetchError> {
    match response_type {
        ResponseType::Json => {
            let value = serde_json::from_slice(body)?;
            Ok(FetchData::Json(value))
        }
        ResponseType::Text => Ok(FetchData::Text(
            String::from_utf8_lossy(body).into_owned(),
        )),
        ResponseType::ArrayBuffer => Ok(FetchData::Bytes(body.clone())),
    }
}

/// Best-effort JSON decode of a non-2xx error body, for diagnostics only.
/// Parse failures are swallowed to `Null` and never propagate.
pub fn decode_error_body(body: &Bytes) -> FetchData {
    match serde_json::from_slice(body) {
        Ok(value) => FetchData::Json(value),
        Err(_) => FetchData::Null,
    }
}
