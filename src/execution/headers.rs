//! Header resolution utilities.

use std::collections::HashMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::config::HeaderMergeStrategy;

/// Merge instance default headers with per-call headers under the given
/// strategy.
///
/// `Merge` and `Overwrite` both spread the instance map first and the call
/// map second, so the call wins on key collision; `OmitGlobal` drops the
/// instance map entirely.
pub fn merge_header_maps(
    instance: &HashMap<String, String>,
    call: Option<&HashMap<String, String>>,
    strategy: HeaderMergeStrategy,
) -> HashMap<String, String> {
    match strategy {
        HeaderMergeStrategy::Merge | HeaderMergeStrategy::Overwrite => {
            let mut merged = instance.clone();
            if let Some(call) = call {
                for (key, value) in call {
                    merged.insert(key.clone(), value.clone());
                }
            }
            merged
        }
        HeaderMergeStrategy::OmitGlobal => call.cloned().unwrap_or_default(),
    }
}

/// Build the outbound `HeaderMap`.
///
/// `Content-Type: application/json` is injected first unless the body is
/// multipart (the transport sets its own boundary); merged headers are
/// applied afterwards and may override it. Invalid header names or values
/// are skipped.
pub fn build_header_map(merged: &HashMap<String, String>, multipart: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !multipart {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    for (key, value) in merged {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, val);
        }
    }
    headers
}

/// Convert a response `HeaderMap` to a plain string map. Values that are
/// not valid UTF-8 are filtered out.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v_str| (k.as_str().to_string(), v_str.to_string()))
        })
        .collect()
}
