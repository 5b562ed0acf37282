//! Instance and per-call configuration.
//!
//! A [`FetcherConfig`] is built once and shared by every call made through
//! its [`Fetcher`](crate::client::Fetcher); a [`RequestConfig`] is built
//! fresh per invocation and consumed by it. The effective configuration is
//! computed per call: scalar fields use the call value when present and the
//! instance value otherwise, headers combine under a
//! [`HeaderMergeStrategy`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::types::{RequestBody, ResponseType};
use crate::validation::SchemaValidator;

/// Observer invoked once per thrown error.
pub type ErrorObserver = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// Policy governing how instance default headers combine with per-call
/// headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMergeStrategy {
    /// Instance headers first, call headers layered on top; the call wins
    /// on key collision.
    #[default]
    Merge,
    /// Full replacement at the merged-map level. Key collisions resolve the
    /// same way as `Merge`; selective key removal is not supported.
    Overwrite,
    /// Only call headers are used; instance headers are ignored entirely,
    /// even when the call set is empty.
    OmitGlobal,
}

/// Transport tuning forwarded verbatim to the transport layer.
///
/// The core never interprets these. The default reqwest transport applies
/// what the client library can express and ignores the rest; custom
/// transports receive the full set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub cache: Option<String>,
    pub credentials: Option<String>,
    pub keepalive: Option<bool>,
    pub redirect: Option<String>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<String>,
    pub integrity: Option<String>,
    pub priority: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            cache: None,
            // Requests carry credentials unless the caller overrides this.
            credentials: Some("include".to_string()),
            keepalive: None,
            redirect: None,
            referrer: None,
            referrer_policy: None,
            integrity: None,
            priority: None,
        }
    }
}

/// Instance-level defaults, immutable after construction.
#[derive(Clone, Default)]
pub struct FetcherConfig {
    /// Prefix applied to relative URLs. No separator normalization is
    /// performed; supply a correctly delimited base/url pair.
    pub base_url: String,
    /// Headers applied to every call unless overridden.
    pub headers: HashMap<String, String>,
    /// Default for the throw/return switch; calls may override it.
    pub throw_on_error: bool,
    /// Instance-level observer, invoked before any call-level observer.
    pub on_error_thrown: Option<ErrorObserver>,
}

impl FetcherConfig {
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::default()
    }
}

impl std::fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("throw_on_error", &self.throw_on_error)
            .field("on_error_thrown", &self.on_error_thrown.is_some())
            .finish()
    }
}

/// Builder for [`FetcherConfig`].
#[derive(Default)]
pub struct FetcherConfigBuilder {
    base_url: Option<String>,
    headers: HashMap<String, String>,
    throw_on_error: Option<bool>,
    on_error_thrown: Option<ErrorObserver>,
}

impl FetcherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = Some(throw_on_error);
        self
    }

    pub fn on_error_thrown<F>(mut self, observer: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.on_error_thrown = Some(Arc::new(observer));
        self
    }

    pub fn build(self) -> FetcherConfig {
        FetcherConfig {
            base_url: self.base_url.unwrap_or_default(),
            headers: self.headers,
            throw_on_error: self.throw_on_error.unwrap_or(false),
            on_error_thrown: self.on_error_thrown,
        }
    }
}

/// Per-call configuration, consumed by the call that executes it.
pub struct RequestConfig {
    /// Request method as an extensible string ("GET", "POST", ...).
    pub method: String,
    pub url: String,
    pub body: Option<RequestBody>,
    pub response_type: ResponseType,
    pub schema: Option<Arc<dyn SchemaValidator>>,
    pub headers: Option<HashMap<String, String>>,
    pub header_merge_strategy: HeaderMergeStrategy,
    /// Overrides the instance default when present.
    pub throw_on_error: Option<bool>,
    /// Caller-supplied cancellation; there is no internal timeout.
    pub signal: Option<CancellationToken>,
    /// Call-scoped observer, invoked after the instance observer.
    pub on_error_thrown: Option<ErrorObserver>,
    pub transport_options: TransportOptions,
}

impl RequestConfig {
    pub fn new<M: Into<String>, U: Into<String>>(method: M, url: U) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            response_type: ResponseType::default(),
            schema: None,
            headers: None,
            header_merge_strategy: HeaderMergeStrategy::default(),
            throw_on_error: None,
            signal: None,
            on_error_thrown: None,
            transport_options: TransportOptions::default(),
        }
    }

    pub fn get<U: Into<String>>(url: U) -> Self {
        Self::new("GET", url)
    }

    pub fn post<U: Into<String>>(url: U) -> Self {
        Self::new("POST", url)
    }

    pub fn put<U: Into<String>>(url: U) -> Self {
        Self::new("PUT", url)
    }

    pub fn patch<U: Into<String>>(url: U) -> Self {
        Self::new("PATCH", url)
    }

    pub fn delete<U: Into<String>>(url: U) -> Self {
        Self::new("DELETE", url)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// JSON request body shorthand.
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn schema<S: SchemaValidator + 'static>(mut self, schema: S) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn schema_arc(mut self, schema: Arc<dyn SchemaValidator>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn header_merge_strategy(mut self, strategy: HeaderMergeStrategy) -> Self {
        self.header_merge_strategy = strategy;
        self
    }

    pub fn throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = Some(throw_on_error);
        self
    }

    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn on_error_thrown<F>(mut self, observer: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.on_error_thrown = Some(Arc::new(observer));
        self
    }

    pub fn transport_options(mut self, options: TransportOptions) -> Self {
        self.transport_options = options;
        self
    }
}
