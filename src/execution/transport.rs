//! HTTP transport abstraction and the default reqwest implementation.
//!
//! The engine talks to the network through an injectable [`HttpTransport`]
//! so tests and embedders can observe the final URL/headers/body or return
//! synthetic responses without going through `reqwest`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::request::EncodedBody;
use crate::config::TransportOptions;
use crate::error::FetchError;

/// Transport-level request data.
pub struct TransportRequest {
    pub url: String,
    pub method: reqwest::Method,
    pub headers: HeaderMap,
    pub body: Option<EncodedBody>,
    /// Forwarded verbatim from the call configuration.
    pub options: TransportOptions,
    pub signal: Option<CancellationToken>,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Injectable transport. One attempt per call; retries are the embedder's
/// concern.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, FetchError>;
}

/// Resolve the final URL: URLs with a scheme prefix pass through verbatim,
/// relative URLs are concatenated onto the base URL. No separator
/// normalization is performed.
pub fn resolve_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{base_url}{url}")
    }
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured client (proxies, timeouts, redirect policy).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, FetchError> {
        let ignored = unsupported_options(&request.options);
        if !ignored.is_empty() {
            tracing::debug!(
                options = ?ignored,
                "transport options not expressible per-request in reqwest; ignored"
            );
        }

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        match request.body {
            Some(EncodedBody::Text(text)) => builder = builder.body(text),
            Some(EncodedBody::Multipart(form)) => builder = builder.multipart(form),
            Some(EncodedBody::Raw(bytes)) => builder = builder.body(bytes),
            None => {}
        }

        let fut = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<TransportResponse, FetchError>(TransportResponse {
                status,
                headers,
                body,
            })
        };

        match request.signal {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {
                        Err(FetchError::Transport("request cancelled".to_string()))
                    }
                    result = fut => result,
                }
            }
            None => fut.await,
        }
    }
}

/// Browser-style fetch knobs that reqwest cannot express per-request.
/// Custom transports still receive them untouched on the request.
fn unsupported_options(options: &TransportOptions) -> Vec<&'static str> {
    let mut names = Vec::new();
    if options.cache.is_some() {
        names.push("cache");
    }
    if options
        .credentials
        .as_deref()
        .is_some_and(|credentials| credentials != "include")
    {
        names.push("credentials");
    }
    if options.keepalive.is_some() {
        names.push("keepalive");
    }
    if options.redirect.is_some() {
        names.push("redirect");
    }
    if options.referrer.is_some() {
        names.push("referrer");
    }
    if options.referrer_policy.is_some() {
        names.push("referrerPolicy");
    }
    if options.integrity.is_some() {
        names.push("integrity");
    }
    if options.priority.is_some() {
        names.push("priority");
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_url("https://api.example.com/posts", "https://other.example.com"),
            "https://api.example.com/posts"
        );
        assert_eq!(
            resolve_url("http://api.example.com/posts", ""),
            "http://api.example.com/posts"
        );
    }

    #[test]
    fn relative_urls_concatenate_without_normalization() {
        assert_eq!(
            resolve_url("/posts", "https://api.example.com"),
            "https://api.example.com/posts"
        );
        // Deliberately no separator fixing: the caller owns the delimiters.
        assert_eq!(
            resolve_url("posts", "https://api.example.com"),
            "https://api.example.composts"
        );
    }

    #[test]
    fn default_credentials_are_not_flagged() {
        assert!(unsupported_options(&TransportOptions::default()).is_empty());
    }

    #[test]
    fn browser_only_options_are_flagged() {
        let options = TransportOptions {
            cache: Some("no-store".to_string()),
            priority: Some("high".to_string()),
            ..TransportOptions::default()
        };
        assert_eq!(unsupported_options(&options), vec!["cache", "priority"]);
    }
}
