//! typedfetch
//!
//! A typed, schema-validating HTTP request executor: one call performs one
//! network request and returns parsed, typed data or a structured error
//! instead of a raw response object.
//!
//! ```rust,ignore
//! use typedfetch::prelude::*;
//!
//! let fetcher = Fetcher::new(
//!     FetcherConfig::builder()
//!         .base_url("https://api.example.com")
//!         .header("authorization", "Bearer token")
//!         .build(),
//! );
//!
//! let response = fetcher.fetch(RequestConfig::get("/posts")).await?;
//! match response {
//!     FetchResponse::Success { data, .. } => println!("{data:?}"),
//!     FetchResponse::Failure { error_message, .. } => eprintln!("{error_message}"),
//! }
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod execution;
pub mod types;
pub mod validation;

pub use client::Fetcher;
pub use error::FetchError;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::client::Fetcher;
    pub use crate::config::{
        ErrorObserver, FetcherConfig, HeaderMergeStrategy, RequestConfig, TransportOptions,
    };
    pub use crate::error::FetchError;
    pub use crate::execution::transport::{HttpTransport, TransportRequest, TransportResponse};
    pub use crate::types::{FetchData, FetchResponse, RequestBody, ResponseType};
    pub use crate::validation::{
        JsonSchema, PathSegment, RawValidation, SchemaIssue, SchemaValidator, ValidationOutcome,
    };
}
