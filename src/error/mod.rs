//! Error handling for request execution.
//!
//! A single `FetchError` enum covers the whole taxonomy: programmer errors
//! (`InvalidArgument`), non-2xx responses (`Http`), schema failures
//! (`Validation`), and network or decode failures (`Transport`, `Json`).

mod conversions;
pub mod types;

pub use types::*;
