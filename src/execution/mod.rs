//! Request execution: header resolution, request construction, transport,
//! and response decoding.

pub mod headers;
pub mod request;
pub mod response;
pub mod transport;
