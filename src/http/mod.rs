//! HTTP client module with timeouts and error classification.

mod client;
mod status;

pub use client::{DOWNLOAD_CHUNK_SIZE, HttpClient};
pub use status::{HttpStatusError, classify_error, classify_status};
