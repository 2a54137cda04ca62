//! Request execution shared by the TMDB and Spotify clients.

mod client;
mod error;

pub use client::{parse_base_url, RetryPolicy, UpstreamClient};
pub use error::UpstreamError;
