use async_trait::async_trait;

use super::types::{Movie, MovieDetails};
use crate::upstream::UpstreamError;

/// Movie database operations used by the web layer.
///
/// Implemented by [`super::TmdbClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// One page of search results. A `None` query is not sent upstream.
    async fn search_movies(&self, query: Option<&str>, page: u32)
        -> Result<Vec<Movie>, UpstreamError>;

    async fn movie_details(&self, id: &str) -> Result<MovieDetails, UpstreamError>;

    /// Recommendations in upstream (relevance) order, untruncated.
    async fn recommendations(&self, id: &str) -> Result<Vec<Movie>, UpstreamError>;
}
