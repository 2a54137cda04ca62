use async_trait::async_trait;

use super::types::Album;
use crate::upstream::UpstreamError;

/// Source of bearer tokens for the Spotify Web API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, UpstreamError>;
}

/// Music catalog operations used by the movie details page.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// First album matching `query`, or `None` when the search is empty.
    async fn find_album(&self, query: &str) -> Result<Option<Album>, UpstreamError>;
}
