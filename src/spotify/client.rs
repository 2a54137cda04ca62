use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use super::api::{MusicCatalog, TokenProvider};
use super::token::ClientCredentials;
use super::types::{Album, SearchResponse};
use crate::config::SpotifyConfig;
use crate::upstream::{parse_base_url, UpstreamClient, UpstreamError};

const SERVICE: &str = "Spotify";

/// Album search against the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: UpstreamClient,
    search_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("search_url", &self.search_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig) -> Result<Self, UpstreamError> {
        let tokens = Arc::new(ClientCredentials::new(config)?);
        Self::with_token_provider(config, tokens)
    }

    pub fn with_token_provider(
        config: &SpotifyConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, UpstreamError> {
        let http = UpstreamClient::new(SERVICE, config.upstream.retry_policy())?;
        let search_url = parse_base_url(SERVICE, &config.api_url)?
            .join("v1/search")
            .map_err(|e| http.url_error(e))?;

        Ok(Self {
            http,
            search_url,
            tokens,
        })
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    #[instrument(skip(self))]
    async fn find_album(&self, query: &str) -> Result<Option<Album>, UpstreamError> {
        let token = self.tokens.access_token().await?;

        let response: SearchResponse = self
            .http
            .execute_json(|client| {
                client
                    .get(self.search_url.clone())
                    .bearer_auth(&token)
                    .query(&[("q", query), ("type", "album")])
            })
            .await?;

        debug!(total = response.albums.total, "album search finished");
        Ok(response.albums.items.into_iter().next())
    }
}
