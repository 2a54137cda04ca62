use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use super::api::TokenProvider;
use super::types::TokenResponse;
use crate::config::SpotifyConfig;
use crate::upstream::{parse_base_url, UpstreamClient, UpstreamError};

const SERVICE: &str = "Spotify accounts";

/// OAuth2 client-credentials grant against the Spotify accounts service.
///
/// Every call performs a fresh exchange; tokens are never cached.
#[derive(Clone)]
pub struct ClientCredentials {
    http: UpstreamClient,
    token_url: Url,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientCredentials {
    pub fn new(config: &SpotifyConfig) -> Result<Self, UpstreamError> {
        let http = UpstreamClient::new(SERVICE, config.upstream.retry_policy())?;
        let token_url = parse_base_url(SERVICE, &config.accounts_url)?
            .join("api/token")
            .map_err(|e| http.url_error(e))?;

        Ok(Self {
            http,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentials {
    #[instrument(skip(self))]
    async fn access_token(&self) -> Result<String, UpstreamError> {
        let token: TokenResponse = self
            .http
            .execute_json(|client| {
                client
                    .post(self.token_url.clone())
                    .basic_auth(&self.client_id, Some(&self.client_secret))
                    .form(&[("grant_type", "client_credentials")])
            })
            .await?;

        debug!(expires_in = ?token.expires_in, "obtained Spotify access token");
        Ok(token.access_token)
    }
}
