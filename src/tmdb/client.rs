use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use super::api::MovieCatalog;
use super::types::{Movie, MovieDetails, MoviePage};
use crate::config::TmdbConfig;
use crate::upstream::{parse_base_url, UpstreamClient, UpstreamError};

const SERVICE: &str = "TMDB";

/// TMDB v3 client authenticated with an `api_key` query parameter.
#[derive(Clone)]
pub struct TmdbClient {
    http: UpstreamClient,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: UpstreamClient::new(SERVICE, config.upstream.retry_policy())?,
            base_url: parse_base_url(SERVICE, &config.base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url.join(path).map_err(|e| self.http.url_error(e))
    }

    fn movie_path(id: &str) -> String {
        format!("movie/{}", urlencoding::encode(id))
    }

    async fn get_page(&self, url: Url, params: &[(&str, String)]) -> Result<MoviePage, UpstreamError> {
        self.http
            .execute_json(|client| {
                client
                    .get(url.clone())
                    .query(&[("api_key", self.api_key.as_str())])
                    .query(params)
            })
            .await
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    #[instrument(skip(self))]
    async fn search_movies(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> Result<Vec<Movie>, UpstreamError> {
        let url = self.endpoint("search/movie")?;
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(q) = query {
            params.push(("query", q.to_string()));
        }
        params.push(("page", page.to_string()));

        let response = self.get_page(url, &params).await?;
        Ok(response.results)
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, id: &str) -> Result<MovieDetails, UpstreamError> {
        let url = self.endpoint(&Self::movie_path(id))?;
        self.http
            .execute_json(|client| {
                client
                    .get(url.clone())
                    .query(&[("api_key", self.api_key.as_str())])
            })
            .await
    }

    #[instrument(skip(self))]
    async fn recommendations(&self, id: &str) -> Result<Vec<Movie>, UpstreamError> {
        let url = self.endpoint(&format!("{}/recommendations", Self::movie_path(id)))?;
        let page = self.get_page(url, &[]).await?;
        Ok(page.results)
    }
}
