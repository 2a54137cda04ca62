use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::Config;
use crate::orchestrator::MovieService;
use crate::spotify::SpotifyClient;
use crate::tmdb::TmdbClient;
use crate::upstream::UpstreamError;
use crate::web::{self, AppError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: MovieService,
}

impl AppState {
    pub fn new(config: Config, movies: MovieService) -> Self {
        Self {
            config: Arc::new(config),
            movies,
        }
    }

    /// Builds the TMDB and Spotify clients from `config`.
    pub fn from_config(config: Config) -> Result<Self, UpstreamError> {
        let tmdb = Arc::new(TmdbClient::new(&config.tmdb)?);
        let spotify = Arc::new(SpotifyClient::new(&config.spotify)?);
        Ok(Self::new(config, MovieService::new(tmdb, spotify)))
    }
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(web::index).fallback(fallback_handler))
        .route("/robots.txt", get(robots_txt_handler).fallback(fallback_handler))
        .route(
            "/tmdb/search-movies",
            get(web::search_movies).fallback(fallback_handler),
        )
        .route(
            "/movie-details/:tmdb_id",
            get(web::movie_details).fallback(fallback_handler),
        )
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            web::render_error_page,
        ))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Layers on the outer router run before the inner one picks a route.
    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

/// Unknown paths and unsupported methods on known paths both render the
/// 404 page.
async fn fallback_handler() -> Response {
    AppError::NotFound(None).into_response()
}
