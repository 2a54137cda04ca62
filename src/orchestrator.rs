use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::spotify::{Album, MusicCatalog};
use crate::tmdb::{Movie, MovieCatalog, MovieDetails};
use crate::upstream::UpstreamError;

/// Recommendations shown on a details page.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Spotify search query for a movie's soundtrack.
///
/// The trailing space is part of the format.
pub fn soundtrack_query(title: &str, year: &str) -> String {
    format!("year:{} {} ", year, title)
}

/// Everything the movie details page renders.
#[derive(Debug, Clone)]
pub struct MovieDetailsView {
    pub title: String,
    pub movie_details: MovieDetails,
    pub soundtrack_album: Option<Album>,
    pub recommended_movies: Vec<Movie>,
}

/// Coordinates the movie database and the music catalog.
#[derive(Clone)]
pub struct MovieService {
    movies: Arc<dyn MovieCatalog>,
    music: Arc<dyn MusicCatalog>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieCatalog>, music: Arc<dyn MusicCatalog>) -> Self {
        Self { movies, music }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: Option<&str>, page: u32) -> Result<Vec<Movie>, UpstreamError> {
        let movies = self.movies.search_movies(query, page).await?;
        debug!(count = movies.len(), "movie search finished");
        Ok(movies)
    }

    /// Details, soundtrack and recommendations for one movie.
    ///
    /// Calls run one after another: details, album lookup, recommendations.
    /// An empty album search leaves `soundtrack_album` empty; any upstream
    /// failure aborts the whole view.
    #[instrument(skip(self))]
    pub async fn movie_details(&self, tmdb_id: &str) -> Result<MovieDetailsView, UpstreamError> {
        let movie_details = self.movies.movie_details(tmdb_id).await?;

        let title = movie_details.title.clone();
        let query = soundtrack_query(&title, movie_details.year());
        let soundtrack_album = self.music.find_album(&query).await?;
        match soundtrack_album {
            Some(ref album) => info!(query = %query, album = %album.name, "soundtrack found"),
            None => info!(query = %query, "no soundtrack found"),
        }

        let recommended_movies = self
            .movies
            .recommendations(tmdb_id)
            .await?
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .collect();

        Ok(MovieDetailsView {
            title,
            movie_details,
            soundtrack_album,
            recommended_movies,
        })
    }
}
