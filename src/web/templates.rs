//! HTML pages rendered with askama. Templates live in `templates/`.

use askama::Template;

use crate::spotify::Album;
use crate::tmdb::{Movie, MovieDetails};

pub const SITE_NAME: &str = "Soundtracker";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
}

#[derive(Template)]
#[template(path = "search-results.html")]
pub struct SearchResultsTemplate {
    pub title: String,
    pub query: String,
    pub page: u32,
    pub movies: Vec<Movie>,
    pub image_base: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Template)]
#[template(path = "movie-details.html")]
pub struct MovieDetailsTemplate {
    pub title: String,
    pub movie_details: MovieDetails,
    pub soundtrack_album: Option<Album>,
    pub recommended_movies: Vec<Movie>,
    pub image_base: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub status: u16,
    pub message: String,
    pub details: String,
}

/// Link to another page of the same search.
pub fn search_href(query: &str, page: u32) -> String {
    format!(
        "/tmdb/search-movies?q={}&page={}",
        urlencoding::encode(query),
        page
    )
}
