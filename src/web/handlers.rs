use askama::Template;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Html,
};
use serde::Deserialize;

use super::error::AppError;
use super::templates::{
    search_href, IndexTemplate, MovieDetailsTemplate, SearchResultsTemplate, SITE_NAME,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Page number from the query string. Missing, empty and `0` mean page 1.
pub fn parse_page(raw: Option<&str>) -> Result<u32, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };
    match raw.parse::<u32>() {
        Ok(0) => Ok(1),
        Ok(page) => Ok(page),
        Err(_) => Err(AppError::Validation(format!(
            "Invalid page number: {}",
            raw
        ))),
    }
}

fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

pub async fn index() -> Result<Html<String>, AppError> {
    render(&IndexTemplate {
        title: SITE_NAME.to_string(),
    })
}

pub async fn search_movies(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(params) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let page = parse_page(params.page.as_deref())?;
    let movies = state.movies.search(params.q.as_deref(), page).await?;

    let query = params.q.unwrap_or_default();
    let prev_href = (page > 1).then(|| search_href(&query, page - 1));
    let next_href = (!movies.is_empty()).then(|| search_href(&query, page.saturating_add(1)));

    render(&SearchResultsTemplate {
        title: format!("{} - Search Movies", SITE_NAME),
        query,
        page,
        movies,
        image_base: state.config.tmdb.image_base_url.clone(),
        prev_href,
        next_href,
    })
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(tmdb_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let view = state.movies.movie_details(&tmdb_id).await?;

    render(&MovieDetailsTemplate {
        title: view.title,
        movie_details: view.movie_details,
        soundtrack_album: view.soundtrack_album,
        recommended_movies: view.recommended_movies,
        image_base: state.config.tmdb.image_base_url.clone(),
    })
}
