//! In-memory catalogs for handler and orchestrator tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::spotify::{Album, MusicCatalog};
use crate::tmdb::{Movie, MovieCatalog, MovieDetails};
use crate::upstream::UpstreamError;

pub type CallLog = Arc<Mutex<Vec<String>>>;

fn upstream_status(service: &'static str, status: u16) -> UpstreamError {
    UpstreamError::Status {
        service,
        status: StatusCode::from_u16(status).unwrap(),
        message: format!("fake failure {}", status),
    }
}

pub fn movie(id: u64, title: &str, release_date: &str) -> Movie {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "release_date": release_date,
        "overview": format!("About {}", title),
    }))
    .unwrap()
}

pub fn details(id: u64, title: &str, release_date: &str) -> MovieDetails {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "release_date": release_date,
        "overview": "An overview.",
        "tagline": "Why so serious?",
        "runtime": 152,
        "genres": [{"id": 18, "name": "Drama"}],
    }))
    .unwrap()
}

pub fn album(id: &str, name: &str) -> Album {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "artists": [{"name": "Hans Zimmer"}],
        "images": [{"url": "https://i.scdn.co/image/cover", "height": 640, "width": 640}],
        "external_urls": {"spotify": format!("https://open.spotify.com/album/{}", id)},
    }))
    .unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCall {
    Search,
    Details,
    Recommendations,
}

#[derive(Default)]
pub struct FakeMovies {
    pub results: Vec<Movie>,
    pub details: Option<MovieDetails>,
    pub recommendations: Vec<Movie>,
    pub fail: Option<(MovieCall, u16)>,
    pub log: CallLog,
}

impl FakeMovies {
    fn check(&self, call: MovieCall) -> Result<(), UpstreamError> {
        match self.fail {
            Some((failing, status)) if failing == call => Err(upstream_status("TMDB", status)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MovieCatalog for FakeMovies {
    async fn search_movies(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> Result<Vec<Movie>, UpstreamError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("search:{}:{}", query.unwrap_or("<none>"), page));
        self.check(MovieCall::Search)?;
        Ok(self.results.clone())
    }

    async fn movie_details(&self, id: &str) -> Result<MovieDetails, UpstreamError> {
        self.log.lock().unwrap().push(format!("details:{}", id));
        self.check(MovieCall::Details)?;
        self.details
            .clone()
            .ok_or_else(|| upstream_status("TMDB", 404))
    }

    async fn recommendations(&self, id: &str) -> Result<Vec<Movie>, UpstreamError> {
        self.log.lock().unwrap().push(format!("recommendations:{}", id));
        self.check(MovieCall::Recommendations)?;
        Ok(self.recommendations.clone())
    }
}

#[derive(Default)]
pub struct FakeMusic {
    pub album: Option<Album>,
    pub fail: Option<u16>,
    pub log: CallLog,
}

#[async_trait]
impl MusicCatalog for FakeMusic {
    async fn find_album(&self, query: &str) -> Result<Option<Album>, UpstreamError> {
        self.log.lock().unwrap().push(format!("album:{}", query));
        if let Some(status) = self.fail {
            return Err(upstream_status("Spotify", status));
        }
        Ok(self.album.clone())
    }
}
