//! Spotify Web API client: client-credentials tokens and album search.

pub mod api;
pub mod client;
pub mod token;
pub mod types;

pub use api::{MusicCatalog, TokenProvider};
pub use client::SpotifyClient;
pub use token::ClientCredentials;
pub use types::*;
