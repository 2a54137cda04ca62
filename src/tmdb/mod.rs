//! TMDB (The Movie Database) v3 client.

pub mod api;
pub mod client;
pub mod types;

pub use api::MovieCatalog;
pub use client::TmdbClient;
pub use types::*;
