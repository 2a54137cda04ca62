use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Calendar year of an ISO `YYYY-MM-DD` date: everything before the first `-`.
pub fn release_year(release_date: &str) -> &str {
    release_date.split('-').next().unwrap_or_default()
}

/// A movie as it appears in search results and recommendation lists.
///
/// Fields the templates need are typed; the rest of the upstream object is
/// kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn year(&self) -> &str {
        release_year(&self.release_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Response of `movie/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieDetails {
    pub fn year(&self) -> &str {
        release_year(&self.release_date)
    }

    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Paged list response used by `search/movie` and `movie/{id}/recommendations`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year() {
        assert_eq!(release_year("2008-07-16"), "2008");
        assert_eq!(release_year("1999"), "1999");
        assert_eq!(release_year(""), "");
    }

    #[test]
    fn test_movie_keeps_unknown_fields() {
        let json = r#"{
            "id": 155,
            "title": "The Dark Knight",
            "release_date": "2008-07-16",
            "overview": "Batman raises the stakes.",
            "poster_path": "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
            "vote_average": 8.5,
            "original_language": "en",
            "genre_ids": [18, 28]
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 155);
        assert_eq!(movie.year(), "2008");
        assert_eq!(movie.extra.get("original_language").unwrap(), "en");
        assert_eq!(movie.extra["genre_ids"], serde_json::json!([18, 28]));

        let back = serde_json::to_value(&movie).unwrap();
        assert_eq!(back["genre_ids"], serde_json::json!([18, 28]));
        assert_eq!(back["title"], "The Dark Knight");
    }

    #[test]
    fn test_movie_null_fields() {
        let json = r#"{"id": 1, "title": "Untitled", "release_date": null, "overview": null, "poster_path": null}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.release_date, "");
        assert_eq!(movie.overview, "");
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.year(), "");
    }

    #[test]
    fn test_details_genres() {
        let json = r#"{
            "id": 155,
            "title": "The Dark Knight",
            "release_date": "2008-07-16",
            "runtime": 152,
            "genres": [{"id": 18, "name": "Drama"}, {"id": 28, "name": "Action"}]
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.runtime, Some(152));
        assert_eq!(details.genre_names(), "Drama, Action");
        assert_eq!(details.tagline, "");
    }

    #[test]
    fn test_empty_page() {
        let page: MoviePage =
            serde_json::from_str(r#"{"page":1,"results":[],"total_pages":0,"total_results":0}"#)
                .unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.page, 1);
    }
}
