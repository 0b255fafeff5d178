use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// Uniform projection of a catalog title across trending, popular, search and
/// assistant views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl SearchResult {
    /// Release year taken from the leading `YYYY` of the release date
    pub fn year(&self) -> Option<u32> {
        self.release_date.get(..4).and_then(|y| y.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_from_release_date() {
        let result = SearchResult {
            id: 1,
            title: "Chinatown".to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "1974-06-20".to_string(),
            vote_average: 8.1,
            vote_count: 10,
            kind: MediaKind::Movie,
            genre_ids: vec![],
        };
        assert_eq!(result.year(), Some(1974));

        let undated = SearchResult { release_date: String::new(), ..result };
        assert_eq!(undated.year(), None);
    }
}
