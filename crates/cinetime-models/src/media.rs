use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog title. Serialized as `"movie"` / `"tv"` on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(format!("Invalid media type: {}. Must be 'movie' or 'tv'", s)),
        }
    }
}

/// Result-set scope used by type filters and assistant searches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl MediaFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFilter::All => "all",
            MediaFilter::Movie => "movie",
            MediaFilter::Tv => "tv",
        }
    }

    /// Whether a title of `kind` passes this filter
    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Movie => kind == MediaKind::Movie,
            MediaFilter::Tv => kind == MediaKind::Tv,
        }
    }
}

impl From<MediaKind> for MediaFilter {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => MediaFilter::Movie,
            MediaKind::Tv => MediaFilter::Tv,
        }
    }
}

impl fmt::Display for MediaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(MediaFilter::All),
            "movie" => Ok(MediaFilter::Movie),
            "tv" => Ok(MediaFilter::Tv),
            _ => Err(format!("Invalid filter: {}. Use 'all', 'movie' or 'tv'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_wire_format() {
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
        let kind: MediaKind = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(kind, MediaKind::Movie);
    }

    #[test]
    fn test_filter_matches() {
        assert!(MediaFilter::All.matches(MediaKind::Tv));
        assert!(MediaFilter::Movie.matches(MediaKind::Movie));
        assert!(!MediaFilter::Movie.matches(MediaKind::Tv));
        assert_eq!(MediaFilter::from(MediaKind::Tv), MediaFilter::Tv);
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!("show".parse::<MediaKind>().is_err());
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Tv);
    }
}
