//! Storage location parsing and resolution
//!
//! Handles parsing of storage URLs in the canonical form:
//! `https://www.googleapis.com/storage/v1/<container>/<key>`.
//! URLs for other providers are passed through unmatched so this resolver can
//! sit in a multi-backend dispatch chain.

use url::Url;

use crate::error::{Error, Result};

/// Domain that identifies URLs belonging to this storage provider
pub const PROVIDER_DOMAIN: &str = "googleapis.com";

/// Number of dot-separated labels in a valid provider host (e.g. `www.googleapis.com`)
const HOST_LABELS: usize = 3;

/// Number of slash-separated path segments in a valid storage URL
/// (`/storage/v1/<container>/<key>` splits into 5 including the leading empty segment)
const PATH_SEGMENTS: usize = 5;

/// A parsed storage location pointing into the backend namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Container (bucket) name
    pub container: String,
    /// Object key, or a key prefix shared by multiple objects
    pub key: String,
}

impl Location {
    /// Create a new Location
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Re-serialize into the canonical storage URL form
    pub fn to_url(&self) -> String {
        format!(
            "https://www.{}/storage/v1/{}/{}",
            PROVIDER_DOMAIN, self.container, self.key
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

/// Result of resolving a URL against this provider's addressing convention
///
/// `NotMatched` means the URL belongs to some other backend and should flow
/// past this resolver untouched; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationMatch {
    /// The URL matched and parsed into a Location
    Matched(Location),
    /// The URL does not address this provider
    NotMatched,
}

impl LocationMatch {
    /// Check whether the URL matched this provider
    pub fn is_matched(&self) -> bool {
        matches!(self, LocationMatch::Matched(_))
    }

    /// Get the location if the URL matched
    pub fn as_location(&self) -> Option<&Location> {
        match self {
            LocationMatch::Matched(loc) => Some(loc),
            LocationMatch::NotMatched => None,
        }
    }

    /// Consume and return the location if the URL matched
    pub fn into_location(self) -> Option<Location> {
        match self {
            LocationMatch::Matched(loc) => Some(loc),
            LocationMatch::NotMatched => None,
        }
    }
}

/// Resolve a URL into a storage location
///
/// A URL whose host does not contain [`PROVIDER_DOMAIN`] resolves to
/// `NotMatched`. A URL on the provider domain must have exactly three host
/// labels and a path that splits into exactly five segments, the last two of
/// which form the container and key; anything else is an `InvalidLocation`
/// error.
pub fn parse_location(url: &Url) -> Result<LocationMatch> {
    let host = url.host_str().unwrap_or_default();
    if !host.contains(PROVIDER_DOMAIN) {
        return Ok(LocationMatch::NotMatched);
    }

    if host.split('.').count() != HOST_LABELS {
        return Err(Error::InvalidLocation(format!(
            "'{url}' is not a valid storage URL: unexpected host '{host}'"
        )));
    }

    let segments: Vec<&str> = url.path().splitn(PATH_SEGMENTS, '/').collect();
    if segments.len() != PATH_SEGMENTS {
        return Err(Error::InvalidLocation(format!(
            "'{url}' is not a valid storage URL: expected /storage/v1/<container>/<key>"
        )));
    }

    let container = segments[3];
    let key = segments[4];
    if container.is_empty() {
        return Err(Error::InvalidLocation(format!(
            "'{url}' is not a valid storage URL: empty container"
        )));
    }

    Ok(LocationMatch::Matched(Location::new(container, key)))
}

/// Parse a URL string and resolve it into a storage location
pub fn parse_location_str(url: &str) -> Result<LocationMatch> {
    let url = Url::parse(url)?;
    parse_location(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn must_match(url: &str) -> Location {
        parse_location_str(url).unwrap().into_location().unwrap()
    }

    #[test]
    fn test_parse_object_url() {
        let loc = must_match("https://www.googleapis.com/storage/v1/my-bucket/path/to/file.txt");
        assert_eq!(loc.container, "my-bucket");
        assert_eq!(loc.key, "path/to/file.txt");
    }

    #[test]
    fn test_parse_prefix_url() {
        let loc = must_match("https://www.googleapis.com/storage/v1/my-bucket/modules/");
        assert_eq!(loc.container, "my-bucket");
        assert_eq!(loc.key, "modules/");
    }

    #[test]
    fn test_parse_empty_key() {
        // Container root: whole-bucket prefix
        let loc = must_match("https://www.googleapis.com/storage/v1/my-bucket/");
        assert_eq!(loc.container, "my-bucket");
        assert_eq!(loc.key, "");
    }

    #[test]
    fn test_foreign_url_passes_through() {
        let result = parse_location_str("https://example.com/some/other/url").unwrap();
        assert_eq!(result, LocationMatch::NotMatched);
        assert!(!result.is_matched());
        assert!(result.as_location().is_none());
    }

    #[test]
    fn test_git_style_url_passes_through() {
        let result = parse_location_str("https://github.com/org/repo.git").unwrap();
        assert_eq!(result, LocationMatch::NotMatched);
    }

    #[test]
    fn test_bad_host_labels() {
        let result = parse_location_str("https://storage.www.googleapis.com/storage/v1/b/k");
        assert!(matches!(result, Err(Error::InvalidLocation(_))));
    }

    #[test]
    fn test_short_path_rejected() {
        let result = parse_location_str("https://www.googleapis.com/storage/v1/my-bucket");
        assert!(matches!(result, Err(Error::InvalidLocation(_))));

        let result = parse_location_str("https://www.googleapis.com/storage/v1/");
        assert!(matches!(result, Err(Error::InvalidLocation(_))));
    }

    #[test]
    fn test_empty_container_rejected() {
        let result = parse_location_str("https://www.googleapis.com/storage/v1//key");
        assert!(matches!(result, Err(Error::InvalidLocation(_))));
    }

    #[test]
    fn test_roundtrip() {
        for url in [
            "https://www.googleapis.com/storage/v1/my-bucket/file.txt",
            "https://www.googleapis.com/storage/v1/my-bucket/a/b/c.bin",
            "https://www.googleapis.com/storage/v1/other-bucket/prefix/",
        ] {
            let loc = must_match(url);
            let rt = must_match(&loc.to_url());
            assert_eq!(rt, loc);
            assert_eq!(loc.to_url(), url);
        }
    }

    #[test]
    fn test_display() {
        let loc = Location::new("bucket", "a/b.txt");
        assert_eq!(loc.to_string(), "bucket/a/b.txt");
    }
}
