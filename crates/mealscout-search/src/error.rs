//! Error types for the search loader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    /// The loader task has shut down and no longer accepts events
    #[error("Search loader is closed")]
    Closed,

    #[error("Invalid search URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl LoaderError {
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(LoaderError::Closed.to_string(), "Search loader is closed");

        let err = LoaderError::invalid_url("::", url::ParseError::RelativeUrlWithoutBase);
        assert!(err.to_string().starts_with("Invalid search URL '::'"));
    }
}
