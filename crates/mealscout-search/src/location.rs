//! Search term persistence in a shareable URL.
//!
//! The term lives in the `q` query parameter. Rewriting keeps every other
//! parameter and its position; an empty term removes `q` entirely.

use std::fmt;

use url::Url;

use crate::error::LoaderError;

/// Query parameter holding the search term.
pub const TERM_PARAM: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocation {
    url: Url,
}

impl SearchLocation {
    pub fn parse(input: &str) -> Result<Self, LoaderError> {
        let url = Url::parse(input).map_err(|e| LoaderError::invalid_url(input, e))?;
        Ok(Self { url })
    }

    /// The term carried by the URL, or empty when `q` is absent.
    pub fn term(&self) -> String {
        self.url
            .query_pairs()
            .find(|(key, _)| key == TERM_PARAM)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }

    /// A copy of this location carrying `term`.
    pub fn with_term(&self, term: &str) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;

        for (key, value) in self.url.query_pairs() {
            if key != TERM_PARAM {
                pairs.push((key.into_owned(), value.into_owned()));
            } else if !replaced && !term.is_empty() {
                pairs.push((TERM_PARAM.to_string(), term.to_string()));
                replaced = true;
            }
        }

        if !replaced && !term.is_empty() {
            pairs.push((TERM_PARAM.to_string(), term.to_string()));
        }

        let mut url = self.url.clone();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        Self { url }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for SearchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
