//! Query parameters accepted by the provider endpoints.
//!
//! Keys are unique and order is irrelevant, so parameters live in a
//! `BTreeMap`; iteration order is therefore stable, which keeps built URLs
//! deterministic.

use std::collections::BTreeMap;

/// Name of the query parameter carrying the provider API key.
pub const API_KEY_PARAM: &str = "apiKey";

/// A key-unique mapping of string query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary parameter, replacing any previous value for `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Free-text search terms.
    pub fn q(self, value: impl Into<String>) -> Self {
        self.set("q", value)
    }

    /// Two-letter ISO 3166-1 country code (top-headlines only).
    pub fn country(self, value: impl Into<String>) -> Self {
        self.set("country", value)
    }

    /// Category such as `business` or `technology` (top-headlines only).
    pub fn category(self, value: impl Into<String>) -> Self {
        self.set("category", value)
    }

    /// Comma-separated source identifiers.
    pub fn sources(self, value: impl Into<String>) -> Self {
        self.set("sources", value)
    }

    /// Comma-separated domains to restrict the search to (everything only).
    pub fn domains(self, value: impl Into<String>) -> Self {
        self.set("domains", value)
    }

    /// Oldest publication timestamp, ISO 8601.
    pub fn from(self, value: impl Into<String>) -> Self {
        self.set("from", value)
    }

    /// Newest publication timestamp, ISO 8601.
    pub fn to(self, value: impl Into<String>) -> Self {
        self.set("to", value)
    }

    /// Two-letter ISO 639-1 language code.
    pub fn language(self, value: impl Into<String>) -> Self {
        self.set("language", value)
    }

    /// `relevancy`, `popularity` or `publishedAt`.
    pub fn sort_by(self, value: impl Into<String>) -> Self {
        self.set("sortBy", value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
