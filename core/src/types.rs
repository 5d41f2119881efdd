//! Domain DTOs for the news provider.
//!
//! # Design
//! These types mirror the provider's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Keys are camelCase on the wire, except the image field which the
//! provider calls `urlToImage`.

use serde::{Deserialize, Serialize};

/// The outlet an article was published by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// One news item as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: Source,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response envelope shared by both endpoints.
///
/// On success `status` is `"ok"` and `articles` is populated. On provider
/// errors `status` is `"error"` and `code`/`message` describe the failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProviderResponse {
    pub const STATUS_OK: &'static str = "ok";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_reads_provider_field_names() {
        let raw = r#"{
            "source": {"id": null, "name": "The Verge"},
            "author": "Jane Doe",
            "title": "Chips",
            "description": null,
            "url": "https://example.com/chips",
            "urlToImage": "https://example.com/chips.jpg",
            "publishedAt": "2024-05-01T10:00:00Z",
            "content": null
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert_eq!(article.source.id, None);
        assert_eq!(article.source.name, "The Verge");
        assert_eq!(article.image_url.as_deref(), Some("https://example.com/chips.jpg"));
        assert_eq!(article.published_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let raw = r#"{
            "source": {"name": "Wire"},
            "title": "Bare",
            "url": "https://example.com/bare",
            "publishedAt": "2024-05-01T10:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert!(article.author.is_none());
        assert!(article.image_url.is_none());
        assert!(article.content.is_none());
    }

    #[test]
    fn error_envelope_has_no_articles() {
        let raw = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let resp: ProviderResponse = serde_json::from_str(raw).unwrap();
        assert!(!resp.is_ok());
        assert!(resp.articles.is_empty());
        assert_eq!(resp.code.as_deref(), Some("apiKeyInvalid"));
    }
}
