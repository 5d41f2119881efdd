use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const SEED: &str = include_str!("../fixtures/articles.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: Source,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: String,
    pub content: Option<String>,
}

/// An article plus the facets `top-headlines` filters on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub country: String,
    pub category: String,
    pub language: String,
    #[serde(flatten)]
    pub article: Article,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesBody {
    pub status: String,
    pub total_results: usize,
    pub articles: Vec<Article>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub code: String,
    pub message: String,
}

/// One request as the server saw it, `apiKey` included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
}

pub type Requests = Arc<RwLock<Vec<RecordedRequest>>>;

#[derive(Clone)]
pub struct MockState {
    api_key: Arc<str>,
    catalog: Arc<Vec<CatalogEntry>>,
    pub requests: Requests,
}

impl MockState {
    pub fn new(api_key: &str, catalog: Vec<CatalogEntry>) -> Self {
        Self {
            api_key: api_key.into(),
            catalog: Arc::new(catalog),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// State over the bundled fixture catalog.
    pub fn seeded(api_key: &str) -> Self {
        Self::new(api_key, seed_catalog())
    }

    pub async fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }
}

pub fn seed_catalog() -> Vec<CatalogEntry> {
    serde_json::from_str(SEED).unwrap_or_else(|e| {
        tracing::error!(error = %e, "bundled article fixture is invalid");
        Vec::new()
    })
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/top-headlines", get(top_headlines))
        .route("/everything", get(everything))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

type Params = BTreeMap<String, String>;

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = ErrorBody {
        status: "error".to_string(),
        code: code.to_string(),
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

fn ok(articles: Vec<Article>) -> Response {
    Json(ArticlesBody {
        status: "ok".to_string(),
        total_results: articles.len(),
        articles,
    })
    .into_response()
}

/// Record the request and check its key. Returns the rejection to send, if
/// any.
async fn admit(state: &MockState, endpoint: &str, params: &Params) -> Option<Response> {
    state.requests.write().await.push(RecordedRequest {
        endpoint: endpoint.to_string(),
        params: params.clone(),
    });
    tracing::info!(endpoint, params = params.len(), "request");

    match params.get("apiKey") {
        None => Some(error(
            StatusCode::UNAUTHORIZED,
            "apiKeyMissing",
            "Your API key is missing.",
        )),
        Some(key) if key.as_str() != &*state.api_key => Some(error(
            StatusCode::UNAUTHORIZED,
            "apiKeyInvalid",
            "Your API key is invalid or incorrect.",
        )),
        Some(_) => None,
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

fn matches_query(article: &Article, q: &str) -> bool {
    let needle = q.trim().to_lowercase();
    contains_ci(Some(&article.title), &needle)
        || contains_ci(article.description.as_deref(), &needle)
        || contains_ci(article.content.as_deref(), &needle)
}

fn in_sources(article: &Article, sources: &str) -> bool {
    let id = article.source.id.as_deref().unwrap_or_default();
    sources.split(',').any(|s| !id.is_empty() && s.trim() == id)
}

/// Compare ISO-8601 timestamps on the precision the bound was given in.
fn prefix(published_at: &str, len: usize) -> &str {
    published_at.get(..len).unwrap_or(published_at)
}

async fn top_headlines(State(state): State<MockState>, Query(params): Query<Params>) -> Response {
    if let Some(rejection) = admit(&state, "top-headlines", &params).await {
        return rejection;
    }
    if !["q", "country", "category", "sources"]
        .iter()
        .any(|k| params.contains_key(*k))
    {
        return error(
            StatusCode::BAD_REQUEST,
            "parametersMissing",
            "Required parameters are missing. Please set any of the following parameters and try again: sources, q, country, category.",
        );
    }
    if params.contains_key("sources")
        && (params.contains_key("country") || params.contains_key("category"))
    {
        return error(
            StatusCode::BAD_REQUEST,
            "parametersIncompatible",
            "You cannot mix the sources parameter with the country or category parameters.",
        );
    }

    let articles = state
        .catalog
        .iter()
        .filter(|e| params.get("q").is_none_or(|q| matches_query(&e.article, q)))
        .filter(|e| params.get("country").is_none_or(|c| &e.country == c))
        .filter(|e| params.get("category").is_none_or(|c| &e.category == c))
        .filter(|e| params.get("sources").is_none_or(|s| in_sources(&e.article, s)))
        .map(|e| e.article.clone())
        .collect();
    ok(articles)
}

async fn everything(State(state): State<MockState>, Query(params): Query<Params>) -> Response {
    if let Some(rejection) = admit(&state, "everything", &params).await {
        return rejection;
    }
    if !["q", "sources", "domains"]
        .iter()
        .any(|k| params.contains_key(*k))
    {
        return error(
            StatusCode::BAD_REQUEST,
            "parametersMissing",
            "Required parameters are missing, the scope of your search is too broad. Please set any of the following required parameters and try again: q, sources, domains.",
        );
    }

    let mut articles: Vec<Article> = state
        .catalog
        .iter()
        .filter(|e| params.get("q").is_none_or(|q| matches_query(&e.article, q)))
        .filter(|e| params.get("language").is_none_or(|l| &e.language == l))
        .filter(|e| params.get("sources").is_none_or(|s| in_sources(&e.article, s)))
        .filter(|e| {
            params
                .get("domains")
                .is_none_or(|d| d.split(',').any(|d| e.article.url.contains(d.trim())))
        })
        .filter(|e| {
            params
                .get("from")
                .is_none_or(|from| prefix(&e.article.published_at, from.len()) >= from.as_str())
        })
        .filter(|e| {
            params
                .get("to")
                .is_none_or(|to| prefix(&e.article.published_at, to.len()) <= to.as_str())
        })
        .map(|e| e.article.clone())
        .collect();
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_catalog_parses() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.iter().any(|e| e.article.source.id.is_none()));
    }

    #[test]
    fn article_uses_provider_field_names() {
        let article = seed_catalog().remove(0).article;
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("urlToImage").is_some());
        assert!(json.get("publishedAt").is_some());
        assert!(json.get("country").is_none());
    }

    #[test]
    fn query_match_is_case_insensitive() {
        let catalog = seed_catalog();
        let bitcoin: Vec<&str> = catalog
            .iter()
            .filter(|e| matches_query(&e.article, "BITCOIN"))
            .map(|e| e.article.title.as_str())
            .collect();
        assert_eq!(bitcoin.len(), 2);
    }

    #[test]
    fn timestamp_bounds_use_given_precision() {
        assert_eq!(prefix("2024-05-01T10:00:00Z", 10), "2024-05-01");
        assert_eq!(prefix("2024", 10), "2024");
    }
}
