//! Stateless HTTP request builder and response parser for the news provider.
//!
//! # Design
//! `NewsClient` holds the resolved endpoint URLs and the API key. Each
//! endpoint has a `build_*` method producing an `HttpRequest`; both endpoints share
//! `parse_articles`, which consumes the `HttpResponse`. The caller executes
//! the HTTP round-trip, keeping the client deterministic and free of I/O.
//!
//! The API key is injected by the client and always wins over a
//! caller-supplied `apiKey` parameter.

use std::fmt;

use url::Url;

use crate::config::NewsConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{QueryParams, API_KEY_PARAM};
use crate::types::{Article, ProviderResponse};

/// The two read-only provider endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Synchronous, stateless client for the news provider.
#[derive(Clone)]
pub struct NewsClient {
    base_url: Url,
    top_headlines: Url,
    everything: Url,
    api_key: String,
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl NewsClient {
    /// Create a client for `config`. Trailing slashes on the base URL are
    /// ignored.
    pub fn new(config: &NewsConfig) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };
        let trimmed = config.base_url.trim_end_matches('/');
        // A trailing slash makes `Url::join` append instead of replacing the
        // last segment.
        let base_url = Url::parse(&format!("{trimmed}/")).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        let join = |endpoint: Endpoint| {
            base_url
                .join(endpoint.path())
                .map_err(|e| invalid(e.to_string()))
        };
        Ok(Self {
            top_headlines: join(Endpoint::TopHeadlines)?,
            everything: join(Endpoint::Everything)?,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn build_top_headlines(&self, params: &QueryParams) -> HttpRequest {
        self.build(Endpoint::TopHeadlines, params)
    }

    pub fn build_everything(&self, params: &QueryParams) -> HttpRequest {
        self.build(Endpoint::Everything, params)
    }

    /// Build a GET request for `endpoint` with the API key first, followed
    /// by the caller's parameters in key order.
    pub fn build(&self, endpoint: Endpoint, params: &QueryParams) -> HttpRequest {
        let mut url = match endpoint {
            Endpoint::TopHeadlines => self.top_headlines.clone(),
            Endpoint::Everything => self.everything.clone(),
        };

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_KEY_PARAM, &self.api_key);
            for (key, value) in params.iter() {
                if key == API_KEY_PARAM {
                    tracing::warn!(%endpoint, "ignoring caller-supplied apiKey parameter");
                    continue;
                }
                query.append_pair(key, value);
            }
        }

        tracing::debug!(%endpoint, params = params.len(), "built provider request");
        HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// Turn a provider response into its article list.
    ///
    /// Non-2xx statuses become `ApiError::Http`, using the provider's error
    /// message when the body carries one. A readable body whose `status` is
    /// not `"ok"` becomes `ApiError::Provider`. Every failure is logged here
    /// before it is returned.
    pub fn parse_articles(&self, response: HttpResponse) -> Result<Vec<Article>, ApiError> {
        let result = parse_provider_response(response);
        match &result {
            Ok(articles) => tracing::debug!(count = articles.len(), "parsed provider articles"),
            Err(e) => tracing::error!(error = %e, "error fetching news"),
        }
        result
    }
}

fn parse_provider_response(response: HttpResponse) -> Result<Vec<Article>, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_str::<ProviderResponse>(&response.body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(response.body);
        return Err(ApiError::Http {
            status: response.status,
            message,
        });
    }

    let body: ProviderResponse = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if !body.is_ok() {
        return Err(ApiError::Provider {
            status: body.status,
            code: body.code,
            message: body.message,
        });
    }
    Ok(body.articles)
}
