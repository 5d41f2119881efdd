//! State machine behind the news search screen.
//!
//! # Design
//! The screen never performs I/O. `mount` and `submit_search` return a
//! `PendingFetch` describing the request to make; the caller executes it
//! (for example with `NewsService::execute`, or on the mobile host through
//! the FFI) and reports the outcome with `complete`.
//!
//! Status is a single enum, so loading and an error message can never be
//! shown together. The article list is kept separately: it is replaced only
//! by a successful fetch and survives failures, leaving the last good results
//! visible under the error.
//!
//! Every fetch gets a fresh `RequestToken`. Only the latest token is
//! accepted by `complete`; responses to superseded requests are dropped, so
//! the list always reflects the most recent request rather than the most
//! recent response.

use crate::client::Endpoint;
use crate::error::ApiError;
use crate::params::QueryParams;
use crate::types::Article;

/// Topic of the headline feed loaded on mount.
pub const DEFAULT_TOPIC: &str = "technology";

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term.";
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch news. Please try again.";
pub const INITIAL_LOAD_FAILED_MESSAGE: &str = "Failed to load news";

/// Identifies one fetch issued by a `Screen`. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// What triggered a fetch. Decides the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Mount,
    Search,
}

impl FetchOrigin {
    pub fn failure_message(self) -> &'static str {
        match self {
            FetchOrigin::Mount => INITIAL_LOAD_FAILED_MESSAGE,
            FetchOrigin::Search => SEARCH_FAILED_MESSAGE,
        }
    }
}

/// A fetch the screen wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub origin: FetchOrigin,
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Whether `Screen::complete` applied an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The token was not the latest issued; state is unchanged.
    Stale,
}

/// Query text, article list and status of the search screen.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    query: String,
    articles: Vec<Article>,
    status: ScreenStatus,
    last_token: u64,
    in_flight: Option<(RequestToken, FetchOrigin)>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ScreenStatus::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ScreenStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Token of the fetch whose outcome `complete` would accept.
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight.map(|(token, _)| token)
    }

    /// Start the default headline feed.
    pub fn mount(&mut self) -> PendingFetch {
        tracing::debug!(topic = DEFAULT_TOPIC, "loading default headlines");
        self.begin(
            FetchOrigin::Mount,
            Endpoint::TopHeadlines,
            QueryParams::new().q(DEFAULT_TOPIC),
        )
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Search for the current query text.
    ///
    /// A blank query shows `EMPTY_QUERY_MESSAGE`, issues nothing and
    /// invalidates any fetch still in flight. Otherwise the screen enters
    /// `Loading` and returns the `everything` fetch for the query as typed.
    pub fn submit_search(&mut self) -> Option<PendingFetch> {
        if self.query.trim().is_empty() {
            if let Some((token, _)) = self.in_flight.take() {
                tracing::debug!(token = token.get(), "blank query supersedes in-flight fetch");
            }
            self.status = ScreenStatus::Failed(EMPTY_QUERY_MESSAGE.to_string());
            return None;
        }
        let params = QueryParams::new().q(self.query.clone());
        Some(self.begin(FetchOrigin::Search, Endpoint::Everything, params))
    }

    /// Report the outcome of the fetch identified by `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<Article>, ApiError>,
    ) -> Completion {
        let origin = match self.in_flight {
            Some((current, origin)) if current == token => origin,
            _ => {
                tracing::debug!(
                    token = token.get(),
                    latest = self.last_token,
                    "discarding stale response"
                );
                return Completion::Stale;
            }
        };
        self.in_flight = None;

        match outcome {
            Ok(articles) => {
                tracing::info!(token = token.get(), ?origin, count = articles.len(), "articles loaded");
                self.articles = articles;
                self.status = ScreenStatus::Loaded;
            }
            Err(err) => {
                tracing::warn!(token = token.get(), ?origin, kind = ?err.kind(), error = %err, "fetch failed");
                self.status = ScreenStatus::Failed(origin.failure_message().to_string());
            }
        }
        Completion::Applied
    }

    fn begin(&mut self, origin: FetchOrigin, endpoint: Endpoint, params: QueryParams) -> PendingFetch {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if let Some((previous, _)) = self.in_flight.replace((token, origin)) {
            tracing::debug!(previous = previous.get(), token = token.get(), "superseding in-flight fetch");
        }
        self.status = ScreenStatus::Loading;
        PendingFetch {
            token,
            origin,
            endpoint,
            params,
        }
    }
}
