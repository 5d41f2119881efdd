//! The two provider operations, performed end to end.
//!
//! `NewsService` pairs a `NewsClient` with a `Transport`: build the request,
//! execute it, parse the result. Failures are logged where they occur (the
//! transport for network errors, `parse_articles` for status and provider
//! errors) and handed back as `ApiError`. There is no retry.

use crate::client::{Endpoint, NewsClient};
use crate::config::NewsConfig;
use crate::error::ApiError;
use crate::params::QueryParams;
use crate::screen::PendingFetch;
use crate::transport::{Transport, UreqTransport};
use crate::types::Article;

#[derive(Debug, Clone)]
pub struct NewsService<T> {
    client: NewsClient,
    transport: T,
}

impl NewsService<UreqTransport> {
    /// Service over the blocking `ureq` transport.
    pub fn from_config(config: &NewsConfig) -> Result<Self, ApiError> {
        Ok(Self::new(NewsClient::new(config)?, UreqTransport::new()))
    }
}

impl<T: Transport> NewsService<T> {
    pub fn new(client: NewsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &NewsClient {
        &self.client
    }

    pub fn fetch_top_headlines(&self, params: &QueryParams) -> Result<Vec<Article>, ApiError> {
        self.fetch(Endpoint::TopHeadlines, params)
    }

    pub fn fetch_everything(&self, params: &QueryParams) -> Result<Vec<Article>, ApiError> {
        self.fetch(Endpoint::Everything, params)
    }

    /// Run the fetch a `Screen` asked for. The caller reports the outcome
    /// back with `Screen::complete` using `pending.token`.
    pub fn execute(&self, pending: &PendingFetch) -> Result<Vec<Article>, ApiError> {
        self.fetch(pending.endpoint, &pending.params)
    }

    pub fn fetch(&self, endpoint: Endpoint, params: &QueryParams) -> Result<Vec<Article>, ApiError> {
        let request = self.client.build(endpoint, params);
        let response = self.transport.execute(&request)?;
        self.client.parse_articles(response)
    }
}
