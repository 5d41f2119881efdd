//! Client core for a news search screen.
//!
//! # Overview
//! Builds `HttpRequest` values for the provider's `top-headlines` and
//! `everything` endpoints and parses their responses without touching the
//! network (host-does-IO pattern). On top of that sits `Screen`, the state
//! machine behind the search screen, and its render model.
//!
//! # Design
//! - `NewsClient` is stateless; it holds the base URL and the API key from
//!   an injected `NewsConfig`.
//! - `build_*` produces requests and `parse_articles` consumes responses, so
//!   the I/O boundary is explicit. `NewsService` joins them over a
//!   `Transport` for Rust callers.
//! - `Screen` hands out `PendingFetch` values tagged with a `RequestToken`
//!   and ignores outcomes for anything but the latest token.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod screen;
pub mod service;
pub mod transport;
pub mod types;
pub mod view;

pub use client::{Endpoint, NewsClient};
pub use config::NewsConfig;
pub use error::{ApiError, ConfigError, FetchErrorKind};
pub use http::{HttpRequest, HttpResponse};
pub use params::QueryParams;
pub use screen::{Completion, FetchOrigin, PendingFetch, RequestToken, Screen, ScreenStatus};
pub use service::NewsService;
pub use transport::{Transport, UreqTransport};
pub use types::{Article, ProviderResponse, Source};
pub use view::{ArticleRow, ScreenView};
