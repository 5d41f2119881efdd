//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `NewsClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; the
//! host (a mobile app through the FFI, or `UreqTransport` in Rust) performs
//! the round-trip. Every provider call is a GET, so a request is fully
//! described by its URL and headers.
//!
//! All fields use owned types so values can cross the FFI boundary without
//! lifetime concerns.

/// An HTTP GET request described as plain data.
///
/// `url` already carries the encoded query string, including the API key,
/// so avoid logging it verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &redact_api_key(&self.url))
            .field("headers", &self.headers)
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// `NewsClient::parse_articles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Replace the value of the `apiKey` query parameter with `***`.
pub fn redact_api_key(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == crate::params::API_KEY_PARAM {
                        "***".to_string()
                    } else {
                        v.into_owned()
                    };
                    (k.into_owned(), v)
                })
                .collect();
            if pairs.is_empty() {
                return parsed.into();
            }
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
            parsed.into()
        }
        Err(_) => raw.to_string(),
    }
}
