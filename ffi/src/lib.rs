//! C-ABI wrapper around `news-core`.
//!
//! # Overview
//! Exposes the news client and the search screen through `extern "C"`
//! functions so a mobile host can drive the screen and execute HTTP itself,
//! without linking to an async runtime or serde.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `news_build_*` / `news_parse_articles` mirror the core client 1:1.
//! - A screen handle hands out requests tagged with a token; the host
//!   reports back with `news_screen_complete` (got a response) or
//!   `news_screen_fail_transport` (got no response).
//! - The C caller owns all returned pointers and must call the matching
//!   `news_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use news_core::{ApiError, NewsClient, NewsConfig, PendingFetch, RequestToken, Screen};
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`
/// (default `info`). Returns false if a subscriber was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn news_init_logging() -> bool {
    catch_unwind(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

fn client_handle(config: &NewsConfig) -> *mut FfiNewsClient {
    match NewsClient::new(config) {
        Ok(inner) => Box::into_raw(Box::new(FfiNewsClient { inner })),
        Err(e) => {
            tracing::error!(error = %e, "cannot create news client");
            std::ptr::null_mut()
        }
    }
}

/// Create a `NewsClient` for `base_url` and `api_key`.
///
/// Returns null if either argument is null, if `base_url` is not an absolute
/// URL, or if an internal panic occurs. The caller must free the returned
/// pointer with `news_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn news_client_new(
    base_url: *const c_char,
    api_key: *const c_char,
) -> *mut FfiNewsClient {
    catch_unwind(|| {
        let (Some(base_url), Some(api_key)) = (read_c_str(base_url), read_c_str(api_key)) else {
            return std::ptr::null_mut();
        };
        client_handle(&NewsConfig::new(base_url, api_key))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a `NewsClient` from `NEWS_API_BASE_URL` / `NEWS_API_KEY` (and a
/// `.env` file in the working directory, if present).
///
/// Returns null when the key is missing or the base URL is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn news_client_from_env() -> *mut FfiNewsClient {
    catch_unwind(|| match NewsConfig::from_env() {
        Ok(config) => client_handle(&config),
        Err(e) => {
            tracing::error!(error = %e, "cannot read news configuration");
            std::ptr::null_mut()
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `news_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_client_free(client: *mut FfiNewsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

fn build_request(
    client: *const FfiNewsClient,
    params: *const FfiParam,
    params_len: u32,
    endpoint: news_core::Endpoint,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(params) = read_params(params, params_len) else {
            return std::ptr::null_mut();
        };
        FfiHttpRequest::from_core(client.inner.build(endpoint, &params))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a `top-headlines` request.
///
/// `params` points to `params_len` key/value pairs (may be null when
/// `params_len` is 0). A caller-supplied `apiKey` is ignored. Returns null if
/// `client` is null or any key/value is null. Free the result with
/// `news_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn news_build_top_headlines(
    client: *const FfiNewsClient,
    params: *const FfiParam,
    params_len: u32,
) -> *mut FfiHttpRequest {
    build_request(client, params, params_len, news_core::Endpoint::TopHeadlines)
}

/// Build an `everything` request. Same contract as
/// `news_build_top_headlines`.
#[unsafe(no_mangle)]
pub extern "C" fn news_build_everything(
    client: *const FfiNewsClient,
    params: *const FfiParam,
    params_len: u32,
) -> *mut FfiHttpRequest {
    build_request(client, params, params_len, news_core::Endpoint::Everything)
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Parse a response from either endpoint.
///
/// Returns a result with a non-null `articles` list on success. Free it with
/// `news_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn news_parse_articles(
    client: *const FfiNewsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiNewsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiNewsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiNewsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_articles(resp.to_core()) {
            Ok(articles) => FfiNewsResult::ok_articles(articles),
            Err(e) => FfiNewsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiNewsResult::panic("panic in news_parse_articles"))
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Create a search screen that builds requests with `client`. The screen
/// keeps its own copy of the client; `client` may be freed afterwards.
///
/// Returns null if `client` is null. Free with `news_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_new(client: *const FfiNewsClient) -> *mut FfiNewsScreen {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        Box::into_raw(Box::new(FfiNewsScreen {
            screen: Screen::new(),
            client: client.inner.clone(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `news_screen_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_free(screen: *mut FfiNewsScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(screen) });
        }));
    }
}

/// Turn a pending fetch into a request and report its token.
fn issue(handle: &FfiNewsScreen, pending: PendingFetch, out_token: *mut u64) -> *mut FfiHttpRequest {
    if !out_token.is_null() {
        unsafe { *out_token = pending.token.get() };
    }
    FfiHttpRequest::from_core(handle.client.build(pending.endpoint, &pending.params))
}

/// Start loading the default technology headlines.
///
/// Writes the request token to `out_token` (if non-null) and returns the
/// request to execute. Returns null if `screen` is null.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_mount(
    screen: *mut FfiNewsScreen,
    out_token: *mut u64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &mut *screen };
        let pending = handle.screen.mount();
        issue(handle, pending, out_token)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Replace the search text. A null `text` clears it. Returns false if
/// `screen` is null.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_set_query(screen: *mut FfiNewsScreen, text: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return false;
        }
        let handle = unsafe { &mut *screen };
        handle.screen.set_query(read_c_str(text).unwrap_or_default());
        true
    }))
    .unwrap_or(false)
}

/// Submit the current search text.
///
/// Returns the request to execute and writes its token to `out_token`. Returns
/// null without issuing anything when the text is blank (the view then
/// carries the error banner) or when `screen` is null.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_search(
    screen: *mut FfiNewsScreen,
    out_token: *mut u64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &mut *screen };
        match handle.screen.submit_search() {
            Some(pending) => issue(handle, pending, out_token),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Report the HTTP response received for the request issued with `token`.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_complete(
    screen: *mut FfiNewsScreen,
    token: u64,
    response: *const FfiHttpResponse,
) -> FfiCompletion {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || response.is_null() {
            return FfiCompletion::NullArg;
        }
        let handle = unsafe { &mut *screen };
        let resp = unsafe { &*response };
        let outcome = handle.client.parse_articles(resp.to_core());
        handle.screen.complete(RequestToken::new(token), outcome).into()
    }))
    .unwrap_or(FfiCompletion::Panic)
}

/// Report that the request issued with `token` produced no response
/// (network down, timeout, TLS failure). `message` is logged and may be null.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_fail_transport(
    screen: *mut FfiNewsScreen,
    token: u64,
    message: *const c_char,
) -> FfiCompletion {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return FfiCompletion::NullArg;
        }
        let handle = unsafe { &mut *screen };
        let message = read_c_str(message).unwrap_or_else(|| "unknown transport failure".to_string());
        tracing::error!(token, error = %message, "host reported transport failure");
        handle
            .screen
            .complete(RequestToken::new(token), Err(ApiError::Transport(message)))
            .into()
    }))
    .unwrap_or(FfiCompletion::Panic)
}

/// Snapshot the screen for rendering. Returns null if `screen` is null.
/// Free with `news_free_view`.
#[unsafe(no_mangle)]
pub extern "C" fn news_screen_view(screen: *const FfiNewsScreen) -> *mut FfiScreenView {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &*screen };
        FfiScreenView::from_core(handle.screen.view())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `news_build_*` or `news_screen_*`
/// function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_free_request(req: *mut FfiHttpRequest) {
    if !req.is_null() {
        let _ = catch_unwind(|| FfiHttpRequest::free(req));
    }
}

/// Free a result returned by `news_parse_articles`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_free_result(result: *mut FfiNewsResult) {
    if !result.is_null() {
        let _ = catch_unwind(|| FfiNewsResult::free(result));
    }
}

/// Free a view returned by `news_screen_view`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_free_view(view: *mut FfiScreenView) {
    if !view.is_null() {
        let _ = catch_unwind(|| FfiScreenView::free(view));
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn news_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    const ONE_ARTICLE: &str = r#"{"status":"ok","totalResults":1,"articles":[{"source":{"id":null,"name":"CoinDesk"},"author":"Staff","title":"Halving","description":null,"url":"https://www.coindesk.com/halving","urlToImage":"https://www.coindesk.com/halving.png","publishedAt":"2024-04-18T20:45:00Z","content":null}]}"#;

    fn new_client() -> *mut FfiNewsClient {
        let url = CString::new("http://localhost:3000").unwrap();
        let key = CString::new("ffi-key").unwrap();
        news_client_new(url.as_ptr(), key.as_ptr())
    }

    fn str_at(p: *const c_char) -> String {
        unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_string()
    }

    fn request_url(req: *mut FfiHttpRequest) -> String {
        assert!(!req.is_null());
        str_at(unsafe { &*req }.url)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        news_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let key = CString::new("k").unwrap();
        assert!(news_client_new(std::ptr::null(), key.as_ptr()).is_null());
        let url = CString::new("http://localhost:3000").unwrap();
        assert!(news_client_new(url.as_ptr(), std::ptr::null()).is_null());
    }

    #[test]
    fn client_new_invalid_url_returns_null() {
        let url = CString::new("not a url").unwrap();
        let key = CString::new("k").unwrap();
        assert!(news_client_new(url.as_ptr(), key.as_ptr()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        news_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_top_headlines_returns_correct_request() {
        let client = new_client();
        let key = CString::new("q").unwrap();
        let value = CString::new("technology").unwrap();
        let params = [FfiParam {
            key: key.as_ptr(),
            value: value.as_ptr(),
        }];
        let req = news_build_top_headlines(client, params.as_ptr(), 1);
        assert_eq!(
            request_url(req),
            "http://localhost:3000/top-headlines?apiKey=ffi-key&q=technology"
        );

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(str_at(header.key), "accept");
        assert_eq!(str_at(header.value), "application/json");

        news_free_request(req);
        news_client_free(client);
    }

    #[test]
    fn build_everything_without_params() {
        let client = new_client();
        let req = news_build_everything(client, std::ptr::null(), 0);
        assert_eq!(request_url(req), "http://localhost:3000/everything?apiKey=ffi-key");
        news_free_request(req);
        news_client_free(client);
    }

    #[test]
    fn build_with_null_param_value_returns_null() {
        let client = new_client();
        let key = CString::new("q").unwrap();
        let params = [FfiParam {
            key: key.as_ptr(),
            value: std::ptr::null(),
        }];
        assert!(news_build_everything(client, params.as_ptr(), 1).is_null());
        assert!(news_build_everything(client, std::ptr::null(), 2).is_null());
        news_client_free(client);
    }

    #[test]
    fn build_null_client_returns_null() {
        assert!(news_build_top_headlines(std::ptr::null(), std::ptr::null(), 0).is_null());
    }

    #[test]
    fn parse_articles_success() {
        let client = new_client();
        let body = CString::new(ONE_ARTICLE).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = news_parse_articles(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.error_kind, FfiFetchErrorKind::None);
        assert!(r.error_message.is_null());

        let list = unsafe { &*r.articles };
        assert_eq!(list.len, 1);
        let article = unsafe { &*list.items };
        assert_eq!(str_at(article.title), "Halving");
        assert_eq!(str_at(article.source_name), "CoinDesk");
        assert!(article.source_id.is_null());
        assert!(article.description.is_null());
        assert_eq!(str_at(article.image_url), "https://www.coindesk.com/halving.png");

        news_free_result(result);
        news_client_free(client);
    }

    #[test]
    fn parse_articles_empty_list_is_not_null() {
        let client = new_client();
        let body = CString::new(r#"{"status":"ok","totalResults":0,"articles":[]}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = news_parse_articles(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        let list = unsafe { &*r.articles };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());

        news_free_result(result);
        news_client_free(client);
    }

    #[test]
    fn parse_articles_provider_error() {
        let client = new_client();
        let body = CString::new(r#"{"status":"error","code":"unexpectedError"}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = news_parse_articles(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Provider);
        assert_eq!(r.error_kind, FfiFetchErrorKind::Provider);
        assert!(r.articles.is_null());
        assert!(str_at(r.error_message).contains("unexpectedError"));

        news_free_result(result);
        news_client_free(client);
    }

    #[test]
    fn parse_articles_http_error() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 503,
            body: std::ptr::null(),
        };
        let result = news_parse_articles(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.error_kind, FfiFetchErrorKind::Transport);
        assert_eq!(r.http_status, 503);

        news_free_result(result);
        news_client_free(client);
    }

    #[test]
    fn parse_articles_null_response() {
        let client = new_client();
        let result = news_parse_articles(client, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);

        news_free_result(result);
        news_client_free(client);
    }

    #[test]
    fn screen_mount_and_complete() {
        let client = new_client();
        let screen = news_screen_new(client);
        news_client_free(client);

        let mut token = 0u64;
        let req = news_screen_mount(screen, &mut token);
        assert_eq!(
            request_url(req),
            "http://localhost:3000/top-headlines?apiKey=ffi-key&q=technology"
        );
        assert_eq!(token, 1);
        news_free_request(req);

        let view = news_screen_view(screen);
        assert!(unsafe { &*view }.show_spinner);
        news_free_view(view);

        let body = CString::new(ONE_ARTICLE).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        assert_eq!(news_screen_complete(screen, token, &resp), FfiCompletion::Applied);

        let view = news_screen_view(screen);
        let v = unsafe { &*view };
        assert!(!v.show_spinner);
        assert!(v.error_banner.is_null());
        assert!(v.empty_message.is_null());
        assert_eq!(v.rows_len, 1);
        let row = unsafe { &*v.rows };
        assert_eq!(str_at(row.key), "Halving-0");
        assert_eq!(str_at(v.placeholder), "Search for news...");
        news_free_view(view);

        news_screen_free(screen);
    }

    #[test]
    fn screen_blank_search_returns_null_and_sets_banner() {
        let client = new_client();
        let screen = news_screen_new(client);
        let blank = CString::new("   ").unwrap();
        assert!(news_screen_set_query(screen, blank.as_ptr()));

        let mut token = 0u64;
        assert!(news_screen_search(screen, &mut token).is_null());
        assert_eq!(token, 0);

        let view = news_screen_view(screen);
        let v = unsafe { &*view };
        assert_eq!(str_at(v.error_banner), "Please enter a search term.");
        assert_eq!(str_at(v.query), "   ");
        assert_eq!(str_at(v.empty_message), "No articles found.");
        news_free_view(view);

        news_screen_free(screen);
        news_client_free(client);
    }

    #[test]
    fn screen_search_transport_failure_and_stale_token() {
        let client = new_client();
        let screen = news_screen_new(client);
        let query = CString::new("bitcoin").unwrap();
        news_screen_set_query(screen, query.as_ptr());

        let mut first = 0u64;
        let req = news_screen_search(screen, &mut first);
        assert_eq!(
            request_url(req),
            "http://localhost:3000/everything?apiKey=ffi-key&q=bitcoin"
        );
        news_free_request(req);

        let mut second = 0u64;
        news_free_request(news_screen_search(screen, &mut second));
        assert!(second > first);

        let msg = CString::new("offline").unwrap();
        assert_eq!(
            news_screen_fail_transport(screen, first, msg.as_ptr()),
            FfiCompletion::Stale
        );
        assert_eq!(
            news_screen_fail_transport(screen, second, std::ptr::null()),
            FfiCompletion::Applied
        );

        let view = news_screen_view(screen);
        let v = unsafe { &*view };
        assert!(!v.show_spinner);
        assert_eq!(str_at(v.error_banner), "Failed to fetch news. Please try again.");
        news_free_view(view);

        news_screen_free(screen);
        news_client_free(client);
    }

    #[test]
    fn screen_null_arguments() {
        assert!(news_screen_new(std::ptr::null()).is_null());
        assert!(news_screen_mount(std::ptr::null_mut(), std::ptr::null_mut()).is_null());
        assert!(!news_screen_set_query(std::ptr::null_mut(), std::ptr::null()));
        assert_eq!(
            news_screen_complete(std::ptr::null_mut(), 1, std::ptr::null()),
            FfiCompletion::NullArg
        );
        assert!(news_screen_view(std::ptr::null()).is_null());
        news_screen_free(std::ptr::null_mut());
    }

    #[test]
    fn free_null_is_safe() {
        news_free_request(std::ptr::null_mut());
        news_free_result(std::ptr::null_mut());
        news_free_view(std::ptr::null_mut());
        news_free_string(std::ptr::null_mut());
    }
}
