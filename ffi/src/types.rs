//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String` (null for `None`), boxed slices
//! instead of `Vec`, and enums with explicit discriminants. Conversion and
//! release helpers live here to keep `lib.rs` focused on the `extern "C"`
//! surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use news_core::{
    ApiError, Article, ArticleRow, Completion, FetchErrorKind, HttpRequest, NewsClient,
    QueryParams, Screen, ScreenView,
};

/// Opaque handle to a `NewsClient`.
pub struct FfiNewsClient {
    pub(crate) inner: NewsClient,
}

/// Opaque handle to a search screen and the client it builds requests with.
pub struct FfiNewsScreen {
    pub(crate) screen: Screen,
    pub(crate) client: NewsClient,
}

// ---------------------------------------------------------------------------
// String and array helpers
// ---------------------------------------------------------------------------

/// Move `s` into a C string owned by the caller. Interior NULs are dropped.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut s: String = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

pub(crate) fn c_string_opt(s: Option<String>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), c_string)
}

/// Release a string produced by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Copy a caller-owned C string. Invalid UTF-8 is replaced, null is `None`.
pub(crate) fn read_c_str(s: *const c_char) -> Option<String> {
    if s.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned())
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
pub(crate) fn into_raw_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

/// Take back a slice produced by `into_raw_slice`.
pub(crate) fn from_raw_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One caller-supplied query parameter. Both strings stay owned by the
/// caller.
#[repr(C)]
pub struct FfiParam {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// Copy `len` parameters starting at `params`. Returns `None` when the
/// array or any key/value in it is null.
pub(crate) fn read_params(params: *const FfiParam, len: u32) -> Option<QueryParams> {
    if len == 0 {
        return Some(QueryParams::new());
    }
    if params.is_null() {
        return None;
    }
    let raw = unsafe { std::slice::from_raw_parts(params, len as usize) };
    raw.iter()
        .map(|p| Some((read_c_str(p.key)?, read_c_str(p.value)?)))
        .collect::<Option<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP GET request described as C-compatible plain data.
///
/// The C caller executes the request and passes the response back through
/// `news_parse_articles` or `news_screen_complete`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_slice(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            url: c_string(req.url),
            headers,
            headers_len,
        }))
    }

    pub(crate) fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        for header in from_raw_slice(req.headers, req.headers_len) {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request. The
/// FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> news_core::HttpResponse {
        news_core::HttpResponse {
            status: self.status,
            headers: Vec::new(),
            body: read_c_str(self.body).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiNewsResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Provider = 3,
    Deserialization = 4,
    InvalidArgument = 5,
    Panic = 6,
    NullArg = 7,
}

/// The two failure kinds a screen distinguishes, or `None` on success and
/// for argument errors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFetchErrorKind {
    None = 0,
    Transport = 1,
    Provider = 2,
}

impl From<FetchErrorKind> for FfiFetchErrorKind {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::Transport => FfiFetchErrorKind::Transport,
            FetchErrorKind::Provider => FfiFetchErrorKind::Provider,
        }
    }
}

/// A single article exposed to C. Optional fields are null when absent.
#[repr(C)]
pub struct FfiArticle {
    pub source_id: *mut c_char,
    pub source_name: *mut c_char,
    pub author: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub url: *mut c_char,
    pub image_url: *mut c_char,
    pub published_at: *mut c_char,
    pub content: *mut c_char,
}

impl FfiArticle {
    fn from_core(a: Article) -> Self {
        FfiArticle {
            source_id: c_string_opt(a.source.id),
            source_name: c_string(a.source.name),
            author: c_string_opt(a.author),
            title: c_string(a.title),
            description: c_string_opt(a.description),
            url: c_string(a.url),
            image_url: c_string_opt(a.image_url),
            published_at: c_string(a.published_at),
            content: c_string_opt(a.content),
        }
    }

    fn free_fields(&self) {
        for s in [
            self.source_id,
            self.source_name,
            self.author,
            self.title,
            self.description,
            self.url,
            self.image_url,
            self.published_at,
            self.content,
        ] {
            free_c_string(s);
        }
    }
}

/// A list of articles exposed to C.
#[repr(C)]
pub struct FfiArticleList {
    pub items: *mut FfiArticle,
    pub len: u32,
}

/// Result envelope for parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `articles`
/// points to the (possibly empty) list. On failure `error_code` describes
/// the category, `error_message` is a human-readable C string, and
/// `articles` is null.
#[repr(C)]
pub struct FfiNewsResult {
    pub error_code: FfiErrorCode,
    pub error_kind: FfiFetchErrorKind,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub articles: *mut FfiArticleList,
}

impl FfiNewsResult {
    /// Build a success result carrying an `FfiArticleList`.
    pub(crate) fn ok_articles(articles: Vec<Article>) -> *mut Self {
        let items: Vec<FfiArticle> = articles.into_iter().map(FfiArticle::from_core).collect();
        let (items, len) = into_raw_slice(items);
        let list = Box::new(FfiArticleList { items, len });
        Box::into_raw(Box::new(FfiNewsResult {
            error_code: FfiErrorCode::Ok,
            error_kind: FfiFetchErrorKind::None,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            articles: Box::into_raw(list),
        }))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Provider { .. } => (FfiErrorCode::Provider, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::InvalidBaseUrl { .. } => (FfiErrorCode::InvalidArgument, 0),
        };
        Box::into_raw(Box::new(FfiNewsResult {
            error_code,
            error_kind: err.kind().into(),
            error_message: c_string(err.to_string()),
            http_status,
            articles: std::ptr::null_mut(),
        }))
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiNewsResult {
            error_code,
            error_kind: FfiFetchErrorKind::None,
            error_message: c_string(msg),
            http_status: 0,
            articles: std::ptr::null_mut(),
        }))
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    pub(crate) fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.articles.is_null() {
            let list = unsafe { Box::from_raw(result.articles) };
            for article in from_raw_slice(list.items, list.len) {
                article.free_fields();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Screen types
// ---------------------------------------------------------------------------

/// Outcome of reporting a fetch result to a screen.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCompletion {
    Applied = 0,
    /// The token was superseded; the screen did not change.
    Stale = 1,
    NullArg = 2,
    Panic = 3,
}

impl From<Completion> for FfiCompletion {
    fn from(c: Completion) -> Self {
        match c {
            Completion::Applied => FfiCompletion::Applied,
            Completion::Stale => FfiCompletion::Stale,
        }
    }
}

/// One list row of the screen.
#[repr(C)]
pub struct FfiArticleRow {
    pub key: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub image_url: *mut c_char,
}

/// Everything the host needs to draw the screen. Nullable strings are null
/// when the element is hidden.
#[repr(C)]
pub struct FfiScreenView {
    pub query: *mut c_char,
    pub placeholder: *mut c_char,
    pub show_spinner: bool,
    pub error_banner: *mut c_char,
    pub empty_message: *mut c_char,
    pub rows: *mut FfiArticleRow,
    pub rows_len: u32,
}

impl FfiScreenView {
    pub(crate) fn from_core(view: ScreenView) -> *mut Self {
        let rows: Vec<FfiArticleRow> = view
            .rows
            .into_iter()
            .map(|r: ArticleRow| FfiArticleRow {
                key: c_string(r.key),
                title: c_string(r.title),
                description: c_string_opt(r.description),
                image_url: c_string_opt(r.image_url),
            })
            .collect();
        let (rows, rows_len) = into_raw_slice(rows);
        Box::into_raw(Box::new(FfiScreenView {
            query: c_string(view.query),
            placeholder: c_string(view.placeholder),
            show_spinner: view.show_spinner,
            error_banner: c_string_opt(view.error_banner),
            empty_message: c_string_opt(view.empty_message.map(str::to_string)),
            rows,
            rows_len,
        }))
    }

    pub(crate) fn free(view: *mut Self) {
        let view = unsafe { Box::from_raw(view) };
        free_c_string(view.query);
        free_c_string(view.placeholder);
        free_c_string(view.error_banner);
        free_c_string(view.empty_message);
        for row in from_raw_slice(view.rows, view.rows_len) {
            free_c_string(row.key);
            free_c_string(row.title);
            free_c_string(row.description);
            free_c_string(row.image_url);
        }
    }
}
