use std::collections::HashMap;

use bytes::Bytes;

/// Version token used when no request could be parsed.
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

/// HTTP status codes this server produces.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Malformed or truncated request
/// - `Forbidden` (403): Path escapes the root, or the OS refused access
/// - `NotFound` (404): No such file
/// - `MethodNotAllowed` (405): Method other than GET/HEAD
/// - `InternalServerError` (500): Anything unanticipated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
#[derive(Debug, Clone)]
pub struct Response {
    pub version: String,
    pub status: StatusCode,
    /// Mnemonic sent on the status line
    pub reason: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl Response {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Adds each baseline header the response does not already carry.
    pub fn with_baseline_headers<'a, I>(mut self, baseline: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in baseline {
            self.headers
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
        self
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .version("HTTP/1.0")
///     .header("Content-Type", "text/html")
///     .body(Bytes::from_static(b"<html></html>"))
///     .build();
/// ```
pub struct ResponseBuilder {
    version: String,
    status: StatusCode,
    reason: Option<String>,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            status,
            reason: None,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Overrides the status-line mnemonic. Control characters are replaced
    /// with spaces so the status line cannot be split.
    pub fn reason(mut self, reason: impl AsRef<str>) -> Self {
        let cleaned = reason
            .as_ref()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        self.reason = Some(cleaned);
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length matching the body unless one was set already
    /// (HEAD responses carry the file size with an empty body).
    pub fn build(mut self) -> Response {
        let body_len = self.body.len();
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| body_len.to_string());

        Response {
            version: self.version,
            status: self.status,
            reason: self
                .reason
                .unwrap_or_else(|| self.status.reason_phrase().to_string()),
            headers: self.headers,
            body: self.body,
        }
    }
}
