use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET and HEAD are served; anything else is kept verbatim so the
/// connection handler can answer 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// Any other method token, as received
    Other(String),
}

impl Method {
    /// Maps a method token to a `Method`. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Other("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::Other(token) => token,
        }
    }

    /// Whether this server answers the method with file contents.
    pub fn is_served(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

/// A fully framed HTTP request read from one connection.
///
/// Built once by the request reader and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw request-target, still percent-encoded and possibly carrying a query
    pub target: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// Header names are kept exactly as received
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }
}
