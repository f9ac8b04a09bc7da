use std::collections::HashMap;
use std::fmt;

use crate::http::request::{Method, Request};

/// Largest header block accepted before giving up on finding its terminator.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Largest request body the reader will buffer.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed to frame the request
    Incomplete,
    InvalidRequestLine,
    InvalidHeader,
    InvalidContentLength,
    HeadTooLarge,
    BodyTooLarge,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::Incomplete => "incomplete request",
            ParseError::InvalidRequestLine => "invalid request line",
            ParseError::InvalidHeader => "invalid header line",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::HeadTooLarge => "header block too large",
            ParseError::BodyTooLarge => "request body too large",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Frames and parses one request from the start of `buf`.
///
/// Returns the request together with the number of bytes it occupied, or
/// `ParseError::Incomplete` while either the header terminator or the
/// declared body has not fully arrived yet.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(pos) => pos,
        None if buf.len() > MAX_HEAD_SIZE => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    let head = std::str::from_utf8(&buf[..headers_end])
        .map_err(|_| ParseError::InvalidRequestLine)?;
    let body_bytes = &buf[headers_end + HEAD_TERMINATOR.len()..];

    let mut lines = head.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
    let (method, target, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in lines {
        let (key, value) = line
            .split_once(": ")
            .ok_or(ParseError::InvalidHeader)?;
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }
        headers.insert(key.to_string(), value.to_string());
    }

    let content_length = headers
        .get("Content-Length")
        .map(|v| parse_content_length(v))
        .transpose()?
        .unwrap_or(0);

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method: Method::from_token(method),
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    let total_consumed = headers_end + HEAD_TERMINATOR.len() + content_length;
    Ok((request, total_consumed))
}

/// `METHOD SP request-target SP HTTP-version`, nothing more, nothing less.
fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine);
    };

    if method.is_empty() || target.is_empty() || !is_http_version(version) {
        return Err(ParseError::InvalidRequestLine);
    }
    // The version is echoed on the status line
    if line.chars().any(|c| c.is_control()) {
        return Err(ParseError::InvalidRequestLine);
    }

    Ok((method, target, version))
}

/// `HTTP/<digit>.<digit>`
fn is_http_version(token: &str) -> bool {
    match token.strip_prefix("HTTP/").map(str::as_bytes) {
        Some([major, b'.', minor]) => major.is_ascii_digit() && minor.is_ascii_digit(),
        _ => false,
    }
}

/// ASCII digits only, capped at [`MAX_BODY_SIZE`].
pub fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidContentLength);
    }
    let len = value
        .parse::<usize>()
        .map_err(|_| ParseError::BodyTooLarge)?;
    if len > MAX_BODY_SIZE {
        return Err(ParseError::BodyTooLarge);
    }
    Ok(len)
}

/// Position of the `\r\n\r\n` that ends the header block.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn request_line_needs_three_tokens() {
        assert_eq!(parse_request_line("GET /"), Err(ParseError::InvalidRequestLine));
        assert_eq!(
            parse_request_line("GET / HTTP/1.1 extra"),
            Err(ParseError::InvalidRequestLine)
        );
        assert_eq!(parse_request_line("GET  HTTP/1.1"), Err(ParseError::InvalidRequestLine));
        assert_eq!(parse_request_line("GET / FTP/1.0"), Err(ParseError::InvalidRequestLine));
        assert_eq!(parse_request_line("GET / HTTP/11"), Err(ParseError::InvalidRequestLine));
        assert_eq!(
            parse_request_line("GET / HTTP/1.1\nSet-Cookie:x=1"),
            Err(ParseError::InvalidRequestLine)
        );
        assert_eq!(
            parse_request_line("HEAD /x HTTP/1.0"),
            Ok(("HEAD", "/x", "HTTP/1.0"))
        );
    }

    #[test]
    fn content_length_digits_only() {
        assert_eq!(parse_content_length("42"), Ok(42));
        assert_eq!(parse_content_length("0"), Ok(0));
        assert_eq!(parse_content_length("+2"), Err(ParseError::InvalidContentLength));
        assert_eq!(parse_content_length(" 2"), Err(ParseError::InvalidContentLength));
        assert_eq!(parse_content_length("-1"), Err(ParseError::InvalidContentLength));
        assert_eq!(parse_content_length(""), Err(ParseError::InvalidContentLength));
        assert_eq!(
            parse_content_length("1000000000000"),
            Err(ParseError::BodyTooLarge)
        );
        assert_eq!(
            parse_content_length("99999999999999999999999999"),
            Err(ParseError::BodyTooLarge)
        );
    }

    #[test]
    fn oversized_head_without_terminator() {
        let buf = vec![b'a'; MAX_HEAD_SIZE + 1];
        assert_eq!(parse_http_request(&buf).unwrap_err(), ParseError::HeadTooLarge);
    }
}
