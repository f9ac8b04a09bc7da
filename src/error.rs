//! Failure kinds produced while answering a single request.
//!
//! Each resolution step (reading, path resolution, file retrieval) returns a
//! `ServeError`; the connection handler turns it into a status code in one
//! place via [`ServeError::status`].

use std::fmt;
use std::io;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum ServeError {
    /// Request line or headers could not be parsed
    MalformedRequest(ParseError),
    /// Peer went away before a complete request arrived
    ConnectionClosed,
    /// Method other than GET or HEAD
    MethodNotAllowed(String),
    /// Request-target climbs above the serving root
    PathTraversal,
    /// Missing file, or a directory where a file was expected
    NotFound,
    PermissionDenied,
    /// Extension absent from the fixed content-type table
    UnknownMimeType(String),
    Io(io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest(_) | ServeError::ConnectionClosed => {
                StatusCode::BadRequest
            }
            ServeError::MethodNotAllowed(_) => StatusCode::MethodNotAllowed,
            ServeError::PathTraversal | ServeError::PermissionDenied => StatusCode::Forbidden,
            ServeError::NotFound => StatusCode::NotFound,
            ServeError::UnknownMimeType(_) | ServeError::Io(_) => {
                StatusCode::InternalServerError
            }
        }
    }

    /// Classifies a filesystem error.
    pub fn from_fs(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::IsADirectory => ServeError::NotFound,
            io::ErrorKind::PermissionDenied => ServeError::PermissionDenied,
            _ => ServeError::Io(err),
        }
    }

    /// Classifies an error raised while reading the request off the socket.
    pub fn from_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe => ServeError::ConnectionClosed,
            _ => ServeError::Io(err),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::MalformedRequest(e) => write!(f, "malformed request: {e}"),
            ServeError::ConnectionClosed => f.write_str("connection closed before request completed"),
            ServeError::MethodNotAllowed(m) => write!(f, "method {m} not allowed"),
            ServeError::PathTraversal => f.write_str("path escapes the serving root"),
            ServeError::NotFound => f.write_str("file not found"),
            ServeError::PermissionDenied => f.write_str("permission denied"),
            ServeError::UnknownMimeType(ext) => write!(f, "no content type for extension {ext:?}"),
            ServeError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::MalformedRequest(e) => Some(e),
            ServeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ServeError {
    fn from(err: ParseError) -> Self {
        ServeError::MalformedRequest(err)
    }
}
