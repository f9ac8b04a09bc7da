use std::io::{Read, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::error::ServeError;
use crate::files::{FileInfo, resolve_path};
use crate::http::reader::read_request;
use crate::http::request::{Method, Request};
use crate::http::response::{DEFAULT_VERSION, Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;

pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Methods advertised on 405 responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Handles exactly one request/response exchange on a blocking stream.
///
/// Every response advertises `Connection: keep-alive`, yet the exchange
/// always ends in `Closed` after a single response.
pub struct Connection<S> {
    stream: S,
    config: Arc<Config>,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequest,
    Dispatching(Request),
    BuildingResponse(Request),
    Sending(Response),
    Closed,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            config,
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// Drives the state machine until `Closed`.
    ///
    /// Request failures become error responses; only a failure to write the
    /// response comes back as `Err`, and the state is `Closed` either way.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            self.state = match state {
                ConnectionState::AwaitingRequest => match read_request(&mut self.stream) {
                    Ok(request) => ConnectionState::Dispatching(request),
                    Err(e) => {
                        tracing::debug!(error = %e, "Failed to read request");
                        ConnectionState::Sending(error_response(DEFAULT_VERSION, &e))
                    }
                },

                ConnectionState::Dispatching(request) => {
                    if request.method.is_served() {
                        ConnectionState::BuildingResponse(request)
                    } else {
                        let err = ServeError::MethodNotAllowed(request.method.as_str().to_string());
                        log_request(&request, &err.status());
                        ConnectionState::Sending(error_response(&request.version, &err))
                    }
                }

                ConnectionState::BuildingResponse(request) => {
                    let response = self.serve_file(&request);
                    log_request(&request, &response.status);
                    ConnectionState::Sending(response)
                }

                ConnectionState::Sending(response) => {
                    let response = response.with_baseline_headers(baseline_headers());
                    ResponseWriter::new(&response).write_to_stream(&mut self.stream)?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, ConnectionState::Closed)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn serve_file(&self, request: &Request) -> Response {
        let include_body = request.method == Method::GET;
        let outcome = resolve_path(&request.target, &self.config.root).and_then(|path| {
            FileInfo::retrieve(&path, include_body, self.config.mime_policy)
        });

        match outcome {
            Ok(info) => {
                let (headers, body) = info.into_parts();
                ResponseBuilder::new(StatusCode::Ok)
                    .version(request.version.as_str())
                    .headers(headers)
                    .body(body)
                    .build()
            }
            Err(e) => error_response(&request.version, &e),
        }
    }
}

/// Reads one request from `stream`, answers it, and lets the stream drop.
pub fn handle_connection<S: Read + Write>(stream: S, config: Arc<Config>) -> anyhow::Result<()> {
    let mut conn = Connection::new(stream, config);
    conn.run()
}

/// Headers every response carries unless it already set them.
pub fn baseline_headers() -> [(&'static str, &'static str); 2] {
    [("Connection", "keep-alive"), ("Server", SERVER_NAME)]
}

/// Maps a failure to its response. A 500 uses the failure text as mnemonic.
pub fn error_response(version: &str, err: &ServeError) -> Response {
    let status = err.status();
    let mut builder = ResponseBuilder::new(status).version(version);

    match status {
        StatusCode::InternalServerError => {
            tracing::error!(error = %err, "Internal error while serving request");
            builder = builder.reason(err.to_string());
        }
        StatusCode::MethodNotAllowed => {
            builder = builder.header("Allow", ALLOWED_METHODS);
        }
        _ => {}
    }

    builder.build()
}

fn log_request(request: &Request, status: &StatusCode) {
    tracing::info!(
        method = request.method.as_str(),
        target = %request.target,
        status = status.as_u16(),
        "Request served"
    );
}
