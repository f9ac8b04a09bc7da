use std::io::{self, Read};

use bytes::BytesMut;

use crate::error::ServeError;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;

/// Size of each blocking read off the socket.
pub const CHUNK_SIZE: usize = 1024;

/// Accumulates bytes from a blocking stream until one complete request
/// (header block plus any declared body) has been framed.
pub struct RequestReader<'a, S> {
    stream: &'a mut S,
    buffer: BytesMut,
}

impl<'a, S: Read> RequestReader<'a, S> {
    pub fn new(stream: &'a mut S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(CHUNK_SIZE * 4),
        }
    }

    pub fn read_request(&mut self) -> Result<Request, ServeError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, _consumed)) => return Ok(request),
                Err(ParseError::Incomplete) => {}
                Err(e) => return Err(e.into()),
            }

            if self.fill()? == 0 {
                return Err(ServeError::ConnectionClosed);
            }
        }
    }

    /// Reads one chunk into the buffer, returning how many bytes arrived.
    fn fill(&mut self) -> Result<usize, ServeError> {
        let mut temp = [0u8; CHUNK_SIZE];
        loop {
            match self.stream.read(&mut temp) {
                Ok(n) => {
                    self.buffer.extend_from_slice(&temp[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ServeError::from_read(e)),
            }
        }
    }
}

/// Reads a single request off `stream`.
pub fn read_request<S: Read>(stream: &mut S) -> Result<Request, ServeError> {
    RequestReader::new(stream).read_request()
}
