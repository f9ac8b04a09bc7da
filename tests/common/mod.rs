//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A scratch serving root that is removed on drop.
pub struct TempRoot {
    pub path: PathBuf,
}

impl TempRoot {
    pub fn new(tag: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "warden-{}-{}-{}",
            tag,
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let full = self.path.join(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, contents).unwrap();
        full
    }

    pub fn mkdir(&self, rel: &str) {
        std::fs::create_dir_all(self.path.join(rel)).unwrap();
    }

    pub fn root(&self) -> String {
        self.path.to_str().unwrap().to_string()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.path.join(rel)
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// In-memory connection that hands out its input a few bytes at a time.
pub struct MockStream {
    input: Vec<u8>,
    pos: usize,
    fragment: usize,
    pub output: Vec<u8>,
}

impl MockStream {
    pub fn new(input: &[u8]) -> Self {
        Self::fragmented(input, usize::MAX)
    }

    pub fn fragmented(input: &[u8], fragment: usize) -> Self {
        Self {
            input: input.to_vec(),
            pos: 0,
            fragment,
            output: Vec::new(),
        }
    }

    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.input[self.pos..];
        let n = remaining.len().min(buf.len()).min(self.fragment);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A response as a plain HTTP client would see it.
#[derive(Debug)]
pub struct ParsedResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ParsedResponse {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }
}

/// Parses wire bytes, honouring Content-Length for the body.
pub fn parse_response(raw: &[u8]) -> ParsedResponse {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&raw[..end]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap().to_string();
    let status = parts.next().unwrap().parse().unwrap();
    let reason = parts.next().unwrap_or("").to_string();

    let headers: HashMap<String, String> = lines
        .map(|line| {
            let (k, v) = line.split_once(": ").expect("malformed header");
            (k.to_string(), v.to_string())
        })
        .collect();

    let body = raw[end + 4..].to_vec();
    if let Some(len) = headers.get("Content-Length") {
        let len: usize = len.parse().unwrap();
        // HEAD responses declare the file size but carry no body
        assert!(body.len() == len || body.is_empty());
    }

    ParsedResponse {
        version,
        status,
        reason,
        headers,
        body,
    }
}

pub fn file_mtime_day(path: &Path) -> String {
    let modified = std::fs::metadata(path).unwrap().modified().unwrap();
    chrono::DateTime::<chrono::Local>::from(modified)
        .format("%d.%m.%Y")
        .to_string()
}
