use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, Local};

use crate::error::ServeError;
use crate::files::path::ResolvedPath;
use crate::http::mime::MimePolicy;

/// `Date` header layout: the file's last-modified day.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// What the filesystem says about one file at response time.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub modified: SystemTime,
    pub size: u64,
    pub content_type: String,
    /// Full contents, present only when the body was asked for
    pub body: Option<Bytes>,
}

impl FileInfo {
    /// Reads metadata for `path` and, when `include_body` is set, its bytes.
    ///
    /// The file is opened in both cases so GET and HEAD agree about
    /// permissions; only GET pays for reading the contents.
    pub fn retrieve(
        path: &ResolvedPath,
        include_body: bool,
        policy: MimePolicy,
    ) -> Result<Self, ServeError> {
        let mut file = File::open(path).map_err(ServeError::from_fs)?;
        let meta = file.metadata().map_err(ServeError::from_fs)?;
        if meta.is_dir() {
            return Err(ServeError::NotFound);
        }

        let content_type = policy.resolve(path.as_path())?;
        let modified = meta.modified().map_err(ServeError::Io)?;

        let (size, body) = if include_body {
            let mut buf = Vec::with_capacity(meta.len() as usize);
            file.read_to_end(&mut buf).map_err(ServeError::from_fs)?;
            (buf.len() as u64, Some(Bytes::from(buf)))
        } else {
            (meta.len(), None)
        };

        Ok(Self {
            modified,
            size,
            content_type,
            body,
        })
    }

    pub fn last_modified(&self) -> String {
        DateTime::<Local>::from(self.modified)
            .format(DATE_FORMAT)
            .to_string()
    }

    /// `Date`, `Content-Length` and `Content-Type` for the response.
    pub fn headers(&self) -> HashMap<String, String> {
        HashMap::from([
            ("Date".to_string(), self.last_modified()),
            ("Content-Length".to_string(), self.size.to_string()),
            ("Content-Type".to_string(), self.content_type.clone()),
        ])
    }

    /// Splits into response headers and body (empty for HEAD).
    pub fn into_parts(self) -> (HashMap<String, String>, Bytes) {
        let headers = self.headers();
        (headers, self.body.unwrap_or_default())
    }
}
