//! Content-type resolution from a file's extension.
//!
//! Two policies exist and one is picked per server:
//!
//! - [`MimePolicy::FixedTable`] looks the extension up in a small static
//!   table; an extension missing from it is an error.
//! - [`MimePolicy::Guess`] asks the `mime_guess` database and falls back to
//!   `application/octet-stream`, so it never fails.
//!
//! Either way the extension is the lower-cased text after the last `.` of
//! the final path component. A name without a `.` has no extension.

use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ServeError;

pub const OCTET_STREAM: &str = "application/octet-stream";

const FIXED_TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("xml", "application/xml"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("swf", "application/x-shockwave-flash"),
    ("pdf", "application/pdf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MimePolicy {
    #[default]
    FixedTable,
    Guess,
}

impl MimePolicy {
    pub fn resolve(&self, path: &Path) -> Result<String, ServeError> {
        let ext = extension_of(path);
        match self {
            MimePolicy::FixedTable => {
                let found = ext.as_deref().and_then(lookup_fixed);
                match found {
                    Some(content_type) => Ok(content_type.to_string()),
                    None => Err(ServeError::UnknownMimeType(ext.unwrap_or_default())),
                }
            }
            MimePolicy::Guess => Ok(ext
                .as_deref()
                .and_then(|e| mime_guess::from_ext(e).first_raw())
                .unwrap_or(OCTET_STREAM)
                .to_string()),
        }
    }
}

fn lookup_fixed(ext: &str) -> Option<&'static str> {
    FIXED_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
}

/// Lower-cased text after the last `.` of the file name.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_uses_final_component_only() {
        assert_eq!(extension_of(Path::new("./a.d/readme")), None);
        assert_eq!(extension_of(Path::new("./site/INDEX.HTML")), Some("html".to_string()));
        assert_eq!(extension_of(Path::new("archive.tar.gz")), Some("gz".to_string()));
        assert_eq!(extension_of(Path::new(".bashrc")), Some("bashrc".to_string()));
    }

    #[test]
    fn fixed_table_entries_are_lowercase() {
        for (ext, _) in FIXED_TABLE {
            assert_eq!(*ext, ext.to_ascii_lowercase());
        }
    }
}
