use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::ServeError;

/// File served when the request-target names a directory (ends in `/`).
pub const INDEX_PAGE: &str = "index.html";

/// A filesystem path that stays at or below the serving root.
///
/// Only [`resolve_path`] constructs one, after the traversal check has
/// passed, so holding a `ResolvedPath` means the check already ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Turns a raw request-target into a path under `root`.
///
/// The target is percent-decoded, cut at the first `?`, and given
/// [`INDEX_PAGE`] when it ends in `/`. Its segments are then walked with a
/// depth counter that must never drop below zero; a `..` that would climb
/// above the root fails with [`ServeError::PathTraversal`] before anything
/// touches the filesystem. An empty `root` means the working directory.
pub fn resolve_path(raw_target: &str, root: &str) -> Result<ResolvedPath, ServeError> {
    let decoded = percent_decode_str(raw_target).decode_utf8_lossy();
    let mut target = match decoded.find('?') {
        Some(idx) => &decoded[..idx],
        None => &decoded[..],
    }
    .to_string();

    if target.is_empty() {
        target.push('/');
    }
    if target.ends_with('/') {
        target.push_str(INDEX_PAGE);
    }

    let segments = confined_segments(&target)?;

    let mut path = if root.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(root)
    };
    path.extend(segments);

    Ok(ResolvedPath { path })
}

/// Walks `/`-separated segments, keeping a running depth.
///
/// Empty and `.` segments stay at the same depth, `..` goes up one, anything
/// else goes down one. Returns the normalized segments, or
/// `PathTraversal` as soon as the depth turns negative.
pub fn confined_segments(target: &str) -> Result<Vec<&str>, ServeError> {
    let mut segments: Vec<&str> = Vec::new();
    let mut depth: i64 = 0;

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return Err(ServeError::PathTraversal);
                }
                segments.pop();
            }
            s if s.contains('\0') => return Err(ServeError::NotFound),
            s => {
                depth += 1;
                segments.push(s);
            }
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_never_negative() {
        assert_eq!(confined_segments("/a/b/../c").unwrap(), vec!["a", "c"]);
        assert_eq!(confined_segments("/a/../b").unwrap(), vec!["b"]);
        assert!(matches!(confined_segments("/a/../../b"), Err(ServeError::PathTraversal)));
        assert!(matches!(confined_segments("/.."), Err(ServeError::PathTraversal)));
    }

    #[test]
    fn dot_and_empty_segments_do_not_descend() {
        assert!(matches!(confined_segments("/./../x"), Err(ServeError::PathTraversal)));
        assert!(matches!(confined_segments("//../x"), Err(ServeError::PathTraversal)));
    }

    #[test]
    fn traversal_rejected_even_if_later_segments_rebalance() {
        // Depth goes to -1 after the first `..`, even though it ends at +1
        assert!(matches!(
            confined_segments("/../a/b/c"),
            Err(ServeError::PathTraversal)
        ));
    }
}
