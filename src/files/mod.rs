//! Static file lookup
//!
//! Maps request-targets onto paths confined to the serving root and reads
//! the metadata and contents needed to answer GET and HEAD.

pub mod path;
pub mod responder;

pub use path::{ResolvedPath, resolve_path};
pub use responder::FileInfo;
