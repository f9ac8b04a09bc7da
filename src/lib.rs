//! Warden - root-confined static file server
//!
//! Core library for request framing, path resolution, file retrieval
//! and the worker-pool listener.

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod server;
