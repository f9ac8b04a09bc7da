//! Listening socket and connection dispatch.

pub mod listener;
pub mod pool;

pub use listener::{Server, ShutdownHandle};
pub use pool::WorkerPool;
