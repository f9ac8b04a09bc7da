//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to answer one GET or HEAD request per connection.
//!
//! # Architecture
//!
//! - **`reader`**: Accumulates socket bytes until a whole request is framed
//! - **`parser`**: Frames and parses a request from a byte buffer
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: Content-type detection based on file extensions
//! - **`connection`**: Per-connection state machine tying the above together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Read until the request is framed
//!        └──────┬───────────┘
//!               │ Request parsed (parse failure → 400, straight to Sending)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← GET/HEAD continue, anything else → 405
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │ BuildingResponse │ ← Resolve path, read file
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Sending      │ ← Add baseline headers, write response
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
