//! HTTP protocol handling.
//!
//! This module implements the one-request-per-connection pipeline.
//!
//! # Architecture
//!
//! - **`session`**: The per-connection state machine
//! - **`parser`**: Extracts method and path from the bytes of a single read
//! - **`request`**: The minimal request representation
//! - **`response`**: Response representation and the `ResponseBuilder`
//! - **`writer`**: Serializes and writes responses to the client
//! - **`file`**: Static file serving
//!
//! # Session State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read
//!        └──────┬──────┘
//!               │ Bytes received (EOF → Closed, silently)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Route lookup, 404 on empty result
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Written (or abandoned on failure)
//!               ▼
//!            Closed
//! ```
//!
//! A fault while reading or dispatching answers a best-effort 500 and
//! closes the connection.

pub mod file;
pub mod parser;
pub mod request;
pub mod response;
pub mod session;
pub mod writer;
