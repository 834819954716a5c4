use bytes::Bytes;

/// A request as seen by the dispatcher.
///
/// Only the request line is consulted; headers and body stay inside `raw`
/// untouched. The raw bytes are whatever a single bounded read returned, so
/// an oversized request line is truncated rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// First token of the request line (e.g. "GET"), possibly empty
    pub method: String,
    /// Path used for route lookup; empty when unusable
    pub path: String,
    /// Bytes received from the socket
    pub raw: Bytes,
}

impl Request {
    /// True when the path can be looked up in the route table.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}
