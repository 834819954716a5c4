//! Static file serving.
//!
//! Files are read whole into memory and framed through a
//! [`ResponseBuilder`]. Paths are used as given, so relative paths resolve
//! against the process working directory.

use std::fs::{self, File};
use std::path::Path;

use crate::http::response::{Response, ResponseBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct FileHandler {
    responses: ResponseBuilder,
}

impl FileHandler {
    pub fn new(responses: ResponseBuilder) -> Self {
        Self { responses }
    }

    /// Returns true if `path` is a regular file that can be opened for reading.
    ///
    /// Any I/O failure counts as "does not exist".
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        File::open(path.as_ref())
            .and_then(|f| f.metadata())
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Reads `path` into a `200 OK` response, or the canned 404 if it
    /// cannot be read.
    pub fn serve_file(&self, path: impl AsRef<Path>, content_type: &str) -> Response {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(contents) => {
                tracing::debug!(
                    path = %path.display(),
                    bytes = contents.len(),
                    "Serving file"
                );
                self.responses.make_response(contents, "200 OK", content_type)
            }
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "File unreadable, answering 404"
                );
                self.responses.make_404()
            }
        }
    }
}
