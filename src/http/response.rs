use std::time::SystemTime;

use bytes::Bytes;

use crate::http::writer::serialize_response;

/// Status used by [`ResponseBuilder::make_html`].
pub const DEFAULT_STATUS: &str = "200 OK";

/// Content type used by [`ResponseBuilder::make_html`].
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

pub const NOT_FOUND_STATUS: &str = "404 Not Found";
pub const NOT_FOUND_BODY: &str = "<html><body><h1>404 Not Found</h1></body></html>";

pub const INTERNAL_ERROR_STATUS: &str = "500 Internal Server Error";
pub const INTERNAL_ERROR_BODY: &str =
    "<html><body><h1>500 Internal Server Error</h1></body></html>";

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep their insertion order so the serialized form is stable:
/// `Content-Type`, `Content-Length`, then `Date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status text following the protocol version (e.g. "200 OK")
    pub status: String,
    /// HTTP headers as ordered name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Bytes,
}

impl Response {
    /// Returns the first header matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The full status line without its trailing CRLF.
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {}", self.status)
    }

    /// Serializes the response into wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        serialize_response(self)
    }
}

/// Frames content into well-formed HTTP responses.
///
/// The builder holds no state; the only side effect is reading the wall
/// clock for the `Date` header. Status and content type strings are not
/// validated.
///
/// # Example
///
/// ```
/// # use webcore::http::response::ResponseBuilder;
/// let response = ResponseBuilder::new().make_response("body {}", "200 OK", "text/css");
/// assert_eq!(response.header("Content-Length"), Some("7"));
/// assert_eq!(response.header("Content-Type"), Some("text/css; charset=UTF-8"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a response around `content`.
    ///
    /// `Content-Length` is always computed from the byte length of
    /// `content`, never supplied by the caller.
    pub fn make_response(
        &self,
        content: impl Into<Bytes>,
        status: &str,
        content_type: &str,
    ) -> Response {
        let body = content.into();

        let headers = vec![
            (
                "Content-Type".to_string(),
                format!("{}; charset=UTF-8", content_type),
            ),
            ("Content-Length".to_string(), body.len().to_string()),
            ("Date".to_string(), current_http_date()),
        ];

        Response {
            status: status.to_string(),
            headers,
            body,
        }
    }

    /// `make_response` with the default status and content type.
    pub fn make_html(&self, content: impl Into<Bytes>) -> Response {
        self.make_response(content, DEFAULT_STATUS, DEFAULT_CONTENT_TYPE)
    }

    /// Creates the canned 404 Not Found response.
    pub fn make_404(&self) -> Response {
        self.make_response(NOT_FOUND_BODY, NOT_FOUND_STATUS, DEFAULT_CONTENT_TYPE)
    }

    /// Creates the canned 500 Internal Server Error response.
    pub fn make_500(&self) -> Response {
        self.make_response(
            INTERNAL_ERROR_BODY,
            INTERNAL_ERROR_STATUS,
            DEFAULT_CONTENT_TYPE,
        )
    }
}

fn current_http_date() -> String {
    httpdate::fmt_http_date(SystemTime::now())
}
