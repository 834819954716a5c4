use bytes::Bytes;

use crate::http::request::Request;

/// Extracts the method and path from whatever bytes a session read.
///
/// Parsing never fails. A buffer starting with `GET` yields the text
/// between the first and second space as the path; every other method,
/// a missing second space, or an empty buffer yields an empty path.
pub fn parse_request(buf: &[u8]) -> Request {
    let method = buf
        .iter()
        .position(|&b| b == b' ' || b == b'\r' || b == b'\n')
        .map_or(buf, |end| &buf[..end]);

    let path = if buf.starts_with(b"GET") {
        extract_path(buf).unwrap_or_default()
    } else {
        String::new()
    };

    Request {
        method: String::from_utf8_lossy(method).into_owned(),
        path,
        raw: Bytes::copy_from_slice(buf),
    }
}

fn extract_path(buf: &[u8]) -> Option<String> {
    let start = buf.iter().position(|&b| b == b' ')? + 1;
    let len = buf[start..].iter().position(|&b| b == b' ')?;

    Some(String::from_utf8_lossy(&buf[start..start + len]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/");
    }

    #[test]
    fn missing_second_space_gives_empty_path() {
        let req = parse_request(b"GET /index.html");

        assert_eq!(req.method, "GET");
        assert!(!req.has_path());
    }
}
