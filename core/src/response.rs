//! HTTP response builder and wire renderer
//!
//! Controllers mutate an [`HttpResponse`] in place; the processor renders it
//! once. `Content-Length` is never stored: it is computed from the body when
//! rendering, so it cannot drift from the payload.

use bytes::Bytes;
use std::fmt;

/// HTTP status code with canonical reason phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    // 2xx Success
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);

    // 3xx Redirection
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    pub const FOUND: StatusCode = StatusCode(302);

    // 4xx Client Error
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const REQUEST_TIMEOUT: StatusCode = StatusCode(408);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);

    // 5xx Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Create new status code
    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Get status code as u16
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Check if status code indicates success (2xx)
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if status code indicates client error (4xx)
    pub const fn is_client_error(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Check if status code indicates server error (5xx)
    pub const fn is_server_error(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Get canonical reason phrase for status code
    pub fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            413 => "Payload Too Large",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.canonical_reason())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

const CONTENT_LENGTH: &str = "Content-Length";

/// Mutable HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl HttpResponse {
    /// Create new response with 200 OK status and an empty body
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// Create response with specific status code
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Set status code
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Set a header, replacing an existing one with the same name in place.
    ///
    /// `Content-Length` is ignored; it is derived from the body at render time.
    pub fn set_header<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            return self;
        }

        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Set Content-Type header
    pub fn set_content_type<V: Into<String>>(&mut self, content_type: V) -> &mut Self {
        self.set_header("Content-Type", content_type)
    }

    /// Set body from bytes or text
    pub fn set_body<B: Into<Bytes>>(&mut self, body: B) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Turn the response into a 302 redirect
    pub fn redirect<L: Into<String>>(&mut self, location: L) -> &mut Self {
        self.set_status(StatusCode::FOUND).set_header("Location", location)
    }

    /// Set a cookie
    pub fn set_cookie<N, V>(&mut self, name: N, value: V) -> &mut Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let cookie = format!("{}={}", name.into(), value.into());
        self.set_header("Set-Cookie", cookie)
    }

    /// Reset to a bare status with no headers and an empty body
    pub fn reset(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self.headers.clear();
        self.body = Bytes::new();
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get body size in bytes
    #[inline]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Convert to wire format
    ///
    /// `Content-Length` comes first, followed by every other header in the
    /// order it was first set.
    pub fn render(&self) -> Vec<u8> {
        let mut response = Vec::with_capacity(128 + self.body.len());

        // Status line
        response.extend_from_slice(b"HTTP/1.1 ");
        response.extend_from_slice(self.status.to_string().as_bytes());
        response.extend_from_slice(b"\r\n");

        // Headers
        response.extend_from_slice(CONTENT_LENGTH.as_bytes());
        response.extend_from_slice(b": ");
        response.extend_from_slice(self.body.len().to_string().as_bytes());
        response.extend_from_slice(b"\r\n");
        for (name, value) in &self.headers {
            response.extend_from_slice(name.as_bytes());
            response.extend_from_slice(b": ");
            response.extend_from_slice(value.as_bytes());
            response.extend_from_slice(b"\r\n");
        }

        // Empty line between headers and body
        response.extend_from_slice(b"\r\n");

        // Body
        response.extend_from_slice(&self.body);

        response
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_helpers() {
        assert_eq!(StatusCode::OK.as_u16(), 200);
        assert!(StatusCode::OK.is_success());
        assert!(!StatusCode::OK.is_client_error());
        assert!(!StatusCode::OK.is_server_error());

        assert!(StatusCode::NOT_FOUND.is_client_error());
        assert!(StatusCode::INTERNAL_SERVER_ERROR.is_server_error());

        assert_eq!(StatusCode::OK.canonical_reason(), "OK");
        assert_eq!(StatusCode::METHOD_NOT_ALLOWED.to_string(), "405 Method Not Allowed");
        assert_eq!(StatusCode::REQUEST_TIMEOUT.to_string(), "408 Request Timeout");
        assert_eq!(StatusCode::from(299).canonical_reason(), "Unknown");
    }

    #[test]
    fn test_wire_format() {
        let mut response = HttpResponse::new();
        response.set_body("Hello, World!");

        assert_eq!(
            response.render(),
            b"HTTP/1.1 200 OK\r\nContent-Length: 13\r\n\r\nHello, World!".to_vec()
        );
    }

    #[test]
    fn test_empty_body_still_has_content_length() {
        let response = HttpResponse::with_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.render(),
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let mut response = HttpResponse::new();
        response
            .set_content_type("text/css;charset=utf-8")
            .set_header("X-Custom", "a")
            .set_header("content-type", "text/html;charset=utf-8")
            .set_body("body{}");

        let wire = String::from_utf8(response.render()).unwrap();
        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\nContent-Length: 6\r\nContent-Type: text/html;charset=utf-8\r\nX-Custom: a\r\n\r\nbody{}"
        );
    }

    #[test]
    fn test_content_length_cannot_be_overridden() {
        let mut response = HttpResponse::new();
        response.set_header("Content-Length", "999").set_body("abc");

        assert_eq!(response.header("Content-Length"), None);
        let wire = String::from_utf8(response.render()).unwrap();
        assert!(wire.contains("Content-Length: 3\r\n"));
        assert!(!wire.contains("999"));
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let mut response = HttpResponse::new();
        response.set_body("안녕하세요");

        assert_eq!(response.content_length(), 15);
        let wire = response.render();
        assert!(wire.starts_with(b"HTTP/1.1 200 OK\r\nContent-Length: 15\r\n\r\n"));
    }

    #[test]
    fn test_redirect_and_cookie() {
        let mut response = HttpResponse::new();
        response.redirect("/index.html").set_cookie("JSESSIONID", "abc");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.header("Location"), Some("/index.html"));
        assert_eq!(response.header("set-cookie"), Some("JSESSIONID=abc"));
    }

    #[test]
    fn test_reset_clears_headers_and_body() {
        let mut response = HttpResponse::new();
        response.set_content_type("text/plain").set_body("partial");
        response.reset(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            response.render(),
            b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n".to_vec()
        );
    }
}
