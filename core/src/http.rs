//! HTTP/1.1 request head parser
//!
//! Turns the bytes in front of the blank separator line into a
//! [`RequestLine`] and a [`HeaderTable`]. Body framing is left to the caller,
//! which knows how the bytes arrive; [`HttpParser::parse_request`] covers the
//! case where the whole request is already buffered.

use crate::header::HeaderTable;
use crate::request::{HttpRequest, RequestBody, RequestLine};
use memchr::{memchr, memmem};
use std::str;

/// HTTP request parser with DoS limits
#[derive(Debug, Clone)]
pub struct HttpParser {
    /// Maximum size of the request head in bytes
    max_header_size: usize,
    /// Maximum number of headers allowed
    max_headers: usize,
}

impl HttpParser {
    /// Create new HTTP parser with default limits
    pub fn new() -> Self {
        Self {
            max_header_size: 8 * 1024,
            max_headers: 100,
        }
    }

    /// Create parser with custom limits
    pub fn with_limits(max_header_size: usize, max_headers: usize) -> Self {
        Self {
            max_header_size,
            max_headers,
        }
    }

    /// Maximum head size this parser accepts
    #[inline]
    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }

    /// Locate the blank line ending the head.
    ///
    /// Returns `(head_len, body_offset)`: the head is `buf[..head_len]` and the
    /// body starts at `buf[body_offset..]`. Both `\r\n\r\n` and a bare `\n\n`
    /// terminate the head; whichever comes first wins.
    pub fn find_head_end(buf: &[u8]) -> Option<(usize, usize)> {
        let crlf = memmem::find(buf, b"\r\n\r\n").map(|pos| (pos, pos + 4));
        let lf = memmem::find(buf, b"\n\n").map(|pos| (pos, pos + 2));

        match (crlf, lf) {
            (Some(crlf), Some(lf)) => Some(if crlf.0 <= lf.0 { crlf } else { lf }),
            (crlf, lf) => crlf.or(lf),
        }
    }

    /// Parse the request line and headers
    pub fn parse_head(&self, input: &[u8]) -> Result<RequestHead, ParseError> {
        if input.len() > self.max_header_size {
            return Err(ParseError::HeadersTooLarge);
        }

        let text = simdutf8::basic::from_utf8(input).map_err(|_| ParseError::InvalidEncoding)?;
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));

        let first = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or(ParseError::IncompleteRequest)?;
        let request_line = RequestLine::parse(first)?;

        let mut headers = HeaderTable::with_capacity(16);
        for line in lines {
            if line.is_empty() {
                break;
            }
            if headers.len() >= self.max_headers {
                return Err(ParseError::TooManyHeaders);
            }

            let (name, value) = parse_header_line(line)?;
            headers.insert(name, value);
        }

        Ok(RequestHead {
            request_line,
            headers,
        })
    }

    /// Parse a request that is already fully buffered
    ///
    /// A missing blank line is treated as a head without a body. The body is
    /// cut to `Content-Length`; fewer bytes than announced is an
    /// [`ParseError::IncompleteRequest`].
    pub fn parse_request(&self, input: &[u8]) -> Result<HttpRequest, ParseError> {
        let (head_len, body_offset) =
            Self::find_head_end(input).unwrap_or((input.len(), input.len()));
        let head = self.parse_head(&input[..head_len])?;

        let length = head.content_length()?;
        let available = &input[body_offset..];
        if available.len() < length {
            return Err(ParseError::IncompleteRequest);
        }

        Ok(head.into_request(RequestBody::from_bytes(&available[..length])))
    }
}

impl Default for HttpParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsed request line and headers, waiting for a body
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub request_line: RequestLine,
    pub headers: HeaderTable,
}

impl RequestHead {
    /// Declared body length; zero when the header is absent
    pub fn content_length(&self) -> Result<usize, ParseError> {
        match self.headers.get("Content-Length") {
            Some(value) => value
                .parse()
                .map_err(|_| ParseError::InvalidContentLength),
            None => Ok(0),
        }
    }

    /// Attach the body and build the request
    pub fn into_request(self, body: RequestBody) -> HttpRequest {
        HttpRequest::new(self.request_line, self.headers, body)
    }
}

/// Parse single header line: "Header-Name: value"
fn parse_header_line(line: &str) -> Result<(&str, &str), ParseError> {
    let colon_pos = memchr(b':', line.as_bytes()).ok_or(ParseError::InvalidHeader)?;

    let name = line[..colon_pos].trim();
    let value = line[colon_pos + 1..].trim();
    if name.is_empty() {
        return Err(ParseError::InvalidHeader);
    }

    Ok((name, value))
}

/// HTTP parsing errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Request is incomplete or empty
    IncompleteRequest,
    /// Request head is not valid UTF-8
    InvalidEncoding,
    /// Request line is not `METHOD target version`
    InvalidRequestLine,
    /// Unknown or invalid HTTP method
    InvalidMethod,
    /// Invalid HTTP version
    InvalidVersion,
    /// Invalid header format
    InvalidHeader,
    /// Content-Length is not a number
    InvalidContentLength,
    /// Too many headers (DoS protection)
    TooManyHeaders,
    /// Headers too large (DoS protection)
    HeadersTooLarge,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidEncoding => write!(f, "Request head is not valid UTF-8"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line"),
            ParseError::InvalidMethod => write!(f, "Invalid HTTP method"),
            ParseError::InvalidVersion => write!(f, "Invalid HTTP version"),
            ParseError::InvalidHeader => write!(f, "Invalid header format"),
            ParseError::InvalidContentLength => write!(f, "Invalid Content-Length"),
            ParseError::TooManyHeaders => write!(f, "Too many headers"),
            ParseError::HeadersTooLarge => write!(f, "Headers too large"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn test_simple_get_request() {
        let request = b"GET /hello HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test\r\n\r\n";
        let parsed = HttpParser::new().parse_request(request).unwrap();

        assert_eq!(parsed.method(), Method::GET);
        assert_eq!(parsed.path(), "/hello");
        assert_eq!(parsed.version(), "HTTP/1.1");
        assert_eq!(parsed.header("Host"), Some("example.com"));
        assert_eq!(parsed.header("User-Agent"), Some("test"));
        assert_eq!(parsed.headers().len(), 2);
        assert!(parsed.body().is_empty());
    }

    #[test]
    fn test_post_request_with_body() {
        let request = b"POST /api/users HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 15\r\n\r\n{\"name\":\"test\"}";
        let parsed = HttpParser::new().parse_request(request).unwrap();

        assert_eq!(parsed.method(), Method::POST);
        assert_eq!(parsed.path(), "/api/users");
        assert_eq!(parsed.content_length(), Some(15));
        assert_eq!(parsed.body(), "{\"name\":\"test\"}");
    }

    #[test]
    fn test_body_is_cut_to_content_length() {
        let request = b"POST /login HTTP/1.1\r\nContent-Length: 3\r\n\r\na=1&b=2";
        let parsed = HttpParser::new().parse_request(request).unwrap();
        assert_eq!(parsed.body(), "a=1");
    }

    #[test]
    fn test_short_body_is_incomplete() {
        let request = b"POST /login HTTP/1.1\r\nContent-Length: 30\r\n\r\na=1";
        let result = HttpParser::new().parse_request(request);
        assert!(matches!(result, Err(ParseError::IncompleteRequest)));
    }

    #[test]
    fn test_invalid_content_length() {
        let request = b"POST /login HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
        let result = HttpParser::new().parse_request(request);
        assert!(matches!(result, Err(ParseError::InvalidContentLength)));
    }

    #[test]
    fn test_trailing_whitespace_on_request_line() {
        let request = b"GET / HTTP/1.1 \r\n\r\n";
        let parsed = HttpParser::new().parse_request(request).unwrap();
        assert_eq!(parsed.path(), "/");
        assert_eq!(parsed.version(), "HTTP/1.1");
    }

    #[test]
    fn test_bare_line_feeds() {
        let request = b"GET /index.html HTTP/1.1\nHost: localhost\n\n";
        let parsed = HttpParser::new().parse_request(request).unwrap();
        assert_eq!(parsed.path(), "/index.html");
        assert_eq!(parsed.header("host"), Some("localhost"));
    }

    #[test]
    fn test_find_head_end() {
        assert_eq!(HttpParser::find_head_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some((14, 18)));
        assert_eq!(HttpParser::find_head_end(b"GET / HTTP/1.1\n\nbody"), Some((14, 16)));
        assert_eq!(HttpParser::find_head_end(b"GET / HTTP/1.1\r\nHost: a\r\n"), None);
    }

    #[test]
    fn test_invalid_method() {
        let request = b"INVALID /hello HTTP/1.1\r\n\r\n";
        let result = HttpParser::new().parse_request(request);
        assert!(matches!(result, Err(ParseError::InvalidMethod)));
    }

    #[test]
    fn test_malformed_request_line() {
        let parser = HttpParser::new();

        let request1 = b"GET/hello HTTP/1.1\r\n\r\n";
        assert!(matches!(parser.parse_request(request1), Err(ParseError::InvalidRequestLine)));

        let request2 = b"GET /hello\r\n\r\n";
        assert!(matches!(parser.parse_request(request2), Err(ParseError::InvalidRequestLine)));

        let request3 = b"GET /hello HTTP/1.1 extra\r\n\r\n";
        assert!(matches!(parser.parse_request(request3), Err(ParseError::InvalidRequestLine)));

        let request4 = b"";
        assert!(matches!(parser.parse_request(request4), Err(ParseError::IncompleteRequest)));
    }

    #[test]
    fn test_invalid_http_version() {
        let parser = HttpParser::new();

        let request1 = b"GET /hello HTTPS/1.1\r\n\r\n";
        assert!(matches!(parser.parse_request(request1), Err(ParseError::InvalidVersion)));

        let request2 = b"GET /hello 1.1\r\n\r\n";
        assert!(matches!(parser.parse_request(request2), Err(ParseError::InvalidVersion)));
    }

    #[test]
    fn test_invalid_headers() {
        let parser = HttpParser::new();

        let request1 = b"GET / HTTP/1.1\r\nHost example.com\r\n\r\n";
        assert!(matches!(parser.parse_request(request1), Err(ParseError::InvalidHeader)));

        let request2 = b"GET / HTTP/1.1\r\n: no-name\r\n\r\n";
        assert!(matches!(parser.parse_request(request2), Err(ParseError::InvalidHeader)));

        let mut request3 = Vec::from(&b"GET / HTTP/1.1\r\n"[..]);
        request3.extend_from_slice(&[0xFF, 0xFE]);
        request3.extend_from_slice(b": value\r\n\r\n");
        assert!(matches!(parser.parse_request(&request3), Err(ParseError::InvalidEncoding)));
    }

    #[test]
    fn test_header_limits() {
        let parser = HttpParser::with_limits(8192, 5);

        let mut request = String::from("GET / HTTP/1.1\r\n");
        for i in 0..10 {
            request.push_str(&format!("X-Header-{}: value\r\n", i));
        }
        request.push_str("\r\n");

        let result = parser.parse_request(request.as_bytes());
        assert!(matches!(result, Err(ParseError::TooManyHeaders)));
    }

    #[test]
    fn test_header_size_limits() {
        let parser = HttpParser::with_limits(100, 100);

        let mut request = String::from("GET / HTTP/1.1\r\n");
        request.push_str("X-Long-Header: ");
        request.push_str(&"x".repeat(200));
        request.push_str("\r\n\r\n");

        let result = parser.parse_request(request.as_bytes());
        assert!(matches!(result, Err(ParseError::HeadersTooLarge)));
    }

    #[test]
    fn test_header_whitespace_trimming() {
        let request = b"GET / HTTP/1.1\r\n  Host  :  example.com  \r\nUser-Agent:  KiteTest/1.0  \r\n\r\n";
        let parsed = HttpParser::new().parse_request(request).unwrap();

        assert_eq!(parsed.header("Host"), Some("example.com"));
        assert_eq!(parsed.header("User-Agent"), Some("KiteTest/1.0"));
    }

    #[test]
    fn test_header_value_may_contain_colons() {
        let request = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
        let parsed = HttpParser::new().parse_request(request).unwrap();
        assert_eq!(parsed.header("Host"), Some("localhost:8080"));
    }

    #[test]
    fn test_different_http_methods() {
        let parser = HttpParser::new();

        for method in Method::ALL {
            let request = format!("{} / HTTP/1.1\r\n\r\n", method);
            let parsed = parser.parse_request(request.as_bytes()).unwrap();
            assert_eq!(parsed.method(), method);
        }
    }
}
