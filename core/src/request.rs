//! Owned HTTP request model
//!
//! An [`HttpRequest`] is built from a [`RequestLine`], a [`HeaderTable`] and a
//! [`RequestBody`], and lives for exactly one request/response cycle.

use crate::header::HeaderTable;
use crate::http::ParseError;
use crate::method::Method;
use crate::url::{parse_pairs, HttpUrl};
use ahash::AHashMap;

/// Cookie carrying the server-side session id
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// `METHOD target version`, the first line of a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    method: Method,
    url: HttpUrl,
    version: String,
}

impl RequestLine {
    /// Parse a request line.
    ///
    /// The line must split on ASCII whitespace into exactly three tokens.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_ascii_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseError::InvalidRequestLine);
        };

        let method = method.parse::<Method>()?;
        if !version.starts_with("HTTP/") {
            return Err(ParseError::InvalidVersion);
        }

        Ok(Self {
            method,
            url: HttpUrl::parse(target),
            version: version.to_string(),
        })
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline]
    pub fn url(&self) -> &HttpUrl {
        &self.url
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Raw request payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBody(String);

impl RequestBody {
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self(body.into())
    }

    /// Decode body bytes, replacing invalid UTF-8 sequences
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(String::from_utf8_lossy(bytes).into_owned())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    request_line: RequestLine,
    headers: HeaderTable,
    body: RequestBody,
}

impl HttpRequest {
    pub fn new(request_line: RequestLine, headers: HeaderTable, body: RequestBody) -> Self {
        Self {
            request_line,
            headers,
            body,
        }
    }

    /// Get HTTP method
    #[inline]
    pub fn method(&self) -> Method {
        self.request_line.method()
    }

    /// Get request path without query string
    #[inline]
    pub fn path(&self) -> &str {
        self.request_line.url().path()
    }

    /// Get the full request target (including query string)
    #[inline]
    pub fn target(&self) -> &str {
        self.request_line.url().full()
    }

    /// Get the parsed request target
    #[inline]
    pub fn url(&self) -> &HttpUrl {
        self.request_line.url()
    }

    /// Get HTTP version
    #[inline]
    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    #[inline]
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// Get request headers
    #[inline]
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// Get header value by name (case-insensitive)
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Get Content-Length header
    #[inline]
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get_parsed("Content-Length")
    }

    /// Get query parameter by name
    #[inline]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.request_line.url().query(name)
    }

    /// Get request body
    #[inline]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Replace the body; the request line and headers are untouched
    pub fn set_body<S: Into<String>>(&mut self, body: S) {
        self.body = RequestBody::new(body);
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// Segments without `=` or with an empty key are skipped and the first
    /// occurrence of a key wins. Values are not percent-decoded.
    pub fn form_body(&self) -> AHashMap<String, String> {
        parse_pairs(self.body.as_str(), '&')
    }

    /// Get a single form field
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form_body().remove(key)
    }

    /// Get cookie value by name
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookie_pairs()
            .find(|(cookie, _)| *cookie == name)
            .map(|(_, value)| value)
    }

    /// Get all cookies; the first occurrence of a name wins
    pub fn cookies(&self) -> AHashMap<&str, &str> {
        let mut cookies = AHashMap::new();
        for (name, value) in self.cookie_pairs() {
            cookies.entry(name).or_insert(value);
        }
        cookies
    }

    /// Session id from the `JSESSIONID` cookie, if the client sent one
    pub fn session_id(&self) -> Option<&str> {
        self.cookie(SESSION_COOKIE)
    }

    fn cookie_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.headers
            .get("Cookie")
            .unwrap_or_default()
            .split(';')
            .filter_map(|cookie| cookie.split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
    }
}
