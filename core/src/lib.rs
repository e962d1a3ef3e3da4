//! # KiteCore
//!
//! HTTP/1.1 protocol model for the Kite server: request-line and header
//! parsing, the owned request type, and the response renderer. Nothing in
//! this crate performs I/O.
//!
//! ## Example
//! ```rust
//! use kite_core::{HttpParser, HttpResponse, Method};
//!
//! let request = HttpParser::new()
//!     .parse_request(b"GET /login?next=/ HTTP/1.1\r\nHost: localhost\r\n\r\n")
//!     .unwrap();
//! assert_eq!(request.method(), Method::GET);
//! assert_eq!(request.path(), "/login");
//! assert_eq!(request.query("next"), Some("/"));
//!
//! let mut response = HttpResponse::new();
//! response.set_body("Hello, World!");
//! assert_eq!(
//!     response.render(),
//!     b"HTTP/1.1 200 OK\r\nContent-Length: 13\r\n\r\nHello, World!".to_vec()
//! );
//! ```

pub mod header;
pub mod http;
pub mod method;
pub mod request;
pub mod response;
pub mod url;

pub use header::HeaderTable;
pub use http::{HttpParser, ParseError, RequestHead};
pub use method::Method;
pub use request::{HttpRequest, RequestBody, RequestLine, SESSION_COOKIE};
pub use response::{HttpResponse, StatusCode};
pub use url::HttpUrl;
