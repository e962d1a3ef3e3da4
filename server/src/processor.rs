//! One-shot HTTP/1.1 connection processor
//!
//! Reads a single request, resolves and invokes its controller, writes the
//! rendered response and shuts the write side down. Every path through
//! [`Http11Processor::process`] writes exactly one response, including a
//! client that stalls before finishing its request (408).

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use kite_core::{HttpParser, HttpRequest, HttpResponse, ParseError, RequestBody, StatusCode};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::KiteConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ServerError, ServerResult};

const READ_CHUNK: usize = 4096;
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-connection request pipeline
#[derive(Clone)]
pub struct Http11Processor {
    dispatcher: Arc<Dispatcher>,
    parser: HttpParser,
    max_body_size: usize,
    read_timeout: Duration,
}

impl Http11Processor {
    pub fn new(dispatcher: Arc<Dispatcher>, parser: HttpParser, max_body_size: usize) -> Self {
        Self {
            dispatcher,
            parser,
            max_body_size,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Deadline for receiving the complete request (head and body)
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Build a processor with the limits from `config`
    pub fn from_config(dispatcher: Arc<Dispatcher>, config: &KiteConfig) -> Self {
        Self::new(
            dispatcher,
            HttpParser::with_limits(config.max_header_size, config.max_headers),
            config.max_request_body_size,
        )
        .with_read_timeout(config.request_timeout())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve one request on `stream`
    ///
    /// Returns the status that was written. Only failures to write the
    /// response or shut the stream down are returned as errors.
    pub async fn process<S>(&self, stream: &mut S) -> ServerResult<StatusCode>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let read = timeout(self.read_timeout, self.read_request(stream))
            .await
            .unwrap_or_else(|_| Err(ServerError::Timeout(self.read_timeout)));

        let response = match read {
            Ok(request) => {
                let response = self.handle(&request);
                info!(
                    method = %request.method(),
                    path = request.path(),
                    status = response.status().as_u16(),
                    "Request processed"
                );
                response
            }
            Err(err) => {
                let status = err.status();
                warn!(status = status.as_u16(), "Rejected request: {}", err);
                HttpResponse::with_status(status)
            }
        };

        let written = stream.write_all(&response.render()).await;
        let closed = stream.shutdown().await;
        written?;
        closed?;

        Ok(response.status())
    }

    /// Run the resolved controller, turning failures into a bare 500
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let controller = self.dispatcher.resolve(request.path(), request.method());
        debug!("Dispatching to {}", controller.matched_path());

        let mut response = HttpResponse::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            controller.service(request, &mut response)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(
                    "Handler for {} {} failed: {}",
                    request.method(),
                    request.path(),
                    err
                );
                response.reset(StatusCode::INTERNAL_SERVER_ERROR);
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    "Handler for {} {} panicked: {}",
                    request.method(),
                    request.path(),
                    reason
                );
                response.reset(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }

        response
    }

    /// Read the head, then exactly `Content-Length` body bytes
    async fn read_request<S>(&self, stream: &mut S) -> ServerResult<HttpRequest>
    where
        S: AsyncRead + Unpin,
    {
        let mut buf = Vec::with_capacity(READ_CHUNK);
        let mut chunk = [0u8; READ_CHUNK];

        let (head_len, body_offset) = loop {
            if let Some(found) = HttpParser::find_head_end(&buf) {
                break found;
            }
            if buf.len() > self.parser.max_header_size() {
                return Err(ParseError::HeadersTooLarge.into());
            }

            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                // A head cut off by EOF is parsed as-is
                if buf.is_empty() {
                    return Err(ParseError::IncompleteRequest.into());
                }
                break (buf.len(), buf.len());
            }
            buf.extend_from_slice(&chunk[..n]);
        };

        let head = self.parser.parse_head(&buf[..head_len])?;
        let length = head.content_length()?;
        if length > self.max_body_size {
            return Err(ServerError::PayloadTooLarge {
                size: length,
                limit: self.max_body_size,
            });
        }

        let mut body = buf.split_off(body_offset.min(buf.len()));
        while body.len() < length {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(ParseError::IncompleteRequest.into());
            }
            body.extend_from_slice(&chunk[..n]);
        }
        body.truncate(length);

        Ok(head.into_request(RequestBody::from_bytes(&body)))
    }
}
