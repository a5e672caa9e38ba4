//! Transport abstraction.
//!
//! A [`Transport`] performs exactly one blocking HTTP exchange: it sends the
//! request line, headers and (optional) body, then reports the response status,
//! each response header and each body chunk to a [`ResponseSink`]. Retries,
//! pooling and timeouts are the transport's own business.
//!
//! # Header order
//!
//! Values of one header name always keep their relative order, both on the
//! wire and in the callbacks. Across different names the order is only
//! guaranteed by transports that keep a flat header list: the `reqwest`
//! transport groups values by name, so `a, b, a` is sent and reported as
//! `a, a, b`. HTTP gives no meaning to the order of different field names.
//!
//! # Implementations
//!
//! - [`HttpTransport`](crate::HttpTransport): production implementation using
//!   blocking `reqwest` (feature `reqwest`, on by default)
//! - Mock implementations for testing

use std::io::{self, Read};
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};

/// Failure below the HTTP layer: no status code was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established (DNS, refused, unreachable).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The exchange did not complete in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Reading or writing a body failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Pull-style reader over a request body.
///
/// Every read is bounded by what remains, and the total length is known up
/// front so it can be declared as the request's content length.
#[derive(Debug, Clone)]
pub struct BodyCursor {
    data: Bytes,
    done: usize,
}

impl BodyCursor {
    /// Create a cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: Bytes) -> Self {
        Self { data, done: 0 }
    }

    /// Total body length, in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.done
    }
}

impl Read for BodyCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.remaining().min(buf.len());
        if len > 0 {
            buf[..len].copy_from_slice(&self.data[self.done..self.done + len]);
            self.done += len;
        }
        Ok(len)
    }
}

/// One request handed to a [`Transport`].
#[derive(Debug)]
pub struct ProxyRequest<'a> {
    /// HTTP method.
    pub method: Method,
    /// Fully-qualified target URL.
    pub url: &'a str,
    /// Headers to send, in order, duplicates included. Transports may group
    /// values by name; see the module docs.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Request body, if any.
    pub body: Option<BodyCursor>,
}

/// Receives the response of an exchange as it arrives.
pub trait ResponseSink {
    /// Called once per response header value, in arrival order per name.
    fn on_header(&mut self, name: &str, value: &str);

    /// Called once per response body chunk, in arrival order.
    fn on_data(&mut self, chunk: &[u8]);
}

/// Executes single HTTP exchanges against the proxy.
///
/// The handle is owned by the caller and reused across calls; the client only
/// borrows it. Implementations must read the whole response body, even when
/// the sink discards it.
pub trait Transport: Send + Sync {
    /// Perform one exchange and return the response status.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no HTTP response could be obtained.
    fn perform(
        &self,
        request: ProxyRequest<'_>,
        sink: &mut dyn ResponseSink,
    ) -> Result<StatusCode, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(
        &self,
        request: ProxyRequest<'_>,
        sink: &mut dyn ResponseSink,
    ) -> Result<StatusCode, TransportError> {
        (**self).perform(request, sink)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform(
        &self,
        request: ProxyRequest<'_>,
        sink: &mut dyn ResponseSink,
    ) -> Result<StatusCode, TransportError> {
        (**self).perform(request, sink)
    }
}
