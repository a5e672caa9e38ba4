//! The HTTP exchange engine.
//!
//! [`exchange`] runs one request/response cycle against the proxy:
//!
//! ```text
//! Idle -> Configured (headers + body attached) -> InFlight -> Completed(ok | error)
//! ```
//!
//! Default headers go first, then the caller's. The request body is pulled
//! from a [`BodyCursor`] with its exact length declared. Response headers with
//! the `x-oio-` prefix and every body chunk are written into the caller's
//! [`ResponseContext`] before the call returns. There are no retries: the
//! outcome is reported as-is.

use std::time::Instant;

use bytes::Bytes;
use http::Method;
use oio_core::SdsError;
use tracing::debug;

use crate::decode::decode_error;
use crate::headers::{DefaultHeaders, HeaderSet, capture_header};
use crate::transport::{BodyCursor, ProxyRequest, ResponseSink, Transport};

/// What the caller sends: extra headers and an optional body.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Headers sent after the default ones.
    pub headers: HeaderSet,
    /// Request body.
    pub body: Option<Bytes>,
}

impl RequestContext {
    /// Create an empty request context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(name, value);
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// What the caller gets back: captured `x-oio-` headers and, if requested,
/// the response body.
#[derive(Debug, Clone, Default)]
pub struct ResponseContext {
    /// Captured proxy headers, prefix stripped, in the order the transport
    /// reported them (see [`crate::transport`]).
    pub headers: HeaderSet,
    /// Response body buffer; `None` discards the body.
    pub body: Option<Vec<u8>>,
}

impl ResponseContext {
    /// Capture headers and the response body.
    #[must_use]
    pub fn with_body() -> Self {
        Self {
            headers: HeaderSet::new(),
            body: Some(Vec::new()),
        }
    }

    /// Capture headers only; the body is read and dropped.
    #[must_use]
    pub fn headers_only() -> Self {
        Self::default()
    }

    /// Take the body collected so far.
    #[must_use]
    pub fn take_body(&mut self) -> Bytes {
        self.body.take().map(Bytes::from).unwrap_or_default()
    }
}

/// Feeds transport callbacks into an optional [`ResponseContext`].
struct Capture<'a> {
    response: Option<&'a mut ResponseContext>,
}

impl ResponseSink for Capture<'_> {
    fn on_header(&mut self, name: &str, value: &str) {
        let Some(out) = self.response.as_deref_mut() else {
            return;
        };
        if let Some((name, value)) = capture_header(name, value) {
            out.headers.push(name, value);
        }
    }

    fn on_data(&mut self, chunk: &[u8]) {
        if let Some(body) = self
            .response
            .as_deref_mut()
            .and_then(|out| out.body.as_mut())
        {
            body.extend_from_slice(chunk);
        }
    }
}

/// Perform one timed exchange with the proxy.
///
/// Returns `Ok(())` on a 2xx status. Otherwise:
/// - transport failure: code 0, `Proxy error: <reason>`;
/// - non-2xx with a response body buffer: the decoded proxy error, prefixed
///   with `Request error (<status>): `;
/// - non-2xx without a buffer: code `<status>`, `Request error (<status>)`.
pub fn exchange<T: Transport + ?Sized>(
    transport: &T,
    defaults: &DefaultHeaders,
    method: &Method,
    url: &str,
    request: Option<&RequestContext>,
    response: Option<&mut ResponseContext>,
) -> Result<(), SdsError> {
    debug!(%method, url, "proxy call");
    let started = Instant::now();
    let result = exchange_untimed(transport, defaults, method, url, request, response);
    let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    debug!(%method, url, elapsed_us, ok = result.is_ok(), "proxy call done");
    result
}

fn exchange_untimed<T: Transport + ?Sized>(
    transport: &T,
    defaults: &DefaultHeaders,
    method: &Method,
    url: &str,
    request: Option<&RequestContext>,
    mut response: Option<&mut ResponseContext>,
) -> Result<(), SdsError> {
    let headers = defaults
        .headers()
        .iter()
        .chain(request.into_iter().flat_map(|r| r.headers.iter()))
        .collect();
    let body = request.and_then(|r| r.body.clone()).map(BodyCursor::new);

    let proxy_request = ProxyRequest {
        method: method.clone(),
        url,
        headers,
        body,
    };
    let mut capture = Capture {
        response: response.as_deref_mut(),
    };
    let status = transport
        .perform(proxy_request, &mut capture)
        .map_err(|e| SdsError::unspecified(format!("Proxy error: {e}")))?;

    if status.is_success() {
        return Ok(());
    }

    let code = i32::from(status.as_u16());
    match response.as_deref().and_then(|out| out.body.as_deref()) {
        Some(body) => Err(decode_error(body).prefixed(format!("Request error ({code}): "))),
        None => Err(SdsError::new(code, format!("Request error ({code})"))),
    }
}
