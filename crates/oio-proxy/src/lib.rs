//! Blocking HTTP client for the OpenIO SDS proxy.
//!
//! The proxy mediates storage metadata operations. This crate turns typed
//! calls into single HTTP exchanges with it:
//!
//! ```text
//! ProxyClient -> UrlBuilder -> exchange -> Transport
//!                                  |
//!                                  +-> decode_error (non-2xx only)
//! ```
//!
//! - [`url`]: request URL construction and query escaping.
//! - [`decode`]: JSON error body decoding.
//! - [`headers`]: ordered header sets, `x-oio-` capture, default headers.
//! - [`transport`]: the [`Transport`] seam and request body cursor.
//! - [`exchange`]: one timed request/response cycle and status classification.
//! - [`client`]: content and container operations.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use oio_core::SdsConfig;
//! use oio_proxy::{HttpTransport, ProxyClient};
//!
//! let config = Arc::new(SdsConfig::from_env());
//! let transport = HttpTransport::from_config(&config).unwrap();
//! let client = ProxyClient::from_config(transport, config);
//!
//! let url = "OPENIO/acct/photos/cat.jpg".parse().unwrap();
//! let chunks = client.content_show(&url).unwrap();
//! println!("{}", String::from_utf8_lossy(&chunks));
//! ```

pub mod client;
pub mod decode;
pub mod exchange;
pub mod headers;
#[cfg(feature = "reqwest")]
mod http_transport;
pub mod model;
pub mod transport;
pub mod url;

pub use client::ProxyClient;
pub use decode::decode_error;
pub use exchange::{RequestContext, ResponseContext, exchange};
pub use headers::{DefaultHeaders, HeaderSet, capture_header};
#[cfg(feature = "reqwest")]
pub use http_transport::HttpTransport;
pub use model::{ContainerListInput, ContentCreateInput, ContentPrepareOutput};
pub use transport::{BodyCursor, ProxyRequest, ResponseSink, Transport, TransportError};
pub use url::{ResourceKind, UrlBuilder};
