//! Blocking `reqwest` transport.

use std::error::Error as StdError;
use std::io::{self, Read};
use std::time::Duration;

use http::StatusCode;
use oio_core::SdsConfig;
use reqwest::blocking::{Body, Client};

use crate::transport::{ProxyRequest, ResponseSink, Transport, TransportError};

/// Size of each bounded read from the response body.
const READ_CHUNK: usize = 16 * 1024;

/// Production transport using a blocking `reqwest` client.
///
/// The client keeps its own connection pool; clone the transport (or share it
/// by reference) to reuse connections across calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the timeout from `config`.
    pub fn from_config(config: &SdsConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(classify)?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn perform(
        &self,
        request: ProxyRequest<'_>,
        sink: &mut dyn ResponseSink,
    ) -> Result<StatusCode, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            let len = body.len();
            builder = builder.body(Body::sized(body, len));
        }

        let mut response = builder.send().map_err(classify)?;
        let status = response.status();

        for (name, value) in response.headers() {
            sink.on_header(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
        }

        // Drain the body even when the sink ignores it.
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            match response.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => sink.on_data(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Err(TransportError::Timeout(e.to_string()));
                }
                Err(e) => return Err(TransportError::Io(e)),
            }
        }

        Ok(status)
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let message = describe(&err);
    if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_builder() || err.is_request() {
        TransportError::Request(message)
    } else {
        TransportError::Other(message)
    }
}

/// Render an error with all its causes, since `reqwest` keeps the useful part
/// (e.g. "Connection refused") in the source chain.
fn describe(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cause = e.source();
    }
    out
}
