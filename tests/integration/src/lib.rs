//! Integration tests for the proxy client.
//!
//! Each test starts an in-process mock proxy (`hyper` on a background `tokio`
//! runtime) bound to an ephemeral local port, then drives the real
//! [`HttpTransport`] against it. No external service is needed:
//!
//! ```text
//! cargo test -p oio-integration
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use std::thread::JoinHandle;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use oio_core::{OioUrl, SdsConfig};
use oio_proxy::{HttpTransport, ProxyClient};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Namespace served by the mock proxy.
pub const NAMESPACE: &str = "NS";

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A request received by the mock proxy.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// HTTP method.
    pub method: Method,
    /// Path and query, as sent.
    pub uri: String,
    /// Request headers, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Bytes,
}

impl Recorded {
    /// All values of header `name`, in order.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value of header `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).first().copied()
    }
}

/// A canned reply of the mock proxy.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Reply {
    /// An empty reply with the given status.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Add a response header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Set the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

type Responder = dyn Fn(&Recorded) -> Reply + Send + Sync;

struct State {
    responder: Box<Responder>,
    requests: Mutex<Vec<Recorded>>,
}

/// In-process mock of the proxy service.
///
/// Stops its server thread on drop.
pub struct MockProxy {
    addr: SocketAddr,
    state: Arc<State>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for MockProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProxy").field("addr", &self.addr).finish_non_exhaustive()
    }
}

impl MockProxy {
    /// Start a mock proxy answering every request with `responder`.
    pub fn start(responder: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) -> Self {
        init_tracing();

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock proxy");
        listener.set_nonblocking(true).expect("set nonblocking");
        let addr = listener.local_addr().expect("local addr");

        let state = Arc::new(State {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        });
        let (tx, rx) = oneshot::channel();
        let server_state = Arc::clone(&state);
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("build mock runtime");
            runtime.block_on(serve(listener, server_state, rx));
        });

        Self {
            addr,
            state,
            shutdown: Some(tx),
            thread: Some(thread),
        }
    }

    /// Start a mock proxy answering every request with the same reply.
    pub fn always(reply: Reply) -> Self {
        Self::start(move |_| reply.clone())
    }

    /// `host:port` of the mock proxy.
    #[must_use]
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Client configuration pointing [`NAMESPACE`] at this proxy.
    #[must_use]
    pub fn config(&self) -> SdsConfig {
        SdsConfig::builder()
            .proxies([(NAMESPACE.to_owned(), self.host())].into())
            .default_namespace(NAMESPACE.to_owned())
            .user_agent("oio-integration".to_owned())
            .request_timeout_ms(5_000)
            .build()
    }

    /// A client using the real HTTP transport against this proxy.
    #[must_use]
    pub fn client(&self) -> ProxyClient<HttpTransport> {
        client_for(self.config())
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    /// The last request received.
    #[must_use]
    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request received")
    }
}

impl Drop for MockProxy {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Build a client with the real HTTP transport.
#[must_use]
pub fn client_for(config: SdsConfig) -> ProxyClient<HttpTransport> {
    let transport = HttpTransport::from_config(&config).expect("build transport");
    ProxyClient::from_config(transport, Arc::new(config))
}

/// Parse a test identifier.
#[must_use]
pub fn oio_url(s: &str) -> OioUrl {
    s.parse().expect("valid identifier")
}

async fn serve(
    listener: std::net::TcpListener,
    state: Arc<State>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let listener = tokio::net::TcpListener::from_std(listener).expect("adopt listener");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let Ok((stream, _)) = accepted else {
                    continue;
                };
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let svc = service_fn(move |req| handle(Arc::clone(&state), req));
                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), svc)
                        .await
                    {
                        tracing::debug!(error = %e, "mock proxy connection error");
                    }
                });
            }
        }
    }
}

async fn handle(
    state: Arc<State>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let recorded = Recorded {
        method: parts.method,
        uri: parts.uri.to_string(),
        headers: parts
            .headers
            .iter()
            .map(|(n, v)| {
                (
                    n.as_str().to_owned(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    };

    let reply = (state.responder)(&recorded);
    state.requests.lock().push(recorded);

    let mut builder = Response::builder().status(reply.status);
    for (name, value) in &reply.headers {
        builder = builder.header(name, value);
    }
    Ok(builder
        .body(Full::new(reply.body))
        .unwrap_or_else(|_| Response::new(Full::default())))
}

mod test_content;
mod test_headers;
