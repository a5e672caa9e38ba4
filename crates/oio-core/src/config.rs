//! Client configuration and namespace resolution.
//!
//! Configuration is driven by environment variables and loaded once at startup:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OIO_PROXY_HOSTS` | *(unset)* | `NS=host:port` pairs separated by `,` or `;` |
//! | `OIO_NS` | *(unset)* | Default namespace |
//! | `OIO_PROXY` | *(unset)* | Proxy host for the default namespace |
//! | `OIO_USER_AGENT` | `oio-proxy-client/<version>` | `User-Agent` sent with every request |
//! | `OIO_PROXY_TIMEOUT_MS` | `30000` | Transport timeout for one exchange |
//! | `LOG_LEVEL` | `info` | Log level filter |

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

/// Default `User-Agent` announced to the proxy.
pub const DEFAULT_USER_AGENT: &str = concat!("oio-proxy-client/", env!("CARGO_PKG_VERSION"));

/// Default transport timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Resolves the proxy host serving a namespace.
pub trait ProxyResolver: Send + Sync {
    /// Return `host[:port]` of the proxy for `namespace`, if one is configured.
    fn resolve_proxy_host(&self, namespace: &str) -> Option<String>;
}

/// Client configuration.
///
/// # Examples
///
/// ```
/// use oio_core::{ProxyResolver, SdsConfig};
///
/// let config = SdsConfig::builder()
///     .proxies([("OPENIO".to_owned(), "10.0.0.1:6000".to_owned())].into())
///     .build();
/// assert_eq!(config.resolve_proxy_host("OPENIO").as_deref(), Some("10.0.0.1:6000"));
/// assert_eq!(config.resolve_proxy_host("OTHER"), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SdsConfig {
    /// Proxy host per namespace.
    #[builder(default)]
    pub proxies: BTreeMap<String, String>,

    /// Namespace used when a caller does not name one.
    #[builder(default, setter(strip_option))]
    pub default_namespace: Option<String>,

    /// `User-Agent` sent with every request.
    #[builder(default = String::from(DEFAULT_USER_AGENT))]
    pub user_agent: String,

    /// Transport timeout for one exchange, in milliseconds.
    #[builder(default = DEFAULT_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SdsConfig {
    fn default() -> Self {
        Self {
            proxies: BTreeMap::new(),
            default_namespace: None,
            user_agent: String::from(DEFAULT_USER_AGENT),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: String::from("info"),
        }
    }
}

impl SdsConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("OIO_PROXY_HOSTS") {
            config.proxies = parse_proxy_hosts(&v);
        }
        if let Some(ns) = lookup("OIO_NS").filter(|ns| !ns.is_empty()) {
            if let Some(host) = lookup("OIO_PROXY").filter(|h| !h.is_empty()) {
                config.proxies.insert(ns.clone(), host);
            }
            config.default_namespace = Some(ns);
        }
        if let Some(v) = lookup("OIO_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("OIO_PROXY_TIMEOUT_MS") {
            match v.parse() {
                Ok(ms) => config.request_timeout_ms = ms,
                Err(_) => warn!(value = %v, "ignoring invalid OIO_PROXY_TIMEOUT_MS"),
            }
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

impl ProxyResolver for SdsConfig {
    fn resolve_proxy_host(&self, namespace: &str) -> Option<String> {
        self.proxies.get(namespace).cloned()
    }
}

/// Parse `NS=host:port` pairs separated by `,` or `;`.
fn parse_proxy_hosts(value: &str) -> BTreeMap<String, String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| match pair.split_once('=') {
            Some((ns, host)) if !ns.trim().is_empty() && !host.trim().is_empty() => {
                Some((ns.trim().to_owned(), host.trim().to_owned()))
            }
            _ => {
                warn!(entry = %pair, "skipping malformed OIO_PROXY_HOSTS entry");
                None
            }
        })
        .collect()
}

/// In-memory namespace resolver.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, String>,
}

impl StaticResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the proxy host of a namespace.
    #[must_use]
    pub fn with_host(mut self, namespace: impl Into<String>, host: impl Into<String>) -> Self {
        self.hosts.insert(namespace.into(), host.into());
        self
    }
}

impl ProxyResolver for StaticResolver {
    fn resolve_proxy_host(&self, namespace: &str) -> Option<String> {
        self.hosts.get(namespace).cloned()
    }
}
