//! Request URL construction.
//!
//! Every proxy request targets
//!
//! ```text
//! http://<proxy-host>/v3.0/<namespace>/<container|content>/<action>?acct=..&ref=..[&path=..]
//! ```
//!
//! The proxy host comes from the namespace configuration. A missing namespace
//! or an unconfigured namespace is logged and falls back to the `proxy` host
//! alias instead of failing the call.

use std::fmt;
use std::sync::Arc;

use oio_core::{OioUrl, ProxyResolver};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::warn;

/// Path prefix of the proxy API.
pub const PROXYD_PREFIX: &str = "v3.0";

/// Host used when no proxy can be resolved for the namespace.
pub const FALLBACK_HOST: &str = "proxy";

/// Characters escaped in a query value: everything but ASCII alphanumerics
/// and `-`, `.`, `_`, `~`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Kind of resource an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A container (account + reference).
    Container,
    /// A content (account + reference + path).
    Content,
}

impl ResourceKind {
    /// Path segment naming this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Content => "content",
        }
    }
}

/// Percent-encode a query value.
#[must_use]
pub fn escape_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Reverse [`escape_query_value`]. Invalid UTF-8 sequences are replaced.
#[must_use]
pub fn unescape_query_value(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// A request URL under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    url: String,
    has_query: bool,
}

impl RequestUrl {
    fn new(url: String) -> Self {
        Self {
            url,
            has_query: false,
        }
    }

    /// Append `key=value`, escaping the value.
    pub fn push_param(&mut self, key: &str, value: &str) {
        self.url.push(if self.has_query { '&' } else { '?' });
        self.has_query = true;
        self.url.push_str(key);
        self.url.push('=');
        self.url.push_str(&escape_query_value(value));
    }

    /// Append `key=value` only when `value` is present and non-empty.
    pub fn push_opt_param(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.push_param(key, v);
        }
    }

    /// The URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Builds proxy request URLs from storage identifiers.
#[derive(Clone)]
pub struct UrlBuilder {
    resolver: Arc<dyn ProxyResolver>,
}

impl fmt::Debug for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlBuilder").finish_non_exhaustive()
    }
}

impl UrlBuilder {
    /// Create a builder resolving proxy hosts through `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn ProxyResolver>) -> Self {
        Self { resolver }
    }

    /// Build the URL of `action` on the resource designated by `url`.
    ///
    /// Container URLs carry `acct` and `ref`; content URLs also carry `path`.
    #[must_use]
    pub fn build(&self, url: &OioUrl, kind: ResourceKind, action: &str) -> RequestUrl {
        let namespace = url.namespace().unwrap_or_default();
        let mut out = RequestUrl::new(format!(
            "http://{}/{PROXYD_PREFIX}/{namespace}/{}/{action}",
            self.proxy_host(url),
            kind.as_str(),
        ));
        out.push_param("acct", url.account().unwrap_or_default());
        out.push_param("ref", url.reference().unwrap_or_default());
        if kind == ResourceKind::Content {
            out.push_param("path", url.path().unwrap_or_default());
        }
        out
    }

    fn proxy_host(&self, url: &OioUrl) -> String {
        let Some(namespace) = url.namespace() else {
            warn!(url = %url, "no namespace configured, using fallback proxy host");
            return FALLBACK_HOST.to_owned();
        };
        self.resolver
            .resolve_proxy_host(namespace)
            .unwrap_or_else(|| {
                warn!(namespace, "no proxy configured, using fallback proxy host");
                FALLBACK_HOST.to_owned()
            })
    }
}
