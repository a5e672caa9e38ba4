//! Header sets exchanged with the proxy.
//!
//! Request headers are handed to the transport in insertion order, duplicates
//! included; values sharing a name reach the wire in that order. From the
//! response, only headers carrying the `x-oio-` prefix (compared
//! case-insensitively) are captured; the prefix is stripped and the name
//! lowercased.

use oio_core::SdsConfig;

/// Header name prefix of proxy-specific headers.
pub const OIO_HEADER_PREFIX: &str = "x-oio-";

/// Ordered sequence of `(name, value)` pairs. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Append a header, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Value of the last header named `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for HeaderSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Keep a response header if it carries the proxy prefix.
///
/// Returns the lowercased name without the prefix and the trimmed value.
#[must_use]
pub fn capture_header(name: &str, value: &str) -> Option<(String, String)> {
    let name = name.trim();
    let prefix = name.get(..OIO_HEADER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(OIO_HEADER_PREFIX) {
        return None;
    }
    let suffix = name[OIO_HEADER_PREFIX.len()..].trim();
    if suffix.is_empty() {
        return None;
    }
    Some((suffix.to_ascii_lowercase(), value.trim().to_owned()))
}

/// Headers sent with every exchange, ahead of the caller's own headers.
///
/// Assembled once at startup and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaders {
    headers: HeaderSet,
}

impl DefaultHeaders {
    /// Create an empty default set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the default set from the client configuration.
    #[must_use]
    pub fn from_config(config: &SdsConfig) -> Self {
        Self::new().with("User-Agent", config.user_agent.clone())
    }

    /// Add a default header.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(name, value);
        self
    }

    /// The default headers in order.
    #[must_use]
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }
}
