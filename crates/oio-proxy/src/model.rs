//! Input and output shapes of the endpoint operations.

use bytes::Bytes;
use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::headers::HeaderSet;

/// Captured header carrying the namespace chunk size.
pub const CHUNK_SIZE_HEADER: &str = "ns-chunk-size";
/// Captured header carrying the content version.
pub const VERSION_HEADER: &str = "content-meta-version";
/// Captured header carrying the content id.
pub const CONTENT_ID_HEADER: &str = "content-id";

/// Result of a content preparation.
///
/// Header-derived fields stay `None` when the proxy did not send them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPrepareOutput {
    /// Chunk size of the namespace.
    pub chunk_size: Option<String>,
    /// Version assigned to the new content.
    pub version: Option<String>,
    /// Id assigned to the new content.
    pub content_id: Option<String>,
    /// Raw response body (the chunk list to upload).
    pub body: Bytes,
}

impl ContentPrepareOutput {
    pub(crate) fn from_response(headers: &HeaderSet, body: Bytes) -> Self {
        let field = |name| headers.get(name).map(str::to_owned);
        Self {
            chunk_size: field(CHUNK_SIZE_HEADER),
            version: field(VERSION_HEADER),
            content_id: field(CONTENT_ID_HEADER),
            body,
        }
    }
}

/// Input of a content creation.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ContentCreateInput {
    /// Declared content size, in bytes.
    pub size: u64,
    /// Chunk list, as returned by prepare and filled by the upload.
    #[builder(setter(into))]
    pub chunks: Bytes,
    /// Explicit content id.
    #[builder(default, setter(strip_option, into))]
    pub content_id: Option<String>,
}

/// Filters of a container listing.
///
/// Unset filters are left out of the query.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ContainerListInput {
    /// Only list names starting with this prefix.
    #[builder(default, setter(strip_option, into))]
    pub prefix: Option<String>,
    /// Start listing after this name.
    #[builder(default, setter(strip_option, into))]
    pub marker: Option<String>,
    /// Stop listing before this name.
    #[builder(default, setter(strip_option, into))]
    pub end_marker: Option<String>,
    /// Maximum number of entries, 0 meaning no limit.
    #[builder(default)]
    pub max: u32,
    /// Group names sharing a prefix up to this character.
    #[builder(default, setter(strip_option))]
    pub delimiter: Option<char>,
}

impl ContainerListInput {
    /// Query parameters to append, in order, skipping unset filters.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let set = |v: &Option<String>| v.as_deref().filter(|v| !v.is_empty()).map(str::to_owned);
        if let Some(v) = set(&self.prefix) {
            params.push(("prefix", v));
        }
        if let Some(v) = set(&self.marker) {
            params.push(("marker", v));
        }
        if let Some(v) = set(&self.end_marker) {
            params.push(("end", v));
        }
        if self.max > 0 {
            params.push(("max", self.max.to_string()));
        }
        if let Some(c) = self.delimiter.filter(|c| *c != '\0') {
            params.push(("delimiter", c.to_string()));
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkBody<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrepareBody {
    pub size: u64,
    pub autocreate: bool,
}
