//! Content and container operations.
//!
//! Each operation is a single exchange: build the URL, assemble headers and
//! an optional JSON body, run [`exchange`], then unpack the response. Failures
//! are returned as-is; nothing is retried.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use oio_core::{OioUrl, ProxyResolver, SdsConfig, SdsError};
use serde::Serialize;

use crate::exchange::{RequestContext, ResponseContext, exchange};
use crate::headers::DefaultHeaders;
use crate::model::{
    ContainerListInput, ContentCreateInput, ContentPrepareOutput, LinkBody, PrepareBody,
};
use crate::transport::Transport;
use crate::url::{RequestUrl, ResourceKind, UrlBuilder};

/// Request header selecting the prepare mode.
pub const ACTION_MODE_HEADER: &str = "X-oio-action-mode";
/// Request header carrying the declared content length.
pub const CONTENT_LENGTH_HEADER: &str = "X-oio-content-meta-length";
/// Request header carrying the content hash.
pub const CONTENT_HASH_HEADER: &str = "X-oio-content-meta-hash";
/// Request header carrying the storage policy.
pub const CONTENT_POLICY_HEADER: &str = "X-oio-content-meta-policy";

/// Placeholder hash announced on create.
// TODO: send the real content MD5 once chunk upload reports it back.
pub const PLACEHOLDER_CONTENT_HASH: &str = "00000000000000000000000000000000";
/// Storage policy announced on create.
pub const DEFAULT_CONTENT_POLICY: &str = "NONE";

/// Client for the proxy's content and container endpoints.
///
/// The transport is owned by the client and reused across calls; the client
/// itself holds no per-call state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct ProxyClient<T> {
    transport: T,
    urls: UrlBuilder,
    defaults: Arc<DefaultHeaders>,
}

impl<T: Transport> ProxyClient<T> {
    /// Create a client from its collaborators.
    #[must_use]
    pub fn new(
        transport: T,
        resolver: Arc<dyn ProxyResolver>,
        defaults: Arc<DefaultHeaders>,
    ) -> Self {
        Self {
            transport,
            urls: UrlBuilder::new(resolver),
            defaults,
        }
    }

    /// Create a client resolving hosts and default headers from `config`.
    #[must_use]
    pub fn from_config(transport: T, config: Arc<SdsConfig>) -> Self {
        let defaults = Arc::new(DefaultHeaders::from_config(&config));
        Self::new(transport, config, defaults)
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the description of a content (its chunk list).
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn content_show(&self, url: &OioUrl) -> Result<Bytes, SdsError> {
        let target = self.urls.build(url, ResourceKind::Content, "show");
        let mut response = ResponseContext::with_body();
        self.call(&Method::GET, &target, None, &mut response)?;
        Ok(response.take_body())
    }

    /// Delete a content.
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn content_delete(&self, url: &OioUrl) -> Result<(), SdsError> {
        let target = self.urls.build(url, ResourceKind::Content, "delete");
        let mut response = ResponseContext::with_body();
        self.call(&Method::POST, &target, None, &mut response)
    }

    /// Make `url` designate the existing content `id`.
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn content_link(&self, url: &OioUrl, id: &str) -> Result<(), SdsError> {
        let target = self.urls.build(url, ResourceKind::Content, "link");
        let request = RequestContext::new().with_body(json_body(&LinkBody { id })?);
        let mut response = ResponseContext::with_body();
        self.call(&Method::POST, &target, Some(&request), &mut response)
    }

    /// Reserve chunks for a new content of `size` bytes.
    ///
    /// With `autocreate`, the proxy creates the container if it is missing.
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn content_prepare(
        &self,
        url: &OioUrl,
        size: u64,
        autocreate: bool,
    ) -> Result<ContentPrepareOutput, SdsError> {
        let target = self.urls.build(url, ResourceKind::Content, "prepare");
        let body = json_body(&PrepareBody { size, autocreate })?;
        let mut request = RequestContext::new().with_body(body);
        if autocreate {
            request = request.with_header(ACTION_MODE_HEADER, "autocreate");
        }
        let mut response = ResponseContext::with_body();
        self.call(&Method::POST, &target, Some(&request), &mut response)?;
        let body = response.take_body();
        Ok(ContentPrepareOutput::from_response(&response.headers, body))
    }

    /// Commit a content with its uploaded chunk list.
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn content_create(
        &self,
        url: &OioUrl,
        input: &ContentCreateInput,
    ) -> Result<Bytes, SdsError> {
        let mut target = self.urls.build(url, ResourceKind::Content, "create");
        target.push_opt_param("id", input.content_id.as_deref());
        let request = RequestContext::new()
            .with_header(CONTENT_LENGTH_HEADER, input.size.to_string())
            .with_header(CONTENT_HASH_HEADER, PLACEHOLDER_CONTENT_HASH)
            .with_header(CONTENT_POLICY_HEADER, DEFAULT_CONTENT_POLICY)
            .with_body(input.chunks.clone());
        let mut response = ResponseContext::with_body();
        self.call(&Method::POST, &target, Some(&request), &mut response)?;
        Ok(response.take_body())
    }

    /// List the contents of a container.
    ///
    /// # Errors
    ///
    /// Returns the transport or proxy error of the exchange.
    pub fn container_list(
        &self,
        url: &OioUrl,
        input: &ContainerListInput,
    ) -> Result<Bytes, SdsError> {
        let mut target = self.urls.build(url, ResourceKind::Container, "list");
        for (key, value) in input.query_params() {
            target.push_param(key, &value);
        }
        let mut response = ResponseContext::with_body();
        self.call(&Method::GET, &target, None, &mut response)?;
        Ok(response.take_body())
    }

    fn call(
        &self,
        method: &Method,
        target: &RequestUrl,
        request: Option<&RequestContext>,
        response: &mut ResponseContext,
    ) -> Result<(), SdsError> {
        exchange(
            &self.transport,
            &self.defaults,
            method,
            target.as_str(),
            request,
            Some(response),
        )
    }
}

fn json_body(value: &impl Serialize) -> Result<Vec<u8>, SdsError> {
    serde_json::to_vec(value)
        .map_err(|e| SdsError::unspecified("Failed to encode request body").with_source(e))
}
