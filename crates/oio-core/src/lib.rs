//! Core identifiers, configuration, and structured errors for the OpenIO SDS
//! proxy client.
//!
//! This crate holds the values every proxy call is made of:
//!
//! - [`OioUrl`]: the storage object identifier (namespace, account,
//!   reference, path) handed to each endpoint operation.
//! - [`SdsError`]: the structured error (numeric code, message, causal chain)
//!   every operation reports failures with.
//! - [`SdsConfig`] and [`ProxyResolver`]: environment-driven configuration and
//!   the namespace-to-proxy-host lookup used when building request URLs.
//! - [`fullpath`]: the five-part content fullpath codec.

pub mod config;
mod error;
pub mod fullpath;
mod types;

pub use config::{ProxyResolver, SdsConfig, StaticResolver};
pub use error::{CoreError, CoreResult, SdsError};
pub use fullpath::{FullPath, decode_fullpath, encode_fullpath};
pub use types::OioUrl;
