//! Content fullpath codec.
//!
//! A fullpath names one version of a content as five `/`-separated components:
//!
//! ```text
//! account/container/path/version/content_id
//! ```
//!
//! Components are form-encoded so that the separator never appears inside one.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::{CoreError, CoreResult};

/// Characters escaped in a fullpath component. Space is kept here and
/// rewritten to `+` afterwards.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b' ');

/// A decoded content fullpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullPath {
    /// Account owning the container.
    pub account: String,
    /// Container (reference) name.
    pub container: String,
    /// Content path.
    pub path: String,
    /// Content version.
    pub version: String,
    /// Content identifier.
    pub content_id: String,
}

/// Encode the five fullpath components.
///
/// # Errors
///
/// Returns [`CoreError::FullPath`] if any component is empty.
pub fn encode_fullpath(
    account: &str,
    container: &str,
    path: &str,
    version: &str,
    content_id: &str,
) -> CoreResult<String> {
    let parts = [account, container, path, version, content_id];
    if parts.iter().any(|p| p.is_empty()) {
        return Err(CoreError::FullPath("Can't encode fullpath".to_owned()));
    }
    Ok(parts
        .iter()
        .map(|p| form_encode(p))
        .collect::<Vec<_>>()
        .join("/"))
}

/// Decode a fullpath into its five components.
///
/// # Errors
///
/// Returns [`CoreError::FullPath`] unless the input has exactly five parts.
pub fn decode_fullpath(fullpath: &str) -> CoreResult<FullPath> {
    let parts: Vec<String> = fullpath.split('/').map(form_decode).collect();
    let Ok([account, container, path, version, content_id]) = <[String; 5]>::try_from(parts) else {
        return Err(CoreError::FullPath("'fullpath': Wrong format".to_owned()));
    };
    Ok(FullPath {
        account,
        container,
        path,
        version,
        content_id,
    })
}

fn form_encode(input: &str) -> String {
    utf8_percent_encode(input, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

fn form_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
