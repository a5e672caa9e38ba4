//! Storage object identifier.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::fullpath::encode_fullpath;

/// Identifier of a container or content: namespace, account, reference and path.
///
/// Every field is optional; empty strings are stored as absent. Fields never
/// contain NUL characters, so they can be escaped into request URLs as-is.
///
/// # Examples
///
/// ```
/// use oio_core::OioUrl;
///
/// let url: OioUrl = "OPENIO/acct/photos/2024/cat.jpg".parse().unwrap();
/// assert_eq!(url.namespace(), Some("OPENIO"));
/// assert_eq!(url.reference(), Some("photos"));
/// assert_eq!(url.path(), Some("2024/cat.jpg"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OioUrl {
    namespace: Option<String>,
    account: Option<String>,
    reference: Option<String>,
    path: Option<String>,
}

impl OioUrl {
    /// Create an identifier for a container.
    pub fn new(
        namespace: impl Into<String>,
        account: impl Into<String>,
        reference: impl Into<String>,
    ) -> CoreResult<Self> {
        Ok(Self {
            namespace: checked("namespace", namespace.into())?,
            account: checked("account", account.into())?,
            reference: checked("reference", reference.into())?,
            path: None,
        })
    }

    /// Set the content path, turning a container identifier into a content one.
    pub fn with_path(mut self, path: impl Into<String>) -> CoreResult<Self> {
        self.path = checked("path", path.into())?;
        Ok(self)
    }

    /// Drop the namespace.
    #[must_use]
    pub fn without_namespace(mut self) -> Self {
        self.namespace = None;
        self
    }

    /// The namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// The reference (container name), if any.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The content path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Encode the fullpath of a version of this content.
    pub fn fullpath(&self, version: &str, content_id: &str) -> CoreResult<String> {
        encode_fullpath(
            self.account().unwrap_or_default(),
            self.reference().unwrap_or_default(),
            self.path().unwrap_or_default(),
            version,
            content_id,
        )
    }
}

fn checked(field: &str, value: String) -> CoreResult<Option<String>> {
    if value.contains('\0') {
        return Err(CoreError::InvalidUrl(format!("NUL character in {field}")));
    }
    Ok((!value.is_empty()).then_some(value))
}

impl FromStr for OioUrl {
    type Err = CoreError;

    /// Parse `NS/ACCOUNT/REFERENCE[/PATH]`; the path keeps any further `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, '/');
        let (Some(ns), Some(account), Some(reference)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CoreError::InvalidUrl(format!(
                "expected NS/ACCOUNT/REFERENCE[/PATH], got '{s}'"
            )));
        };
        let url = Self::new(ns, account, reference)?;
        match parts.next() {
            Some(path) => url.with_path(path),
            None => Ok(url),
        }
    }
}

impl fmt::Display for OioUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.namespace().unwrap_or_default(),
            self.account().unwrap_or_default(),
            self.reference().unwrap_or_default()
        )?;
        if let Some(path) = self.path() {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}
