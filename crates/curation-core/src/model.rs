//! Object model shared between tasks and the host repository.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurationError;

/// Opaque persistent identifier of a repository object, e.g. `10568/97088`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Create a handle from any string-like value.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Borrow the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A metadata field key in `schema.element[.qualifier]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataField {
    pub schema: String,
    pub element: String,
    pub qualifier: Option<String>,
}

impl MetadataField {
    /// Create a field with a qualifier.
    pub fn new(
        schema: impl Into<String>,
        element: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            element: element.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Create an unqualified field.
    pub fn unqualified(schema: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            element: element.into(),
            qualifier: None,
        }
    }

    /// Split a known-good dotted key without validating it.
    ///
    /// Meant for compiled-in defaults; use `parse` for anything read at runtime.
    pub fn from_dotted(key: &str) -> Self {
        let mut parts = key.splitn(3, '.');
        Self {
            schema: parts.next().unwrap_or_default().to_string(),
            element: parts.next().unwrap_or_default().to_string(),
            qualifier: parts.next().map(str::to_string),
        }
    }
}

impl FromStr for MetadataField {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(CurationError::InvalidField(s.to_string()));
        }

        match parts.as_slice() {
            [schema, element] => Ok(Self::unqualified(*schema, *element)),
            [schema, element, qualifier] => Ok(Self::new(*schema, *element, *qualifier)),
            _ => Err(CurationError::InvalidField(s.to_string())),
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}.{}.{}", self.schema, self.element, qualifier),
            None => write!(f, "{}.{}", self.schema, self.element),
        }
    }
}

/// The named bundle a bitstream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BundleRole {
    /// Files as deposited.
    Original,
    /// Derived preview images.
    Thumbnail,
}

impl BundleRole {
    /// The bundle name used by the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleRole::Original => "ORIGINAL",
            BundleRole::Thumbnail => "THUMBNAIL",
        }
    }
}

impl fmt::Display for BundleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored file attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitstream {
    /// Host identifier, stable across bundles.
    pub id: String,
    /// File name.
    pub name: String,
    /// Free-text description, used as a tag by thumbnail generators.
    #[serde(default)]
    pub description: Option<String>,
    /// MIME type as reported by the host's format registry.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl Bitstream {
    /// Create a bitstream without a description.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The description, or `None` if it is missing or empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// What a handle resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedObject {
    Site,
    Community(Handle),
    Collection(Handle),
    Item(Handle),
}
