//! Resource identities, kinds and configuration payloads.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// The dedup key of an injected resource.
///
/// External scripts are identified by their URL, inline code by an opaque tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceIdentity {
    /// Source location of an external script or stylesheet.
    Url(String),
    /// Opaque identifier of an inline code resource.
    Tag(String),
}

impl ResourceIdentity {
    /// Identity for an external resource.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Identity for an inline code resource.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Tag(s) => s,
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The execution type attached to an injected script.
///
/// Only the variants of this enum are accepted; any other tag is rejected
/// with [`LoadError::InvalidKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceKind {
    /// Full interpreter.
    Py,
    /// Lightweight interpreter.
    #[default]
    Mpy,
    /// Game-oriented interpreter.
    PyGame,
}

impl ResourceKind {
    /// The allow-list, in declaration order.
    pub const SUPPORTED: &'static [&'static str] = &["py", "mpy", "py-game"];

    /// The tag written into the element's type attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Py => "py",
            Self::Mpy => "mpy",
            Self::PyGame => "py-game",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "py" => Ok(Self::Py),
            "mpy" => Ok(Self::Mpy),
            "py-game" => Ok(Self::PyGame),
            other => Err(LoadError::InvalidKind {
                kind: other.to_owned(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

impl TryFrom<&str> for ResourceKind {
    type Error = LoadError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&String> for ResourceKind {
    type Error = LoadError;

    fn try_from(s: &String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = LoadError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Configuration attached to an injected resource.
///
/// The payload is handed to the resource's runtime untouched: structured
/// values are JSON-stringified, raw strings pass through as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigPayload {
    /// Pre-serialized configuration text.
    Raw(String),
    /// Structured configuration, stringified on injection.
    Structured(Value),
}

impl ConfigPayload {
    /// An empty structured payload (`{}`).
    pub fn empty() -> Self {
        Self::Structured(Value::Object(serde_json::Map::new()))
    }

    /// The text attached to the element.
    pub fn to_attribute(&self) -> Result<String, LoadError> {
        match self {
            Self::Raw(s) => Ok(s.clone()),
            Self::Structured(v) => serde_json::to_string(v).map_err(LoadError::Config),
        }
    }
}

impl Default for ConfigPayload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for ConfigPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Raw(s),
            other => Self::Structured(other),
        }
    }
}

impl From<String> for ConfigPayload {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for ConfigPayload {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}
