//! Function names.

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, ops::Deref};

/// The unique key of one dispatch slot.
///
/// Names are compared by their exact string content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionName(String);

impl FunctionName {
    /// Create a new function name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for FunctionName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for FunctionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FunctionName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for FunctionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&String> for FunctionName {
    fn from(name: &String) -> Self {
        Self(name.clone())
    }
}

impl From<&FunctionName> for FunctionName {
    fn from(name: &FunctionName) -> Self {
        name.clone()
    }
}
