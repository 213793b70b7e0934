//! # Runtime Manifest
//!
//! The static description of what a page must load and expose.
//!
//! A manifest is produced ahead of time by a server-side builder and executed
//! once at page load by [`Bootstrap`]. It carries, in order:
//!
//! - the pinned [`BaseRuntime`] version
//! - the resources to inject ([`ResourceEntry`])
//! - the function names to expose
//!
//! Insertion order is preserved everywhere; it decides the order in which
//! resources start loading.
//!
//! [`Bootstrap`]: crate::Bootstrap

use pyscall_core::{ConfigPayload, FunctionName, LoadError, ManifestError, ResourceKind};
use serde::{Deserialize, Serialize};

/// Base runtime version baked into generated manifests.
pub const DEFAULT_RUNTIME_VERSION: &str = "2025.5.1";

const RUNTIME_RELEASES: &str = "https://pyscript.net/releases";

/// The version-pinned interpreter runtime loaded before any resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRuntime {
    /// Release version.
    pub version: String,
}

impl BaseRuntime {
    /// Pin a specific release.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Location of the runtime's module script.
    pub fn script_url(&self) -> String {
        format!("{RUNTIME_RELEASES}/{}/core.js", self.version)
    }

    /// Location of the runtime's stylesheet.
    pub fn stylesheet_url(&self) -> String {
        format!("{RUNTIME_RELEASES}/{}/core.css", self.version)
    }
}

impl Default for BaseRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME_VERSION)
    }
}

fn default_kind() -> String {
    ResourceKind::default().as_str().to_owned()
}

/// One resource injection request.
///
/// `kind` stays a raw tag here so that an invalid tag is reported by
/// [`RuntimeManifest::validate`] rather than at parse time. An entry carrying
/// fields of both variants matches neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum ResourceEntry {
    /// An external script.
    Script {
        /// Source location, also the dedup identity.
        src: String,
        /// Configuration handed to the script's runtime.
        #[serde(default)]
        config: ConfigPayload,
        /// Execution type tag.
        #[serde(default = "default_kind")]
        kind: String,
    },
    /// Inline code.
    Code {
        /// Script body.
        code: String,
        /// Opaque dedup identity.
        id: String,
        /// Configuration handed to the code's runtime.
        #[serde(default)]
        config: ConfigPayload,
        /// Execution type tag.
        #[serde(default = "default_kind")]
        kind: String,
    },
}

impl ResourceEntry {
    /// The entry's kind tag.
    pub fn kind(&self) -> &str {
        match self {
            Self::Script { kind, .. } | Self::Code { kind, .. } => kind,
        }
    }

    fn check_fields(&self) -> Result<(), ManifestError> {
        match self {
            Self::Script { src, .. } if src.is_empty() => Err(ManifestError::MissingField("src")),
            Self::Code { id, .. } if id.is_empty() => Err(ManifestError::MissingField("id")),
            _ => Ok(()),
        }
    }
}

/// Everything a page bootstrap needs, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeManifest {
    /// Pinned base runtime.
    #[serde(default)]
    pub runtime: BaseRuntime,
    /// Resources to inject.
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
    /// Function names to expose.
    #[serde(default)]
    pub functions: Vec<FunctionName>,
}

impl RuntimeManifest {
    /// Start building a manifest.
    pub fn builder() -> RuntimeManifestBuilder {
        RuntimeManifestBuilder::default()
    }

    /// Parse a generated manifest payload.
    pub fn from_json(payload: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(payload).map_err(ManifestError::Parse)?;
        manifest.check_shape()?;
        Ok(manifest)
    }

    /// Serialize the manifest as a payload.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        serde_json::to_string(self).map_err(ManifestError::Serialize)
    }

    /// Check every resource kind against the allow-list.
    ///
    /// This touches no document; it lets a producer catch a bad tag before
    /// shipping the manifest.
    pub fn validate(&self) -> Result<(), LoadError> {
        for entry in &self.resources {
            ResourceKind::try_from(entry.kind())?;
        }
        Ok(())
    }

    fn check_shape(&self) -> Result<(), ManifestError> {
        if self.functions.iter().any(FunctionName::is_empty) {
            return Err(ManifestError::EmptyName);
        }
        self.resources.iter().try_for_each(ResourceEntry::check_fields)
    }
}

/// Builder for [`RuntimeManifest`].
#[derive(Debug, Default)]
pub struct RuntimeManifestBuilder {
    manifest: RuntimeManifest,
}

impl RuntimeManifestBuilder {
    /// Pin the base runtime version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.manifest.runtime = BaseRuntime::new(version);
        self
    }

    /// Add an external script.
    pub fn script(
        mut self,
        src: impl Into<String>,
        config: impl Into<ConfigPayload>,
        kind: impl Into<String>,
    ) -> Self {
        self.manifest.resources.push(ResourceEntry::Script {
            src: src.into(),
            config: config.into(),
            kind: kind.into(),
        });
        self
    }

    /// Add inline code.
    pub fn code(
        mut self,
        code: impl Into<String>,
        id: impl Into<String>,
        config: impl Into<ConfigPayload>,
        kind: impl Into<String>,
    ) -> Self {
        self.manifest.resources.push(ResourceEntry::Code {
            code: code.into(),
            id: id.into(),
            config: config.into(),
            kind: kind.into(),
        });
        self
    }

    /// Declare a function name.
    pub fn function(mut self, name: impl Into<FunctionName>) -> Self {
        self.manifest.functions.push(name.into());
        self
    }

    /// Declare several function names.
    pub fn functions<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FunctionName>,
    {
        self.manifest
            .functions
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Build the manifest.
    pub fn build(self) -> Result<RuntimeManifest, ManifestError> {
        self.manifest.check_shape()?;
        Ok(self.manifest)
    }
}
