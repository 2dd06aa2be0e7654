//! Route manifests in TOML
//!
//! A manifest declares the parameter validators and the route descriptors
//! of an application in one file:
//!
//! ```toml
//! [path_params]
//! uid = "int"
//! tab = { one_of = ["profile", "billing"] }
//!
//! [search_params]
//! page = "uint"
//! q = { pattern = ".{1,64}" }
//!
//! [[routes]]
//! path = "/"
//! component = "Home"
//!
//! [[routes]]
//! path = "/admin"
//! layout = "AdminShell"
//!
//!   [[routes.children]]
//!   path = "users/:uid"
//!   component = "User"
//!   alias = "user"
//! ```
//!
//! View descriptors are deserialized into whatever `V` the caller picks,
//! typically a `String` naming a component.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::compiler::{compile, RouteDescriptor};
use crate::error::{DeclarationError, ManifestError};
use crate::param::{builtin, ParamRegistry, ParamValidator};
use crate::tree::RouteTree;

/// How a parameter is validated
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValidatorSpec {
    /// One of the [`builtin::by_name`] kinds, e.g. `"int"`
    Builtin(String),
    /// `{ pattern = "..." }`, a fully matched regular expression
    Pattern { pattern: String },
    /// `{ one_of = [...] }`, a fixed set of accepted strings
    OneOf { one_of: Vec<String> },
}

impl ValidatorSpec {
    /// Builds the validator for parameter `name`
    pub fn validator(&self, name: &str) -> Result<ParamValidator, DeclarationError> {
        match self {
            ValidatorSpec::Builtin(kind) => {
                builtin::by_name(kind).ok_or_else(|| DeclarationError::UnknownValidator {
                    name: name.to_string(),
                    kind: kind.clone(),
                })
            }
            ValidatorSpec::Pattern { pattern } => {
                builtin::pattern(pattern).map_err(|e| DeclarationError::InvalidPattern {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            }
            ValidatorSpec::OneOf { one_of } => Ok(builtin::one_of(one_of.iter().cloned())),
        }
    }
}

/// Parsed route manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct RouteManifest<V> {
    #[serde(default)]
    pub path_params: BTreeMap<String, ValidatorSpec>,

    #[serde(default)]
    pub search_params: BTreeMap<String, ValidatorSpec>,

    #[serde(default)]
    pub routes: Vec<RouteDescriptor<V>>,
}

impl<V: DeserializeOwned> RouteManifest<V> {
    /// Parses a manifest from TOML source
    pub fn parse(source: &str) -> std::result::Result<Self, ManifestError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route manifest: {:?}", path))?;

        let manifest = Self::parse(&content)
            .with_context(|| format!("Failed to parse route manifest: {:?}", path))?;

        debug!(path = ?path, routes = manifest.routes.len(), "route manifest loaded");
        Ok(manifest)
    }
}

impl<V: Clone> RouteManifest<V> {
    /// Builds the parameter registry described by the manifest
    pub fn registry(&self) -> std::result::Result<ParamRegistry, DeclarationError> {
        let mut registry = ParamRegistry::new();
        for (name, spec) in &self.path_params {
            registry.add_path_validator(name.as_str(), spec.validator(name)?)?;
        }
        for (name, spec) in &self.search_params {
            registry.add_search_validator(name.as_str(), spec.validator(name)?)?;
        }
        Ok(registry)
    }

    /// Builds the registry and compiles the routes against it
    pub fn build(self) -> std::result::Result<(Arc<ParamRegistry>, RouteTree<V>), DeclarationError> {
        let registry = Arc::new(self.registry()?);
        let tree = compile(self.routes, Arc::clone(&registry))?;
        Ok((registry, tree))
    }
}
