//! Error types for route declaration, navigation and rendering.
//!
//! Lookup misses are never errors: `RouteTree` answers them with `None`.
//! Everything here is either raised while the route table is being built
//! (and is fatal) or surfaced by the [`Router`](crate::Router) at runtime.

use thiserror::Error;

/// A route table that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("route declaration is missing a path")]
    MissingPath,

    #[error("route `{path}` declares no component, layout or error view")]
    NoView { path: String },

    #[error("route `{path}` declares more than one of component, layout and error")]
    MultipleViews { path: String },

    #[error("alias `{alias}` is already registered for `{existing}`")]
    DuplicateAlias { alias: String, existing: String },

    #[error("`{path}` is already aliased `{existing}`, cannot also alias it `{alias}`")]
    AliasConflict {
        path: String,
        alias: String,
        existing: String,
    },

    #[error("alias `{alias}` is attached to `{path}`, which has no component")]
    AliasOnNonRoute { alias: String, path: String },

    #[error("`*` must be the last segment of `{path}`")]
    MisplacedWildcard { path: String },

    #[error("`{path}` contains a parameter segment without a name")]
    EmptyParamName { path: String },

    #[error("parameter `{name}` already has a {position} validator")]
    DuplicateParam {
        name: String,
        position: &'static str,
    },

    #[error("unknown validator `{kind}` for parameter `{name}`")]
    UnknownValidator { name: String, kind: String },

    #[error("invalid pattern for parameter `{name}`: {reason}")]
    InvalidPattern { name: String, reason: String },
}

/// A route manifest that could not be turned into a route table.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse route manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

/// Failure reported by a [`Presenter`](crate::Presenter) while rendering a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Runtime navigation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("invalid navigation target `{raw}`: {source}")]
    InvalidTarget {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("navigation target `{url}` leaves the current origin")]
    CrossOrigin { url: String },

    #[error("rendering failed with no error view to fall back to: {0}")]
    Render(#[from] RenderError),

    #[error("router has no current location; call `start` first")]
    NotStarted,
}
