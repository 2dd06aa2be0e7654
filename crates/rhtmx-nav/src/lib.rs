//! # RHTMX Nav
//!
//! Client-side navigation for RHTMX applications:
//! - Static routes (`/about`)
//! - Typed parameters (`/users/:uid` binds `uid` as an integer)
//! - Typed search parameters (`?page=2`)
//! - Not-found fallbacks (`/admin/*`)
//! - Inherited layouts, not-found and error views
//! - Route aliases and path building
//! - History and link interception through a [`NavigationHost`]
//!
//! ## Structure
//!
//! Route declarations are compiled once into a [`RouteTree`], a trie of path
//! segments. Matching is a single descent with no backtracking. The tree is
//! generic over the view descriptor `V`, which it stores, clones and returns
//! but never inspects.
//!
//! The [`Router`] sits on top of the tree. It tracks the current
//! [`Location`] and [`Route`], writes history entries through the host and
//! asks a [`Presenter`] to render the selected views.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rhtmx_nav::{builtin, ParamRegistry, ParamValue, RouteDefinition, RouteTree};
//!
//! let mut registry = ParamRegistry::new();
//! registry.add_path_validator("uid", builtin::int()).unwrap();
//!
//! let mut tree = RouteTree::new(Arc::new(registry));
//! tree.add("/admin", RouteDefinition::layout("AdminShell")).unwrap();
//! tree.add("/admin/users/:uid", RouteDefinition::component("User")).unwrap();
//!
//! let route = tree.get_route("/admin/users/42").unwrap();
//! assert_eq!(route.param("uid"), Some(&ParamValue::Int(42)));
//! assert_eq!(route.layout, Some("AdminShell"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod compiler;
mod error;
mod host;
mod location;
pub mod manifest;
mod param;
pub mod path;
mod router;
mod target;
pub mod tree;

// ============================================================================
// Re-exports
// ============================================================================

pub use compiler::{compile, RouteDescriptor};
pub use error::{DeclarationError, ManifestError, NavError, RenderError};
pub use host::{
    Disposition, EventKind, HostEvent, LinkActivation, MemoryHost, Modifiers, NavigationHost,
};
pub use location::Location;
pub use manifest::{RouteManifest, ValidatorSpec};
pub use param::{builtin, params, ParamRegistry, ParamValidator, ParamValue, Params};
pub use router::{
    ActiveView, AliasLink, NavigateOptions, Navigation, Presenter, Router, ViewChain,
};
pub use target::Target;
pub use tree::{Lineage, NodeId, Route, RouteDefinition, RouteTree, Segment, SegmentNode};
