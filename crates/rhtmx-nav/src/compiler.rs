//! Route-declaration compiler
//!
//! Turns a nested list of [`RouteDescriptor`]s into a [`RouteTree`]. Each
//! descriptor carries exactly one view: a `component` makes a route, a
//! `layout` or `error` only decorates the subtree beneath its path. Child
//! paths are relative to their parent's accumulated path.
//!
//! ```
//! use std::sync::Arc;
//! use rhtmx_nav::compiler::{compile, RouteDescriptor};
//! use rhtmx_nav::{builtin, ParamRegistry};
//!
//! let mut registry = ParamRegistry::new();
//! registry.add_path_validator("uid", builtin::int()).unwrap();
//!
//! let tree = compile(
//!     vec![
//!         RouteDescriptor::component("/", "Home"),
//!         RouteDescriptor::layout("/admin", "AdminShell").with_children(vec![
//!             RouteDescriptor::component("users/:uid", "User").with_alias("user"),
//!         ]),
//!     ],
//!     Arc::new(registry),
//! )
//! .unwrap();
//!
//! let route = tree.get_route("/admin/users/3").unwrap();
//! assert_eq!(route.layout, Some("AdminShell"));
//! ```

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::DeclarationError;
use crate::param::ParamRegistry;
use crate::path;
use crate::tree::{RouteDefinition, RouteTree};

/// One declared route, possibly with nested children
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct RouteDescriptor<V> {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub component: Option<V>,

    #[serde(default)]
    pub layout: Option<V>,

    #[serde(default)]
    pub error: Option<V>,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub children: Vec<RouteDescriptor<V>>,
}

impl<V> RouteDescriptor<V> {
    fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            component: None,
            layout: None,
            error: None,
            alias: None,
            children: Vec::new(),
        }
    }

    pub fn component(path: impl Into<String>, view: V) -> Self {
        Self {
            component: Some(view),
            ..Self::at(path)
        }
    }

    pub fn layout(path: impl Into<String>, view: V) -> Self {
        Self {
            layout: Some(view),
            ..Self::at(path)
        }
    }

    pub fn error(path: impl Into<String>, view: V) -> Self {
        Self {
            error: Some(view),
            ..Self::at(path)
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor<V>>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: RouteDescriptor<V>) -> Self {
        self.children.push(child);
        self
    }
}

/// Builds a fresh tree from `descriptors`
pub fn compile<V, I>(
    descriptors: I,
    registry: Arc<ParamRegistry>,
) -> Result<RouteTree<V>, DeclarationError>
where
    V: Clone,
    I: IntoIterator<Item = RouteDescriptor<V>>,
{
    let mut tree = RouteTree::new(registry);
    compile_into(&mut tree, descriptors, "/")?;
    debug!(nodes = tree.len(), "route table compiled");
    Ok(tree)
}

/// Adds `descriptors` to an existing tree beneath `base`
///
/// Descriptors are applied depth-first in declaration order, which is the
/// order parameter siblings are later tried in. Stops at the first invalid
/// descriptor; earlier ones stay applied.
pub fn compile_into<V, I>(
    tree: &mut RouteTree<V>,
    descriptors: I,
    base: &str,
) -> Result<(), DeclarationError>
where
    V: Clone,
    I: IntoIterator<Item = RouteDescriptor<V>>,
{
    for descriptor in descriptors {
        let RouteDescriptor {
            path,
            component,
            layout,
            error,
            alias,
            children,
        } = descriptor;

        let path = path.ok_or(DeclarationError::MissingPath)?;
        let full = path::join(base, &path);

        let views = [component.is_some(), layout.is_some(), error.is_some()]
            .iter()
            .filter(|&&set| set)
            .count();
        match views {
            0 => return Err(DeclarationError::NoView { path: full }),
            1 => {}
            _ => return Err(DeclarationError::MultipleViews { path: full }),
        }

        tree.add(
            &full,
            RouteDefinition {
                component,
                layout,
                error,
                alias,
            },
        )?;

        compile_into(tree, children, &full)?;
    }
    Ok(())
}
