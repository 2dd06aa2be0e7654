use crate::param::{ParamValue, Params};

/// Result of resolving a path or alias against a [`RouteTree`](super::RouteTree)
///
/// Everything is copied out of the tree when the route is built, so a route
/// that has already been rendered never changes underneath its holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<V> {
    /// Alias of the matched node, if it has one
    pub alias: Option<String>,
    /// Concrete path, or `None` when the pattern cannot be rebuilt from `params`
    pub path: Option<String>,
    /// Pattern of the matched node, e.g. `/admin/users/:uid`
    pub pattern_path: String,
    /// Typed parameters bound while resolving
    pub params: Params,
    /// Default view of the matched node
    pub component: V,
    /// Nearest layout, inherited from ancestors
    pub layout: Option<V>,
    /// Nearest not-found view, inherited from ancestors
    pub not_found: Option<V>,
    /// Nearest error view, inherited from ancestors
    pub error: Option<V>,
}

impl<V> Route<V> {
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Whether this route is a `*` fallback rather than an exact match
    pub fn is_fallback(&self) -> bool {
        self.pattern_path.ends_with("/*")
    }
}

/// What [`RouteTree::add`](super::RouteTree::add) attaches to a node
///
/// Only the views that are `Some` are written; `None` never clears a value an
/// earlier declaration set, so declarations can be layered on one path.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::RouteDefinition;
///
/// let definition = RouteDefinition::component("UserPage")
///     .with_layout("AdminShell")
///     .with_alias("user");
///
/// assert_eq!(definition.component, Some("UserPage"));
/// assert_eq!(definition.alias.as_deref(), Some("user"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition<V> {
    pub component: Option<V>,
    pub layout: Option<V>,
    pub error: Option<V>,
    pub alias: Option<String>,
}

impl<V> RouteDefinition<V> {
    pub fn new() -> Self {
        Self {
            component: None,
            layout: None,
            error: None,
            alias: None,
        }
    }

    pub fn component(view: V) -> Self {
        Self::new().with_component(view)
    }

    pub fn layout(view: V) -> Self {
        Self::new().with_layout(view)
    }

    pub fn error(view: V) -> Self {
        Self::new().with_error(view)
    }

    pub fn with_component(mut self, view: V) -> Self {
        self.component = Some(view);
        self
    }

    pub fn with_layout(mut self, view: V) -> Self {
        self.layout = Some(view);
        self
    }

    pub fn with_error(mut self, view: V) -> Self {
        self.error = Some(view);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl<V> Default for RouteDefinition<V> {
    fn default() -> Self {
        Self::new()
    }
}
