//! The route trie
//!
//! A [`RouteTree`] maps pattern paths such as `/admin/users/:uid` onto view
//! descriptors of an opaque type `V`. It is built once (usually by the
//! [`compiler`](crate::compiler)) and is read-only afterwards.
//!
//! ## Matching
//!
//! Lookup is a single descent that consumes one segment per step:
//!
//! 1. a literal child wins over everything else;
//! 2. otherwise parameter children are tried in declaration order and the
//!    first whose validator accepts the segment binds its typed value;
//! 3. the nearest `*` child seen on the way down is remembered, and returned
//!    when the descent fails or ends on a node that is not a route.
//!
//! A choice made at one depth is never revisited, so matching costs
//! O(segments). Two sibling parameters that accept the same text are
//! disambiguated by declaration order only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::DeclarationError;
use crate::param::{ParamRegistry, Params};
use crate::path;

pub mod node;
pub mod route;

pub use node::{Lineage, NodeId, Segment, SegmentNode};
pub use route::{Route, RouteDefinition};

/// Trie of path segments carrying view descriptors
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rhtmx_nav::{builtin, params, ParamRegistry, ParamValue, RouteDefinition, RouteTree};
///
/// let mut registry = ParamRegistry::new();
/// registry.add_path_validator("uid", builtin::int()).unwrap();
///
/// let mut tree = RouteTree::new(Arc::new(registry));
/// tree.add("/", RouteDefinition::component("Home")).unwrap();
/// tree.add("/users/:uid", RouteDefinition::component("User").with_alias("user")).unwrap();
/// tree.add("*", RouteDefinition::component("NotFound")).unwrap();
///
/// let route = tree.get_route("/users/9").unwrap();
/// assert_eq!(route.component, "User");
/// assert_eq!(route.param("uid"), Some(&ParamValue::Int(9)));
///
/// assert_eq!(tree.get_route("/missing").unwrap().component, "NotFound");
/// assert_eq!(
///     tree.get_path_by_alias("user", &params([("uid", 9)])).as_deref(),
///     Some("/users/9")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RouteTree<V> {
    nodes: Vec<SegmentNode<V>>,
    aliases: HashMap<String, NodeId>,
    registry: Arc<ParamRegistry>,
}

/// Outcome of walking a path down the trie
struct Descent {
    /// Deepest node reached
    node: NodeId,
    /// Whether every segment was consumed
    complete: bool,
    params: Params,
    /// Nearest wildcard seen, with the params bound at that point
    fallback: Option<(NodeId, Params)>,
}

impl<V: Clone> RouteTree<V> {
    pub fn new(registry: Arc<ParamRegistry>) -> Self {
        Self {
            nodes: vec![SegmentNode::root()],
            aliases: HashMap::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<ParamRegistry> {
        &self.registry
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Inserts `path` and attaches the given views to its node
    ///
    /// Segment nodes are reused when they already exist, so adding the same
    /// path twice never duplicates children. Only the views present in
    /// `definition` are written. When the last segment is `*`, the component
    /// also becomes the parent's not-found view.
    ///
    /// Everything is validated before the tree is touched; a failed `add`
    /// leaves the tree as it was.
    pub fn add(
        &mut self,
        path: &str,
        definition: RouteDefinition<V>,
    ) -> Result<NodeId, DeclarationError> {
        let pattern = path::normalize_path(path).into_owned();
        let segments = self.parse_pattern(&pattern)?;
        self.check_alias(&pattern, &segments, &definition)?;

        let id = segments
            .into_iter()
            .fold(NodeId::ROOT, |parent, segment| self.child_or_insert(parent, segment));

        let RouteDefinition {
            component,
            layout,
            error,
            alias,
        } = definition;

        let node = &mut self.nodes[id.0];
        if let Some(layout) = layout {
            node.layout = Some(layout);
        }
        if let Some(error) = error {
            node.error = Some(error);
        }
        if let Some(component) = component {
            if node.is_wildcard() {
                if let Some(parent) = node.parent {
                    self.nodes[parent.0].not_found = Some(component.clone());
                }
            }
            self.nodes[id.0].component = Some(component);
        }
        if let Some(alias) = alias {
            self.nodes[id.0].alias = Some(alias.clone());
            self.aliases.insert(alias, id);
        }

        debug!(pattern = %pattern, alias = ?self.nodes[id.0].alias, "route declared");
        Ok(id)
    }

    fn parse_pattern(&self, pattern: &str) -> Result<Vec<Segment>, DeclarationError> {
        let raw: Vec<&str> = path::segments(pattern).collect();

        raw.iter()
            .enumerate()
            .map(|(index, segment)| match Segment::parse(segment) {
                Segment::Wildcard if index + 1 != raw.len() => {
                    Err(DeclarationError::MisplacedWildcard {
                        path: pattern.to_string(),
                    })
                }
                Segment::Param(name) if name.is_empty() => Err(DeclarationError::EmptyParamName {
                    path: pattern.to_string(),
                }),
                parsed => Ok(parsed),
            })
            .collect()
    }

    fn check_alias(
        &self,
        pattern: &str,
        segments: &[Segment],
        definition: &RouteDefinition<V>,
    ) -> Result<(), DeclarationError> {
        let Some(alias) = &definition.alias else {
            return Ok(());
        };

        let existing = self.find(segments);

        if let Some(&owner) = self.aliases.get(alias) {
            if Some(owner) != existing {
                return Err(DeclarationError::DuplicateAlias {
                    alias: alias.clone(),
                    existing: self.nodes[owner.0].pattern_path.clone(),
                });
            }
        }

        if let Some(current) = existing.and_then(|id| self.nodes[id.0].alias.as_ref()) {
            if current != alias {
                return Err(DeclarationError::AliasConflict {
                    path: pattern.to_string(),
                    alias: alias.clone(),
                    existing: current.clone(),
                });
            }
        }

        let will_be_route = definition.component.is_some()
            || existing.map_or(false, |id| self.nodes[id.0].is_route());
        if !will_be_route {
            return Err(DeclarationError::AliasOnNonRoute {
                alias: alias.clone(),
                path: pattern.to_string(),
            });
        }

        Ok(())
    }

    /// Node for exactly these declared segments, without creating anything
    fn find(&self, segments: &[Segment]) -> Option<NodeId> {
        segments
            .iter()
            .try_fold(NodeId::ROOT, |parent, segment| self.child(parent, segment))
    }

    fn child(&self, parent: NodeId, segment: &Segment) -> Option<NodeId> {
        let node = &self.nodes[parent.0];
        match segment {
            Segment::Root => Some(parent),
            Segment::Literal(text) => node.literals.get(text).copied(),
            Segment::Param(_) => node
                .params
                .iter()
                .copied()
                .find(|&id| &self.nodes[id.0].segment == segment),
            Segment::Wildcard => node.wildcard,
        }
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: Segment) -> NodeId {
        if let Some(existing) = self.child(parent, &segment) {
            return existing;
        }

        if let Segment::Param(name) = &segment {
            if self.registry.path_validator(name).is_none() {
                warn!(
                    param = %name,
                    "path parameter has no registered validator; its segment will never match"
                );
            }
        }

        let id = NodeId(self.nodes.len());
        let parent_pattern = &self.nodes[parent.0].pattern_path;
        let pattern_path = if parent_pattern == "/" {
            format!("/{}", segment)
        } else {
            format!("{}/{}", parent_pattern, segment)
        };

        let parent_node = &mut self.nodes[parent.0];
        match &segment {
            Segment::Literal(text) => {
                parent_node.literals.insert(text.clone(), id);
            }
            Segment::Param(_) => parent_node.params.push(id),
            Segment::Wildcard => parent_node.wildcard = Some(id),
            Segment::Root => unreachable!("root is never parsed from a pattern"),
        }

        self.nodes
            .push(SegmentNode::new(segment, pattern_path, Some(parent)));
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Resolves a concrete path to a route
    ///
    /// Falls back to the nearest enclosing `*` route when the path does not
    /// match exactly; returns `None` when there is no such fallback either.
    pub fn get_route(&self, path: &str) -> Option<Route<V>> {
        let descent = self.descend(path);

        if descent.complete && self.nodes[descent.node.0].is_route() {
            trace!(path, pattern = %self.nodes[descent.node.0].pattern_path, "route matched");
            return self.create_route(descent.node, descent.params);
        }

        let (id, params) = descent.fallback?;
        trace!(path, pattern = %self.nodes[id.0].pattern_path, "falling back to wildcard");
        self.create_route(id, params)
    }

    /// Finds the nearest route strictly above `path`
    ///
    /// Parameters bound by the segments walked back over are dropped from
    /// the result. Wildcard routes are skipped.
    pub fn get_nearest_route(&self, path: &str) -> Option<Route<V>> {
        let Descent {
            node,
            complete,
            mut params,
            ..
        } = self.descend(path);

        // A path that matched completely starts from its parent; one that
        // stopped early is already above the requested location.
        let start = if complete {
            self.unbind(node, &mut params)
        } else {
            Some(node)
        };

        let mut cursor = start;
        while let Some(id) = cursor {
            let candidate = &self.nodes[id.0];
            if candidate.is_route() && !candidate.is_wildcard() {
                return self.create_route(id, params);
            }
            cursor = self.unbind(id, &mut params);
        }
        None
    }

    /// Builds the route registered under `alias` with the given params
    pub fn get_route_by_alias(&self, alias: &str, params: &Params) -> Option<Route<V>> {
        let &id = self.aliases.get(alias)?;
        self.create_route(id, params.clone())
    }

    /// Builds the concrete path of the route registered under `alias`
    ///
    /// Every `:name` segment needs a value in `params`, and every entry in
    /// `params` must be used by some segment.
    pub fn get_path_by_alias(&self, alias: &str, params: &Params) -> Option<String> {
        let &id = self.aliases.get(alias)?;
        build_path(&self.nodes[id.0].pattern_path, params)
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &SegmentNode<V> {
        &self.nodes[id.0]
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no route has been declared at all
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| !node.is_route())
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.aliases.iter().map(|(alias, &id)| (alias.as_str(), id))
    }

    /// The node and its ancestors, nearest first
    pub fn lineage(&self, id: NodeId) -> Lineage<'_, V> {
        Lineage::new(&self.nodes, id)
    }

    pub fn layout_of(&self, id: NodeId) -> Option<&V> {
        self.lineage(id).find_map(|(_, node)| node.layout.as_ref())
    }

    pub fn not_found_of(&self, id: NodeId) -> Option<&V> {
        self.lineage(id).find_map(|(_, node)| node.not_found.as_ref())
    }

    pub fn error_of(&self, id: NodeId) -> Option<&V> {
        self.lineage(id).find_map(|(_, node)| node.error.as_ref())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn descend(&self, path: &str) -> Descent {
        let mut current = NodeId::ROOT;
        let mut params = Params::new();
        let mut fallback = self.nodes[current.0]
            .wildcard
            .map(|id| (id, params.clone()));
        let mut complete = true;

        for raw in path::segments(path) {
            let segment = path::decode_segment(raw);
            let node = &self.nodes[current.0];

            let next = match node.literals.get(segment.as_ref()) {
                Some(&id) => Some(id),
                None => node.params.iter().copied().find(|&id| {
                    let name = self.nodes[id.0].segment.param_name().unwrap_or_default();
                    match self.registry.validate_path(name, &segment) {
                        Some(value) => {
                            params.insert(name.to_string(), value);
                            true
                        }
                        None => false,
                    }
                }),
            };

            let Some(next) = next else {
                complete = false;
                break;
            };

            current = next;
            if let Some(wildcard) = self.nodes[current.0].wildcard {
                fallback = Some((wildcard, params.clone()));
            }
        }

        Descent {
            node: current,
            complete,
            params,
            fallback,
        }
    }

    /// Steps from `id` to its parent, dropping the param `id` bound
    fn unbind(&self, id: NodeId, params: &mut Params) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        if let Some(name) = node.segment.param_name() {
            params.remove(name);
        }
        node.parent
    }

    /// Snapshot of the route at `id`; `None` for container nodes
    fn create_route(&self, id: NodeId, params: Params) -> Option<Route<V>> {
        let node = &self.nodes[id.0];
        let component = node.component.clone()?;
        Some(Route {
            alias: node.alias.clone(),
            path: build_path(&node.pattern_path, &params),
            pattern_path: node.pattern_path.clone(),
            params,
            component,
            layout: self.layout_of(id).cloned(),
            not_found: self.not_found_of(id).cloned(),
            error: self.error_of(id).cloned(),
        })
    }
}

/// Substitutes `params` into `pattern`, requiring an exact fit
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{params, tree::build_path, Params};
///
/// assert_eq!(build_path("/users/:uid", &params([("uid", 9)])).as_deref(), Some("/users/9"));
/// assert_eq!(build_path("/users/:uid", &Params::new()), None);
/// assert_eq!(build_path("/users", &params([("uid", 9)])), None);
/// assert_eq!(build_path("/users/*", &Params::new()), None);
/// ```
pub fn build_path(pattern: &str, params: &Params) -> Option<String> {
    let mut consumed = HashSet::new();
    let mut built = String::new();

    for raw in path::segments(pattern) {
        built.push('/');
        match Segment::parse(raw) {
            Segment::Param(name) => {
                let value = params.get(&name)?;
                built.push_str(&path::encode_segment(&value.to_string()));
                consumed.insert(name);
            }
            Segment::Wildcard => return None,
            _ => built.push_str(raw),
        }
    }

    if consumed.len() != params.len() {
        return None;
    }

    if built.is_empty() {
        built.push('/');
    }
    Some(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{builtin, params, ParamValue};

    fn tree() -> RouteTree<&'static str> {
        let mut registry = ParamRegistry::new();
        registry.add_path_validator("uid", builtin::int()).unwrap();
        registry.add_path_validator("slug", builtin::slug()).unwrap();
        RouteTree::new(Arc::new(registry))
    }

    #[test]
    fn test_pattern_paths() {
        let mut tree = tree();
        let id = tree.add("/admin/users/:uid", RouteDefinition::component("User")).unwrap();
        assert_eq!(tree.node(id).pattern_path(), "/admin/users/:uid");
        assert_eq!(tree.node(tree.root()).pattern_path(), "/");

        let names: Vec<String> = tree
            .lineage(id)
            .map(|(_, node)| node.segment().to_string())
            .collect();
        assert_eq!(names, vec![":uid", "users", "admin", ""]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut tree = tree();
        tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
        let nodes = tree.len();
        tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
        tree.add("admin/users/", RouteDefinition::component("Users")).unwrap();
        assert_eq!(tree.len(), nodes);
        assert_eq!(tree.node(tree.root()).child_count(), 1);
    }

    #[test]
    fn test_failed_add_leaves_tree_untouched() {
        let mut tree = tree();
        let before = tree.len();

        let err = tree
            .add("/a/*/b", RouteDefinition::component("X"))
            .unwrap_err();
        assert!(matches!(err, DeclarationError::MisplacedWildcard { .. }));

        let err = tree
            .add("/a/b", RouteDefinition::layout("L").with_alias("ab"))
            .unwrap_err();
        assert!(matches!(err, DeclarationError::AliasOnNonRoute { .. }));

        let err = tree.add("/a/:", RouteDefinition::component("X")).unwrap_err();
        assert!(matches!(err, DeclarationError::EmptyParamName { .. }));

        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_alias_rules() {
        let mut tree = tree();
        tree.add("/users", RouteDefinition::component("Users").with_alias("users"))
            .unwrap();
        // Same alias on the same node is fine
        tree.add("/users", RouteDefinition::component("Users").with_alias("users"))
            .unwrap();

        let err = tree
            .add("/people", RouteDefinition::component("People").with_alias("users"))
            .unwrap_err();
        assert_eq!(
            err,
            DeclarationError::DuplicateAlias {
                alias: "users".to_string(),
                existing: "/users".to_string()
            }
        );

        // A layout-only declaration may carry an alias once the node is a route
        tree.add("/users", RouteDefinition::layout("Shell").with_alias("users"))
            .unwrap();
    }

    #[test]
    fn test_second_alias_on_a_route_is_rejected() {
        let mut tree = tree();
        tree.add("/users", RouteDefinition::component("Users").with_alias("users"))
            .unwrap();

        let err = tree
            .add("/users", RouteDefinition::layout("Shell").with_alias("people"))
            .unwrap_err();
        assert_eq!(
            err,
            DeclarationError::AliasConflict {
                path: "/users".to_string(),
                alias: "people".to_string(),
                existing: "users".to_string(),
            }
        );

        // The rejected declaration changed nothing
        assert!(tree.get_route_by_alias("people", &Params::new()).is_none());
        let path = tree.get_path_by_alias("users", &Params::new()).unwrap();
        let route = tree.get_route(&path).unwrap();
        assert_eq!(route.alias.as_deref(), Some("users"));
        assert_eq!(route.layout, None);
    }

    #[test]
    fn test_literal_beats_param() {
        let mut tree = tree();
        tree.add("/users/:uid", RouteDefinition::component("User")).unwrap();
        tree.add("/users/new", RouteDefinition::component("NewUser")).unwrap();

        assert_eq!(tree.get_route("/users/new").unwrap().component, "NewUser");
        assert_eq!(tree.get_route("/users/5").unwrap().component, "User");
    }

    #[test]
    fn test_params_tried_in_declaration_order() {
        let mut tree = tree();
        tree.add("/posts/:uid", RouteDefinition::component("ById")).unwrap();
        tree.add("/posts/:slug", RouteDefinition::component("BySlug")).unwrap();

        let by_id = tree.get_route("/posts/12").unwrap();
        assert_eq!(by_id.component, "ById");
        assert_eq!(by_id.param("uid"), Some(&ParamValue::Int(12)));

        let by_slug = tree.get_route("/posts/hello-world").unwrap();
        assert_eq!(by_slug.component, "BySlug");
        assert_eq!(by_slug.params.len(), 1);
    }

    #[test]
    fn test_no_backtracking_across_depths() {
        let mut tree = tree();
        tree.add("/x/:uid/a", RouteDefinition::component("IdA")).unwrap();
        tree.add("/x/:slug/b", RouteDefinition::component("SlugB")).unwrap();

        // "12" is taken by :uid, which has no `b` child
        assert!(tree.get_route("/x/12/b").is_none());
        assert_eq!(tree.get_route("/x/abc/b").unwrap().component, "SlugB");
    }

    #[test]
    fn test_unregistered_param_never_matches() {
        let mut tree = tree();
        tree.add("/tags/:tag", RouteDefinition::component("Tag")).unwrap();
        assert!(tree.get_route("/tags/rust").is_none());
    }

    #[test]
    fn test_segments_are_decoded_before_matching() {
        let mut tree = tree();
        tree.add("/café", RouteDefinition::component("Cafe")).unwrap();
        assert_eq!(tree.get_route("/caf%C3%A9").unwrap().component, "Cafe");
    }

    #[test]
    fn test_container_nodes_are_not_routes() {
        let mut tree = tree();
        tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
        assert!(tree.get_route("/admin").is_none());
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_wildcard_at_terminal_container() {
        let mut tree = tree();
        tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
        tree.add("/admin/*", RouteDefinition::component("AdminMissing")).unwrap();

        let route = tree.get_route("/admin").unwrap();
        assert_eq!(route.component, "AdminMissing");
        assert!(route.is_fallback());
        assert_eq!(route.path, None);
    }

    #[test]
    fn test_wildcard_keeps_params_bound_above_it() {
        let mut tree = tree();
        tree.add("/users/:uid", RouteDefinition::component("User")).unwrap();
        tree.add("/users/:uid/*", RouteDefinition::component("UserMissing")).unwrap();

        let route = tree.get_route("/users/4/nope").unwrap();
        assert_eq!(route.component, "UserMissing");
        assert_eq!(route.params, params([("uid", 4)]));
    }

    #[test]
    fn test_nearest_route_from_partial_descent() {
        let mut tree = tree();
        tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
        tree.add("/admin/users/:uid", RouteDefinition::component("User")).unwrap();

        let route = tree.get_nearest_route("/admin/users/not-a-number").unwrap();
        assert_eq!(route.pattern_path, "/admin/users");
        assert!(route.params.is_empty());

        assert!(tree.get_nearest_route("/admin/users").is_none());
    }

    #[test]
    fn test_nearest_route_skips_wildcards() {
        let mut tree = tree();
        tree.add("/", RouteDefinition::component("Home")).unwrap();
        tree.add("/*", RouteDefinition::component("Missing")).unwrap();
        tree.add("/docs/intro", RouteDefinition::component("Intro")).unwrap();

        let route = tree.get_nearest_route("/docs/intro").unwrap();
        assert_eq!(route.component, "Home");
        assert_eq!(route.path.as_deref(), Some("/"));
    }

    #[test]
    fn test_build_path_encodes_values() {
        let built = build_path("/tags/:tag", &params([("tag", "c sharp")]));
        assert_eq!(built.as_deref(), Some("/tags/c%20sharp"));
        assert_eq!(build_path("/", &Params::new()).as_deref(), Some("/"));
    }
}
