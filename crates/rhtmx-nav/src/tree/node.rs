//! Trie nodes and the segments that label them
//!
//! Nodes live in an arena owned by [`RouteTree`](super::RouteTree) and refer
//! to each other by [`NodeId`]. The `parent` index is a plain back-reference
//! used for attribute inheritance and for walking up to an ancestor route.

use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);
}

/// One segment of a pattern path
///
/// # Examples
///
/// ```
/// use rhtmx_nav::Segment;
///
/// assert_eq!(Segment::parse("users"), Segment::Literal("users".to_string()));
/// assert_eq!(Segment::parse(":uid"), Segment::Param("uid".to_string()));
/// assert_eq!(Segment::parse("*"), Segment::Wildcard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The tree's root, pattern `/`
    Root,
    /// Matches exactly this text
    Literal(String),
    /// `:name`, matches whatever the `name` validator accepts
    Param(String),
    /// `*`, the not-found fallback of its parent
    Wildcard,
}

impl Segment {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "*" => Segment::Wildcard,
            _ => match raw.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(raw.to_string()),
            },
        }
    }

    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Param(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Root => Ok(()),
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Wildcard => f.write_str("*"),
        }
    }
}

/// A node of the route trie
///
/// `component` is the node's default view; a node without one is only a
/// container for deeper segments. `layout`, `not_found` and `error` are
/// inheritable: when unset here they come from the nearest ancestor that
/// sets them (see [`RouteTree::layout_of`](super::RouteTree::layout_of)).
#[derive(Debug, Clone)]
pub struct SegmentNode<V> {
    pub(crate) segment: Segment,
    pub(crate) pattern_path: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) literals: HashMap<String, NodeId>,
    pub(crate) params: Vec<NodeId>,
    pub(crate) wildcard: Option<NodeId>,
    pub(crate) component: Option<V>,
    pub(crate) layout: Option<V>,
    pub(crate) not_found: Option<V>,
    pub(crate) error: Option<V>,
    pub(crate) alias: Option<String>,
}

impl<V> SegmentNode<V> {
    pub(crate) fn root() -> Self {
        Self::new(Segment::Root, "/".to_string(), None)
    }

    pub(crate) fn new(segment: Segment, pattern_path: String, parent: Option<NodeId>) -> Self {
        Self {
            segment,
            pattern_path,
            parent,
            literals: HashMap::new(),
            params: Vec::new(),
            wildcard: None,
            component: None,
            layout: None,
            not_found: None,
            error: None,
            alias: None,
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn pattern_path(&self) -> &str {
        &self.pattern_path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The node's own default view, never inherited
    pub fn component(&self) -> Option<&V> {
        self.component.as_ref()
    }

    /// A node is a route iff it has a default view
    pub fn is_route(&self) -> bool {
        self.component.is_some()
    }

    pub fn is_wildcard(&self) -> bool {
        self.segment.is_wildcard()
    }

    /// Number of direct children (literal, parameter and wildcard)
    pub fn child_count(&self) -> usize {
        self.literals.len() + self.params.len() + usize::from(self.wildcard.is_some())
    }
}

/// Lazy iterator over a node and its ancestors, nearest first
///
/// For the node of `/admin/users/:uid` it yields `:uid` → `users` → `admin`
/// → root, and stops as soon as the caller has what it needs.
pub struct Lineage<'a, V> {
    nodes: &'a [SegmentNode<V>],
    current: Option<NodeId>,
}

impl<'a, V> Lineage<'a, V> {
    pub(crate) fn new(nodes: &'a [SegmentNode<V>], start: NodeId) -> Self {
        Self {
            nodes,
            current: Some(start),
        }
    }
}

impl<'a, V> Iterator for Lineage<'a, V> {
    type Item = (NodeId, &'a SegmentNode<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = &self.nodes[id.0];
        self.current = node.parent;
        Some((id, node))
    }
}

impl<'a, V> Clone for Lineage<'a, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            current: self.current,
        }
    }
}
