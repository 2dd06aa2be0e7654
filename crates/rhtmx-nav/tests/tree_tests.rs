//! Integration tests for the route trie
//!
//! Tests are organized by feature area and cover:
//! - Static and typed parameter matching
//! - Wildcard fallbacks
//! - Layout, not-found and error inheritance
//! - Nearest-ancestor lookup
//! - Aliases and path building

use pretty_assertions::assert_eq;
use rhtmx_nav::*;
use rstest::rstest;
use std::sync::Arc;

fn registry() -> Arc<ParamRegistry> {
    let mut registry = ParamRegistry::new();
    registry.add_path_validator("uid", builtin::int()).unwrap();
    registry.add_path_validator("x", builtin::int()).unwrap();
    registry.add_path_validator("slug", builtin::slug()).unwrap();
    registry.add_path_validator("id", builtin::uuid()).unwrap();
    registry
        .add_path_validator("tab", builtin::one_of(["profile", "billing"]))
        .unwrap();
    Arc::new(registry)
}

fn scenario() -> RouteTree<&'static str> {
    let mut tree = RouteTree::new(registry());
    tree.add("/", RouteDefinition::component("Home")).unwrap();
    tree.add("/users/:uid", RouteDefinition::component("User").with_alias("user"))
        .unwrap();
    tree.add("*", RouteDefinition::component("NotFound")).unwrap();
    tree
}

// ============================================================================
// Basic matching
// ============================================================================

#[test]
fn test_scenario() {
    let tree = scenario();

    let home = tree.get_route("/").unwrap();
    assert_eq!(home.component, "Home");
    assert!(home.params.is_empty());

    let user = tree.get_route("/users/9").unwrap();
    assert_eq!(user.component, "User");
    assert_eq!(user.params, params([("uid", 9)]));
    assert_eq!(user.alias.as_deref(), Some("user"));

    let missing = tree.get_route("/missing").unwrap();
    assert_eq!(missing.component, "NotFound");
    assert!(missing.is_fallback());

    assert_eq!(
        tree.get_path_by_alias("user", &params([("uid", 9)])).as_deref(),
        Some("/users/9")
    );
}

#[rstest]
#[case("/")]
#[case("/about")]
#[case("/admin/users")]
#[case("/docs/guide/getting-started")]
fn test_static_paths_round_trip(#[case] path: &str) {
    let mut tree = RouteTree::new(registry());
    tree.add(path, RouteDefinition::component(path)).unwrap();

    let route = tree.get_route(path).unwrap();
    assert_eq!(route.path.as_deref(), Some(path));
    assert!(route.params.is_empty());
    assert_eq!(route.pattern_path, path);
}

#[test]
fn test_trailing_and_double_slashes_are_ignored() {
    let tree = scenario();
    assert_eq!(tree.get_route("/users/9/").unwrap().component, "User");
    assert_eq!(tree.get_route("//users//9").unwrap().component, "User");
}

#[test]
fn test_typed_params() {
    let mut tree = RouteTree::new(registry());
    tree.add("/a/:x/b", RouteDefinition::component("AxB")).unwrap();
    tree.add("/a/*", RouteDefinition::component("AMissing")).unwrap();

    let route = tree.get_route("/a/42/b").unwrap();
    assert_eq!(route.component, "AxB");
    assert_eq!(route.param("x"), Some(&ParamValue::Int(42)));
    assert_ne!(route.param("x"), Some(&ParamValue::Text("42".to_string())));

    assert_eq!(tree.get_route("/a/foo/b").unwrap().component, "AMissing");
}

#[test]
fn test_uuid_and_enum_params() {
    let mut tree = RouteTree::new(registry());
    tree.add("/orders/:id", RouteDefinition::component("Order")).unwrap();
    tree.add("/settings/:tab", RouteDefinition::component("Settings"))
        .unwrap();

    let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    let order = tree.get_route(&format!("/orders/{}", id)).unwrap();
    assert_eq!(
        order.param("id").and_then(ParamValue::as_uuid).map(|u| u.to_string()),
        Some(id.to_string())
    );
    assert!(tree.get_route("/orders/42").is_none());

    assert!(tree.get_route("/settings/billing").is_some());
    assert!(tree.get_route("/settings/danger").is_none());
}

#[test]
fn test_idempotent_add() {
    let mut tree = RouteTree::new(registry());
    tree.add("/admin/users/:uid", RouteDefinition::component("User"))
        .unwrap();
    let shape = tree.len();

    tree.add("/admin/users/:uid", RouteDefinition::component("User"))
        .unwrap();
    assert_eq!(tree.len(), shape);

    let admin = tree.add("/admin", RouteDefinition::new()).unwrap();
    assert_eq!(tree.len(), shape);
    assert_eq!(tree.node(admin).child_count(), 1);
    assert!(!tree.node(admin).is_route());
}

#[test]
fn test_later_declarations_layer() {
    let mut tree = RouteTree::new(registry());
    tree.add("/admin", RouteDefinition::layout("Shell")).unwrap();
    tree.add("/admin", RouteDefinition::component("Dashboard")).unwrap();
    tree.add("/admin", RouteDefinition::error("Oops")).unwrap();

    let route = tree.get_route("/admin").unwrap();
    assert_eq!(route.component, "Dashboard");
    assert_eq!(route.layout, Some("Shell"));
    assert_eq!(route.error, Some("Oops"));
}

// ============================================================================
// Wildcards
// ============================================================================

#[test]
fn test_wildcard_fallback() {
    let mut tree = RouteTree::new(registry());
    tree.add("/admin", RouteDefinition::component("C1")).unwrap();
    tree.add("/admin/*", RouteDefinition::component("C2")).unwrap();

    assert_eq!(tree.get_route("/admin").unwrap().component, "C1");
    assert_eq!(tree.get_route("/admin/foo").unwrap().component, "C2");
    assert_eq!(tree.get_route("/admin/foo/bar").unwrap().component, "C2");
}

#[test]
fn test_nearest_enclosing_wildcard_wins() {
    let mut tree = scenario();
    tree.add("/docs", RouteDefinition::layout("DocsShell")).unwrap();
    tree.add("/docs/intro", RouteDefinition::component("Intro")).unwrap();
    tree.add("/docs/*", RouteDefinition::component("DocsMissing")).unwrap();

    let route = tree.get_route("/docs/outro").unwrap();
    assert_eq!(route.component, "DocsMissing");
    assert_eq!(route.layout, Some("DocsShell"));
    assert_eq!(route.path, None);

    assert_eq!(tree.get_route("/blog/outro").unwrap().component, "NotFound");
}

#[test]
fn test_wildcard_sets_parent_not_found() {
    let tree = scenario();
    let home = tree.get_route("/").unwrap();
    assert_eq!(home.not_found, Some("NotFound"));

    // Inherited by every descendant
    let user = tree.get_route("/users/3").unwrap();
    assert_eq!(user.not_found, Some("NotFound"));
}

#[test]
fn test_no_fallback_without_wildcard() {
    let mut tree = RouteTree::new(registry());
    tree.add("/", RouteDefinition::component("Home")).unwrap();
    assert!(tree.get_route("/missing").is_none());
}

// ============================================================================
// Inheritance
// ============================================================================

#[test]
fn test_layout_inheritance_and_shadowing() {
    let mut tree = RouteTree::new(registry());
    tree.add("/", RouteDefinition::layout("Root")).unwrap();
    tree.add("/admin", RouteDefinition::layout("Admin")).unwrap();
    tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
    tree.add("/admin/reports", RouteDefinition::layout("Reports")).unwrap();
    tree.add("/admin/reports/q1", RouteDefinition::component("Q1")).unwrap();
    tree.add("/about", RouteDefinition::component("About")).unwrap();

    assert_eq!(tree.get_route("/about").unwrap().layout, Some("Root"));
    assert_eq!(tree.get_route("/admin/users").unwrap().layout, Some("Admin"));
    assert_eq!(
        tree.get_route("/admin/reports/q1").unwrap().layout,
        Some("Reports")
    );
}

#[test]
fn test_error_view_inheritance() {
    let mut tree = RouteTree::new(registry());
    tree.add("/admin", RouteDefinition::error("AdminError")).unwrap();
    tree.add("/admin/users/:uid", RouteDefinition::component("User"))
        .unwrap();
    tree.add("/public", RouteDefinition::component("Public")).unwrap();

    assert_eq!(
        tree.get_route("/admin/users/1").unwrap().error,
        Some("AdminError")
    );
    assert_eq!(tree.get_route("/public").unwrap().error, None);
}

#[test]
fn test_routes_are_snapshots() {
    let mut tree = RouteTree::new(registry());
    tree.add("/a", RouteDefinition::component("A")).unwrap();
    let before = tree.get_route("/a").unwrap();

    tree.add("/", RouteDefinition::layout("Late")).unwrap();
    assert_eq!(before.layout, None);
    assert_eq!(tree.get_route("/a").unwrap().layout, Some("Late"));
}

// ============================================================================
// Nearest ancestor
// ============================================================================

#[test]
fn test_nearest_route_drops_undone_params() {
    let mut tree = RouteTree::new(registry());
    tree.add("/admin/users", RouteDefinition::component("Users")).unwrap();
    tree.add("/admin/users/:uid", RouteDefinition::component("User"))
        .unwrap();

    let route = tree.get_nearest_route("/admin/users/7").unwrap();
    assert_eq!(route.pattern_path, "/admin/users");
    assert_eq!(route.param("uid"), None);
    assert_eq!(route.path.as_deref(), Some("/admin/users"));
}

#[test]
fn test_nearest_route_keeps_params_above() {
    let mut tree = RouteTree::new(registry());
    tree.add("/users/:uid", RouteDefinition::component("User")).unwrap();
    tree.add("/users/:uid/posts/:slug", RouteDefinition::component("Post"))
        .unwrap();

    let route = tree.get_nearest_route("/users/3/posts/hello").unwrap();
    assert_eq!(route.component, "User");
    assert_eq!(route.params, params([("uid", 3)]));
    assert_eq!(route.path.as_deref(), Some("/users/3"));
}

#[test]
fn test_nearest_route_of_root() {
    let tree = scenario();
    assert!(tree.get_nearest_route("/").is_none());
}

// ============================================================================
// Aliases
// ============================================================================

#[rstest]
#[case(params([("uid", 1)]))]
#[case(params([("uid", 42)]))]
#[case(params([("uid", -7)]))]
fn test_alias_round_trip(#[case] bound: Params) {
    let tree = scenario();

    let path = tree.get_path_by_alias("user", &bound).unwrap();
    let route = tree.get_route(&path).unwrap();
    assert_eq!(route.alias.as_deref(), Some("user"));
    assert_eq!(route.params, bound);
}

#[test]
fn test_alias_path_requires_exact_params() {
    let tree = scenario();
    assert_eq!(tree.get_path_by_alias("user", &Params::new()), None);
    assert_eq!(
        tree.get_path_by_alias("user", &params([("uid", 1), ("extra", 2)])),
        None
    );
    assert_eq!(tree.get_path_by_alias("nobody", &Params::new()), None);
}

#[test]
fn test_route_by_alias() {
    let tree = scenario();
    let route = tree
        .get_route_by_alias("user", &params([("uid", 5)]))
        .unwrap();
    assert_eq!(route.component, "User");
    assert_eq!(route.path.as_deref(), Some("/users/5"));

    // Unfit params still resolve the route, just without a path
    let route = tree.get_route_by_alias("user", &Params::new()).unwrap();
    assert_eq!(route.path, None);
}

#[test]
fn test_alias_values_are_encoded() {
    let mut registry = ParamRegistry::new();
    registry.add_path_validator("name", builtin::text()).unwrap();

    let mut tree = RouteTree::new(Arc::new(registry));
    tree.add("/tags/:name", RouteDefinition::component("Tag").with_alias("tag"))
        .unwrap();

    let bound = params([("name", "c sharp/.net")]);
    let path = tree.get_path_by_alias("tag", &bound).unwrap();
    assert_eq!(path, "/tags/c%20sharp%2F.net");
    assert_eq!(tree.get_route(&path).unwrap().params, bound);
}

#[test]
fn test_duplicate_alias_is_rejected() {
    let mut tree = scenario();
    let err = tree
        .add("/people/:uid", RouteDefinition::component("Person").with_alias("user"))
        .unwrap_err();
    assert_eq!(
        err,
        DeclarationError::DuplicateAlias {
            alias: "user".to_string(),
            existing: "/users/:uid".to_string(),
        }
    );
    assert_eq!(tree.get_route("/people/1").unwrap().component, "NotFound");
}
