//! Path utilities for validation, normalization and segment handling
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/users/123"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("about")); // Missing leading /
/// assert!(!is_valid_path("/about/")); // Trailing /
/// assert!(!is_valid_path("/about//page")); // Double //
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
///
/// - Missing leading slash: `users` → `/users`
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Backslashes: `\path\to` → `/path/to`
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/admin/users/"), "/admin/users");
/// assert_eq!(normalize_path("admin//users"), "/admin/users");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Iterates the non-empty `/`-delimited segments of a path
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::segments;
///
/// let parts: Vec<&str> = segments("/admin/users/:uid").collect();
/// assert_eq!(parts, vec!["admin", "users", ":uid"]);
/// assert_eq!(segments("/").count(), 0);
/// ```
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Joins a child path onto its parent's accumulated path
///
/// Child paths are always relative, a leading slash on the child is ignored.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::join;
///
/// assert_eq!(join("/admin", "users/:uid"), "/admin/users/:uid");
/// assert_eq!(join("/admin", "/"), "/admin");
/// assert_eq!(join("/", "*"), "/*");
/// ```
pub fn join(parent: &str, child: &str) -> String {
    normalize_path(&format!("{}/{}", parent, child)).into_owned()
}

/// Percent-decodes a raw path segment
///
/// Segments that do not decode to valid UTF-8 are returned untouched.
pub fn decode_segment(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Percent-encodes a value so it can stand as a single path segment
pub fn encode_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/about"));
        assert!(is_valid_path("/users/:uid"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("about"));
        assert!(!is_valid_path("/about/"));
        assert!(!is_valid_path("/about//page"));
        assert!(!is_valid_path("/about\\page"));
    }

    #[test]
    fn test_normalize_path_valid() {
        let path = normalize_path("/about");
        assert!(matches!(path, Cow::Borrowed("/about")));

        let path = normalize_path("/");
        assert!(matches!(path, Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_mistakes() {
        assert_eq!(normalize_path("/users/123/"), "/users/123");
        assert_eq!(normalize_path("/path///to////page"), "/path/to/page");
        assert_eq!(normalize_path("\\users\\123"), "/users/123");
        assert_eq!(normalize_path("users"), "/users");
        assert_eq!(normalize_path("//"), "/");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "/"), "/");
        assert_eq!(join("/", "users"), "/users");
        assert_eq!(join("/admin/", "/users/"), "/admin/users");
        assert_eq!(join("/admin", ""), "/admin");
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("plain"), "plain");
        assert_eq!(decode_segment("caf%C3%A9"), "café");
        assert_eq!(decode_segment("a%20b"), "a b");
        // Invalid UTF-8 stays as it was
        assert_eq!(decode_segment("%FF"), "%FF");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_segment("42"), "42");
    }
}
