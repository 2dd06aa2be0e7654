//! Navigation targets: a canonical `path` + `search` + `hash` triple.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::NavError;
use crate::param::ParamRegistry;
use crate::path::normalize_path;

/// Origin used when a target is resolved without a real document URL.
const DETACHED_ORIGIN: &str = "http://rhtmx.invalid";

/// Where a navigation goes
///
/// `path` always starts with `/` and has no trailing slash except for the
/// root. `search` is empty or starts with `?`, `hash` is empty or starts with
/// `#`. Two targets are equal exactly when their canonical strings are.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::Target;
///
/// let target = Target::parse("/admin/users/?page=2#top");
/// assert_eq!(target.path(), "/admin/users");
/// assert_eq!(target.search(), "?page=2");
/// assert_eq!(target.hash(), "#top");
/// assert_eq!(target.to_string(), "/admin/users?page=2#top");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    path: String,
    search: String,
    hash: String,
}

impl Target {
    /// Builds a target from its parts, normalizing each one
    pub fn new(path: &str, search: &str, hash: &str) -> Self {
        Self {
            path: normalize_path(path).into_owned(),
            search: prefixed('?', search),
            hash: prefixed('#', hash),
        }
    }

    /// Parses a literal target string
    ///
    /// The fragment starts at the first `#`, the query at the first `?`
    /// before it. Both are optional.
    ///
    /// This is the URL standard's split, the same one [`Target::from_url`]
    /// gets from [`Url`]. A `?` after the `#` belongs to the fragment, so
    /// `/a#h?x=1` has no search and the hash `#h?x=1`.
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = raw.split_once('#').unwrap_or((raw, ""));
        let (path, search) = rest.split_once('?').unwrap_or((rest, ""));
        Self::new(path, search, hash)
    }

    /// Extracts the target of a fully resolved URL
    ///
    /// The query string is round-tripped through the registry, so only
    /// recognized search parameters survive, in canonical form.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_nav::{builtin, ParamRegistry, Target};
    /// use url::Url;
    ///
    /// let mut registry = ParamRegistry::new();
    /// registry.add_search_validator("page", builtin::uint()).unwrap();
    ///
    /// let url = Url::parse("https://app.test/users/?page=02&utm=x#list").unwrap();
    /// let target = Target::from_url(&url, &registry);
    /// assert_eq!(target.to_string(), "/users?page=2#list");
    /// ```
    pub fn from_url(url: &Url, registry: &ParamRegistry) -> Self {
        Self {
            path: normalize_path(url.path()).into_owned(),
            search: registry.canonical_search(url.query().unwrap_or("")),
            hash: prefixed('#', url.fragment().unwrap_or("")),
        }
    }

    /// Resolves `raw` relative to `base`
    ///
    /// Absolute paths replace the base path. Relative paths resolve beneath
    /// the base path, as if it were a directory, with `.` and `..` handled
    /// the usual way. A bare `?query` or `#fragment` keeps the base path.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_nav::Target;
    ///
    /// let base = Target::parse("/admin/users?page=2");
    /// assert_eq!(Target::resolve("7", &base).unwrap().to_string(), "/admin/users/7");
    /// assert_eq!(Target::resolve("..", &base).unwrap().to_string(), "/admin");
    /// assert_eq!(Target::resolve("/login", &base).unwrap().to_string(), "/login");
    /// assert_eq!(Target::resolve("?page=3", &base).unwrap().to_string(), "/admin/users?page=3");
    /// ```
    pub fn resolve(raw: &str, base: &Target) -> Result<Self, NavError> {
        let origin = Url::parse(DETACHED_ORIGIN).map_err(|source| NavError::InvalidTarget {
            raw: raw.to_string(),
            source,
        })?;
        let resolved = base.join(raw, &origin)?;
        Ok(Self::new(
            resolved.path(),
            resolved.query().unwrap_or(""),
            resolved.fragment().unwrap_or(""),
        ))
    }

    /// Resolves `raw` against this target under `origin`
    ///
    /// Fails when `raw` does not parse or names a different origin.
    pub(crate) fn join(&self, raw: &str, origin: &Url) -> Result<Url, NavError> {
        let invalid = |source| NavError::InvalidTarget {
            raw: raw.to_string(),
            source,
        };

        let directory = if self.path.ends_with('/') {
            self.path.clone()
        } else {
            format!("{}/", self.path)
        };
        let base = origin
            .join(&format!("{}{}", directory, self.search))
            .map_err(invalid)?;
        let resolved = base.join(raw).map_err(invalid)?;

        if resolved.origin() != origin.origin() {
            return Err(NavError::CrossOrigin {
                url: resolved.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Absolute URL of this target under `origin`
    pub fn to_url(&self, origin: &Url) -> Result<Url, url::ParseError> {
        origin.join(&self.to_string())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = prefixed('?', search);
        self
    }

    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = prefixed('#', hash);
        self
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, self.search, self.hash)
    }
}

/// `"x"`, `"?x"` → `"?x"`; `""`, `"?"` → `""`
fn prefixed(marker: char, part: &str) -> String {
    let body = part.strip_prefix(marker).unwrap_or(part);
    if body.is_empty() {
        String::new()
    } else {
        format!("{}{}", marker, body)
    }
}
