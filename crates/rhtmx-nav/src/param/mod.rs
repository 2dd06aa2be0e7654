//! Typed route parameters
//!
//! Every `:name` segment and every query parameter the router is allowed
//! to see is backed by a named validator. Validators are pure functions from
//! the percent-decoded raw string to a [`ParamValue`]; returning `None` means
//! "not in this parameter's domain", which the matcher treats as a non-match.
//!
//! The registry is built once at startup and then shared read-only, so it is
//! passed around explicitly as `Arc<ParamRegistry>` instead of living in a
//! global.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::DeclarationError;

pub mod builtin;

/// Validator for a single parameter
pub type ParamValidator = Arc<dyn Fn(&str) -> Option<ParamValue> + Send + Sync>;

/// Parameter name → typed value, ordered by name
pub type Params = BTreeMap<String, ParamValue>;

/// A parameter value after validation
///
/// # Examples
///
/// ```
/// use rhtmx_nav::ParamValue;
///
/// assert_eq!(ParamValue::from(42).to_string(), "42");
/// assert_eq!(ParamValue::from("draft").as_str(), Some("draft"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    Text(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(value) => Some(*value),
            ParamValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            ParamValue::Uuid(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{}", value),
            ParamValue::Bool(value) => write!(f, "{}", value),
            ParamValue::Uuid(value) => write!(f, "{}", value.hyphenated()),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Uuid> for ParamValue {
    fn from(value: Uuid) -> Self {
        ParamValue::Uuid(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Builds a [`Params`] map from `(name, value)` pairs
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{params, ParamValue};
///
/// let bound = params([("uid", ParamValue::from(9))]);
/// assert_eq!(bound.get("uid").and_then(ParamValue::as_int), Some(9));
/// ```
pub fn params<I, K, T>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<ParamValue>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// Table of path and search parameter validators
#[derive(Clone, Default)]
pub struct ParamRegistry {
    path: HashMap<String, ParamValidator>,
    search: HashMap<String, ParamValidator>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the validator for `:name` path segments
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_nav::{ParamRegistry, ParamValue};
    ///
    /// let mut registry = ParamRegistry::new();
    /// registry
    ///     .add_path_param("uid", |raw| raw.parse::<i64>().ok().map(ParamValue::Int))
    ///     .unwrap();
    ///
    /// assert_eq!(registry.validate_path("uid", "7"), Some(ParamValue::Int(7)));
    /// assert_eq!(registry.validate_path("uid", "seven"), None);
    /// assert!(registry.add_path_param("uid", |_| None).is_err());
    /// ```
    pub fn add_path_param<F>(
        &mut self,
        name: impl Into<String>,
        validator: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(&str) -> Option<ParamValue> + Send + Sync + 'static,
    {
        self.add_path_validator(name, Arc::new(validator))
    }

    /// Registers the validator for the `name` query parameter
    pub fn add_search_param<F>(
        &mut self,
        name: impl Into<String>,
        validator: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(&str) -> Option<ParamValue> + Send + Sync + 'static,
    {
        self.add_search_validator(name, Arc::new(validator))
    }

    /// Registers an already shared path validator (see [`builtin`])
    pub fn add_path_validator(
        &mut self,
        name: impl Into<String>,
        validator: ParamValidator,
    ) -> Result<(), DeclarationError> {
        insert_unique(&mut self.path, name.into(), validator, "path")
    }

    /// Registers an already shared search validator (see [`builtin`])
    pub fn add_search_validator(
        &mut self,
        name: impl Into<String>,
        validator: ParamValidator,
    ) -> Result<(), DeclarationError> {
        insert_unique(&mut self.search, name.into(), validator, "search")
    }

    pub fn path_validator(&self, name: &str) -> Option<&ParamValidator> {
        self.path.get(name)
    }

    pub fn search_validator(&self, name: &str) -> Option<&ParamValidator> {
        self.search.get(name)
    }

    pub fn validate_path(&self, name: &str, raw: &str) -> Option<ParamValue> {
        self.path.get(name).and_then(|validator| validator(raw))
    }

    pub fn validate_search(&self, name: &str, raw: &str) -> Option<ParamValue> {
        self.search.get(name).and_then(|validator| validator(raw))
    }

    /// Parses a query string into typed search parameters
    ///
    /// Accepts the query with or without its leading `?`. Parameters with no
    /// registered validator, and values the validator rejects, are dropped.
    /// When a name repeats, the first accepted value wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_nav::{builtin, ParamRegistry, ParamValue};
    ///
    /// let mut registry = ParamRegistry::new();
    /// registry.add_search_validator("page", builtin::uint()).unwrap();
    ///
    /// let parsed = registry.parse_search("?page=3&utm_source=mail");
    /// assert_eq!(parsed.len(), 1);
    /// assert_eq!(parsed.get("page"), Some(&ParamValue::Int(3)));
    /// ```
    pub fn parse_search(&self, query: &str) -> Params {
        let query = query.strip_prefix('?').unwrap_or(query);

        form_urlencoded::parse(query.as_bytes()).fold(Params::new(), |mut parsed, (name, raw)| {
            if !parsed.contains_key(&*name) {
                if let Some(value) = self.validate_search(&name, &raw) {
                    parsed.insert(name.into_owned(), value);
                }
            }
            parsed
        })
    }

    /// Serializes search parameters into `?a=1&b=2` form (empty for no params)
    pub fn serialize_search(&self, params: &Params) -> String {
        if params.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::from("?"));
        for (name, value) in params {
            serializer.append_pair(name, &value.to_string());
        }
        serializer.finish()
    }

    /// Round-trips a query string through the registry
    ///
    /// Only recognized parameters survive, in name order, with their values
    /// in canonical form.
    pub fn canonical_search(&self, query: &str) -> String {
        self.serialize_search(&self.parse_search(query))
    }
}

impl fmt::Debug for ParamRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path: Vec<&String> = self.path.keys().collect();
        let mut search: Vec<&String> = self.search.keys().collect();
        path.sort();
        search.sort();

        f.debug_struct("ParamRegistry")
            .field("path", &path)
            .field("search", &search)
            .finish()
    }
}

fn insert_unique(
    table: &mut HashMap<String, ParamValidator>,
    name: String,
    validator: ParamValidator,
    position: &'static str,
) -> Result<(), DeclarationError> {
    if table.contains_key(&name) {
        return Err(DeclarationError::DuplicateParam { name, position });
    }
    table.insert(name, validator);
    Ok(())
}
