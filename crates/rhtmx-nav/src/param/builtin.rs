//! Ready-made parameter validators
//!
//! These cover the usual parameter kinds (`int`, `uuid`, `slug`, ...) so that
//! route manifests can refer to them by name. Each function returns a fresh
//! shared [`ParamValidator`].

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::{ParamValidator, ParamValue};

static SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

/// Signed 64-bit integers: `42`, `-7`
pub fn int() -> ParamValidator {
    Arc::new(|raw: &str| raw.parse::<i64>().ok().map(ParamValue::Int))
}

/// Non-negative integers: `0`, `42`
pub fn uint() -> ParamValidator {
    Arc::new(|raw: &str| {
        raw.parse::<i64>()
            .ok()
            .filter(|value| *value >= 0)
            .map(ParamValue::Int)
    })
}

/// Finite floating point numbers
pub fn float() -> ParamValidator {
    Arc::new(|raw: &str| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(ParamValue::Float)
    })
}

/// `true`/`false`/`1`/`0`
pub fn boolean() -> ParamValidator {
    Arc::new(|raw: &str| match raw {
        "true" | "1" => Some(ParamValue::Bool(true)),
        "false" | "0" => Some(ParamValue::Bool(false)),
        _ => None,
    })
}

/// Any non-empty string
pub fn text() -> ParamValidator {
    Arc::new(|raw: &str| (!raw.is_empty()).then(|| ParamValue::Text(raw.to_string())))
}

/// ASCII letters only
pub fn alpha() -> ParamValidator {
    chars_matching(|c| c.is_ascii_alphabetic())
}

/// ASCII letters and digits only
pub fn alphanum() -> ParamValidator {
    chars_matching(|c| c.is_ascii_alphanumeric())
}

/// Lowercase words separated by single hyphens: `hello-world-2`
pub fn slug() -> ParamValidator {
    Arc::new(|raw: &str| SLUG.is_match(raw).then(|| ParamValue::Text(raw.to_string())))
}

/// UUIDs in any textual form accepted by `uuid`
pub fn uuid() -> ParamValidator {
    Arc::new(|raw: &str| Uuid::parse_str(raw).ok().map(ParamValue::Uuid))
}

/// One of a fixed set of strings
///
/// # Examples
///
/// ```
/// use rhtmx_nav::builtin;
///
/// let tab = builtin::one_of(["profile", "security"]);
/// assert!(tab("profile").is_some());
/// assert!(tab("billing").is_none());
/// ```
pub fn one_of<I, S>(values: I) -> ParamValidator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = values.into_iter().map(Into::into).collect();
    Arc::new(move |raw: &str| {
        allowed
            .iter()
            .any(|candidate| candidate == raw)
            .then(|| ParamValue::Text(raw.to_string()))
    })
}

/// Strings fully matching a regular expression
///
/// The expression is anchored on both ends, so `[a-z]+` does not accept
/// `abc1`.
pub fn pattern(expression: &str) -> Result<ParamValidator, regex::Error> {
    let anchored = Regex::new(&format!("^(?:{})$", expression))?;
    Ok(Arc::new(move |raw: &str| {
        anchored
            .is_match(raw)
            .then(|| ParamValue::Text(raw.to_string()))
    }))
}

/// Looks a validator up by the name used in route manifests
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{builtin, ParamValue};
///
/// let validator = builtin::by_name("int").unwrap();
/// assert_eq!(validator("12"), Some(ParamValue::Int(12)));
/// assert!(builtin::by_name("decimal").is_none());
/// ```
pub fn by_name(kind: &str) -> Option<ParamValidator> {
    let validator = match kind {
        "int" => int(),
        "uint" => uint(),
        "float" => float(),
        "bool" => boolean(),
        "string" => text(),
        "alpha" => alpha(),
        "alphanum" => alphanum(),
        "slug" => slug(),
        "uuid" => uuid(),
        _ => return None,
    };
    Some(validator)
}

fn chars_matching(predicate: fn(char) -> bool) -> ParamValidator {
    Arc::new(move |raw: &str| {
        (!raw.is_empty() && raw.chars().all(predicate)).then(|| ParamValue::Text(raw.to_string()))
    })
}
