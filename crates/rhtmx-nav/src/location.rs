//! The resolved location: a [`Target`] plus the typed parameters bound to it.

use std::fmt;

use serde::Serialize;

use crate::param::{ParamRegistry, ParamValue, Params};
use crate::target::Target;
use crate::tree::Route;

/// Current location as seen by consumers of the router
///
/// Recomputed on every navigation. Path parameters come from the matched
/// route; search parameters are parsed from the target's query, and entries
/// without a registered validator are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    target: Target,
    path_params: Params,
    search_params: Params,
}

impl Location {
    pub fn new<V>(target: Target, route: &Route<V>, registry: &ParamRegistry) -> Self {
        let search_params = registry.parse_search(target.search());
        Self {
            target,
            path_params: route.params.clone(),
            search_params,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn path(&self) -> &str {
        self.target.path()
    }

    pub fn search(&self) -> &str {
        self.target.search()
    }

    pub fn hash(&self) -> &str {
        self.target.hash()
    }

    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    pub fn search_params(&self) -> &Params {
        &self.search_params
    }

    pub fn path_param(&self, name: &str) -> Option<&ParamValue> {
        self.path_params.get(name)
    }

    pub fn search_param(&self, name: &str) -> Option<&ParamValue> {
        self.search_params.get(name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target, f)
    }
}
