//! Typed view of the JSON document returned by `sparql`:
//!
//! ```json
//! { "head": { "vars": ["s", "o"] },
//!   "results": { "bindings": [ { "s": "<a>", "o": "<b>" } ] },
//!   "stats": { "runtime": "0.0012", "nresults": "1" } }
//! ```
//!
//! The engine writes stats as strings, and omits `vars` and `bindings`
//! when the query does not parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trident_core::errors::TridentError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlResults {
    pub head: Head,
    pub results: Bindings,
    pub stats: Stats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Head {
    #[serde(deserialize_with = "empty_or_vec")]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    #[serde(deserialize_with = "empty_or_vec")]
    pub bindings: Vec<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub runtime: Option<String>,
    pub nresults: Option<String>,
}

impl SparqlResults {
    pub fn parse(json: &str) -> Result<Self, TridentError> {
        serde_json::from_str(json).map_err(|e| TridentError::MalformedResult(e.to_string()))
    }

    pub fn vars(&self) -> &[String] {
        &self.head.vars
    }

    pub fn rows(&self) -> &[BTreeMap<String, Value>] {
        &self.results.bindings
    }

    /// Query execution time in seconds, as reported by the engine.
    pub fn runtime_secs(&self) -> Option<f64> {
        self.stats.runtime.as_deref()?.trim().parse().ok()
    }

    /// Number of result rows, as reported by the engine.
    pub fn result_count(&self) -> Option<u64> {
        self.stats.nresults.as_deref()?.trim().parse().ok()
    }

    /// The value bound to `var` in row `row`, if it is a string.
    pub fn value(&self, row: usize, var: &str) -> Option<&str> {
        self.results.bindings.get(row)?.get(var)?.as_str()
    }
}

// An empty property tree serializes as `""` rather than `[]`.
fn empty_or_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr<T> {
        List(Vec<T>),
        Other(Value),
    }

    match Repr::<T>::deserialize(deserializer)? {
        Repr::List(items) => Ok(items),
        Repr::Other(Value::String(s)) if s.is_empty() => Ok(Vec::new()),
        Repr::Other(Value::Null) => Ok(Vec::new()),
        Repr::Other(other) => Err(serde::de::Error::custom(format!(
            "expected a list, found {other}"
        ))),
    }
}
