//! Typed access to an operation's resolved argument values.
//!
//! A missing argument is a first-class input to the guards (`None`), never
//! a substituted default. Values that cannot possibly be an id are errors,
//! which the evaluator turns into a denial.

use mapgate_core::ResourceId;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Resolved argument values of one operation call, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object (or `null`, meaning no arguments).
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(Error::config(format!(
                "operation arguments must be an object, got {other}"
            ))),
        }
    }

    /// Add an argument, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw argument value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Resolve argument `name` as a resource id.
    ///
    /// - missing, `null` or `""` → `Ok(None)`
    /// - string or integer → `Ok(Some(id))`
    /// - anything else → `Err(InvalidArgument)`
    pub fn id(&self, name: &str) -> Result<Option<ResourceId>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(ResourceId::new(s.as_str()))),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(Some(ResourceId::new(n.to_string())))
            }
            Some(other) => Err(Error::invalid_argument(
                name,
                format!("expected a string or integer id, got {other}"),
            )),
        }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
