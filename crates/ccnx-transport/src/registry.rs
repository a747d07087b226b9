//! Component configuration registries.
//!
//! Every component in a protocol stack contributes a named fragment to two
//! parallel documents: the stack configuration (which components form the
//! pipeline) and the connection configuration (per-connection parameters for
//! each component). Both are a [`ComponentConfig`], distinguished at the type
//! level by their [`ConfigScope`] so one can never be passed where the other
//! is expected.
//!
//! Fragments are stored in insertion order, one per component name. Adding a
//! second fragment under the same name replaces the first.

use ccnx_types::{CcnxError, CcnxResult, Validate};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Marker for the two kinds of component registry.
pub trait ConfigScope {
    /// Human-readable label used in logs and errors.
    const LABEL: &'static str;
}

/// Scope of a [`StackConfig`].
#[derive(Debug)]
pub enum StackScope {}

impl ConfigScope for StackScope {
    const LABEL: &'static str = "stack";
}

/// Scope of a [`ConnectionConfig`].
#[derive(Debug)]
pub enum ConnectionScope {}

impl ConfigScope for ConnectionScope {
    const LABEL: &'static str = "connection";
}

/// Which components form a protocol stack, keyed by component name.
pub type StackConfig = ComponentConfig<StackScope>;

/// Per-connection parameters of each component, keyed by component name.
pub type ConnectionConfig = ComponentConfig<ConnectionScope>;

/// An insertion-ordered mapping from component name to configuration fragment.
///
/// `Clone` is a deep copy. Equality is order-independent: two registries are
/// equal when they hold the same names with equal fragments.
pub struct ComponentConfig<S: ConfigScope> {
    json: Map<String, Value>,
    _scope: PhantomData<fn() -> S>,
}

impl<S: ConfigScope> ComponentConfig<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            json: Map::new(),
            _scope: PhantomData,
        }
    }

    /// Builds a registry from a document whose top-level keys are component names.
    pub fn from_json(json: Value) -> CcnxResult<Self> {
        match json {
            Value::Object(json) => Ok(Self {
                json,
                _scope: PhantomData,
            }),
            other => Err(CcnxError::Config(format!(
                "{} config must be a JSON object, got {}",
                S::LABEL,
                json_kind(&other)
            ))),
        }
    }

    /// Parses a registry from its JSON text.
    pub fn parse(text: &str) -> CcnxResult<Self> {
        Self::from_json(serde_json::from_str(text)?)
    }

    /// Stores `fragment` under `name`, replacing any fragment already there.
    ///
    /// The registry owns the value it is given; later changes to any copy the
    /// caller kept do not reach it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn add(&mut self, name: &str, fragment: impl Into<Value>) -> &mut Self {
        assert!(!name.is_empty(), "component name must not be empty");
        if self.json.insert(name.to_string(), fragment.into()).is_some() {
            debug!(scope = S::LABEL, component = %name, "Replaced component config");
        }
        self
    }

    /// The fragment stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.json.get(name)
    }

    /// Returns true if a fragment is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.json.contains_key(name)
    }

    /// Component names in insertion order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.json.keys().map(String::as_str)
    }

    /// Number of stored fragments.
    pub fn len(&self) -> usize {
        self.json.len()
    }

    /// Returns true if no fragment is stored.
    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
    }

    /// The underlying document. Borrowed from the registry.
    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }

    /// Consumes the registry, returning its document.
    pub fn into_json(self) -> Value {
        Value::Object(self.json)
    }

    /// Multi-line rendering for diagnostics.
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| self.to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<S: ConfigScope> Validate for ComponentConfig<S> {
    /// Well-formed means every key names a component. Emptiness is allowed;
    /// whether the expected components are present is the caller's concern.
    fn is_valid(&self) -> bool {
        self.json.keys().all(|name| !name.is_empty())
    }
}

impl<S: ConfigScope> Default for ComponentConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConfigScope> Clone for ComponentConfig<S> {
    fn clone(&self) -> Self {
        Self {
            json: self.json.clone(),
            _scope: PhantomData,
        }
    }
}

impl<S: ConfigScope> PartialEq for ComponentConfig<S> {
    fn eq(&self, other: &Self) -> bool {
        self.json == other.json
    }
}

impl<S: ConfigScope> Eq for ComponentConfig<S> {}

impl<S: ConfigScope> fmt::Debug for ComponentConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentConfig")
            .field("scope", &S::LABEL)
            .field("json", &self.json)
            .finish()
    }
}

impl<S: ConfigScope> fmt::Display for ComponentConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.json).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<S: ConfigScope> Serialize for ComponentConfig<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.json.serialize(serializer)
    }
}
