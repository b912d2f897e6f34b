#![forbid(unsafe_code)]

//! Immutable key/value bag handed to the hosted view.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Props passed through unchanged to an entry's view.
///
/// Cloning is cheap (shared `Rc`). The bag is built with [`Props::with`]
/// before it is handed to the stack and is never mutated afterwards.
#[derive(Clone, Default, PartialEq)]
pub struct Props(Rc<Map<String, Value>>);

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair, returning the extended bag.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Rc::make_mut(&mut self.0).insert(key.into(), value.into());
        self
    }

    /// Build props from a JSON value. Non-object values yield `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(Rc::new(map))),
            _ => None,
        }
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a value and deserialize it into `T`.
    ///
    /// Returns `None` when the key is missing or has the wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
