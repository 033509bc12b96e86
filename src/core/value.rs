//! Dynamic values for attributes and arguments.
//!
//! Attributes and step/action arguments are game-specific - the engine
//! doesn't interpret them beyond resolving entity references.
//!
//! ## Value Types
//!
//! - `Null`: Absent or cleared value
//! - `Bool`: Flags (face up, tapped)
//! - `Int`: Numbers (cost, rank, counters)
//! - `Text`: Strings (suit, zone type, phase)
//! - `Entity`: Reference to another registered entity
//! - `List`/`Map`: Containers of the above
//!
//! [`SerializedValue`] is the outbound form: entity references are replaced
//! by `{id, kind}` stubs or by the nested entity's serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;

/// Value of an attribute or argument.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Reference to a registered entity.
    Entity(EntityId),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed mapping of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the referenced entity if this is an Entity value.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Value::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// Get the referenced player if this is an Entity value.
    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        self.as_entity().map(PlayerId::from_entity)
    }

    /// Get as list slice if this is a List value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Get as map if this is a Map value.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Is this the Null value?
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Does a List value contain the given text element?
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.as_list()
            .is_some_and(|items| items.iter().any(|v| v.as_text() == Some(needle)))
    }

    /// Build a list of entity references.
    pub fn entities(ids: impl IntoIterator<Item = EntityId>) -> Self {
        Value::List(ids.into_iter().map(Value::Entity).collect())
    }
}

// Convenient From implementations
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<EntityId> for Value {
    fn from(v: EntityId) -> Self {
        Value::Entity(v)
    }
}

impl From<PlayerId> for Value {
    fn from(v: PlayerId) -> Self {
        Value::Entity(v.entity())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::List(v.into_iter().map(Value::from).collect())
    }
}

/// Raw JSON from the transport layer.
///
/// Integers stay integers: ids only become `Entity` values once the
/// dispatcher resolves declared parameters against the registry. Numbers
/// that don't fit an `i64` become `Null`.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_i64().map_or(Value::Null, Value::Int),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Reference to an entity in serialized output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStub {
    /// Referenced entity id.
    pub id: EntityId,
    /// Its kind.
    pub kind: String,
}

/// Outbound form of a value, safe to hand to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedValue {
    /// No value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Entity reference stub.
    Stub(EntityStub),
    /// Ordered list.
    List(Vec<SerializedValue>),
    /// Mapping (also the shape of a serialized entity).
    Object(BTreeMap<String, SerializedValue>),
}

impl SerializedValue {
    /// Field of an Object value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SerializedValue> {
        match self {
            SerializedValue::Object(map) => map.get(name),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SerializedValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SerializedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SerializedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
