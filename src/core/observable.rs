//! Attribute storage with change tracking and per-player overrides.
//!
//! Only attributes declared as tracked are serialized and announced through
//! transitions. Overrides hold values visible to a single player, which is
//! how hidden information is modelled: a card in a hand can be face up for
//! its owner and face down for everyone else.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::value::Value;

/// Attribute store of one entity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Attributes {
    values: FxHashMap<String, Value>,
    overrides: FxHashMap<String, FxHashMap<PlayerId, Value>>,
    tracked: FxHashSet<String>,
}

impl Attributes {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an attribute as tracked.
    pub fn track(&mut self, name: impl Into<String>) {
        self.tracked.insert(name.into());
    }

    /// Is this attribute tracked?
    #[must_use]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.tracked.contains(name)
    }

    /// Iterate over tracked attribute names (unordered).
    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.tracked.iter().map(String::as_str)
    }

    /// Global value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Value as seen by `viewer`: override first, then the global value.
    #[must_use]
    pub fn get_for(&self, name: &str, viewer: Option<PlayerId>) -> Option<&Value> {
        viewer
            .and_then(|player| self.overrides.get(name)?.get(&player))
            .or_else(|| self.values.get(name))
    }

    /// Set the global value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Set a value visible only to `player`.
    pub fn set_override(&mut self, name: impl Into<String>, player: PlayerId, value: Value) {
        self.overrides.entry(name.into()).or_default().insert(player, value);
    }

    /// Remove a player's override. Returns true if one existed.
    pub fn clear_override(&mut self, name: &str, player: PlayerId) -> bool {
        let Some(per_player) = self.overrides.get_mut(name) else {
            return false;
        };
        let removed = per_player.remove(&player).is_some();
        if per_player.is_empty() {
            self.overrides.remove(name);
        }
        removed
    }

    /// Does `player` have an override for this attribute?
    #[must_use]
    pub fn has_override(&self, name: &str, player: PlayerId) -> bool {
        self.overrides
            .get(name)
            .is_some_and(|per_player| per_player.contains_key(&player))
    }
}
