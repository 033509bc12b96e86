//! Zone contents and player zone tables.
//!
//! A [`Zone`] is the payload of a zone entity: an ordered sequence of
//! entity ids where the tail is the top of the stack. The mutators here are
//! raw (no transitions, no back-references); the game wraps them so every
//! change is announced and each entity's location stays in sync.

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::rng::GameRng;

/// Ordered contents of a zone entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    stacked: bool,
    capacity: Option<usize>,
    contents: Vector<EntityId>,
}

impl Zone {
    /// Create an empty zone.
    #[must_use]
    pub fn new(stacked: bool, capacity: Option<usize>) -> Self {
        Self {
            stacked,
            capacity,
            contents: Vector::new(),
        }
    }

    /// Maximum contents, if limited.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Would one more entity exceed the capacity?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.contents.len() >= cap)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Is the zone empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Does the zone hold this entity? O(n).
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.contents.contains(&id)
    }

    /// Top of the stack (last element).
    #[must_use]
    pub fn peek(&self) -> Option<EntityId> {
        self.contents.last().copied()
    }

    /// Entity at `index` (0 = bottom).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<EntityId> {
        self.contents.get(index).copied()
    }

    /// Position of an entity (0 = bottom).
    #[must_use]
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.contents.index_of(&id)
    }

    /// Contents from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.contents.iter().copied()
    }

    pub(crate) fn push_raw(&mut self, id: EntityId) {
        self.contents.push_back(id);
    }

    /// Insert at `index`, clamped to the current length.
    pub(crate) fn insert_raw(&mut self, index: usize, id: EntityId) {
        let index = index.min(self.contents.len());
        self.contents.insert(index, id);
    }

    pub(crate) fn remove_raw(&mut self, id: EntityId) -> bool {
        match self.contents.index_of(&id) {
            Some(index) => {
                self.contents.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop_raw(&mut self) -> Option<EntityId> {
        self.contents.pop_back()
    }

    pub(crate) fn shuffle(&mut self, rng: &mut GameRng) {
        let mut items: Vec<EntityId> = self.contents.iter().copied().collect();
        rng.shuffle(&mut items);
        self.contents = items.into_iter().collect();
    }
}

/// Zones owned by a player, by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerZones {
    zones: BTreeMap<String, EntityId>,
}

impl PlayerZones {
    /// Zone entity with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.zones.get(name).copied()
    }

    /// Zone names and ids, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.zones.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Zone ids, ordered by name.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.zones.values().copied()
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Does the player own no zones?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub(crate) fn insert(&mut self, name: String, zone: EntityId) {
        self.zones.insert(name, zone);
    }
}
