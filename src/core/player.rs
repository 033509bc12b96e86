//! Player identification.
//!
//! Players are entities, so a [`PlayerId`] is the player's entity id wearing
//! a different type. Keeping them apart stops a card id from being passed
//! where a player is expected.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Identifier of a player entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a player ID from a raw entity id value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The player's entity id.
    #[must_use]
    pub const fn entity(self) -> EntityId {
        EntityId(self.0)
    }

    /// Treat an entity id as a player id.
    ///
    /// This does not check that the entity is a player; resolve through the
    /// registry for that.
    #[must_use]
    pub const fn from_entity(id: EntityId) -> Self {
        Self(id.0)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
