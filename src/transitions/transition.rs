//! Transition records.

use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::value::SerializedValue;

/// One observable change to the game.
///
/// Serializes with a `name` tag, for example
/// `{"name": "add", "object": 4, "zone": 2}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Transition {
    /// An entity entered a zone.
    Add { object: EntityId, zone: EntityId },

    /// An entity left a zone.
    Remove { object: EntityId, zone: EntityId },

    /// A tracked attribute changed.
    Set {
        class: String,
        id: EntityId,
        attribute: String,
        value: SerializedValue,
    },

    /// The game ended.
    IsOver { winners: Vec<PlayerId> },

    /// Game-defined notification.
    Custom { label: String, value: SerializedValue },
}

impl Transition {
    /// Entity the transition is about. `None` for custom records.
    #[must_use]
    pub fn subject_id(&self) -> Option<EntityId> {
        match self {
            Transition::Add { object, .. } | Transition::Remove { object, .. } => Some(*object),
            Transition::Set { id, .. } => Some(*id),
            Transition::IsOver { .. } => Some(EntityId::ROOT),
            Transition::Custom { .. } => None,
        }
    }
}
