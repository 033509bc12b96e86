//! Resolution outcomes and per-player snapshots.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::player::PlayerId;
use crate::core::value::SerializedValue;
use crate::steps::Prompt;

use super::Game;

/// Outcome of an action or of supplied information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// Every queued step ran.
    Complete,

    /// A step is waiting for a player to supply an argument.
    ///
    /// Everything before the suspended step has been committed.
    AwaitingInput(Prompt),
}

impl ResolutionStatus {
    /// Did resolution run to completion?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, ResolutionStatus::Complete)
    }

    /// Outstanding prompt, if suspended.
    #[must_use]
    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            ResolutionStatus::Complete => None,
            ResolutionStatus::AwaitingInput(prompt) => Some(prompt),
        }
    }

    /// Treat a suspension as [`GameError::NeedsMoreInfo`].
    pub fn into_result(self) -> Result<()> {
        match self {
            ResolutionStatus::Complete => Ok(()),
            ResolutionStatus::AwaitingInput(prompt) => Err(GameError::NeedsMoreInfo(prompt)),
        }
    }
}

/// Everything one player may see, in entity id order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Serialized entities, the root game first.
    pub entities: Vec<SerializedValue>,
    /// Outstanding request for information.
    pub requires_information: Option<Prompt>,
    /// Has the game ended?
    pub is_over: bool,
    /// Winners once over.
    pub winners: Vec<PlayerId>,
}

impl StateSnapshot {
    /// Serialized entity by id.
    #[must_use]
    pub fn entity(&self, id: u32) -> Option<&SerializedValue> {
        self.entities
            .iter()
            .find(|entity| entity.field("id").and_then(SerializedValue::as_int) == Some(i64::from(id)))
    }
}

impl Game {
    /// Snapshot of every registered entity as seen by `player`.
    ///
    /// `None` gives the global view with no overrides applied.
    #[must_use]
    pub fn get_state(&self, player: Option<PlayerId>) -> StateSnapshot {
        StateSnapshot {
            entities: self
                .registry
                .ids()
                .map(|id| self.registry.serialize_entity(id, player, false))
                .collect(),
            requires_information: self.requires_information().cloned(),
            is_over: self.is_over(),
            winners: self.winners.clone(),
        }
    }
}
