//! Error types for game operations.

use thiserror::Error;

use super::config::ConfigError;
use super::entity::EntityId;
use super::player::PlayerId;
use crate::steps::Prompt;

/// Errors returned by the game API.
///
/// All of them are recoverable: a rejected call leaves the game as it was,
/// except [`GameError::NeedsMoreInfo`] which reports a partial commit up to
/// the suspended step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The game is full.
    #[error("game is full ({max} players)")]
    Capacity { max: usize },

    /// A zone is full.
    #[error("{zone} is full ({capacity} entities)")]
    ZoneFull { zone: EntityId, capacity: usize },

    /// The call is not allowed in the current lifecycle state.
    #[error("invalid game state: {0}")]
    State(String),

    /// The move is not legal.
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    /// Not enough players joined to start.
    #[error("not enough players: {joined} joined, {min} required")]
    NotEnoughPlayers { joined: usize, min: usize },

    /// Resolution suspended waiting for a player.
    #[error("{0}")]
    NeedsMoreInfo(Prompt),

    /// Information came from someone other than the awaited player.
    #[error("waiting on {expected}, not {got}")]
    WrongPlayer { expected: PlayerId, got: PlayerId },

    /// No action registered under this name.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// No step registered under this name.
    #[error("unknown step: {0}")]
    UnknownStep(String),

    /// Id does not refer to a registered entity of the right kind.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Card name missing from the catalog.
    #[error("unknown card: {0}")]
    UnknownCard(String),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    /// Shorthand for [`GameError::InvalidMove`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        GameError::InvalidMove { reason: reason.into() }
    }

    /// Shorthand for [`GameError::State`].
    pub fn state(message: impl Into<String>) -> Self {
        GameError::State(message.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;
