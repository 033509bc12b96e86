//! Rules trait for game implementations.
//!
//! Games implement `GameRules` to define their rules:
//! - Which actions and steps exist (registered into a [`Rulebook`])
//! - How the table is dealt
//! - Win conditions

use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::game::Game;

use super::rulebook::Rulebook;

/// Rules trait.
///
/// The engine calls these methods but never interprets game-specific
/// concepts itself.
///
/// ## Implementation Notes
///
/// - `register`: Called once when a game is created
/// - `set_up`: Runs once, after `min_players` have joined
/// - `is_over`: Checked after every action
/// - `winners`: Only meaningful once `is_over` returns true
pub trait GameRules: Send + Sync {
    /// Fill the rulebook with actions, steps and initial triggers.
    fn register(&self, book: &mut Rulebook);

    /// Deal the table: create cards, fill zones, set rule state.
    fn set_up(&self, game: &mut Game) -> Result<()>;

    /// Has the game ended?
    fn is_over(&self, game: &Game) -> bool;

    /// Winners of a finished game.
    fn winners(&self, game: &Game) -> Vec<PlayerId>;
}
