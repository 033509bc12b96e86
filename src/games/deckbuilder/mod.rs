//! Deck-builder game for testing the engine.
//!
//! A small Dominion-like game:
//! - Twelve supply piles: treasures, victory cards and six action cards
//! - Each player starts with 7 Copper and 3 Estate and draws 5
//! - On your turn: play actions, play treasures, buy, then end the turn
//! - The game ends when the Provinces or any three piles run out
//!
//! Turn state lives in attributes: `phase` and `current_player` on the
//! root game entity, `actions`, `buys` and `coins` on each player.
//! Cards in hand are face up only for their owner, through a `face_up`
//! override.
//!
//! Supports 2-4 players.

mod cards;
mod game;

pub use cards::{catalog, pile_size, ACTION, KINGDOM, TREASURE, VICTORY};
pub use game::{
    counter, current_player, phase, pile, supply_piles, victory_points, Deckbuilder, ACTION_PHASE, BUY_PHASE,
    DISCARD_CARDS, DRAW_CARDS, GAIN_CARD, HAND_SIZE, SUPPLY, TRASH_CARD, TRASH_CARDS,
};
