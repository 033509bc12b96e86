//! Rules: the game-specific capability and its registration tables.
//!
//! Games implement `GameRules` to define:
//! - Actions players can take, with parameters and restriction clauses
//! - Steps those actions enqueue
//! - Set-up, end condition and winners
//!
//! The core engine calls into `GameRules` but never interprets
//! game-specific concepts directly.

pub mod action;
pub mod engine;
pub mod rulebook;

pub use action::{ActionBody, ActionDef, Param, Restriction};
pub use engine::GameRules;
pub use rulebook::{Rulebook, SEND_INFORMATION};
