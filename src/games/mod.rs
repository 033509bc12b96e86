//! Game implementations built on the public engine API.
//!
//! Each game is a worked example of the engine, not a contract:
//! - `deckbuilder`: A small Dominion-like game exercising suspended steps,
//!   result bindings, per-player overrides and multiplied zones

pub mod deckbuilder;
