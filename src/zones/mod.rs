//! Zone system for entity locations.
//!
//! Zones are **game-configured**, not hardcoded. Games define their zones
//! (deck, hand, supply, tableau, etc.) via `ZoneTemplate` at startup.
//!
//! ## Key Types
//!
//! - `ZoneTemplate`: Zone properties (from `core::config`)
//! - `Zone`: Ordered contents of a zone entity
//! - `PlayerZones`: Name → zone table of a player entity
//!
//! Mutations go through the zone operations on `Game`, which keep each
//! entity's location and the transition log in sync.

pub mod zone;

pub use zone::{PlayerZones, Zone};

// Re-export zone types from core for convenience
pub use crate::core::config::ZoneTemplate;
