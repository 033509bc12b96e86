//! Core engine types: entities, values, registry, errors, RNG, configuration.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure these via `GameConfig` rather than modifying the core.

pub mod args;
pub mod config;
pub mod entity;
pub mod error;
pub mod observable;
pub mod player;
pub mod registry;
pub mod rng;
pub mod value;

pub use args::Args;
pub use config::{ConfigError, GameConfig, ZoneTemplate};
pub use entity::{Entity, EntityBody, EntityId, RegistryTag, KIND_CARD, KIND_GAME, KIND_PLAYER, KIND_ZONE};
pub use error::{GameError, Result};
pub use observable::Attributes;
pub use player::PlayerId;
pub use registry::Registry;
pub use rng::GameRng;
pub use value::{EntityStub, SerializedValue, Value};
