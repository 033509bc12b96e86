//! Game configuration types.
//!
//! Games configure the engine at startup by providing:
//! - `ZoneTemplate`: Zones created for the game or for every player
//! - `CardCatalog`: Card name → attribute template
//! - `GameConfig`: Combines all configuration with the player bounds
//!
//! The engine never hardcodes zones or card types - games define them.
//! Every type here is `Deserialize` so a loader can produce it from JSON.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardCatalog;

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `min_players` must be at least 1 and at most `max_players`.
    #[error("invalid player bounds: min {min}, max {max}")]
    PlayerBounds { min: usize, max: usize },

    /// Zone with an empty name.
    #[error("zone name must not be empty")]
    EmptyZoneName,

    /// Two zones expand to the same name.
    #[error("duplicate zone name: {0}")]
    DuplicateZone(String),

    /// A zone template with multiplicity 0.
    #[error("zone {0} has multiplicity 0")]
    ZeroMultiplicity(String),
}

/// Template for a zone.
///
/// Game templates produce zones owned by the game, player templates one set
/// per player. With `multiplicity > 1` the zones are named `name0`,
/// `name1`, ...
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTemplate {
    /// Zone name (or prefix when multiplied).
    pub name: String,

    /// Is the zone a stack (top matters) rather than a set?
    #[serde(default)]
    pub stacked: bool,

    /// Free-form type tag ("supply", "hand", ...).
    #[serde(default)]
    pub zone_type: Option<String>,

    /// Number of zones made from this template.
    #[serde(default = "default_multiplicity")]
    pub multiplicity: usize,

    /// Maximum contents. `None` for unlimited.
    #[serde(default)]
    pub capacity: Option<usize>,
}

fn default_multiplicity() -> usize {
    1
}

impl ZoneTemplate {
    /// Create a single unordered zone template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stacked: false,
            zone_type: None,
            multiplicity: 1,
            capacity: None,
        }
    }

    /// Mark the zone as a stack.
    #[must_use]
    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    /// Set the zone type tag.
    #[must_use]
    pub fn with_type(mut self, zone_type: impl Into<String>) -> Self {
        self.zone_type = Some(zone_type.into());
        self
    }

    /// Create several numbered zones from this template.
    #[must_use]
    pub fn with_multiplicity(mut self, count: usize) -> Self {
        self.multiplicity = count;
        self
    }

    /// Set the maximum number of entities.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Names of the zones this template produces.
    #[must_use]
    pub fn expanded_names(&self) -> Vec<String> {
        if self.multiplicity == 1 {
            vec![self.name.clone()]
        } else {
            (0..self.multiplicity).map(|i| format!("{}{}", self.name, i)).collect()
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name, for logs.
    pub name: String,

    /// Players required to start.
    pub min_players: usize,

    /// Players allowed to join.
    pub max_players: usize,

    /// RNG seed.
    #[serde(default)]
    pub seed: u64,

    /// Zones owned by the game.
    #[serde(default)]
    pub game_zones: Vec<ZoneTemplate>,

    /// Zones created for each player.
    #[serde(default)]
    pub player_zones: Vec<ZoneTemplate>,

    /// Cards that can be instantiated by name.
    #[serde(default)]
    pub cards: CardCatalog,
}

impl GameConfig {
    /// Create a configuration with player bounds.
    pub fn new(name: impl Into<String>, min_players: usize, max_players: usize) -> Self {
        Self {
            name: name.into(),
            min_players,
            max_players,
            seed: 0,
            game_zones: Vec::new(),
            player_zones: Vec::new(),
            cards: CardCatalog::new(),
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a game-owned zone template.
    #[must_use]
    pub fn with_game_zone(mut self, zone: ZoneTemplate) -> Self {
        self.game_zones.push(zone);
        self
    }

    /// Add a per-player zone template.
    #[must_use]
    pub fn with_player_zone(mut self, zone: ZoneTemplate) -> Self {
        self.player_zones.push(zone);
        self
    }

    /// Set the card catalog.
    #[must_use]
    pub fn with_cards(mut self, cards: CardCatalog) -> Self {
        self.cards = cards;
        self
    }

    /// Check player bounds and zone names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(ConfigError::PlayerBounds {
                min: self.min_players,
                max: self.max_players,
            });
        }
        validate_zones(&self.game_zones)?;
        validate_zones(&self.player_zones)
    }
}

fn validate_zones(templates: &[ZoneTemplate]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for template in templates {
        if template.name.is_empty() {
            return Err(ConfigError::EmptyZoneName);
        }
        if template.multiplicity == 0 {
            return Err(ConfigError::ZeroMultiplicity(template.name.clone()));
        }
        for name in template.expanded_names() {
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateZone(name));
            }
        }
    }
    Ok(())
}
