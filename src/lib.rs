//! # deckr-engine
//!
//! A generic card game rules engine: games declare zones, cards, actions
//! and steps; the engine tracks entities, resolves steps (suspending when a
//! player must choose), and tells every player what changed.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded zones, phases or card types. Games
//!    configure these with `GameConfig` and a `GameRules` implementation.
//!
//! 2. **Observable State**: Every visible change is a `Transition`, queued
//!    per player. Per-player overrides hide information (a card in hand is
//!    face up only for its owner).
//!
//! 3. **Suspendable Resolution**: A step missing an argument stops the
//!    queue and returns a prompt; `send_information` resumes it.
//!
//! ## Architecture
//!
//! - **Registry of plain data**: Entities live in a persistent map keyed by
//!   id, so cloning a game for look-ahead is O(1).
//!
//! - **Registration tables**: Actions carry parameters and ordered
//!   restriction clauses; steps carry requirements. Both are closures
//!   registered in a `Rulebook`.
//!
//! ## Modules
//!
//! - `core`: Entity ids, values, attributes, registry, config, errors, RNG
//! - `zones`: Ordered entity containers
//! - `cards`: Card templates and the catalog
//! - `transitions`: Change records and per-player queues
//! - `steps`: Step definitions, requirements, the queue and triggers
//! - `rules`: Actions, the rulebook and the `GameRules` trait
//! - `game`: The `Game` orchestrator
//! - `games`: Worked game implementations
//!
//! ## Example
//!
//! ```
//! use deckr_engine::{Args, Game, GameConfig, GameRules, PlayerId, Result, Rulebook, ZoneTemplate};
//! use deckr_engine::rules::ActionDef;
//!
//! struct Counter;
//!
//! impl GameRules for Counter {
//!     fn register(&self, book: &mut Rulebook) {
//!         book.action(ActionDef::new("bump", |game: &mut Game, _player: PlayerId, _args: &Args| {
//!             let count = game.int(deckr_engine::EntityId::ROOT, "count").unwrap_or(0);
//!             game.set(deckr_engine::EntityId::ROOT, "count", count + 1)
//!         }));
//!     }
//!     fn set_up(&self, _game: &mut Game) -> Result<()> {
//!         Ok(())
//!     }
//!     fn is_over(&self, game: &Game) -> bool {
//!         game.int(deckr_engine::EntityId::ROOT, "count") == Some(3)
//!     }
//!     fn winners(&self, game: &Game) -> Vec<PlayerId> {
//!         game.players().to_vec()
//!     }
//! }
//!
//! let config = GameConfig::new("counter", 1, 1).with_player_zone(ZoneTemplate::new("hand"));
//! let mut game = Game::new(config, Counter).unwrap();
//! let player = game.add_player().unwrap();
//! game.start_game().unwrap();
//!
//! for _ in 0..3 {
//!     game.make_action("bump", player, Args::new()).unwrap();
//! }
//! assert!(game.is_over());
//! assert_eq!(game.winners(), &[player]);
//! ```

pub mod core;
pub mod zones;
pub mod cards;
pub mod transitions;
pub mod steps;
pub mod rules;
pub mod game;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Args, ConfigError, GameConfig, ZoneTemplate,
    Entity, EntityBody, EntityId, RegistryTag, KIND_CARD, KIND_GAME, KIND_PLAYER, KIND_ZONE,
    GameError, Result,
    Attributes, PlayerId, Registry, GameRng,
    EntityStub, SerializedValue, Value,
};

pub use crate::zones::{PlayerZones, Zone};

pub use crate::cards::{CardCatalog, CardTemplate};

pub use crate::transitions::{Transition, TransitionLog};

pub use crate::steps::{
    ArgShape, ArgType, Container, EngineState, PendingStep, Prompt, Requirement, StepDef, StepQueue,
    TriggerId, TriggerRegistry, TriggerTiming,
};

pub use crate::rules::{ActionDef, GameRules, Restriction, Rulebook, SEND_INFORMATION};

pub use crate::game::{Game, GamePhase, ResolutionStatus, StateSnapshot};
