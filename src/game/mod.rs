//! The game: root entity and orchestrator.
//!
//! A [`Game`] owns the registry, the players, the step queue and the
//! transition log of one game instance. It is created from a
//! [`GameConfig`] and a [`GameRules`] implementation, and driven by
//! `add_player` → `start_game` → `make_action` until it is over.
//!
//! ## Lifecycle
//!
//! - `Configuring`: players may join and leave
//! - `SettingUp`: the rules deal the table
//! - `InProgress`: actions are accepted
//! - `Over`: winners are fixed; nothing more is accepted
//!
//! Every mutating entry point takes `&mut self`, so a game has one writer
//! at a time. Games share nothing; a session layer can move one between
//! threads or put it behind a mutex.

mod dispatch;
mod state;
mod zones;

pub use state::{ResolutionStatus, StateSnapshot};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::args::Args;
use crate::core::config::{GameConfig, ZoneTemplate};
use crate::core::entity::{Entity, EntityBody, EntityId, KIND_PLAYER, KIND_ZONE};
use crate::core::error::{GameError, Result};
use crate::core::player::PlayerId;
use crate::core::registry::Registry;
use crate::core::rng::GameRng;
use crate::core::value::Value;
use crate::rules::{GameRules, Rulebook};
use crate::steps::{EngineState, Prompt, StepQueue, TriggerId, TriggerRegistry, TriggerTiming};
use crate::transitions::{Transition, TransitionLog};
use crate::zones::{PlayerZones, Zone};

/// Lifecycle phase of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for players.
    Configuring,
    /// Rules are dealing the table.
    SettingUp,
    /// Accepting actions.
    InProgress,
    /// Finished.
    Over,
}

/// One game instance.
#[derive(Clone)]
pub struct Game {
    config: Arc<GameConfig>,
    rules: Arc<dyn GameRules>,
    rulebook: Arc<Rulebook>,
    registry: Registry,
    players: Vec<PlayerId>,
    zones: BTreeMap<String, EntityId>,
    steps: StepQueue,
    triggers: TriggerRegistry,
    transitions: TransitionLog,
    rng: GameRng,
    phase: GamePhase,
    winners: Vec<PlayerId>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("name", &self.config.name)
            .field("phase", &self.phase)
            .field("players", &self.players)
            .field("entities", &self.registry.len())
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Create a game and its game-owned zones.
    pub fn new(config: GameConfig, rules: impl GameRules + 'static) -> Result<Self> {
        config.validate()?;

        let mut rulebook = Rulebook::new();
        rules.register(&mut rulebook);

        let mut game = Self {
            rng: GameRng::new(config.seed),
            triggers: rulebook.triggers().clone(),
            config: Arc::new(config),
            rules: Arc::new(rules),
            rulebook: Arc::new(rulebook),
            registry: Registry::new(),
            players: Vec::new(),
            zones: BTreeMap::new(),
            steps: StepQueue::new(),
            transitions: TransitionLog::new(),
            phase: GamePhase::Configuring,
            winners: Vec::new(),
        };

        let config = Arc::clone(&game.config);
        for template in &config.game_zones {
            for name in template.expanded_names() {
                let zone = game.registry.register(zone_entity(template, &name, None));
                game.zones.insert(name, zone);
            }
        }

        info!(game = %game.config.name, zones = game.zones.len(), "created game");
        Ok(game)
    }

    // === Accessors ===

    /// Configuration the game was created from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Registered actions and steps.
    #[must_use]
    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    /// Entity registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Players in join order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Is this a current player?
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Has set-up run?
    #[must_use]
    pub fn is_set_up(&self) -> bool {
        matches!(self.phase, GamePhase::InProgress | GamePhase::Over)
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Winners of a finished game; empty while in progress.
    #[must_use]
    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    /// Step engine state.
    #[must_use]
    pub fn step_state(&self) -> EngineState {
        self.steps.state()
    }

    /// Outstanding request for information, if resolution is suspended.
    #[must_use]
    pub fn requires_information(&self) -> Option<&Prompt> {
        self.steps.awaiting()
    }

    /// Saved result of an earlier step in the current resolution.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.steps.binding(name)
    }

    /// Fork the game for look-ahead.
    ///
    /// Persistent structures make this cheap. The copy gets a forked RNG,
    /// so its shuffles are reproducible but differ from the original's,
    /// and a forked registry, so entities created on one side after the
    /// fork are foreign to the other.
    pub fn clone_state(&mut self) -> Game {
        let mut copy = self.clone();
        copy.rng = self.rng.fork();
        copy.registry = self.registry.fork();
        copy
    }

    // === Players ===

    /// Add a player and its zones.
    ///
    /// The capacity check comes first: a full game reports `Capacity`
    /// even after set-up.
    pub fn add_player(&mut self) -> Result<PlayerId> {
        if self.players.len() >= self.config.max_players {
            return Err(GameError::Capacity { max: self.config.max_players });
        }
        if self.phase != GamePhase::Configuring {
            return Err(GameError::state("unable to join a game in progress"));
        }

        let id = self
            .registry
            .register(Entity::with_body(KIND_PLAYER, EntityBody::Player(PlayerZones::default())));
        let player = PlayerId::from_entity(id);

        let config = Arc::clone(&self.config);
        for template in &config.player_zones {
            for name in template.expanded_names() {
                let zone = self.registry.register(zone_entity(template, &name, Some(player)));
                if let Some(zones) = self.registry.get_mut(id).and_then(Entity::as_player_mut) {
                    zones.insert(name, zone);
                }
            }
        }

        self.players.push(player);
        self.transitions.subscribe(player);
        info!(%player, joined = self.players.len(), "player joined");
        Ok(player)
    }

    /// Remove a player with its zones and their contents.
    ///
    /// Unknown players are ignored.
    pub fn remove_player(&mut self, player: PlayerId) {
        if !self.has_player(player) {
            return;
        }

        let zones: Vec<EntityId> = self
            .registry
            .lookup(player.entity(), Some(KIND_PLAYER))
            .and_then(Entity::as_player)
            .map(|zones| zones.ids().collect())
            .unwrap_or_default();

        for zone in zones {
            let contents: Vec<EntityId> = self
                .registry
                .get(zone)
                .and_then(Entity::as_zone)
                .map(|z| z.iter().collect())
                .unwrap_or_default();
            self.registry.deregister_all(contents);
            self.registry.deregister(zone);
        }
        self.registry.deregister(player.entity());

        self.players.retain(|p| *p != player);
        self.transitions.unsubscribe(player);
        info!(%player, remaining = self.players.len(), "player left");
    }

    // === Registry ===

    /// Register an entity.
    pub fn register(&mut self, entity: Entity) -> EntityId {
        self.registry.register(entity)
    }

    /// Register several entities.
    pub fn register_all(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityId> {
        self.registry.register_all(entities)
    }

    /// Deregister an entity, taking it out of its zone first.
    ///
    /// A zone is emptied before it goes: its contents stay registered but
    /// no longer have a location. Unknown ids are ignored.
    pub fn deregister(&mut self, id: EntityId) -> Option<Entity> {
        if id.is_root() {
            return None;
        }
        if let Some(zone) = self.location(id) {
            self.detach(zone, id);
        }
        for child in self.cards_in_zone(id) {
            self.detach(id, child);
        }
        self.registry.deregister(id)
    }

    /// Look up an entity, optionally requiring a kind.
    #[must_use]
    pub fn lookup(&self, id: EntityId, kind: Option<&str>) -> Option<&Entity> {
        self.registry.lookup(id, kind)
    }

    /// Instantiate and register `count` copies of a catalog card.
    pub fn create_cards(&mut self, name: &str, count: usize) -> Result<Vec<EntityId>> {
        let cards = self
            .config
            .cards
            .instantiate(name, count)
            .ok_or_else(|| GameError::UnknownCard(name.to_string()))?;
        Ok(self.registry.register_all(cards))
    }

    // === Attributes ===

    /// Attribute value.
    #[must_use]
    pub fn get(&self, id: EntityId, name: &str) -> Option<&Value> {
        self.registry.get(id)?.get(name)
    }

    /// Attribute value as seen by a player.
    #[must_use]
    pub fn get_for(&self, id: EntityId, name: &str, player: PlayerId) -> Option<&Value> {
        self.registry.get(id)?.get_for(name, Some(player))
    }

    /// Integer attribute.
    #[must_use]
    pub fn int(&self, id: EntityId, name: &str) -> Option<i64> {
        self.get(id, name).and_then(Value::as_int)
    }

    /// Text attribute.
    #[must_use]
    pub fn text(&self, id: EntityId, name: &str) -> Option<&str> {
        self.get(id, name).and_then(Value::as_text)
    }

    /// Declare an attribute as tracked.
    pub fn track(&mut self, id: EntityId, name: &str) -> Result<()> {
        self.registry
            .get_mut(id)
            .ok_or(GameError::UnknownEntity(id))?
            .track(name);
        Ok(())
    }

    /// Set an attribute, broadcasting a `set` transition if it is tracked.
    pub fn set(&mut self, id: EntityId, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_attribute(id, name, value.into(), None)
    }

    /// Set a value only `player` sees, announced only to them.
    pub fn set_for(&mut self, id: EntityId, player: PlayerId, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_attribute(id, name, value.into(), Some(player))
    }

    /// Drop a player's override, announcing the global value to them.
    pub fn clear_override(&mut self, id: EntityId, player: PlayerId, name: &str) -> Result<()> {
        let entity = self.registry.get_mut(id).ok_or(GameError::UnknownEntity(id))?;
        if entity.clear_override(name, player) && entity.is_tracked(name) {
            let value = entity.get(name).cloned().unwrap_or_default();
            let class = entity.kind().to_string();
            self.announce(class, id, name, &value, Some(player));
        }
        Ok(())
    }

    fn set_attribute(&mut self, id: EntityId, name: &str, value: Value, player: Option<PlayerId>) -> Result<()> {
        let entity = self.registry.get_mut(id).ok_or(GameError::UnknownEntity(id))?;
        if entity.set(name, value.clone(), player) {
            let class = entity.kind().to_string();
            self.announce(class, id, name, &value, player);
        }
        Ok(())
    }

    fn announce(&mut self, class: String, id: EntityId, name: &str, value: &Value, player: Option<PlayerId>) {
        let value = self.registry.serialize_value(value, player, false);
        self.transitions.record(
            Transition::Set {
                class,
                id,
                attribute: name.to_string(),
                value,
            },
            player,
        );
    }

    // === Transitions ===

    /// Record a game-defined notification.
    pub fn emit(&mut self, label: impl Into<String>, value: impl Into<Value>, player: Option<PlayerId>) {
        let value = self.registry.serialize_value(&value.into(), player, false);
        self.transitions.record(Transition::Custom { label: label.into(), value }, player);
    }

    /// Take everything queued for a player.
    pub fn get_transitions(&mut self, player: PlayerId) -> Vec<Transition> {
        self.transitions.drain(player)
    }

    /// Number of transitions waiting for a player.
    #[must_use]
    pub fn pending_transitions(&self, player: PlayerId) -> usize {
        self.transitions.pending(player)
    }

    // === Triggers ===

    /// Attach a trigger to a step for the rest of this game.
    pub fn add_trigger<F>(&mut self, step: impl Into<String>, timing: TriggerTiming, handler: F) -> TriggerId
    where
        F: Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync + 'static,
    {
        let step = step.into();
        let id = self.triggers.register(step.clone(), timing, handler);
        debug!(trigger = %id, %step, ?timing, "added trigger");
        id
    }

    /// Detach a trigger. Returns false if it was not attached.
    pub fn remove_trigger(&mut self, id: TriggerId) -> bool {
        self.triggers.unregister(id)
    }
}

fn zone_entity(template: &ZoneTemplate, name: &str, owner: Option<PlayerId>) -> Entity {
    Entity::with_body(KIND_ZONE, EntityBody::Zone(Zone::new(template.stacked, template.capacity)))
        .with_tracked("name", name)
        .with_tracked("zone_type", template.zone_type.clone())
        .with_tracked("owner", owner)
}
