//! Zone operations.
//!
//! Every mutation here keeps the entity's location in sync and records
//! `add`/`remove` transitions. An entity sits in at most one zone; adding
//! an entity that is still in another zone is a bug in the calling rules
//! and aborts. Use [`Game::move_to_zone`] to move.

use tracing::debug;

use crate::core::entity::{Entity, EntityId, KIND_PLAYER};
use crate::core::error::{GameError, Result};
use crate::core::player::PlayerId;
use crate::transitions::Transition;
use crate::zones::Zone;

use super::Game;

impl Game {
    /// Game-owned zone by name.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<EntityId> {
        self.zones.get(name).copied()
    }

    /// Game-owned zones in name order.
    pub fn zones(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.zones.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// A player's zone by name.
    #[must_use]
    pub fn player_zone(&self, player: PlayerId, name: &str) -> Option<EntityId> {
        self.registry
            .lookup(player.entity(), Some(KIND_PLAYER))
            .and_then(Entity::as_player)
            .and_then(|zones| zones.get(name))
    }

    /// Zone payload of an entity.
    #[must_use]
    pub fn zone_ref(&self, zone: EntityId) -> Option<&Zone> {
        self.registry.get(zone).and_then(Entity::as_zone)
    }

    /// Zone currently holding an entity.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<EntityId> {
        self.registry.get(entity).and_then(Entity::location)
    }

    /// Number of entities in a zone (0 for unknown zones).
    #[must_use]
    pub fn zone_size(&self, zone: EntityId) -> usize {
        self.zone_ref(zone).map_or(0, Zone::len)
    }

    /// Contents of a zone, bottom to top.
    #[must_use]
    pub fn cards_in_zone(&self, zone: EntityId) -> Vec<EntityId> {
        self.zone_ref(zone).map(|z| z.iter().collect()).unwrap_or_default()
    }

    /// Top of a zone.
    #[must_use]
    pub fn top_card(&self, zone: EntityId) -> Option<EntityId> {
        self.zone_ref(zone).and_then(Zone::peek)
    }

    /// Does the zone hold this entity?
    #[must_use]
    pub fn zone_contains(&self, zone: EntityId, entity: EntityId) -> bool {
        self.zone_ref(zone).is_some_and(|z| z.contains(entity))
    }

    /// Add an entity to a zone (on top).
    ///
    /// Returns `Ok(false)` when the entity is unregistered or already in
    /// this zone.
    pub fn add_to_zone(&mut self, zone: EntityId, entity: EntityId) -> Result<bool> {
        self.place(zone, entity, None)
    }

    /// Push an entity on top of a stacked zone.
    pub fn push(&mut self, zone: EntityId, entity: EntityId) -> Result<bool> {
        self.place(zone, entity, None)
    }

    /// Insert an entity at `index` (0 = bottom, clamped to the length).
    pub fn insert_at(&mut self, zone: EntityId, entity: EntityId, index: usize) -> Result<bool> {
        self.place(zone, entity, Some(index))
    }

    /// Remove an entity from a zone. Returns `Ok(false)` if it wasn't there.
    pub fn remove_from_zone(&mut self, zone: EntityId, entity: EntityId) -> Result<bool> {
        if !self.zone_mut(zone)?.remove_raw(entity) {
            return Ok(false);
        }
        self.after_removal(zone, entity);
        Ok(true)
    }

    /// Pop the top entity; `Ok(None)` on an empty zone.
    pub fn pop_top(&mut self, zone: EntityId) -> Result<Option<EntityId>> {
        let popped = self.zone_mut(zone)?.pop_raw();
        if let Some(entity) = popped {
            self.after_removal(zone, entity);
        }
        Ok(popped)
    }

    /// Pop everything, top first.
    pub fn pop_all(&mut self, zone: EntityId) -> Result<Vec<EntityId>> {
        let mut popped = Vec::with_capacity(self.zone_size(zone));
        while let Some(entity) = self.pop_top(zone)? {
            popped.push(entity);
        }
        Ok(popped)
    }

    /// Replace a zone's contents. `entities` is given bottom to top.
    pub fn set_cards(&mut self, zone: EntityId, entities: &[EntityId]) -> Result<()> {
        self.pop_all(zone)?;
        for &entity in entities {
            if let Some(previous) = self.location(entity) {
                self.remove_from_zone(previous, entity)?;
            }
            self.push(zone, entity)?;
        }
        Ok(())
    }

    /// Shuffle a zone. Order is not observable, so nothing is announced.
    pub fn shuffle_zone(&mut self, zone: EntityId) -> Result<()> {
        let contents = self
            .registry
            .get_mut(zone)
            .and_then(Entity::as_zone_mut)
            .ok_or(GameError::UnknownEntity(zone))?;
        contents.shuffle(&mut self.rng);
        Ok(())
    }

    /// Move an entity to the top of `zone`, leaving its current zone.
    ///
    /// Nothing changes if the target is unknown or full. Returns
    /// `Ok(false)` if the entity is unregistered or already there.
    pub fn move_to_zone(&mut self, entity: EntityId, zone: EntityId) -> Result<bool> {
        let target = self.zone_ref(zone).ok_or(GameError::UnknownEntity(zone))?;
        if !self.registry.contains(entity) || target.contains(entity) {
            return Ok(false);
        }
        if target.is_full() {
            return Err(GameError::ZoneFull { zone, capacity: target.capacity().unwrap_or_default() });
        }

        if let Some(previous) = self.location(entity) {
            self.remove_from_zone(previous, entity)?;
        }
        self.place(zone, entity, None)
    }

    fn place(&mut self, zone: EntityId, entity: EntityId, index: Option<usize>) -> Result<bool> {
        let target = self.zone_ref(zone).ok_or(GameError::UnknownEntity(zone))?;
        let Some(current) = self.registry.get(entity) else {
            return Ok(false);
        };
        if target.contains(entity) {
            return Ok(false);
        }
        if let Some(other) = current.location() {
            panic!("{} is already in {}, cannot add it to {}", entity, other, zone);
        }
        if target.is_full() {
            return Err(GameError::ZoneFull { zone, capacity: target.capacity().unwrap_or_default() });
        }

        let contents = self.zone_mut(zone)?;
        match index {
            Some(index) => contents.insert_raw(index, entity),
            None => contents.push_raw(entity),
        }
        if let Some(moved) = self.registry.get_mut(entity) {
            moved.set_location(Some(zone));
        }
        debug!(%entity, %zone, "added to zone");
        self.transitions.record(Transition::Add { object: entity, zone }, None);
        Ok(true)
    }

    /// Take an entity out of its zone during deregistration.
    pub(super) fn detach(&mut self, zone: EntityId, entity: EntityId) {
        let removed = self
            .registry
            .get_mut(zone)
            .and_then(Entity::as_zone_mut)
            .is_some_and(|contents| contents.remove_raw(entity));
        if removed {
            self.after_removal(zone, entity);
        }
    }

    fn after_removal(&mut self, zone: EntityId, entity: EntityId) {
        if let Some(removed) = self.registry.get_mut(entity) {
            removed.set_location(None);
        }
        debug!(%entity, %zone, "removed from zone");
        self.transitions.record(Transition::Remove { object: entity, zone }, None);
    }

    fn zone_mut(&mut self, zone: EntityId) -> Result<&mut Zone> {
        self.registry
            .get_mut(zone)
            .and_then(Entity::as_zone_mut)
            .ok_or(GameError::UnknownEntity(zone))
    }
}
