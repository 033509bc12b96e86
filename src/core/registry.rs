//! Entity registry: id allocation, lookup and serialization.
//!
//! The registry is the single owner of every entity in a game. Zones,
//! players and attributes refer to each other by [`EntityId`] only, so the
//! whole object graph lives in one persistent map and a game clone is a
//! pointer copy.
//!
//! ## Identity
//!
//! - Ids are allocated from a per-instance counter starting at 1.
//! - Id 0 is the root game entity, inserted at construction.
//! - Ids are never reused, even after deregistration.
//! - Each registry carries a [`RegistryTag`] stamped onto its entities.
//!   Tags are process-unique so entities from another game are never
//!   adopted; a fork gets a fresh tag and remembers where it split off.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use im::OrdMap;
use tracing::debug;

use super::entity::{Entity, EntityBody, EntityId, RegistryTag, KIND_GAME};
use super::player::PlayerId;
use super::value::{EntityStub, SerializedValue, Value};

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

fn next_tag() -> RegistryTag {
    RegistryTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
}

/// Id → entity map of one game instance.
#[derive(Clone, Debug)]
pub struct Registry {
    tag: RegistryTag,
    entities: OrdMap<EntityId, Entity>,
    next_id: u32,
    /// Registries this one was forked from, with the first id each had not
    /// yet issued at the fork.
    lineage: Vec<(RegistryTag, u32)>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry holding only the root game entity.
    #[must_use]
    pub fn new() -> Self {
        let tag = next_tag();
        let mut root = Entity::new(KIND_GAME);
        root.stamp(EntityId::ROOT, tag);

        let mut entities = OrdMap::new();
        entities.insert(EntityId::ROOT, root);

        Self {
            tag,
            entities,
            next_id: 1,
            lineage: Vec::new(),
        }
    }

    /// Copy this registry under a fresh tag.
    ///
    /// The fork shares every id issued so far; ids issued afterwards on
    /// either side are unrelated.
    #[must_use]
    pub fn fork(&self) -> Self {
        let mut fork = self.clone();
        fork.lineage.push((self.tag, self.next_id));
        fork.tag = next_tag();
        fork
    }

    /// Was this id issued by this registry, or by an ancestor before the fork?
    fn issued(&self, id: EntityId, tag: Option<RegistryTag>) -> bool {
        let Some(tag) = tag else {
            return false;
        };
        tag == self.tag
            || self
                .lineage
                .iter()
                .any(|(ancestor, bound)| *ancestor == tag && id.raw() < *bound)
    }

    /// Tag stamped on every entity registered here.
    #[must_use]
    pub fn tag(&self) -> RegistryTag {
        self.tag
    }

    /// Register an entity, assigning the next id.
    ///
    /// An entity that already carries an id keeps it. If it was issued by
    /// this registry (or an ancestor, before the fork) and its slot is
    /// vacant it is restored; otherwise the registry is left untouched.
    pub fn register(&mut self, mut entity: Entity) -> EntityId {
        if let Some(id) = entity.id() {
            if self.issued(id, entity.registry_tag()) && !self.entities.contains_key(&id) {
                debug!(entity = %id, kind = entity.kind(), "restored entity");
                self.entities.insert(id, entity);
            }
            return id;
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.stamp(id, self.tag);
        debug!(entity = %id, kind = entity.kind(), "registered entity");
        self.entities.insert(id, entity);
        id
    }

    /// Register several entities, returning their ids in order.
    pub fn register_all(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityId> {
        entities.into_iter().map(|entity| self.register(entity)).collect()
    }

    /// Remove an entity. Unknown ids are ignored; the root cannot be removed.
    ///
    /// The returned entity keeps its id, so it can be registered again
    /// under the same identity.
    pub fn deregister(&mut self, id: EntityId) -> Option<Entity> {
        if id.is_root() {
            return None;
        }
        let removed = self.entities.remove(&id);
        if removed.is_some() {
            debug!(entity = %id, "deregistered entity");
        }
        removed
    }

    /// Remove several entities, returning those that were present.
    pub fn deregister_all(&mut self, ids: impl IntoIterator<Item = EntityId>) -> Vec<Entity> {
        ids.into_iter().filter_map(|id| self.deregister(id)).collect()
    }

    /// Look up an entity, optionally requiring a kind.
    ///
    /// Returns `None` both when the id is unknown and when the kind differs.
    #[must_use]
    pub fn lookup(&self, id: EntityId, kind: Option<&str>) -> Option<&Entity> {
        self.entities
            .get(&id)
            .filter(|entity| kind.map_or(true, |kind| entity.is_kind(kind)))
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get an entity by id, mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Is this id registered?
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of registered entities, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Only the root is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.len() <= 1
    }

    /// Entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    // === Serialization ===

    /// Serialize an entity as seen by `viewer`.
    ///
    /// The result always has `id` and `kind`, then every tracked attribute.
    /// Zones add the ids of their `objects` and players their `zones`.
    /// Referenced entities become `{id, kind}` stubs, or one level of
    /// nested serialization when `full` is set.
    #[must_use]
    pub fn serialize_entity(&self, id: EntityId, viewer: Option<PlayerId>, full: bool) -> SerializedValue {
        let Some(entity) = self.get(id) else {
            return SerializedValue::Null;
        };

        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), SerializedValue::Int(i64::from(id.raw())));
        fields.insert("kind".to_string(), SerializedValue::Text(entity.kind().to_string()));

        for name in entity.attributes().tracked() {
            let value = entity
                .get_for(name, viewer)
                .map_or(SerializedValue::Null, |value| self.serialize_value(value, viewer, full));
            fields.insert(name.to_string(), value);
        }

        match entity.body() {
            EntityBody::Object => {}
            EntityBody::Zone(zone) => {
                let objects = zone.iter().map(|child| SerializedValue::Int(i64::from(child.raw()))).collect();
                fields.insert("objects".to_string(), SerializedValue::List(objects));
            }
            EntityBody::Player(zones) => {
                let zones = zones
                    .iter()
                    .map(|(name, zone)| (name.to_string(), self.serialize_ref(zone, viewer, false)))
                    .collect();
                fields.insert("zones".to_string(), SerializedValue::Object(zones));
            }
        }

        SerializedValue::Object(fields)
    }

    /// Serialize a reference: a stub, or the entity itself (one level) when `full`.
    #[must_use]
    pub fn serialize_ref(&self, id: EntityId, viewer: Option<PlayerId>, full: bool) -> SerializedValue {
        match self.get(id) {
            None => SerializedValue::Null,
            Some(_) if full => self.serialize_entity(id, viewer, false),
            Some(entity) => SerializedValue::Stub(EntityStub {
                id,
                kind: entity.kind().to_string(),
            }),
        }
    }

    /// Serialize an attribute value element-wise.
    #[must_use]
    pub fn serialize_value(&self, value: &Value, viewer: Option<PlayerId>, full: bool) -> SerializedValue {
        match value {
            Value::Null => SerializedValue::Null,
            Value::Bool(b) => SerializedValue::Bool(*b),
            Value::Int(n) => SerializedValue::Int(*n),
            Value::Text(s) => SerializedValue::Text(s.clone()),
            Value::Entity(id) => self.serialize_ref(*id, viewer, full),
            Value::List(items) => {
                SerializedValue::List(items.iter().map(|v| self.serialize_value(v, viewer, full)).collect())
            }
            Value::Map(map) => SerializedValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.serialize_value(v, viewer, full)))
                    .collect(),
            ),
        }
    }
}
