//! Entity identification and the generic tracked entity.
//!
//! Every object the engine knows about (the game itself, players, zones,
//! cards) is an [`Entity`] with a unique [`EntityId`].
//!
//! ## ID Layout
//!
//! - `0`: Reserved for the root game entity, assigned at construction.
//! - `1..`: Allocated by the registry in registration order, never reused.
//!
//! ## Usage
//!
//! ```
//! use deckr_engine::core::{Entity, EntityId, KIND_CARD};
//!
//! let card = Entity::new(KIND_CARD)
//!     .with_tracked("name", "Copper")
//!     .with_attr("cost", 0);
//!
//! // Not registered yet, so no id.
//! assert_eq!(card.id(), None);
//! assert!(card.is_tracked("name"));
//! assert!(!card.is_tracked("cost"));
//! assert!(EntityId::ROOT.is_root());
//! ```

use serde::{Deserialize, Serialize};

use super::observable::Attributes;
use super::player::PlayerId;
use super::value::Value;
use crate::zones::{PlayerZones, Zone};

/// Kind tag of the root game entity.
pub const KIND_GAME: &str = "Game";
/// Kind tag of player entities.
pub const KIND_PLAYER: &str = "Player";
/// Kind tag of zone entities.
pub const KIND_ZONE: &str = "Zone";
/// Kind tag of cards created from the catalog.
pub const KIND_CARD: &str = "Card";

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The root game entity. Never handed out by the registry.
    pub const ROOT: EntityId = EntityId(0);

    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Is this the reserved root id?
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for EntityId {
    fn from(player: PlayerId) -> Self {
        player.entity()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Marks which registry an entity belongs to.
///
/// Stands in for a back-reference to the owning game: it identifies the
/// game instance without keeping it alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryTag(pub u64);

/// Kind-specific payload of an entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EntityBody {
    /// Plain attribute bag (cards, tokens, the root game).
    Object,
    /// A container of other entities.
    Zone(Zone),
    /// A player and the zones it owns.
    Player(PlayerZones),
}

/// A tracked game object.
///
/// Behaviour is defined entirely by attributes; the engine only interprets
/// the [`EntityBody`] of zones and players.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    id: Option<EntityId>,
    kind: String,
    tag: Option<RegistryTag>,
    attributes: Attributes,
    /// Zone currently holding this entity. Maintained by zone operations.
    location: Option<EntityId>,
    body: EntityBody,
}

impl Entity {
    /// Create an unregistered entity of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self::with_body(kind, EntityBody::Object)
    }

    pub(crate) fn with_body(kind: impl Into<String>, body: EntityBody) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            tag: None,
            attributes: Attributes::default(),
            location: None,
            body,
        }
    }

    /// Set an untracked attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(name.into(), value.into());
        self
    }

    /// Set a tracked attribute (builder pattern).
    #[must_use]
    pub fn with_tracked(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.attributes.track(name.clone());
        self.attributes.set(name, value.into());
        self
    }

    /// Engine-assigned id, `None` until registered.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Kind discriminator ("Card", "Zone", ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Does this entity have the given kind?
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Tag of the registry that owns this entity, if registered.
    #[must_use]
    pub fn registry_tag(&self) -> Option<RegistryTag> {
        self.tag
    }

    pub(crate) fn stamp(&mut self, id: EntityId, tag: RegistryTag) {
        assert!(self.id.is_none(), "{} already has an id", id);
        self.id = Some(id);
        self.tag = Some(tag);
    }

    /// Zone currently holding this entity.
    #[must_use]
    pub fn location(&self) -> Option<EntityId> {
        self.location
    }

    pub(crate) fn set_location(&mut self, zone: Option<EntityId>) {
        self.location = zone;
    }

    // === Attributes ===

    /// Declare an attribute as tracked.
    pub fn track(&mut self, name: impl Into<String>) {
        self.attributes.track(name.into());
    }

    /// Is this attribute tracked?
    #[must_use]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.attributes.is_tracked(name)
    }

    /// Global value of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Value of an attribute as seen by `viewer`.
    ///
    /// Checks the viewer's override first, falling back to the global value.
    #[must_use]
    pub fn get_for(&self, name: &str, viewer: Option<PlayerId>) -> Option<&Value> {
        self.attributes.get_for(name, viewer)
    }

    /// Integer attribute shortcut.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Text attribute shortcut.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Set an attribute, globally or for a single player.
    ///
    /// Returns `true` when the change must be announced: the attribute is
    /// tracked and the entity is registered. Mutations made before
    /// registration are never announced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>, player: Option<PlayerId>) -> bool {
        let name = name.into();
        let announce = self.id.is_some() && self.attributes.is_tracked(&name);
        match player {
            Some(player) => self.attributes.set_override(name, player, value.into()),
            None => self.attributes.set(name, value.into()),
        }
        announce
    }

    /// Drop a player's override, revealing the global value again.
    pub fn clear_override(&mut self, name: &str, player: PlayerId) -> bool {
        self.attributes.clear_override(name, player)
    }

    /// Underlying attribute store.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    // === Body ===

    /// Kind-specific payload.
    #[must_use]
    pub fn body(&self) -> &EntityBody {
        &self.body
    }

    /// Zone payload, if this entity is a zone.
    #[must_use]
    pub fn as_zone(&self) -> Option<&Zone> {
        match &self.body {
            EntityBody::Zone(zone) => Some(zone),
            _ => None,
        }
    }

    pub(crate) fn as_zone_mut(&mut self) -> Option<&mut Zone> {
        match &mut self.body {
            EntityBody::Zone(zone) => Some(zone),
            _ => None,
        }
    }

    /// Player payload, if this entity is a player.
    #[must_use]
    pub fn as_player(&self) -> Option<&PlayerZones> {
        match &self.body {
            EntityBody::Player(zones) => Some(zones),
            _ => None,
        }
    }

    pub(crate) fn as_player_mut(&mut self) -> Option<&mut PlayerZones> {
        match &mut self.body {
            EntityBody::Player(zones) => Some(zones),
            _ => None,
        }
    }
}
