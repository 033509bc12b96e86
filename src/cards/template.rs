//! Card templates - static card data.
//!
//! `CardTemplate` holds the configured attributes of a card type. For
//! example, "Smithy" costs 4 and draws 3 cards - these are part of the
//! template. Each copy in play is a separate entity instantiated from it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, KIND_CARD};
use crate::core::value::Value;

/// Attribute template for one card name.
///
/// ## Example
///
/// ```
/// use deckr_engine::cards::CardTemplate;
///
/// let smithy = CardTemplate::new("Smithy")
///     .with_attr("cost", 4)
///     .with_attr("cards", 3);
///
/// assert_eq!(smithy.get_int("cards", 0), 3);
/// let card = smithy.instantiate();
/// assert_eq!(card.text("name"), Some("Smithy"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Card name, unique within a catalog.
    pub name: String,

    /// Game-specific attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,

    /// Attributes announced to players. `name` is always tracked.
    #[serde(default)]
    pub tracked: BTreeSet<String>,
}

impl CardTemplate {
    /// Create a template with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            tracked: BTreeSet::new(),
        }
    }

    /// Add an untracked attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a tracked attribute (builder pattern).
    #[must_use]
    pub fn with_tracked(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        self.tracked.insert(key.clone());
        self.attributes.insert(key, value.into());
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get an integer attribute with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_attr(key).and_then(Value::as_int).unwrap_or(default)
    }

    /// Get a text attribute.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get_attr(key).and_then(Value::as_text)
    }

    /// Does a list attribute contain `item`? (`types` contains "action")
    #[must_use]
    pub fn has_tag(&self, key: &str, item: &str) -> bool {
        self.get_attr(key).is_some_and(|v| v.contains_text(item))
    }

    /// Build a fresh, unregistered card entity.
    #[must_use]
    pub fn instantiate(&self) -> Entity {
        let mut card = Entity::new(KIND_CARD).with_tracked("name", self.name.as_str());
        for (key, value) in &self.attributes {
            if self.tracked.contains(key) {
                card = card.with_tracked(key.as_str(), value.clone());
            } else {
                card = card.with_attr(key.as_str(), value.clone());
            }
        }
        card
    }
}
