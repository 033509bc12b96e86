//! Card catalog for template lookup.
//!
//! The `CardCatalog` stores every card template of a game, keyed by name.
//! The game instantiates entities from it; the catalog itself never
//! touches the registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;

use super::template::CardTemplate;

/// Catalog of card templates.
///
/// ## Example
///
/// ```
/// use deckr_engine::cards::{CardCatalog, CardTemplate};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardTemplate::new("Copper").with_attr("coins", 1));
///
/// let found = catalog.get("Copper").unwrap();
/// assert_eq!(found.get_int("coins", 0), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCatalog {
    cards: BTreeMap<String, CardTemplate>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card template.
    ///
    /// Panics if a card with the same name already exists.
    pub fn register(&mut self, card: CardTemplate) {
        if self.cards.contains_key(&card.name) {
            panic!("Card {} already registered", card.name);
        }
        self.cards.insert(card.name.clone(), card);
    }

    /// Register a template (builder pattern).
    #[must_use]
    pub fn with(mut self, card: CardTemplate) -> Self {
        self.register(card);
        self
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CardTemplate> {
        self.cards.get(name)
    }

    /// Check if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    /// Get the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.cards.values()
    }

    /// Find templates matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardTemplate>
    where
        F: Fn(&CardTemplate) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Instantiate `count` unregistered copies of a card.
    #[must_use]
    pub fn instantiate(&self, name: &str, count: usize) -> Option<Vec<Entity>> {
        let template = self.get(name)?;
        Some((0..count).map(|_| template.instantiate()).collect())
    }
}
