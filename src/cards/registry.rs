//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the in-memory card catalog. It provides fast lookup
//! by `CardId` and serves as the `CatalogStore` a session builds libraries
//! from.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::store::CatalogStore;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_table::cards::{CardRegistry, CardDefinition, CardId};
///
/// let mut registry = CardRegistry::new();
///
/// let bolt = CardDefinition::new(CardId::new(1), "Lightning Bolt", "Instant")
///     .with_mana_cost("{R}");
///
/// registry.register(bolt);
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Lightning Bolt");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Returns the definition previously stored under the same ID, if any.
    pub fn register(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.id, card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Look up a card by exact name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.values().find(|c| c.name == name)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}

impl FromIterator<CardDefinition> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.register(card);
        }
        registry
    }
}

impl CatalogStore for CardRegistry {
    fn get_card_definition(&self, id: CardId) -> Option<CardDefinition> {
        self.get(id).cloned()
    }
}
