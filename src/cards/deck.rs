//! Deck records.
//!
//! A `Deck` belongs to one player and lists card IDs with quantities.
//! `contents` resolves it against a catalog into the
//! `(CardDefinition, quantity)` pairs a library is built from.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};
use crate::core::player::PlayerId;
use crate::error::{EngineError, Result};
use crate::store::CatalogStore;

/// Minimum deck size in the Standard format.
pub const STANDARD_MIN_CARDS: u32 = 60;

/// Maximum copies of one non-basic-land card in the Standard format.
pub const STANDARD_MAX_COPIES: u32 = 4;

/// Deck identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeckId(pub u32);

impl DeckId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deck({})", self.0)
    }
}

/// One line of a deck list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardId,
    pub quantity: u32,
}

/// A player's deck.
///
/// ```
/// use ccg_table::cards::{CardId, Deck, DeckId};
/// use ccg_table::core::PlayerId;
///
/// let deck = Deck::new(DeckId::new(1), PlayerId::new(1), "Mono Green", "Standard")
///     .with_card(CardId::new(10), 4)
///     .with_card(CardId::new(11), 20);
///
/// assert_eq!(deck.card_count(), 24);
/// assert_eq!(deck.unique_card_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub owner: PlayerId,
    pub name: String,
    /// Free-form format name ("Standard", "Modern", ...).
    pub format: String,
    pub entries: Vec<DeckEntry>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(
        id: DeckId,
        owner: PlayerId,
        name: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            format: format.into(),
            entries: Vec::new(),
        }
    }

    /// Add copies of a card. Repeated cards merge into one entry.
    #[must_use]
    pub fn with_card(mut self, card: CardId, quantity: u32) -> Self {
        self.add_card(card, quantity);
        self
    }

    /// Add copies of a card in place.
    pub fn add_card(&mut self, card: CardId, quantity: u32) {
        match self.entries.iter_mut().find(|e| e.card == card) {
            Some(entry) => entry.quantity += quantity,
            None => self.entries.push(DeckEntry { card, quantity }),
        }
    }

    /// Total number of cards (sum of quantities).
    #[must_use]
    pub fn card_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Number of distinct cards.
    #[must_use]
    pub fn unique_card_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve the deck list against a catalog.
    ///
    /// Entries with quantity zero are skipped.
    pub fn contents(&self, catalog: &dyn CatalogStore) -> Result<Vec<(CardDefinition, u32)>> {
        self.entries
            .iter()
            .filter(|e| e.quantity > 0)
            .map(|e| {
                catalog
                    .get_card_definition(e.card)
                    .map(|def| (def, e.quantity))
                    .ok_or(EngineError::UnknownCard(e.card))
            })
            .collect()
    }

    /// Check the deck against the rules of its format.
    ///
    /// Standard requires at least 60 cards and no more than four copies of
    /// any card by name, basic lands excepted. Other formats are not checked.
    pub fn validate_for_format(&self, catalog: &dyn CatalogStore) -> Result<()> {
        if !self.format.eq_ignore_ascii_case("standard") {
            return Ok(());
        }

        let count = self.card_count();
        if count < STANDARD_MIN_CARDS {
            return Err(self.illegal(format!(
                "needs at least {STANDARD_MIN_CARDS} cards, has {count}"
            )));
        }

        let mut copies: Vec<(String, u32)> = Vec::new();
        for (def, quantity) in self.contents(catalog)? {
            if def.is_basic_land() {
                continue;
            }
            let total = match copies.iter_mut().find(|(name, _)| *name == def.name) {
                Some((_, n)) => {
                    *n += quantity;
                    *n
                }
                None => {
                    copies.push((def.name.clone(), quantity));
                    quantity
                }
            };
            if total > STANDARD_MAX_COPIES {
                return Err(self.illegal(format!(
                    "more than {STANDARD_MAX_COPIES} copies of {}",
                    def.name
                )));
            }
        }
        Ok(())
    }

    fn illegal(&self, reason: String) -> EngineError {
        EngineError::IllegalDeck {
            deck: self.id,
            reason,
        }
    }
}
