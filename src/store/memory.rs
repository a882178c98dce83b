//! In-memory implementation of every store trait.

use rustc_hash::FxHashMap;

use super::stats::{MatchRecord, PlayerStats};
use super::{CatalogStore, DeckStore, MatchStore, PersistenceStore, PlayerStore};
use crate::cards::{CardDefinition, CardId, CardRegistry, Deck, DeckId};
use crate::core::entity::GameId;
use crate::core::player::{PlayerId, PlayerProfile};
use crate::error::StoreError;

/// Catalog, decks, players, match history and saved games held in memory.
///
/// ```
/// use ccg_table::cards::{CardDefinition, CardId, Deck, DeckId};
/// use ccg_table::core::{PlayerId, PlayerProfile};
/// use ccg_table::store::{DeckStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.add_card(CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest"));
/// store.add_player(PlayerProfile::new(PlayerId::new(1), "Alice"));
/// store.add_deck(Deck::new(DeckId::new(1), PlayerId::new(1), "Lands", "Casual")
///     .with_card(CardId::new(1), 40));
///
/// let contents = store.get_deck_contents(DeckId::new(1), &store).unwrap();
/// assert_eq!(contents[0].1, 40);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    catalog: CardRegistry,
    decks: FxHashMap<DeckId, Deck>,
    players: FxHashMap<PlayerId, PlayerProfile>,
    stats: FxHashMap<PlayerId, PlayerStats>,
    matches: FxHashMap<GameId, MatchRecord>,
    documents: FxHashMap<GameId, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a catalog card.
    pub fn add_card(&mut self, card: CardDefinition) {
        self.catalog.register(card);
    }

    /// Add or replace a deck.
    pub fn add_deck(&mut self, deck: Deck) {
        self.decks.insert(deck.id, deck);
    }

    /// Add or replace a player profile.
    pub fn add_player(&mut self, profile: PlayerProfile) {
        self.players.insert(profile.id, profile);
    }

    #[must_use]
    pub fn catalog(&self) -> &CardRegistry {
        &self.catalog
    }

    /// Number of saved game documents.
    #[must_use]
    pub fn saved_games(&self) -> usize {
        self.documents.len()
    }
}

impl CatalogStore for MemoryStore {
    fn get_card_definition(&self, id: CardId) -> Option<CardDefinition> {
        self.catalog.get_card_definition(id)
    }
}

impl DeckStore for MemoryStore {
    fn get_deck(&self, id: DeckId) -> Option<Deck> {
        self.decks.get(&id).cloned()
    }
}

impl PlayerStore for MemoryStore {
    fn get_player(&self, id: PlayerId) -> Option<PlayerProfile> {
        self.players.get(&id).cloned()
    }

    fn get_stats(&self, id: PlayerId) -> Option<PlayerStats> {
        self.stats.get(&id).copied()
    }

    fn put_stats(&mut self, stats: PlayerStats) -> Result<(), StoreError> {
        self.stats.insert(stats.player, stats);
        Ok(())
    }
}

impl MatchStore for MemoryStore {
    fn put_match(&mut self, record: MatchRecord) -> Result<(), StoreError> {
        self.matches.insert(record.game_id, record);
        Ok(())
    }

    fn matches_for(&self, player: PlayerId) -> Vec<MatchRecord> {
        let mut records: Vec<_> = self
            .matches
            .values()
            .filter(|r| r.involves(player))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.game_id);
        records
    }
}

impl PersistenceStore for MemoryStore {
    fn save(&mut self, game: GameId, document: &str) -> Result<(), StoreError> {
        self.documents.insert(game, document.to_string());
        Ok(())
    }

    fn load(&self, game: GameId) -> Result<String, StoreError> {
        self.documents
            .get(&game)
            .cloned()
            .ok_or(StoreError::NoSavedState(game))
    }
}
