//! External collaborators: catalog, decks, players, match history and
//! saved game documents.
//!
//! The engine only talks to storage through these traits. `MemoryStore`
//! implements all of them in memory; a database-backed application provides
//! its own implementations.

pub mod memory;
pub mod stats;

pub use memory::MemoryStore;
pub use stats::{MatchOutcome, MatchRecord, PlayerStats};

use crate::cards::{CardDefinition, CardId, Deck, DeckId};
use crate::core::entity::GameId;
use crate::core::player::{PlayerId, PlayerProfile};
use crate::error::{EngineError, Result, StoreError};

/// Read-only card catalog. Only consulted when libraries are built.
pub trait CatalogStore {
    fn get_card_definition(&self, id: CardId) -> Option<CardDefinition>;
}

/// Read-only deck lookup.
pub trait DeckStore {
    fn get_deck(&self, id: DeckId) -> Option<Deck>;

    /// A deck's `(definition, quantity)` pairs.
    fn get_deck_contents(
        &self,
        id: DeckId,
        catalog: &dyn CatalogStore,
    ) -> Result<Vec<(CardDefinition, u32)>> {
        self.get_deck(id)
            .ok_or(EngineError::UnknownDeck(id))?
            .contents(catalog)
    }
}

/// Registered players and their stored statistics.
pub trait PlayerStore {
    fn get_player(&self, id: PlayerId) -> Option<PlayerProfile>;

    fn get_stats(&self, id: PlayerId) -> Option<PlayerStats>;

    fn put_stats(&mut self, stats: PlayerStats) -> Result<(), StoreError>;
}

/// Historical match records.
pub trait MatchStore {
    /// Insert or replace the record for `record.game_id`.
    fn put_match(&mut self, record: MatchRecord) -> Result<(), StoreError>;

    /// Every recorded match `player` took part in, ordered by game ID.
    fn matches_for(&self, player: PlayerId) -> Vec<MatchRecord>;
}

/// Saved game documents. The engine owns the document format; the store
/// only keeps the text.
pub trait PersistenceStore {
    fn save(&mut self, game: GameId, document: &str) -> Result<(), StoreError>;

    fn load(&self, game: GameId) -> Result<String, StoreError>;
}

/// Everything a `Table` needs from its backing store.
pub trait TableStore: CatalogStore + DeckStore + PlayerStore + MatchStore + PersistenceStore {}

impl<T> TableStore for T where
    T: CatalogStore + DeckStore + PlayerStore + MatchStore + PersistenceStore
{
}
