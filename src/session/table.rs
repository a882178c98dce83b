//! Multi-game façade wired to a backing store.
//!
//! A `Table` resolves players and decks through its store, runs any number
//! of sessions, and records every finished match. Player statistics are
//! recomputed from the match history each time a match is recorded.
//!
//! A game that ends while the store is failing stays in the unrecorded set
//! until `record_pending` succeeds; the game itself is never rolled back.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{info, warn};

use crate::cards::DeckId;
use crate::core::action::Action;
use crate::core::config::SessionConfig;
use crate::core::entity::GameId;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::error::{EngineError, Result};
use crate::store::{MatchRecord, PlayerStats, TableStore};

use super::game::{GameSession, Response, Seat};

/// Sessions plus the store they draw players, decks and history from.
pub struct Table<S: TableStore> {
    store: S,
    sessions: FxHashMap<GameId, GameSession>,
    /// Ended games whose match record has not reached the store yet.
    unrecorded: FxHashSet<GameId>,
    next_game: u64,
    config: SessionConfig,
}

impl<S: TableStore> Table<S> {
    /// Create a table. `config` applies to every game created here.
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self {
            store,
            sessions: FxHashMap::default(),
            unrecorded: FxHashSet::default(),
            next_game: 1,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Number of sessions held, running or finished.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn seat(&self, player: PlayerId, deck: DeckId) -> Result<Seat> {
        let profile = self
            .store
            .get_player(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let deck = self
            .store
            .get_deck(deck)
            .ok_or(EngineError::UnknownDeck(deck))?;
        Ok(Seat { profile, deck })
    }

    /// Start a game between two registered players.
    ///
    /// Decks are checked against the rules of their format first.
    pub fn create_game(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        deck1: DeckId,
        deck2: DeckId,
    ) -> Result<GameId> {
        let seat1 = self.seat(player1, deck1)?;
        let seat2 = self.seat(player2, deck2)?;
        seat1.deck.validate_for_format(&self.store)?;
        seat2.deck.validate_for_format(&self.store)?;

        let id = GameId::new(self.next_game);
        let session =
            GameSession::create_game(id, self.config.clone(), &self.store, seat1, seat2)?;
        self.next_game += 1;
        self.sessions.insert(id, session);
        Ok(id)
    }

    /// The session of a game.
    pub fn session(&self, id: GameId) -> Result<&GameSession> {
        self.sessions.get(&id).ok_or(EngineError::UnknownGame(id))
    }

    /// Snapshot of a game.
    pub fn snapshot(&self, id: GameId) -> Result<GameState> {
        Ok(self.session(id)?.snapshot())
    }

    /// Apply an action to a game.
    ///
    /// A game that ends here is recorded. If the store refuses the record,
    /// the response is still returned and the game waits in the
    /// unrecorded set.
    pub fn apply(&mut self, id: GameId, action: Action) -> Result<Response> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(EngineError::UnknownGame(id))?;
        let was_over = session.is_over();
        let response = session.apply(action);

        if !was_over && response.state.is_over() {
            self.finish(id);
        }
        Ok(response)
    }

    /// End a game and record it. Recording failures are handled as in
    /// `apply`.
    pub fn end_game(&mut self, id: GameId, winner: Option<PlayerId>) -> Result<GameState> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(EngineError::UnknownGame(id))?;
        let outcome = session.end_game(winner)?;
        self.finish(id);
        Ok(outcome.state)
    }

    /// Ended games still waiting for their match record, by ID.
    pub fn unrecorded(&self) -> Vec<GameId> {
        let mut ids: Vec<_> = self.unrecorded.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Retry recording every ended game the store has not accepted yet.
    ///
    /// Returns how many were recorded. Stops at the first store failure;
    /// the rest stay pending.
    pub fn record_pending(&mut self) -> Result<usize> {
        let pending = self.unrecorded();
        for &id in &pending {
            self.record(id)?;
        }
        Ok(pending.len())
    }

    /// Save a game through the store.
    pub fn save(&mut self, id: GameId) -> Result<()> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(EngineError::UnknownGame(id))?;
        session.save(&mut self.store)
    }

    /// Load a saved game, replacing any session held under the same ID.
    pub fn load(&mut self, id: GameId) -> Result<&GameSession> {
        let document = self.store.load(id)?;
        let session = GameSession::load_state(&document)?;
        if session.id() != id {
            return Err(EngineError::CorruptState(format!(
                "document saved for {id} holds {}",
                session.id()
            )));
        }
        self.next_game = self.next_game.max(id.raw() + 1);
        info!(game = %id, turn = session.state().turn_number, "game loaded");
        self.sessions.insert(id, session);
        self.session(id)
    }

    /// A player's statistics, projected from the match history.
    pub fn stats(&self, player: PlayerId) -> PlayerStats {
        PlayerStats::project(player, &self.store.matches_for(player))
    }

    fn finish(&mut self, id: GameId) {
        self.unrecorded.insert(id);
        if let Err(err) = self.record(id) {
            warn!(game = %id, error = %err, "match not recorded, kept for retry");
        }
    }

    fn record(&mut self, id: GameId) -> Result<()> {
        let state = self.snapshot(id)?;
        self.record_match(&state)?;
        self.unrecorded.remove(&id);
        Ok(())
    }

    fn record_match(&mut self, state: &GameState) -> Result<()> {
        let Some(record) = MatchRecord::from_state(state) else {
            warn!(game = %state.game_id, "tried to record a running game");
            return Ok(());
        };
        let players = [record.player1, record.player2];
        self.store.put_match(record)?;

        for player in players {
            let stats = self.stats(player);
            self.store.put_stats(stats)?;
        }
        info!(game = %state.game_id, winner = ?state.winner, "match recorded");
        Ok(())
    }
}
