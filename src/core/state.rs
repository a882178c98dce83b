//! Game state: the single serializable snapshot of a game.
//!
//! ## GameState
//!
//! Everything about a game lives here and nowhere else:
//! - Turn number, active player, phase, winner
//! - Player states (life, mana pool)
//! - The zone store (every card instance and where it is)
//! - Definitions of the cards in play
//! - Timestamps, RNG position, session configuration
//! - Action history
//!
//! Collections are `im` persistent structures, so `clone()` is cheap and a
//! session can hand out snapshots freely.
//!
//! ## PublicView
//!
//! What one player is allowed to see: libraries are reduced to their sizes
//! and opponents' hands are hidden.

use chrono::{DateTime, Utc};
use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::{SessionConfig, ZoneVisibility};
use super::entity::{GameId, InstanceId};
use super::mana::ManaPool;
use super::player::{PlayerId, PlayerMap, PlayerProfile, PlayerState};
use super::rng::GameRngState;
use crate::cards::{CardDefinition, CardId, CardInstance};
use crate::error::{EngineError, Result};
use crate::rules::{GameResult, Phase};
use crate::zones::{Location, Zone, ZoneStore};

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: GameId,

    /// Rules this game is played with.
    pub config: SessionConfig,

    /// Starts at 0; incremented by each `start_turn`.
    pub turn_number: u32,

    /// Whose turn it is. Player 1 until the first `start_turn`.
    pub active_player: PlayerId,

    pub phase: Phase,

    /// Set by `start_turn`: the game is in `untap` but its entry action has
    /// not run yet.
    pub entry_pending: bool,

    /// Seated players in seating order.
    pub players: PlayerMap<PlayerState>,

    pub zones: ZoneStore,

    /// Definitions of every card in the game.
    pub definitions: OrdMap<CardId, CardDefinition>,

    /// `None` while running, and for a drawn game once ended.
    pub winner: Option<PlayerId>,

    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,

    /// When the state was last saved successfully.
    pub saved_at: Option<DateTime<Utc>>,

    /// Shuffle RNG position.
    pub rng: GameRngState,

    /// Every successful action, oldest first.
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// Create a game in `setup` with empty zones.
    ///
    /// Each player starts at the configured life total with an empty mana
    /// pool. `first` is the active player until a turn is started.
    #[must_use]
    pub fn new(
        game_id: GameId,
        config: SessionConfig,
        profiles: &[PlayerProfile],
        first: PlayerId,
    ) -> Self {
        let mut players = PlayerMap::new();
        for profile in profiles {
            players.insert(profile.id, PlayerState::new(profile, config.starting_life));
        }
        let rng = GameRngState {
            seed: config.seed.unwrap_or_default(),
            word_pos: 0,
        };

        Self {
            game_id,
            turn_number: 0,
            active_player: first,
            phase: Phase::Setup,
            entry_pending: false,
            zones: ZoneStore::new(players.player_ids()),
            players,
            definitions: OrdMap::new(),
            winner: None,
            started_at: Utc::now(),
            ended_at: None,
            saved_at: None,
            rng,
            history: Vector::new(),
            config,
        }
    }

    /// Check if the game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// The result, once the game has ended.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if !self.is_over() {
            return None;
        }
        Some(self.winner.map_or(GameResult::Draw, GameResult::Winner))
    }

    /// End the game.
    pub fn finish(&mut self, winner: Option<PlayerId>) {
        self.phase = Phase::Ended;
        self.entry_pending = false;
        self.winner = winner;
        self.ended_at = Some(Utc::now());
    }

    /// Time from start to end (or to now, while running).
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Append an action to the history.
    ///
    /// With a history limit configured, the oldest records are dropped once
    /// the limit is reached.
    pub fn record(&mut self, action: Action) {
        let sequence = self.history.back().map_or(0, |last| last.sequence + 1);
        self.history.push_back(ActionRecord {
            turn: self.turn_number,
            sequence,
            action,
        });
        if let Some(limit) = self.config.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    /// Get a seated player's state.
    pub fn player(&self, player: PlayerId) -> Result<&PlayerState> {
        self.players
            .get(player)
            .ok_or(EngineError::UnknownPlayer(player))
    }

    pub(crate) fn player_mut(&mut self, player: PlayerId) -> Result<&mut PlayerState> {
        self.players
            .get_mut(player)
            .ok_or(EngineError::UnknownPlayer(player))
    }

    /// The opponent of a seated player.
    pub fn opponent_of(&self, player: PlayerId) -> Result<PlayerId> {
        self.players
            .opponent_of(player)
            .ok_or(EngineError::UnknownPlayer(player))
    }

    /// The definition of a card instance.
    #[must_use]
    pub fn definition_of(&self, id: InstanceId) -> Option<&CardDefinition> {
        let card = self.zones.get(id)?;
        self.definitions.get(&card.card_id)
    }

    #[must_use]
    pub fn library_size(&self, player: PlayerId) -> usize {
        self.zones.zone_size(Location::of(player, Zone::Library))
    }

    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> usize {
        self.zones.zone_size(Location::of(player, Zone::Hand))
    }

    /// Check internal consistency of a state that came from outside.
    pub fn validate(&self) -> Result<()> {
        if self.players.len() != 2 {
            return Err(EngineError::CorruptState(format!(
                "expected 2 players, found {}",
                self.players.len()
            )));
        }
        if !self.players.contains(self.active_player) {
            return Err(EngineError::CorruptState(format!(
                "active player {} is not seated",
                self.active_player
            )));
        }
        if let Some(winner) = self.winner {
            if !self.players.contains(winner) {
                return Err(EngineError::CorruptState(format!(
                    "winner {winner} is not seated"
                )));
            }
        }
        if self.is_over() != self.ended_at.is_some() {
            return Err(EngineError::CorruptState(
                "end time does not match phase".to_string(),
            ));
        }
        for player in self.players.player_ids() {
            if !self.zones.has_player(player) {
                return Err(EngineError::CorruptState(format!("{player} has no zones")));
            }
        }
        if let Some(card) = self
            .zones
            .cards()
            .find(|c| !self.definitions.contains_key(&c.card_id))
        {
            return Err(EngineError::CorruptState(format!(
                "{} has no definition for {}",
                card.id, card.card_id
            )));
        }
        self.zones.check_invariants()
    }

    /// Serialize to the JSON persistence document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from a JSON persistence document.
    pub fn from_json(document: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(document)?;
        state.validate()?;
        Ok(state)
    }

    /// Serialize to a compact binary checkpoint.
    pub fn to_checkpoint(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore from a binary checkpoint.
    pub fn from_checkpoint(bytes: &[u8]) -> Result<Self> {
        let state: Self = bincode::deserialize(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// What `viewer` may see of this game.
    pub fn public_view(&self, viewer: PlayerId) -> Result<PublicView> {
        if !self.players.contains(viewer) {
            return Err(EngineError::UnknownPlayer(viewer));
        }

        let cards = |location: Location| -> Vec<CardInstance> {
            self.zones.cards_in(location).cloned().collect()
        };
        let visible = |zone: Zone, owner: PlayerId| match zone.visibility() {
            ZoneVisibility::Public => true,
            ZoneVisibility::OwnerOnly => owner == viewer,
            ZoneVisibility::Hidden => false,
        };

        let players = self
            .players
            .iter()
            .map(|(id, player)| PublicPlayer {
                id,
                name: player.name.clone(),
                life: player.life,
                mana_pool: player.mana_pool,
                library_size: self.library_size(id),
                hand_size: self.hand_size(id),
                hand: visible(Zone::Hand, id).then(|| cards(Location::of(id, Zone::Hand))),
                graveyard: cards(Location::of(id, Zone::Graveyard)),
            })
            .collect();

        Ok(PublicView {
            viewer,
            game_id: self.game_id,
            turn_number: self.turn_number,
            active_player: self.active_player,
            phase: self.phase,
            winner: self.winner,
            players,
            battlefield: cards(Location::shared(Zone::Battlefield)),
            stack: cards(Location::shared(Zone::Stack)),
            exile: cards(Location::shared(Zone::Exile)),
            command: cards(Location::shared(Zone::Command)),
        })
    }
}

/// One player as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub life: i32,
    pub mana_pool: ManaPool,
    pub library_size: usize,
    pub hand_size: usize,
    /// Hand contents; `None` unless this is the viewer.
    pub hand: Option<Vec<CardInstance>>,
    pub graveyard: Vec<CardInstance>,
}

/// A game as seen by one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicView {
    pub viewer: PlayerId,
    pub game_id: GameId,
    pub turn_number: u32,
    pub active_player: PlayerId,
    pub phase: Phase,
    pub winner: Option<PlayerId>,
    pub players: Vec<PublicPlayer>,
    pub battlefield: Vec<CardInstance>,
    pub stack: Vec<CardInstance>,
    pub exile: Vec<CardInstance>,
    pub command: Vec<CardInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::build_library;
    use crate::core::rng::GameRng;

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn state() -> GameState {
        let profiles = [PlayerProfile::new(ALICE, "Alice"), PlayerProfile::new(BOB, "Bob")];
        let mut state = GameState::new(GameId::new(9), SessionConfig::new(), &profiles, ALICE);
        let island = CardDefinition::new(CardId::new(3), "Island", "Basic Land - Island");
        let mut rng = GameRng::new(3);
        for player in [ALICE, BOB] {
            let cards =
                build_library(&[(island.clone(), 10)], player, state.zones.id_gen_mut(), &mut rng);
            state.zones.load_library(player, cards).unwrap();
        }
        state.definitions.insert(island.id, island);
        state
    }

    #[test]
    fn test_new_state() {
        let state = state();

        assert_eq!(state.turn_number, 0);
        assert_eq!(state.active_player, ALICE);
        assert_eq!(state.phase, Phase::Setup);
        assert_eq!(state.player(ALICE).unwrap().life, 20);
        assert!(state.player(BOB).unwrap().mana_pool.is_empty());
        assert_eq!(state.library_size(BOB), 10);
        assert!(state.result().is_none());
        state.validate().unwrap();
    }

    #[test]
    fn test_finish() {
        let mut state = state();

        state.finish(Some(BOB));
        assert!(state.is_over());
        assert_eq!(state.result(), Some(GameResult::Winner(BOB)));
        assert!(state.ended_at.is_some());
        assert!(state.duration() >= chrono::Duration::zero());

        state.finish(None);
        assert_eq!(state.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_record_sequences() {
        let mut state = state();
        state.record(Action::StartTurn { player: ALICE });
        state.turn_number = 1;
        state.record(Action::ChangePhase { phase: Phase::Untap });

        let seqs: Vec<_> = state.history.iter().map(|r| (r.turn, r.sequence)).collect();
        assert_eq!(seqs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_record_trims_to_history_limit() {
        let mut state = state();
        state.config = state.config.clone().with_history_limit(2);

        for _ in 0..5 {
            state.record(Action::ShuffleLibrary { player: ALICE });
        }

        let seqs: Vec<_> = state.history.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![3, 4]);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let mut state = state();
        state.zones.draw(ALICE).unwrap();

        let json = state.to_json().unwrap();
        let restored = GameState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let mut state = state();
        state.zones.draw(BOB).unwrap();
        state.finish(Some(ALICE));

        let bytes = state.to_checkpoint().unwrap();
        let restored = GameState::from_checkpoint(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameState::from_json("{\"not\": \"a game\"}"),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_definition() {
        let mut state = state();
        state.definitions = OrdMap::new();
        assert!(matches!(state.validate(), Err(EngineError::CorruptState(_))));
    }

    #[test]
    fn test_public_view_hides_hidden_zones() {
        let mut state = state();
        state.zones.draw(ALICE).unwrap();
        state.zones.draw(BOB).unwrap();
        state.zones.draw(BOB).unwrap();

        let view = state.public_view(ALICE).unwrap();

        let alice = &view.players[0];
        let bob = &view.players[1];
        assert_eq!(alice.hand.as_ref().map(Vec::len), Some(1));
        assert!(bob.hand.is_none());
        assert_eq!(bob.hand_size, 2);
        assert_eq!(bob.library_size, 8);

        assert!(matches!(
            state.public_view(PlayerId(5)),
            Err(EngineError::UnknownPlayer(_))
        ));
    }
}
