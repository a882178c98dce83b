//! Game session: the façade a presentation layer talks to.
//!
//! A `GameSession` owns the authoritative `GameState` of one match, the
//! shuffle RNG and the phase machine. Every action method:
//!
//! 1. refuses to run once the game has ended (`GameOver`),
//! 2. works on a copy of the state (O(1) thanks to persistent collections),
//! 3. commits the copy and records the action only if it succeeded.
//!
//! A failed call therefore never leaves a partial change behind.
//!
//! ## Example
//!
//! ```
//! use ccg_table::cards::{CardDefinition, CardId, CardRegistry, Deck, DeckId};
//! use ccg_table::core::{GameId, PlayerId, PlayerProfile, SessionConfig};
//! use ccg_table::rules::Phase;
//! use ccg_table::session::{GameSession, Seat};
//!
//! let catalog: CardRegistry =
//!     std::iter::once(CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest"))
//!         .collect();
//! let alice = PlayerId::new(1);
//! let bob = PlayerId::new(2);
//! let seat = |id: PlayerId, name: &str| Seat {
//!     profile: PlayerProfile::new(id, name),
//!     deck: Deck::new(DeckId::new(id.raw()), id, "Lands", "Casual").with_card(CardId::new(1), 60),
//! };
//!
//! let mut session = GameSession::create_game(
//!     GameId::new(1),
//!     SessionConfig::new().with_seed(7),
//!     &catalog,
//!     seat(alice, "Alice"),
//!     seat(bob, "Bob"),
//! )
//! .unwrap();
//!
//! session.start_turn(alice).unwrap();
//! session.change_phase(Phase::Untap).unwrap();
//! let outcome = session.change_phase(Phase::Draw).unwrap();
//!
//! assert!(outcome.notices.is_empty());
//! assert_eq!(outcome.state.hand_size(alice), 1);
//! assert_eq!(outcome.state.library_size(alice), 59);
//! ```

use tracing::{debug, info, warn};

use crate::cards::{build_library, CardDefinition, Deck};
use crate::core::action::Action;
use crate::core::config::SessionConfig;
use crate::core::entity::{GameId, InstanceId};
use crate::core::mana::{ManaColor, ManaPool};
use crate::core::player::{PlayerId, PlayerProfile};
use crate::core::rng::GameRng;
use crate::core::state::{GameState, PublicView};
use crate::error::{EngineError, Result};
use crate::rules::{draw_or_lose, Notice, Phase, PhaseMachine};
use crate::store::{CatalogStore, PersistenceStore};
use crate::zones::{Found, Zone};

/// A player and the deck they bring to the table.
#[derive(Clone, Debug)]
pub struct Seat {
    pub profile: PlayerProfile,
    pub deck: Deck,
}

/// A successful action: the new snapshot and anything the caller must act
/// on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub state: GameState,
    pub notices: Vec<Notice>,
}

/// Reply to `GameSession::apply`: always carries the current snapshot, so
/// the caller can render whether or not the action succeeded.
#[derive(Debug)]
pub struct Response {
    pub state: GameState,
    pub result: Result<Vec<Notice>>,
}

impl Response {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// One running (or finished) match between two players.
#[derive(Clone, Debug)]
pub struct GameSession {
    state: GameState,
    rng: GameRng,
    machine: PhaseMachine,
}

impl GameSession {
    /// Set up a new game.
    ///
    /// Each deck must belong to the player bringing it. Both libraries are
    /// built and shuffled, both players start with the configured life and
    /// an empty mana pool, and `player1` is the active player.
    pub fn create_game(
        game_id: GameId,
        config: SessionConfig,
        catalog: &dyn CatalogStore,
        player1: Seat,
        player2: Seat,
    ) -> Result<Self> {
        if player1.profile.id == player2.profile.id {
            return Err(EngineError::DuplicatePlayer(player1.profile.id));
        }
        for seat in [&player1, &player2] {
            if seat.deck.owner != seat.profile.id {
                return Err(EngineError::OwnershipMismatch {
                    deck: seat.deck.id,
                    player: seat.profile.id,
                });
            }
        }
        let contents1 = player1.deck.contents(catalog)?;
        let contents2 = player2.deck.contents(catalog)?;

        let mut rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let first = player1.profile.id;
        let mut state = GameState::new(
            game_id,
            config,
            &[player1.profile.clone(), player2.profile.clone()],
            first,
        );

        for (seat, contents) in [(&player1, &contents1), (&player2, &contents2)] {
            let player = seat.profile.id;
            let library = build_library(contents, player, state.zones.id_gen_mut(), &mut rng);
            state.zones.load_library(player, library)?;
            for (def, _) in contents {
                state.definitions.insert(def.id, def.clone());
            }
        }
        state.rng = rng.state();

        info!(
            game = %game_id,
            player1 = %first,
            player2 = %player2.profile.id,
            seed = rng.seed(),
            cards = state.zones.total_cards(),
            "game created"
        );

        Ok(Self {
            machine: PhaseMachine::new(&state.config),
            state,
            rng,
        })
    }

    /// Resume a game from a previously captured state.
    pub fn from_state(state: GameState) -> Result<Self> {
        state.validate()?;
        Ok(Self {
            rng: GameRng::from_state(&state.rng),
            machine: PhaseMachine::new(&state.config),
            state,
        })
    }

    /// Resume a game from its JSON document.
    pub fn load_state(document: &str) -> Result<Self> {
        Self::from_state(GameState::from_json(document)?)
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.state.game_id
    }

    /// Read-only view of the authoritative state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// What `viewer` may see.
    pub fn public_view(&self, viewer: PlayerId) -> Result<PublicView> {
        self.state.public_view(viewer)
    }

    /// Look up a card instance and where it is.
    pub fn find(&self, id: InstanceId) -> Result<Found<'_>> {
        self.state.zones.find(id)
    }

    /// The catalog definition of a card instance.
    #[must_use]
    pub fn definition_of(&self, id: InstanceId) -> Option<&CardDefinition> {
        self.state.definition_of(id)
    }

    fn outcome(&self, notices: Vec<Notice>) -> Outcome {
        Outcome {
            state: self.snapshot(),
            notices,
        }
    }

    /// Run `f` on a working copy and commit it, with `action` recorded, only
    /// if `f` succeeds.
    fn transact<F>(&mut self, action: Action, f: F) -> Result<Outcome>
    where
        F: FnOnce(&mut GameState, &mut GameRng, &PhaseMachine) -> Result<Vec<Notice>>,
    {
        if self.state.is_over() {
            return Err(EngineError::GameOver);
        }
        let mut next = self.state.clone();
        let mut rng = self.rng.clone();

        let notices = f(&mut next, &mut rng, &self.machine).map_err(|err| {
            debug!(game = %self.state.game_id, action = action.name(), error = %err, "action rejected");
            err
        })?;

        next.rng = rng.state();
        next.record(action);
        self.state = next;
        self.rng = rng;
        Ok(self.outcome(notices))
    }

    /// Begin a new turn for `player`. The game enters `untap`; its entry
    /// action runs on the next `change_phase`.
    pub fn start_turn(&mut self, player: PlayerId) -> Result<Outcome> {
        self.transact(Action::StartTurn { player }, |state, _, machine| {
            machine.start_turn(state, player)?;
            Ok(Vec::new())
        })
    }

    /// Enter a turn phase and run its entry action.
    pub fn change_phase(&mut self, phase: Phase) -> Result<Outcome> {
        self.transact(Action::ChangePhase { phase }, |state, _, machine| {
            machine.change_phase(state, phase)
        })
    }

    /// `change_phase` by phase name, for callers holding strings.
    pub fn change_phase_named(&mut self, name: &str) -> Result<Outcome> {
        self.change_phase(Phase::parse_turn_phase(name)?)
    }

    /// Draw `count` cards for `player`, one at a time.
    ///
    /// The first draw from an empty library ends the game; cards drawn
    /// before it stay in hand.
    pub fn draw_cards(&mut self, player: PlayerId, count: u32) -> Result<Outcome> {
        self.transact(Action::DrawCards { player, count }, |state, _, _| {
            state.player(player)?;
            for _ in 0..count {
                if let Some(loss) = draw_or_lose(state, player)? {
                    return Ok(vec![loss]);
                }
            }
            debug!(player = %player, count, "cards drawn");
            Ok(Vec::new())
        })
    }

    /// Move a card between zones. `player` defaults to the card's owner and
    /// becomes its controller when it enters the battlefield.
    pub fn move_card(
        &mut self,
        instance: InstanceId,
        from: Zone,
        to: Zone,
        player: Option<PlayerId>,
    ) -> Result<Outcome> {
        let action = Action::MoveCard {
            instance,
            from,
            to,
            player,
        };
        self.transact(action, |state, _, _| {
            let location = state.zones.move_card(instance, from, to, player)?;
            debug!(card = %instance, from = %from, to = %location, "card moved");
            Ok(Vec::new())
        })
    }

    /// Add mana to a player's pool.
    pub fn add_mana(&mut self, player: PlayerId, color: ManaColor, amount: u32) -> Result<Outcome> {
        self.transact(
            Action::AddMana {
                player,
                color,
                amount,
            },
            |state, _, _| {
                state.player_mut(player)?.mana_pool.add(color, amount);
                Ok(Vec::new())
            },
        )
    }

    /// Pay a cost from a player's pool. Either every color is covered and
    /// debited, or the pool is left unchanged.
    pub fn pay_mana(&mut self, player: PlayerId, cost: ManaPool) -> Result<Outcome> {
        self.transact(Action::PayMana { player, cost }, |state, _, _| {
            state.player_mut(player)?.mana_pool.pay(&cost)?;
            Ok(Vec::new())
        })
    }

    /// Tap or untap a card.
    ///
    /// Only cards on the battlefield can be tapped. Setting the value a card
    /// already has changes nothing and is not recorded.
    pub fn set_tapped(&mut self, instance: InstanceId, tapped: bool) -> Result<Outcome> {
        if self.state.is_over() {
            return Err(EngineError::GameOver);
        }
        let found = self.state.zones.find(instance)?;
        if found.zone != Zone::Battlefield {
            return Err(EngineError::ZoneMismatch {
                instance,
                expected: Zone::Battlefield,
                actual: found.card.location(),
            });
        }
        if found.card.is_tapped() == tapped {
            return Ok(self.outcome(Vec::new()));
        }
        self.transact(Action::SetTapped { instance, tapped }, |state, _, _| {
            if let Some(card) = state.zones.get_mut(instance) {
                card.set_tapped(tapped);
            }
            Ok(Vec::new())
        })
    }

    /// Declare attackers for the active player. Attacking creatures tap.
    ///
    /// Each attacker must be an untapped creature on the battlefield
    /// controlled by the active player.
    pub fn declare_attackers(&mut self, attackers: Vec<InstanceId>) -> Result<Outcome> {
        let action = Action::DeclareAttackers {
            attackers: attackers.clone(),
        };
        self.transact(action, |state, _, _| {
            let active = state.active_player;
            for &id in &attackers {
                check_combatant(state, id, |controller| controller == active)?;
            }
            for &id in &attackers {
                if let Some(card) = state.zones.get_mut(id) {
                    card.set_attacking(true);
                    card.set_tapped(true);
                }
            }
            info!(player = %active, count = attackers.len(), "attackers declared");
            Ok(Vec::new())
        })
    }

    /// Declare blockers for the non-active player. Blocking does not tap.
    pub fn declare_blockers(&mut self, blockers: Vec<InstanceId>) -> Result<Outcome> {
        let action = Action::DeclareBlockers {
            blockers: blockers.clone(),
        };
        self.transact(action, |state, _, _| {
            let active = state.active_player;
            for &id in &blockers {
                check_combatant(state, id, |controller| controller != active)?;
            }
            for &id in &blockers {
                if let Some(card) = state.zones.get_mut(id) {
                    card.set_blocking(true);
                }
            }
            Ok(Vec::new())
        })
    }

    /// Put counters on a card.
    pub fn add_counters(&mut self, instance: InstanceId, kind: &str, amount: u32) -> Result<Outcome> {
        let action = Action::AddCounters {
            instance,
            kind: kind.to_string(),
            amount,
        };
        self.transact(action, |state, _, _| {
            let card = state
                .zones
                .get_mut(instance)
                .ok_or(EngineError::NotFound(instance))?;
            card.add_counters(kind, amount);
            Ok(Vec::new())
        })
    }

    /// Take up to `amount` counters off a card.
    pub fn remove_counters(
        &mut self,
        instance: InstanceId,
        kind: &str,
        amount: u32,
    ) -> Result<Outcome> {
        let action = Action::RemoveCounters {
            instance,
            kind: kind.to_string(),
            amount,
        };
        self.transact(action, |state, _, _| {
            let card = state
                .zones
                .get_mut(instance)
                .ok_or(EngineError::NotFound(instance))?;
            card.remove_counters(kind, amount);
            Ok(Vec::new())
        })
    }

    /// Shuffle a player's library.
    pub fn shuffle_library(&mut self, player: PlayerId) -> Result<Outcome> {
        self.transact(Action::ShuffleLibrary { player }, |state, rng, _| {
            state.zones.shuffle_library(player, rng)?;
            Ok(Vec::new())
        })
    }

    /// End the game. `None` records a draw.
    pub fn end_game(&mut self, winner: Option<PlayerId>) -> Result<Outcome> {
        self.transact(Action::EndGame { winner }, |state, _, _| {
            if let Some(player) = winner {
                state.player(player)?;
            }
            state.finish(winner);
            info!(game = %state.game_id, winner = ?winner, turns = state.turn_number, "game ended");
            Ok(Vec::new())
        })
    }

    /// Dispatch an action. The response carries the current snapshot even
    /// when the action fails.
    pub fn apply(&mut self, action: Action) -> Response {
        let result = match action {
            Action::StartTurn { player } => self.start_turn(player),
            Action::ChangePhase { phase } => self.change_phase(phase),
            Action::DrawCards { player, count } => self.draw_cards(player, count),
            Action::MoveCard {
                instance,
                from,
                to,
                player,
            } => self.move_card(instance, from, to, player),
            Action::AddMana {
                player,
                color,
                amount,
            } => self.add_mana(player, color, amount),
            Action::PayMana { player, cost } => self.pay_mana(player, cost),
            Action::SetTapped { instance, tapped } => self.set_tapped(instance, tapped),
            Action::DeclareAttackers { attackers } => self.declare_attackers(attackers),
            Action::DeclareBlockers { blockers } => self.declare_blockers(blockers),
            Action::AddCounters {
                instance,
                kind,
                amount,
            } => self.add_counters(instance, &kind, amount),
            Action::RemoveCounters {
                instance,
                kind,
                amount,
            } => self.remove_counters(instance, &kind, amount),
            Action::ShuffleLibrary { player } => self.shuffle_library(player),
            Action::EndGame { winner } => self.end_game(winner),
        };

        match result {
            Ok(outcome) => Response {
                state: outcome.state,
                result: Ok(outcome.notices),
            },
            Err(err) => Response {
                state: self.snapshot(),
                result: Err(err),
            },
        }
    }

    /// The whole state as one JSON document.
    pub fn save_state(&self) -> Result<String> {
        self.state.to_json()
    }

    /// Save to a persistence store.
    ///
    /// The save time is stamped only if the store accepts the document; a
    /// failed save leaves the session untouched and is not retried.
    pub fn save(&mut self, store: &mut dyn PersistenceStore) -> Result<()> {
        let mut next = self.state.clone();
        next.saved_at = Some(chrono::Utc::now());
        let document = next.to_json()?;

        if let Err(err) = store.save(next.game_id, &document) {
            warn!(game = %next.game_id, error = %err, "save failed");
            return Err(err.into());
        }
        debug!(game = %next.game_id, bytes = document.len(), "game saved");
        self.state = next;
        Ok(())
    }
}

fn check_combatant(
    state: &GameState,
    id: InstanceId,
    allowed_controller: impl Fn(PlayerId) -> bool,
) -> Result<()> {
    let found = state.zones.find(id)?;
    let illegal = |reason| EngineError::IllegalCombat {
        instance: id,
        reason,
    };
    if found.zone != Zone::Battlefield {
        return Err(illegal("not on the battlefield"));
    }
    if !state.definition_of(id).is_some_and(CardDefinition::is_creature) {
        return Err(illegal("not a creature"));
    }
    if !allowed_controller(found.card.controller()) {
        return Err(illegal("controlled by the wrong player"));
    }
    if found.card.is_tapped() {
        return Err(illegal("tapped"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardRegistry, DeckId};
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn catalog() -> CardRegistry {
        [
            CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest"),
            CardDefinition::new(CardId::new(2), "Grizzly Bears", "Creature - Bear")
                .with_mana_cost("{1}{G}")
                .with_stats(2, 2),
        ]
        .into_iter()
        .collect()
    }

    fn seat(id: PlayerId, name: &str, size: u32) -> Seat {
        Seat {
            profile: PlayerProfile::new(id, name),
            deck: Deck::new(DeckId::new(id.raw()), id, "Bears", "Casual")
                .with_card(CardId::new(2), size),
        }
    }

    fn session(size: u32) -> GameSession {
        GameSession::create_game(
            GameId::new(1),
            SessionConfig::new().with_seed(42),
            &catalog(),
            seat(ALICE, "Alice", size),
            seat(BOB, "Bob", size),
        )
        .unwrap()
    }

    fn creature_in_play(session: &mut GameSession, player: PlayerId) -> InstanceId {
        session.draw_cards(player, 1).unwrap();
        let id = *session.state().zones.hand(player).unwrap().back().unwrap();
        session
            .move_card(id, Zone::Hand, Zone::Battlefield, Some(player))
            .unwrap();
        id
    }

    #[test]
    fn test_create_game() {
        let session = session(10);
        let state = session.state();

        assert_eq!(state.turn_number, 0);
        assert_eq!(state.phase, Phase::Setup);
        assert_eq!(state.active_player, ALICE);
        assert_eq!(state.library_size(ALICE), 10);
        assert_eq!(state.library_size(BOB), 10);
        assert_eq!(state.player(BOB).unwrap().life, 20);
        assert!(state.history.is_empty());
        state.validate().unwrap();
    }

    #[test]
    fn test_create_game_ownership_mismatch() {
        let mut stolen = seat(BOB, "Bob", 10);
        stolen.deck.owner = ALICE;

        let err = GameSession::create_game(
            GameId::new(1),
            SessionConfig::new(),
            &catalog(),
            seat(ALICE, "Alice", 10),
            stolen,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::OwnershipMismatch {
                player: PlayerId(2),
                ..
            }
        ));
    }

    #[test]
    fn test_create_game_same_player_twice() {
        let err = GameSession::create_game(
            GameId::new(1),
            SessionConfig::new(),
            &catalog(),
            seat(ALICE, "Alice", 10),
            seat(ALICE, "Alice", 10),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicatePlayer(PlayerId(1))));
    }

    #[test]
    fn test_create_game_unknown_card() {
        let mut bad = seat(BOB, "Bob", 10);
        bad.deck.add_card(CardId::new(77), 1);

        let err = GameSession::create_game(
            GameId::new(1),
            SessionConfig::new(),
            &catalog(),
            seat(ALICE, "Alice", 10),
            bad,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCard(CardId(77))));
    }

    #[test]
    fn test_failed_action_changes_nothing() {
        let mut session = session(5);
        let before = session.snapshot();

        assert!(session.start_turn(PlayerId(9)).is_err());
        assert!(session.change_phase(Phase::Ended).is_err());
        assert!(session.draw_cards(PlayerId(9), 1).is_err());

        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_history_records_successes_only() {
        let mut session = session(5);

        session.start_turn(ALICE).unwrap();
        let _ = session.change_phase(Phase::Setup);
        session.change_phase(Phase::Untap).unwrap();

        let names: Vec<_> = session
            .state()
            .history
            .iter()
            .map(|r| r.action.name())
            .collect();
        assert_eq!(names, vec!["start_turn", "change_phase"]);
    }

    #[test]
    fn test_draw_cards_partial_then_loss() {
        let mut session = session(2);

        let outcome = session.draw_cards(ALICE, 5).unwrap();

        assert_eq!(
            outcome.notices,
            vec![Notice::EmptyLibraryLoss {
                loser: ALICE,
                winner: BOB
            }]
        );
        assert_eq!(outcome.state.hand_size(ALICE), 2);
        assert_eq!(outcome.state.library_size(ALICE), 0);
        assert_eq!(outcome.state.phase, Phase::Ended);
        assert_eq!(outcome.state.winner, Some(BOB));
    }

    #[test]
    fn test_game_over_blocks_everything() {
        let mut session = session(3);
        session.end_game(None).unwrap();
        let before = session.snapshot();

        assert!(matches!(session.start_turn(ALICE), Err(EngineError::GameOver)));
        assert!(matches!(session.draw_cards(ALICE, 1), Err(EngineError::GameOver)));
        assert!(matches!(
            session.add_mana(ALICE, ManaColor::Red, 1),
            Err(EngineError::GameOver)
        ));
        assert!(matches!(session.end_game(Some(ALICE)), Err(EngineError::GameOver)));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_end_game_unknown_winner() {
        let mut session = session(3);
        assert!(matches!(
            session.end_game(Some(PlayerId(5))),
            Err(EngineError::UnknownPlayer(PlayerId(5)))
        ));
        assert!(!session.is_over());
    }

    #[test]
    fn test_mana() {
        let mut session = session(3);

        session.add_mana(ALICE, ManaColor::Green, 2).unwrap();
        session.add_mana(ALICE, ManaColor::Colorless, 1).unwrap();
        let cost = ManaPool::parse_cost("{1}{G}").unwrap();
        session.pay_mana(ALICE, cost).unwrap();

        let pool = session.state().player(ALICE).unwrap().mana_pool;
        assert_eq!(pool.get(ManaColor::Green), 1);
        assert_eq!(pool.get(ManaColor::Colorless), 0);

        let err = session.pay_mana(ALICE, cost).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientMana { .. }));
        assert_eq!(session.state().player(ALICE).unwrap().mana_pool, pool);

        assert!(matches!(
            session.add_mana(PlayerId(3), ManaColor::Red, 1),
            Err(EngineError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_set_tapped_idempotent() {
        let mut session = session(3);
        let bear = creature_in_play(&mut session, ALICE);

        session.set_tapped(bear, true).unwrap();
        let once = session.snapshot();
        session.set_tapped(bear, true).unwrap();

        assert_eq!(session.snapshot(), once);
        assert_eq!(
            session.find(bear).unwrap().card.revision(),
            once.zones.get(bear).unwrap().revision()
        );
    }

    #[test]
    fn test_set_tapped_off_battlefield() {
        let mut session = session(3);
        session.draw_cards(ALICE, 1).unwrap();
        let in_hand = *session.state().zones.hand(ALICE).unwrap().back().unwrap();
        let in_library = session.state().zones.top_of_library(ALICE).unwrap();
        let before = session.snapshot();

        for id in [in_hand, in_library] {
            assert!(matches!(
                session.set_tapped(id, true),
                Err(EngineError::ZoneMismatch {
                    expected: Zone::Battlefield,
                    ..
                })
            ));
        }
        assert_eq!(session.snapshot(), before);
        assert!(!session.find(in_hand).unwrap().card.is_tapped());
    }

    #[test]
    fn test_declare_attackers_taps() {
        let mut session = session(3);
        let bear = creature_in_play(&mut session, ALICE);
        session.start_turn(ALICE).unwrap();

        session.declare_attackers(vec![bear]).unwrap();

        let card = session.find(bear).unwrap().card;
        assert!(card.is_attacking());
        assert!(card.is_tapped());
    }

    #[test]
    fn test_declare_attackers_rejects_illegal() {
        let mut session = session(3);
        let theirs = creature_in_play(&mut session, BOB);
        session.draw_cards(ALICE, 1).unwrap();
        let in_hand = *session.state().zones.hand(ALICE).unwrap().back().unwrap();
        session.start_turn(ALICE).unwrap();
        let before = session.snapshot();

        for id in [theirs, in_hand] {
            assert!(matches!(
                session.declare_attackers(vec![id]),
                Err(EngineError::IllegalCombat { .. })
            ));
        }
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_declare_blockers() {
        let mut session = session(3);
        let blocker = creature_in_play(&mut session, BOB);
        session.start_turn(ALICE).unwrap();

        session.declare_blockers(vec![blocker]).unwrap();

        let card = session.find(blocker).unwrap().card;
        assert!(card.is_blocking());
        assert!(!card.is_tapped());
    }

    #[test]
    fn test_counters() {
        let mut session = session(3);
        let bear = creature_in_play(&mut session, ALICE);

        session.add_counters(bear, "+1/+1", 2).unwrap();
        session.remove_counters(bear, "+1/+1", 1).unwrap();

        assert_eq!(session.find(bear).unwrap().card.counter("+1/+1"), 1);
        assert!(matches!(
            session.add_counters(InstanceId(999), "+1/+1", 1),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_shuffle_library_advances_rng() {
        let mut session = session(20);
        let before = session.state().rng.clone();

        session.shuffle_library(BOB).unwrap();

        assert_ne!(session.state().rng, before);
        assert_eq!(session.state().library_size(BOB), 20);
    }

    #[test]
    fn test_apply_reports_errors_with_state() {
        let mut session = session(3);

        let response = session.apply(Action::StartTurn { player: PlayerId(8) });
        assert!(!response.is_ok());
        assert_eq!(response.state, session.snapshot());

        let response = session.apply(Action::StartTurn { player: BOB });
        assert!(response.is_ok());
        assert_eq!(response.state.active_player, BOB);
    }

    #[test]
    fn test_change_phase_named() {
        let mut session = session(3);
        session.start_turn(ALICE).unwrap();

        session.change_phase_named("main1").unwrap();
        assert_eq!(session.state().phase, Phase::Main1);

        assert!(matches!(
            session.change_phase_named("teatime"),
            Err(EngineError::InvalidPhase(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let mut session = session(5);
        session.start_turn(ALICE).unwrap();
        session.change_phase(Phase::Draw).unwrap();
        let mut store = MemoryStore::new();

        session.save(&mut store).unwrap();
        assert!(session.state().saved_at.is_some());

        let document = store.load(session.id()).unwrap();
        let restored = GameSession::load_state(&document).unwrap();
        assert_eq!(restored.snapshot(), session.snapshot());
    }

    struct BrokenStore;

    impl PersistenceStore for BrokenStore {
        fn save(&mut self, _: GameId, _: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        fn load(&self, game: GameId) -> std::result::Result<String, StoreError> {
            Err(StoreError::NoSavedState(game))
        }
    }

    #[test]
    fn test_failed_save_changes_nothing() {
        let mut session = session(5);
        let before = session.snapshot();

        let err = session.save(&mut BrokenStore).unwrap_err();

        assert!(matches!(err, EngineError::Store(StoreError::Backend(_))));
        assert_eq!(session.snapshot(), before);
        assert!(session.state().saved_at.is_none());
    }

    #[test]
    fn test_restored_session_continues_shuffles() {
        let mut original = session(30);
        original.shuffle_library(ALICE).unwrap();
        let mut restored = GameSession::from_state(original.snapshot()).unwrap();

        original.shuffle_library(BOB).unwrap();
        restored.shuffle_library(BOB).unwrap();

        assert_eq!(
            original.state().zones.library(BOB),
            restored.state().zones.library(BOB)
        );
    }
}
