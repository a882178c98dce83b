//! Turn/phase state machine.
//!
//! `PhaseMachine` validates and executes turn starts and phase changes on a
//! `GameState`, running each phase's entry actions:
//!
//! - `untap`: the active player's permanents untap
//! - `draw`: the active player draws a card, or loses on an empty library
//! - `combat_end`: every creature leaves combat
//! - `cleanup`: an oversized hand is reported with a notice
//!
//! By default any turn phase may follow any other; the caller is trusted to
//! advance in order. With `SessionConfig::strict_phase_order` the machine
//! only accepts the successor of the current phase, and a new turn can only
//! begin through `start_turn`.
//!
//! Every method checks all preconditions before it mutates anything.

use tracing::{debug, info, warn};

use super::notice::Notice;
use super::phase::Phase;
use crate::core::config::SessionConfig;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::error::{EngineError, Result};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// The turn/phase state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseMachine {
    strict: bool,
    max_hand_size: usize,
}

impl PhaseMachine {
    /// Create a machine for the given rules.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            strict: config.strict_phase_order,
            max_hand_size: config.max_hand_size,
        }
    }

    /// Returns true if phase order is enforced.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Begin a new turn for `player`.
    ///
    /// Increments the turn number, makes `player` active and puts the game
    /// in `untap`. Entry actions do not run until the next `change_phase`.
    pub fn start_turn(&self, state: &mut GameState, player: PlayerId) -> Result<()> {
        ensure_not_over(state)?;
        if !state.players.contains(player) {
            return Err(EngineError::UnknownPlayer(player));
        }
        if self.strict && !matches!(state.phase, Phase::Setup | Phase::Cleanup) {
            return Err(EngineError::PhaseOutOfOrder {
                from: state.phase,
                to: Phase::Untap,
            });
        }

        state.turn_number += 1;
        state.active_player = player;
        state.phase = Phase::Untap;
        state.entry_pending = true;

        info!(turn = state.turn_number, player = %player, "turn started");
        Ok(())
    }

    /// Check whether `phase` may be entered now, without changing anything.
    pub fn check_transition(&self, state: &GameState, phase: Phase) -> Result<()> {
        ensure_not_over(state)?;
        if !phase.is_turn_phase() {
            return Err(EngineError::InvalidPhase(phase.to_string()));
        }
        if !self.strict {
            return Ok(());
        }
        if state.turn_number == 0 {
            return Err(EngineError::NoActivePlayer);
        }

        let expected = if state.entry_pending {
            Some(Phase::Untap)
        } else if state.phase == Phase::Cleanup {
            // The next untap belongs to a new turn.
            None
        } else {
            state.phase.next()
        };
        if expected == Some(phase) {
            Ok(())
        } else {
            Err(EngineError::PhaseOutOfOrder {
                from: state.phase,
                to: phase,
            })
        }
    }

    /// Enter `phase` and run its entry actions.
    ///
    /// Entering `draw` with an empty library ends the game; the returned
    /// notices say so.
    pub fn change_phase(&self, state: &mut GameState, phase: Phase) -> Result<Vec<Notice>> {
        self.check_transition(state, phase)?;

        debug!(from = %state.phase, to = %phase, turn = state.turn_number, "phase change");
        state.phase = phase;
        state.entry_pending = false;

        let mut notices = Vec::new();
        let active = state.active_player;
        match phase {
            Phase::Untap => {
                state.zones.for_each_on_battlefield(|card| {
                    if card.controller() == active {
                        card.set_tapped(false);
                    }
                });
            }
            Phase::Draw => {
                notices.extend(draw_or_lose(state, active)?);
            }
            Phase::CombatEnd => {
                state.zones.for_each_on_battlefield(|card| {
                    card.leave_combat();
                });
            }
            Phase::Cleanup => {
                let hand_size = state.zones.hand(active).map_or(0, |hand| hand.len());
                if hand_size > self.max_hand_size {
                    warn!(
                        player = %active,
                        hand_size,
                        max = self.max_hand_size,
                        "hand size exceeded at cleanup"
                    );
                    notices.push(Notice::HandSizeExceeded {
                        player: active,
                        hand_size,
                        max_hand_size: self.max_hand_size,
                    });
                }
            }
            _ => {}
        }
        Ok(notices)
    }
}

fn ensure_not_over(state: &GameState) -> Result<()> {
    if state.phase == Phase::Ended {
        Err(EngineError::GameOver)
    } else {
        Ok(())
    }
}

/// Draw one card for `player`.
///
/// If the library is empty nothing moves; the opponent is declared winner,
/// the game ends, and an `EmptyLibraryLoss` notice is returned.
pub fn draw_or_lose(state: &mut GameState, player: PlayerId) -> Result<Option<Notice>> {
    if state.zones.draw(player)?.is_some() {
        return Ok(None);
    }

    let winner = state
        .players
        .opponent_of(player)
        .ok_or(EngineError::UnknownPlayer(player))?;
    info!(loser = %player, winner = %winner, "library empty, game over");
    state.finish(Some(winner));
    Ok(Some(Notice::EmptyLibraryLoss {
        loser: player,
        winner,
    }))
}
