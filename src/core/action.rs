//! Actions the presentation layer can send to a game session.
//!
//! Every entry point of `GameSession` has a matching `Action` variant, so a
//! UI (or a replay) can drive a game through `GameSession::apply` alone.
//! Successful actions are appended to the game's history as
//! `ActionRecord`s.
//!
//! ```
//! use ccg_table::core::{Action, PlayerId};
//! use ccg_table::rules::Phase;
//!
//! let start = Action::StartTurn { player: PlayerId::new(1) };
//! let draw = Action::ChangePhase { phase: Phase::Draw };
//!
//! assert_eq!(start.name(), "start_turn");
//! assert_eq!(draw.name(), "change_phase");
//! ```

use serde::{Deserialize, Serialize};

use super::entity::InstanceId;
use super::mana::{ManaColor, ManaPool};
use super::player::PlayerId;
use crate::rules::Phase;
use crate::zones::Zone;

/// A discrete game action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StartTurn {
        player: PlayerId,
    },
    ChangePhase {
        phase: Phase,
    },
    DrawCards {
        player: PlayerId,
        count: u32,
    },
    /// `player` defaults to the card's owner.
    MoveCard {
        instance: InstanceId,
        from: Zone,
        to: Zone,
        player: Option<PlayerId>,
    },
    AddMana {
        player: PlayerId,
        color: ManaColor,
        amount: u32,
    },
    PayMana {
        player: PlayerId,
        cost: ManaPool,
    },
    SetTapped {
        instance: InstanceId,
        tapped: bool,
    },
    DeclareAttackers {
        attackers: Vec<InstanceId>,
    },
    DeclareBlockers {
        blockers: Vec<InstanceId>,
    },
    AddCounters {
        instance: InstanceId,
        kind: String,
        amount: u32,
    },
    RemoveCounters {
        instance: InstanceId,
        kind: String,
        amount: u32,
    },
    ShuffleLibrary {
        player: PlayerId,
    },
    /// `None` ends the game as a draw.
    EndGame {
        winner: Option<PlayerId>,
    },
}

impl Action {
    /// Short name of the action, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartTurn { .. } => "start_turn",
            Action::ChangePhase { .. } => "change_phase",
            Action::DrawCards { .. } => "draw_cards",
            Action::MoveCard { .. } => "move_card",
            Action::AddMana { .. } => "add_mana",
            Action::PayMana { .. } => "pay_mana",
            Action::SetTapped { .. } => "set_tapped",
            Action::DeclareAttackers { .. } => "declare_attackers",
            Action::DeclareBlockers { .. } => "declare_blockers",
            Action::AddCounters { .. } => "add_counters",
            Action::RemoveCounters { .. } => "remove_counters",
            Action::ShuffleLibrary { .. } => "shuffle_library",
            Action::EndGame { .. } => "end_game",
        }
    }
}

/// A recorded action in the game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Turn number when the action was applied.
    pub turn: u32,

    /// Position in the game history, starting at 0. Keeps counting when
    /// old records are trimmed.
    pub sequence: u64,

    pub action: Action,
}
