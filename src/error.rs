//! Engine and store errors.
//!
//! Every fallible engine call returns `Result<T, EngineError>`. A failing
//! call never leaves a partial mutation behind.
//!
//! Losing a game to an empty library and exceeding the maximum hand size are
//! not errors; they are reported as `rules::Notice` values alongside a
//! successful result.

use thiserror::Error;

use crate::cards::{CardId, DeckId};
use crate::core::entity::{GameId, InstanceId};
use crate::core::mana::ManaColor;
use crate::core::player::PlayerId;
use crate::rules::Phase;
use crate::zones::{Location, Zone};

/// Crate-wide result alias.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("card instance {0} is not in any zone")]
    NotFound(InstanceId),

    #[error("card instance {instance} is not in {expected} (it is in {actual})")]
    ZoneMismatch {
        instance: InstanceId,
        expected: Zone,
        actual: Location,
    },

    #[error("{0} is not seated in this game")]
    UnknownPlayer(PlayerId),

    #[error("'{0}' is not a turn phase")]
    InvalidPhase(String),

    #[error("cannot go from {from} to {to}")]
    PhaseOutOfOrder { from: Phase, to: Phase },

    #[error("deck {deck} does not belong to {player}")]
    OwnershipMismatch { deck: DeckId, player: PlayerId },

    #[error("insufficient {color} mana: have {have}, need {need}")]
    InsufficientMana {
        color: ManaColor,
        have: u32,
        need: u32,
    },

    #[error("unknown mana color '{0}'")]
    UnknownManaColor(String),

    #[error("invalid mana cost '{0}'")]
    InvalidManaCost(String),

    #[error("unknown zone '{0}'")]
    UnknownZone(String),

    #[error("{0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("deck {0} does not exist")]
    UnknownDeck(DeckId),

    #[error("{0} does not exist")]
    UnknownGame(GameId),

    #[error("{0} cannot play against themselves")]
    DuplicatePlayer(PlayerId),

    #[error("deck {deck} is not legal: {reason}")]
    IllegalDeck { deck: DeckId, reason: String },

    #[error("card instance {instance} cannot do that: {reason}")]
    IllegalCombat {
        instance: InstanceId,
        reason: &'static str,
    },

    #[error("no turn has been started")]
    NoActivePlayer,

    #[error("the game is over")]
    GameOver,

    #[error("corrupt game state: {0}")]
    CorruptState(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("checkpoint: {0}")]
    Checkpoint(#[from] bincode::Error),
}

/// Failures reported by an external store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no saved state for {0}")]
    NoSavedState(GameId),

    #[error("store backend failed: {0}")]
    Backend(String),
}
