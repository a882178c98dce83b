//! Turn phases.
//!
//! A turn runs through twelve phases in a fixed cycle:
//!
//! ```text
//! untap → upkeep → draw → main1 → combat_begin → combat_attackers →
//! combat_blockers → combat_damage → combat_end → main2 → end → cleanup
//! ```
//!
//! `setup` precedes the first turn and `ended` is terminal.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Game phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Setup,
    Untap,
    Upkeep,
    Draw,
    Main1,
    CombatBegin,
    CombatAttackers,
    CombatBlockers,
    CombatDamage,
    CombatEnd,
    Main2,
    End,
    Cleanup,
    Ended,
}

/// The twelve turn phases in order.
pub const TURN_ORDER: [Phase; 12] = [
    Phase::Untap,
    Phase::Upkeep,
    Phase::Draw,
    Phase::Main1,
    Phase::CombatBegin,
    Phase::CombatAttackers,
    Phase::CombatBlockers,
    Phase::CombatDamage,
    Phase::CombatEnd,
    Phase::Main2,
    Phase::End,
    Phase::Cleanup,
];

impl Phase {
    /// All phases, including `setup` and `ended`.
    pub const ALL: [Phase; 14] = [
        Phase::Setup,
        Phase::Untap,
        Phase::Upkeep,
        Phase::Draw,
        Phase::Main1,
        Phase::CombatBegin,
        Phase::CombatAttackers,
        Phase::CombatBlockers,
        Phase::CombatDamage,
        Phase::CombatEnd,
        Phase::Main2,
        Phase::End,
        Phase::Cleanup,
        Phase::Ended,
    ];

    /// Returns true for the twelve phases of a turn.
    #[must_use]
    pub const fn is_turn_phase(self) -> bool {
        !matches!(self, Phase::Setup | Phase::Ended)
    }

    /// Returns true for the five combat phases.
    #[must_use]
    pub const fn is_combat(self) -> bool {
        matches!(
            self,
            Phase::CombatBegin
                | Phase::CombatAttackers
                | Phase::CombatBlockers
                | Phase::CombatDamage
                | Phase::CombatEnd
        )
    }

    /// The phase after this one in the cycle. `cleanup` wraps to `untap`.
    #[must_use]
    pub fn next(self) -> Option<Phase> {
        let index = TURN_ORDER.iter().position(|&p| p == self)?;
        Some(TURN_ORDER[(index + 1) % TURN_ORDER.len()])
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Untap => "untap",
            Phase::Upkeep => "upkeep",
            Phase::Draw => "draw",
            Phase::Main1 => "main1",
            Phase::CombatBegin => "combat_begin",
            Phase::CombatAttackers => "combat_attackers",
            Phase::CombatBlockers => "combat_blockers",
            Phase::CombatDamage => "combat_damage",
            Phase::CombatEnd => "combat_end",
            Phase::Main2 => "main2",
            Phase::End => "end",
            Phase::Cleanup => "cleanup",
            Phase::Ended => "ended",
        }
    }

    /// Parse a phase name and require it to be one of the turn phases.
    pub fn parse_turn_phase(name: &str) -> Result<Phase> {
        match name.parse::<Phase>() {
            Ok(phase) if phase.is_turn_phase() => Ok(phase),
            _ => Err(EngineError::InvalidPhase(name.to_string())),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::InvalidPhase(s.to_string()))
    }
}
