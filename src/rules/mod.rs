//! Turn and phase rules.
//!
//! - `Phase`: the twelve turn phases plus `setup` and `ended`
//! - `PhaseMachine`: validates turn starts and phase changes and runs
//!   phase entry actions (untap, draw, combat end, cleanup)
//! - `Notice`: advisory outcomes that are not errors

pub mod engine;
pub mod notice;
pub mod phase;

pub use engine::{draw_or_lose, GameResult, PhaseMachine};
pub use notice::Notice;
pub use phase::{Phase, TURN_ORDER};
