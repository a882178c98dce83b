//! Zone system for card locations.
//!
//! Zones are a fixed set: library, hand and graveyard per player, plus the
//! shared battlefield, stack, exile and command zones.
//!
//! ## Key Types
//!
//! - `Zone`: Zone kind
//! - `Location`: Zone plus the player whose zone it is
//! - `ZoneStore`: Instance arena, zone membership and movement

pub mod store;
pub mod zone;

pub use store::{Found, PlayerZones, ZoneStore};
pub use zone::{Location, Zone};

pub use crate::core::config::ZoneVisibility;
