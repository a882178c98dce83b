//! # ccg-table
//!
//! Turn, phase and zone engine for a two-player trading card game table.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not shared mutation**: Every action returns an immutable
//!    `GameState` snapshot. A failed action leaves the state exactly as it
//!    was.
//!
//! 2. **Typed everywhere**: Zones, phases, mana colors and actions are enums.
//!    Text only appears at the persistence boundary.
//!
//! 3. **Storage behind traits**: Catalog, decks, players, match history and
//!    saved games are reached through the traits in `store`.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so every
//!   action can work on a copy and commit only on success.
//!
//! - **Deterministic Shuffles**: Libraries are shuffled with a seeded
//!   ChaCha RNG whose position is part of the saved state.
//!
//! ## Modules
//!
//! - `core`: IDs, players, mana, state, actions, RNG, configuration
//! - `zones`: Zones and the card instance arena
//! - `cards`: Card definitions, instances, decks, library building
//! - `rules`: Phases and the phase machine
//! - `session`: Game sessions and the multi-game table
//! - `store`: Storage traits, in-memory store, statistics
//! - `error`: Error types

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod session;
pub mod store;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    GameId, InstanceId, PlayerId, PlayerMap, PlayerProfile, PlayerState,
    ManaColor, ManaPool,
    GameRng, GameRngState,
    SessionConfig, ZoneVisibility,
    Action, ActionRecord,
    GameState, PublicView,
};

pub use crate::zones::{Found, Location, Zone, ZoneStore};

pub use crate::cards::{
    build_library, CardDefinition, CardId, CardInstance, CardRegistry, Color, Deck, DeckId,
};

pub use crate::rules::{GameResult, Notice, Phase, PhaseMachine};

pub use crate::session::{GameSession, Outcome, Response, Seat, Table};

pub use crate::store::{
    CatalogStore, DeckStore, MatchRecord, MatchStore, MemoryStore, PersistenceStore,
    PlayerStats, PlayerStore, TableStore,
};

pub use crate::error::{EngineError, Result, StoreError};
