//! Core engine types: identifiers, players, mana, state, actions, RNG,
//! configuration.
//!
//! This module contains the building blocks every other module works with.
//! `GameState` is the one authoritative snapshot of a game.

pub mod entity;
pub mod player;
pub mod mana;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use entity::{GameId, InstanceId, InstanceIdGen};
pub use player::{PlayerId, PlayerMap, PlayerProfile, PlayerState};
pub use mana::{ManaColor, ManaPool};
pub use rng::{GameRng, GameRngState};
pub use config::{SessionConfig, ZoneVisibility, DEFAULT_MAX_HAND_SIZE, DEFAULT_STARTING_LIFE};
pub use action::{Action, ActionRecord};
pub use state::{GameState, PublicPlayer, PublicView};
