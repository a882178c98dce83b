//! Game sessions.
//!
//! - `game`: one match, its actions, persistence and views
//! - `table`: many matches backed by a store, with match history

pub mod game;
pub mod table;

pub use game::{GameSession, Outcome, Response, Seat};
pub use table::Table;
