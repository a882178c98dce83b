//! Identifiers for games and card instances.
//!
//! ## Instance IDs
//!
//! Every physical card copy in a running game gets its own `InstanceId`,
//! distinct from the `CardId` of its catalog definition. Two copies of the
//! same definition always receive different instance IDs.
//!
//! IDs are handed out by an `InstanceIdGen` that lives inside the game
//! state, so a restored game keeps allocating where it left off.
//!
//! ```
//! use ccg_table::core::{InstanceId, InstanceIdGen};
//!
//! let mut ids = InstanceIdGen::new();
//! let a = ids.next_id();
//! let b = ids.next_id();
//!
//! assert_ne!(a, b);
//! assert_eq!(a, InstanceId(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for instance IDs.
///
/// IDs start at 1 and are never reused within a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceIdGen {
    next: u32,
}

impl InstanceIdGen {
    /// Create an allocator starting at ID 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next instance ID.
    pub fn next_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the ID the next call to `next_id` will return.
    #[must_use]
    pub const fn peek(&self) -> InstanceId {
        InstanceId(self.next)
    }
}

impl Default for InstanceIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a game (one match between two players).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}
