//! Session configuration.
//!
//! A `SessionConfig` is supplied when a game is created and travels with the
//! game state, so a restored game plays by the rules it was started with.
//!
//! ```
//! use ccg_table::core::SessionConfig;
//!
//! let config = SessionConfig::new()
//!     .with_starting_life(30)
//!     .with_max_hand_size(8)
//!     .strict_phase_order()
//!     .with_seed(7);
//!
//! assert_eq!(config.starting_life, 30);
//! assert!(config.strict_phase_order);
//! assert_eq!(config.seed, Some(7));
//! ```

use serde::{Deserialize, Serialize};

/// Default life total for each player.
pub const DEFAULT_STARTING_LIFE: i32 = 20;

/// Default maximum hand size checked during cleanup.
pub const DEFAULT_MAX_HAND_SIZE: usize = 7;

/// Zone visibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// All cards visible to all players (battlefield, graveyard).
    Public,
    /// Cards visible only to the player whose zone it is (hand).
    OwnerOnly,
    /// Cards not visible to anyone (face-down library).
    Hidden,
}

/// Configuration for one game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Life total each player starts with.
    pub starting_life: i32,

    /// Hand size above which cleanup reports `HandSizeExceeded`.
    pub max_hand_size: usize,

    /// Require `change_phase` to follow the turn order.
    ///
    /// Off by default: any of the twelve turn phases is accepted and the
    /// caller is trusted to advance in order.
    pub strict_phase_order: bool,

    /// RNG seed for library shuffles. `None` draws a seed from entropy.
    pub seed: Option<u64>,

    /// Most action records kept in the history. `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl SessionConfig {
    /// Create a configuration with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            starting_life: DEFAULT_STARTING_LIFE,
            max_hand_size: DEFAULT_MAX_HAND_SIZE,
            strict_phase_order: false,
            seed: None,
            history_limit: None,
        }
    }

    /// Set the starting life total.
    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    /// Set the maximum hand size.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Enforce sequential phase order.
    #[must_use]
    pub fn strict_phase_order(mut self) -> Self {
        self.strict_phase_order = true;
        self
    }

    /// Fix the shuffle seed (for replays and tests).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Keep only the most recent `limit` action records.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
