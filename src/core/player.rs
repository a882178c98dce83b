//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Players are identified by the ID of their profile in the player store,
//! not by seat index. A session only accepts IDs of the players seated in it.
//!
//! ## PlayerMap
//!
//! Per-player data storage keyed by `PlayerId`, preserving seating order.
//! With two seats a linear scan beats hashing.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::mana::ManaPool;

/// Player identifier (the profile ID in the player store).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A registered player, as known to the player store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerProfile {
    /// Create a new profile.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// In-game state of one seated player.
///
/// The player's library, hand and graveyard are owned by the zone store;
/// use `GameState::library`, `hand` and `graveyard` to read them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub life: i32,
    pub mana_pool: ManaPool,
}

impl PlayerState {
    /// Create a player state with the given life total and an empty pool.
    #[must_use]
    pub fn new(profile: &PlayerProfile, life: i32) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            life,
            mana_pool: ManaPool::new(),
        }
    }
}

/// Per-player data storage in seating order.
///
/// ## Example
///
/// ```
/// use ccg_table::core::{PlayerId, PlayerMap};
///
/// let alice = PlayerId::new(7);
/// let bob = PlayerId::new(9);
///
/// let mut life: PlayerMap<i32> = PlayerMap::from_players([alice, bob], |_| 20);
/// life[bob] -= 3;
///
/// assert_eq!(life.get(alice), Some(&20));
/// assert_eq!(life.get(bob), Some(&17));
/// assert_eq!(life.opponent_of(alice), Some(bob));
/// assert!(life.get(PlayerId::new(1)).is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<(PlayerId, T)>,
}

impl<T> PlayerMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a map with one entry per player, built by a factory function.
    pub fn from_players(
        players: impl IntoIterator<Item = PlayerId>,
        factory: impl Fn(PlayerId) -> T,
    ) -> Self {
        let mut map = Self::new();
        for player in players {
            map.insert(player, factory(player));
        }
        map
    }

    /// Insert or replace a player's entry. New players are appended.
    pub fn insert(&mut self, player: PlayerId, value: T) {
        match self.data.iter_mut().find(|(p, _)| *p == player) {
            Some((_, slot)) => *slot = value,
            None => self.data.push((player, value)),
        }
    }

    /// Get the number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the map has no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if a player has an entry.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.data.iter().any(|(p, _)| *p == player)
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.iter().find(|(p, _)| *p == player).map(|(_, v)| v)
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data
            .iter_mut()
            .find(|(p, _)| *p == player)
            .map(|(_, v)| v)
    }

    /// Iterate over (PlayerId, &T) pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().map(|(p, v)| (*p, v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seating order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().map(|(p, v)| (*p, v))
    }

    /// Iterate over all player IDs in seating order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.data.iter().map(|(p, _)| *p)
    }

    /// The first seated player other than `player`.
    ///
    /// Returns `None` if `player` is the only player or not seated at all.
    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if !self.contains(player) {
            return None;
        }
        self.player_ids().find(|&p| p != player)
    }
}

impl<T> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    /// Panics if the player is not seated.
    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
            .unwrap_or_else(|| panic!("{} is not seated", player))
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
            .unwrap_or_else(|| panic!("{} is not seated", player))
    }
}
