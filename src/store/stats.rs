//! Match records and player statistics.
//!
//! Statistics are never incremented in place. `PlayerStats::project`
//! recomputes them from the full match history, so recording the same match
//! twice or recomputing after a crash cannot make them drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::GameId;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// How a match ended for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Won,
    Lost,
    Drawn,
}

/// A finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub game_id: GameId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    /// `None` for a draw.
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build the record of an ended game. `None` while the game is running.
    #[must_use]
    pub fn from_state(state: &GameState) -> Option<Self> {
        let ended_at = state.ended_at.filter(|_| state.is_over())?;
        let mut seats = state.players.player_ids();
        let player1 = seats.next()?;
        let player2 = seats.next()?;
        Some(Self {
            game_id: state.game_id,
            player1,
            player2,
            winner: state.winner,
            turns: state.turn_number,
            started_at: state.started_at,
            ended_at,
        })
    }

    /// Check if `player` took part.
    #[must_use]
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == player
    }

    /// The outcome for `player`, or `None` if they did not play.
    #[must_use]
    pub fn outcome_for(&self, player: PlayerId) -> Option<MatchOutcome> {
        if !self.involves(player) {
            return None;
        }
        Some(match self.winner {
            Some(w) if w == player => MatchOutcome::Won,
            Some(_) => MatchOutcome::Lost,
            None => MatchOutcome::Drawn,
        })
    }
}

/// Aggregate statistics of one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub games_drawn: u32,
}

impl PlayerStats {
    /// Statistics of a player with no games.
    #[must_use]
    pub const fn empty(player: PlayerId) -> Self {
        Self {
            player,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            games_drawn: 0,
        }
    }

    /// Recompute a player's statistics from match records.
    ///
    /// Records the player did not take part in are ignored.
    ///
    /// ```
    /// use ccg_table::store::PlayerStats;
    /// use ccg_table::core::PlayerId;
    ///
    /// let stats = PlayerStats::project(PlayerId::new(1), &[]);
    /// assert_eq!(stats.games_played, 0);
    /// assert_eq!(stats.win_rate(), 0.0);
    /// ```
    pub fn project<'a>(
        player: PlayerId,
        records: impl IntoIterator<Item = &'a MatchRecord>,
    ) -> Self {
        let mut stats = Self::empty(player);
        for outcome in records.into_iter().filter_map(|r| r.outcome_for(player)) {
            stats.games_played += 1;
            match outcome {
                MatchOutcome::Won => stats.games_won += 1,
                MatchOutcome::Lost => stats.games_lost += 1,
                MatchOutcome::Drawn => stats.games_drawn += 1,
            }
        }
        stats
    }

    /// Fraction of played games won, 0.0 with no games.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.games_won) / f64::from(self.games_played)
    }
}
