//! Advisory results of a successful action.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// Something the caller must know about after an action succeeded.
///
/// Notices are not errors: the action was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// At cleanup the active player holds more cards than allowed. The
    /// engine does not pick discards; the caller resolves it.
    HandSizeExceeded {
        player: PlayerId,
        hand_size: usize,
        max_hand_size: usize,
    },

    /// A draw was attempted from an empty library. The game is over and
    /// `winner` has won.
    EmptyLibraryLoss { loser: PlayerId, winner: PlayerId },
}

impl Notice {
    /// Returns true if this notice means the game just ended.
    #[must_use]
    pub fn ends_game(&self) -> bool {
        matches!(self, Notice::EmptyLibraryLoss { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::HandSizeExceeded {
                player,
                hand_size,
                max_hand_size,
            } => write!(
                f,
                "{player} has {hand_size} cards in hand and must discard down to {max_hand_size}"
            ),
            Notice::EmptyLibraryLoss { loser, winner } => {
                write!(f, "{loser} drew from an empty library; {winner} wins")
            }
        }
    }
}
