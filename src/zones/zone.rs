//! Zone kinds and card locations.

use serde::{Deserialize, Serialize};

use crate::core::config::ZoneVisibility;
use crate::core::player::PlayerId;
use crate::error::{EngineError, Result};

/// A named location a card instance can occupy.
///
/// Library, hand and graveyard exist once per player. Battlefield, stack,
/// exile and command are shared by the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Library,
    Hand,
    Graveyard,
    Battlefield,
    Stack,
    Exile,
    Command,
}

impl Zone {
    /// All zones.
    pub const ALL: [Zone; 7] = [
        Zone::Library,
        Zone::Hand,
        Zone::Graveyard,
        Zone::Battlefield,
        Zone::Stack,
        Zone::Exile,
        Zone::Command,
    ];

    /// Returns true for zones that exist once per player.
    #[must_use]
    pub const fn is_per_player(self) -> bool {
        matches!(self, Zone::Library | Zone::Hand | Zone::Graveyard)
    }

    /// Returns true if card order in this zone is significant.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Zone::Library | Zone::Stack | Zone::Graveyard)
    }

    /// Who may see the cards in this zone.
    #[must_use]
    pub const fn visibility(self) -> ZoneVisibility {
        match self {
            Zone::Library => ZoneVisibility::Hidden,
            Zone::Hand => ZoneVisibility::OwnerOnly,
            _ => ZoneVisibility::Public,
        }
    }

    /// Lowercase name, as used in the serialized state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Graveyard => "graveyard",
            Zone::Battlefield => "battlefield",
            Zone::Stack => "stack",
            Zone::Exile => "exile",
            Zone::Command => "command",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|z| z.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownZone(s.to_string()))
    }
}

/// Where a card instance currently is.
///
/// `player` names whose library/hand/graveyard the card is in; it is `None`
/// for the shared zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub zone: Zone,
    pub player: Option<PlayerId>,
}

impl Location {
    /// A location in a shared zone.
    #[must_use]
    pub const fn shared(zone: Zone) -> Self {
        Self { zone, player: None }
    }

    /// A location in a player's own zone.
    #[must_use]
    pub const fn of(player: PlayerId, zone: Zone) -> Self {
        Self {
            zone,
            player: Some(player),
        }
    }

    /// Build the location a card lands in when moved to `zone`.
    ///
    /// Per-player zones take `player`; shared zones ignore it.
    #[must_use]
    pub const fn for_zone(zone: Zone, player: PlayerId) -> Self {
        if zone.is_per_player() {
            Self::of(player, zone)
        } else {
            Self::shared(zone)
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.player {
            Some(player) => write!(f, "{} of {}", self.zone, player),
            None => write!(f, "{}", self.zone),
        }
    }
}
