//! Card colors.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::mana::ManaColor;

/// One of the five card colors. Colorless cards have an empty color set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

/// A card's color set. Most cards have at most two colors.
pub type Colors = SmallVec<[Color; 2]>;

impl Color {
    /// Parse a single color name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Some(Color::White),
            "blue" | "u" => Some(Color::Blue),
            "black" | "b" => Some(Color::Black),
            "red" | "r" => Some(Color::Red),
            "green" | "g" => Some(Color::Green),
            _ => None,
        }
    }

    /// Parse a comma-separated color list such as `"White, Blue"`.
    ///
    /// Unknown entries are skipped and duplicates collapse.
    #[must_use]
    pub fn parse_list(list: &str) -> Colors {
        let mut colors = Colors::new();
        for color in list.split(',').filter_map(Color::from_name) {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        colors
    }
}

impl From<Color> for ManaColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => ManaColor::White,
            Color::Blue => ManaColor::Blue,
            Color::Black => ManaColor::Black,
            Color::Red => ManaColor::Red,
            Color::Green => ManaColor::Green,
        }
    }
}
