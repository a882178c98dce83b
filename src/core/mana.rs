//! Mana colors and mana pools.
//!
//! A `ManaPool` holds a non-negative count for each of the five colors plus
//! colorless. The same type doubles as a cost map for `pay`, where the
//! colorless entry also covers generic costs such as `{3}`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One of the five colors of mana, or colorless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaColor {
    /// All mana colors in canonical (WUBRG, then colorless) order.
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    /// The single-letter symbol used in mana costs.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            ManaColor::White => 'W',
            ManaColor::Blue => 'U',
            ManaColor::Black => 'B',
            ManaColor::Red => 'R',
            ManaColor::Green => 'G',
            ManaColor::Colorless => 'C',
        }
    }

    /// Look up a color by its cost symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == symbol.to_ascii_uppercase())
    }
}

impl std::fmt::Display for ManaColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ManaColor::White => "White",
            ManaColor::Blue => "Blue",
            ManaColor::Black => "Black",
            ManaColor::Red => "Red",
            ManaColor::Green => "Green",
            ManaColor::Colorless => "Colorless",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ManaColor {
    type Err = EngineError;

    /// Accepts full names in any case (`"Green"`, `"green"`) or symbols (`"G"`).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(color) = Self::from_symbol(c) {
                return Ok(color);
            }
        }
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::UnknownManaColor(s.to_string()))
    }
}

/// Mana counts per color.
///
/// ```
/// use ccg_table::core::{ManaColor, ManaPool};
///
/// let mut pool = ManaPool::new();
/// pool.add(ManaColor::Green, 2);
/// pool.add(ManaColor::Colorless, 1);
///
/// let cost = ManaPool::parse_cost("{1}{G}").unwrap();
/// pool.pay(&cost).unwrap();
///
/// assert_eq!(pool.get(ManaColor::Green), 1);
/// assert_eq!(pool.get(ManaColor::Colorless), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u32,
    pub blue: u32,
    pub black: u32,
    pub red: u32,
    pub green: u32,
    pub colorless: u32,
}

impl ManaPool {
    /// Create an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            white: 0,
            blue: 0,
            black: 0,
            red: 0,
            green: 0,
            colorless: 0,
        }
    }

    /// Build a pool (or cost map) from `(color, amount)` pairs.
    ///
    /// Repeated colors accumulate.
    pub fn from_amounts(amounts: impl IntoIterator<Item = (ManaColor, u32)>) -> Self {
        let mut pool = Self::new();
        for (color, amount) in amounts {
            pool.add(color, amount);
        }
        pool
    }

    /// Parse a brace-notation mana cost such as `{2}{W}{W}`.
    ///
    /// Numeric symbols count as colorless. An empty string is a zero cost.
    pub fn parse_cost(cost: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidManaCost(cost.to_string());
        let mut pool = Self::new();
        let mut rest = cost.trim();

        while !rest.is_empty() {
            let inner_start = rest.strip_prefix('{').ok_or_else(invalid)?;
            let close = inner_start.find('}').ok_or_else(invalid)?;
            let symbol = &inner_start[..close];
            rest = &inner_start[close + 1..];

            if let Ok(generic) = symbol.parse::<u32>() {
                pool.add(ManaColor::Colorless, generic);
                continue;
            }
            let mut chars = symbol.chars();
            match (chars.next().and_then(ManaColor::from_symbol), chars.next()) {
                (Some(color), None) => pool.add(color, 1),
                _ => return Err(invalid()),
            }
        }

        Ok(pool)
    }

    /// Amount of one color.
    #[must_use]
    pub const fn get(&self, color: ManaColor) -> u32 {
        match color {
            ManaColor::White => self.white,
            ManaColor::Blue => self.blue,
            ManaColor::Black => self.black,
            ManaColor::Red => self.red,
            ManaColor::Green => self.green,
            ManaColor::Colorless => self.colorless,
        }
    }

    fn slot_mut(&mut self, color: ManaColor) -> &mut u32 {
        match color {
            ManaColor::White => &mut self.white,
            ManaColor::Blue => &mut self.blue,
            ManaColor::Black => &mut self.black,
            ManaColor::Red => &mut self.red,
            ManaColor::Green => &mut self.green,
            ManaColor::Colorless => &mut self.colorless,
        }
    }

    /// Add mana of one color. Saturates at `u32::MAX`.
    pub fn add(&mut self, color: ManaColor, amount: u32) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(amount);
    }

    /// Check every color of `cost` against the pool without debiting.
    pub fn check(&self, cost: &ManaPool) -> Result<()> {
        for (color, need) in cost.iter() {
            let have = self.get(color);
            if have < need {
                return Err(EngineError::InsufficientMana { color, have, need });
            }
        }
        Ok(())
    }

    /// Pay a cost: either every color is sufficient and all are debited,
    /// or nothing changes.
    pub fn pay(&mut self, cost: &ManaPool) -> Result<()> {
        self.check(cost)?;
        for (color, need) in cost.iter() {
            *self.slot_mut(color) -= need;
        }
        Ok(())
    }

    /// Empty the pool.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Total mana across all colors.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, amount)| amount).sum()
    }

    /// Check if every count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over `(color, amount)` in canonical order, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (ManaColor, u32)> + '_ {
        ManaColor::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}
