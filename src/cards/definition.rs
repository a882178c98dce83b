//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a card as printed.
//! Instance-specific data (tapped, counters, zone) is stored separately in
//! `CardInstance`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::color::{Color, Colors};
use crate::core::mana::ManaPool;
use crate::error::Result;

/// Unique identifier for a card definition in the catalog.
///
/// This identifies the printed card (e.g., "Grizzly Bears"), not a copy of
/// it in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Printed rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_table::cards::{CardDefinition, CardId, Color};
///
/// let bears = CardDefinition::new(CardId::new(1), "Grizzly Bears", "Creature - Bear")
///     .with_mana_cost("{1}{G}")
///     .with_colors([Color::Green])
///     .with_stats(2, 2);
///
/// assert!(bears.is_creature());
/// assert_eq!(bears.power, Some(2));
/// assert_eq!(bears.cost().unwrap().total(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name.
    pub name: String,

    /// Full type line, e.g. `"Basic Land - Forest"` or `"Creature - Elf"`.
    pub type_line: String,

    /// Mana cost in brace notation, e.g. `"{2}{U}"`. Empty for lands.
    pub mana_cost: String,

    /// Color set. Empty for colorless cards.
    pub colors: Colors,

    /// Rules text as printed.
    pub rules_text: String,

    /// Power, for creatures.
    pub power: Option<i32>,

    /// Toughness, for creatures.
    pub toughness: Option<i32>,

    pub rarity: Rarity,

    /// Set code, e.g. `"M21"`.
    pub set_code: String,

    /// Image file name, relative to the card image directory.
    pub image: Option<String>,
}

impl CardDefinition {
    /// Create a new card definition with empty optional properties.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, type_line: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_line: type_line.into(),
            mana_cost: String::new(),
            colors: Colors::new(),
            rules_text: String::new(),
            power: None,
            toughness: None,
            rarity: Rarity::default(),
            set_code: String::new(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: impl Into<String>) -> Self {
        self.mana_cost = cost.into();
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = text.into();
        self
    }

    /// Set power and toughness.
    #[must_use]
    pub fn with_stats(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_set_code(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = set_code.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check if the type line contains `Creature`.
    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.type_line.contains("Creature")
    }

    /// Check if the type line contains `Land`.
    #[must_use]
    pub fn is_land(&self) -> bool {
        self.type_line.contains("Land")
    }

    /// Basic lands are exempt from deck copy limits.
    #[must_use]
    pub fn is_basic_land(&self) -> bool {
        self.is_land() && self.type_line.contains("Basic")
    }

    /// Instants and sorceries.
    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.type_line.contains("Instant") || self.type_line.contains("Sorcery")
    }

    /// The mana cost as a payable cost map.
    pub fn cost(&self) -> Result<ManaPool> {
        ManaPool::parse_cost(&self.mana_cost)
    }

    /// Resolve the image file against the card image directory.
    #[must_use]
    pub fn image_path(&self, image_dir: &Path) -> Option<PathBuf> {
        self.image.as_ref().map(|file| image_dir.join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_card_definition_builder() {
        let card = CardDefinition::new(CardId::new(1), "Serra Angel", "Creature - Angel")
            .with_mana_cost("{3}{W}{W}")
            .with_colors([Color::White])
            .with_rules_text("Flying, vigilance")
            .with_stats(4, 4)
            .with_rarity(Rarity::Uncommon)
            .with_set_code("M21");

        assert_eq!(card.name, "Serra Angel");
        assert_eq!(card.colors.as_slice(), &[Color::White]);
        assert_eq!(card.toughness, Some(4));
        assert_eq!(card.rarity, Rarity::Uncommon);
        assert_eq!(card.cost().unwrap().white, 2);
        assert!(card.is_creature());
        assert!(!card.is_land());
    }

    #[test]
    fn test_type_helpers() {
        let forest = CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest");
        let bolt = CardDefinition::new(CardId::new(2), "Shock", "Instant");
        let vault = CardDefinition::new(CardId::new(3), "Treasure Vault", "Artifact Land");

        assert!(forest.is_land());
        assert!(forest.is_basic_land());
        assert!(!forest.is_spell());
        assert!(bolt.is_spell());
        assert!(vault.is_land());
        assert!(!vault.is_basic_land());
    }

    #[test]
    fn test_image_path() {
        let card = CardDefinition::new(CardId::new(1), "Island", "Basic Land - Island")
            .with_image("island.png");
        let path = card.image_path(Path::new("data/cards")).unwrap();
        assert_eq!(path, Path::new("data/cards").join("island.png"));

        let bare = CardDefinition::new(CardId::new(2), "Plains", "Basic Land - Plains");
        assert!(bare.image_path(Path::new("data/cards")).is_none());
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(1), "Test", "Sorcery")
            .with_mana_cost("{R}")
            .with_colors([Color::Red]);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
