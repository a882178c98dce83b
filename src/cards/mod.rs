//! Card system: definitions, instances, decks, and the catalog registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static catalog data (name, type line, cost, colors)
//! - `CardInstance`: One physical copy in a game (zone, controller, flags)
//! - `CardRegistry`: In-memory catalog
//! - `Deck`: A player's deck list, resolved against the catalog
//!
//! `build_library` turns resolved deck contents into a shuffled library.

pub mod color;
pub mod deck;
pub mod definition;
pub mod instance;
pub mod library;
pub mod registry;

pub use color::{Color, Colors};
pub use deck::{Deck, DeckEntry, DeckId, STANDARD_MAX_COPIES, STANDARD_MIN_CARDS};
pub use definition::{CardDefinition, CardId, Rarity};
pub use instance::CardInstance;
pub use library::build_library;
pub use registry::CardRegistry;
