//! Building a starting library from deck contents.

use super::definition::CardDefinition;
use super::instance::CardInstance;
use crate::core::entity::InstanceIdGen;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::zones::{Location, Zone};

/// Create one fresh instance per card copy and shuffle them.
///
/// Every instance gets its own ID from `ids`, so copies of the same
/// definition are always distinguishable. The returned order is the library
/// order, front (index 0) first.
///
/// ```
/// use ccg_table::cards::{build_library, CardDefinition, CardId};
/// use ccg_table::core::{GameRng, InstanceIdGen, PlayerId};
///
/// let forest = CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest");
/// let mut ids = InstanceIdGen::new();
/// let mut rng = GameRng::new(7);
///
/// let library = build_library(&[(forest, 3)], PlayerId::new(1), &mut ids, &mut rng);
///
/// assert_eq!(library.len(), 3);
/// assert_ne!(library[0].id, library[1].id);
/// ```
pub fn build_library(
    contents: &[(CardDefinition, u32)],
    owner: PlayerId,
    ids: &mut InstanceIdGen,
    rng: &mut GameRng,
) -> Vec<CardInstance> {
    let location = Location::of(owner, Zone::Library);
    let total: u32 = contents.iter().map(|(_, quantity)| *quantity).sum();

    let mut library = Vec::with_capacity(total as usize);
    for (def, quantity) in contents {
        for _ in 0..*quantity {
            library.push(CardInstance::new(ids.next_id(), def.id, owner, location));
        }
    }

    rng.shuffle(&mut library);
    library
}
