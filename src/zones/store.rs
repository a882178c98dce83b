//! Zone store: card instances and the zones they sit in.
//!
//! The `ZoneStore` is the only owner of zone membership. Instances live in
//! an arena keyed by `InstanceId`; each zone is an ordered list of IDs.
//! An instance's `location` and the list it appears in always agree.
//!
//! Order conventions:
//! - Library: index 0 is the top of the library (the next card drawn).
//! - Every other zone: index 0 is the oldest card; moves append at the end.
//!
//! Both containers are `im` persistent collections, so cloning a store for a
//! snapshot is O(1).

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::zone::{Location, Zone};
use crate::cards::CardInstance;
use crate::core::entity::{InstanceId, InstanceIdGen};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::error::{EngineError, Result};

/// A player's own zones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerZones {
    pub library: Vector<InstanceId>,
    pub hand: Vector<InstanceId>,
    pub graveyard: Vector<InstanceId>,
}

impl PlayerZones {
    fn get(&self, zone: Zone) -> Option<&Vector<InstanceId>> {
        match zone {
            Zone::Library => Some(&self.library),
            Zone::Hand => Some(&self.hand),
            Zone::Graveyard => Some(&self.graveyard),
            _ => None,
        }
    }

    fn get_mut(&mut self, zone: Zone) -> Option<&mut Vector<InstanceId>> {
        match zone {
            Zone::Library => Some(&mut self.library),
            Zone::Hand => Some(&mut self.hand),
            Zone::Graveyard => Some(&mut self.graveyard),
            _ => None,
        }
    }
}

/// Result of looking up a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Found<'a> {
    pub card: &'a CardInstance,
    pub zone: Zone,
    /// The zone's player for library/hand/graveyard, the controller on the
    /// battlefield, and the owner anywhere else.
    pub player: PlayerId,
}

/// Owner of all card instances and zone membership in one game.
///
/// ## Usage
///
/// ```
/// use ccg_table::cards::{build_library, CardDefinition, CardId};
/// use ccg_table::core::{GameRng, PlayerId};
/// use ccg_table::zones::{Zone, ZoneStore};
///
/// let alice = PlayerId::new(1);
/// let bob = PlayerId::new(2);
/// let mut store = ZoneStore::new([alice, bob]);
///
/// let forest = CardDefinition::new(CardId::new(1), "Forest", "Basic Land - Forest");
/// let mut rng = GameRng::new(1);
/// let library = build_library(&[(forest, 5)], alice, store.id_gen_mut(), &mut rng);
/// store.load_library(alice, library).unwrap();
///
/// let drawn = store.draw(alice).unwrap().unwrap();
/// store.move_card(drawn, Zone::Hand, Zone::Battlefield, Some(alice)).unwrap();
///
/// let found = store.find(drawn).unwrap();
/// assert_eq!(found.zone, Zone::Battlefield);
/// assert_eq!(found.player, alice);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStore {
    cards: OrdMap<InstanceId, CardInstance>,
    battlefield: Vector<InstanceId>,
    stack: Vector<InstanceId>,
    exile: Vector<InstanceId>,
    command: Vector<InstanceId>,
    players: PlayerMap<PlayerZones>,
    ids: InstanceIdGen,
}

impl ZoneStore {
    /// Create an empty store for the given players.
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            cards: OrdMap::new(),
            battlefield: Vector::new(),
            stack: Vector::new(),
            exile: Vector::new(),
            command: Vector::new(),
            players: PlayerMap::from_players(players, |_| PlayerZones::default()),
            ids: InstanceIdGen::new(),
        }
    }

    /// Check if a player has zones in this store.
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(player)
    }

    /// The instance ID allocator used for this game.
    pub fn id_gen_mut(&mut self) -> &mut InstanceIdGen {
        &mut self.ids
    }

    /// Put freshly built instances into a player's library, in order.
    ///
    /// Fails without changes if the player is unknown or an instance ID is
    /// already in use.
    pub fn load_library(&mut self, player: PlayerId, cards: Vec<CardInstance>) -> Result<()> {
        if !self.has_player(player) {
            return Err(EngineError::UnknownPlayer(player));
        }
        if let Some(dup) = cards.iter().find(|c| self.cards.contains_key(&c.id)) {
            return Err(EngineError::CorruptState(format!(
                "instance {} already exists",
                dup.id
            )));
        }

        let location = Location::of(player, Zone::Library);
        for mut card in cards {
            card.relocate(location);
            self.players[player].library.push_back(card.id);
            self.cards.insert(card.id, card);
        }
        Ok(())
    }

    /// Look up an instance and where it is.
    pub fn find(&self, id: InstanceId) -> Result<Found<'_>> {
        let card = self.cards.get(&id).ok_or(EngineError::NotFound(id))?;
        let location = card.location();
        let player = match (location.zone, location.player) {
            (_, Some(player)) => player,
            (Zone::Battlefield, None) => card.controller(),
            (_, None) => card.owner,
        };
        Ok(Found {
            card,
            zone: location.zone,
            player,
        })
    }

    /// Get an instance by ID.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Mutable access for flag and counter changes. Location and controller
    /// can only be changed through `move_card`.
    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// Move an instance between zones.
    ///
    /// `target` is the player whose zone receives the card (for per-player
    /// zones) and who controls it on the battlefield; it defaults to the
    /// owner. The card is appended to the destination.
    ///
    /// Leaving the battlefield clears attacking and blocking; tapped is kept.
    pub fn move_card(
        &mut self,
        id: InstanceId,
        from: Zone,
        to: Zone,
        target: Option<PlayerId>,
    ) -> Result<Location> {
        let card = self.cards.get(&id).ok_or(EngineError::NotFound(id))?;
        let source = card.location();
        if source.zone != from {
            return Err(EngineError::ZoneMismatch {
                instance: id,
                expected: from,
                actual: source,
            });
        }
        let target = target.unwrap_or(card.owner);
        if !self.has_player(target) {
            return Err(EngineError::UnknownPlayer(target));
        }
        let index = self
            .list(source)
            .and_then(|list| list.iter().position(|&x| x == id))
            .ok_or_else(|| {
                EngineError::CorruptState(format!("{} missing from {}", id, source))
            })?;

        let destination = Location::for_zone(to, target);
        if let Some(list) = self.list_mut(source) {
            list.remove(index);
        }
        if let Some(list) = self.list_mut(destination) {
            list.push_back(id);
        }
        if let Some(card) = self.cards.get_mut(&id) {
            card.relocate(destination);
            if to == Zone::Battlefield {
                card.set_controller(target);
            } else if from == Zone::Battlefield {
                card.leave_combat();
            }
        }
        Ok(destination)
    }

    /// Move the top card of a player's library to the end of their hand.
    ///
    /// Returns `None` if the library is empty.
    pub fn draw(&mut self, player: PlayerId) -> Result<Option<InstanceId>> {
        let zones = self
            .players
            .get_mut(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let Some(id) = zones.library.pop_front() else {
            return Ok(None);
        };
        zones.hand.push_back(id);
        if let Some(card) = self.cards.get_mut(&id) {
            card.relocate(Location::of(player, Zone::Hand));
        }
        Ok(Some(id))
    }

    /// Shuffle a player's library.
    pub fn shuffle_library(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<()> {
        let zones = self
            .players
            .get_mut(player)
            .ok_or(EngineError::UnknownPlayer(player))?;
        let mut order: Vec<_> = zones.library.iter().copied().collect();
        rng.shuffle(&mut order);
        zones.library = order.into_iter().collect();
        Ok(())
    }

    /// Apply `f` to every card on the battlefield, in battlefield order.
    pub(crate) fn for_each_on_battlefield(&mut self, mut f: impl FnMut(&mut CardInstance)) {
        for id in self.battlefield.clone() {
            if let Some(card) = self.cards.get_mut(&id) {
                f(card);
            }
        }
    }

    fn list(&self, location: Location) -> Option<&Vector<InstanceId>> {
        match (location.zone, location.player) {
            (Zone::Battlefield, _) => Some(&self.battlefield),
            (Zone::Stack, _) => Some(&self.stack),
            (Zone::Exile, _) => Some(&self.exile),
            (Zone::Command, _) => Some(&self.command),
            (zone, Some(player)) => self.players.get(player)?.get(zone),
            (_, None) => None,
        }
    }

    fn list_mut(&mut self, location: Location) -> Option<&mut Vector<InstanceId>> {
        match (location.zone, location.player) {
            (Zone::Battlefield, _) => Some(&mut self.battlefield),
            (Zone::Stack, _) => Some(&mut self.stack),
            (Zone::Exile, _) => Some(&mut self.exile),
            (Zone::Command, _) => Some(&mut self.command),
            (zone, Some(player)) => self.players.get_mut(player)?.get_mut(zone),
            (_, None) => None,
        }
    }

    /// IDs in a zone, in zone order. `None` for an unknown player.
    #[must_use]
    pub fn zone(&self, location: Location) -> Option<&Vector<InstanceId>> {
        self.list(location)
    }

    /// Number of cards in a zone (0 for an unknown player).
    #[must_use]
    pub fn zone_size(&self, location: Location) -> usize {
        self.list(location).map_or(0, Vector::len)
    }

    /// Cards in a zone, in zone order.
    pub fn cards_in(&self, location: Location) -> impl Iterator<Item = &CardInstance> + '_ {
        self.list(location)
            .into_iter()
            .flat_map(|list| list.iter())
            .filter_map(move |id| self.cards.get(id))
    }

    /// A player's library, top first.
    #[must_use]
    pub fn library(&self, player: PlayerId) -> Option<&Vector<InstanceId>> {
        self.players.get(player).map(|z| &z.library)
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&Vector<InstanceId>> {
        self.players.get(player).map(|z| &z.hand)
    }

    #[must_use]
    pub fn graveyard(&self, player: PlayerId) -> Option<&Vector<InstanceId>> {
        self.players.get(player).map(|z| &z.graveyard)
    }

    #[must_use]
    pub fn battlefield(&self) -> &Vector<InstanceId> {
        &self.battlefield
    }

    #[must_use]
    pub fn stack(&self) -> &Vector<InstanceId> {
        &self.stack
    }

    #[must_use]
    pub fn exile(&self) -> &Vector<InstanceId> {
        &self.exile
    }

    #[must_use]
    pub fn command(&self) -> &Vector<InstanceId> {
        &self.command
    }

    /// The card a draw would take next.
    #[must_use]
    pub fn top_of_library(&self, player: PlayerId) -> Option<InstanceId> {
        self.library(player)?.front().copied()
    }

    /// Iterate over every instance in the game, by ID.
    pub fn cards(&self) -> impl Iterator<Item = &CardInstance> + '_ {
        self.cards.values()
    }

    /// Get total number of instances tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Every location a card can be in, in a fixed order: shared zones,
    /// then each player's library, hand and graveyard.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        [Zone::Battlefield, Zone::Stack, Zone::Exile, Zone::Command]
            .into_iter()
            .map(Location::shared)
            .chain(self.players.player_ids().flat_map(|p| {
                [Zone::Library, Zone::Hand, Zone::Graveyard]
                    .into_iter()
                    .map(move |z| Location::of(p, z))
            }))
    }

    /// Verify that zone lists and instance locations agree.
    ///
    /// Every listed ID must exist and point back at the list it is in, and
    /// every instance must be listed exactly once.
    pub fn check_invariants(&self) -> Result<()> {
        let mut listed = 0usize;
        for location in self.locations() {
            let Some(list) = self.list(location) else {
                continue;
            };
            for id in list.iter() {
                let card = self.cards.get(id).ok_or_else(|| {
                    EngineError::CorruptState(format!("{} in {} has no instance", id, location))
                })?;
                if card.location() != location {
                    return Err(EngineError::CorruptState(format!(
                        "{} is listed in {} but located in {}",
                        id,
                        location,
                        card.location()
                    )));
                }
                if card.id != *id {
                    return Err(EngineError::CorruptState(format!(
                        "instance stored under {} has ID {}",
                        id, card.id
                    )));
                }
            }
            listed += list.len();
        }
        if listed != self.cards.len() {
            return Err(EngineError::CorruptState(format!(
                "{} instances but {} zone entries",
                self.cards.len(),
                listed
            )));
        }
        if let Some((max, _)) = self.cards.get_max() {
            if *max >= self.ids.peek() {
                return Err(EngineError::CorruptState(format!(
                    "instance {} is not below the next free ID {}",
                    max,
                    self.ids.peek()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{build_library, CardDefinition, CardId};

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);

    fn store_with_libraries(size: u32) -> ZoneStore {
        let mut store = ZoneStore::new([ALICE, BOB]);
        let bears = CardDefinition::new(CardId::new(1), "Grizzly Bears", "Creature - Bear");
        let mut rng = GameRng::new(42);
        for player in [ALICE, BOB] {
            let library =
                build_library(&[(bears.clone(), size)], player, store.id_gen_mut(), &mut rng);
            store.load_library(player, library).unwrap();
        }
        store
    }

    #[test]
    fn test_load_library() {
        let store = store_with_libraries(10);

        assert_eq!(store.total_cards(), 20);
        assert_eq!(store.library(ALICE).unwrap().len(), 10);
        assert_eq!(store.library(BOB).unwrap().len(), 10);
        assert!(store.hand(ALICE).unwrap().is_empty());
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_load_library_unknown_player() {
        let mut store = ZoneStore::new([ALICE, BOB]);
        let err = store.load_library(PlayerId(3), Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPlayer(PlayerId(3))));
    }

    #[test]
    fn test_draw_takes_top() {
        let mut store = store_with_libraries(5);
        let top = store.top_of_library(ALICE).unwrap();

        let drawn = store.draw(ALICE).unwrap();

        assert_eq!(drawn, Some(top));
        assert_eq!(store.library(ALICE).unwrap().len(), 4);
        assert_eq!(store.hand(ALICE).unwrap().back(), Some(&top));
        assert_eq!(store.get(top).unwrap().location(), Location::of(ALICE, Zone::Hand));
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_draw_empty_library() {
        let mut store = ZoneStore::new([ALICE, BOB]);
        assert_eq!(store.draw(ALICE).unwrap(), None);
        assert!(store.hand(ALICE).unwrap().is_empty());
    }

    #[test]
    fn test_move_to_battlefield_sets_controller() {
        let mut store = store_with_libraries(3);
        let card = store.draw(ALICE).unwrap().unwrap();

        let location = store
            .move_card(card, Zone::Hand, Zone::Battlefield, Some(BOB))
            .unwrap();

        assert_eq!(location, Location::shared(Zone::Battlefield));
        let found = store.find(card).unwrap();
        assert_eq!(found.zone, Zone::Battlefield);
        assert_eq!(found.player, BOB);
        assert_eq!(found.card.controller(), BOB);
        assert_eq!(found.card.owner, ALICE);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_move_defaults_to_owner() {
        let mut store = store_with_libraries(3);
        let card = store.draw(ALICE).unwrap().unwrap();

        store.move_card(card, Zone::Hand, Zone::Graveyard, None).unwrap();

        assert_eq!(store.graveyard(ALICE).unwrap().len(), 1);
        assert_eq!(store.find(card).unwrap().player, ALICE);
    }

    #[test]
    fn test_move_appends_to_destination() {
        let mut store = store_with_libraries(3);
        let first = store.draw(ALICE).unwrap().unwrap();
        let second = store.draw(ALICE).unwrap().unwrap();

        store.move_card(second, Zone::Hand, Zone::Exile, None).unwrap();
        store.move_card(first, Zone::Hand, Zone::Exile, None).unwrap();

        let exile: Vec<_> = store.exile().iter().copied().collect();
        assert_eq!(exile, vec![second, first]);
    }

    #[test]
    fn test_zone_mismatch_does_not_mutate() {
        let mut store = store_with_libraries(3);
        let card = store.top_of_library(ALICE).unwrap();
        let before = store.clone();

        let err = store
            .move_card(card, Zone::Hand, Zone::Battlefield, Some(ALICE))
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::ZoneMismatch {
                expected: Zone::Hand,
                ..
            }
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_unknown_player() {
        let mut store = store_with_libraries(3);
        let card = store.draw(ALICE).unwrap().unwrap();
        let before = store.clone();

        let err = store
            .move_card(card, Zone::Hand, Zone::Battlefield, Some(PlayerId(9)))
            .unwrap_err();

        assert!(matches!(err, EngineError::UnknownPlayer(PlayerId(9))));
        assert_eq!(store, before);
    }

    #[test]
    fn test_find_missing() {
        let store = store_with_libraries(1);
        assert!(matches!(
            store.find(InstanceId(999)),
            Err(EngineError::NotFound(InstanceId(999)))
        ));
    }

    #[test]
    fn test_leaving_battlefield_clears_combat() {
        let mut store = store_with_libraries(3);
        let card = store.draw(ALICE).unwrap().unwrap();
        store
            .move_card(card, Zone::Hand, Zone::Battlefield, Some(ALICE))
            .unwrap();
        {
            let instance = store.get_mut(card).unwrap();
            instance.set_tapped(true);
            instance.set_attacking(true);
        }

        store
            .move_card(card, Zone::Battlefield, Zone::Graveyard, None)
            .unwrap();

        let instance = store.get(card).unwrap();
        assert!(!instance.is_attacking());
        assert!(!instance.is_blocking());
        assert!(instance.is_tapped());
    }

    #[test]
    fn test_shuffle_library_keeps_cards() {
        let mut store = store_with_libraries(20);
        let before: Vec<_> = store.library(ALICE).unwrap().iter().copied().collect();

        store.shuffle_library(ALICE, &mut GameRng::new(7)).unwrap();

        let mut after: Vec<_> = store.library(ALICE).unwrap().iter().copied().collect();
        assert_ne!(after, before);
        after.sort();
        let mut sorted = before;
        sorted.sort();
        assert_eq!(after, sorted);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_cards_in_zone_order() {
        let mut store = store_with_libraries(4);
        let a = store.draw(BOB).unwrap().unwrap();
        let b = store.draw(BOB).unwrap().unwrap();

        let ids: Vec<_> = store
            .cards_in(Location::of(BOB, Zone::Hand))
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(store.zone_size(Location::of(BOB, Zone::Hand)), 2);
        assert_eq!(store.zone_size(Location::of(PlayerId(9), Zone::Hand)), 0);
    }

    #[test]
    fn test_check_invariants_detects_corruption() {
        let mut store = store_with_libraries(2);
        let card = store.top_of_library(ALICE).unwrap();
        store
            .get_mut(card)
            .unwrap()
            .relocate(Location::shared(Zone::Exile));

        assert!(matches!(
            store.check_invariants(),
            Err(EngineError::CorruptState(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let mut store = store_with_libraries(3);
        store.draw(ALICE).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let restored: ZoneStore = serde_json::from_str(&json).unwrap();

        assert_eq!(store, restored);
        restored.check_invariants().unwrap();
    }
}
