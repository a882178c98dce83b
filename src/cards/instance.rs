//! Card instances - runtime card state.
//!
//! `CardInstance` represents one physical copy of a card during a game.
//! It tracks mutable state like tapped/combat flags, counters and its
//! current location.
//!
//! ## Revision
//!
//! Every change to display-relevant state bumps `revision`. Setting a flag
//! to the value it already has is a no-op and leaves the revision alone, so
//! a presentation layer can redraw only what changed.
//!
//! Location and controller are only changed by the zone store.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::CardId;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::zones::{Location, Zone};

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this copy.
    pub id: InstanceId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Owner (whose deck this card came from).
    pub owner: PlayerId,

    controller: PlayerId,
    location: Location,
    tapped: bool,
    attacking: bool,
    blocking: bool,
    counters: FxHashMap<String, u32>,
    attachments: SmallVec<[InstanceId; 2]>,
    revision: u64,
}

impl CardInstance {
    /// Create an untapped instance with no counters, controlled by its owner.
    #[must_use]
    pub fn new(id: InstanceId, card_id: CardId, owner: PlayerId, location: Location) -> Self {
        Self {
            id,
            card_id,
            owner,
            controller: owner,
            location,
            tapped: false,
            attacking: false,
            blocking: false,
            counters: FxHashMap::default(),
            attachments: SmallVec::new(),
            revision: 0,
        }
    }

    /// The player currently controlling this card.
    #[must_use]
    pub fn controller(&self) -> PlayerId {
        self.controller
    }

    /// Where this card is.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// The zone this card is in.
    #[must_use]
    pub fn zone(&self) -> Zone {
        self.location.zone
    }

    #[must_use]
    pub fn is_tapped(&self) -> bool {
        self.tapped
    }

    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Number of display-relevant changes made to this instance.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Set the tapped flag. Returns true if the value changed.
    pub fn set_tapped(&mut self, tapped: bool) -> bool {
        if self.tapped == tapped {
            return false;
        }
        self.tapped = tapped;
        self.bump();
        true
    }

    /// Set the attacking flag. Returns true if the value changed.
    ///
    /// Does not tap the card; the session taps attackers.
    pub fn set_attacking(&mut self, attacking: bool) -> bool {
        if self.attacking == attacking {
            return false;
        }
        self.attacking = attacking;
        self.bump();
        true
    }

    /// Set the blocking flag. Returns true if the value changed.
    pub fn set_blocking(&mut self, blocking: bool) -> bool {
        if self.blocking == blocking {
            return false;
        }
        self.blocking = blocking;
        self.bump();
        true
    }

    /// Clear attacking and blocking. Tapped is kept.
    pub fn leave_combat(&mut self) -> bool {
        let attacking = self.set_attacking(false);
        let blocking = self.set_blocking(false);
        attacking || blocking
    }

    /// Count of one counter kind.
    #[must_use]
    pub fn counter(&self, kind: &str) -> u32 {
        self.counters.get(kind).copied().unwrap_or(0)
    }

    /// All counters with a non-zero count, sorted by kind.
    #[must_use]
    pub fn counters(&self) -> Vec<(&str, u32)> {
        let mut all: Vec<_> = self
            .counters
            .iter()
            .map(|(kind, count)| (kind.as_str(), *count))
            .collect();
        all.sort_unstable();
        all
    }

    /// Add counters of one kind. Returns the new count.
    pub fn add_counters(&mut self, kind: &str, amount: u32) -> u32 {
        if amount == 0 {
            return self.counter(kind);
        }
        let count = self.counters.entry(kind.to_string()).or_insert(0);
        *count = count.saturating_add(amount);
        let total = *count;
        self.bump();
        total
    }

    /// Remove up to `amount` counters of one kind. Returns how many were
    /// actually removed.
    pub fn remove_counters(&mut self, kind: &str, amount: u32) -> u32 {
        let Some(count) = self.counters.get_mut(kind) else {
            return 0;
        };
        let removed = amount.min(*count);
        if removed == 0 {
            return 0;
        }
        *count -= removed;
        if *count == 0 {
            self.counters.remove(kind);
        }
        self.bump();
        removed
    }

    /// Instances attached to this card (auras, equipment).
    #[must_use]
    pub fn attachments(&self) -> &[InstanceId] {
        &self.attachments
    }

    /// Attach another instance. Returns false if it was already attached.
    pub fn attach(&mut self, other: InstanceId) -> bool {
        if self.attachments.contains(&other) {
            return false;
        }
        self.attachments.push(other);
        self.bump();
        true
    }

    /// Detach an instance. Returns false if it was not attached.
    pub fn detach(&mut self, other: InstanceId) -> bool {
        let Some(pos) = self.attachments.iter().position(|&a| a == other) else {
            return false;
        };
        self.attachments.remove(pos);
        self.bump();
        true
    }

    pub(crate) fn relocate(&mut self, location: Location) {
        if self.location != location {
            self.location = location;
            self.bump();
        }
    }

    pub(crate) fn set_controller(&mut self, controller: PlayerId) {
        if self.controller != controller {
            self.controller = controller;
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> CardInstance {
        CardInstance::new(
            InstanceId(10),
            CardId::new(1),
            PlayerId::new(1),
            Location::of(PlayerId::new(1), Zone::Library),
        )
    }

    #[test]
    fn test_card_instance_new() {
        let card = instance();

        assert_eq!(card.id, InstanceId(10));
        assert_eq!(card.card_id, CardId::new(1));
        assert_eq!(card.owner, PlayerId::new(1));
        assert_eq!(card.controller(), PlayerId::new(1));
        assert_eq!(card.zone(), Zone::Library);
        assert!(!card.is_tapped());
        assert!(card.counters().is_empty());
        assert!(card.attachments().is_empty());
        assert_eq!(card.revision(), 0);
    }

    #[test]
    fn test_set_tapped_is_idempotent() {
        let mut card = instance();

        assert!(card.set_tapped(true));
        let after_first = card.clone();

        assert!(!card.set_tapped(true));
        assert_eq!(card, after_first);
        assert_eq!(card.revision(), 1);

        assert!(card.set_tapped(false));
        assert_eq!(card.revision(), 2);
    }

    #[test]
    fn test_attacking_does_not_tap() {
        let mut card = instance();

        assert!(card.set_attacking(true));
        assert!(card.is_attacking());
        assert!(!card.is_tapped());
    }

    #[test]
    fn test_leave_combat_keeps_tapped() {
        let mut card = instance();
        card.set_tapped(true);
        card.set_attacking(true);
        card.set_blocking(true);

        assert!(card.leave_combat());
        assert!(!card.is_attacking());
        assert!(!card.is_blocking());
        assert!(card.is_tapped());

        assert!(!card.leave_combat());
    }

    #[test]
    fn test_counters() {
        let mut card = instance();

        assert_eq!(card.add_counters("+1/+1", 2), 2);
        assert_eq!(card.add_counters("+1/+1", 1), 3);
        assert_eq!(card.add_counters("loyalty", 4), 4);
        assert_eq!(card.counters(), vec![("+1/+1", 3), ("loyalty", 4)]);

        assert_eq!(card.remove_counters("+1/+1", 5), 3);
        assert_eq!(card.counter("+1/+1"), 0);
        assert_eq!(card.remove_counters("charge", 1), 0);
        assert_eq!(card.counters(), vec![("loyalty", 4)]);
    }

    #[test]
    fn test_zero_counter_change_is_noop() {
        let mut card = instance();
        card.add_counters("charge", 0);
        assert_eq!(card.revision(), 0);
        assert!(card.counters().is_empty());
    }

    #[test]
    fn test_attachments() {
        let mut card = instance();

        assert!(card.attach(InstanceId(20)));
        assert!(!card.attach(InstanceId(20)));
        assert!(card.attach(InstanceId(21)));
        assert_eq!(card.attachments(), &[InstanceId(20), InstanceId(21)]);

        assert!(card.detach(InstanceId(20)));
        assert!(!card.detach(InstanceId(20)));
        assert_eq!(card.attachments(), &[InstanceId(21)]);
    }

    #[test]
    fn test_relocate_and_controller() {
        let mut card = instance();

        card.relocate(Location::shared(Zone::Battlefield));
        card.set_controller(PlayerId::new(2));

        assert_eq!(card.zone(), Zone::Battlefield);
        assert_eq!(card.controller(), PlayerId::new(2));
        assert_eq!(card.owner, PlayerId::new(1));
    }

    #[test]
    fn test_card_instance_serialization() {
        let mut card = instance();
        card.set_tapped(true);
        card.add_counters("charge", 2);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardInstance = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
