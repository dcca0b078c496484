//! The canonical set of characters in a combat.
//!
//! Everything else (events, actions, abilities, the turn queue) refers to
//! characters by `CharacterId`; the roster is the one place they live.
//! Defeated characters stay in the roster so ids remain valid, but they are
//! no longer standing and are skipped by targeting and turn order.

use crate::core::CharacterId;

use super::character::{Character, Faction};

/// All combatants of one encounter, laid out on `lane_count` lanes.
#[derive(Clone, Debug)]
pub struct Roster {
    characters: Vec<Character>,
    lane_count: usize,
}

impl Roster {
    /// Create an empty roster over `lane_count` lanes.
    pub fn new(lane_count: usize) -> Self {
        Self {
            characters: Vec::new(),
            lane_count,
        }
    }

    /// Add a character at `lane` and return its id.
    ///
    /// Lanes beyond the board are clamped to the last lane.
    pub fn add(&mut self, mut character: Character, lane: usize) -> CharacterId {
        let id = CharacterId::new(self.characters.len() as u32);
        character.set_id(id);
        character.position = self.clamp_lane(lane);
        self.characters.push(character);
        id
    }

    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Clamp a lane index onto the board.
    #[must_use]
    pub fn clamp_lane(&self, lane: usize) -> usize {
        lane.min(self.lane_count.saturating_sub(1))
    }

    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.index())
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id.index())
    }

    /// Like `get`, but only for characters still in the fight.
    #[must_use]
    pub fn standing(&self, id: CharacterId) -> Option<&Character> {
        self.get(id).filter(|c| !c.is_defeated())
    }

    pub fn standing_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.get_mut(id).filter(|c| !c.is_defeated())
    }

    #[must_use]
    pub fn is_standing(&self, id: CharacterId) -> bool {
        self.standing(id).is_some()
    }

    /// Every character, defeated included, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Characters still in the fight, in id order.
    pub fn fighters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| !c.is_defeated())
    }

    /// Ids of characters still in the fight.
    #[must_use]
    pub fn fighter_ids(&self) -> Vec<CharacterId> {
        self.fighters().map(Character::id).collect()
    }

    /// Standing characters in `lane`.
    pub fn in_lane(&self, lane: usize) -> impl Iterator<Item = &Character> {
        self.fighters().filter(move |c| c.position == lane)
    }

    /// Lane distance between two characters.
    #[must_use]
    pub fn distance(&self, a: CharacterId, b: CharacterId) -> Option<usize> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        Some(a.position.abs_diff(b.position))
    }

    /// The faction left standing, if exactly one is.
    #[must_use]
    pub fn sole_faction(&self) -> Option<Faction> {
        let mut fighters = self.fighters();
        let first = fighters.next()?.faction;
        fighters.all(|c| c.faction == first).then_some(first)
    }

    /// True when fewer than two factions remain standing.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        let mut fighters = self.fighters();
        match fighters.next() {
            None => true,
            Some(first) => fighters.all(|c| c.faction == first.faction),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
