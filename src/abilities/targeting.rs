//! Target selection.
//!
//! Range is measured in lanes: a character in lane 2 is at distance 3 from
//! one in lane 5. Unit-targeting abilities list the characters in range,
//! grouped by lane; lane-targeting abilities list lane indices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::characters::{Character, Roster};
use crate::core::CharacterId;

/// Filters applied on top of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingModifier {
    EnemiesOnly,
    AlliesOnly,
    NotSelf,
}

impl TargetingModifier {
    /// Does `target` pass this filter for `caster`?
    #[must_use]
    pub fn allows(self, caster: &Character, target: &Character) -> bool {
        match self {
            TargetingModifier::EnemiesOnly => caster.faction.is_hostile_to(target.faction),
            TargetingModifier::AlliesOnly => !caster.faction.is_hostile_to(target.faction),
            TargetingModifier::NotSelf => caster.id() != target.id(),
        }
    }
}

/// What an activation is aimed at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelection {
    Units(Vec<CharacterId>),
    Lanes(Vec<usize>),
}

impl TargetSelection {
    /// A single-unit selection.
    pub fn unit(id: CharacterId) -> Self {
        TargetSelection::Units(vec![id])
    }

    /// A single-lane selection.
    pub fn lane(lane: usize) -> Self {
        TargetSelection::Lanes(vec![lane])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            TargetSelection::Units(units) => units.is_empty(),
            TargetSelection::Lanes(lanes) => lanes.is_empty(),
        }
    }
}

/// Everything an ability could currently be aimed at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidTargets {
    /// Characters in range, keyed by lane.
    Units(BTreeMap<usize, Vec<CharacterId>>),
    /// Lanes in range.
    Lanes(Vec<usize>),
}

impl ValidTargets {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ValidTargets::Units(by_lane) => by_lane.values().all(Vec::is_empty),
            ValidTargets::Lanes(lanes) => lanes.is_empty(),
        }
    }

    /// Is every entry of `selection` a valid target?
    ///
    /// An empty selection, or one of the wrong shape, is never valid.
    #[must_use]
    pub fn contains(&self, selection: &TargetSelection) -> bool {
        match (self, selection) {
            (ValidTargets::Units(by_lane), TargetSelection::Units(units)) => {
                !units.is_empty()
                    && units
                        .iter()
                        .all(|unit| by_lane.values().any(|ids| ids.contains(unit)))
            }
            (ValidTargets::Lanes(valid), TargetSelection::Lanes(lanes)) => {
                !lanes.is_empty() && lanes.iter().all(|lane| valid.contains(lane))
            }
            _ => false,
        }
    }
}

/// Lanes within `[min_range, max_range]` of `origin`.
pub(crate) fn lanes_in_range(
    roster: &Roster,
    origin: usize,
    min_range: usize,
    max_range: usize,
) -> Vec<usize> {
    (0..roster.lane_count())
        .filter(|lane| (min_range..=max_range).contains(&lane.abs_diff(origin)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Faction;

    #[test]
    fn test_lanes_in_range() {
        let roster = Roster::new(6);
        assert_eq!(lanes_in_range(&roster, 2, 1, 2), vec![0, 1, 3, 4]);
        assert_eq!(lanes_in_range(&roster, 5, 0, 0), vec![5]);
    }

    #[test]
    fn test_modifiers() {
        let mut roster = Roster::new(4);
        let a = roster.add(Character::new("A", Faction::Player), 0);
        let b = roster.add(Character::new("B", Faction::Enemy), 0);
        let a = roster.get(a).unwrap();
        let b = roster.get(b).unwrap();

        assert!(TargetingModifier::EnemiesOnly.allows(a, b));
        assert!(!TargetingModifier::AlliesOnly.allows(a, b));
        assert!(TargetingModifier::AlliesOnly.allows(a, a));
        assert!(!TargetingModifier::NotSelf.allows(a, a));
    }

    #[test]
    fn test_contains() {
        let mut by_lane = BTreeMap::new();
        by_lane.insert(1, vec![CharacterId::new(3)]);
        let valid = ValidTargets::Units(by_lane);

        assert!(valid.contains(&TargetSelection::unit(CharacterId::new(3))));
        assert!(!valid.contains(&TargetSelection::unit(CharacterId::new(4))));
        assert!(!valid.contains(&TargetSelection::Units(Vec::new())));
        assert!(!valid.contains(&TargetSelection::lane(1)));
    }
}
