//! The ability model.
//!
//! An ability is data (range, dice, cooldown, targeting) plus an optional
//! script: a [`Hook`] subscribed for the ability's owner when combat starts.
//! The script is how an ability does anything beyond rolling its dice, e.g.
//! applying a status when it is activated.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::characters::{Character, Roster};
use crate::core::{AbilityId, CharacterId, DiceList, Die, StatusId};
use crate::events::Hook;

use super::targeting::{lanes_in_range, TargetingModifier, ValidTargets};

/// Broad category of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityType {
    Utility,
    Attack,
    Reaction,
    Movement,
}

impl AbilityType {
    /// Can this be chosen on the owner's own turn? Reactions cannot.
    #[must_use]
    pub fn is_proactive(self) -> bool {
        self != AbilityType::Reaction
    }
}

/// A combat-wide condition an ability needs to be activatable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationGate {
    /// No standing fighter carries the status.
    NoFighterHas(StatusId),
    /// The caster does not carry the status.
    CasterLacks(StatusId),
}

impl ActivationGate {
    #[must_use]
    pub fn holds(self, caster: CharacterId, roster: &Roster) -> bool {
        match self {
            ActivationGate::NoFighterHas(status) => {
                roster.fighters().all(|fighter| !fighter.has_status(status))
            }
            ActivationGate::CasterLacks(status) => roster
                .get(caster)
                .is_some_and(|character| !character.has_status(status)),
        }
    }
}

/// An ability equipped by a character.
#[derive(Clone, Debug)]
pub struct Ability {
    id: AbilityId,
    pub name: String,
    pub description: String,
    pub kind: AbilityType,

    /// Rounds the ability is unavailable after use.
    pub cooldown: u32,
    cooldown_remaining: u32,

    /// Lane distance bounds, inclusive.
    pub min_range: usize,
    pub max_range: usize,

    /// Aims at lanes instead of characters.
    pub targets_lane: bool,
    /// Lane abilities only: the lane must hold a valid unit.
    pub needs_unit: bool,

    modifiers: FxHashSet<TargetingModifier>,
    base_dice: DiceList,
    gates: Vec<ActivationGate>,
    script: Option<Rc<dyn Hook>>,
}

impl Ability {
    /// Create a unit-targeting ability with no range, dice or cooldown.
    pub fn new(id: AbilityId, name: impl Into<String>, kind: AbilityType) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            kind,
            cooldown: 0,
            cooldown_remaining: 0,
            min_range: 0,
            max_range: 0,
            targets_lane: false,
            needs_unit: true,
            modifiers: FxHashSet::default(),
            base_dice: DiceList::new(),
            gates: Vec::new(),
            script: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, rounds: u32) -> Self {
        self.cooldown = rounds;
        self
    }

    /// Set the lane distance bounds. Reversed bounds are swapped.
    #[must_use]
    pub fn with_range(mut self, min: usize, max: usize) -> Self {
        self.min_range = min.min(max);
        self.max_range = min.max(max);
        self
    }

    /// Aim at lanes. `needs_unit` restricts to lanes holding a valid unit.
    #[must_use]
    pub fn targeting_lanes(mut self, needs_unit: bool) -> Self {
        self.targets_lane = true;
        self.needs_unit = needs_unit;
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: TargetingModifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    #[must_use]
    pub fn with_die(mut self, die: Die) -> Self {
        self.base_dice.push(die);
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: ActivationGate) -> Self {
        self.gates.push(gate);
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: Rc<dyn Hook>) -> Self {
        self.script = Some(script);
        self
    }

    #[must_use]
    pub fn id(&self) -> AbilityId {
        self.id
    }

    #[must_use]
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    #[must_use]
    pub fn modifiers(&self) -> &FxHashSet<TargetingModifier> {
        &self.modifiers
    }

    /// The unrolled dice this ability brings to resolution.
    #[must_use]
    pub fn base_dice(&self) -> &DiceList {
        &self.base_dice
    }

    #[must_use]
    pub fn gates(&self) -> &[ActivationGate] {
        &self.gates
    }

    #[must_use]
    pub fn script(&self) -> Option<&Rc<dyn Hook>> {
        self.script.as_ref()
    }

    /// Off cooldown.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Available, the caster is standing, and every activation gate holds.
    #[must_use]
    pub fn is_activatable(&self, caster: CharacterId, roster: &Roster) -> bool {
        self.is_available()
            && roster.is_standing(caster)
            && self.gates.iter().all(|gate| gate.holds(caster, roster))
    }

    /// Put the ability on cooldown.
    pub fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    /// Advance the cooldown by one round.
    pub fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    /// Everything `caster` could aim this ability at right now.
    #[must_use]
    pub fn valid_targets(&self, caster: CharacterId, roster: &Roster) -> ValidTargets {
        let Some(me) = roster.standing(caster) else {
            return if self.targets_lane {
                ValidTargets::Lanes(Vec::new())
            } else {
                ValidTargets::Units(Default::default())
            };
        };
        let in_range = |lane: usize| (self.min_range..=self.max_range).contains(&lane.abs_diff(me.position));
        let allowed = |target: &Character| self.modifiers.iter().all(|m| m.allows(me, target));

        if self.targets_lane {
            let lanes = lanes_in_range(roster, me.position, self.min_range, self.max_range)
                .into_iter()
                .filter(|&lane| !self.needs_unit || roster.in_lane(lane).any(|c| allowed(c)))
                .collect();
            return ValidTargets::Lanes(lanes);
        }

        let mut by_lane = std::collections::BTreeMap::new();
        for target in roster.fighters().filter(|&c| in_range(c.position) && allowed(c)) {
            by_lane
                .entry(target.position)
                .or_insert_with(Vec::new)
                .push(target.id());
        }
        ValidTargets::Units(by_lane)
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?}", self.name, self.kind)?;
        if self.cooldown_remaining > 0 {
            write!(f, ", {} rounds left", self.cooldown_remaining)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Faction;
    use crate::status::library::{dishonorable, DISHONORABLE};

    fn roster() -> (Roster, CharacterId, CharacterId, CharacterId, CharacterId) {
        let mut roster = Roster::new(8);
        let me = roster.add(Character::new("Me", Faction::Player), 2);
        let ally = roster.add(Character::new("Ally", Faction::Player), 3);
        let near = roster.add(Character::new("Near", Faction::Enemy), 3);
        let far = roster.add(Character::new("Far", Faction::Enemy), 7);
        (roster, me, ally, near, far)
    }

    #[test]
    fn test_cooldown_cycle() {
        let mut ability = Ability::new(AbilityId::new(1), "Test", AbilityType::Attack).with_cooldown(2);
        assert!(ability.is_available());
        ability.start_cooldown();
        assert!(!ability.is_available());
        ability.tick_cooldown();
        assert_eq!(ability.cooldown_remaining(), 1);
        ability.tick_cooldown();
        ability.tick_cooldown();
        assert!(ability.is_available());
    }

    #[test]
    fn test_unit_targets_grouped_by_lane() {
        let (roster, me, ally, near, _) = roster();
        let ability = Ability::new(AbilityId::new(1), "Poke", AbilityType::Attack).with_range(0, 2);

        let ValidTargets::Units(by_lane) = ability.valid_targets(me, &roster) else {
            panic!("expected unit targets");
        };
        assert_eq!(by_lane.get(&2), Some(&vec![me]));
        assert_eq!(by_lane.get(&3), Some(&vec![ally, near]));
        assert_eq!(by_lane.len(), 2);

        let enemies = ability.with_modifier(TargetingModifier::EnemiesOnly);
        let ValidTargets::Units(by_lane) = enemies.valid_targets(me, &roster) else {
            panic!("expected unit targets");
        };
        assert_eq!(by_lane.values().flatten().copied().collect::<Vec<_>>(), vec![near]);
    }

    #[test]
    fn test_lane_targets() {
        let (roster, me, _, _, _) = roster();
        let open = Ability::new(AbilityId::new(2), "Step", AbilityType::Movement)
            .with_range(1, 1)
            .targeting_lanes(false);
        assert_eq!(open.valid_targets(me, &roster), ValidTargets::Lanes(vec![1, 3]));

        let occupied = Ability::new(AbilityId::new(3), "Blast", AbilityType::Attack)
            .with_range(0, 5)
            .targeting_lanes(true)
            .with_modifier(TargetingModifier::EnemiesOnly);
        assert_eq!(occupied.valid_targets(me, &roster), ValidTargets::Lanes(vec![3, 7]));
    }

    #[test]
    fn test_gate_blocks_activation() {
        let (mut roster, me, _, _, far) = roster();
        let ability = Ability::new(AbilityId::new(1), "Challenge", AbilityType::Utility)
            .with_gate(ActivationGate::NoFighterHas(DISHONORABLE));
        assert!(ability.is_activatable(me, &roster));

        roster.get_mut(far).unwrap().push_status(dishonorable());
        assert!(ability.is_available());
        assert!(!ability.is_activatable(me, &roster));
    }

    #[test]
    fn test_defeated_caster_has_no_targets() {
        let (mut roster, me, _, _, _) = roster();
        roster.get_mut(me).unwrap().mark_defeated();
        let ability = Ability::new(AbilityId::new(1), "Poke", AbilityType::Attack).with_range(0, 8);
        assert!(ability.valid_targets(me, &roster).is_empty());
        assert!(!ability.is_activatable(me, &roster));
    }
}
