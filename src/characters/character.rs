//! Combatants.
//!
//! A `Character` owns its equipped abilities, its active status effects and
//! its passives. During resolution only the status list, cooldowns and the
//! HP/poise pools change; everything else is fixed at scenario setup.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::core::{AbilityId, CharacterId, PassiveId, StatusId};
use crate::events::Hook;
use crate::status::StatusEffect;

use super::strategy::DecisionStrategy;

/// Which side a character fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    #[must_use]
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// An always-on reactive trait of a character.
#[derive(Clone, Debug)]
pub struct Passive {
    pub id: PassiveId,
    pub name: String,
    pub hook: Rc<dyn Hook>,
}

impl Passive {
    pub fn new(id: PassiveId, name: impl Into<String>, hook: Rc<dyn Hook>) -> Self {
        Self {
            id,
            name: name.into(),
            hook,
        }
    }
}

/// A combatant.
#[derive(Clone, Debug)]
pub struct Character {
    id: CharacterId,
    pub name: String,
    pub faction: Faction,

    pub max_hp: i32,
    pub cur_hp: i32,
    pub max_poise: i32,
    pub cur_poise: i32,

    /// Turn-order speed is drawn from `[min_speed, max_speed]` each round.
    pub min_speed: i32,
    pub max_speed: i32,

    /// Abilities the character may use per turn.
    pub actions_per_turn: u32,

    /// Current lane.
    pub position: usize,

    abilities: Vec<Ability>,
    statuses: Vec<StatusEffect>,
    passives: Vec<Passive>,
    strategy: Option<Rc<dyn DecisionStrategy>>,
    defeated: bool,
}

impl Character {
    /// Create a character with default stats.
    ///
    /// The id is assigned when the character joins a roster.
    pub fn new(name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id: CharacterId::new(0),
            name: name.into(),
            faction,
            max_hp: 30,
            cur_hp: 30,
            max_poise: 10,
            cur_poise: 10,
            min_speed: 1,
            max_speed: 6,
            actions_per_turn: 1,
            position: 0,
            abilities: Vec::new(),
            statuses: Vec::new(),
            passives: Vec::new(),
            strategy: None,
            defeated: false,
        }
    }

    /// Set max and current HP (builder pattern).
    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.max_hp = hp;
        self.cur_hp = hp;
        self
    }

    /// Set max and current poise (builder pattern).
    #[must_use]
    pub fn with_poise(mut self, poise: i32) -> Self {
        self.max_poise = poise;
        self.cur_poise = poise;
        self
    }

    /// Set the speed range (builder pattern). `min == max` gives a fixed speed.
    #[must_use]
    pub fn with_speed(mut self, min: i32, max: i32) -> Self {
        self.min_speed = min.min(max);
        self.max_speed = min.max(max);
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions_per_turn: u32) -> Self {
        self.actions_per_turn = actions_per_turn;
        self
    }

    /// Hand control to an AI strategy (builder pattern).
    #[must_use]
    pub fn with_strategy(mut self, strategy: Rc<dyn DecisionStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Equip an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.equip(ability);
        self
    }

    /// Add a passive (builder pattern).
    #[must_use]
    pub fn with_passive(mut self, passive: Passive) -> Self {
        self.add_passive(passive);
        self
    }

    /// Equip an ability. Returns `false` if one with the same id is equipped.
    pub fn equip(&mut self, ability: Ability) -> bool {
        if self.ability(ability.id()).is_some() {
            return false;
        }
        self.abilities.push(ability);
        true
    }

    /// Add a passive. Returns `false` if one with the same id is present.
    pub fn add_passive(&mut self, passive: Passive) -> bool {
        if self.passives.iter().any(|p| p.id == passive.id) {
            return false;
        }
        self.passives.push(passive);
        true
    }

    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: CharacterId) {
        self.id = id;
    }

    #[must_use]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    #[must_use]
    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id() == id)
    }

    pub fn ability_mut(&mut self, id: AbilityId) -> Option<&mut Ability> {
        self.abilities.iter_mut().find(|a| a.id() == id)
    }

    pub(crate) fn abilities_mut(&mut self) -> &mut [Ability] {
        &mut self.abilities
    }

    #[must_use]
    pub fn statuses(&self) -> &[StatusEffect] {
        &self.statuses
    }

    #[must_use]
    pub fn status(&self, id: StatusId) -> Option<&StatusEffect> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn status_mut(&mut self, id: StatusId) -> Option<&mut StatusEffect> {
        self.statuses.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn has_status(&self, id: StatusId) -> bool {
        self.status(id).is_some()
    }

    pub(crate) fn push_status(&mut self, effect: StatusEffect) {
        self.statuses.push(effect);
    }

    pub(crate) fn take_status(&mut self, id: StatusId) -> Option<StatusEffect> {
        let index = self.statuses.iter().position(|s| s.id == id)?;
        Some(self.statuses.remove(index))
    }

    pub(crate) fn statuses_mut(&mut self) -> &mut [StatusEffect] {
        &mut self.statuses
    }

    #[must_use]
    pub fn passives(&self) -> &[Passive] {
        &self.passives
    }

    #[must_use]
    pub fn strategy(&self) -> Option<&Rc<dyn DecisionStrategy>> {
        self.strategy.as_ref()
    }

    /// Characters without a strategy wait for external input.
    #[must_use]
    pub fn is_ai_controlled(&self) -> bool {
        self.strategy.is_some()
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub(crate) fn mark_defeated(&mut self) {
        self.defeated = true;
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, HP {}/{}, poise {}/{})",
            self.name, self.faction, self.cur_hp, self.max_hp, self.cur_poise, self.max_poise
        )
    }
}
