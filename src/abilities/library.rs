//! Built-in abilities.

use std::rc::Rc;

use crate::actions::Action;
use crate::combat::CombatContext;
use crate::core::{AbilityId, CharacterId, Die};
use crate::events::{CombatEvent, EventKind, Hook, Priority};
use crate::status::library::{bleed, duel_to_the_death, DISHONORABLE};

use super::ability::{Ability, AbilityType, ActivationGate};
use super::targeting::TargetingModifier;

pub const HAVE_AT_THEE: AbilityId = AbilityId::new(1);
pub const THWACK: AbilityId = AbilityId::new(2);
pub const DISCHARGE: AbilityId = AbilityId::new(3);
pub const RETREAT: AbilityId = AbilityId::new(4);
pub const RIPOSTE: AbilityId = AbilityId::new(5);
pub const RELENTLESS_STABBING: AbilityId = AbilityId::new(6);

/// Challenge an enemy to a duel. Unusable while anyone is dishonored.
pub fn have_at_thee() -> Ability {
    Ability::new(HAVE_AT_THEE, "Have at Thee!", AbilityType::Utility)
        .with_description("Challenge an enemy to a Duel to the Death.")
        .with_cooldown(1)
        .with_range(0, 5)
        .with_modifier(TargetingModifier::EnemiesOnly)
        .with_gate(ActivationGate::NoFighterHas(DISHONORABLE))
        .with_script(Rc::new(ChallengeScript))
}

pub fn thwack() -> Ability {
    Ability::new(THWACK, "Thwack", AbilityType::Attack)
        .with_description("A heavy blow.")
        .with_range(0, 1)
        .with_modifier(TargetingModifier::EnemiesOnly)
        .with_die(Die::new(2, 4))
        .with_die(Die::new(1, 3))
}

/// Hit every enemy in a lane.
pub fn discharge() -> Ability {
    Ability::new(DISCHARGE, "Discharge", AbilityType::Attack)
        .with_description("Strikes every enemy in the target lane.")
        .with_cooldown(2)
        .with_range(1, 3)
        .targeting_lanes(true)
        .with_modifier(TargetingModifier::EnemiesOnly)
        .with_die(Die::new(3, 6))
}

pub fn retreat() -> Ability {
    Ability::new(RETREAT, "Retreat", AbilityType::Movement)
        .with_description("Fall back one or two lanes.")
        .with_cooldown(1)
        .with_range(1, 2)
        .targeting_lanes(false)
        .with_script(Rc::new(MoveScript))
}

pub fn riposte() -> Ability {
    Ability::new(RIPOSTE, "Riposte", AbilityType::Reaction)
        .with_description("Answer an attack with a counter-thrust.")
        .with_cooldown(1)
        .with_range(0, 1)
        .with_modifier(TargetingModifier::EnemiesOnly)
        .with_die(Die::new(2, 5))
}

/// Three light dice; every one that lands opens a wound.
pub fn relentless_stabbing() -> Ability {
    Ability::new(RELENTLESS_STABBING, "Relentless Stabbing", AbilityType::Attack)
        .with_description("Each hit applies one Bleed.")
        .with_cooldown(1)
        .with_range(0, 1)
        .with_modifier(TargetingModifier::EnemiesOnly)
        .with_die(Die::new(1, 2))
        .with_die(Die::new(1, 2))
        .with_die(Die::new(1, 2))
        .with_script(Rc::new(WoundScript))
}

#[derive(Debug)]
struct ChallengeScript;

impl Hook for ChallengeScript {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::AbilityActivated, Priority::STANDARD)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        let CombatEvent::AbilityActivated {
            caster,
            ability: HAVE_AT_THEE,
            targets,
            ..
        } = event
        else {
            return;
        };
        if *caster != holder {
            return;
        }
        for &target in targets.iter() {
            ctx.execute(Action::apply_status(Some(target), duel_to_the_death(holder), 0));
        }
    }
}

#[derive(Debug)]
struct MoveScript;

impl Hook for MoveScript {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::AbilityActivated, Priority::STANDARD)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        let CombatEvent::AbilityActivated {
            caster,
            ability: RETREAT,
            lanes,
            ..
        } = event
        else {
            return;
        };
        if let (true, Some(&lane)) = (*caster == holder, lanes.first()) {
            ctx.execute(Action::move_to(holder, lane));
        }
    }
}

#[derive(Debug)]
struct WoundScript;

impl Hook for WoundScript {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::DieHit, Priority::STANDARD)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        if let CombatEvent::DieHit {
            attacker,
            defender,
            ability: RELENTLESS_STABBING,
            ..
        } = *event
        {
            if attacker == holder {
                ctx.execute(Action::apply_status(Some(defender), bleed(), 1));
            }
        }
    }
}
