//! Built-in status effects.
//!
//! Each constructor returns a fresh `StatusEffect` carrying its behavior.
//! Behaviors are stateless: everything they need arrives through the event
//! and the holder id.

use std::rc::Rc;

use tracing::debug;

use crate::actions::Action;
use crate::combat::CombatContext;
use crate::core::{CharacterId, StatusId};
use crate::events::{CombatEvent, EventKind, Hook, Priority};

use super::effect::StatusEffect;

pub const STAGGERED: StatusId = StatusId::new(1);
pub const DUEL_TO_THE_DEATH: StatusId = StatusId::new(2);
pub const DISHONORABLE: StatusId = StatusId::new(3);
pub const BLEED: StatusId = StatusId::new(4);

/// Bonus damage the duel's challenger deals to the holder.
pub const DUEL_BONUS_DAMAGE: i32 = 2;

/// Applied when poise runs out.
///
/// The holder forfeits its next turn and takes double HP damage until that
/// forfeited turn ends, at which point the status is removed and poise is
/// restored to full.
pub fn staggered() -> StatusEffect {
    StatusEffect::new(STAGGERED, "Staggered")
        .with_description("Skips the next turn. Takes double damage.")
        .with_behavior(Rc::new(StaggeredBehavior))
}

/// A challenge issued by `challenger` against the holder.
pub fn duel_to_the_death(challenger: CharacterId) -> StatusEffect {
    StatusEffect::new(DUEL_TO_THE_DEATH, "Duel to the Death")
        .with_description("Takes extra damage from the challenger. Interlopers are dishonored.")
        .with_duration(3)
        .with_source(challenger)
        .with_behavior(Rc::new(DuelBehavior { challenger }))
}

/// Marker for having interfered in a duel. Blocks further challenges.
pub fn dishonorable() -> StatusEffect {
    StatusEffect::new(DISHONORABLE, "Dishonorable")
        .with_description("Interfered in a duel.")
        .with_duration(2)
}

/// Stackable damage over time, dealt at the end of the holder's turns.
pub fn bleed() -> StatusEffect {
    StatusEffect::new(BLEED, "Bleed")
        .with_description("Loses HP equal to stacks at turn end, then one stack.")
        .with_stacks(1)
        .with_behavior(Rc::new(BleedBehavior))
}

#[derive(Debug)]
struct StaggeredBehavior;

impl Hook for StaggeredBehavior {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![
            (EventKind::TurnStart, Priority::STANDARD),
            (EventKind::DamageDealt, Priority::MULTIPLICATIVE),
            (EventKind::TurnEnd, Priority::STANDARD),
        ]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        match event {
            CombatEvent::TurnStart { character, forfeit } if *character == holder => {
                *forfeit = true;
            }
            CombatEvent::DamageDealt {
                defender,
                amount,
                poise: false,
                ..
            } if *defender == holder => {
                *amount = amount.saturating_mul(2);
            }
            CombatEvent::TurnEnd {
                character,
                forfeited: true,
            } if *character == holder => {
                ctx.execute(Action::remove_status(holder, STAGGERED));
            }
            _ => {}
        }
    }

    fn on_detach(&self, holder: CharacterId, ctx: &mut CombatContext) {
        if let Some(character) = ctx.roster_mut().get_mut(holder) {
            character.cur_poise = character.max_poise;
            debug!(%holder, poise = character.cur_poise, "recovered from stagger");
        }
    }
}

#[derive(Debug)]
struct DuelBehavior {
    challenger: CharacterId,
}

impl Hook for DuelBehavior {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::DamageDealt, Priority::ADDITIVE)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        let CombatEvent::DamageDealt {
            attacker: Some(attacker),
            defender,
            amount,
            ..
        } = event
        else {
            return;
        };
        if *defender != holder || *attacker == holder {
            return;
        }

        if *attacker == self.challenger {
            *amount = amount.saturating_add(DUEL_BONUS_DAMAGE);
        } else {
            let interloper = *attacker;
            debug!(%interloper, %holder, "duel interrupted");
            ctx.execute(Action::apply_status(Some(interloper), dishonorable(), 0));
        }
    }
}

#[derive(Debug)]
struct BleedBehavior;

impl Hook for BleedBehavior {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::TurnEnd, Priority::STANDARD)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        let CombatEvent::TurnEnd { character, .. } = event else {
            return;
        };
        if *character != holder {
            return;
        }

        let Some(stacks) = ctx
            .roster_mut()
            .get_mut(holder)
            .and_then(|c| c.status_mut(BLEED))
            .map(|status| {
                let before = status.stacks;
                status.stacks = status.stacks.saturating_sub(1);
                before
            })
        else {
            return;
        };

        let damage = i32::try_from(stacks).unwrap_or(i32::MAX);
        ctx.execute(Action::deal_damage(None, Some(holder), damage, false));
        if stacks <= 1 {
            ctx.execute(Action::remove_status(holder, BLEED));
        }
    }
}
