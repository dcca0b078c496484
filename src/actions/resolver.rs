//! Action resolution.
//!
//! Each action broadcasts the events that describe it and returns the
//! follow-up actions it caused (stagger, death). Follow-ups are not run
//! inline: the context queues them ahead of anything else pending, so they
//! pass through the same event pipeline as every other action.

use tracing::{debug, trace};

use crate::combat::CombatContext;
use crate::core::{CharacterId, StatusId};
use crate::events::{CombatEvent, SubscriberId};
use crate::status::{library, StatusEffect};

use super::action::Action;

impl Action {
    /// Resolve this action now and return its follow-ups.
    ///
    /// Most callers want [`CombatContext::execute`], which also runs the
    /// follow-ups.
    pub fn resolve(self, ctx: &mut CombatContext) -> Vec<Action> {
        trace!(action = self.name(), "resolving");
        match self {
            Action::ApplyStatus {
                target,
                effect,
                stacks,
            } => apply_status(ctx, target, effect, stacks),
            Action::DealDamage {
                attacker,
                defender,
                amount,
                poise,
            } => deal_damage(ctx, attacker, defender, amount, poise),
            Action::RemoveStatus { target, status } => remove_status(ctx, target, status),
            Action::Move { character, lane } => move_to(ctx, character, lane),
            Action::Defeat { character } => defeat(ctx, character),
        }
    }
}

fn apply_status(
    ctx: &mut CombatContext,
    target: Option<CharacterId>,
    mut effect: StatusEffect,
    stacks: u32,
) -> Vec<Action> {
    let Some(target) = target else {
        return Vec::new();
    };
    let Some(character) = ctx.roster_mut().standing_mut(target) else {
        return Vec::new();
    };
    let status = effect.id;

    if let Some(existing) = character.status_mut(status) {
        // The existing instance decides whether stacks accumulate
        if stacks > 0 && existing.is_stackable() {
            existing.stacks = existing.stacks.saturating_add(stacks);
            let total = existing.stacks;
            debug!(%target, %status, stacks = total, "status stacked");
            ctx.broadcast(CombatEvent::StatusApplied {
                target,
                status,
                stacks: total,
                fresh: false,
            });
        }
        return Vec::new();
    }

    if effect.is_stackable() && stacks > 0 {
        effect.stacks = stacks;
    }
    let total = effect.stacks;
    let behavior = effect.behavior.clone();
    character.push_status(effect);

    if let Some(behavior) = behavior {
        ctx.events_mut()
            .subscribe_hook(SubscriberId::Status { owner: target, status }, target, &behavior);
    }
    debug!(%target, %status, stacks = total, "status applied");
    ctx.broadcast(CombatEvent::StatusApplied {
        target,
        status,
        stacks: total,
        fresh: true,
    });
    Vec::new()
}

fn deal_damage(
    ctx: &mut CombatContext,
    attacker: Option<CharacterId>,
    defender: Option<CharacterId>,
    amount: i32,
    poise: bool,
) -> Vec<Action> {
    let Some(defender) = defender.filter(|&d| ctx.roster().is_standing(d)) else {
        return Vec::new();
    };

    let amount = match ctx.broadcast(CombatEvent::damage_dealt(attacker, defender, amount, poise)) {
        CombatEvent::DamageDealt { amount, .. } => amount,
        _ => amount,
    };

    // A handler may have finished the defender off already
    let Some(character) = ctx.roster_mut().standing_mut(defender) else {
        return Vec::new();
    };
    let remaining = if poise {
        character.cur_poise = character.cur_poise.saturating_sub(amount);
        character.cur_poise
    } else {
        character.cur_hp = character.cur_hp.saturating_sub(amount);
        character.cur_hp
    };
    debug!(%defender, amount, poise, remaining, "damage taken");

    ctx.broadcast(CombatEvent::DamageTaken {
        attacker,
        defender,
        amount,
        poise,
        remaining,
    });

    let Some(character) = ctx.roster().standing(defender) else {
        return Vec::new();
    };
    if character.cur_hp <= 0 {
        vec![Action::defeat(defender)]
    } else if character.cur_poise <= 0 && !character.has_status(library::STAGGERED) {
        vec![Action::apply_status(Some(defender), library::staggered(), 0)]
    } else {
        Vec::new()
    }
}

fn remove_status(ctx: &mut CombatContext, target: CharacterId, status: StatusId) -> Vec<Action> {
    let Some(effect) = ctx
        .roster_mut()
        .get_mut(target)
        .and_then(|c| c.take_status(status))
    else {
        return Vec::new();
    };

    ctx.events_mut()
        .unsubscribe_all(SubscriberId::Status { owner: target, status });
    if let Some(behavior) = &effect.behavior {
        behavior.on_detach(target, ctx);
    }
    debug!(%target, %status, "status removed");
    ctx.broadcast(CombatEvent::StatusExpired { target, status });
    Vec::new()
}

fn move_to(ctx: &mut CombatContext, character: CharacterId, lane: usize) -> Vec<Action> {
    let to = ctx.roster().clamp_lane(lane);
    let Some(mover) = ctx.roster_mut().standing_mut(character) else {
        return Vec::new();
    };
    let from = mover.position;
    if from == to {
        return Vec::new();
    }
    mover.position = to;
    debug!(%character, from, to, "moved");
    ctx.broadcast(CombatEvent::UnitMoved { character, from, to });
    Vec::new()
}

fn defeat(ctx: &mut CombatContext, character: CharacterId) -> Vec<Action> {
    if !ctx.roster().is_standing(character) {
        return Vec::new();
    }

    // Announced while the character's own subscribers can still react
    ctx.broadcast(CombatEvent::UnitDefeated { character });

    if let Some(fallen) = ctx.roster_mut().get_mut(character) {
        fallen.mark_defeated();
    }
    let dropped = ctx.events_mut().unsubscribe_owner(character);
    debug!(%character, subscriptions = dropped, "defeated");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{Character, Faction, Roster};
    use crate::core::CombatConfig;
    use crate::events::EventKind;

    fn context() -> (CombatContext, CharacterId, CharacterId) {
        let mut roster = Roster::new(5);
        let a = roster.add(Character::new("A", Faction::Player).with_hp(10), 1);
        let b = roster.add(Character::new("B", Faction::Enemy).with_hp(10), 2);
        (CombatContext::new(CombatConfig::new(9), roster), a, b)
    }

    #[test]
    fn test_move_clamps_and_skips_noop() {
        let (mut ctx, a, _) = context();
        ctx.execute(Action::move_to(a, 40));
        assert_eq!(ctx.roster().get(a).unwrap().position, 4);

        let follow_ups = Action::move_to(a, 4).resolve(&mut ctx);
        assert!(follow_ups.is_empty());
    }

    #[test]
    fn test_lethal_damage_queues_defeat() {
        let (mut ctx, a, b) = context();
        let follow_ups = Action::deal_damage(Some(a), Some(b), 10, false).resolve(&mut ctx);
        assert_eq!(follow_ups.len(), 1);
        assert!(matches!(follow_ups[0], Action::Defeat { character } if character == b));

        // Not yet resolved
        assert!(ctx.roster().is_standing(b));
        ctx.execute(follow_ups.into_iter().next().unwrap());
        assert!(!ctx.roster().is_standing(b));
    }

    #[test]
    fn test_defeat_unsubscribes_owned_hooks() {
        let (mut ctx, a, _) = context();
        ctx.execute(Action::apply_status(Some(a), library::bleed(), 3));
        assert_eq!(ctx.events().subscriber_count(EventKind::TurnEnd), 1);

        ctx.execute(Action::defeat(a));
        assert_eq!(ctx.events().subscriber_count(EventKind::TurnEnd), 0);

        // Defeated characters take no further damage or statuses
        ctx.execute(Action::deal_damage(None, Some(a), 5, false));
        assert_eq!(ctx.roster().get(a).unwrap().cur_hp, 10);
        ctx.execute(Action::apply_status(Some(a), library::dishonorable(), 0));
        assert!(!ctx.roster().get(a).unwrap().has_status(library::DISHONORABLE));
    }

    #[test]
    fn test_remove_missing_status_is_noop() {
        let (mut ctx, a, _) = context();
        assert!(Action::remove_status(a, library::BLEED)
            .resolve(&mut ctx)
            .is_empty());
    }

    #[test]
    fn test_negative_damage_is_floored() {
        let (mut ctx, a, b) = context();
        ctx.execute(Action::deal_damage(Some(a), Some(b), -4, false));
        assert_eq!(ctx.roster().get(b).unwrap().cur_hp, 10);
    }
}
