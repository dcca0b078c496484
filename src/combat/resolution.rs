//! Dice resolution and clashes.
//!
//! An activation that reaches `ResolveAbilities` rolls its dice (each roll
//! is announced through `DieRolled`, where handlers may change the value)
//! and lands them on its defenders. Each landing die is announced through
//! `DieHit` and then deals its value as HP damage and as poise damage.
//!
//! When the defender answered with a reaction, both sides roll and the sums
//! are compared through `Clash`. The winner's dice land on the loser; on a
//! tie no dice land.

use tracing::debug;

use crate::actions::Action;
use crate::core::{AbilityId, CharacterId, DiceList};
use crate::events::CombatEvent;

use super::context::CombatContext;

/// An activated ability waiting for resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    pub caster: CharacterId,
    pub ability: AbilityId,
    pub dice: DiceList,
    pub targets: Vec<CharacterId>,
    pub lanes: Vec<usize>,
}

impl Activation {
    /// An activation with no dice and no targets.
    pub(crate) fn empty(caster: CharacterId, ability: AbilityId) -> Self {
        Self {
            caster,
            ability,
            dice: DiceList::new(),
            targets: Vec::new(),
            lanes: Vec::new(),
        }
    }

    /// Read an activation back out of a (possibly edited) activation event.
    pub(crate) fn from_event(event: CombatEvent) -> Option<Self> {
        match event {
            CombatEvent::AbilityActivated {
                caster,
                ability,
                dice,
                targets,
                lanes,
            } => Some(Self {
                caster,
                ability,
                dice,
                targets,
                lanes,
            }),
            _ => None,
        }
    }

    /// The single unit this activation aims at, if that is all it aims at.
    #[must_use]
    pub fn single_target(&self) -> Option<CharacterId> {
        match (self.targets.as_slice(), self.lanes.is_empty()) {
            ([target], true) => Some(*target),
            _ => None,
        }
    }

    /// Standing characters this activation's dice land on.
    ///
    /// Lane activations hit every character in the chosen lanes that the
    /// ability's targeting modifiers allow.
    pub(crate) fn defenders(&self, ctx: &CombatContext) -> Vec<CharacterId> {
        let roster = ctx.roster();
        let mut defenders: Vec<CharacterId> = self
            .targets
            .iter()
            .copied()
            .filter(|&id| roster.is_standing(id))
            .collect();

        let Some(caster) = roster.get(self.caster) else {
            return defenders;
        };
        let Some(ability) = caster.ability(self.ability) else {
            return defenders;
        };
        for &lane in &self.lanes {
            for target in roster.in_lane(lane) {
                let allowed = ability.modifiers().iter().all(|m| m.allows(caster, target));
                if allowed && !defenders.contains(&target.id()) {
                    defenders.push(target.id());
                }
            }
        }
        defenders
    }
}

/// How a clash ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClashOutcome {
    Win {
        winner: CharacterId,
        loser: CharacterId,
        margin: i32,
    },
    Tie,
}

/// Roll every die through `DieRolled` and return the final dice.
pub(crate) fn roll_dice(
    ctx: &mut CombatContext,
    owner: CharacterId,
    ability: AbilityId,
    dice: &DiceList,
) -> DiceList {
    dice.iter()
        .map(|die| {
            let mut die = *die;
            die.roll(ctx.rng_mut());
            match ctx.broadcast(CombatEvent::DieRolled { owner, ability, die }) {
                CombatEvent::DieRolled { die, .. } => die,
                _ => die,
            }
        })
        .collect()
}

/// Land rolled dice on each defender.
pub(crate) fn land_dice(
    ctx: &mut CombatContext,
    attacker: CharacterId,
    ability: AbilityId,
    dice: &DiceList,
    defenders: &[CharacterId],
) {
    for &defender in defenders {
        for die in dice {
            if !ctx.roster().is_standing(defender) {
                break;
            }
            let event = ctx.broadcast(CombatEvent::DieHit {
                attacker,
                defender,
                ability,
                die: *die,
            });
            let value = match event {
                CombatEvent::DieHit { die, .. } => die.value_or_zero(),
                _ => die.value_or_zero(),
            };
            debug!(%attacker, %defender, %ability, value, "die hit");
            ctx.execute(Action::deal_damage(Some(attacker), Some(defender), value, false));
            ctx.execute(Action::deal_damage(Some(attacker), Some(defender), value, true));
        }
    }
}

/// Resolve an unanswered activation.
pub(crate) fn resolve_unopposed(ctx: &mut CombatContext, activation: &Activation) {
    if activation.dice.is_empty() {
        return;
    }
    let dice = roll_dice(ctx, activation.caster, activation.ability, &activation.dice);
    let defenders = activation.defenders(ctx);
    land_dice(ctx, activation.caster, activation.ability, &dice, &defenders);
}

/// Resolve an attack answered by a reaction.
pub(crate) fn resolve_clash(
    ctx: &mut CombatContext,
    attack: &Activation,
    reaction: &Activation,
) -> ClashOutcome {
    let attacker = attack.caster;
    let defender = reaction.caster;
    let attack_dice = roll_dice(ctx, attacker, attack.ability, &attack.dice);
    let reaction_dice = roll_dice(ctx, defender, reaction.ability, &reaction.dice);

    let (attacker_roll, defender_roll) = match ctx.broadcast(CombatEvent::Clash {
        attacker,
        defender,
        attack: attack.ability,
        reaction: reaction.ability,
        attacker_roll: sum(&attack_dice),
        defender_roll: sum(&reaction_dice),
    }) {
        CombatEvent::Clash {
            attacker_roll,
            defender_roll,
            ..
        } => (attacker_roll, defender_roll),
        _ => (sum(&attack_dice), sum(&reaction_dice)),
    };
    debug!(%attacker, %defender, attacker_roll, defender_roll, "clash");

    if attacker_roll == defender_roll {
        ctx.broadcast(CombatEvent::ClashTie {
            attacker,
            defender,
            roll: attacker_roll,
        });
        return ClashOutcome::Tie;
    }

    let margin = attacker_roll.saturating_sub(defender_roll).saturating_abs();
    let (winner, loser, ability, dice) = if attacker_roll > defender_roll {
        (attacker, defender, attack.ability, attack_dice)
    } else {
        (defender, attacker, reaction.ability, reaction_dice)
    };
    ctx.broadcast(CombatEvent::ClashWin {
        winner,
        loser,
        margin,
    });
    ctx.broadcast(CombatEvent::ClashLose {
        loser,
        winner,
        margin,
    });
    land_dice(ctx, winner, ability, &dice, &[loser]);
    ClashOutcome::Win {
        winner,
        loser,
        margin,
    }
}

fn sum(dice: &DiceList) -> i32 {
    dice.iter()
        .map(|d| d.value_or_zero())
        .fold(0, i32::saturating_add)
}
