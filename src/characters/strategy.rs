//! Decision strategies for computer-controlled characters.
//!
//! A character carrying a strategy never suspends the combat: whenever the
//! machine would wait for its input, the strategy is asked instead.

use std::fmt;

use tracing::trace;

use crate::abilities::{TargetSelection, ValidTargets};
use crate::combat::CombatContext;
use crate::core::{AbilityId, CharacterId};

/// An ability together with the targets it should be used on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityChoice {
    pub ability: AbilityId,
    pub selection: TargetSelection,
}

impl AbilityChoice {
    pub fn new(ability: AbilityId, selection: TargetSelection) -> Self {
        Self { ability, selection }
    }
}

/// Picks abilities and reactions on a character's behalf.
pub trait DecisionStrategy: fmt::Debug {
    /// Choose the next ability for `me`. `None` ends the turn.
    fn choose_ability(&self, me: CharacterId, ctx: &mut CombatContext) -> Option<AbilityChoice>;

    /// Choose a reaction from `eligible`, or `None` to take the hit.
    fn choose_reaction(
        &self,
        _me: CharacterId,
        eligible: &[AbilityId],
        _ctx: &mut CombatContext,
    ) -> Option<AbilityId> {
        eligible.first().copied()
    }
}

/// Uniformly random choices drawn from the combat's rng.
#[derive(Clone, Copy, Debug, Default)]
pub struct PureRandom;

impl DecisionStrategy for PureRandom {
    fn choose_ability(&self, me: CharacterId, ctx: &mut CombatContext) -> Option<AbilityChoice> {
        let candidates: Vec<(AbilityId, ValidTargets)> = {
            let roster = ctx.roster();
            let character = roster.standing(me)?;
            character
                .abilities()
                .iter()
                .filter(|a| a.kind.is_proactive() && a.is_activatable(me, roster))
                .map(|a| (a.id(), a.valid_targets(me, roster)))
                .filter(|(_, targets)| !targets.is_empty())
                .collect()
        };

        let index = ctx.rng_mut().index(candidates.len())?;
        let (ability, targets) = &candidates[index];
        let selection = match targets {
            ValidTargets::Units(by_lane) => {
                let units: Vec<CharacterId> = by_lane.values().flatten().copied().collect();
                let unit = *ctx.rng_mut().choose(&units)?;
                TargetSelection::Units(vec![unit])
            }
            ValidTargets::Lanes(lanes) => {
                let lane = *ctx.rng_mut().choose(lanes)?;
                TargetSelection::Lanes(vec![lane])
            }
        };
        trace!(%me, ability = %ability, ?selection, "random choice");
        Some(AbilityChoice::new(*ability, selection))
    }

    fn choose_reaction(
        &self,
        _me: CharacterId,
        eligible: &[AbilityId],
        ctx: &mut CombatContext,
    ) -> Option<AbilityId> {
        ctx.rng_mut().choose(eligible).copied()
    }
}
