//! Action definitions.

use crate::core::{CharacterId, StatusId};
use crate::status::StatusEffect;

/// A single-purpose state mutation.
///
/// Actions are queued on the [`CombatContext`](crate::combat::CombatContext)
/// and resolved one at a time. Targets are optional because handlers often
/// forward whatever an event carried; an absent or defeated target makes the
/// action a no-op.
#[derive(Clone, Debug)]
pub enum Action {
    /// Attach `effect` to `target`, or add `stacks` to the one it carries.
    ApplyStatus {
        target: Option<CharacterId>,
        effect: StatusEffect,
        stacks: u32,
    },

    /// Subtract `amount` from the defender's HP or poise.
    DealDamage {
        attacker: Option<CharacterId>,
        defender: Option<CharacterId>,
        amount: i32,
        poise: bool,
    },

    /// Detach a status and stop its behavior.
    RemoveStatus {
        target: CharacterId,
        status: StatusId,
    },

    /// Put a character in another lane.
    Move { character: CharacterId, lane: usize },

    /// Remove a character from the fight.
    Defeat { character: CharacterId },
}

impl Action {
    pub fn apply_status(target: Option<CharacterId>, effect: StatusEffect, stacks: u32) -> Self {
        Action::ApplyStatus {
            target,
            effect,
            stacks,
        }
    }

    pub fn deal_damage(
        attacker: Option<CharacterId>,
        defender: Option<CharacterId>,
        amount: i32,
        poise: bool,
    ) -> Self {
        Action::DealDamage {
            attacker,
            defender,
            amount,
            poise,
        }
    }

    pub fn remove_status(target: CharacterId, status: StatusId) -> Self {
        Action::RemoveStatus { target, status }
    }

    pub fn move_to(character: CharacterId, lane: usize) -> Self {
        Action::Move { character, lane }
    }

    pub fn defeat(character: CharacterId) -> Self {
        Action::Defeat { character }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::ApplyStatus { .. } => "apply-status",
            Action::DealDamage { .. } => "deal-damage",
            Action::RemoveStatus { .. } => "remove-status",
            Action::Move { .. } => "move",
            Action::Defeat { .. } => "defeat",
        }
    }
}
