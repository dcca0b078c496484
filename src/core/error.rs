//! Error types for the inbound combat surface.
//!
//! Rules resolution itself never fails: actions on absent targets do
//! nothing. Errors only report rejected input and bad setup.

use thiserror::Error;

use crate::combat::CombatState;

use super::entity::{AbilityId, CharacterId};

/// Result type alias using [`CombatError`].
pub type Result<T> = std::result::Result<T, CombatError>;

/// Reasons a combat rejects a request. A rejected request changes nothing.
#[derive(Debug, Error)]
pub enum CombatError {
    /// Input arrived while the machine was not waiting for it.
    #[error("combat is in state {state}, not awaiting {expected}")]
    NotAwaitingInput {
        /// State at the time of the request.
        state: CombatState,
        /// What kind of input the request carried.
        expected: &'static str,
    },

    /// The character is not part of this combat, or is defeated.
    #[error("{0} is not a standing fighter")]
    UnknownCharacter(CharacterId),

    /// The character does not have the ability equipped.
    #[error("{character} has no {ability} equipped")]
    AbilityNotEquipped {
        character: CharacterId,
        ability: AbilityId,
    },

    /// Cooldown or an activation gate blocks the ability.
    #[error("{0} cannot be activated right now")]
    NotActivatable(AbilityId),

    /// Only reactions are accepted while awaiting clash input.
    #[error("{0} is not an eligible reaction")]
    NotAReaction(AbilityId),

    /// The selection is outside the ability's valid targets.
    #[error("invalid target selection for {0}")]
    InvalidTarget(AbilityId),

    /// Configuration or scenario failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Combat log could not be encoded.
    #[error("failed to encode combat log: {0}")]
    Encode(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CombatError::NotAwaitingInput {
            state: CombatState::RoundStart,
            expected: "ability input",
        };
        assert_eq!(
            err.to_string(),
            "combat is in state RoundStart, not awaiting ability input"
        );

        let err = CombatError::AbilityNotEquipped {
            character: CharacterId::new(2),
            ability: AbilityId::new(5),
        };
        assert_eq!(err.to_string(), "Character(2) has no Ability(5) equipped");
    }
}
