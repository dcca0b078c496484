//! Combat states.

use serde::{Deserialize, Serialize};

/// A state of the combat state machine.
///
/// ```text
/// Idle -> CombatStart -> RoundStart
///   -> (TurnStart -> AwaitingAbilityInput -> [AwaitingClashInput]
///        -> ResolveAbilities -> TurnEnd)*
///   -> RoundEnd -> RoundStart ... -> CombatEnd
/// ```
///
/// Every state except the two `Awaiting*` states moves on by itself once
/// entered. `CombatEnd` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    Idle,
    CombatStart,
    RoundStart,
    TurnStart,
    AwaitingAbilityInput,
    AwaitingClashInput,
    ResolveAbilities,
    TurnEnd,
    RoundEnd,
    CombatEnd,
}

impl CombatState {
    /// Does the machine wait for external input in this state?
    #[must_use]
    pub fn is_suspension(self) -> bool {
        matches!(
            self,
            CombatState::AwaitingAbilityInput | CombatState::AwaitingClashInput
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == CombatState::CombatEnd
    }
}

impl std::fmt::Display for CombatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
