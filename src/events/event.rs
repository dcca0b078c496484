//! Combat events.
//!
//! Events are a closed set: one variant per gameplay occurrence, each
//! carrying only its own payload. Handlers receive `&mut CombatEvent`, but
//! only the fields documented as editable are meant to change: they let
//! earlier handlers shape the outcome every later handler (and the
//! broadcaster) observes.
//!
//! | Editable field | Event | Used for |
//! |---|---|---|
//! | `forfeit` | `TurnStart` | skipping a turn (stagger) |
//! | `dice`, `targets`, `lanes` | `AbilityActivated` | adding/removing dice, redirecting |
//! | `die` | `DieRolled`, `DieHit` | roll modifiers |
//! | `amount` | `DamageDealt` | damage modifiers and guards |
//! | `attacker_roll`, `defender_roll` | `Clash` | clash modifiers |

use serde::{Deserialize, Serialize};

use crate::characters::Faction;
use crate::combat::CombatState;
use crate::core::{AbilityId, CharacterId, DiceList, Die, StatusId};

/// Discriminant of a [`CombatEvent`]. Subscriptions are keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CombatStart,
    CombatEnd,
    RoundStart,
    RoundEnd,
    TurnStart,
    TurnEnd,
    StateChanged,
    AbilityActivated,
    DieRolled,
    DieHit,
    DamageDealt,
    DamageTaken,
    StatusApplied,
    StatusExpired,
    ClashEligible,
    Clash,
    ClashWin,
    ClashLose,
    ClashTie,
    UnitMoved,
    UnitDefeated,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 21] = [
        EventKind::CombatStart,
        EventKind::CombatEnd,
        EventKind::RoundStart,
        EventKind::RoundEnd,
        EventKind::TurnStart,
        EventKind::TurnEnd,
        EventKind::StateChanged,
        EventKind::AbilityActivated,
        EventKind::DieRolled,
        EventKind::DieHit,
        EventKind::DamageDealt,
        EventKind::DamageTaken,
        EventKind::StatusApplied,
        EventKind::StatusExpired,
        EventKind::ClashEligible,
        EventKind::Clash,
        EventKind::ClashWin,
        EventKind::ClashLose,
        EventKind::ClashTie,
        EventKind::UnitMoved,
        EventKind::UnitDefeated,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Something that happened (or is about to happen) in a combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The combat has begun.
    CombatStart,

    /// The combat is over. `victor` is `None` on a draw or a round-limit stop.
    CombatEnd { victor: Option<Faction> },

    RoundStart { round: u32 },

    RoundEnd { round: u32 },

    /// A character's turn begins. Set `forfeit` to skip straight to turn end.
    TurnStart { character: CharacterId, forfeit: bool },

    /// A character's turn ends. `forfeited` repeats the final `TurnStart` flag.
    TurnEnd { character: CharacterId, forfeited: bool },

    /// The state machine moved from one state to another.
    StateChanged { from: CombatState, to: CombatState },

    /// An ability was activated. `dice`, `targets` and `lanes` are the
    /// effective values resolution will use.
    AbilityActivated {
        caster: CharacterId,
        ability: AbilityId,
        dice: DiceList,
        targets: Vec<CharacterId>,
        lanes: Vec<usize>,
    },

    /// A die was rolled. Editing `die` changes the value resolution uses.
    DieRolled {
        owner: CharacterId,
        ability: AbilityId,
        die: Die,
    },

    /// A rolled die is about to land on `defender`.
    DieHit {
        attacker: CharacterId,
        defender: CharacterId,
        ability: AbilityId,
        die: Die,
    },

    /// Damage is about to be subtracted. `amount` is editable.
    DamageDealt {
        attacker: Option<CharacterId>,
        defender: CharacterId,
        amount: i32,
        poise: bool,
    },

    /// Damage was subtracted. `remaining` is the pool (HP or poise) after.
    DamageTaken {
        attacker: Option<CharacterId>,
        defender: CharacterId,
        amount: i32,
        poise: bool,
        remaining: i32,
    },

    /// A status was added (`fresh`) or gained stacks. `stacks` is the total.
    StatusApplied {
        target: CharacterId,
        status: StatusId,
        stacks: u32,
        fresh: bool,
    },

    StatusExpired { target: CharacterId, status: StatusId },

    /// The defender could answer the attack with one of `reactions`.
    ClashEligible {
        attacker: CharacterId,
        defender: CharacterId,
        ability: AbilityId,
        reactions: Vec<AbilityId>,
    },

    /// Both sides rolled. The rolls are editable until compared.
    Clash {
        attacker: CharacterId,
        defender: CharacterId,
        attack: AbilityId,
        reaction: AbilityId,
        attacker_roll: i32,
        defender_roll: i32,
    },

    ClashWin {
        winner: CharacterId,
        loser: CharacterId,
        margin: i32,
    },

    ClashLose {
        loser: CharacterId,
        winner: CharacterId,
        margin: i32,
    },

    ClashTie {
        attacker: CharacterId,
        defender: CharacterId,
        roll: i32,
    },

    UnitMoved {
        character: CharacterId,
        from: usize,
        to: usize,
    },

    UnitDefeated { character: CharacterId },
}

impl CombatEvent {
    /// The subscription key for this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            CombatEvent::CombatStart => EventKind::CombatStart,
            CombatEvent::CombatEnd { .. } => EventKind::CombatEnd,
            CombatEvent::RoundStart { .. } => EventKind::RoundStart,
            CombatEvent::RoundEnd { .. } => EventKind::RoundEnd,
            CombatEvent::TurnStart { .. } => EventKind::TurnStart,
            CombatEvent::TurnEnd { .. } => EventKind::TurnEnd,
            CombatEvent::StateChanged { .. } => EventKind::StateChanged,
            CombatEvent::AbilityActivated { .. } => EventKind::AbilityActivated,
            CombatEvent::DieRolled { .. } => EventKind::DieRolled,
            CombatEvent::DieHit { .. } => EventKind::DieHit,
            CombatEvent::DamageDealt { .. } => EventKind::DamageDealt,
            CombatEvent::DamageTaken { .. } => EventKind::DamageTaken,
            CombatEvent::StatusApplied { .. } => EventKind::StatusApplied,
            CombatEvent::StatusExpired { .. } => EventKind::StatusExpired,
            CombatEvent::ClashEligible { .. } => EventKind::ClashEligible,
            CombatEvent::Clash { .. } => EventKind::Clash,
            CombatEvent::ClashWin { .. } => EventKind::ClashWin,
            CombatEvent::ClashLose { .. } => EventKind::ClashLose,
            CombatEvent::ClashTie { .. } => EventKind::ClashTie,
            CombatEvent::UnitMoved { .. } => EventKind::UnitMoved,
            CombatEvent::UnitDefeated { .. } => EventKind::UnitDefeated,
        }
    }

    /// Build an activation event from an ability's base dice and a selection.
    pub fn ability_activated(
        caster: CharacterId,
        ability: AbilityId,
        dice: DiceList,
        targets: Vec<CharacterId>,
        lanes: Vec<usize>,
    ) -> Self {
        CombatEvent::AbilityActivated {
            caster,
            ability,
            dice,
            targets,
            lanes,
        }
    }

    /// Build a damage event before subtraction.
    pub fn damage_dealt(
        attacker: Option<CharacterId>,
        defender: CharacterId,
        amount: i32,
        poise: bool,
    ) -> Self {
        CombatEvent::DamageDealt {
            attacker,
            defender,
            amount,
            poise,
        }
    }
}
