//! Subscriber identity and handler traits.
//!
//! A subscriber is anything that reacts to events: the combat's own system
//! handlers, abilities, status effects, passives, and external observers.
//! `SubscriberId` names it so it can be unsubscribed later; the handler is
//! the code the bus calls.
//!
//! Abilities, statuses and passives implement [`Hook`] once per kind and are
//! bound to the character carrying them with [`BoundHook`].

use std::fmt;
use std::rc::Rc;

use crate::combat::CombatContext;
use crate::core::{AbilityId, CharacterId, PassiveId, StatusId};

use super::event::{CombatEvent, EventKind};
use super::priority::Priority;

/// Identity of a subscriber. At most one subscription per (kind, id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriberId {
    /// A handler installed by the combat itself.
    System(&'static str),
    /// An ability equipped by `owner`.
    Ability { owner: CharacterId, ability: AbilityId },
    /// A status effect carried by `owner`.
    Status { owner: CharacterId, status: StatusId },
    /// A passive held by `owner`.
    Passive { owner: CharacterId, passive: PassiveId },
    /// An external, read-only observer.
    Observer(u32),
}

impl SubscriberId {
    /// The character this subscriber belongs to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<CharacterId> {
        match *self {
            SubscriberId::Ability { owner, .. }
            | SubscriberId::Status { owner, .. }
            | SubscriberId::Passive { owner, .. } => Some(owner),
            SubscriberId::System(_) | SubscriberId::Observer(_) => None,
        }
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriberId::System(name) => write!(f, "System({name})"),
            SubscriberId::Ability { owner, ability } => write!(f, "{owner}/{ability}"),
            SubscriberId::Status { owner, status } => write!(f, "{owner}/{status}"),
            SubscriberId::Passive { owner, passive } => write!(f, "{owner}/{passive}"),
            SubscriberId::Observer(id) => write!(f, "Observer({id})"),
        }
    }
}

/// Code invoked by the bus for one event.
///
/// The event is shared down the handler chain: edits are visible to every
/// later handler and to the broadcaster. The context allows mutation of
/// characters, further broadcasts, and (un)subscription.
pub trait EventHandler {
    fn handle(&self, event: &mut CombatEvent, ctx: &mut CombatContext);
}

impl<F> EventHandler for F
where
    F: Fn(&mut CombatEvent, &mut CombatContext),
{
    fn handle(&self, event: &mut CombatEvent, ctx: &mut CombatContext) {
        self(event, ctx)
    }
}

/// Reactive behavior shared by every character carrying it.
///
/// One `Hook` value describes a kind of ability, status or passive; the
/// character it acts for is passed as `holder` on every call.
pub trait Hook: fmt::Debug {
    /// The event kinds to subscribe to, and at which priority.
    fn subscriptions(&self) -> Vec<(EventKind, Priority)>;

    /// React to an event on behalf of `holder`.
    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext);

    /// Called after the hook is detached from `holder` (status removal).
    fn on_detach(&self, _holder: CharacterId, _ctx: &mut CombatContext) {}
}

/// A [`Hook`] bound to the character it acts for.
#[derive(Debug)]
pub struct BoundHook {
    holder: CharacterId,
    hook: Rc<dyn Hook>,
}

impl BoundHook {
    pub fn new(holder: CharacterId, hook: Rc<dyn Hook>) -> Self {
        Self { holder, hook }
    }
}

impl EventHandler for BoundHook {
    fn handle(&self, event: &mut CombatEvent, ctx: &mut CombatContext) {
        self.hook.on_event(self.holder, event, ctx);
    }
}
