//! Combat log: a read-only observer of every event.
//!
//! The log subscribes at the observer band, so it records each event as the
//! last handler saw it. Two combats run from the same seed with the same
//! inputs produce identical logs; [`CombatLog::fingerprint`] turns a log into
//! bytes that can be compared or stored.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::Result;
use crate::events::{CombatEvent, EventBus, EventKind, Priority, SubscriberId};

use super::context::CombatContext;

/// Subscriber id the log registers under.
pub const COMBAT_LOG: SubscriberId = SubscriberId::System("combat-log");

/// Shared handle to the recorded events.
#[derive(Clone, Debug, Default)]
pub struct CombatLog {
    events: Rc<RefCell<Vec<CombatEvent>>>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event kind on `bus`.
    pub fn attach(&self, bus: &mut EventBus) {
        for kind in EventKind::ALL {
            let events = Rc::clone(&self.events);
            bus.subscribe(
                kind,
                COMBAT_LOG,
                Priority::OBSERVER,
                Rc::new(move |event: &mut CombatEvent, _: &mut CombatContext| {
                    events.borrow_mut().push(event.clone());
                }),
            );
        }
    }

    /// A copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<CombatEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Recorded events of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: EventKind) -> Vec<CombatEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Encode the log with bincode.
    pub fn fingerprint(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&*self.events.borrow())?)
    }
}
