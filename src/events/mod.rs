//! Event bus for combat reactions.
//!
//! All gameplay reactions are serialized through one bus per combat:
//! the state machine and actions broadcast events, and abilities, statuses,
//! passives and observers react in priority order.
//!
//! ## Key Components
//!
//! - [`CombatEvent`] / [`EventKind`]: the closed set of events
//! - [`Priority`]: named dispatch bands
//! - [`EventHandler`], [`Hook`]: code the bus invokes
//! - [`SubscriberId`]: who is subscribed
//! - [`EventBus`]: the per-kind, priority-sorted subscriber table
//!
//! ## Example Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use tactical_combat::characters::Roster;
//! use tactical_combat::combat::CombatContext;
//! use tactical_combat::core::CombatConfig;
//! use tactical_combat::events::{CombatEvent, EventKind, Priority, SubscriberId};
//!
//! let mut ctx = CombatContext::new(CombatConfig::new(1), Roster::new(8));
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! for (n, priority) in [(1, Priority::OBSERVER), (2, Priority::IMMEDIATE)] {
//!     let seen = Rc::clone(&seen);
//!     ctx.events_mut().subscribe(
//!         EventKind::RoundStart,
//!         SubscriberId::Observer(n),
//!         priority,
//!         Rc::new(move |_: &mut CombatEvent, _: &mut CombatContext| seen.borrow_mut().push(n)),
//!     );
//! }
//!
//! ctx.broadcast(CombatEvent::RoundStart { round: 1 });
//! assert_eq!(*seen.borrow(), vec![2, 1]);
//! ```

mod bus;
mod event;
mod handler;
mod priority;

pub use bus::EventBus;
pub use event::{CombatEvent, EventKind};
pub use handler::{BoundHook, EventHandler, Hook, SubscriberId};
pub use priority::Priority;
