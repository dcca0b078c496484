//! Priority-ordered subscriber table.
//!
//! The bus stores, per event kind, the subscribers sorted by priority
//! (descending) and then by subscription order (ascending). Dispatch itself
//! lives on [`CombatContext::broadcast`](crate::combat::CombatContext::broadcast),
//! because handlers need the whole context, bus included.
//!
//! ## Re-entrancy
//!
//! Handlers may subscribe, unsubscribe and broadcast while a broadcast is in
//! progress. Two rules make that safe:
//!
//! - Unsubscribing only tombstones the entry. Tombstones are skipped by any
//!   dispatch still walking the list and physically removed at the start of
//!   the next broadcast for that kind.
//! - A broadcast walks an `im::Vector` snapshot of the list. The snapshot is
//!   an O(1) structural copy, so inserts and compaction on the live list
//!   never move the outer iterator. Subscribers added mid-broadcast run from
//!   the next broadcast of that kind.

use std::cell::Cell;
use std::rc::Rc;

use im::Vector;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::core::CharacterId;

use super::event::EventKind;
use super::handler::{BoundHook, EventHandler, Hook, SubscriberId};
use super::priority::Priority;

/// One (kind, subscriber) registration.
pub(crate) struct Subscription {
    pub(crate) id: SubscriberId,
    pub(crate) priority: Priority,
    sequence: u64,
    removed: Cell<bool>,
    pub(crate) handler: Rc<dyn EventHandler>,
}

impl Subscription {
    pub(crate) fn is_removed(&self) -> bool {
        self.removed.get()
    }

    fn is_live_for(&self, id: SubscriberId) -> bool {
        !self.removed.get() && self.id == id
    }
}

/// Snapshot of one kind's subscriber list, as walked by a broadcast.
pub(crate) type SubscriberList = Vector<Rc<Subscription>>;

#[derive(Default)]
struct KindEntry {
    subscribers: SubscriberList,
    tombstones: usize,
}

/// Subscriber table for one combat.
#[derive(Default)]
pub struct EventBus {
    kinds: FxHashMap<EventKind, KindEntry>,
    next_sequence: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind` under `id`.
    ///
    /// Returns `false` (and changes nothing) if `id` is already subscribed
    /// to `kind`.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        id: SubscriberId,
        priority: Priority,
        handler: Rc<dyn EventHandler>,
    ) -> bool {
        let entry = self.kinds.entry(kind).or_default();
        if entry.subscribers.iter().any(|s| s.is_live_for(id)) {
            trace!(%kind, %id, "duplicate subscription ignored");
            return false;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        // After every entry of equal or higher priority: sequence is
        // monotonic, so equal priorities stay in subscription order.
        let position = entry
            .subscribers
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(entry.subscribers.len());

        entry.subscribers.insert(
            position,
            Rc::new(Subscription {
                id,
                priority,
                sequence,
                removed: Cell::new(false),
                handler,
            }),
        );
        trace!(%kind, %id, %priority, sequence, "subscribed");
        true
    }

    /// Subscribe a hook for every kind it asks for, bound to `holder`.
    ///
    /// Returns how many subscriptions were added.
    pub fn subscribe_hook(
        &mut self,
        id: SubscriberId,
        holder: CharacterId,
        hook: &Rc<dyn Hook>,
    ) -> usize {
        let handler: Rc<dyn EventHandler> = Rc::new(BoundHook::new(holder, Rc::clone(hook)));
        hook.subscriptions()
            .into_iter()
            .filter(|&(kind, priority)| self.subscribe(kind, id, priority, Rc::clone(&handler)))
            .count()
    }

    /// Remove `id` from `kind`. Safe during a broadcast of that kind.
    ///
    /// Returns `true` if a live subscription was found.
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriberId) -> bool {
        let Some(entry) = self.kinds.get_mut(&kind) else {
            return false;
        };
        let mut found = false;
        for subscription in entry.subscribers.iter().filter(|s| s.is_live_for(id)) {
            subscription.removed.set(true);
            found = true;
        }
        if found {
            entry.tombstones += 1;
            trace!(%kind, %id, "unsubscribed");
        }
        found
    }

    /// Remove `id` from every kind. Returns how many subscriptions ended.
    pub fn unsubscribe_all(&mut self, id: SubscriberId) -> usize {
        self.unsubscribe_where(|sub| sub == id)
    }

    /// Remove every subscriber owned by `owner` (death, leaving combat).
    pub fn unsubscribe_owner(&mut self, owner: CharacterId) -> usize {
        self.unsubscribe_where(|sub| sub.owner() == Some(owner))
    }

    fn unsubscribe_where(&mut self, matches: impl Fn(SubscriberId) -> bool) -> usize {
        let mut removed = 0;
        for (kind, entry) in self.kinds.iter_mut() {
            let mut here = 0;
            for subscription in entry.subscribers.iter() {
                if !subscription.is_removed() && matches(subscription.id) {
                    subscription.removed.set(true);
                    here += 1;
                }
            }
            if here > 0 {
                entry.tombstones += here;
                trace!(%kind, count = here, "unsubscribed");
            }
            removed += here;
        }
        removed
    }

    /// Is `id` live on `kind`?
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind, id: SubscriberId) -> bool {
        self.kinds
            .get(&kind)
            .is_some_and(|entry| entry.subscribers.iter().any(|s| s.is_live_for(id)))
    }

    /// Number of live subscribers on `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.kinds.get(&kind).map_or(0, |entry| {
            entry.subscribers.iter().filter(|s| !s.is_removed()).count()
        })
    }

    /// Live subscribers on `kind`, in dispatch order.
    #[must_use]
    pub fn subscribers(&self, kind: EventKind) -> Vec<(SubscriberId, Priority)> {
        self.kinds.get(&kind).map_or_else(Vec::new, |entry| {
            entry
                .subscribers
                .iter()
                .filter(|s| !s.is_removed())
                .map(|s| (s.id, s.priority))
                .collect()
        })
    }

    /// Entries still physically present but unsubscribed.
    #[must_use]
    pub fn tombstone_count(&self, kind: EventKind) -> usize {
        self.kinds.get(&kind).map_or(0, |entry| entry.tombstones)
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.kinds.clear();
    }

    /// Compact `kind` and return the list a broadcast should walk.
    ///
    /// Called once at the start of each broadcast. Compaction only touches
    /// the live list; snapshots already handed out are unaffected.
    pub(crate) fn dispatch_list(&mut self, kind: EventKind) -> SubscriberList {
        let Some(entry) = self.kinds.get_mut(&kind) else {
            return Vector::new();
        };
        if entry.tombstones > 0 {
            entry.subscribers = entry
                .subscribers
                .iter()
                .filter(|s| !s.is_removed())
                .cloned()
                .collect();
            trace!(%kind, compacted = entry.tombstones, "compacted tombstones");
            entry.tombstones = 0;
        }
        debug_assert!(entry
            .subscribers
            .iter()
            .zip(entry.subscribers.iter().skip(1))
            .all(|(a, b)| a.priority > b.priority
                || (a.priority == b.priority && a.sequence < b.sequence)));
        entry.subscribers.clone()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        let mut kinds: Vec<_> = self.kinds.keys().copied().collect();
        kinds.sort();
        for kind in kinds {
            map.entry(&kind, &self.subscribers(kind));
        }
        map.finish()
    }
}
