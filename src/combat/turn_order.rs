//! Per-round turn order.
//!
//! At the start of each round every standing character draws a speed from
//! its `[min_speed, max_speed]` range. Turns are then taken from a max-heap:
//! highest speed first, lower id first on equal speed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::characters::Roster;
use crate::core::CharacterId;

use super::context::CombatContext;

#[derive(Clone, Debug, Default)]
pub struct TurnOrder {
    queue: BinaryHeap<(i32, Reverse<CharacterId>)>,
    drawn: Vec<(CharacterId, i32)>,
}

impl TurnOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw speeds for the round and refill the queue.
    pub fn roll(&mut self, ctx: &mut CombatContext) {
        self.queue.clear();
        self.drawn.clear();
        let ranges: Vec<_> = ctx
            .roster()
            .fighters()
            .map(|f| (f.id(), f.min_speed, f.max_speed))
            .collect();
        for (id, min, max) in ranges {
            let speed = ctx.rng_mut().roll(min, max);
            self.drawn.push((id, speed));
            self.queue.push((speed, Reverse(id)));
        }
        debug!(order = ?self.drawn, "turn order drawn");
    }

    /// The next character to act, skipping any defeated since the draw.
    pub fn next(&mut self, roster: &Roster) -> Option<CharacterId> {
        while let Some((_, Reverse(id))) = self.queue.pop() {
            if roster.is_standing(id) {
                return Some(id);
            }
        }
        None
    }

    /// Speeds drawn this round, in roster order.
    #[must_use]
    pub fn drawn(&self) -> &[(CharacterId, i32)] {
        &self.drawn
    }

    /// Characters still waiting for their turn this round.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
