// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder timers.
//!
//! Timers are the engine's only deferred work. A responder schedules one from
//! its dispatch context; the host asks for the earliest deadline, arms a single
//! host timer for it, and calls back into the event manager when it elapses.
//! Clearing is idempotent: clearing a fired or already cleared timer is a no-op.

use alloc::vec::Vec;

use crate::module::ModuleId;
use crate::types::TimerId;

/// A scheduled timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timer<K> {
    /// Identifier handed back to the responder.
    pub id: TimerId,
    /// Node whose responder scheduled the timer.
    pub node: K,
    /// Module that scheduled the timer.
    pub module: ModuleId,
    /// Absolute deadline in milliseconds.
    pub deadline: u64,
}

/// Pending timers ordered by deadline, then by scheduling order.
#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    next_id: u64,
    timers: Vec<Timer<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            next_id: 1,
            timers: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> TimerQueue<K> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer for `deadline`.
    pub fn schedule(&mut self, node: K, module: ModuleId, deadline: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let at = self
            .timers
            .partition_point(|t| (t.deadline, t.id) <= (deadline, id));
        self.timers.insert(
            at,
            Timer {
                id,
                node,
                module,
                deadline,
            },
        );
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer scheduled by `node`.
    pub fn clear_node(&mut self, node: K) {
        self.timers.retain(|t| t.node != node);
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.first().map(|t| t.deadline)
    }

    /// Remove and return the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<Timer<K>> {
        if self.timers.first()?.deadline <= now {
            Some(self.timers.remove(0))
        } else {
            None
        }
    }

    /// Returns `true` if `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns `true` if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
