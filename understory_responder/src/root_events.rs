// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root-level event registrations.
//!
//! A responder that needs to keep observing an event type after the pointer
//! leaves its subtree (a drag tracking `pointermove`, a press waiting for
//! `pointerup`) registers its node here. The event manager delivers every
//! native event of that type to every registered node, regardless of where the
//! event's target sits in the tree.
//!
//! Additions apply immediately. Removals are buffered and applied by
//! [`RootEventTable::flush`] once the current dispatch has finished walking,
//! so the registrations for an event type never change while they are being
//! iterated.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::EventType;

/// Mapping from event type to the nodes registered for it at the root.
#[derive(Clone, Debug)]
pub struct RootEventTable<K> {
    registrations: HashMap<EventType, SmallVec<[K; 4]>>,
    pending_removals: Vec<(EventType, K)>,
}

impl<K> Default for RootEventTable<K> {
    fn default() -> Self {
        Self {
            registrations: HashMap::new(),
            pending_removals: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> RootEventTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` for `ty`.
    ///
    /// Cancels a removal of the same pair scheduled earlier in this dispatch.
    /// Returns `false` if the pair was already effectively registered.
    pub fn add(&mut self, ty: EventType, node: K) -> bool {
        let was_pending = self.cancel_removal(ty, node);
        let nodes = self.registrations.entry(ty).or_default();
        if nodes.contains(&node) {
            return was_pending;
        }
        nodes.push(node);
        true
    }

    /// Schedule removal of `node` from `ty` for the next [`flush`](Self::flush).
    ///
    /// Returns `false` if the pair is not effectively registered.
    pub fn schedule_removal(&mut self, ty: EventType, node: K) -> bool {
        if !self.is_registered(ty, node) {
            return false;
        }
        self.pending_removals.push((ty, node));
        true
    }

    /// Apply buffered removals.
    pub fn flush(&mut self) {
        for (ty, node) in self.pending_removals.drain(..) {
            if let Some(nodes) = self.registrations.get_mut(&ty) {
                nodes.retain(|n| *n != node);
                if nodes.is_empty() {
                    self.registrations.remove(&ty);
                }
            }
        }
    }

    /// Returns `true` if removals are waiting for [`flush`](Self::flush).
    pub fn has_pending_removals(&self) -> bool {
        !self.pending_removals.is_empty()
    }

    /// Nodes registered for `ty`, in registration order.
    ///
    /// Includes nodes whose removal is still pending.
    pub fn nodes(&self, ty: EventType) -> &[K] {
        self.registrations
            .get(&ty)
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `node` is registered for `ty` and no removal is pending.
    pub fn is_registered(&self, ty: EventType, node: K) -> bool {
        self.nodes(ty).contains(&node) && !self.pending_removals.contains(&(ty, node))
    }

    /// Remove `node` from every event type immediately.
    ///
    /// Only for use outside a dispatch, e.g. when a node is unmounted.
    pub fn remove_node(&mut self, node: K) {
        self.pending_removals.retain(|(_, n)| *n != node);
        self.registrations.retain(|_, nodes| {
            nodes.retain(|n| *n != node);
            !nodes.is_empty()
        });
    }

    fn cancel_removal(&mut self, ty: EventType, node: K) -> bool {
        let before = self.pending_removals.len();
        self.pending_removals.retain(|p| *p != (ty, node));
        before != self.pending_removals.len()
    }
}
