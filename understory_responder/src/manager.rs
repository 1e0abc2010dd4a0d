// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event manager: the engine's entry points.
//!
//! [`EventManager::handle_top_level_event`] runs one native event through the
//! responder system:
//!
//! 1. Walk from the event target outward via parent links, resolving each node
//!    to its canonical instance, and collect every attached responder whose
//!    module declares the event type.
//! 2. Append every (node, module) registered for the event type at the root
//!    that the walk did not already collect.
//! 3. If nothing is interested, stop. No context is created.
//! 4. Invoke each candidate with its lazily created state.
//! 5. Notify ownership observers if ownership changed during the dispatch.
//! 6. Apply deferred root-event removals.
//! 7. Execute the queued synthetic events in two-phase order.
//!
//! Timers, unmounts and ownership rounds go through the same
//! invoke-then-execute cycle. Nothing is retained between entry points except
//! the engine tables, so tests can build a fresh manager per case.
//!
//! A panicking module handler propagates out of the entry point; the queued
//! synthetic events of that dispatch are dropped without running.

use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::context::{DispatchContext, Registries};
use crate::dispatcher::{self, EventQueue};
use crate::listening::ListenerChange;
use crate::module::{Hook, ModuleId, Responder};
use crate::root_events::RootEventTable;
use crate::state::StateArena;
use crate::tree::ResponderTree;
use crate::types::{EventType, EventTypeSet, NativeEvent};

/// Upper bound on consecutive ownership-change notification rounds.
const MAX_OWNERSHIP_ROUNDS: usize = 8;

/// What a dispatch did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A responder prevented the native event's default action.
    pub default_prevented: bool,
    /// Number of queued synthetic events executed.
    pub executed: usize,
}

impl DispatchOutcome {
    fn merge(&mut self, other: Self) {
        self.default_prevented |= other.default_prevented;
        self.executed += other.executed;
    }
}

type Candidates<T> = SmallVec<[(<T as ResponderTree>::Node, Responder<T>); 8]>;

/// Owner of all responder state for one host.
pub struct EventManager<T: ResponderTree> {
    registries: Registries<T>,
    states: StateArena<T::Node>,
    valid_types: HashMap<ModuleId, EventTypeSet>,
    observers: Vec<(T::Node, ModuleId)>,
    last_time_stamp: u64,
}

impl<T: ResponderTree> Default for EventManager<T> {
    fn default() -> Self {
        Self {
            registries: Registries::default(),
            states: StateArena::new(),
            valid_types: HashMap::new(),
            observers: Vec::new(),
            last_time_stamp: 0,
        }
    }
}

impl<T: ResponderTree> core::fmt::Debug for EventManager<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventManager")
            .field("states", &self.states)
            .field("ownership", &self.registries.ownership)
            .field("root_events", &self.registries.root_events)
            .field("timers", &self.registries.timers)
            .finish_non_exhaustive()
    }
}

impl<T: ResponderTree> EventManager<T> {
    /// Create a manager with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one native event.
    pub fn handle_top_level_event(
        &mut self,
        tree: &T,
        event: &NativeEvent<T::Node>,
        passive: bool,
    ) -> DispatchOutcome {
        let ty = event.event_type;
        self.last_time_stamp = event.time_stamp;
        let candidates = self.collect_candidates(tree, event.target, ty);
        if candidates.is_empty() {
            return DispatchOutcome::default();
        }
        tracing::trace!(
            event_type = %ty,
            candidates = candidates.len(),
            "dispatching native event"
        );

        let mut cx = DispatchContext::new(
            tree,
            &mut self.registries,
            Some(event),
            passive,
            event.time_stamp,
            event.target,
        );
        for (node, responder) in candidates {
            let state = self
                .states
                .get_or_insert_with(node, responder.module_id(), || responder.create_state());
            cx.enter(node, responder.clone());
            responder.run(Hook::Event, &mut cx, state);
        }
        notify_ownership(&mut self.states, &self.observers, tree, &mut cx);
        let (queue, default_prevented) = cx.finish();
        self.execute(queue, default_prevented)
    }

    /// Register `node`'s responders with the engine.
    ///
    /// Queues native listener installs for their target event types and
    /// subscribes ownership observers.
    pub fn mount(&mut self, tree: &T, node: T::Node) {
        let node = tree.canonical(node);
        let scope = tree.scope_of(node);
        for responder in tree.responders(node) {
            if let Some(scope) = scope {
                for descriptor in responder.target_event_types() {
                    self.registries.listening.ensure(
                        scope,
                        *descriptor,
                        &mut self.registries.listener_changes,
                    );
                }
            }
            let key = (node, responder.module_id());
            if responder.observes_ownership() && !self.observers.contains(&key) {
                self.observers.push(key);
            }
        }
    }

    /// Tear down `node`'s responders.
    ///
    /// Each responder with live state gets its unmount hook, the resulting
    /// synthetic events run, then the node's states, root registrations,
    /// ownership and timers are dropped.
    pub fn unmount(&mut self, tree: &T, node: T::Node) -> DispatchOutcome {
        let node = tree.canonical(node);
        let responders = tree.responders(node);
        let mut cx = DispatchContext::new(
            tree,
            &mut self.registries,
            None,
            true,
            self.last_time_stamp,
            node,
        );
        for responder in responders {
            if let Some(state) = self.states.get_mut(node, responder.module_id()) {
                cx.enter(node, responder.clone());
                responder.run(Hook::Unmount, &mut cx, state);
            }
        }
        notify_ownership(&mut self.states, &self.observers, tree, &mut cx);
        let (queue, default_prevented) = cx.finish();
        let outcome = self.execute(queue, default_prevented);

        self.states.remove_node(node);
        for responder in responders {
            self.registries
                .root_events
                .remove_node((node, responder.module_id()));
        }
        self.registries.ownership.release_all(node);
        self.registries.timers.clear_node(node);
        self.observers.retain(|(n, _)| *n != node);
        outcome
    }

    /// Earliest pending timer deadline, in the host's millisecond clock.
    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.registries.timers.next_deadline()
    }

    /// Fire every timer due at `now`, each as its own dispatch.
    pub fn fire_timers(&mut self, tree: &T, now: u64) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        while let Some(timer) = self.registries.timers.pop_due(now) {
            let Some(responder) = find_responder(tree, timer.node, timer.module) else {
                continue;
            };
            let Some(state) = self.states.get_mut(timer.node, timer.module) else {
                continue;
            };
            tracing::trace!(node = ?timer.node, module = responder.name(), "firing timer");
            self.last_time_stamp = timer.deadline;
            let mut cx = DispatchContext::new(
                tree,
                &mut self.registries,
                None,
                true,
                timer.deadline,
                timer.node,
            );
            cx.enter(timer.node, responder.clone());
            responder.run(Hook::Timer(timer.id), &mut cx, state);
            notify_ownership(&mut self.states, &self.observers, tree, &mut cx);
            let (queue, default_prevented) = cx.finish();
            outcome.merge(self.execute(queue, default_prevented));
        }
        outcome
    }

    /// Drain the native listener changes the host still has to apply.
    pub fn take_listener_changes(&mut self) -> Vec<ListenerChange<T::Scope>> {
        core::mem::take(&mut self.registries.listener_changes)
    }

    /// Current owner of `scope`.
    pub fn owner(&self, scope: T::Scope) -> Option<T::Node> {
        self.registries.ownership.owner(scope)
    }

    /// Root registrations, keyed by (node, module).
    pub fn root_events(&self) -> &RootEventTable<(T::Node, ModuleId)> {
        &self.registries.root_events
    }

    /// Per-node responder states.
    pub fn states(&self) -> &StateArena<T::Node> {
        &self.states
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.registries.timers.len()
    }

    /// Apply deferred removals, then run the batch.
    fn execute(&mut self, queue: EventQueue<T::Node>, default_prevented: bool) -> DispatchOutcome {
        self.registries.root_events.flush();
        DispatchOutcome {
            default_prevented,
            executed: dispatcher::run(queue),
        }
    }

    fn collect_candidates(&mut self, tree: &T, target: T::Node, ty: EventType) -> Candidates<T> {
        let mut candidates = Candidates::<T>::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            let node = tree.canonical(node);
            for responder in tree.responders(node) {
                let valid = *self
                    .valid_types
                    .entry(responder.module_id())
                    .or_insert_with(|| {
                        EventTypeSet::from_descriptors(responder.target_event_types())
                    });
                if valid.contains(ty) {
                    candidates.push((node, responder.clone()));
                }
            }
            cursor = tree.parent(node);
        }

        let walked = candidates.len();
        for &(node, module) in self.registries.root_events.nodes(ty) {
            let seen = candidates[..walked]
                .iter()
                .any(|(n, r)| *n == node && r.module_id() == module);
            if seen {
                continue;
            }
            if let Some(responder) = find_responder(tree, node, module) {
                candidates.push((node, responder.clone()));
            }
        }
        candidates
    }
}

fn find_responder<T: ResponderTree>(
    tree: &T,
    node: T::Node,
    module: ModuleId,
) -> Option<&Responder<T>> {
    tree.responders(node)
        .iter()
        .find(|r| r.module_id() == module)
}

/// Run ownership observers until ownership settles.
fn notify_ownership<T: ResponderTree>(
    states: &mut StateArena<T::Node>,
    observers: &[(T::Node, ModuleId)],
    tree: &T,
    cx: &mut DispatchContext<'_, T>,
) {
    for _ in 0..MAX_OWNERSHIP_ROUNDS {
        if !cx.take_ownership_changed() {
            return;
        }
        for &(node, module) in observers {
            let Some(responder) = find_responder(tree, node, module) else {
                continue;
            };
            let Some(state) = states.get_mut(node, module) else {
                continue;
            };
            cx.enter(node, responder.clone());
            responder.run(Hook::OwnershipChange, cx, state);
        }
    }
    if cx.take_ownership_changed() {
        #[cfg(debug_assertions)]
        tracing::warn!(
            rounds = MAX_OWNERSHIP_ROUNDS,
            "ownership kept changing during notification; giving up"
        );
    }
}
