// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch context handed to responder modules.
//!
//! One [`DispatchContext`] exists per dispatch (a native event, a timer, an
//! unmount, or an ownership-change round). It is shared by every responder
//! invocation of that dispatch; the event manager points it at the node and
//! module being invoked before each call, and all relative queries resolve
//! against that current node.
//!
//! Synthetic events emitted through [`dispatch_bubbled_event`] and
//! [`dispatch_captured_event`] are queued and only run after every responder
//! has seen the dispatch. [`dispatch_immediate_event`] runs its listener on the
//! spot.
//!
//! [`dispatch_bubbled_event`]: DispatchContext::dispatch_bubbled_event
//! [`dispatch_captured_event`]: DispatchContext::dispatch_captured_event
//! [`dispatch_immediate_event`]: DispatchContext::dispatch_immediate_event

use alloc::vec::Vec;

use kurbo::Point;

use crate::dispatcher::EventQueue;
use crate::event::{Listener, Phase, QueuedEvent, ResponderEvent};
use crate::listening::{ListenerChange, ListeningTable};
use crate::module::{ModuleId, Responder};
use crate::ownership::OwnershipTable;
use crate::root_events::RootEventTable;
use crate::timers::TimerQueue;
use crate::tree::{self, ResponderTree};
use crate::types::{EventDescriptor, EventType, NativeEvent, PointerType, TimerId};

/// Engine tables that outlive a single dispatch.
pub(crate) struct Registries<T: ResponderTree> {
    pub(crate) ownership: OwnershipTable<T::Scope, T::Node>,
    pub(crate) root_events: RootEventTable<(T::Node, ModuleId)>,
    pub(crate) listening: ListeningTable<T::Scope>,
    pub(crate) listener_changes: Vec<ListenerChange<T::Scope>>,
    pub(crate) timers: TimerQueue<T::Node>,
}

impl<T: ResponderTree> Default for Registries<T> {
    fn default() -> Self {
        Self {
            ownership: OwnershipTable::new(),
            root_events: RootEventTable::new(),
            listening: ListeningTable::new(),
            listener_changes: Vec::new(),
            timers: TimerQueue::new(),
        }
    }
}

/// Per-dispatch interface between responder modules and the engine.
pub struct DispatchContext<'a, T: ResponderTree> {
    tree: &'a T,
    registries: &'a mut Registries<T>,
    native: Option<&'a NativeEvent<T::Node>>,
    passive: bool,
    time_stamp: u64,
    node: T::Node,
    responder: Option<Responder<T>>,
    queue: EventQueue<T::Node>,
    default_prevented: bool,
    ownership_changed: bool,
}

impl<'a, T: ResponderTree> DispatchContext<'a, T> {
    pub(crate) fn new(
        tree: &'a T,
        registries: &'a mut Registries<T>,
        native: Option<&'a NativeEvent<T::Node>>,
        passive: bool,
        time_stamp: u64,
        node: T::Node,
    ) -> Self {
        Self {
            tree,
            registries,
            native,
            passive,
            time_stamp,
            node,
            responder: None,
            queue: EventQueue::new(),
            default_prevented: false,
            ownership_changed: false,
        }
    }

    /// Point the context at the next invocation.
    pub(crate) fn enter(&mut self, node: T::Node, responder: Responder<T>) {
        self.node = node;
        self.responder = Some(responder);
    }

    pub(crate) fn take_ownership_changed(&mut self) -> bool {
        core::mem::take(&mut self.ownership_changed)
    }

    pub(crate) fn finish(self) -> (EventQueue<T::Node>, bool) {
        (self.queue, self.default_prevented)
    }

    /// The host tree.
    pub fn tree(&self) -> &'a T {
        self.tree
    }

    /// The native event being dispatched, or `None` for timer, unmount and
    /// ownership-change dispatches.
    pub fn native_event(&self) -> Option<&'a NativeEvent<T::Node>> {
        self.native
    }

    /// Resolved top-level event type.
    pub fn event_type(&self) -> Option<EventType> {
        self.native.map(|e| e.event_type)
    }

    /// Node the native event originated from.
    pub fn event_target(&self) -> Option<T::Node> {
        self.native.map(|e| e.target)
    }

    /// Returns `true` if the native listener is passive.
    pub fn is_passive(&self) -> bool {
        self.passive
    }

    /// Timestamp of the dispatch in milliseconds.
    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    /// The node whose responder is running (canonical).
    pub fn current_node(&self) -> T::Node {
        self.node
    }

    /// Start a synthetic event about `target`.
    ///
    /// Pointer type and timestamp are taken from the native event.
    pub fn create_event(&self, name: &'static str, target: T::Node) -> ResponderEvent<T::Node> {
        ResponderEvent::new(name, target)
            .with_pointer_type(
                self.native
                    .map(NativeEvent::pointer_type)
                    .unwrap_or(PointerType::Mouse),
            )
            .with_time_stamp(self.time_stamp)
    }

    /// Queue `event` for the bubble phase.
    pub fn dispatch_bubbled_event(
        &mut self,
        event: ResponderEvent<T::Node>,
        listener: &Listener<T::Node>,
    ) {
        self.queue.push(
            Phase::Bubble,
            QueuedEvent {
                event,
                listener: listener.clone(),
            },
        );
    }

    /// Queue `event` for the capture phase.
    pub fn dispatch_captured_event(
        &mut self,
        event: ResponderEvent<T::Node>,
        listener: &Listener<T::Node>,
    ) {
        self.queue.push(
            Phase::Capture,
            QueuedEvent {
                event,
                listener: listener.clone(),
            },
        );
    }

    /// Run `listener` for `event` now, outside the two-phase batch.
    pub fn dispatch_immediate_event(
        &mut self,
        event: ResponderEvent<T::Node>,
        listener: &Listener<T::Node>,
    ) {
        listener(&event);
    }

    /// Mark the native event's default action as prevented.
    ///
    /// Passive native listeners cannot prevent default; the call is ignored.
    pub fn prevent_default(&mut self) {
        if self.passive {
            #[cfg(debug_assertions)]
            tracing::warn!(
                module = self.module_name(),
                event_type = ?self.event_type(),
                "prevent_default called while handling a passive event"
            );
            return;
        }
        self.default_prevented = true;
    }

    /// Returns `true` if a responder prevented the native default so far.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Claim exclusive ownership of `target`'s scope for the current node.
    ///
    /// Returns `false` without side effects if another node owns the scope or
    /// `target` is detached. Requesting again as the owner succeeds.
    pub fn request_ownership(&mut self, target: T::Node) -> bool {
        let Some(scope) = self.tree.scope_of(target) else {
            return false;
        };
        let node = self.node;
        let changed = self.registries.ownership.owner(scope) != Some(node);
        let granted = self.registries.ownership.request(scope, node);
        if granted && changed {
            self.ownership_changed = true;
        }
        granted
    }

    /// Release ownership of `target`'s scope.
    ///
    /// Returns `false` if the current node is not the owner.
    pub fn release_ownership(&mut self, target: T::Node) -> bool {
        let Some(scope) = self.tree.scope_of(target) else {
            return false;
        };
        let released = self.registries.ownership.release(scope, self.node);
        if released {
            self.ownership_changed = true;
        }
        released
    }

    /// Returns `true` if any node owns `target`'s scope.
    pub fn is_target_owned(&self, target: T::Node) -> bool {
        self.tree
            .scope_of(target)
            .is_some_and(|scope| self.registries.ownership.is_owned(scope))
    }

    /// Returns `true` if the current node owns `target`'s scope.
    pub fn has_ownership(&self, target: T::Node) -> bool {
        self.tree
            .scope_of(target)
            .is_some_and(|scope| self.registries.ownership.owner(scope) == Some(self.node))
    }

    /// Returns `true` if `target` is the current node or lies beneath it.
    pub fn is_target_within_event_component(&self, target: T::Node) -> bool {
        tree::is_within(self.tree, target, self.node)
    }

    /// Returns `true` if `child` is `parent` or lies beneath it.
    pub fn is_target_within_element(&self, child: T::Node, parent: T::Node) -> bool {
        tree::is_within(self.tree, child, parent)
    }

    /// Returns `true` if `pt` falls in a hit-slop band in the current node's
    /// scope.
    ///
    /// Detached nodes and hosts without geometry answer `false`.
    pub fn is_position_within_hit_slop(&self, pt: Point) -> bool {
        let Some(scope) = self.tree.scope_of(self.node) else {
            return false;
        };
        self.tree
            .element_from_point(scope, pt)
            .and_then(|hit| self.tree.hit_slop(hit))
            .is_some_and(|slop| slop.is_within_slop(pt))
    }

    /// Deliver `types` to the current node wherever their target lies.
    ///
    /// Takes effect immediately and makes sure the host has native listeners
    /// installed for them.
    pub fn add_root_event_types(&mut self, types: &[EventDescriptor]) {
        let Some(module) = self.module_id() else {
            return;
        };
        let scope = self.tree.scope_of(self.node);
        for descriptor in types {
            if let Some(scope) = scope {
                self.registries.listening.ensure(
                    scope,
                    *descriptor,
                    &mut self.registries.listener_changes,
                );
            }
            let added = self
                .registries
                .root_events
                .add(descriptor.event_type, (self.node, module));
            if !added {
                #[cfg(debug_assertions)]
                tracing::warn!(
                    module = self.module_name(),
                    event_type = %descriptor.event_type,
                    "root event type is already registered for this node"
                );
            }
        }
    }

    /// Stop delivering `types` to the current node at the root.
    ///
    /// Removal is applied once the current dispatch has finished walking.
    pub fn remove_root_event_types(&mut self, types: &[EventDescriptor]) {
        let Some(module) = self.module_id() else {
            return;
        };
        for descriptor in types {
            let scheduled = self
                .registries
                .root_events
                .schedule_removal(descriptor.event_type, (self.node, module));
            #[cfg(debug_assertions)]
            if !scheduled && !self.declares_root_type(descriptor.event_type) {
                tracing::warn!(
                    module = self.module_name(),
                    event_type = %descriptor.event_type,
                    "removing a root event type the module never declared"
                );
            }
            #[cfg(not(debug_assertions))]
            let _ = scheduled;
        }
    }

    /// Schedule a timer for the current responder `delay` milliseconds from now.
    pub fn set_timeout(&mut self, delay: u64) -> TimerId {
        let module = self.module_id().unwrap_or(ModuleId::of::<()>());
        self.registries
            .timers
            .schedule(self.node, module, self.time_stamp.saturating_add(delay))
    }

    /// Cancel a timer. Clearing a fired or cleared timer does nothing.
    pub fn clear_timeout(&mut self, id: TimerId) {
        self.registries.timers.clear(id);
    }

    fn module_id(&self) -> Option<ModuleId> {
        self.responder.as_ref().map(Responder::module_id)
    }

    #[cfg(debug_assertions)]
    fn module_name(&self) -> &'static str {
        self.responder.as_ref().map_or("<none>", Responder::name)
    }

    #[cfg(debug_assertions)]
    fn declares_root_type(&self, ty: EventType) -> bool {
        self.responder
            .as_ref()
            .is_some_and(|r| r.root_event_types().iter().any(|d| d.event_type == ty))
    }
}

impl<T: ResponderTree> core::fmt::Debug for DispatchContext<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("event_type", &self.event_type())
            .field("node", &self.node)
            .field("passive", &self.passive)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}
