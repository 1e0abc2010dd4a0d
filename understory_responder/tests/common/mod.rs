// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the engine integration tests: an in-memory host tree,
//! a scriptable probe module and an event log.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the fixtures."
)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use understory_responder::context::DispatchContext;
use understory_responder::event::{Listener, ResponderEvent};
use understory_responder::hit_slop::HitSlop;
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventDescriptor, EventType, TimerId};

/// Single scope used by every attached node.
pub(crate) const DOC: u8 = 0;

/// A tree of `u32` nodes. Node 0 is the root.
#[derive(Default)]
pub(crate) struct Tree {
    parents: HashMap<u32, u32>,
    responders: HashMap<u32, Vec<Responder<Self>>>,
    canonical: HashMap<u32, u32>,
    detached: HashSet<u32>,
    slops: Vec<(u32, HitSlop)>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add `node` beneath `parent`.
    pub(crate) fn child(mut self, node: u32, parent: u32) -> Self {
        self.parents.insert(node, parent);
        self
    }

    /// Attach a responder to `node`.
    pub(crate) fn attach(mut self, node: u32, responder: Responder<Self>) -> Self {
        self.responders.entry(node).or_default().push(responder);
        self
    }

    /// Make `alternate` a second physical copy of `node`.
    pub(crate) fn alternate(mut self, alternate: u32, node: u32) -> Self {
        self.canonical.insert(alternate, node);
        if let Some(parent) = self.parents.get(&node).copied() {
            self.parents.insert(alternate, parent);
        }
        self
    }

    pub(crate) fn hit_slop(mut self, node: u32, slop: HitSlop) -> Self {
        self.slops.push((node, slop));
        self
    }

    pub(crate) fn detach(&mut self, node: u32) {
        self.detached.insert(node);
    }
}

impl ResponderTree for Tree {
    type Node = u32;
    type Scope = u8;

    fn parent(&self, node: u32) -> Option<u32> {
        self.parents.get(&node).copied()
    }

    fn canonical(&self, node: u32) -> u32 {
        self.canonical.get(&node).copied().unwrap_or(node)
    }

    fn responders(&self, node: u32) -> &[Responder<Self>] {
        self.responders.get(&node).map_or(&[], Vec::as_slice)
    }

    fn scope_of(&self, node: u32) -> Option<u8> {
        (!self.detached.contains(&node)).then_some(DOC)
    }

    fn element_from_point(&self, _scope: u8, pt: kurbo::Point) -> Option<u32> {
        self.slops
            .iter()
            .find(|(_, slop)| slop.extended().contains(pt))
            .map(|(node, _)| *node)
    }

    fn hit_slop(&self, node: u32) -> Option<HitSlop> {
        self.slops
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, slop)| *slop)
    }
}

/// Ordered record of everything the test observed.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// A listener recording `name@target`.
    pub(crate) fn listener(&self) -> Listener<u32> {
        let log = self.clone();
        Rc::new(move |e: &ResponderEvent<u32>| log.push(format!("{}@{}", e.name, e.target)))
    }

    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

pub(crate) type Action = Rc<dyn Fn(&mut DispatchContext<'_, Tree>, &mut u32)>;

/// Event types every probe declares.
pub(crate) const PROBE_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerDown),
    EventDescriptor::passive(EventType::PointerUp),
    EventDescriptor::active(EventType::PointerMove),
    EventDescriptor::active(EventType::KeyDown),
];

/// Root event types every probe declares.
pub(crate) const PROBE_ROOT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerUp),
    EventDescriptor::active(EventType::PointerMove),
];

/// What a probe does in each hook. The state counts invocations.
#[derive(Default, Clone)]
pub(crate) struct Script {
    pub(crate) on_event: Option<Action>,
    pub(crate) on_timer: Option<Action>,
    pub(crate) on_ownership_change: Option<Action>,
    pub(crate) on_unmount: Option<Action>,
}

impl Script {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_event(
        mut self,
        f: impl Fn(&mut DispatchContext<'_, Tree>, &mut u32) + 'static,
    ) -> Self {
        self.on_event = Some(Rc::new(f));
        self
    }

    pub(crate) fn on_timer(
        mut self,
        f: impl Fn(&mut DispatchContext<'_, Tree>, &mut u32) + 'static,
    ) -> Self {
        self.on_timer = Some(Rc::new(f));
        self
    }

    pub(crate) fn on_ownership_change(
        mut self,
        f: impl Fn(&mut DispatchContext<'_, Tree>, &mut u32) + 'static,
    ) -> Self {
        self.on_ownership_change = Some(Rc::new(f));
        self
    }

    pub(crate) fn on_unmount(
        mut self,
        f: impl Fn(&mut DispatchContext<'_, Tree>, &mut u32) + 'static,
    ) -> Self {
        self.on_unmount = Some(Rc::new(f));
        self
    }
}

/// A scriptable module. Distinct `ID`s are distinct modules.
pub(crate) struct Probe<const ID: u8>;

pub(crate) fn probe<const ID: u8>(script: Script) -> Responder<Tree> {
    Responder::new(Probe::<ID>, script)
}

/// The last timer a probe scheduled, shared with the test body.
pub(crate) type TimerSlot = Rc<RefCell<Option<TimerId>>>;

impl<const ID: u8> ResponderModule<Tree> for Probe<ID> {
    type Config = Script;
    type State = u32;

    const OBSERVES_OWNERSHIP: bool = true;

    fn name(&self) -> &'static str {
        "probe"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        PROBE_TYPES
    }

    fn root_event_types(&self) -> &'static [EventDescriptor] {
        PROBE_ROOT_TYPES
    }

    fn create_initial_state(&self, _config: &Script) -> u32 {
        0
    }

    fn handle_event(&self, cx: &mut DispatchContext<'_, Tree>, config: &Script, state: &mut u32) {
        *state += 1;
        if let Some(f) = &config.on_event {
            f(cx, state);
        }
    }

    fn handle_timer(
        &self,
        cx: &mut DispatchContext<'_, Tree>,
        config: &Script,
        state: &mut u32,
        _timer: TimerId,
    ) {
        if let Some(f) = &config.on_timer {
            f(cx, state);
        }
    }

    fn handle_ownership_change(
        &self,
        cx: &mut DispatchContext<'_, Tree>,
        config: &Script,
        state: &mut u32,
    ) {
        if let Some(f) = &config.on_ownership_change {
            f(cx, state);
        }
    }

    fn handle_unmount(&self, cx: &mut DispatchContext<'_, Tree>, config: &Script, state: &mut u32) {
        if let Some(f) = &config.on_unmount {
            f(cx, state);
        }
    }
}

/// A script that bubbles `name` about the current node into `log`.
pub(crate) fn bubbles(name: &'static str, log: &Log) -> Script {
    let listener = log.listener();
    Script::new().on_event(move |cx, _| {
        let event = cx.create_event(name, cx.current_node());
        cx.dispatch_bubbled_event(event, &listener);
    })
}

/// A script that captures `name` about the current node into `log`.
pub(crate) fn captures(name: &'static str, log: &Log) -> Script {
    let listener = log.listener();
    Script::new().on_event(move |cx, _| {
        let event = cx.create_event(name, cx.current_node());
        cx.dispatch_captured_event(event, &listener);
    })
}
