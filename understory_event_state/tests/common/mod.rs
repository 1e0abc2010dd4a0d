// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared host fixtures for the responder module tests.
//!
//! [`Host`] plays the role of a UI runtime: it owns an in-memory tree, applies
//! the listener changes the engine asks for, stamps native events with its
//! clock, and dispatches them as passive or active depending on what is
//! installed.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the fixtures."
)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use kurbo::{Insets, Point, Rect};
use understory_responder::event::ResponderEvent;
use understory_responder::hit_slop::HitSlop;
use understory_responder::listening::{ListenerAction, ListenerChange};
use understory_responder::manager::{DispatchOutcome, EventManager};
use understory_responder::module::Responder;
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventType, NativeEvent};

pub(crate) const DOC: u8 = 0;

#[derive(Default)]
struct Node {
    parent: Option<u32>,
    responders: Vec<Responder<TestTree>>,
    bounds: Option<Rect>,
    hit_slop: Option<Insets>,
    anchor: bool,
}

/// An in-memory tree of `u32` nodes in a single document. Node 0 is the root.
pub(crate) struct TestTree {
    nodes: BTreeMap<u32, Node>,
    canonical: HashMap<u32, u32>,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub(crate) fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(0, Node::default());
        Self {
            nodes,
            canonical: HashMap::new(),
        }
    }

    pub(crate) fn child(mut self, node: u32, parent: u32) -> Self {
        self.nodes.insert(
            node,
            Node {
                parent: Some(parent),
                ..Node::default()
            },
        );
        self
    }

    pub(crate) fn attach(mut self, node: u32, responder: Responder<Self>) -> Self {
        self.nodes.entry(node).or_default().responders.push(responder);
        self
    }

    pub(crate) fn bounds(mut self, node: u32, bounds: Rect) -> Self {
        self.nodes.entry(node).or_default().bounds = Some(bounds);
        self
    }

    /// Requires [`bounds`](Self::bounds) on the same node.
    pub(crate) fn hit_slop(mut self, node: u32, insets: Insets) -> Self {
        self.nodes.entry(node).or_default().hit_slop = Some(insets);
        self
    }

    pub(crate) fn anchor(mut self, node: u32) -> Self {
        self.nodes.entry(node).or_default().anchor = true;
        self
    }

    /// Make `alternate` a second physical copy of `node`.
    pub(crate) fn alternate(mut self, alternate: u32, node: u32) -> Self {
        let parent = self.nodes.get(&node).and_then(|n| n.parent);
        self.nodes.insert(
            alternate,
            Node {
                parent,
                ..Node::default()
            },
        );
        self.canonical.insert(alternate, node);
        self
    }
}

impl ResponderTree for TestTree {
    type Node = u32;
    type Scope = u8;

    fn parent(&self, node: u32) -> Option<u32> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn canonical(&self, node: u32) -> u32 {
        self.canonical.get(&node).copied().unwrap_or(node)
    }

    fn responders(&self, node: u32) -> &[Responder<Self>] {
        self.nodes.get(&node).map_or(&[], |n| n.responders.as_slice())
    }

    fn scope_of(&self, node: u32) -> Option<u8> {
        self.nodes.contains_key(&node).then_some(DOC)
    }

    /// Deepest-declared (highest id) node whose hit target contains `pt`.
    fn element_from_point(&self, _scope: u8, pt: Point) -> Option<u32> {
        self.nodes.iter().rev().find_map(|(id, node)| {
            let bounds = node.bounds?;
            let target = bounds + node.hit_slop.unwrap_or(Insets::ZERO);
            target.contains(pt).then_some(*id)
        })
    }

    fn hit_slop(&self, node: u32) -> Option<HitSlop> {
        let node = self.nodes.get(&node)?;
        Some(HitSlop::new(node.bounds?, node.hit_slop?))
    }

    fn bounds(&self, node: u32) -> Option<Rect> {
        self.nodes.get(&node)?.bounds
    }

    fn is_anchor(&self, node: u32) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.anchor)
    }
}

/// Ordered record of synthetic events and change callbacks.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
    events: Rc<RefCell<Vec<ResponderEvent<u32>>>>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A full-event callback recording the event name.
    pub(crate) fn event(&self) -> impl Fn(&ResponderEvent<u32>) + 'static {
        let this = self.clone();
        move |e| {
            this.entries.borrow_mut().push(e.name.to_owned());
            this.events.borrow_mut().push(e.clone());
        }
    }

    /// A full-event callback recording `name@target`.
    pub(crate) fn targeted(&self) -> impl Fn(&ResponderEvent<u32>) + 'static {
        let this = self.clone();
        move |e| {
            this.entries
                .borrow_mut()
                .push(format!("{}@{}", e.name, e.target));
            this.events.borrow_mut().push(e.clone());
        }
    }

    /// A change callback recording `name(value)`.
    pub(crate) fn change(&self, name: &'static str) -> impl Fn(bool) + 'static {
        let this = self.clone();
        move |value| this.entries.borrow_mut().push(format!("{name}({value})"))
    }

    /// Drain the recorded names.
    pub(crate) fn take(&self) -> Vec<String> {
        self.events.borrow_mut().clear();
        core::mem::take(&mut *self.entries.borrow_mut())
    }

    /// Full events recorded so far, with their data.
    pub(crate) fn events(&self) -> Vec<ResponderEvent<u32>> {
        self.events.borrow().clone()
    }
}

/// A host runtime driving an [`EventManager`].
pub(crate) struct Host {
    pub(crate) tree: TestTree,
    pub(crate) manager: EventManager<TestTree>,
    // (event type, capture) -> installed listener is passive
    installed: HashMap<(EventType, bool), bool>,
    pub(crate) now: u64,
}

impl Host {
    /// Mount every node of `tree`.
    pub(crate) fn new(tree: TestTree) -> Self {
        let mut manager = EventManager::new();
        let ids: Vec<u32> = tree.nodes.keys().copied().collect();
        for id in ids {
            manager.mount(&tree, id);
        }
        let mut host = Self {
            tree,
            manager,
            installed: HashMap::new(),
            now: 0,
        };
        host.apply_listener_changes();
        host
    }

    fn apply_listener_changes(&mut self) {
        for ListenerChange {
            action,
            scope,
            event_type,
            capture,
            passive,
        } in self.manager.take_listener_changes()
        {
            assert_eq!(scope, DOC);
            match action {
                ListenerAction::Install => {
                    self.installed.insert((event_type, capture), passive);
                }
                ListenerAction::Remove => {
                    assert_eq!(self.installed.remove(&(event_type, capture)), Some(passive));
                }
            }
        }
    }

    /// Passiveness of the installed listener for `event_type`, if any.
    pub(crate) fn listener(&self, event_type: EventType) -> Option<bool> {
        self.installed
            .get(&(event_type, false))
            .or_else(|| self.installed.get(&(event_type, true)))
            .copied()
    }

    /// Dispatch `event` stamped with the current time.
    ///
    /// The dispatch is active if any active listener for the type is installed.
    pub(crate) fn send(&mut self, event: NativeEvent<u32>) -> DispatchOutcome {
        let passive = [false, true].iter().all(|capture| {
            self.installed
                .get(&(event.event_type, *capture))
                .is_none_or(|passive| *passive)
        });
        let event = event.with_time_stamp(self.now);
        let outcome = self.manager.handle_top_level_event(&self.tree, &event, passive);
        self.apply_listener_changes();
        outcome
    }

    /// Advance the clock by `ms` and fire due timers.
    pub(crate) fn advance(&mut self, ms: u64) -> DispatchOutcome {
        self.now += ms;
        let outcome = self.manager.fire_timers(&self.tree, self.now);
        self.apply_listener_changes();
        outcome
    }

    pub(crate) fn unmount(&mut self, node: u32) -> DispatchOutcome {
        let outcome = self.manager.unmount(&self.tree, node);
        self.apply_listener_changes();
        outcome
    }
}

pub(crate) fn at(event_type: EventType, target: u32, x: f64, y: f64) -> NativeEvent<u32> {
    NativeEvent::new(event_type, target).at(Point::new(x, y))
}

pub(crate) fn touch(event_type: EventType, target: u32, id: u64, x: f64, y: f64) -> NativeEvent<u32> {
    NativeEvent::new(event_type, target).with_touch(id, Point::new(x, y))
}
