// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_responder --heading-base-level=0

//! Understory Responder: a deterministic, `no_std` event-responder engine.
//!
//! ## Overview
//!
//! This crate turns low-level native input events into high-level synthetic
//! ones (press, hover, drag, …) by running them through pluggable state
//! machines attached to the nodes of a host tree.
//! It does not own the tree and it does not perform hit testing.
//! The host describes its tree through [`ResponderTree`](tree::ResponderTree)
//! and feeds native events to an [`EventManager`](manager::EventManager).
//!
//! ## Responders
//!
//! A [`ResponderModule`](module::ResponderModule) declares the native event
//! types it wants, creates a state record per node, and handles events through
//! a [`DispatchContext`](context::DispatchContext).
//! Nodes carry modules bound to their configuration as
//! [`Responder`](module::Responder)s. Exactly one state record exists per
//! (node, module) pair; it is created lazily and torn down by
//! [`EventManager::unmount`](manager::EventManager::unmount).
//!
//! ## Dispatch
//!
//! For each native event the manager walks from the target outward, invokes
//! every responder whose module declares the event type, then invokes every
//! responder registered for the type at the root. Responders queue synthetic
//! events instead of running listeners; once the walk is over the queue runs as
//! one batch, capture-phase events outermost first, then bubble-phase events
//! innermost first (see [`dispatcher`]).
//!
//! ## Ownership
//!
//! A scope (document) has at most one owner at a time. Responders claim it to
//! run exclusive gestures and query it to defer to gestures in progress; see
//! [`ownership`].
//!
//! ## Root events
//!
//! A gesture that must keep tracking the pointer after it leaves its node
//! registers root event types. Additions apply at once, removals after the
//! walk; see [`root_events`].
//!
//! ## Timers and listeners
//!
//! The engine schedules no host work itself. Responders set timers on the
//! context and the host fires them through
//! [`EventManager::fire_timers`](manager::EventManager::fire_timers).
//! Native listeners the host must install are drained with
//! [`EventManager::take_listener_changes`](manager::EventManager::take_listener_changes).
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_responder::context::DispatchContext;
//! use understory_responder::event::{Listener, ResponderEvent};
//! use understory_responder::manager::EventManager;
//! use understory_responder::module::{Responder, ResponderModule};
//! use understory_responder::tree::ResponderTree;
//! use understory_responder::types::{EventDescriptor, EventType, NativeEvent};
//!
//! struct Tap;
//!
//! impl<T: ResponderTree> ResponderModule<T> for Tap {
//!     type Config = Listener<T::Node>;
//!     type State = ();
//!     fn name(&self) -> &'static str {
//!         "tap"
//!     }
//!     fn target_event_types(&self) -> &'static [EventDescriptor] {
//!         const TYPES: &[EventDescriptor] = &[EventDescriptor::passive(EventType::PointerUp)];
//!         TYPES
//!     }
//!     fn create_initial_state(&self, _: &Self::Config) {}
//!     fn handle_event(&self, cx: &mut DispatchContext<'_, T>, on_tap: &Self::Config, _: &mut ()) {
//!         let event = cx.create_event("tap", cx.current_node());
//!         cx.dispatch_bubbled_event(event, on_tap);
//!     }
//! }
//!
//! // Node 0 is the root; node 1 is its child and carries the responder.
//! struct Tree(Vec<Responder<Tree>>);
//!
//! impl ResponderTree for Tree {
//!     type Node = u32;
//!     type Scope = ();
//!     fn parent(&self, node: u32) -> Option<u32> {
//!         (node > 0).then(|| node - 1)
//!     }
//!     fn responders(&self, node: u32) -> &[Responder<Self>] {
//!         if node == 1 { &self.0 } else { &[] }
//!     }
//!     fn scope_of(&self, _: u32) -> Option<()> {
//!         Some(())
//!     }
//! }
//!
//! let taps = Rc::new(Cell::new(0));
//! let counter = taps.clone();
//! let on_tap: Listener<u32> = Rc::new(move |_: &ResponderEvent<u32>| counter.set(counter.get() + 1));
//! let tree = Tree(vec![Responder::new(Tap, on_tap)]);
//!
//! let mut manager = EventManager::new();
//! manager.handle_top_level_event(&tree, &NativeEvent::new(EventType::PointerUp, 2), true);
//! manager.handle_top_level_event(&tree, &NativeEvent::new(EventType::PointerUp, 0), true);
//! assert_eq!(taps.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod context;
pub mod dispatcher;
pub mod event;
pub mod hit_slop;
pub mod listening;
pub mod manager;
pub mod module;
pub mod ownership;
pub mod root_events;
pub mod state;
pub mod timers;
pub mod tree;
pub mod types;
