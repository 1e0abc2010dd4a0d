// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder modules and their type-erased attachment form.
//!
//! A [`ResponderModule`] is a stateless state machine: it declares the native
//! event types it wants, creates a fresh state record per node, and turns
//! native events into synthetic ones through a [`DispatchContext`]. Component
//! authors attach a module to a node as a [`Responder`], which binds the module
//! to the node's configuration and erases both types so that nodes can carry
//! heterogeneous lists of responders.
//!
//! ```
//! use understory_responder::context::DispatchContext;
//! use understory_responder::event::Listener;
//! use understory_responder::module::{Responder, ResponderModule};
//! use understory_responder::tree::ResponderTree;
//! use understory_responder::types::{EventDescriptor, EventType};
//!
//! /// Emits `tap` for every primary pointer release.
//! struct Tap;
//!
//! impl<T: ResponderTree> ResponderModule<T> for Tap {
//!     type Config = Listener<T::Node>;
//!     type State = u32;
//!
//!     fn name(&self) -> &'static str {
//!         "tap"
//!     }
//!
//!     fn target_event_types(&self) -> &'static [EventDescriptor] {
//!         const TYPES: &[EventDescriptor] = &[EventDescriptor::passive(EventType::PointerUp)];
//!         TYPES
//!     }
//!
//!     fn create_initial_state(&self, _: &Self::Config) -> u32 {
//!         0
//!     }
//!
//!     fn handle_event(&self, cx: &mut DispatchContext<'_, T>, on_tap: &Self::Config, taps: &mut u32) {
//!         *taps += 1;
//!         let event = cx.create_event("tap", cx.current_node());
//!         cx.dispatch_bubbled_event(event, on_tap);
//!     }
//! }
//! # fn attach<T: ResponderTree>(on_tap: Listener<T::Node>) -> Responder<T> {
//! Responder::new(Tap, on_tap)
//! # }
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use crate::context::DispatchContext;
use crate::tree::ResponderTree;
use crate::types::{EventDescriptor, TimerId};

/// Identity of a responder module: the `TypeId` of its implementing type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId(TypeId);

impl ModuleId {
    /// The identity of module type `M`.
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self(TypeId::of::<M>())
    }
}

/// A pluggable interaction state machine.
pub trait ResponderModule<T: ResponderTree>: 'static {
    /// Per-node configuration, read-only to the module.
    type Config: 'static;
    /// Per-node mutable state, created once per (node, module) pair.
    type State: 'static;

    /// Set to receive [`handle_ownership_change`](Self::handle_ownership_change).
    const OBSERVES_OWNERSHIP: bool = false;

    /// Module name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Native event types delivered when the target lies within the node.
    fn target_event_types(&self) -> &'static [EventDescriptor];

    /// Native event types the module may register at the root.
    ///
    /// Only used to validate [`DispatchContext::remove_root_event_types`].
    fn root_event_types(&self) -> &'static [EventDescriptor] {
        &[]
    }

    /// Create the state for a node seeing its first matching event.
    fn create_initial_state(&self, config: &Self::Config) -> Self::State;

    /// Handle one native event.
    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut Self::State,
    );

    /// Handle a timer scheduled with [`DispatchContext::set_timeout`].
    fn handle_timer(
        &self,
        _cx: &mut DispatchContext<'_, T>,
        _config: &Self::Config,
        _state: &mut Self::State,
        _timer: TimerId,
    ) {
    }

    /// Called after a dispatch in which ownership of any scope changed.
    fn handle_ownership_change(
        &self,
        _cx: &mut DispatchContext<'_, T>,
        _config: &Self::Config,
        _state: &mut Self::State,
    ) {
    }

    /// Called before the node's state is torn down.
    fn handle_unmount(
        &self,
        _cx: &mut DispatchContext<'_, T>,
        _config: &Self::Config,
        _state: &mut Self::State,
    ) {
    }
}

/// Which module entry point to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    Event,
    Timer(TimerId),
    OwnershipChange,
    Unmount,
}

trait ErasedResponder<T: ResponderTree> {
    fn module_id(&self) -> ModuleId;
    fn name(&self) -> &'static str;
    fn target_event_types(&self) -> &'static [EventDescriptor];
    fn root_event_types(&self) -> &'static [EventDescriptor];
    fn observes_ownership(&self) -> bool;
    fn create_state(&self) -> Box<dyn Any>;
    fn run(&self, hook: Hook, cx: &mut DispatchContext<'_, T>, state: &mut dyn Any);
}

struct Bound<T: ResponderTree, M: ResponderModule<T>> {
    module: M,
    config: M::Config,
    _tree: PhantomData<fn(&T)>,
}

impl<T: ResponderTree, M: ResponderModule<T>> ErasedResponder<T> for Bound<T, M> {
    fn module_id(&self) -> ModuleId {
        ModuleId::of::<M>()
    }

    fn name(&self) -> &'static str {
        self.module.name()
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        self.module.target_event_types()
    }

    fn root_event_types(&self) -> &'static [EventDescriptor] {
        self.module.root_event_types()
    }

    fn observes_ownership(&self) -> bool {
        M::OBSERVES_OWNERSHIP
    }

    fn create_state(&self) -> Box<dyn Any> {
        Box::new(self.module.create_initial_state(&self.config))
    }

    fn run(&self, hook: Hook, cx: &mut DispatchContext<'_, T>, state: &mut dyn Any) {
        // States are keyed by `ModuleId::of::<M>()`, so this only fails if a
        // host attaches two responders of the same module to one node.
        let Some(state) = state.downcast_mut::<M::State>() else {
            return;
        };
        match hook {
            Hook::Event => self.module.handle_event(cx, &self.config, state),
            Hook::Timer(id) => self.module.handle_timer(cx, &self.config, state, id),
            Hook::OwnershipChange => self.module.handle_ownership_change(cx, &self.config, state),
            Hook::Unmount => self.module.handle_unmount(cx, &self.config, state),
        }
    }
}

/// A responder module bound to one node's configuration.
///
/// Cheap to clone; clones share the module and configuration.
pub struct Responder<T: ResponderTree>(Rc<dyn ErasedResponder<T>>);

impl<T: ResponderTree> Responder<T> {
    /// Bind `module` to `config`.
    pub fn new<M: ResponderModule<T>>(module: M, config: M::Config) -> Self {
        Self(Rc::new(Bound {
            module,
            config,
            _tree: PhantomData,
        }))
    }

    /// Identity of the bound module.
    pub fn module_id(&self) -> ModuleId {
        self.0.module_id()
    }

    /// Name of the bound module.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// The module's target event declaration.
    pub fn target_event_types(&self) -> &'static [EventDescriptor] {
        self.0.target_event_types()
    }

    /// The module's root event declaration.
    pub fn root_event_types(&self) -> &'static [EventDescriptor] {
        self.0.root_event_types()
    }

    /// Returns `true` if the module observes ownership changes.
    pub fn observes_ownership(&self) -> bool {
        self.0.observes_ownership()
    }

    pub(crate) fn create_state(&self) -> Box<dyn Any> {
        self.0.create_state()
    }

    pub(crate) fn run(&self, hook: Hook, cx: &mut DispatchContext<'_, T>, state: &mut dyn Any) {
        self.0.run(hook, cx, state);
    }
}

impl<T: ResponderTree> Clone for Responder<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ResponderTree> fmt::Debug for Responder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Responder").field(&self.name()).finish()
    }
}
