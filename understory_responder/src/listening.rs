// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bookkeeping for the native listeners the host must install.
//!
//! Each scope (document) needs at most one native listener per event type and
//! phase. An active listener can do everything a passive one can, so:
//!
//! - Nothing installed: install with the requested passiveness.
//! - Passive installed, active requested: upgrade by removing the passive
//!   listener and installing an active one.
//! - Active installed: nothing to do.
//!
//! The table only records decisions; the host applies the resulting
//! [`ListenerChange`]s.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::types::{EventDescriptor, EventType};

/// What the host should do with a native listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerAction {
    /// Install a native listener.
    Install,
    /// Remove a previously installed native listener.
    Remove,
}

/// A request for the host to install or remove one native listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerChange<S> {
    /// Install or remove.
    pub action: ListenerAction,
    /// Scope (document) the listener lives on.
    pub scope: S,
    /// Native event type.
    pub event_type: EventType,
    /// Capture-phase listener.
    pub capture: bool,
    /// Passive listener.
    pub passive: bool,
}

/// Per-scope record of installed native listeners.
#[derive(Clone, Debug)]
pub struct ListeningTable<S> {
    // Value is `true` when the installed listener is passive.
    installed: HashMap<(S, EventType, bool), bool>,
}

impl<S> Default for ListeningTable<S> {
    fn default() -> Self {
        Self {
            installed: HashMap::new(),
        }
    }
}

impl<S: Copy + Eq + Hash> ListeningTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a listener satisfying `descriptor` exists on `scope`.
    ///
    /// Appends the required changes, if any, to `out`.
    pub fn ensure(
        &mut self,
        scope: S,
        descriptor: EventDescriptor,
        out: &mut Vec<ListenerChange<S>>,
    ) {
        let key = (scope, descriptor.event_type, descriptor.capture);
        let change = |action, passive| ListenerChange {
            action,
            scope,
            event_type: descriptor.event_type,
            capture: descriptor.capture,
            passive,
        };
        match self.installed.get(&key).copied() {
            None => {
                self.installed.insert(key, descriptor.passive);
                out.push(change(ListenerAction::Install, descriptor.passive));
            }
            Some(true) if !descriptor.passive => {
                self.installed.insert(key, false);
                out.push(change(ListenerAction::Remove, true));
                out.push(change(ListenerAction::Install, false));
            }
            Some(_) => {}
        }
    }

    /// The passiveness of the installed listener, if any.
    pub fn installed(&self, scope: S, event_type: EventType, capture: bool) -> Option<bool> {
        self.installed.get(&(scope, event_type, capture)).copied()
    }
}
