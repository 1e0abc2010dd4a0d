// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node responder state storage.
//!
//! Every (node, module) pair owns exactly one state record. Records are created
//! lazily the first time the pair handles an event and live until the host
//! tears the node down with [`StateArena::remove_node`].

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::module::ModuleId;

/// Arena of type-erased responder states keyed by (node, module).
pub struct StateArena<K> {
    slots: HashMap<(K, ModuleId), Box<dyn Any>>,
}

impl<K> Default for StateArena<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for StateArena<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateArena")
            .field("len", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> StateArena<K> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the state for `(node, module)`, creating it with `init` if absent.
    pub fn get_or_insert_with(
        &mut self,
        node: K,
        module: ModuleId,
        init: impl FnOnce() -> Box<dyn Any>,
    ) -> &mut dyn Any {
        self.slots.entry((node, module)).or_insert_with(init).as_mut()
    }

    /// Fetch the state for `(node, module)` if it exists.
    pub fn get_mut(&mut self, node: K, module: ModuleId) -> Option<&mut dyn Any> {
        self.slots.get_mut(&(node, module)).map(|s| s.as_mut())
    }

    /// Typed read access, mainly for inspection and tests.
    pub fn get<S: 'static>(&self, node: K, module: ModuleId) -> Option<&S> {
        self.slots.get(&(node, module))?.downcast_ref()
    }

    /// Returns `true` if a state exists for `(node, module)`.
    pub fn contains(&self, node: K, module: ModuleId) -> bool {
        self.slots.contains_key(&(node, module))
    }

    /// Drop every state owned by `node`, returning how many were removed.
    pub fn remove_node(&mut self, node: K) -> usize {
        let before = self.slots.len();
        self.slots.retain(|(n, _), _| *n != node);
        before - self.slots.len()
    }

    /// Number of live state records.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the arena holds no state.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
