// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback types shared by the responder modules, and emission helpers.
//!
//! Full-event callbacks are [`Listener`]s and receive the synthetic
//! [`ResponderEvent`], whose `target` identifies the node the change is about.
//! Change callbacks only receive the new boolean value.

use alloc::rc::Rc;

use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::tree::ResponderTree;
use understory_responder::types::PointerType;

/// Receives the new value of a boolean interaction state (`presschange`, …).
pub type ChangeCallback = Rc<dyn Fn(bool)>;

/// Decides whether a gesture should claim exclusive ownership.
pub type ClaimCallback<K> = Rc<dyn Fn(&ResponderEvent<K>) -> bool>;

/// Wrap a closure as a [`Listener`].
pub fn listener<K>(f: impl Fn(&ResponderEvent<K>) + 'static) -> Listener<K> {
    Rc::new(f)
}

/// Adapt a change callback into a listener reporting `value`.
pub(crate) fn change_listener<K: 'static>(callback: &ChangeCallback, value: bool) -> Listener<K> {
    let callback = callback.clone();
    Rc::new(move |_: &ResponderEvent<K>| callback(value))
}

/// Everything the modules need to build one synthetic event.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Emit<K> {
    pub(crate) target: K,
    pub(crate) pointer_type: PointerType,
}

impl<K: Copy + 'static> Emit<K> {
    pub(crate) fn new(target: K, pointer_type: PointerType) -> Self {
        Self {
            target,
            pointer_type,
        }
    }

    fn event<T: ResponderTree<Node = K>>(
        &self,
        cx: &DispatchContext<'_, T>,
        name: &'static str,
        data: EventData,
    ) -> ResponderEvent<K> {
        cx.create_event(name, self.target)
            .with_pointer_type(self.pointer_type)
            .with_data(data)
    }

    /// Queue `name` for the bubble phase if `listener` is configured.
    pub(crate) fn bubble<T: ResponderTree<Node = K>>(
        &self,
        cx: &mut DispatchContext<'_, T>,
        name: &'static str,
        listener: Option<&Listener<K>>,
        data: EventData,
    ) -> bool {
        let Some(listener) = listener else {
            return false;
        };
        let event = self.event(cx, name, data);
        cx.dispatch_bubbled_event(event, listener);
        true
    }

    /// Queue a change event for the bubble phase if `callback` is configured.
    pub(crate) fn change<T: ResponderTree<Node = K>>(
        &self,
        cx: &mut DispatchContext<'_, T>,
        name: &'static str,
        callback: Option<&ChangeCallback>,
        value: bool,
    ) {
        if let Some(callback) = callback {
            let event = self.event(cx, name, EventData::None);
            cx.dispatch_bubbled_event(event, &change_listener(callback, value));
        }
    }

    /// Run a change callback at once, outside the batch.
    pub(crate) fn change_now<T: ResponderTree<Node = K>>(
        &self,
        cx: &mut DispatchContext<'_, T>,
        name: &'static str,
        callback: Option<&ChangeCallback>,
        value: bool,
    ) {
        if let Some(callback) = callback {
            let event = self.event(cx, name, EventData::None);
            cx.dispatch_immediate_event(event, &change_listener(callback, value));
        }
    }

    /// Ask `claim` whether to take ownership. Absent callbacks answer `false`.
    pub(crate) fn should_claim<T: ResponderTree<Node = K>>(
        &self,
        cx: &DispatchContext<'_, T>,
        name: &'static str,
        claim: Option<&ClaimCallback<K>>,
    ) -> bool {
        claim.is_some_and(|claim| claim(&self.event(cx, name, EventData::None)))
    }
}
