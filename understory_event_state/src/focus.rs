// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus responder.
//!
//! Reports focus entering and leaving the node's subtree: `focus` and
//! `focuschange(true)` when focus arrives, `blur` and `focuschange(false)`
//! when it leaves. Focus moving between the node's own descendants (the
//! related target is still inside) is not reported.
//!
//! Hosts may deliver both the capture-phase `focus`/`blur` and the bubbling
//! `focusin`/`focusout` for one focus move; each transition is reported once.

use core::fmt;

use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventDescriptor, EventType, NativeEvent};

use crate::callback::{ChangeCallback, Emit, listener};

const TARGET_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::Focus).in_capture(),
    EventDescriptor::passive(EventType::Blur).in_capture(),
    EventDescriptor::passive(EventType::FocusIn),
    EventDescriptor::passive(EventType::FocusOut),
];

/// Configuration of a focus responder.
pub struct FocusConfig<K> {
    /// Ignore all focus changes.
    pub disabled: bool,
    /// Called when focus enters the node.
    pub on_focus: Option<Listener<K>>,
    /// Called when focus leaves the node.
    pub on_blur: Option<Listener<K>>,
    /// Called with the new focus state.
    pub on_focus_change: Option<ChangeCallback>,
}

impl<K> Default for FocusConfig<K> {
    fn default() -> Self {
        Self {
            disabled: false,
            on_focus: None,
            on_blur: None,
            on_focus_change: None,
        }
    }
}

impl<K> fmt::Debug for FocusConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusConfig")
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl<K> FocusConfig<K> {
    /// A configuration with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`disabled`](Self::disabled).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set [`on_focus`](Self::on_focus).
    #[must_use]
    pub fn on_focus(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_focus = Some(listener(f));
        self
    }

    /// Set [`on_blur`](Self::on_blur).
    #[must_use]
    pub fn on_blur(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_blur = Some(listener(f));
        self
    }

    /// Set [`on_focus_change`](Self::on_focus_change).
    #[must_use]
    pub fn on_focus_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_focus_change = Some(alloc::rc::Rc::new(f));
        self
    }
}

/// Per-node focus state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
    /// Focus is inside the node.
    pub is_focused: bool,
}

/// The focus responder module.
#[derive(Copy, Clone, Debug, Default)]
pub struct Focus;

/// Attach a focus responder with `config`.
pub fn focus<T: ResponderTree>(config: FocusConfig<T::Node>) -> Responder<T> {
    Responder::new(Focus, config)
}

impl<T: ResponderTree> ResponderModule<T> for Focus {
    type Config = FocusConfig<T::Node>;
    type State = FocusState;

    fn name(&self) -> &'static str {
        "focus"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        TARGET_EVENT_TYPES
    }

    fn create_initial_state(&self, _config: &Self::Config) -> FocusState {
        FocusState::default()
    }

    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut FocusState,
    ) {
        let Some(event) = cx.native_event() else {
            return;
        };
        if config.disabled || is_related_within(cx, event) {
            return;
        }
        let focused = match event.event_type {
            EventType::Focus | EventType::FocusIn => true,
            EventType::Blur | EventType::FocusOut => false,
            _ => return,
        };
        if state.is_focused == focused {
            return;
        }
        state.is_focused = focused;
        let emit = Emit::new(cx.current_node(), event.pointer_type());
        let (name, callback) = if focused {
            ("focus", config.on_focus.as_ref())
        } else {
            ("blur", config.on_blur.as_ref())
        };
        emit.bubble(cx, name, callback, EventData::None);
        emit.change(cx, "focuschange", config.on_focus_change.as_ref(), focused);
    }
}

fn is_related_within<T: ResponderTree>(
    cx: &DispatchContext<'_, T>,
    event: &NativeEvent<T::Node>,
) -> bool {
    event
        .related_target
        .is_some_and(|related| cx.is_target_within_event_component(related))
}
