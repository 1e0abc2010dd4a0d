// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover responder.
//!
//! Tracks whether a hovering pointer is over the node:
//!
//! - Pointer over (not owned, not in a hit-slop band): `hoverin`, `hoverchange(true)`.
//! - Pointer out: `hoverout`, `hoverchange(false)`.
//! - Pointer move while hovered: `hovermove`, or a demotion (`hoverout`,
//!   `hoverchange(false)`) when the pointer enters a hit-slop band. Leaving the
//!   band again re-fires `hoverin`.
//!
//! Over and out events whose related target stays inside the node are moves
//! between the node's own children and are ignored.
//!
//! Hover never fires for touch: a touch start (or a touch pointer) marks the
//! node as touched and suppresses hover until the next out or cancel.

use core::fmt;

use kurbo::Point;
use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventDescriptor, EventType, NativeEvent, PointerType};

use crate::callback::{ChangeCallback, Emit, listener};

const TARGET_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerOver),
    EventDescriptor::passive(EventType::PointerOut),
    EventDescriptor::passive(EventType::PointerMove),
    EventDescriptor::passive(EventType::PointerCancel),
    EventDescriptor::passive(EventType::MouseOver),
    EventDescriptor::passive(EventType::MouseOut),
    EventDescriptor::passive(EventType::MouseMove),
    EventDescriptor::passive(EventType::TouchStart),
];

/// Configuration of a hover responder.
pub struct HoverConfig<K> {
    /// Ignore all interaction; an active hover ends on the next event.
    pub disabled: bool,
    /// Called when hover starts.
    pub on_hover_in: Option<Listener<K>>,
    /// Called when hover ends.
    pub on_hover_out: Option<Listener<K>>,
    /// Called for pointer moves while hovered, with the pointer position.
    pub on_hover_move: Option<Listener<K>>,
    /// Called with the new hover state.
    pub on_hover_change: Option<ChangeCallback>,
}

impl<K> Default for HoverConfig<K> {
    fn default() -> Self {
        Self {
            disabled: false,
            on_hover_in: None,
            on_hover_out: None,
            on_hover_move: None,
            on_hover_change: None,
        }
    }
}

impl<K> fmt::Debug for HoverConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverConfig")
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl<K> HoverConfig<K> {
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

    /// Set [`on_hover_in`](Self::on_hover_in).
    #[must_use]
    pub fn on_hover_in(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_hover_in = Some(listener(f));
        self
    }

    /// Set [`on_hover_out`](Self::on_hover_out).
    #[must_use]
    pub fn on_hover_out(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_hover_out = Some(listener(f));
        self
    }

    /// Set [`on_hover_move`](Self::on_hover_move).
    #[must_use]
    pub fn on_hover_move(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_hover_move = Some(listener(f));
        self
    }

    /// Set [`on_hover_change`](Self::on_hover_change).
    #[must_use]
    pub fn on_hover_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_hover_change = Some(alloc::rc::Rc::new(f));
        self
    }
}

/// Per-node hover state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    /// The pointer hovers the node.
    pub is_hovered: bool,
    /// The pointer sits in a hit-slop band next to the node.
    pub is_in_hit_slop: bool,
    /// A touch started on the node; hover is suppressed until reset.
    pub is_touched: bool,
}

/// The hover responder module.
#[derive(Copy, Clone, Debug, Default)]
pub struct Hover;

/// Attach a hover responder with `config`.
pub fn hover<T: ResponderTree>(config: HoverConfig<T::Node>) -> Responder<T> {
    Responder::new(Hover, config)
}

impl<T: ResponderTree> ResponderModule<T> for Hover {
    type Config = HoverConfig<T::Node>;
    type State = HoverState;

    fn name(&self) -> &'static str {
        "hover"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        TARGET_EVENT_TYPES
    }

    fn create_initial_state(&self, _config: &Self::Config) -> HoverState {
        HoverState::default()
    }

    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut HoverState,
    ) {
        let Some(event) = cx.native_event() else {
            return;
        };
        if config.disabled {
            if state.is_hovered {
                end_hover(cx, config, state);
            }
            return;
        }
        if event.event_type == EventType::TouchStart
            || event.pointer_type() == PointerType::Touch
        {
            // Touch pointers only toggle suppression.
            state.is_touched = !matches!(
                event.event_type,
                EventType::PointerOut | EventType::PointerCancel
            );
            return;
        }
        match event.event_type {
            EventType::PointerOver | EventType::MouseOver => {
                if state.is_touched || is_related_within(cx, event) {
                    return;
                }
                if cx.is_position_within_hit_slop(event.position) {
                    state.is_in_hit_slop = true;
                } else if !state.is_hovered && !cx.is_target_owned(cx.current_node()) {
                    start_hover(cx, config, state);
                }
            }
            EventType::PointerOut | EventType::MouseOut => {
                if is_related_within(cx, event) {
                    return;
                }
                if state.is_hovered {
                    end_hover(cx, config, state);
                }
                state.is_touched = false;
                state.is_in_hit_slop = false;
            }
            EventType::PointerCancel => {
                if state.is_hovered {
                    end_hover(cx, config, state);
                }
                state.is_touched = false;
                state.is_in_hit_slop = false;
            }
            EventType::PointerMove | EventType::MouseMove => {
                if !state.is_touched {
                    track_move(cx, config, state, event.position);
                }
            }
            _ => {}
        }
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

fn emitter<T: ResponderTree>(cx: &DispatchContext<'_, T>) -> Emit<T::Node> {
    let pointer_type = cx
        .native_event()
        .map_or(PointerType::Mouse, NativeEvent::pointer_type);
    Emit::new(cx.current_node(), pointer_type)
}

fn start_hover<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &HoverConfig<T::Node>,
    state: &mut HoverState,
) {
    state.is_hovered = true;
    let emit = emitter(cx);
    emit.bubble(cx, "hoverin", config.on_hover_in.as_ref(), EventData::None);
    emit.change(cx, "hoverchange", config.on_hover_change.as_ref(), true);
}

fn end_hover<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &HoverConfig<T::Node>,
    state: &mut HoverState,
) {
    state.is_hovered = false;
    let emit = emitter(cx);
    emit.bubble(cx, "hoverout", config.on_hover_out.as_ref(), EventData::None);
    emit.change(cx, "hoverchange", config.on_hover_change.as_ref(), false);
}

fn track_move<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &HoverConfig<T::Node>,
    state: &mut HoverState,
    position: Point,
) {
    let in_slop = cx.is_position_within_hit_slop(position);
    if state.is_hovered {
        if in_slop {
            state.is_in_hit_slop = true;
            end_hover(cx, config, state);
        } else {
            emitter(cx).bubble(
                cx,
                "hovermove",
                config.on_hover_move.as_ref(),
                EventData::Position(position),
            );
        }
    } else if state.is_in_hit_slop && !in_slop {
        state.is_in_hit_slop = false;
        if !cx.is_target_owned(cx.current_node()) {
            start_hover(cx, config, state);
        }
    }
}
