// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag responder.
//!
//! ## Usage
//!
//! 1) A pointer down on the node records the start position and registers
//!    root-level move, up and cancel listeners, so tracking continues after the
//!    pointer leaves the node.
//! 2) The first non-passive move with actual displacement promotes the gesture
//!    to dragging: `dragstart`, `dragchange(true)`. If
//!    [`DragConfig::on_should_claim_ownership`] answers `true`, the node first
//!    claims ownership of its scope and the gesture is aborted when the claim
//!    is refused.
//! 3) Every move while dragging emits `dragmove` carrying
//!    [`EventData::Movement`] relative to the start and prevents the native
//!    default, so page scrolling does not fight the drag.
//! 4) Release or cancel releases ownership, emits `dragend`,
//!    `dragchange(false)`, and removes the root listeners.
//!
//! ## Minimal example
//!
//! ```
//! use understory_event_state::drag::{DragConfig, drag};
//! use understory_responder::event::EventData;
//! # use understory_responder::module::Responder;
//! # use understory_responder::tree::ResponderTree;
//! # fn attach<T: ResponderTree>() -> Responder<T> {
//! drag(
//!     DragConfig::new()
//!         .on_drag_move(|e| {
//!             if let EventData::Movement { diff_x, diff_y } = e.data {
//!                 let _ = (diff_x, diff_y);
//!             }
//!         })
//!         .on_should_claim_ownership(|_| true),
//! )
//! # }
//! ```

use core::fmt;

use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventDescriptor, EventType, NativeEvent, PointerType};

use crate::callback::{ChangeCallback, ClaimCallback, Emit, listener};
use crate::track::Track;

const TARGET_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerDown),
    EventDescriptor::passive(EventType::MouseDown),
    EventDescriptor::passive(EventType::TouchStart),
];

const ROOT_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::active(EventType::PointerMove),
    EventDescriptor::passive(EventType::PointerUp),
    EventDescriptor::passive(EventType::PointerCancel),
    EventDescriptor::active(EventType::MouseMove),
    EventDescriptor::passive(EventType::MouseUp),
    EventDescriptor::active(EventType::TouchMove),
    EventDescriptor::passive(EventType::TouchEnd),
    EventDescriptor::passive(EventType::TouchCancel),
];

/// Configuration of a drag responder.
pub struct DragConfig<K> {
    /// Ignore all interaction.
    pub disabled: bool,
    /// Asked on promotion whether the drag should claim exclusive ownership.
    pub on_should_claim_ownership: Option<ClaimCallback<K>>,
    /// Called when the gesture is promoted to a drag.
    pub on_drag_start: Option<Listener<K>>,
    /// Called for every move while dragging.
    pub on_drag_move: Option<Listener<K>>,
    /// Called when the drag ends.
    pub on_drag_end: Option<Listener<K>>,
    /// Called with the new dragging state.
    pub on_drag_change: Option<ChangeCallback>,
}

impl<K> Default for DragConfig<K> {
    fn default() -> Self {
        Self {
            disabled: false,
            on_should_claim_ownership: None,
            on_drag_start: None,
            on_drag_move: None,
            on_drag_end: None,
            on_drag_change: None,
        }
    }
}

impl<K> fmt::Debug for DragConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("disabled", &self.disabled)
            .field(
                "claims_ownership",
                &self.on_should_claim_ownership.is_some(),
            )
            .finish_non_exhaustive()
    }
}

impl<K> DragConfig<K> {
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

    /// Set [`on_should_claim_ownership`](Self::on_should_claim_ownership).
    #[must_use]
    pub fn on_should_claim_ownership(
        mut self,
        f: impl Fn(&ResponderEvent<K>) -> bool + 'static,
    ) -> Self {
        self.on_should_claim_ownership = Some(alloc::rc::Rc::new(f));
        self
    }

    /// Set [`on_drag_start`](Self::on_drag_start).
    #[must_use]
    pub fn on_drag_start(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_drag_start = Some(listener(f));
        self
    }

    /// Set [`on_drag_move`](Self::on_drag_move).
    #[must_use]
    pub fn on_drag_move(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_drag_move = Some(listener(f));
        self
    }

    /// Set [`on_drag_end`](Self::on_drag_end).
    #[must_use]
    pub fn on_drag_end(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_drag_end = Some(listener(f));
        self
    }

    /// Set [`on_drag_change`](Self::on_drag_change).
    #[must_use]
    pub fn on_drag_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_drag_change = Some(alloc::rc::Rc::new(f));
        self
    }
}

/// Per-node drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    /// A pointer went down on the node and has not been released.
    pub is_pointer_down: bool,
    /// The gesture was promoted to a drag.
    pub is_dragging: bool,
    /// The drag holds ownership of its scope.
    pub has_ownership: bool,
    /// Start and last positions.
    pub track: Track,
    /// Pointer kind of the current gesture.
    pub pointer_type: PointerType,
    ignore_emulated_mouse_events: bool,
}

/// The drag responder module.
#[derive(Copy, Clone, Debug, Default)]
pub struct Drag;

/// Attach a drag responder with `config`.
pub fn drag<T: ResponderTree>(config: DragConfig<T::Node>) -> Responder<T> {
    Responder::new(Drag, config)
}

impl<T: ResponderTree> ResponderModule<T> for Drag {
    type Config = DragConfig<T::Node>;
    type State = DragState;

    fn name(&self) -> &'static str {
        "drag"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        TARGET_EVENT_TYPES
    }

    fn root_event_types(&self) -> &'static [EventDescriptor] {
        ROOT_EVENT_TYPES
    }

    fn create_initial_state(&self, _config: &Self::Config) -> DragState {
        DragState::default()
    }

    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut DragState,
    ) {
        let Some(event) = cx.native_event() else {
            return;
        };
        let ty = event.event_type;
        match ty {
            EventType::PointerDown | EventType::TouchStart => {
                state.ignore_emulated_mouse_events = true;
                start(cx, config, state, event);
            }
            EventType::MouseDown => {
                if !state.ignore_emulated_mouse_events {
                    start(cx, config, state, event);
                } else if !state.is_pointer_down {
                    // The emulated mousedown of a finished gesture; mouse input after it is real.
                    state.ignore_emulated_mouse_events = false;
                }
            }
            EventType::PointerMove | EventType::MouseMove | EventType::TouchMove => {
                if is_emulated(state, ty) || cx.is_passive() {
                    return;
                }
                track_move(cx, config, state, event);
            }
            EventType::PointerUp
            | EventType::PointerCancel
            | EventType::MouseUp
            | EventType::TouchEnd
            | EventType::TouchCancel => {
                if !is_emulated(state, ty) {
                    end(cx, config, state);
                }
            }
            _ => {}
        }
    }

    fn handle_unmount(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut DragState,
    ) {
        end(cx, config, state);
    }
}

fn is_emulated(state: &DragState, ty: EventType) -> bool {
    state.ignore_emulated_mouse_events && matches!(ty, EventType::MouseMove | EventType::MouseUp)
}

fn start<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &DragConfig<T::Node>,
    state: &mut DragState,
    event: &NativeEvent<T::Node>,
) {
    if config.disabled || state.is_pointer_down {
        return;
    }
    let pointer_type = event.pointer_type();
    if pointer_type == PointerType::Mouse && event.button != 0 {
        return;
    }
    state.is_pointer_down = true;
    state.pointer_type = pointer_type;
    state.track.start(event.position);
    cx.add_root_event_types(ROOT_EVENT_TYPES);
}

fn track_move<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &DragConfig<T::Node>,
    state: &mut DragState,
    event: &NativeEvent<T::Node>,
) {
    if !state.is_pointer_down {
        return;
    }
    let emit = Emit::new(cx.current_node(), state.pointer_type);
    if !state.is_dragging {
        let moved = state
            .track
            .total_offset(event.position)
            .is_some_and(|offset| offset.x != 0.0 || offset.y != 0.0);
        if !moved {
            return;
        }
        if emit.should_claim(cx, "dragstart", config.on_should_claim_ownership.as_ref()) {
            if !cx.request_ownership(cx.current_node()) {
                tracing::debug!(node = ?cx.current_node(), "ownership refused, drag aborted");
                abort(cx, state);
                return;
            }
            state.has_ownership = true;
        }
        state.is_dragging = true;
        emit.bubble(cx, "dragstart", config.on_drag_start.as_ref(), EventData::None);
        emit.change(cx, "dragchange", config.on_drag_change.as_ref(), true);
    }

    state.track.update(event.position);
    let Some(diff) = state.track.displacement() else {
        return;
    };
    emit.bubble(
        cx,
        "dragmove",
        config.on_drag_move.as_ref(),
        EventData::Movement {
            diff_x: diff.x,
            diff_y: diff.y,
        },
    );
    cx.prevent_default();
}

fn end<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &DragConfig<T::Node>,
    state: &mut DragState,
) {
    if !state.is_pointer_down {
        return;
    }
    if state.is_dragging {
        let emit = Emit::new(cx.current_node(), state.pointer_type);
        emit.bubble(cx, "dragend", config.on_drag_end.as_ref(), EventData::None);
        emit.change(cx, "dragchange", config.on_drag_change.as_ref(), false);
    }
    abort(cx, state);
}

/// Return to idle without emitting anything.
fn abort<T: ResponderTree>(cx: &mut DispatchContext<'_, T>, state: &mut DragState) {
    if state.has_ownership {
        cx.release_ownership(cx.current_node());
    }
    cx.remove_root_event_types(ROOT_EVENT_TYPES);
    state.is_pointer_down = false;
    state.is_dragging = false;
    state.has_ownership = false;
    state.track.end();
}
