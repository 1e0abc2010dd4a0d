// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe responder.
//!
//! A swipe starts on pointer down or touch start, keeps following one touch
//! (by identifier) when it started from touch, and derives its direction from
//! the cumulative horizontal displacement. Each move emits `swipemove` with
//! [`EventData::Movement`].
//!
//! A gesture that emitted at least one `swipemove` completes on release, even
//! when the pointer came back to where it started: `swipeleft` or
//! `swiperight` fires only when the gesture's direction differs from the
//! direction last reported, then `swipeend` fires exactly once. The last
//! reported direction persists across gestures, so repeated swipes in the same
//! direction report it once.
//!
//! A release without any movement is a tap, not a swipe, and emits nothing.
//!
//! Touch events only carry the touches that changed. Moves and ends of other
//! fingers are ignored; the gesture follows its own touch until that touch
//! ends. A cancel aborts the gesture without completing it.

use core::fmt;

use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{EventDescriptor, EventType, NativeEvent, PointerType};

use crate::callback::{ClaimCallback, Emit, listener};
use crate::track::Track;

const TARGET_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerDown),
    EventDescriptor::passive(EventType::TouchStart),
];

const ROOT_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerMove),
    EventDescriptor::passive(EventType::PointerUp),
    EventDescriptor::passive(EventType::PointerCancel),
    EventDescriptor::passive(EventType::TouchMove),
    EventDescriptor::passive(EventType::TouchEnd),
    EventDescriptor::passive(EventType::TouchCancel),
];

/// Horizontal swipe direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

/// Configuration of a swipe responder.
pub struct SwipeConfig<K> {
    /// Ignore all interaction.
    pub disabled: bool,
    /// Asked on the first move whether the swipe should claim exclusive ownership.
    pub on_should_claim_ownership: Option<ClaimCallback<K>>,
    /// Called for every move of the gesture.
    pub on_swipe_move: Option<Listener<K>>,
    /// Called when a gesture completes towards the left after a direction change.
    pub on_swipe_left: Option<Listener<K>>,
    /// Called when a gesture completes towards the right after a direction change.
    pub on_swipe_right: Option<Listener<K>>,
    /// Called once per completed gesture.
    pub on_swipe_end: Option<Listener<K>>,
}

impl<K> Default for SwipeConfig<K> {
    fn default() -> Self {
        Self {
            disabled: false,
            on_should_claim_ownership: None,
            on_swipe_move: None,
            on_swipe_left: None,
            on_swipe_right: None,
            on_swipe_end: None,
        }
    }
}

impl<K> fmt::Debug for SwipeConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeConfig")
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl<K> SwipeConfig<K> {
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

    /// Set [`on_swipe_move`](Self::on_swipe_move).
    #[must_use]
    pub fn on_swipe_move(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_swipe_move = Some(listener(f));
        self
    }

    /// Set [`on_swipe_left`](Self::on_swipe_left).
    #[must_use]
    pub fn on_swipe_left(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_swipe_left = Some(listener(f));
        self
    }

    /// Set [`on_swipe_right`](Self::on_swipe_right).
    #[must_use]
    pub fn on_swipe_right(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_swipe_right = Some(listener(f));
        self
    }

    /// Set [`on_swipe_end`](Self::on_swipe_end).
    #[must_use]
    pub fn on_swipe_end(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_swipe_end = Some(listener(f));
        self
    }
}

/// Per-node swipe state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeState {
    /// A gesture is in progress.
    pub is_swiping: bool,
    /// The gesture holds ownership of its scope.
    pub has_ownership: bool,
    /// The gesture emitted at least one `swipemove`.
    pub has_moved: bool,
    /// Identifier of the followed touch, for touch gestures.
    pub touch_id: Option<u64>,
    /// Start and last positions.
    pub track: Track,
    /// Direction of the current gesture so far.
    pub direction: Option<Direction>,
    /// Direction reported by the last completed gesture.
    pub last_direction: Option<Direction>,
    /// Pointer kind of the current gesture.
    pub pointer_type: PointerType,
}

/// The swipe responder module.
#[derive(Copy, Clone, Debug, Default)]
pub struct Swipe;

/// Attach a swipe responder with `config`.
pub fn swipe<T: ResponderTree>(config: SwipeConfig<T::Node>) -> Responder<T> {
    Responder::new(Swipe, config)
}

impl<T: ResponderTree> ResponderModule<T> for Swipe {
    type Config = SwipeConfig<T::Node>;
    type State = SwipeState;

    fn name(&self) -> &'static str {
        "swipe"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        TARGET_EVENT_TYPES
    }

    fn root_event_types(&self) -> &'static [EventDescriptor] {
        ROOT_EVENT_TYPES
    }

    fn create_initial_state(&self, _config: &Self::Config) -> SwipeState {
        SwipeState::default()
    }

    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut SwipeState,
    ) {
        let Some(event) = cx.native_event() else {
            return;
        };
        match event.event_type {
            EventType::PointerDown | EventType::TouchStart => start(cx, config, state, event),
            EventType::PointerMove | EventType::TouchMove => track_move(cx, config, state, event),
            EventType::PointerUp | EventType::TouchEnd => release(cx, config, state, event),
            EventType::PointerCancel | EventType::TouchCancel => {
                if state.is_swiping {
                    reset(cx, state);
                }
            }
            _ => {}
        }
    }

    fn handle_unmount(
        &self,
        cx: &mut DispatchContext<'_, T>,
        _config: &Self::Config,
        state: &mut SwipeState,
    ) {
        if state.is_swiping {
            reset(cx, state);
        }
    }
}

/// Position of the followed pointer in `event`, or `None` if the followed
/// touch is not part of it.
fn followed_position<K>(state: &SwipeState, event: &NativeEvent<K>) -> Option<kurbo::Point> {
    match state.touch_id {
        Some(id) if event.event_type.implied_pointer_type() == Some(PointerType::Touch) => {
            event.touch(id).map(|t| t.position)
        }
        _ => Some(event.position),
    }
}

fn start<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &SwipeConfig<T::Node>,
    state: &mut SwipeState,
    event: &NativeEvent<T::Node>,
) {
    if config.disabled || state.is_swiping {
        return;
    }
    let node = cx.current_node();
    if cx.is_target_owned(node) && !cx.has_ownership(node) {
        return;
    }
    let touch = event.touches.first().copied();
    state.is_swiping = true;
    state.touch_id = touch.map(|t| t.identifier);
    state.direction = None;
    state.pointer_type = event.pointer_type();
    state
        .track
        .start(touch.map_or(event.position, |t| t.position));
    cx.add_root_event_types(ROOT_EVENT_TYPES);
}

fn track_move<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &SwipeConfig<T::Node>,
    state: &mut SwipeState,
    event: &NativeEvent<T::Node>,
) {
    if !state.is_swiping {
        return;
    }
    // Another finger moved.
    let Some(position) = followed_position(state, event) else {
        return;
    };
    if state.track.last_pos == Some(position) {
        return;
    }
    let emit = Emit::new(cx.current_node(), state.pointer_type);
    if !state.has_moved
        && !state.has_ownership
        && emit.should_claim(cx, "swipemove", config.on_should_claim_ownership.as_ref())
    {
        if !cx.request_ownership(cx.current_node()) {
            tracing::debug!(node = ?cx.current_node(), "ownership refused, swipe aborted");
            reset(cx, state);
            return;
        }
        state.has_ownership = true;
    }

    state.track.update(position);
    let Some(diff) = state.track.displacement() else {
        return;
    };
    if diff.x < 0.0 {
        state.direction = Some(Direction::Left);
    } else if diff.x > 0.0 {
        state.direction = Some(Direction::Right);
    }
    state.has_moved = true;
    emit.bubble(
        cx,
        "swipemove",
        config.on_swipe_move.as_ref(),
        EventData::Movement {
            diff_x: diff.x,
            diff_y: diff.y,
        },
    );
}

fn release<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &SwipeConfig<T::Node>,
    state: &mut SwipeState,
    event: &NativeEvent<T::Node>,
) {
    if !state.is_swiping {
        return;
    }
    // Another finger lifting does not end the gesture.
    if followed_position(state, event).is_none() {
        return;
    }
    if state.has_moved {
        let emit = Emit::new(cx.current_node(), state.pointer_type);
        let direction = state.direction;
        if direction != state.last_direction {
            match direction {
                Some(Direction::Left) => {
                    emit.bubble(cx, "swipeleft", config.on_swipe_left.as_ref(), EventData::None);
                }
                Some(Direction::Right) => {
                    emit.bubble(cx, "swiperight", config.on_swipe_right.as_ref(), EventData::None);
                }
                None => {}
            }
            state.last_direction = direction;
        }
        emit.bubble(cx, "swipeend", config.on_swipe_end.as_ref(), EventData::None);
    }
    reset(cx, state);
}

fn reset<T: ResponderTree>(cx: &mut DispatchContext<'_, T>, state: &mut SwipeState) {
    if state.has_ownership {
        cx.release_ownership(cx.current_node());
    }
    cx.remove_root_event_types(ROOT_EVENT_TYPES);
    state.is_swiping = false;
    state.has_ownership = false;
    state.has_moved = false;
    state.touch_id = None;
    state.direction = None;
    state.track.end();
}
