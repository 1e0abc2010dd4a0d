// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press responder: press, long press and keyboard activation.
//!
//! ## States
//!
//! - Idle.
//! - Pressed: a pointer went down on the node. While the pointer stays inside
//!   the press retention region (the node's bounds grown by
//!   [`PressConfig::press_retention_offset`]) the press is *active*; leaving
//!   the region deactivates it and coming back reactivates it.
//! - Pressed and long-pressed: the long-press timer elapsed while active.
//!
//! ## Events
//!
//! | Trigger | Synthetic events |
//! |---|---|
//! | pointer down | `pressin`, `presschange(true)` |
//! | long-press delay elapsed | `longpresschange(true)`, immediately |
//! | pointer move inside the region | `pressmove` |
//! | pointer leaves / re-enters the region | `pressout`, `presschange(false)` / `pressin`, `presschange(true)` |
//! | pointer up inside the region | `pressout`, `presschange(false)`, [`longpresschange(false)`], then `longpress` or `press` |
//! | cancel, context menu, scroll of an ancestor | `pressout`, `presschange(false)`, [`longpresschange(false)`] |
//! | Enter / Space key down | `press` |
//!
//! `longpress` replaces `press` on release only when the node has an
//! `on_long_press` callback. The long-press timer only runs when a long-press
//! callback is configured.
//!
//! Mouse events emulated by the browser after a touch or pointer event are
//! ignored. The emulated sequence ends with its mousedown once the touch or
//! pointer gesture is over; mouse input after that presses again. A press does not start while another node owns the scope, and an
//! active press is aborted when another node claims ownership.
//!
//! ## Default prevention
//!
//! Dispatching `press` or `longpress` arranges for the next native `click` to
//! be default-prevented unless a modifier key is held. Keyboard activation
//! prevents the key's default action unless the target is an anchor.
//! Both are disabled with [`PressConfig::prevent_default`]`(false)`.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_event_state::press::{PressConfig, press};
//! # use understory_responder::module::Responder;
//! # use understory_responder::tree::ResponderTree;
//! # fn attach<T: ResponderTree>() -> Responder<T> {
//! let presses = Rc::new(Cell::new(0));
//! let counter = presses.clone();
//! let responder = press(
//!     PressConfig::new()
//!         .on_press(move |_| counter.set(counter.get() + 1))
//!         .long_press_delay(500),
//! );
//! # responder
//! # }
//! ```

use core::fmt;

use kurbo::{Insets, Rect};
use understory_responder::context::DispatchContext;
use understory_responder::event::{EventData, Listener, ResponderEvent};
use understory_responder::hit_slop;
use understory_responder::module::{Responder, ResponderModule};
use understory_responder::tree::ResponderTree;
use understory_responder::types::{
    EventDescriptor, EventType, Key, NativeEvent, PointerType, TimerId,
};

use crate::callback::{ChangeCallback, Emit, listener};

/// Default delay before a press becomes a long press, in milliseconds.
pub const DEFAULT_LONG_PRESS_DELAY: u64 = 1000;

/// Default press retention offset on every side.
pub const DEFAULT_PRESS_RETENTION_OFFSET: f64 = 20.0;

const TARGET_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerDown),
    EventDescriptor::passive(EventType::MouseDown),
    EventDescriptor::passive(EventType::TouchStart),
    EventDescriptor::active(EventType::KeyDown),
    EventDescriptor::active(EventType::Click),
    EventDescriptor::passive(EventType::ContextMenu),
];

const ROOT_EVENT_TYPES: &[EventDescriptor] = &[
    EventDescriptor::passive(EventType::PointerUp),
    EventDescriptor::passive(EventType::PointerMove),
    EventDescriptor::passive(EventType::PointerCancel),
    EventDescriptor::passive(EventType::MouseUp),
    EventDescriptor::passive(EventType::MouseMove),
    EventDescriptor::passive(EventType::TouchEnd),
    EventDescriptor::passive(EventType::TouchMove),
    EventDescriptor::passive(EventType::TouchCancel),
    EventDescriptor::passive(EventType::Scroll).in_capture(),
];

/// Configuration of a press responder.
pub struct PressConfig<K> {
    /// Ignore all interaction.
    pub disabled: bool,
    /// Milliseconds before an active press becomes a long press.
    pub long_press_delay: u64,
    /// How far outside the node's bounds an active press is retained.
    pub press_retention_offset: Insets,
    /// Prevent the default action of activating native events.
    pub prevent_default: bool,
    /// Called on release inside the node (or keyboard activation).
    pub on_press: Option<Listener<K>>,
    /// Called when the press activates.
    pub on_press_in: Option<Listener<K>>,
    /// Called when the press deactivates.
    pub on_press_out: Option<Listener<K>>,
    /// Called for pointer moves while the press is active.
    pub on_press_move: Option<Listener<K>>,
    /// Called on release after the press became a long press.
    pub on_long_press: Option<Listener<K>>,
    /// Called with the new active state.
    pub on_press_change: Option<ChangeCallback>,
    /// Called with the new long-press state.
    pub on_long_press_change: Option<ChangeCallback>,
}

impl<K> Default for PressConfig<K> {
    fn default() -> Self {
        Self {
            disabled: false,
            long_press_delay: DEFAULT_LONG_PRESS_DELAY,
            press_retention_offset: Insets::uniform(DEFAULT_PRESS_RETENTION_OFFSET),
            prevent_default: true,
            on_press: None,
            on_press_in: None,
            on_press_out: None,
            on_press_move: None,
            on_long_press: None,
            on_press_change: None,
            on_long_press_change: None,
        }
    }
}

impl<K> fmt::Debug for PressConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PressConfig")
            .field("disabled", &self.disabled)
            .field("long_press_delay", &self.long_press_delay)
            .field("press_retention_offset", &self.press_retention_offset)
            .field("prevent_default", &self.prevent_default)
            .field("on_press", &self.on_press.is_some())
            .field("on_long_press", &self.on_long_press.is_some())
            .finish_non_exhaustive()
    }
}

impl<K> PressConfig<K> {
    /// A configuration with defaults and no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`disabled`](Self::disabled).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set [`long_press_delay`](Self::long_press_delay).
    #[must_use]
    pub fn long_press_delay(mut self, delay: u64) -> Self {
        self.long_press_delay = delay;
        self
    }

    /// Set [`press_retention_offset`](Self::press_retention_offset).
    #[must_use]
    pub fn press_retention_offset(mut self, offset: Insets) -> Self {
        self.press_retention_offset = offset;
        self
    }

    /// Set [`prevent_default`](Self::prevent_default).
    #[must_use]
    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    /// Set [`on_press`](Self::on_press).
    #[must_use]
    pub fn on_press(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_press = Some(listener(f));
        self
    }

    /// Set [`on_press_in`](Self::on_press_in).
    #[must_use]
    pub fn on_press_in(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_press_in = Some(listener(f));
        self
    }

    /// Set [`on_press_out`](Self::on_press_out).
    #[must_use]
    pub fn on_press_out(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_press_out = Some(listener(f));
        self
    }

    /// Set [`on_press_move`](Self::on_press_move).
    #[must_use]
    pub fn on_press_move(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_press_move = Some(listener(f));
        self
    }

    /// Set [`on_long_press`](Self::on_long_press).
    #[must_use]
    pub fn on_long_press(mut self, f: impl Fn(&ResponderEvent<K>) + 'static) -> Self {
        self.on_long_press = Some(listener(f));
        self
    }

    /// Set [`on_press_change`](Self::on_press_change).
    #[must_use]
    pub fn on_press_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_press_change = Some(alloc::rc::Rc::new(f));
        self
    }

    /// Set [`on_long_press_change`](Self::on_long_press_change).
    #[must_use]
    pub fn on_long_press_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_long_press_change = Some(alloc::rc::Rc::new(f));
        self
    }

    fn wants_long_press(&self) -> bool {
        self.on_long_press.is_some() || self.on_long_press_change.is_some()
    }
}

/// Per-node press state.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    /// A press gesture is in progress.
    pub is_pressed: bool,
    /// The pointer is inside the retention region.
    pub is_active: bool,
    /// The long-press delay elapsed during this press.
    pub is_long_pressed: bool,
    /// Node the press started on.
    pub press_target: Option<K>,
    /// Pointer kind of the current press.
    pub pointer_type: PointerType,
    /// The next native `click` should be default-prevented.
    pub should_prevent_click: bool,
    bounds: Option<Rect>,
    long_press_timer: Option<TimerId>,
    ignore_emulated_mouse_events: bool,
}

impl<K> Default for PressState<K> {
    fn default() -> Self {
        Self {
            is_pressed: false,
            is_active: false,
            is_long_pressed: false,
            press_target: None,
            pointer_type: PointerType::Mouse,
            should_prevent_click: false,
            bounds: None,
            long_press_timer: None,
            ignore_emulated_mouse_events: false,
        }
    }
}

/// The press responder module.
#[derive(Copy, Clone, Debug, Default)]
pub struct Press;

/// Attach a press responder with `config`.
pub fn press<T: ResponderTree>(config: PressConfig<T::Node>) -> Responder<T> {
    Responder::new(Press, config)
}

impl<T: ResponderTree> ResponderModule<T> for Press {
    type Config = PressConfig<T::Node>;
    type State = PressState<T::Node>;

    const OBSERVES_OWNERSHIP: bool = true;

    fn name(&self) -> &'static str {
        "press"
    }

    fn target_event_types(&self) -> &'static [EventDescriptor] {
        TARGET_EVENT_TYPES
    }

    fn root_event_types(&self) -> &'static [EventDescriptor] {
        ROOT_EVENT_TYPES
    }

    fn create_initial_state(&self, _config: &Self::Config) -> Self::State {
        PressState::default()
    }

    fn handle_event(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut Self::State,
    ) {
        let Some(event) = cx.native_event() else {
            return;
        };
        match event.event_type {
            EventType::PointerDown | EventType::MouseDown | EventType::TouchStart => {
                start(cx, config, state, event);
            }
            EventType::PointerMove | EventType::MouseMove | EventType::TouchMove => {
                track_move(cx, config, state, event);
            }
            EventType::PointerUp | EventType::MouseUp | EventType::TouchEnd => {
                release(cx, config, state, event);
            }
            EventType::PointerCancel | EventType::TouchCancel | EventType::ContextMenu => {
                if state.is_pressed {
                    abort(cx, config, state);
                }
            }
            EventType::Scroll => {
                let scrolled_ancestor = state
                    .press_target
                    .is_some_and(|target| cx.is_target_within_element(target, event.target));
                if state.is_pressed && scrolled_ancestor {
                    abort(cx, config, state);
                }
            }
            EventType::KeyDown => activate_with_key(cx, config, event),
            EventType::Click => {
                if core::mem::take(&mut state.should_prevent_click) && event.modifiers.is_empty() {
                    cx.prevent_default();
                }
            }
            _ => {}
        }
    }

    fn handle_timer(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut Self::State,
        timer: TimerId,
    ) {
        if state.long_press_timer != Some(timer) {
            return;
        }
        state.long_press_timer = None;
        if state.is_pressed && state.is_active {
            state.is_long_pressed = true;
            emitter(cx, state).change_now(
                cx,
                "longpresschange",
                config.on_long_press_change.as_ref(),
                true,
            );
        }
    }

    fn handle_ownership_change(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut Self::State,
    ) {
        let node = cx.current_node();
        if state.is_pressed && cx.is_target_owned(node) && !cx.has_ownership(node) {
            abort(cx, config, state);
        }
    }

    fn handle_unmount(
        &self,
        cx: &mut DispatchContext<'_, T>,
        config: &Self::Config,
        state: &mut Self::State,
    ) {
        if state.is_pressed {
            abort(cx, config, state);
        }
    }
}

fn emitter<T: ResponderTree>(
    cx: &DispatchContext<'_, T>,
    state: &PressState<T::Node>,
) -> Emit<T::Node> {
    Emit::new(
        state.press_target.unwrap_or(cx.current_node()),
        state.pointer_type,
    )
}

fn is_emulated_mouse_event<K>(state: &PressState<K>, ty: EventType) -> bool {
    state.ignore_emulated_mouse_events
        && matches!(
            ty,
            EventType::MouseDown | EventType::MouseMove | EventType::MouseUp
        )
}

fn start<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
    event: &NativeEvent<T::Node>,
) {
    if matches!(
        event.event_type,
        EventType::PointerDown | EventType::TouchStart
    ) {
        state.ignore_emulated_mouse_events = true;
    } else if is_emulated_mouse_event(state, event.event_type) {
        // An emulated sequence carries one mousedown. Once it arrives after the
        // gesture ended, later mouse input is real.
        if !state.is_pressed {
            state.ignore_emulated_mouse_events = false;
        }
        return;
    }
    if config.disabled || state.is_pressed {
        return;
    }
    let pointer_type = event.pointer_type();
    // Secondary buttons open context menus rather than press.
    if pointer_type == PointerType::Mouse && event.button != 0 {
        return;
    }
    let node = cx.current_node();
    if cx.is_target_owned(node) && !cx.has_ownership(node) {
        return;
    }

    state.is_pressed = true;
    state.is_long_pressed = false;
    state.should_prevent_click = false;
    state.press_target = Some(node);
    state.pointer_type = pointer_type;
    state.bounds = cx.tree().bounds(node);
    cx.add_root_event_types(ROOT_EVENT_TYPES);
    activate(cx, config, state);
}

fn activate<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
) {
    state.is_active = true;
    let emit = emitter(cx, state);
    emit.bubble(cx, "pressin", config.on_press_in.as_ref(), EventData::None);
    emit.change(cx, "presschange", config.on_press_change.as_ref(), true);
    if !state.is_long_pressed && config.wants_long_press() {
        state.long_press_timer = Some(cx.set_timeout(config.long_press_delay));
    }
}

fn deactivate<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
) {
    state.is_active = false;
    clear_long_press_timer(cx, state);
    let emit = emitter(cx, state);
    emit.bubble(cx, "pressout", config.on_press_out.as_ref(), EventData::None);
    emit.change(cx, "presschange", config.on_press_change.as_ref(), false);
}

fn clear_long_press_timer<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    state: &mut PressState<T::Node>,
) {
    if let Some(timer) = state.long_press_timer.take() {
        cx.clear_timeout(timer);
    }
}

fn is_within_press_region<T: ResponderTree>(
    cx: &DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &PressState<T::Node>,
    event: &NativeEvent<T::Node>,
) -> bool {
    match state.bounds {
        Some(bounds) => {
            hit_slop::is_within_retention(bounds, config.press_retention_offset, event.position)
        }
        None => cx.is_target_within_event_component(event.target),
    }
}

fn track_move<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
    event: &NativeEvent<T::Node>,
) {
    if !state.is_pressed || is_emulated_mouse_event(state, event.event_type) {
        return;
    }
    if is_within_press_region(cx, config, state, event) {
        if !state.is_active {
            activate(cx, config, state);
        }
        emitter(cx, state).bubble(
            cx,
            "pressmove",
            config.on_press_move.as_ref(),
            EventData::Position(event.position),
        );
    } else if state.is_active {
        deactivate(cx, config, state);
    }
}

fn release<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
    event: &NativeEvent<T::Node>,
) {
    if !state.is_pressed || is_emulated_mouse_event(state, event.event_type) {
        return;
    }
    let inside = is_within_press_region(cx, config, state, event);
    if state.is_active {
        deactivate(cx, config, state);
    }
    let emit = emitter(cx, state);
    if state.is_long_pressed {
        emit.change(
            cx,
            "longpresschange",
            config.on_long_press_change.as_ref(),
            false,
        );
    }
    if inside {
        let dispatched = if state.is_long_pressed && config.on_long_press.is_some() {
            emit.bubble(cx, "longpress", config.on_long_press.as_ref(), EventData::None)
        } else {
            emit.bubble(cx, "press", config.on_press.as_ref(), EventData::None)
        };
        state.should_prevent_click = dispatched && config.prevent_default;
    }
    end(cx, state);
}

fn abort<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    state: &mut PressState<T::Node>,
) {
    tracing::debug!(node = ?cx.current_node(), "press aborted");
    if state.is_active {
        deactivate(cx, config, state);
    }
    if state.is_long_pressed {
        emitter(cx, state).change(
            cx,
            "longpresschange",
            config.on_long_press_change.as_ref(),
            false,
        );
    }
    end(cx, state);
}

fn end<T: ResponderTree>(cx: &mut DispatchContext<'_, T>, state: &mut PressState<T::Node>) {
    clear_long_press_timer(cx, state);
    cx.remove_root_event_types(ROOT_EVENT_TYPES);
    state.is_pressed = false;
    state.is_active = false;
    state.is_long_pressed = false;
    state.press_target = None;
    state.bounds = None;
}

fn activate_with_key<T: ResponderTree>(
    cx: &mut DispatchContext<'_, T>,
    config: &PressConfig<T::Node>,
    event: &NativeEvent<T::Node>,
) {
    if config.disabled || !matches!(event.key, Some(Key::Enter | Key::Space)) {
        return;
    }
    let emit = Emit::new(cx.current_node(), PointerType::Keyboard);
    let dispatched = emit.bubble(cx, "press", config.on_press.as_ref(), EventData::None);
    if dispatched && config.prevent_default && !cx.tree().is_anchor(event.target) {
        cx.prevent_default();
    }
}
