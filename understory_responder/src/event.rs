// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic events emitted by responder modules.

use alloc::rc::Rc;
use core::fmt;

use kurbo::Point;

use crate::types::PointerType;

/// A user listener attached to exactly one synthetic event.
pub type Listener<K> = Rc<dyn Fn(&ResponderEvent<K>)>;

/// Extra fields merged onto a synthetic event.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum EventData {
    /// No extra fields.
    #[default]
    None,
    /// Displacement from the gesture's start point.
    Movement {
        /// Horizontal displacement.
        diff_x: f64,
        /// Vertical displacement.
        diff_y: f64,
    },
    /// Current pointer position.
    Position(Point),
}

/// A high-level event produced by a responder module, such as `press` or `dragmove`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponderEvent<K> {
    /// Event name, e.g. `"pressin"`.
    pub name: &'static str,
    /// The node the event is about.
    pub target: K,
    /// Pointer kind of the interaction that produced the event.
    pub pointer_type: PointerType,
    /// Timestamp in milliseconds.
    pub time_stamp: u64,
    /// Extra fields.
    pub data: EventData,
}

impl<K> ResponderEvent<K> {
    /// Create an event with no extra data, a mouse pointer type and a zero timestamp.
    pub fn new(name: &'static str, target: K) -> Self {
        Self {
            name,
            target,
            pointer_type: PointerType::Mouse,
            time_stamp: 0,
            data: EventData::None,
        }
    }

    /// Set the pointer type.
    #[must_use]
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: u64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    /// Merge extra fields onto the event.
    #[must_use]
    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }
}

/// Dispatch phase of a queued synthetic event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Executed before bubble-phase events, outermost responder first.
    Capture,
    /// Executed after capture-phase events, innermost responder first.
    Bubble,
}

/// A synthetic event paired with the single listener it will invoke.
#[derive(Clone)]
pub struct QueuedEvent<K> {
    /// The event.
    pub event: ResponderEvent<K>,
    /// The listener it invokes.
    pub listener: Listener<K>,
}

impl<K> QueuedEvent<K> {
    /// Invoke the attached listener.
    pub fn execute(&self) {
        (self.listener)(&self.event);
    }
}

impl<K: fmt::Debug> fmt::Debug for QueuedEvent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedEvent")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
