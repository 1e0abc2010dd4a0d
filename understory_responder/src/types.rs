// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native-side types: event type names, static declarations, and the native event record.

use core::fmt;
use core::str::FromStr;

use kurbo::Point;
use smallvec::SmallVec;

/// A native event type the engine knows how to route.
///
/// Names round-trip with the DOM spelling via [`EventType::as_str`] and
/// [`EventType::parse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EventType {
    /// `pointerdown`
    PointerDown,
    /// `pointerup`
    PointerUp,
    /// `pointermove`
    PointerMove,
    /// `pointerover`
    PointerOver,
    /// `pointerout`
    PointerOut,
    /// `pointercancel`
    PointerCancel,
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `touchstart`
    TouchStart,
    /// `touchend`
    TouchEnd,
    /// `touchmove`
    TouchMove,
    /// `touchcancel`
    TouchCancel,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
    /// `click`
    Click,
    /// `contextmenu`
    ContextMenu,
    /// `scroll`
    Scroll,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
    /// `focusin`
    FocusIn,
    /// `focusout`
    FocusOut,
}

impl EventType {
    /// Every known event type, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::PointerDown,
        Self::PointerUp,
        Self::PointerMove,
        Self::PointerOver,
        Self::PointerOut,
        Self::PointerCancel,
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseMove,
        Self::MouseOver,
        Self::MouseOut,
        Self::TouchStart,
        Self::TouchEnd,
        Self::TouchMove,
        Self::TouchCancel,
        Self::KeyDown,
        Self::KeyUp,
        Self::Click,
        Self::ContextMenu,
        Self::Scroll,
        Self::Focus,
        Self::Blur,
        Self::FocusIn,
        Self::FocusOut,
    ];

    /// The DOM name of this event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerMove => "pointermove",
            Self::PointerOver => "pointerover",
            Self::PointerOut => "pointerout",
            Self::PointerCancel => "pointercancel",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
            Self::TouchCancel => "touchcancel",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Click => "click",
            Self::ContextMenu => "contextmenu",
            Self::Scroll => "scroll",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
        }
    }

    /// Parse a DOM event name.
    pub fn parse(name: &str) -> Result<Self, UnknownEventType> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == name)
            .ok_or(UnknownEventType)
    }

    /// The pointer kind implied by the event family, if the family fixes one.
    ///
    /// `pointer*` events carry their kind on the native event instead.
    pub const fn implied_pointer_type(self) -> Option<PointerType> {
        match self {
            Self::MouseDown | Self::MouseUp | Self::MouseMove | Self::MouseOver | Self::MouseOut => {
                Some(PointerType::Mouse)
            }
            Self::TouchStart | Self::TouchEnd | Self::TouchMove | Self::TouchCancel => {
                Some(PointerType::Touch)
            }
            Self::KeyDown | Self::KeyUp => Some(PointerType::Keyboard),
            _ => None,
        }
    }

    const fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when parsing an event name the engine does not route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownEventType;

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown native event type")
    }
}

impl core::error::Error for UnknownEventType {}

/// A set of [`EventType`]s with O(1) membership.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventTypeSet(u64);

impl EventTypeSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from static descriptors.
    pub fn from_descriptors(descriptors: &[EventDescriptor]) -> Self {
        descriptors
            .iter()
            .fold(Self::empty(), |set, d| set.with(d.event_type))
    }

    /// Return a copy of this set with `ty` added.
    #[must_use]
    pub const fn with(self, ty: EventType) -> Self {
        Self(self.0 | ty.bit())
    }

    /// Add `ty` to the set.
    pub fn insert(&mut self, ty: EventType) {
        self.0 |= ty.bit();
    }

    /// Returns `true` if `ty` is in the set.
    pub const fn contains(self, ty: EventType) -> bool {
        self.0 & ty.bit() != 0
    }

    /// Returns `true` if the set has no members.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = EventType> {
        EventType::ALL.into_iter().filter(move |ty| self.contains(*ty))
    }
}

impl fmt::Debug for EventTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// One entry of a module's static event declaration.
///
/// `passive` and `capture` only affect how the host installs the native
/// listener; routing is by [`EventType`] alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventDescriptor {
    /// The native event type.
    pub event_type: EventType,
    /// Install the native listener as passive (cannot prevent default).
    pub passive: bool,
    /// Install the native listener for the capture phase.
    pub capture: bool,
}

impl EventDescriptor {
    /// A passive, bubble-phase declaration.
    pub const fn passive(event_type: EventType) -> Self {
        Self {
            event_type,
            passive: true,
            capture: false,
        }
    }

    /// An active (default-preventable), bubble-phase declaration.
    pub const fn active(event_type: EventType) -> Self {
        Self {
            event_type,
            passive: false,
            capture: false,
        }
    }

    /// Return a copy that installs for the capture phase.
    #[must_use]
    pub const fn in_capture(mut self) -> Self {
        self.capture = true;
        self
    }
}

/// The kind of device that produced a pointer-like event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse or trackpad.
    #[default]
    Mouse,
    /// Touch screen.
    Touch,
    /// Stylus.
    Pen,
    /// Keyboard activation.
    Keyboard,
}

/// Keys the responder modules care about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `Enter`
    Enter,
    /// The space bar.
    Space,
    /// `Escape`
    Escape,
    /// `Tab`
    Tab,
    /// Any other key.
    Other,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a native event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command.
        const META  = 0b0000_1000;
    }
}

/// One touch point of a touch event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Identifier that stays stable for the lifetime of the touch.
    pub identifier: u64,
    /// Position of the touch.
    pub position: Point,
}

/// A native input event as delivered by the host.
///
/// Built with [`NativeEvent::new`] and the `with_*` / [`at`](NativeEvent::at) builders.
///
/// ```
/// use kurbo::Point;
/// use understory_responder::types::{EventType, NativeEvent, PointerType};
///
/// let ev = NativeEvent::new(EventType::PointerDown, 7_u32)
///     .at(Point::new(10.0, 20.0))
///     .with_pointer_type(PointerType::Pen)
///     .with_time_stamp(1_000);
/// assert_eq!(ev.pointer_type(), PointerType::Pen);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent<K> {
    /// Resolved top-level event type.
    pub event_type: EventType,
    /// Node the event originated from.
    pub target: K,
    /// Complementary target (`relatedTarget`): the node being left or entered.
    pub related_target: Option<K>,
    /// Pointer position in client coordinates.
    pub position: Point,
    /// Pointer kind as reported by `pointer*` events.
    pub pointer_type: PointerType,
    /// Mouse button, `0` being the primary button.
    pub button: u8,
    /// Key for keyboard events.
    pub key: Option<Key>,
    /// Modifier keys.
    pub modifiers: Modifiers,
    /// Touch points relevant to the event (changed touches for touch events).
    pub touches: SmallVec<[Touch; 2]>,
    /// Timestamp in milliseconds.
    pub time_stamp: u64,
}

impl<K> NativeEvent<K> {
    /// Create a native event of `event_type` targeting `target`.
    pub fn new(event_type: EventType, target: K) -> Self {
        Self {
            event_type,
            target,
            related_target: None,
            position: Point::ZERO,
            pointer_type: event_type.implied_pointer_type().unwrap_or_default(),
            button: 0,
            key: None,
            modifiers: Modifiers::empty(),
            touches: SmallVec::new(),
            time_stamp: 0,
        }
    }

    /// Set the pointer position.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Set the related target.
    #[must_use]
    pub fn with_related_target(mut self, related: K) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Set the pointer type.
    #[must_use]
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the mouse button.
    #[must_use]
    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        self
    }

    /// Set the key.
    #[must_use]
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Append a touch point. The first touch also sets [`position`](Self::position).
    #[must_use]
    pub fn with_touch(mut self, identifier: u64, position: Point) -> Self {
        if self.touches.is_empty() {
            self.position = position;
        }
        self.touches.push(Touch {
            identifier,
            position,
        });
        self
    }

    /// Set the timestamp in milliseconds.
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: u64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    /// The effective pointer type: fixed by the event family when it implies one.
    pub fn pointer_type(&self) -> PointerType {
        self.event_type
            .implied_pointer_type()
            .unwrap_or(self.pointer_type)
    }

    /// Find a touch by identifier.
    pub fn touch(&self, identifier: u64) -> Option<&Touch> {
        self.touches.iter().find(|t| t.identifier == identifier)
    }
}

/// Identifier of a scheduled responder timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);
