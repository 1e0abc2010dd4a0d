// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-slop geometry.
//!
//! A hit slop extends an element's hit target outward by per-side insets. The
//! band between the element's real bounds and the extended rectangle is a
//! dead zone: the pointer is over the synthesized extension, not over the
//! element itself. Responders use it to suppress hover or press transitions
//! that would otherwise fire just outside a real target.
//!
//! ```
//! use kurbo::{Insets, Point, Rect};
//! use understory_responder::hit_slop::HitSlop;
//!
//! let slop = HitSlop::new(Rect::new(10.0, 10.0, 20.0, 20.0), Insets::uniform(5.0));
//! assert!(slop.is_within_slop(Point::new(7.0, 15.0)));
//! assert!(!slop.is_within_slop(Point::new(15.0, 15.0))); // on the element
//! assert!(!slop.is_within_slop(Point::new(1.0, 15.0))); // outside the extension
//! ```

use kurbo::{Insets, Point, Rect};

/// An element's real bounds together with its hit-slop extension.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitSlop {
    /// The element's real bounds.
    pub bounds: Rect,
    /// Outward extension on each side.
    pub insets: Insets,
}

impl HitSlop {
    /// Create a hit slop extending `bounds` by `insets`.
    pub fn new(bounds: Rect, insets: Insets) -> Self {
        Self { bounds, insets }
    }

    /// The full extended hit target.
    pub fn extended(&self) -> Rect {
        self.bounds + self.insets
    }

    /// Returns `true` if `pt` is inside the extension but outside the real bounds.
    pub fn is_within_slop(&self, pt: Point) -> bool {
        self.extended().contains(pt) && !self.bounds.contains(pt)
    }
}

/// Returns `true` if `pt` is inside `bounds` grown by `retention`.
///
/// Used for press retention: a press stays active while the pointer remains
/// within this region, even after leaving the element itself.
pub fn is_within_retention(bounds: Rect, retention: Insets, pt: Point) -> bool {
    (bounds + retention).contains(pt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asymmetric_insets() {
        let slop = HitSlop::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Insets::new(0.0, 4.0, 8.0, 0.0),
        );
        assert_eq!(slop.extended(), Rect::new(0.0, -4.0, 18.0, 10.0));
        assert!(slop.is_within_slop(Point::new(15.0, 5.0)));
        assert!(slop.is_within_slop(Point::new(5.0, -2.0)));
        assert!(!slop.is_within_slop(Point::new(-1.0, 5.0)));
        assert!(!slop.is_within_slop(Point::new(5.0, 12.0)));
    }

    #[test]
    fn zero_insets_have_no_slop() {
        let slop = HitSlop::new(Rect::new(0.0, 0.0, 10.0, 10.0), Insets::ZERO);
        assert!(!slop.is_within_slop(Point::new(5.0, 5.0)));
        assert!(!slop.is_within_slop(Point::new(11.0, 5.0)));
    }

    #[test]
    fn retention_grows_bounds() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(is_within_retention(bounds, Insets::uniform(20.0), Point::new(25.0, 5.0)));
        assert!(!is_within_retention(bounds, Insets::uniform(20.0), Point::new(31.0, 5.0)));
    }
}
