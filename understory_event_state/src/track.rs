// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer track: start and last positions of a gesture.
//!
//! Drag and swipe both report displacement relative to where the gesture
//! started.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_event_state::track::Track;
//!
//! let mut track = Track::default();
//! track.start(Point::new(10.0, 20.0));
//! assert_eq!(track.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(track.total_offset(Point::new(30.0, 20.0)), Some(Vec2::new(20.0, 0.0)));
//! track.end();
//! assert!(!track.is_active());
//! ```

use kurbo::{Point, Vec2};

/// Start and last recorded pointer positions.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct Track {
    /// Where the gesture started.
    pub start_pos: Option<Point>,
    /// Last recorded position.
    pub last_pos: Option<Point>,
}

impl Track {
    /// Begin tracking at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Record `pos`, returning the movement since the last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Displacement of `current_pos` from the start.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Displacement of the last recorded position from the start.
    pub fn displacement(&self) -> Option<Vec2> {
        self.total_offset(self.last_pos?)
    }

    /// Stop tracking.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` between [`start`](Self::start) and [`end`](Self::end).
    pub fn is_active(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_returns_none_when_idle() {
        let mut track = Track::default();
        assert_eq!(track.update(Point::new(15.0, 25.0)), None);
        assert!(track.last_pos.is_none());
    }

    #[test]
    fn update_without_last_position_only_records() {
        let mut track = Track {
            start_pos: Some(Point::new(10.0, 20.0)),
            last_pos: None,
        };
        let pos = Point::new(15.0, 25.0);
        assert_eq!(track.update(pos), None);
        assert_eq!(track.last_pos, Some(pos));
    }

    #[test]
    fn incremental_and_total_offsets() {
        let mut track = Track::default();
        track.start(Point::new(0.0, 0.0));
        assert_eq!(track.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(track.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(track.displacement(), Some(Vec2::new(8.0, 7.0)));
        assert_eq!(
            track.total_offset(Point::new(-2.0, 1.0)),
            Some(Vec2::new(-2.0, 1.0))
        );
    }

    #[test]
    fn restart_resets_origin() {
        let mut track = Track::default();
        track.start(Point::new(0.0, 0.0));
        track.update(Point::new(10.0, 10.0));
        track.start(Point::new(50.0, 60.0));
        assert_eq!(track.start_pos, track.last_pos);
        assert_eq!(track.displacement(), Some(Vec2::ZERO));
    }

    #[test]
    fn end_on_idle_track_is_harmless() {
        let mut track = Track::default();
        track.end();
        assert!(!track.is_active());
        assert_eq!(track.displacement(), None);
    }
}
