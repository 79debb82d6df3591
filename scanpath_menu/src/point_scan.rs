// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The coordinate-based point scanner.
//!
//! Point scan is the fallback mode for content the item scanner cannot
//! reach: the user sweeps to an (x, y) coordinate instead of a node, then
//! picks a left or right click from a tiny menu anchored at that point.

use kurbo::{Point, Rect};

/// Where the point scanner is in its cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PointScanPhase {
    /// Mode is off; item scanning is active.
    #[default]
    Inactive,
    /// Sweeping: waiting for the user to commit a coordinate.
    Selecting,
    /// A point is chosen and the click menu is up.
    MenuOpen {
        /// The committed coordinate.
        point: Point,
    },
}

/// The point-scan mode state machine.
///
/// `Inactive -> Selecting -> MenuOpen -> Selecting -> ...` until the mode is
/// switched off. The engine owns the actual click synthesis; this type only
/// tracks the cycle and the committed coordinate.
#[derive(Copy, Clone, Debug, Default)]
pub struct PointScanner {
    phase: PointScanPhase,
}

impl PointScanner {
    /// A scanner in the inactive phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn phase(&self) -> PointScanPhase {
        self.phase
    }

    /// Whether the mode is active (selecting or menu up).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase(), PointScanPhase::Inactive)
    }

    /// Enter the mode and start sweeping.
    pub fn start(&mut self) {
        self.phase = PointScanPhase::Selecting;
    }

    /// Leave the mode entirely.
    pub fn stop(&mut self) {
        self.phase = PointScanPhase::Inactive;
    }

    /// Commit a coordinate while sweeping.
    ///
    /// Returns the anchor for the click menu, a 1×1 rect at the point.
    /// Ignored (returns `None`) outside the selecting phase.
    pub fn choose_point(&mut self, point: Point) -> Option<Rect> {
        if self.phase() != PointScanPhase::Selecting {
            return None;
        }
        self.phase = PointScanPhase::MenuOpen { point };
        Some(Rect::from_origin_size(point, (1.0, 1.0)))
    }

    /// The committed coordinate, while the click menu is up.
    pub fn chosen_point(&self) -> Option<Point> {
        match self.phase() {
            PointScanPhase::MenuOpen { point } => Some(point),
            _ => None,
        }
    }

    /// A click was synthesized (or the menu dismissed); sweep again.
    pub fn resume_selecting(&mut self) {
        if self.is_active() {
            self.phase = PointScanPhase::Selecting;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle() {
        let mut scanner = PointScanner::new();
        assert!(!scanner.is_active());
        assert_eq!(scanner.choose_point(Point::new(5.0, 5.0)), None);

        scanner.start();
        assert_eq!(scanner.phase(), PointScanPhase::Selecting);

        let anchor = scanner.choose_point(Point::new(120.0, 80.0)).unwrap();
        assert_eq!(anchor, Rect::new(120.0, 80.0, 121.0, 81.0));
        assert_eq!(scanner.chosen_point(), Some(Point::new(120.0, 80.0)));
        // Choosing again while the menu is up is ignored.
        assert_eq!(scanner.choose_point(Point::new(0.0, 0.0)), None);

        scanner.resume_selecting();
        assert_eq!(scanner.phase(), PointScanPhase::Selecting);
        assert_eq!(scanner.chosen_point(), None);

        scanner.stop();
        assert!(!scanner.is_active());
        // Resuming while inactive stays inactive.
        scanner.resume_selecting();
        assert!(!scanner.is_active());
    }
}
