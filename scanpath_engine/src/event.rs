// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inbound events.

use kurbo::Point;

use scanpath_node::Action;
use scanpath_tree::ElementId;

/// The physical (or emulated) switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwitchKey {
    /// Advance to the next node.
    Next,
    /// Go back to the previous node.
    Previous,
    /// Activate the focused node.
    Select,
}

/// A changed user setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Setting {
    /// Turn auto-scan on or off.
    AutoScanEnabled(bool),
    /// The primary auto-scan interval, ms. Zero is rejected.
    PrimaryScanInterval(u64),
    /// The keyboard auto-scan interval, ms; `None` falls back to primary.
    /// `Some(0)` is rejected.
    KeyboardScanInterval(Option<u64>),
}

/// Everything the host can tell the engine.
///
/// The engine is single-threaded and event-driven: each event is handled to
/// completion before the next, and all timing arrives as explicit
/// [`Event::Tick`] timestamps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    /// The platform moved input focus to an element.
    FocusChanged {
        /// The newly focused element.
        target: ElementId,
    },
    /// The accessibility tree changed shape or state.
    TreeChanged,
    /// Something scrolled; locations may have moved without the tree
    /// changing shape.
    Scroll,
    /// The user pressed a switch.
    SwitchPressed(SwitchKey),
    /// The user picked an action on the menu surface.
    MenuSelection(Action),
    /// The point-scan sweep committed a coordinate.
    PointChosen(Point),
    /// The host's answer to a [`Host::request_probe`](crate::Host::request_probe).
    ProbeResult {
        /// The token from the probe request.
        token: u64,
        /// Whether the probed window is covered at the probed point.
        occluded: bool,
    },
    /// Time passed; `now_ms` is the host's monotonic clock.
    Tick {
        /// Current time in ms.
        now_ms: u64,
    },
    /// A user setting changed.
    SettingChanged(Setting),
}
