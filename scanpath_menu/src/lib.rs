// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Menu: the action menu state machine and the point scanner.
//!
//! When the user selects a node with more than one thing to do, the engine
//! opens a menu of its symbolic actions. This crate owns that menu's state:
//!
//! - [`MenuKind`] names the menu surfaces (main, text navigation, point
//!   scan) and carries each one's action allow-list.
//! - [`displayed_actions`] computes what a menu shows: the node's own
//!   actions filtered by the allow-list with their order preserved, then the
//!   global actions appended last. A menu never shows a node action the node
//!   did not offer.
//! - [`MenuStack`] is the open-menu stack. Opening pushes; dispatching an
//!   action pops one level unless the action keeps its menu open (repeatable
//!   actions like increment) or pushes a submenu (text navigation); closing
//!   empties the stack.
//! - [`route`] is the dispatch priority: global handlers first, point-scan
//!   handlers while the point scanner is active, the node's own handler
//!   last. The order is an explicit list, tested as such.
//! - [`PointScanner`] runs the coordinate-based fallback mode: pick a
//!   point, offer a left/right click menu anchored at a 1×1 rect there,
//!   synthesize the click, and return to selecting.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod menu;
mod point_scan;

pub use menu::{
    AfterDispatch, Dispatch, MenuKind, MenuStack, OpenMenu, Route, displayed_actions, route,
};
pub use point_scan::{PointScanPhase, PointScanner};
