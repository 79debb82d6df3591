// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Scan: the auto-scan interval timer.
//!
//! Auto-scan advances the switch-access cursor on a cadence so a user with a
//! single switch never has to press "next". [`AutoScan`] is that cadence as a
//! pure state machine over host-supplied `u64` millisecond timestamps: the
//! host calls [`AutoScan::poll`] from its own timing source and the state
//! machine reports when a tick is due. No OS timers, no clock reads, fully
//! deterministic under test.
//!
//! ```
//! use scanpath_scan::AutoScan;
//!
//! let mut scan = AutoScan::new();
//! assert!(scan.set_primary_interval(800, 0));
//! scan.set_enabled(true, 0);
//!
//! assert!(!scan.poll(799));
//! assert!(scan.poll(800)); // due: the engine moves focus forward
//! assert!(scan.poll(1600)); // and the next tick was scheduled
//! ```
//!
//! This crate is `no_std` and has no dependencies.

#![no_std]

mod auto_scan;

pub use auto_scan::AutoScan;
