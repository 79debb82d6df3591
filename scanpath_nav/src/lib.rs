// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Nav: the item navigator.
//!
//! The navigator owns the engine's logical cursor: one *current group* (a
//! ring of scannable nodes) and one *current node* inside it. Everything else
//! in this crate exists to keep that pair meaningful while the underlying
//! accessibility tree mutates out from under it:
//!
//! - [`Navigator::move_forward`] / [`Navigator::move_backward`] step the
//!   ring, skipping invalid candidates and — via an explicit probe
//!   request/resume pair — windowed containers that are currently occluded.
//!   A walk carries its starting node as a sentinel: coming back around to it
//!   without finding a landing spot reports [`Step::Stuck`] instead of
//!   spinning forever on an all-background desktop.
//! - [`Navigator::enter_group`] / [`Navigator::exit_group`] descend into and
//!   climb out of sub-traversals, recording each descent in the
//!   [`FocusHistory`] so ascent can restore the enclosing context by
//!   structural equality — the original wrapper objects are long gone by
//!   then.
//! - [`Navigator::resync`] is the recovery pass: invoked before every step
//!   and on every tree mutation, it repairs the cursor in bounded time and
//!   only gives up ([`Resync::Lost`]) when the desktop itself holds nothing
//!   scannable.
//!
//! ## Asynchronous probes
//!
//! Occlusion is decided by the host (a geometry hit test against the live
//! tree), so a step that lands on a windowed container cannot complete
//! synchronously. The navigator hands back a [`ProbeRequest`] with a
//! one-shot token; the host answers through [`Navigator::resume_probe`].
//! Any state change in between — a resync, a new walk, a group switch —
//! invalidates the token, and a late answer is dropped on the floor rather
//! than applied to a world it no longer describes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod history;
mod navigator;

pub use history::{FocusHistory, HistoryEntry};
pub use navigator::{Direction, Enter, Navigator, ProbeRequest, Resync, Step};
