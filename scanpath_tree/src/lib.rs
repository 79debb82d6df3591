// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Tree: an arena-backed snapshot of a platform accessibility tree.
//!
//! The switch-access engine never talks to live platform objects. The host
//! mirrors its accessibility tree into an [`AxTree`], and the engine rebuilds
//! its own navigation structures from that snapshot whenever the host reports
//! a mutation. This crate owns the snapshot:
//!
//! - [`ElementId`]: a generational handle. Removing an element makes every
//!   outstanding id for it stale; stale ids are always detectable and every
//!   accessor returns `None` (or an empty slice) for them instead of
//!   panicking.
//! - [`Element`]: the per-element accessibility properties the engine
//!   consumes — role, optional name, optional screen bounds, state flags, and
//!   the standard platform action set.
//! - [`AxTree`]: the arena itself, with structural queries (children, parent,
//!   depth-first traversal, predicate search) and the two geometry probes the
//!   engine needs: [`AxTree::top_window_at`] (window-occlusion ground truth)
//!   and [`AxTree::hit_test`] (point-scan target resolution).
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use scanpath_tree::{AxTree, Element, Role};
//!
//! let mut tree = AxTree::new();
//! let desktop = tree.insert(None, Element::new(Role::Desktop));
//! let window = tree.insert(
//!     Some(desktop),
//!     Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)),
//! );
//! let button = tree.insert(
//!     Some(window),
//!     Element::new(Role::Button).with_bounds(Rect::new(10.0, 10.0, 90.0, 40.0)),
//! );
//!
//! assert_eq!(tree.children_of(desktop), &[window]);
//! assert_eq!(tree.parent_of(button), Some(window));
//!
//! tree.remove(window);
//! assert!(!tree.is_alive(button), "removing a subtree stales its ids");
//! ```
//!
//! ## Location is optional
//!
//! `Element::bounds` is `Option<Rect>`: an element whose geometry the host
//! has not reported yet simply has no location. Geometry probes skip such
//! elements; nothing in this crate requires bounds to exist.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::AxTree;
pub use types::{Element, ElementFlags, ElementId, PlatformActions, Role};
