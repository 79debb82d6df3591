// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Node: the polymorphic node layer of the switch-access engine.
//!
//! Raw accessibility elements are too fine-grained to scan one by one: a page
//! has hundreds of them, most structural. This crate decides which elements
//! become scannable *nodes*, what kind of node each one is, which symbolic
//! actions it offers, and how a container's nodes are linked into the
//! circular ring the navigator steps through.
//!
//! - [`NodeKind`]: a closed enum of node variants. Every operation dispatches
//!   through exhaustive matches, so adding a kind is a compile-time audit of
//!   the whole crate.
//! - [`classify`]: an ordered `(predicate, kind)` rule table; the first
//!   matching rule wins. [`is_interesting`] and [`is_group`] are pure
//!   functions over `(&AxTree, ElementId)` and are recomputed on demand —
//!   nothing here caches classification across tree mutations.
//! - [`Action`]: the symbolic action vocabulary shown to the user, derived
//!   per node from its kind, its element's platform actions, and its
//!   scrollable ancestry.
//! - [`ItemNode`] / [`GroupNode`]: cheap value snapshots wrapping element
//!   ids. Wrappers are rebuilt wholesale on every resynchronization; identity
//!   across rebuilds is *structural* ([`ItemNode::same_target`]), never
//!   pointer identity.
//!
//! ## Group rings
//!
//! [`GroupNode::build`] walks a container's subtree with the interesting
//! filter, flattens purely structural wrappers, appends the synthesized
//! back-button terminal (except on the desktop root), and links the children
//! into a circular next/previous ring. A group with zero interesting children
//! is a build error ([`BuildError::EmptyGroup`]), never an empty ring.
//!
//! ```rust
//! use kurbo::Rect;
//! use scanpath_node::{GroupNode, NodeKind};
//! use scanpath_tree::{AxTree, Element, PlatformActions, Role};
//!
//! let mut tree = AxTree::new();
//! let desktop = tree.insert(None, Element::new(Role::Desktop));
//! let window = tree.insert(
//!     Some(desktop),
//!     Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
//! );
//! for i in 0..3 {
//!     let x = 10.0 + 50.0 * f64::from(i);
//!     tree.insert(
//!         Some(window),
//!         Element::new(Role::Button)
//!             .with_bounds(Rect::new(x, 10.0, x + 40.0, 40.0))
//!             .with_actions(PlatformActions::CLICK),
//!     );
//! }
//!
//! let group = GroupNode::build(&tree, window).unwrap();
//! // Three buttons plus the synthesized back button.
//! assert_eq!(group.len(), 4);
//! assert_eq!(group.child(group.len() - 1).kind, NodeKind::BackButton);
//! assert!(group.ring_is_well_formed());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod action;
mod classify;
mod group;

pub use action::{Action, ActionList, GLOBAL_ACTIONS, actions_for};
pub use classify::{
    NodeKind, classify, in_keyboard, interesting_children, is_group, is_interesting,
};
pub use group::{BuildError, ExitEffect, GroupNode, ItemNode};
