// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item nodes and group rings.
//!
//! A [`GroupNode`] is the unit of traversal: an ordered ring of [`ItemNode`]s
//! built from one container element. Wrappers here are value snapshots — the
//! navigator rebuilds them on every resynchronization and relies on
//! [`ItemNode::same_target`] to recognize "the same place" across rebuilds.

use alloc::vec::Vec;
use kurbo::Rect;

use scanpath_tree::{AxTree, ElementFlags, ElementId, Role};

use crate::action::{Action, ActionList, actions_for};
use crate::classify::{self, NodeKind, interesting_children};

/// Side length of the synthesized back button's square anchor.
const BACK_BUTTON_SIZE: f64 = 24.0;

/// Errors raised while building a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// The container has no interesting descendants; a group must never be
    /// empty. Callers fall back to the recovery pass.
    EmptyGroup {
        /// The container the build started from.
        origin: ElementId,
    },
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyGroup { origin } => {
                write!(f, "group {origin:?} has no interesting children")
            }
        }
    }
}

/// One scannable node: a leaf-or-group item inside a group's ring.
///
/// Wraps zero or one underlying element; the synthesized back button wraps
/// none. Equality of *place* is [`Self::same_target`], not `==` on wrapper
/// values, because wrappers are recreated wholesale during resynchronization.
#[derive(Clone, Debug)]
pub struct ItemNode {
    /// The underlying element, if any.
    pub target: Option<ElementId>,
    /// The node's classified kind.
    pub kind: NodeKind,
    /// Location for synthesized nodes that have no element.
    synth_location: Option<Rect>,
}

impl ItemNode {
    /// Wrap a live element, classifying it.
    pub fn for_element(tree: &AxTree, id: ElementId) -> Self {
        Self {
            target: Some(id),
            kind: classify::classify(tree, id),
            synth_location: None,
        }
    }

    /// The synthesized back-button terminal, anchored at the top-right corner
    /// of the group it closes (when that is known).
    pub fn back_button(group_bounds: Option<Rect>) -> Self {
        Self {
            target: None,
            kind: NodeKind::BackButton,
            synth_location: group_bounds.map(|r| {
                Rect::new(r.x1, r.y0 - BACK_BUTTON_SIZE, r.x1 + BACK_BUTTON_SIZE, r.y0)
            }),
        }
    }

    /// Screen location, or `None` when unknown. Never panics on missing
    /// geometry.
    pub fn location(&self, tree: &AxTree) -> Option<Rect> {
        match self.target {
            Some(id) => tree.element(id).and_then(|el| el.bounds),
            None => self.synth_location,
        }
    }

    /// The node's ordered symbolic action set.
    pub fn actions(&self, tree: &AxTree) -> ActionList {
        match self.target {
            Some(id) => actions_for(tree, id, self.kind),
            None => {
                let mut list = ActionList::new();
                list.push(Action::Back);
                list
            }
        }
    }

    /// Whether the node is currently valid and visible.
    ///
    /// The back button is as valid as the group that owns it; element nodes
    /// follow their element.
    pub fn is_valid(&self, tree: &AxTree) -> bool {
        match self.target {
            Some(id) => tree.is_valid_and_visible(id),
            None => true,
        }
    }

    /// Whether selecting this node enters a sub-traversal.
    pub fn is_group(&self, tree: &AxTree) -> bool {
        match self.target {
            Some(id) => classify::is_group(tree, id),
            None => false,
        }
    }

    /// Structural equality: same underlying element, or the same synthetic
    /// composition. This is what survives wrapper recreation.
    pub fn same_target(&self, other: &Self) -> bool {
        match (self.target, other.target) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.kind == other.kind,
            _ => false,
        }
    }
}

/// Side effect a group requires on exit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitEffect {
    /// The group is a modal surface; leaving it requires a synthesized
    /// cancel (Escape) key.
    DismissModal,
    /// The group is the virtual keyboard; leaving it hides the keyboard.
    HideKeyboard,
}

#[derive(Clone, Debug)]
struct RingEntry {
    node: ItemNode,
    next: usize,
    prev: usize,
}

/// A group's local traversal scope: an ordered, circular ring of children.
///
/// Built by walking the origin's subtree with the interesting filter and
/// appending the back-button terminal (except on the desktop root). The ring
/// links are set for every child before the group is handed to callers; a
/// group with zero interesting children never constructs.
#[derive(Clone, Debug)]
pub struct GroupNode {
    origin: ElementId,
    entries: Vec<RingEntry>,
    in_keyboard: bool,
}

impl GroupNode {
    /// Build the group for `origin`.
    ///
    /// Returns [`BuildError::EmptyGroup`] when the subtree holds nothing
    /// interesting.
    pub fn build(tree: &AxTree, origin: ElementId) -> Result<Self, BuildError> {
        let children = interesting_children(tree, origin);
        if children.is_empty() {
            return Err(BuildError::EmptyGroup { origin });
        }

        let mut nodes: Vec<ItemNode> = children
            .iter()
            .map(|&id| ItemNode::for_element(tree, id))
            .collect();

        let is_desktop = tree.element(origin).is_some_and(|el| el.role == Role::Desktop);
        if !is_desktop {
            let bounds = union_bounds(tree, &nodes);
            nodes.push(ItemNode::back_button(bounds));
        }

        let len = nodes.len();
        let entries = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| RingEntry {
                node,
                next: (i + 1) % len,
                prev: (i + len - 1) % len,
            })
            .collect();

        let group = Self {
            origin,
            entries,
            in_keyboard: classify::in_keyboard(tree, origin),
        };
        debug_assert!(group.ring_is_well_formed(), "ring must close on itself");
        Ok(group)
    }

    /// The container element this group was built from.
    pub fn origin(&self) -> ElementId {
        self.origin
    }

    /// Number of children, including the back-button terminal.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a group has at least one child by construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The child at ring position `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds; ring positions come from this
    /// group's own stepping methods.
    pub fn child(&self, index: usize) -> &ItemNode {
        &self.entries[index].node
    }

    /// Iterate children in ring order.
    pub fn children(&self) -> impl Iterator<Item = &ItemNode> {
        self.entries.iter().map(|e| &e.node)
    }

    /// Ring position after `index`.
    pub fn next_of(&self, index: usize) -> usize {
        self.entries[index].next
    }

    /// Ring position before `index`.
    pub fn prev_of(&self, index: usize) -> usize {
        self.entries[index].prev
    }

    /// Position of the back-button terminal, if this group has one.
    pub fn back_button_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.node.kind == NodeKind::BackButton)
    }

    /// Whether this group lives inside the virtual keyboard.
    pub fn in_keyboard(&self) -> bool {
        self.in_keyboard
    }

    /// Find the ring position of a structurally equal node.
    pub fn find_same(&self, node: &ItemNode) -> Option<usize> {
        self.entries.iter().position(|e| e.node.same_target(node))
    }

    /// First child that is currently valid and visible, skipping the
    /// back-button terminal.
    pub fn first_valid_child(&self, tree: &AxTree) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.node.kind != NodeKind::BackButton && e.node.is_valid(tree))
    }

    /// A group is usable while its origin is alive and at least one real
    /// child is valid and visible.
    pub fn is_valid_group(&self, tree: &AxTree) -> bool {
        tree.is_alive(self.origin) && self.first_valid_child(tree).is_some()
    }

    /// Union of the children's known locations; the group highlight rect.
    pub fn bounds(&self, tree: &AxTree) -> Option<Rect> {
        union_bounds(tree, self.entries.iter().map(|e| &e.node))
    }

    /// The side effect leaving this group requires, if any.
    pub fn exit_effect(&self, tree: &AxTree) -> Option<ExitEffect> {
        let el = tree.element(self.origin)?;
        if el.role == Role::Keyboard {
            Some(ExitEffect::HideKeyboard)
        } else if el.flags.contains(ElementFlags::MODAL) {
            Some(ExitEffect::DismissModal)
        } else {
            None
        }
    }

    /// Check the ring invariant: `child(i).next.prev == i` for every child
    /// and the links are circular.
    pub fn ring_is_well_formed(&self) -> bool {
        let len = self.entries.len();
        if len == 0 {
            return false;
        }
        for (i, e) in self.entries.iter().enumerate() {
            if e.next >= len || e.prev >= len {
                return false;
            }
            if self.entries[e.next].prev != i || self.entries[e.prev].next != i {
                return false;
            }
        }
        // A single walk along `next` must visit every entry and return home.
        let mut seen = 1_usize;
        let mut at = self.entries[0].next;
        while at != 0 {
            seen += 1;
            if seen > len {
                return false;
            }
            at = self.entries[at].next;
        }
        seen == len
    }
}

fn union_bounds<'a>(
    tree: &AxTree,
    nodes: impl IntoIterator<Item = &'a ItemNode>,
) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for node in nodes {
        // Unknown locations are skipped, not fatal.
        if let Some(r) = node.location(tree) {
            acc = Some(match acc {
                Some(u) => u.union(r),
                None => r,
            });
        }
    }
    acc
}
