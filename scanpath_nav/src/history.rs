// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus history: the stack of group snapshots behind "exit group".

use smallvec::SmallVec;

use scanpath_node::{GroupNode, ItemNode};

/// One snapshot taken at the moment of descending into a subgroup.
///
/// Both fields are value snapshots; by the time the entry is restored the
/// tree may have recreated every wrapper. Restoration rebuilds the group
/// from its origin element and re-resolves `focus` by structural equality
/// against the rebuilt children.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// The group that was current before descending.
    pub group: GroupNode,
    /// The node that was focused inside it.
    pub focus: ItemNode,
}

/// LIFO stack of [`HistoryEntry`] snapshots.
///
/// Pushed only when descending (enter-group or jump), popped only when
/// ascending. The navigator owns the discipline; this type just keeps the
/// stack honest.
#[derive(Clone, Debug, Default)]
pub struct FocusHistory {
    stack: SmallVec<[HistoryEntry; 4]>,
}

impl FocusHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a descent.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.stack.push(entry);
    }

    /// Unwind one level, if any.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.stack.pop()
    }

    /// Current depth of the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack is empty (the current group is the outermost one).
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop every entry. Used when the navigator rebuilds the group stack
    /// from scratch around a surviving node.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
