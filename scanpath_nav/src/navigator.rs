// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigator: cursor movement, group descent, and recovery.

use alloc::vec::Vec;
use kurbo::Point;

use scanpath_node::{BuildError, ExitEffect, GroupNode, ItemNode, NodeKind, is_group};
use scanpath_tree::{AxTree, ElementId};

use crate::history::{FocusHistory, HistoryEntry};

/// Ring walk direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Along `next` links.
    Forward,
    /// Along `previous` links.
    Backward,
}

/// Outcome of a movement request.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// The cursor landed on a new node.
    Moved,
    /// The walk reached a windowed container and needs the host to decide
    /// whether it is occluded before landing on it. Answer through
    /// [`Navigator::resume_probe`].
    NeedsProbe(ProbeRequest),
    /// The walk came back around to its starting node without finding a
    /// landing spot. The cursor did not move.
    Stuck,
}

/// An occlusion question for the host.
///
/// The token is one-shot: it answers exactly the walk that issued it, and any
/// navigator state change in between retires it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbeRequest {
    /// Pass this back to [`Navigator::resume_probe`].
    pub token: u64,
    /// The windowed container being considered.
    pub window: ElementId,
    /// The point to hit-test, the candidate's center.
    pub point: Point,
}

/// Outcome of [`Navigator::enter_group`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Enter {
    /// The cursor descended into the focused node's subgroup.
    Entered,
    /// The focused node is not a group; nothing changed.
    NotAGroup,
}

/// Outcome of a recovery pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resync {
    /// Cursor and group were already valid; nothing changed.
    Consistent,
    /// Something was stale and the cursor was repaired in place or by
    /// unwinding history.
    Repaired,
    /// Every recorded context was gone; the cursor restarted at the desktop.
    FellBackToDesktop,
    /// Even the desktop holds nothing scannable. The cursor is unusable
    /// until the tree grows content and a later resync succeeds.
    Lost,
}

/// A suspended ring walk, parked while the host answers an occlusion probe.
#[derive(Clone, Debug)]
struct PendingWalk {
    token: u64,
    direction: Direction,
    /// Sentinel: the node the walk started from, compared structurally.
    start: ItemNode,
    /// Ring position of the candidate being probed.
    candidate: usize,
}

/// The engine's logical cursor: one current group and one current node,
/// plus the focus history behind them.
///
/// Wrapper snapshots inside are rebuilt wholesale whenever the tree shifts;
/// the only identity that persists across rebuilds is structural equality on
/// the underlying element ids.
#[derive(Clone, Debug)]
pub struct Navigator {
    desktop: ElementId,
    group: GroupNode,
    focus: usize,
    history: FocusHistory,
    pending: Option<PendingWalk>,
    next_token: u64,
}

impl Navigator {
    /// Start scanning at the desktop root.
    ///
    /// Fails when the desktop has no interesting children at all.
    pub fn new(tree: &AxTree, desktop: ElementId) -> Result<Self, BuildError> {
        let group = GroupNode::build(tree, desktop)?;
        let focus = group.first_valid_child(tree).unwrap_or(0);
        Ok(Self {
            desktop,
            group,
            focus,
            history: FocusHistory::new(),
            pending: None,
            next_token: 0,
        })
    }

    /// The desktop root this navigator scans under.
    pub fn desktop(&self) -> ElementId {
        self.desktop
    }

    /// The current group.
    pub fn current_group(&self) -> &GroupNode {
        &self.group
    }

    /// The current node.
    pub fn current_node(&self) -> &ItemNode {
        self.group.child(self.focus)
    }

    /// How many groups deep the cursor is below its outermost context.
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    /// Whether the cursor is inside the virtual keyboard.
    pub fn in_keyboard(&self) -> bool {
        self.group.in_keyboard()
    }

    /// Step the cursor to the next valid node in the ring.
    pub fn move_forward(&mut self, tree: &AxTree) -> Step {
        self.move_in(tree, Direction::Forward)
    }

    /// Step the cursor to the previous valid node in the ring.
    pub fn move_backward(&mut self, tree: &AxTree) -> Step {
        self.move_in(tree, Direction::Backward)
    }

    /// Step the cursor one ring position in `direction`.
    ///
    /// Resynchronizes first, then walks the ring from the current node,
    /// skipping candidates that are no longer valid. A windowed candidate
    /// suspends the walk with [`Step::NeedsProbe`]; coming back around to the
    /// starting node yields [`Step::Stuck`].
    pub fn move_in(&mut self, tree: &AxTree, direction: Direction) -> Step {
        self.pending = None;
        let _ = self.resync(tree);
        if !self.group.is_valid_group(tree) {
            return Step::Stuck;
        }
        let start = self.group.child(self.focus).clone();
        let first = self.step_of(self.focus, direction);
        self.consider(tree, first, direction, start)
    }

    /// Answer a pending occlusion probe.
    ///
    /// Returns `None` when `token` is stale — the walk that issued it was
    /// superseded and the answer must not be applied. Otherwise resumes the
    /// walk: an unoccluded candidate becomes the new focus, an occluded one
    /// is skipped and the walk continues (possibly issuing another probe).
    pub fn resume_probe(&mut self, tree: &AxTree, token: u64, occluded: bool) -> Option<Step> {
        if !self.pending.as_ref().is_some_and(|p| p.token == token) {
            return None;
        }
        let pending = self.pending.take()?;
        let candidate = self.group.child(pending.candidate).clone();
        if candidate.is_valid(tree) && !occluded {
            self.focus = pending.candidate;
            return Some(Step::Moved);
        }
        // Occluded, or the candidate died while the host was deciding;
        // either way the walk moves past it.
        let next = self.step_of(pending.candidate, pending.direction);
        Some(self.consider(tree, next, pending.direction, pending.start))
    }

    /// Descend into the focused node's subgroup.
    ///
    /// On success the enclosing context is pushed onto the focus history and
    /// the cursor lands on the subgroup's first valid child. A focused node
    /// that is not a group is a no-op ([`Enter::NotAGroup`]); a group whose
    /// subtree turns out to hold nothing interesting surfaces the build
    /// error and leaves the cursor where it was.
    pub fn enter_group(&mut self, tree: &AxTree) -> Result<Enter, BuildError> {
        let node = self.group.child(self.focus).clone();
        let Some(origin) = node.target else {
            return Ok(Enter::NotAGroup);
        };
        if !node.is_group(tree) {
            return Ok(Enter::NotAGroup);
        }
        let sub = GroupNode::build(tree, origin)?;
        self.pending = None;
        self.history.push(HistoryEntry {
            group: self.group.clone(),
            focus: node,
        });
        self.focus = sub.first_valid_child(tree).unwrap_or(0);
        self.group = sub;
        Ok(Enter::Entered)
    }

    /// Climb out of the current group, restoring the enclosing context.
    ///
    /// The enclosing group is rebuilt from its origin and the previously
    /// focused node re-resolved by structural equality; if it is gone the
    /// cursor snaps to the rebuilt group's first valid child. Unwinding
    /// continues past contexts that no longer exist, ending at the desktop
    /// if need be. Returns the side effect the departed group requires, if
    /// any (hiding the keyboard, dismissing a modal).
    pub fn exit_group(&mut self, tree: &AxTree) -> Option<ExitEffect> {
        self.pending = None;
        let effect = self.group.exit_effect(tree);
        if !self.restore_from_history(tree) {
            let _ = self.fall_back_to_desktop(tree);
        }
        effect
    }

    /// Jump the cursor into an arbitrary container, pushing the current
    /// context so [`Self::exit_group`] comes back here.
    ///
    /// Used for menu-driven jumps such as moving into the virtual keyboard.
    pub fn jump_to(&mut self, tree: &AxTree, origin: ElementId) -> Result<(), BuildError> {
        let sub = GroupNode::build(tree, origin)?;
        self.pending = None;
        self.history.push(HistoryEntry {
            group: self.group.clone(),
            focus: self.group.child(self.focus).clone(),
        });
        self.focus = sub.first_valid_child(tree).unwrap_or(0);
        self.group = sub;
        Ok(())
    }

    /// Move the cursor straight to `target`, rebuilding the group stack
    /// around it.
    ///
    /// Used when the host reports a focus change (e.g. the user tabbed with
    /// a physical keyboard). Returns false and leaves the cursor alone when
    /// the element is not valid and visible or has no enclosing group.
    pub fn focus_element(&mut self, tree: &AxTree, target: ElementId) -> bool {
        if !tree.is_valid_and_visible(target) {
            return false;
        }
        self.pending = None;
        self.rebuild_around(tree, target)
    }

    /// Repair the cursor after tree mutations.
    ///
    /// Preference order: keep the current node if it is still valid; if the
    /// node survives but its group does not, rebuild the group stack around
    /// the node; if the group survives but the node does not, snap to the
    /// group's first valid child; otherwise unwind history and, last, restart
    /// at the desktop. Converges in a bounded number of passes because every
    /// pass that does not finish strictly shrinks the history.
    pub fn resync(&mut self, tree: &AxTree) -> Resync {
        let mut repaired = false;
        let max_passes = self.history.depth() + 2;
        for _ in 0..=max_passes {
            let node = (self.focus < self.group.len())
                .then(|| self.group.child(self.focus).clone());
            let node_valid = node.as_ref().is_some_and(|n| n.is_valid(tree));
            let group_valid = self.group.is_valid_group(tree);
            if node_valid && group_valid {
                return if repaired {
                    Resync::Repaired
                } else {
                    Resync::Consistent
                };
            }
            repaired = true;
            self.pending = None;

            // Node survives, group does not: the node is ground truth.
            if node_valid
                && let Some(target) = node.and_then(|n| n.target)
                && self.rebuild_around(tree, target)
            {
                continue;
            }
            // Group survives, node does not: snap within a rebuilt group.
            if group_valid
                && let Ok(rebuilt) = GroupNode::build(tree, self.group.origin())
                && rebuilt.is_valid_group(tree)
            {
                self.focus = rebuilt.first_valid_child(tree).unwrap_or(0);
                self.group = rebuilt;
                continue;
            }
            // Both gone: unwind.
            if self.restore_from_history(tree) {
                continue;
            }
            return if self.fall_back_to_desktop(tree) {
                Resync::FellBackToDesktop
            } else {
                Resync::Lost
            };
        }
        // The convergence bound tripped; restart rather than loop.
        if self.fall_back_to_desktop(tree) {
            Resync::FellBackToDesktop
        } else {
            Resync::Lost
        }
    }

    fn step_of(&self, index: usize, direction: Direction) -> usize {
        match direction {
            Direction::Forward => self.group.next_of(index),
            Direction::Backward => self.group.prev_of(index),
        }
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Walk the ring from `candidate` until a landing spot, a probe, or the
    /// sentinel. One full lap without landing means stuck.
    fn consider(
        &mut self,
        tree: &AxTree,
        mut candidate: usize,
        direction: Direction,
        start: ItemNode,
    ) -> Step {
        loop {
            let node = self.group.child(candidate);
            if node.same_target(&start) {
                return Step::Stuck;
            }
            if !node.is_valid(tree) {
                candidate = self.step_of(candidate, direction);
                continue;
            }
            if node.kind == NodeKind::Window
                && let Some(window) = node.target
                && let Some(rect) = node.location(tree)
            {
                let token = self.issue_token();
                self.pending = Some(PendingWalk {
                    token,
                    direction,
                    start,
                    candidate,
                });
                return Step::NeedsProbe(ProbeRequest {
                    token,
                    window,
                    point: rect.center(),
                });
            }
            self.focus = candidate;
            return Step::Moved;
        }
    }

    /// Pop history entries until one restores: its origin must still build
    /// a valid group. The recorded focus is re-resolved structurally, with
    /// the first valid child as fallback.
    fn restore_from_history(&mut self, tree: &AxTree) -> bool {
        while let Some(entry) = self.history.pop() {
            let Ok(rebuilt) = GroupNode::build(tree, entry.group.origin()) else {
                continue;
            };
            if !rebuilt.is_valid_group(tree) {
                continue;
            }
            let focus = rebuilt
                .find_same(&entry.focus)
                .filter(|&i| rebuilt.child(i).is_valid(tree))
                .or_else(|| rebuilt.first_valid_child(tree))
                .unwrap_or(0);
            self.group = rebuilt;
            self.focus = focus;
            return true;
        }
        false
    }

    /// Restart scanning at the desktop root, discarding all context.
    fn fall_back_to_desktop(&mut self, tree: &AxTree) -> bool {
        self.history.clear();
        match GroupNode::build(tree, self.desktop) {
            Ok(group) => {
                self.focus = group.first_valid_child(tree).unwrap_or(0);
                self.group = group;
                true
            }
            Err(_) => false,
        }
    }

    /// Reconstruct the group stack around a surviving element: its nearest
    /// group ancestor becomes the current group, higher group ancestors
    /// become history entries with the descent path as their foci.
    fn rebuild_around(&mut self, tree: &AxTree, target: ElementId) -> bool {
        let chain: Vec<ElementId> = tree
            .ancestors(target)
            .filter(|&a| is_group(tree, a))
            .collect();
        let Some((&nearest, outer)) = chain.split_first() else {
            return false;
        };
        let Ok(group) = GroupNode::build(tree, nearest) else {
            return false;
        };
        let probe = ItemNode::for_element(tree, target);
        let Some(focus) = group.find_same(&probe) else {
            return false;
        };

        let mut entries: Vec<HistoryEntry> = Vec::new();
        let mut below = nearest;
        for &ancestor in outer {
            if let Ok(g) = GroupNode::build(tree, ancestor) {
                let step = ItemNode::for_element(tree, below);
                let index = g
                    .find_same(&step)
                    .or_else(|| g.first_valid_child(tree))
                    .unwrap_or(0);
                let focus = g.child(index).clone();
                entries.push(HistoryEntry { group: g, focus });
            }
            below = ancestor;
        }

        self.history.clear();
        // Entries were collected nearest-first; the stack wants the
        // outermost context at the bottom.
        for entry in entries.into_iter().rev() {
            self.history.push(entry);
        }
        self.group = group;
        self.focus = focus;
        true
    }
}
