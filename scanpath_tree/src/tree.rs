// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core arena implementation: structure, updates, queries, point probes.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::types::{Element, ElementFlags, ElementId, PlatformActions};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: Element,
}

impl Node {
    fn new(generation: u32, data: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

/// Arena-backed accessibility-tree snapshot.
///
/// The host mirrors its live accessibility tree into this structure and keeps
/// it current by inserting, removing, and updating elements as the platform
/// reports mutations. Handles are generational: a removed element's
/// [`ElementId`] stays stale forever, even when its slot is reused.
///
/// The tree may transiently hold multiple roots (elements with no parent)
/// while the host is mid-update; navigation always anchors on the desktop
/// root the engine was handed at startup.
///
/// ## Example
///
/// ```rust
/// use scanpath_tree::{AxTree, Element, Role};
///
/// let mut tree = AxTree::new();
/// let desktop = tree.insert(None, Element::new(Role::Desktop));
/// let window = tree.insert(Some(desktop), Element::new(Role::Window));
/// assert!(tree.is_alive(window));
/// assert_eq!(tree.parent_of(window), Some(desktop));
/// ```
#[derive(Default)]
pub struct AxTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for AxTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("AxTree")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl AxTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new element as a child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<ElementId>, data: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its entire subtree.
    ///
    /// All ids in the subtree become stale immediately.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent` (or detach it as a root if `None`).
    ///
    /// The element keeps its id and subtree; it is appended to the new
    /// parent's children, i.e. stacked topmost among its new siblings.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An id is live if its slot exists and its generation matches the
    /// generation currently stored in that slot.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Access a live element's properties, or `None` for stale ids.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .map(|node| &node.data)
    }

    /// Returns the parent of a live element, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .and_then(|node| node.parent)
    }

    /// Get the children of an element, or an empty slice if the id is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    /// Iterate ancestors of `id`, nearest first, ending at its root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut current = self.parent_of(id);
        core::iter::from_fn(move || {
            let next = current?;
            current = self.parent_of(next);
            Some(next)
        })
    }

    /// Iterate the subtree rooted at `from` (inclusive) in document order.
    pub fn descendants(&self, from: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack = if self.is_alive(from) {
            alloc::vec![from]
        } else {
            alloc::vec![]
        };
        core::iter::from_fn(move || {
            let id = stack.pop()?;
            // Reverse so the first child is visited first.
            for &child in self.node(id).children.iter().rev() {
                stack.push(child);
            }
            Some(id)
        })
    }

    /// Depth-first search of the subtree rooted at `from` (inclusive) for the
    /// first element satisfying `predicate`, in document order.
    pub fn find(
        &self,
        from: ElementId,
        mut predicate: impl FnMut(&Element) -> bool,
    ) -> Option<ElementId> {
        if !self.is_alive(from) {
            return None;
        }
        let mut stack = alloc::vec![from];
        while let Some(id) = stack.pop() {
            if let Some(el) = self.element(id) {
                if predicate(el) {
                    return Some(id);
                }
                // Reverse so the first child is visited first.
                for &child in self.node(id).children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        None
    }

    /// Update an element's bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Option<Rect>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.bounds = bounds;
        }
    }

    /// Update an element's state flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.flags = flags;
        }
    }

    /// Update an element's standard platform actions.
    pub fn set_actions(&mut self, id: ElementId, actions: PlatformActions) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.actions = actions;
        }
    }

    /// Update an element's accessible name.
    pub fn set_name(&mut self, id: ElementId, name: Option<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.name = name;
        }
    }

    /// Whether `id` names an element the user could be looking at: alive,
    /// flagged visible, and not collapsed to zero area when bounds are known.
    ///
    /// Elements with *unknown* bounds count as visible; the host has simply
    /// not reported geometry yet, and treating them as gone would strand the
    /// focus on transiently un-laid-out content.
    pub fn is_valid_and_visible(&self, id: ElementId) -> bool {
        match self.element(id) {
            Some(el) => {
                el.flags.contains(ElementFlags::VISIBLE)
                    && el
                        .bounds
                        .is_none_or(|r| r.width() > 0.0 && r.height() > 0.0)
            }
            None => false,
        }
    }

    /// The topmost child of `desktop` whose bounds contain `point`.
    ///
    /// Desktop children are stacked in child order with later children on
    /// top, so this scans in reverse. This is the ground truth the engine's
    /// occlusion probe reports: a window is occluded at a point iff some
    /// *other* window is returned here.
    pub fn top_window_at(&self, desktop: ElementId, point: Point) -> Option<ElementId> {
        self.children_of(desktop)
            .iter()
            .rev()
            .copied()
            .find(|&w| self.visible_bounds_contain(w, point))
    }

    /// The deepest visible element under `point` in the subtree rooted at
    /// `from`, preferring later siblings (drawn on top).
    ///
    /// Used to resolve point-scan selections to an element.
    pub fn hit_test(&self, from: ElementId, point: Point) -> Option<ElementId> {
        if !self.visible_bounds_contain(from, point) {
            return None;
        }
        let mut current = from;
        'descend: loop {
            for &child in self.node(current).children.iter().rev() {
                if self.visible_bounds_contain(child, point) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    // --- internals ---

    fn visible_bounds_contain(&self, id: ElementId, point: Point) -> bool {
        match self.element(id) {
            Some(el) => {
                el.flags.contains(ElementFlags::VISIBLE)
                    && el.bounds.is_some_and(|r| r.contains(point))
            }
            None => false,
        }
    }

    /// Access a node; panics if `id` is stale. Internal use only, behind
    /// `is_alive` checks.
    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
