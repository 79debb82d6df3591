// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classifier: which elements become nodes, and which kind of node.
//!
//! Classification is pure and recomputed on demand. The tree mutates
//! asynchronously underneath the engine, so nothing in this module caches a
//! verdict; a stale answer is impossible because there is no stored answer.

use alloc::vec::Vec;

use scanpath_tree::{AxTree, ElementFlags, ElementId, PlatformActions, Role};

/// The closed set of node variants.
///
/// Every operation over nodes dispatches on this enum through exhaustive
/// matches; adding a variant forces every consumer to handle it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain actionable element (button, link, checkbox, …).
    Basic,
    /// An editable text field.
    TextInput,
    /// A slider or other continuous value control.
    Slider,
    /// A combo box.
    ComboBox,
    /// A tab in a tab strip.
    Tab,
    /// A windowed container; stepping onto one is subject to the
    /// occlusion probe.
    Window,
    /// A key of the virtual keyboard, activated by a synthesized tap.
    KeyboardKey,
    /// The synthesized group terminal; selecting it exits the group.
    /// References no underlying element.
    BackButton,
}

/// One classification rule: predicate plus the kind it produces.
type Rule = (fn(&AxTree, ElementId) -> bool, NodeKind);

/// Ordered rule table; the first matching rule wins.
///
/// Order matters: an editable combo box must classify as a text input, and a
/// key inside the keyboard must never fall through to `Basic`.
const RULES: &[Rule] = &[
    (is_keyboard_key, NodeKind::KeyboardKey),
    (is_text_input, NodeKind::TextInput),
    (is_slider, NodeKind::Slider),
    (is_combo_box, NodeKind::ComboBox),
    (is_tab, NodeKind::Tab),
    (is_window_like, NodeKind::Window),
];

/// Classify an element into exactly one [`NodeKind`].
///
/// Falls back to [`NodeKind::Basic`] when no rule matches. The synthesized
/// [`NodeKind::BackButton`] is never produced here; it has no element.
pub fn classify(tree: &AxTree, id: ElementId) -> NodeKind {
    for &(predicate, kind) in RULES {
        if predicate(tree, id) {
            return kind;
        }
    }
    NodeKind::Basic
}

fn role_of(tree: &AxTree, id: ElementId) -> Option<Role> {
    tree.element(id).map(|el| el.role)
}

fn is_keyboard_key(tree: &AxTree, id: ElementId) -> bool {
    role_of(tree, id) == Some(Role::Key)
}

fn is_text_input(tree: &AxTree, id: ElementId) -> bool {
    tree.element(id).is_some_and(|el| {
        el.role == Role::TextField || el.flags.contains(ElementFlags::EDITABLE)
    })
}

fn is_slider(tree: &AxTree, id: ElementId) -> bool {
    role_of(tree, id) == Some(Role::Slider)
}

fn is_combo_box(tree: &AxTree, id: ElementId) -> bool {
    role_of(tree, id) == Some(Role::ComboBox)
}

fn is_tab(tree: &AxTree, id: ElementId) -> bool {
    role_of(tree, id) == Some(Role::Tab)
}

fn is_window_like(tree: &AxTree, id: ElementId) -> bool {
    matches!(
        role_of(tree, id),
        Some(Role::Window | Role::Keyboard | Role::Desktop)
    )
}

/// Container roles that are never directly actionable, however they are
/// flagged. They can still be groups.
fn is_container_role(role: Role) -> bool {
    matches!(
        role,
        Role::Desktop
            | Role::Window
            | Role::Pane
            | Role::WebArea
            | Role::Group
            | Role::List
            | Role::TabList
            | Role::Menu
            | Role::Keyboard
    )
}

/// Whether the user could act on this element directly.
fn is_actionable(tree: &AxTree, id: ElementId) -> bool {
    let Some(el) = tree.element(id) else {
        return false;
    };
    if is_container_role(el.role) {
        return false;
    }
    if !el.flags.contains(ElementFlags::ENABLED) || !tree.is_valid_and_visible(id) {
        return false;
    }
    // Keyboard keys are activated by a synthesized tap at their center, so
    // they qualify without exposing any platform action of their own.
    if el.role == Role::Key {
        return true;
    }
    el.actions.intersects(
        PlatformActions::CLICK | PlatformActions::INCREMENT | PlatformActions::DECREMENT,
    ) || el
        .flags
        .intersects(ElementFlags::FOCUSABLE | ElementFlags::EDITABLE)
}

/// Collect the elements of `id`'s subtree that should surface as children of
/// `id`'s group, in document order.
///
/// Interesting elements surface directly. Uninteresting ones (pure layout
/// wrappers, containers with a single interesting descendant) are flattened:
/// the walk descends through them and surfaces whatever they contain. A
/// subtree with no interesting descendants contributes nothing.
pub fn interesting_children(tree: &AxTree, id: ElementId) -> Vec<ElementId> {
    collect_surfaced(tree, id)
}

/// One in-progress container during the post-order walk: which child comes
/// next, and what its subtree has surfaced so far.
struct Frame {
    id: ElementId,
    next_child: usize,
    surfaced: Vec<ElementId>,
}

impl Frame {
    fn new(id: ElementId) -> Self {
        Self {
            id,
            next_child: 0,
            surfaced: Vec::new(),
        }
    }
}

/// Post-order walk with an explicit stack; each element in the subtree is
/// visited exactly once. Actionable children surface directly. A finished
/// container surfaces as one entry when it qualifies as a group, otherwise
/// its own surfaced list is spliced into its parent's (the flattening).
fn collect_surfaced(tree: &AxTree, root: ElementId) -> Vec<ElementId> {
    let mut stack = alloc::vec![Frame::new(root)];
    while let Some(top) = stack.last_mut() {
        if let Some(&child) = tree.children_of(top.id).get(top.next_child) {
            top.next_child += 1;
            if is_actionable(tree, child) {
                top.surfaced.push(child);
            } else {
                stack.push(Frame::new(child));
            }
            continue;
        }
        let Some(done) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => {
                if qualifies_as_group(tree, done.id, done.surfaced.len()) {
                    parent.surfaced.push(done.id);
                } else {
                    parent.surfaced.extend(done.surfaced);
                }
            }
            None => return done.surfaced,
        }
    }
    Vec::new()
}

/// The group threshold: windowed containers group around anything, other
/// containers only around two or more items — a wrapper holding a single
/// item is flattened away rather than becoming a one-child group the user
/// would have to drill through.
fn qualifies_as_group(tree: &AxTree, id: ElementId, surfaced: usize) -> bool {
    if !tree.is_valid_and_visible(id) {
        return false;
    }
    if is_window_like(tree, id) {
        surfaced > 0
    } else {
        surfaced >= 2
    }
}

/// Whether this element should become a node at all: actionable, or a
/// container qualifying as a group of interesting descendants.
pub fn is_interesting(tree: &AxTree, id: ElementId) -> bool {
    if !tree.is_valid_and_visible(id) {
        return false;
    }
    is_actionable(tree, id) || is_group(tree, id)
}

/// Whether selecting this element enters a sub-traversal instead of
/// performing an action.
///
/// Computed, never stored: the answer changes as the subtree mutates.
pub fn is_group(tree: &AxTree, id: ElementId) -> bool {
    qualifies_as_group(tree, id, interesting_children(tree, id).len())
}

/// Whether this element sits inside (or is) the virtual keyboard.
///
/// The navigator uses this to toggle the auto-scan keyboard interval.
pub fn in_keyboard(tree: &AxTree, id: ElementId) -> bool {
    role_of(tree, id) == Some(Role::Keyboard)
        || tree
            .ancestors(id)
            .any(|a| role_of(tree, a) == Some(Role::Keyboard))
}
