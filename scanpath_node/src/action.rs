// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbolic actions and their per-node derivation.

use smallvec::SmallVec;

use scanpath_tree::{AxTree, ElementFlags, ElementId, PlatformActions};

use crate::classify::NodeKind;

/// The symbolic action vocabulary the user can trigger on a node.
///
/// These are what the action menu lists and what the engine dispatches; the
/// engine translates them into platform requests (injected keys, clicks,
/// standard platform actions) when performed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Activate the node (default action).
    Select,
    /// Exit the current group (the synthesized terminal's sole action).
    Back,
    /// Jump focus into the virtual keyboard.
    Keyboard,
    /// Switch from item scanning to point scanning.
    PointScan,
    /// Switch from point scanning back to item scanning.
    ItemScan,
    /// Open the switch-access settings surface.
    Settings,
    /// Increment a value control.
    Increment,
    /// Decrement a value control.
    Decrement,
    /// Scroll the nearest scrollable ancestor up.
    ScrollUp,
    /// Scroll the nearest scrollable ancestor down.
    ScrollDown,
    /// Scroll the nearest scrollable ancestor left.
    ScrollLeft,
    /// Scroll the nearest scrollable ancestor right.
    ScrollRight,
    /// Cut the selection to the clipboard.
    Cut,
    /// Copy the selection to the clipboard.
    Copy,
    /// Paste the clipboard contents.
    Paste,
    /// Open the text-navigation submenu.
    TextNavigation,
    /// Move the cursor to the start of the text.
    JumpToTextStart,
    /// Move the cursor to the end of the text.
    JumpToTextEnd,
    /// Move the cursor back one character.
    MoveBackwardOneChar,
    /// Move the cursor forward one character.
    MoveForwardOneChar,
    /// Move the cursor back one word.
    MoveBackwardOneWord,
    /// Move the cursor forward one word.
    MoveForwardOneWord,
    /// Move the cursor up one line.
    MoveUpOneLine,
    /// Move the cursor down one line.
    MoveDownOneLine,
    /// Begin a text selection at the cursor.
    StartTextSelection,
    /// End the text selection at the cursor.
    EndTextSelection,
    /// Synthesize a left click (point-scan mode).
    LeftClick,
    /// Synthesize a right click (point-scan mode).
    RightClick,
}

/// Global actions appended to every item-scan menu, after the node's own.
///
/// These never come from a node's action set; the menu layer appends them
/// explicitly (point-scan menus append [`Action::ItemScan`] instead of
/// [`Action::PointScan`]).
pub const GLOBAL_ACTIONS: &[Action] = &[Action::Settings, Action::PointScan];

/// Ordered action list with inline capacity covering every non-text-input
/// node.
pub type ActionList = SmallVec<[Action; 8]>;

fn push_unique(list: &mut ActionList, action: Action) {
    if !list.contains(&action) {
        list.push(action);
    }
}

/// Derive the ordered symbolic action set for an element of the given kind.
///
/// The order here is the order the menu presents: kind-specific actions
/// first, then extras implied by the element's platform actions, then scroll
/// actions contributed by scrollable ancestry.
pub fn actions_for(tree: &AxTree, id: ElementId, kind: NodeKind) -> ActionList {
    let mut list = ActionList::new();
    match kind {
        NodeKind::BackButton => {
            list.push(Action::Back);
            return list;
        }
        NodeKind::KeyboardKey => {
            // Keys are tapped, never menu-driven.
            list.push(Action::Select);
            return list;
        }
        NodeKind::TextInput => {
            list.push(Action::Select);
            list.push(Action::Keyboard);
            list.push(Action::Cut);
            list.push(Action::Copy);
            list.push(Action::Paste);
            list.push(Action::TextNavigation);
            list.push(Action::JumpToTextStart);
            list.push(Action::JumpToTextEnd);
            list.push(Action::MoveBackwardOneChar);
            list.push(Action::MoveForwardOneChar);
            list.push(Action::MoveBackwardOneWord);
            list.push(Action::MoveForwardOneWord);
            list.push(Action::MoveUpOneLine);
            list.push(Action::MoveDownOneLine);
            list.push(Action::StartTextSelection);
            list.push(Action::EndTextSelection);
        }
        NodeKind::Slider => {
            list.push(Action::Select);
            list.push(Action::Increment);
            list.push(Action::Decrement);
        }
        NodeKind::ComboBox => {
            list.push(Action::Select);
        }
        NodeKind::Tab => {
            list.push(Action::Select);
        }
        NodeKind::Window => {
            // Groups are entered by navigation, not acted on directly.
        }
        NodeKind::Basic => {
            if let Some(el) = tree.element(id)
                && (el.actions.contains(PlatformActions::CLICK)
                    || el.flags.contains(ElementFlags::FOCUSABLE))
            {
                list.push(Action::Select);
            }
        }
    }

    if let Some(el) = tree.element(id) {
        if el.actions.contains(PlatformActions::INCREMENT) {
            push_unique(&mut list, Action::Increment);
        }
        if el.actions.contains(PlatformActions::DECREMENT) {
            push_unique(&mut list, Action::Decrement);
        }
    }

    // Scroll actions come from the nearest scrollable element on the
    // self-or-ancestor chain; a node deep inside a scroll view can still
    // scroll it.
    let scrollable = core::iter::once(id)
        .chain(tree.ancestors(id))
        .find(|&a| {
            tree.element(a)
                .is_some_and(|el| el.flags.contains(ElementFlags::SCROLLABLE))
        });
    if let Some(sc) = scrollable
        && let Some(el) = tree.element(sc)
    {
        if el.actions.contains(PlatformActions::SCROLL_UP) {
            push_unique(&mut list, Action::ScrollUp);
        }
        if el.actions.contains(PlatformActions::SCROLL_DOWN) {
            push_unique(&mut list, Action::ScrollDown);
        }
        if el.actions.contains(PlatformActions::SCROLL_LEFT) {
            push_unique(&mut list, Action::ScrollLeft);
        }
        if el.actions.contains(PlatformActions::SCROLL_RIGHT) {
            push_unique(&mut list, Action::ScrollRight);
        }
    }

    list
}
