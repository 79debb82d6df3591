// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu kinds, displayed-action computation, and the open-menu stack.

use kurbo::Rect;
use smallvec::SmallVec;

use scanpath_node::{Action, ActionList, GLOBAL_ACTIONS};

/// The menu surfaces the engine can open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuKind {
    /// The per-node action menu.
    Main,
    /// The caret-movement submenu for editable text.
    TextNavigation,
    /// The two-click menu offered after the point scanner picks a point.
    PointScan,
}

impl MenuKind {
    /// Whether this menu may show `action` as a node action.
    ///
    /// Global actions are appended separately and are not part of any
    /// allow-list.
    pub fn allows(self, action: Action) -> bool {
        match self {
            Self::Main => matches!(
                action,
                Action::Select
                    | Action::Back
                    | Action::Keyboard
                    | Action::Increment
                    | Action::Decrement
                    | Action::ScrollUp
                    | Action::ScrollDown
                    | Action::ScrollLeft
                    | Action::ScrollRight
                    | Action::Cut
                    | Action::Copy
                    | Action::Paste
                    | Action::TextNavigation
            ),
            Self::TextNavigation => matches!(
                action,
                Action::JumpToTextStart
                    | Action::JumpToTextEnd
                    | Action::MoveBackwardOneChar
                    | Action::MoveForwardOneChar
                    | Action::MoveBackwardOneWord
                    | Action::MoveForwardOneWord
                    | Action::MoveUpOneLine
                    | Action::MoveDownOneLine
                    | Action::StartTextSelection
                    | Action::EndTextSelection
            ),
            Self::PointScan => matches!(action, Action::LeftClick | Action::RightClick),
        }
    }
}

/// Which handler tier performs a dispatched action.
///
/// The variants are listed in priority order; [`route`] consults them top
/// to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Engine-level handlers: settings, mode switches.
    Global,
    /// The point scanner's click handlers, only while it is active.
    PointScan,
    /// The focused node's own handler.
    Node,
}

/// What happens to the menu stack after an action dispatches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AfterDispatch {
    /// Pop the dispatching menu.
    Close,
    /// Keep the menu open; the action is repeatable.
    Reopen,
    /// Push the named submenu.
    Push(MenuKind),
}

/// A routed dispatch plus its stack effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Which tier handles the action.
    pub route: Route,
    /// What the stack did (or still needs: [`AfterDispatch::Push`] waits
    /// for the caller to open the submenu with the node's actions).
    pub after: AfterDispatch,
}

/// Decide which handler tier performs `action`.
///
/// Priority is an explicit list: global handlers win over everything,
/// point-scan handlers apply only while the point scanner is active, and
/// whatever remains belongs to the node.
pub fn route(action: Action, point_scan_active: bool) -> Route {
    // 1. Global handlers.
    if matches!(action, Action::Settings | Action::PointScan | Action::ItemScan) {
        return Route::Global;
    }
    // 2. Point-scan handlers, while that mode is active.
    if point_scan_active && matches!(action, Action::LeftClick | Action::RightClick) {
        return Route::PointScan;
    }
    // 3. The node's own handler.
    Route::Node
}

fn after(action: Action) -> AfterDispatch {
    match action {
        // Repeatable adjustments keep their menu up.
        Action::Increment
        | Action::Decrement
        | Action::ScrollUp
        | Action::ScrollDown
        | Action::ScrollLeft
        | Action::ScrollRight => AfterDispatch::Reopen,
        // Caret movement repeats inside its submenu; selection toggles too.
        Action::JumpToTextStart
        | Action::JumpToTextEnd
        | Action::MoveBackwardOneChar
        | Action::MoveForwardOneChar
        | Action::MoveBackwardOneWord
        | Action::MoveForwardOneWord
        | Action::MoveUpOneLine
        | Action::MoveDownOneLine
        | Action::StartTextSelection
        | Action::EndTextSelection => AfterDispatch::Reopen,
        Action::TextNavigation => AfterDispatch::Push(MenuKind::TextNavigation),
        _ => AfterDispatch::Close,
    }
}

/// The actions a menu of `kind` shows for a node offering `node_actions`.
///
/// Node actions keep their order; global actions come last. While the point
/// scanner is active the mode-switch global is [`Action::ItemScan`] instead
/// of [`Action::PointScan`].
pub fn displayed_actions(
    kind: MenuKind,
    node_actions: &[Action],
    point_scan_active: bool,
) -> ActionList {
    let mut list: ActionList = node_actions
        .iter()
        .copied()
        .filter(|&a| kind.allows(a))
        .collect();
    for &global in GLOBAL_ACTIONS {
        let global = if global == Action::PointScan && point_scan_active {
            Action::ItemScan
        } else {
            global
        };
        if !list.contains(&global) {
            list.push(global);
        }
    }
    list
}

/// One open menu surface.
#[derive(Clone, Debug)]
pub struct OpenMenu {
    /// Which surface this is.
    pub kind: MenuKind,
    /// The actions it shows, in display order.
    pub actions: ActionList,
    /// Where the surface is anchored, when known.
    pub anchor: Option<Rect>,
}

/// The stack of open menus.
///
/// Empty means no surface is showing. The main menu sits at the bottom;
/// submenus stack above it.
#[derive(Clone, Debug, Default)]
pub struct MenuStack {
    stack: SmallVec<[OpenMenu; 2]>,
}

impl MenuStack {
    /// An empty (closed) stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any menu is showing.
    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The menu currently on top.
    pub fn top(&self) -> Option<&OpenMenu> {
        self.stack.last()
    }

    /// Push a menu of `kind` computed from `node_actions`.
    ///
    /// Returns a reference to the pushed menu so callers can hand its action
    /// list and anchor to the surface.
    pub fn open(
        &mut self,
        kind: MenuKind,
        node_actions: &[Action],
        anchor: Option<Rect>,
        point_scan_active: bool,
    ) -> &OpenMenu {
        let actions = displayed_actions(kind, node_actions, point_scan_active);
        self.stack.push(OpenMenu {
            kind,
            actions,
            anchor,
        });
        let top = self.stack.len() - 1;
        &self.stack[top]
    }

    /// Dispatch an action selected on the top menu.
    ///
    /// Applies the stack effect: [`AfterDispatch::Close`] pops one level,
    /// [`AfterDispatch::Reopen`] leaves the stack alone, and
    /// [`AfterDispatch::Push`] leaves pushing to the caller, which owns the
    /// node's action list.
    pub fn dispatch(&mut self, action: Action, point_scan_active: bool) -> Dispatch {
        let after = after(action);
        if after == AfterDispatch::Close {
            self.stack.pop();
        }
        Dispatch {
            route: route(action, point_scan_active),
            after,
        }
    }

    /// Pop one menu. Returns whether a menu was open to pop.
    pub fn pop(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Close every menu; the surface should hide.
    pub fn close_all(&mut self) {
        self.stack.clear();
    }
}
