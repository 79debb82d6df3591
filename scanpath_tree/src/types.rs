// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the accessibility snapshot: element identifiers, roles,
//! state flags, and standard platform actions.

use alloc::string::String;
use kurbo::Rect;

/// Identifier for an element in the tree (generational).
///
/// An `ElementId` stays valid until the element is removed. After removal the
/// id becomes *stale*: [`AxTree::is_alive`](crate::AxTree::is_alive) returns
/// `false` and all accessors treat it as absent, even if the underlying slot
/// has been reused for a newer element. This is the stable identity the
/// navigation layer's structural equality is built on — node wrappers are
/// rebuilt freely, but two wrappers naming the same live `ElementId` denote
/// the same on-screen element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Accessibility role of an element.
///
/// This is a deliberately closed set: the classifier in `scanpath_node`
/// dispatches on roles through exhaustive matches, so adding a role here
/// forces every consumer to decide how to handle it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The desktop-level root containing all windows.
    Desktop,
    /// A top-level window.
    Window,
    /// A generic pane or layout container inside a window.
    Pane,
    /// The root of a rendered web document.
    WebArea,
    /// A generic grouping container.
    Group,
    /// A list container.
    List,
    /// A single item inside a list.
    ListItem,
    /// A push button.
    Button,
    /// A checkbox.
    CheckBox,
    /// A radio button.
    RadioButton,
    /// A hyperlink.
    Link,
    /// An image.
    Image,
    /// Static (non-interactive) text.
    StaticText,
    /// A single-line or multi-line editable text field.
    TextField,
    /// A slider or other continuous value control.
    Slider,
    /// A combo box / dropdown selector.
    ComboBox,
    /// A tab inside a tab strip.
    Tab,
    /// The tab strip itself.
    TabList,
    /// A menu container.
    Menu,
    /// An item inside a menu.
    MenuItem,
    /// The virtual keyboard container.
    Keyboard,
    /// A single key of the virtual keyboard.
    Key,
    /// Anything the host could not map onto a known role.
    Unknown,
}

bitflags::bitflags! {
    /// Element state flags reported by the host.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is drawn on screen (not hidden and not fully offscreen).
        const VISIBLE    = 0b0000_0001;
        /// Element is enabled for interaction.
        const ENABLED    = 0b0000_0010;
        /// Element can receive platform focus.
        const FOCUSABLE  = 0b0000_0100;
        /// Element scrolls its content.
        const SCROLLABLE = 0b0000_1000;
        /// Element hosts editable text.
        const EDITABLE   = 0b0001_0000;
        /// Element is a modal surface that must be dismissed to leave it.
        const MODAL      = 0b0010_0000;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

bitflags::bitflags! {
    /// Standard actions the platform reports as supported by an element.
    ///
    /// These are the host's own action vocabulary. The symbolic actions the
    /// user sees in the menu are derived from these (plus role and ancestry)
    /// by `scanpath_node`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PlatformActions: u16 {
        /// Default activation (click/press).
        const CLICK             = 0b0000_0000_0001;
        /// Move platform focus to the element.
        const FOCUS             = 0b0000_0000_0010;
        /// Increment a value control.
        const INCREMENT         = 0b0000_0000_0100;
        /// Decrement a value control.
        const DECREMENT         = 0b0000_0000_1000;
        /// Replace the element's value.
        const SET_VALUE         = 0b0000_0001_0000;
        /// Scroll content up.
        const SCROLL_UP         = 0b0000_0010_0000;
        /// Scroll content down.
        const SCROLL_DOWN       = 0b0000_0100_0000;
        /// Scroll content left.
        const SCROLL_LEFT       = 0b0000_1000_0000;
        /// Scroll content right.
        const SCROLL_RIGHT      = 0b0001_0000_0000;
        /// Open the element's context menu.
        const SHOW_CONTEXT_MENU = 0b0010_0000_0000;
    }
}

/// Accessibility properties of one element, as mirrored from the host.
#[derive(Clone, Debug)]
pub struct Element {
    /// Accessibility role.
    pub role: Role,
    /// Accessible name, if the host reported one.
    pub name: Option<String>,
    /// Screen bounds in global coordinates; `None` means "location unknown".
    pub bounds: Option<Rect>,
    /// State flags.
    pub flags: ElementFlags,
    /// Standard actions the platform supports on this element.
    pub actions: PlatformActions,
}

impl Element {
    /// Create an element with the given role, default flags, and no actions.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: None,
            bounds: None,
            flags: ElementFlags::default(),
            actions: PlatformActions::empty(),
        }
    }

    /// Builder-style bounds assignment.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Builder-style name assignment.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style flags assignment.
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Builder-style platform-action assignment.
    pub fn with_actions(mut self, actions: PlatformActions) -> Self {
        self.actions = actions;
        self
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new(Role::Unknown)
    }
}
