// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host collaborator trait and its message types.
//!
//! The engine never touches the platform directly. Everything outward —
//! synthesized input, the menu surface, the focus ring, occlusion probes —
//! goes through [`Host`], and everything inward arrives as an
//! [`Event`](crate::Event). Hosts are expected to be thin adapters over the
//! platform's accessibility and input-injection services.

use kurbo::{Point, Rect};

use scanpath_menu::OpenMenu;
use scanpath_nav::ProbeRequest;
use scanpath_tree::{ElementId, PlatformActions};

/// How long a synthesized keyboard-key tap is held down, in ms.
pub const KEY_HOLD_MS: u64 = 100;

/// How long after opening a menu surface the engine ignores scan ticks,
/// giving the surface time to settle on screen.
pub const MENU_SETTLE_MS: u64 = 250;

/// Keys the engine synthesizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Cancel / dismiss.
    Escape,
    /// Caret to start of line or text.
    Home,
    /// Caret to end of line or text.
    End,
    /// Caret left (by word with ctrl).
    ArrowLeft,
    /// Caret right (by word with ctrl).
    ArrowRight,
    /// Caret up one line.
    ArrowUp,
    /// Caret down one line.
    ArrowDown,
    /// With ctrl: cut.
    X,
    /// With ctrl: copy.
    C,
    /// With ctrl: paste.
    V,
}

/// A synthesized key press with its modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Hold ctrl.
    pub ctrl: bool,
    /// Hold shift (active while a text selection is being made).
    pub shift: bool,
}

impl KeyPress {
    /// An unmodified press.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    /// A ctrl-modified press.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }
}

/// Which mouse button a synthesized click uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickType {
    /// The primary button.
    Left,
    /// The secondary button.
    Right,
}

/// The focus indication the host draws: the group's union rect and the
/// focused item's rect. Either may be unknown; the host draws what it gets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FocusRing {
    /// Union of the current group's child locations.
    pub group: Option<Rect>,
    /// The focused item's location.
    pub item: Option<Rect>,
}

/// The platform collaborator the engine drives.
pub trait Host {
    /// Synthesize a key press (press and release, with modifiers).
    fn press_key(&mut self, press: KeyPress);

    /// Press-and-release at a screen point, holding for `hold_ms`. Used to
    /// tap virtual keyboard keys.
    fn tap(&mut self, point: Point, hold_ms: u64);

    /// Synthesize a mouse click at a screen point.
    fn click(&mut self, button: ClickType, point: Point);

    /// Ask the platform to run a standard action on an element.
    fn perform_action(&mut self, target: ElementId, action: PlatformActions);

    /// Show (or re-show) the menu surface with the given content.
    fn show_menu(&mut self, menu: &OpenMenu);

    /// Hide the menu surface.
    fn hide_menu(&mut self);

    /// Draw the focus indication.
    fn focus_ring(&mut self, ring: &FocusRing);

    /// Ask whether a window is occluded at a point. The answer comes back
    /// as [`Event::ProbeResult`](crate::Event::ProbeResult) carrying the
    /// request's token.
    fn request_probe(&mut self, probe: ProbeRequest);

    /// Show or hide the virtual keyboard.
    fn set_keyboard_visible(&mut self, visible: bool);

    /// Start or stop the host-rendered point-scan sweep.
    fn set_point_scan_active(&mut self, active: bool);

    /// Open the settings surface.
    fn open_settings(&mut self);
}
