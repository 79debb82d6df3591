// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanpath Engine: the top-level switch-access context object.
//!
//! [`Engine`] wires the whole stack together: the [`scanpath_tree`]
//! snapshot, the [`scanpath_nav`] navigator, the [`scanpath_scan`] auto-scan
//! timer, and the [`scanpath_menu`] menu machine. The host feeds it typed
//! [`Event`]s (switch presses, tree changes, menu picks, probe answers,
//! clock ticks) and implements [`Host`] to receive everything the engine
//! does in return: synthesized input, menu surface updates, the focus ring,
//! and occlusion probe requests.
//!
//! The engine holds no globals and reads no clock; a test can drive it to
//! any state by replaying events.
//!
//! ```
//! use kurbo::Rect;
//! use scanpath_engine::{Engine, Event, Host, SwitchKey};
//! use scanpath_tree::{AxTree, Element, PlatformActions, Role};
//!
//! # use kurbo::Point;
//! # use scanpath_engine::{ClickType, FocusRing, KeyPress};
//! # use scanpath_menu::OpenMenu;
//! # use scanpath_nav::ProbeRequest;
//! # use scanpath_tree::ElementId;
//! # struct NullHost;
//! # impl Host for NullHost {
//! #     fn press_key(&mut self, _: KeyPress) {}
//! #     fn tap(&mut self, _: Point, _: u64) {}
//! #     fn click(&mut self, _: ClickType, _: Point) {}
//! #     fn perform_action(&mut self, _: ElementId, _: PlatformActions) {}
//! #     fn show_menu(&mut self, _: &OpenMenu) {}
//! #     fn hide_menu(&mut self) {}
//! #     fn focus_ring(&mut self, _: &FocusRing) {}
//! #     fn request_probe(&mut self, _: ProbeRequest) {}
//! #     fn set_keyboard_visible(&mut self, _: bool) {}
//! #     fn set_point_scan_active(&mut self, _: bool) {}
//! #     fn open_settings(&mut self) {}
//! # }
//! let mut tree = AxTree::new();
//! let desktop = tree.insert(None, Element::new(Role::Desktop));
//! let window = tree.insert(
//!     Some(desktop),
//!     Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
//! );
//! tree.insert(
//!     Some(window),
//!     Element::new(Role::Button)
//!         .with_bounds(Rect::new(10.0, 10.0, 50.0, 40.0))
//!         .with_actions(PlatformActions::CLICK),
//! );
//!
//! let mut engine = Engine::new(NullHost, tree, desktop).unwrap();
//! // Select enters the focused window's group.
//! engine.handle(Event::SwitchPressed(SwitchKey::Select));
//! assert_eq!(engine.navigator().history_depth(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod event;
mod host;

pub use engine::Engine;
pub use event::{Event, Setting, SwitchKey};
pub use host::{ClickType, FocusRing, Host, KEY_HOLD_MS, Key, KeyPress, MENU_SETTLE_MS};
