// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine context object.

use scanpath_menu::{AfterDispatch, MenuKind, MenuStack, PointScanner, Route};
use scanpath_nav::{Direction, Enter, Navigator, Resync, Step};
use scanpath_node::{Action, BuildError, ExitEffect, NodeKind};
use scanpath_scan::AutoScan;
use scanpath_tree::{AxTree, ElementFlags, ElementId, PlatformActions, Role};

use crate::event::{Event, Setting, SwitchKey};
use crate::host::{ClickType, FocusRing, Host, KEY_HOLD_MS, Key, KeyPress, MENU_SETTLE_MS};

/// The switch-access engine.
///
/// One context object owns every piece of state: the tree snapshot, the
/// navigator, the auto-scan timer, the menu stack, and the point scanner.
/// There are no globals; hosts construct one engine per desktop and feed it
/// [`Event`]s, and the engine drives the platform back through [`Host`].
///
/// The engine is strictly single-threaded and event-driven. Time only
/// advances through [`Event::Tick`], so every behavior is reproducible in
/// tests by replaying an event sequence.
#[derive(Debug)]
pub struct Engine<H: Host> {
    host: H,
    tree: AxTree,
    navigator: Navigator,
    auto_scan: AutoScan,
    menu: MenuStack,
    point_scanner: PointScanner,
    /// While true, synthesized caret movement holds shift.
    selecting_text: bool,
    /// When the menu surface was last opened; scan ticks are ignored until
    /// it has settled.
    menu_opened_at: Option<u64>,
    now_ms: u64,
}

impl<H: Host> Engine<H> {
    /// Build an engine scanning under `desktop`, emitting the initial focus
    /// indication.
    ///
    /// Fails when the desktop holds nothing scannable.
    pub fn new(host: H, tree: AxTree, desktop: ElementId) -> Result<Self, BuildError> {
        let navigator = Navigator::new(&tree, desktop)?;
        let mut engine = Self {
            host,
            tree,
            navigator,
            auto_scan: AutoScan::new(),
            menu: MenuStack::new(),
            point_scanner: PointScanner::new(),
            selecting_text: false,
            menu_opened_at: None,
            now_ms: 0,
        };
        engine.emit_focus();
        Ok(engine)
    }

    /// The host collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The tree snapshot.
    pub fn tree(&self) -> &AxTree {
        &self.tree
    }

    /// Mutable access to the tree snapshot. Platform glue applies tree
    /// updates here, then reports [`Event::TreeChanged`].
    pub fn tree_mut(&mut self) -> &mut AxTree {
        &mut self.tree
    }

    /// The navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The auto-scan timer.
    pub fn auto_scan(&self) -> &AutoScan {
        &self.auto_scan
    }

    /// The menu stack.
    pub fn menu(&self) -> &MenuStack {
        &self.menu
    }

    /// The point scanner.
    pub fn point_scanner(&self) -> &PointScanner {
        &self.point_scanner
    }

    /// Handle one inbound event to completion.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::FocusChanged { target } => {
                if self.menu.is_open() {
                    return;
                }
                if self.navigator.focus_element(&self.tree, target) {
                    self.emit_focus();
                }
            }
            Event::TreeChanged | Event::Scroll => match self.navigator.resync(&self.tree) {
                Resync::Lost => {}
                Resync::Consistent if event == Event::TreeChanged => {}
                // Scroll moves locations without changing shape, so the
                // indication is redrawn even when the cursor held.
                _ => self.emit_focus(),
            },
            Event::SwitchPressed(key) => self.on_switch(key),
            Event::MenuSelection(action) => self.on_menu_selection(action),
            Event::PointChosen(point) => {
                if let Some(anchor) = self.point_scanner.choose_point(point) {
                    let menu = self.menu.open(
                        MenuKind::PointScan,
                        &[Action::LeftClick, Action::RightClick],
                        Some(anchor),
                        true,
                    );
                    self.host.show_menu(menu);
                    self.menu_opened_at = Some(self.now_ms);
                }
            }
            Event::ProbeResult { token, occluded } => {
                match self.navigator.resume_probe(&self.tree, token, occluded) {
                    Some(Step::Moved) => self.emit_focus(),
                    Some(Step::NeedsProbe(req)) => self.host.request_probe(req),
                    Some(Step::Stuck) | None => {}
                }
            }
            Event::Tick { now_ms } => {
                self.now_ms = now_ms;
                if let Some(opened) = self.menu_opened_at
                    && now_ms < opened.saturating_add(MENU_SETTLE_MS)
                {
                    return;
                }
                if self.menu.is_open() || self.point_scanner.is_active() {
                    return;
                }
                if self.auto_scan.poll(now_ms) {
                    self.step(Direction::Forward);
                }
            }
            Event::SettingChanged(setting) => self.on_setting(setting),
        }
    }

    fn on_setting(&mut self, setting: Setting) {
        match setting {
            Setting::AutoScanEnabled(on) => self.auto_scan.set_enabled(on, self.now_ms),
            Setting::PrimaryScanInterval(ms) => {
                let _ = self.auto_scan.set_primary_interval(ms, self.now_ms);
            }
            Setting::KeyboardScanInterval(ms) => {
                let _ = self.auto_scan.set_keyboard_interval(ms, self.now_ms);
            }
        }
    }

    fn on_switch(&mut self, key: SwitchKey) {
        // While a surface is up it owns the switches; its choices come back
        // as MenuSelection / PointChosen events.
        if self.menu.is_open() || self.point_scanner.is_active() {
            return;
        }
        match key {
            SwitchKey::Next => self.step(Direction::Forward),
            SwitchKey::Previous => self.step(Direction::Backward),
            SwitchKey::Select => self.on_select(),
        }
    }

    fn step(&mut self, direction: Direction) {
        match self.navigator.move_in(&self.tree, direction) {
            Step::Moved => self.emit_focus(),
            Step::NeedsProbe(req) => self.host.request_probe(req),
            Step::Stuck => {}
        }
    }

    /// Select on the focused node: groups are entered, nodes with at most
    /// one action (or no known location to anchor a menu at) perform their
    /// default action straight away, everything else opens the main menu.
    fn on_select(&mut self) {
        let node = self.navigator.current_node().clone();
        if node.is_group(&self.tree) {
            if self.navigator.enter_group(&self.tree) == Ok(Enter::Entered) {
                self.emit_focus();
            }
            return;
        }
        let actions = node.actions(&self.tree);
        let location = node.location(&self.tree);
        if actions.len() <= 1 || location.is_none() {
            if let Some(&first) = actions.first() {
                self.perform_node_action(first);
            }
            return;
        }
        let menu = self.menu.open(MenuKind::Main, &actions, location, false);
        self.host.show_menu(menu);
        self.menu_opened_at = Some(self.now_ms);
    }

    fn on_menu_selection(&mut self, action: Action) {
        if !self.menu.is_open() {
            return;
        }
        let node_actions = self.navigator.current_node().actions(&self.tree);
        let dispatch = self.menu.dispatch(action, self.point_scanner.is_active());
        match dispatch.route {
            Route::Global => self.perform_global(action),
            Route::PointScan => self.perform_point_click(action),
            Route::Node => {
                if !matches!(dispatch.after, AfterDispatch::Push(_)) {
                    self.perform_node_action(action);
                }
            }
        }
        match dispatch.after {
            AfterDispatch::Close => {
                if let Some(top) = self.menu.top() {
                    self.host.show_menu(top);
                } else {
                    self.host.hide_menu();
                    self.menu_opened_at = None;
                }
            }
            AfterDispatch::Reopen => {
                if let Some(top) = self.menu.top() {
                    self.host.show_menu(top);
                }
            }
            AfterDispatch::Push(kind) => {
                let anchor = self.navigator.current_node().location(&self.tree);
                let active = self.point_scanner.is_active();
                let menu = self.menu.open(kind, &node_actions, anchor, active);
                self.host.show_menu(menu);
                self.menu_opened_at = Some(self.now_ms);
            }
        }
    }

    fn perform_global(&mut self, action: Action) {
        match action {
            Action::Settings => self.host.open_settings(),
            Action::PointScan => {
                self.menu.close_all();
                self.menu_opened_at = None;
                self.point_scanner.start();
                self.host.set_point_scan_active(true);
            }
            Action::ItemScan => {
                self.menu.close_all();
                self.menu_opened_at = None;
                self.point_scanner.stop();
                self.host.set_point_scan_active(false);
                self.emit_focus();
            }
            _ => {}
        }
    }

    fn perform_point_click(&mut self, action: Action) {
        if let Some(point) = self.point_scanner.chosen_point() {
            let button = if action == Action::RightClick {
                ClickType::Right
            } else {
                ClickType::Left
            };
            self.host.click(button, point);
        }
        self.point_scanner.resume_selecting();
    }

    fn perform_node_action(&mut self, action: Action) {
        match action {
            Action::Select => self.perform_select(),
            Action::Back => self.do_exit_group(),
            Action::Keyboard => self.open_keyboard(),
            Action::Increment => self.platform_action(PlatformActions::INCREMENT),
            Action::Decrement => self.platform_action(PlatformActions::DECREMENT),
            Action::ScrollUp => self.scroll(PlatformActions::SCROLL_UP),
            Action::ScrollDown => self.scroll(PlatformActions::SCROLL_DOWN),
            Action::ScrollLeft => self.scroll(PlatformActions::SCROLL_LEFT),
            Action::ScrollRight => self.scroll(PlatformActions::SCROLL_RIGHT),
            Action::Cut => self.host.press_key(KeyPress::ctrl(Key::X)),
            Action::Copy => self.host.press_key(KeyPress::ctrl(Key::C)),
            Action::Paste => self.host.press_key(KeyPress::ctrl(Key::V)),
            Action::JumpToTextStart => self.caret(Key::Home, false),
            Action::JumpToTextEnd => self.caret(Key::End, false),
            Action::MoveBackwardOneChar => self.caret(Key::ArrowLeft, false),
            Action::MoveForwardOneChar => self.caret(Key::ArrowRight, false),
            Action::MoveBackwardOneWord => self.caret(Key::ArrowLeft, true),
            Action::MoveForwardOneWord => self.caret(Key::ArrowRight, true),
            Action::MoveUpOneLine => self.caret(Key::ArrowUp, false),
            Action::MoveDownOneLine => self.caret(Key::ArrowDown, false),
            Action::StartTextSelection => self.selecting_text = true,
            Action::EndTextSelection => self.selecting_text = false,
            Action::LeftClick => self.click_node(ClickType::Left),
            Action::RightClick => self.click_node(ClickType::Right),
            // Routed elsewhere: submenu entry and the globals.
            Action::TextNavigation
            | Action::PointScan
            | Action::ItemScan
            | Action::Settings => {}
        }
    }

    /// Activate the focused node: keyboard keys are tapped at their center
    /// with the standard hold, elements with a click action are clicked,
    /// and focusable elements are focused.
    fn perform_select(&mut self) {
        let node = self.navigator.current_node().clone();
        let Some(target) = node.target else {
            // The back button's only action.
            self.do_exit_group();
            return;
        };
        if node.kind == NodeKind::KeyboardKey {
            if let Some(rect) = node.location(&self.tree) {
                self.host.tap(rect.center(), KEY_HOLD_MS);
            }
            return;
        }
        let Some(el) = self.tree.element(target) else {
            return;
        };
        if el.actions.contains(PlatformActions::CLICK) {
            self.host.perform_action(target, PlatformActions::CLICK);
        } else if el.actions.contains(PlatformActions::FOCUS)
            || el.flags.contains(ElementFlags::FOCUSABLE)
        {
            self.host.perform_action(target, PlatformActions::FOCUS);
        }
    }

    fn do_exit_group(&mut self) {
        match self.navigator.exit_group(&self.tree) {
            Some(ExitEffect::DismissModal) => self.host.press_key(KeyPress::plain(Key::Escape)),
            Some(ExitEffect::HideKeyboard) => self.host.set_keyboard_visible(false),
            None => {}
        }
        self.emit_focus();
    }

    /// Show the virtual keyboard and jump scanning into it.
    fn open_keyboard(&mut self) {
        let Some(keyboard) = self
            .tree
            .find(self.navigator.desktop(), |el| el.role == Role::Keyboard)
        else {
            return;
        };
        self.host.set_keyboard_visible(true);
        if self.navigator.jump_to(&self.tree, keyboard).is_ok() {
            self.emit_focus();
        }
    }

    fn platform_action(&mut self, action: PlatformActions) {
        if let Some(target) = self.navigator.current_node().target {
            self.host.perform_action(target, action);
        }
    }

    /// Run a scroll action on the nearest scrollable self-or-ancestor that
    /// supports it.
    fn scroll(&mut self, action: PlatformActions) {
        let Some(target) = self.navigator.current_node().target else {
            return;
        };
        let scrollable = core::iter::once(target)
            .chain(self.tree.ancestors(target))
            .find(|&id| {
                self.tree.element(id).is_some_and(|el| {
                    el.flags.contains(ElementFlags::SCROLLABLE) && el.actions.contains(action)
                })
            });
        if let Some(id) = scrollable {
            self.host.perform_action(id, action);
        }
    }

    /// Synthesize a click at the focused node's center. Nodes with no known
    /// location cannot be clicked.
    fn click_node(&mut self, button: ClickType) {
        if let Some(rect) = self.navigator.current_node().location(&self.tree) {
            self.host.click(button, rect.center());
        }
    }

    fn caret(&mut self, key: Key, word: bool) {
        self.host.press_key(KeyPress {
            key,
            ctrl: word,
            shift: self.selecting_text,
        });
    }

    /// Redraw the focus indication and restart the scan countdown.
    fn emit_focus(&mut self) {
        let ring = FocusRing {
            group: self.navigator.current_group().bounds(&self.tree),
            item: self.navigator.current_node().location(&self.tree),
        };
        self.host.focus_ring(&ring);
        self.auto_scan
            .set_in_keyboard(self.navigator.in_keyboard(), self.now_ms);
        self.auto_scan.note_focus_moved(self.now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};
    use scanpath_menu::OpenMenu;
    use scanpath_nav::ProbeRequest;
    use scanpath_tree::Element;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Key(KeyPress),
        Tap(Point, u64),
        Click(ClickType, Point),
        Perform(ElementId, PlatformActions),
        ShowMenu(MenuKind),
        HideMenu,
        Focus(FocusRing),
        Probe(u64, ElementId),
        KeyboardVisible(bool),
        PointScanActive(bool),
        OpenSettings,
    }

    #[derive(Debug, Default)]
    struct RecordingHost {
        calls: Vec<Call>,
        last_probe: Option<ProbeRequest>,
    }

    impl Host for RecordingHost {
        fn press_key(&mut self, press: KeyPress) {
            self.calls.push(Call::Key(press));
        }
        fn tap(&mut self, point: Point, hold_ms: u64) {
            self.calls.push(Call::Tap(point, hold_ms));
        }
        fn click(&mut self, button: ClickType, point: Point) {
            self.calls.push(Call::Click(button, point));
        }
        fn perform_action(&mut self, target: ElementId, action: PlatformActions) {
            self.calls.push(Call::Perform(target, action));
        }
        fn show_menu(&mut self, menu: &OpenMenu) {
            self.calls.push(Call::ShowMenu(menu.kind));
        }
        fn hide_menu(&mut self) {
            self.calls.push(Call::HideMenu);
        }
        fn focus_ring(&mut self, ring: &FocusRing) {
            self.calls.push(Call::Focus(*ring));
        }
        fn request_probe(&mut self, probe: ProbeRequest) {
            self.calls.push(Call::Probe(probe.token, probe.window));
            self.last_probe = Some(probe);
        }
        fn set_keyboard_visible(&mut self, visible: bool) {
            self.calls.push(Call::KeyboardVisible(visible));
        }
        fn set_point_scan_active(&mut self, active: bool) {
            self.calls.push(Call::PointScanActive(active));
        }
        fn open_settings(&mut self) {
            self.calls.push(Call::OpenSettings);
        }
    }

    fn button(x: f64, y: f64) -> Element {
        Element::new(Role::Button)
            .with_bounds(Rect::new(x, y, x + 40.0, y + 30.0))
            .with_actions(PlatformActions::CLICK)
    }

    fn focus_count(engine: &Engine<RecordingHost>) -> usize {
        engine
            .host()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Focus(_)))
            .count()
    }

    /// Desktop with one window of two buttons; the cursor starts on the
    /// window.
    fn two_button_engine() -> (Engine<RecordingHost>, Vec<ElementId>) {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let w = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
        );
        let buttons = alloc::vec![
            tree.insert(Some(w), button(10.0, 10.0)),
            tree.insert(Some(w), button(70.0, 10.0)),
        ];
        let engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        (engine, buttons)
    }

    #[test]
    fn construction_emits_the_initial_focus() {
        let (engine, _) = two_button_engine();
        assert_eq!(focus_count(&engine), 1);
    }

    #[test]
    fn single_action_select_skips_the_menu() {
        let (mut engine, buttons) = two_button_engine();
        // First select enters the window group, second activates a button.
        engine.handle(Event::SwitchPressed(SwitchKey::Select));
        assert_eq!(engine.navigator().history_depth(), 1);
        engine.handle(Event::SwitchPressed(SwitchKey::Select));

        let calls = &engine.host().calls;
        assert!(calls.contains(&Call::Perform(buttons[0], PlatformActions::CLICK)));
        assert!(!calls.iter().any(|c| matches!(c, Call::ShowMenu(_))));
        assert!(!engine.menu().is_open());
    }

    /// Desktop with one window holding a slider; the cursor ends on the
    /// slider with the main menu open.
    fn slider_menu_engine() -> (Engine<RecordingHost>, ElementId) {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let w = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
        );
        tree.insert(Some(w), button(10.0, 10.0));
        let slider = tree.insert(
            Some(w),
            Element::new(Role::Slider)
                .with_bounds(Rect::new(10.0, 60.0, 200.0, 90.0))
                .with_actions(
                    PlatformActions::CLICK
                        | PlatformActions::INCREMENT
                        | PlatformActions::DECREMENT,
                ),
        );
        let mut engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // into the window
        engine.handle(Event::SwitchPressed(SwitchKey::Next)); // onto the slider
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // open the menu
        (engine, slider)
    }

    #[test]
    fn multi_action_select_opens_the_main_menu() {
        let (engine, _) = slider_menu_engine();
        assert!(engine.menu().is_open());
        let top = engine.menu().top().unwrap();
        assert_eq!(top.kind, MenuKind::Main);
        assert_eq!(
            top.actions.as_slice(),
            [
                Action::Select,
                Action::Increment,
                Action::Decrement,
                Action::Settings,
                Action::PointScan,
            ]
        );
        assert!(top.anchor.is_some());
    }

    #[test]
    fn repeatable_menu_action_keeps_the_menu_open() {
        let (mut engine, slider) = slider_menu_engine();
        engine.handle(Event::MenuSelection(Action::Increment));

        assert!(engine.menu().is_open());
        let calls = &engine.host().calls;
        assert!(calls.contains(&Call::Perform(slider, PlatformActions::INCREMENT)));
        assert!(!calls.contains(&Call::HideMenu));
    }

    #[test]
    fn settings_routes_globally_and_closes() {
        let (mut engine, _) = slider_menu_engine();
        engine.handle(Event::MenuSelection(Action::Settings));

        assert!(!engine.menu().is_open());
        let calls = &engine.host().calls;
        assert!(calls.contains(&Call::OpenSettings));
        assert!(calls.contains(&Call::HideMenu));
    }

    #[test]
    fn point_scan_cycle() {
        let (mut engine, _) = slider_menu_engine();
        engine.handle(Event::MenuSelection(Action::PointScan));
        assert!(engine.point_scanner().is_active());
        assert!(!engine.menu().is_open());
        assert!(engine.host().calls.contains(&Call::PointScanActive(true)));

        // Switches are owned by the sweep now; they must not move the cursor.
        let before = focus_count(&engine);
        engine.handle(Event::SwitchPressed(SwitchKey::Next));
        assert_eq!(focus_count(&engine), before);

        let point = Point::new(120.0, 80.0);
        engine.handle(Event::PointChosen(point));
        let top = engine.menu().top().unwrap();
        assert_eq!(top.kind, MenuKind::PointScan);
        assert_eq!(top.anchor, Some(Rect::new(120.0, 80.0, 121.0, 81.0)));
        // The click menu offers the mode switch back to item scan.
        assert!(top.actions.contains(&Action::ItemScan));

        engine.handle(Event::MenuSelection(Action::LeftClick));
        assert!(engine.host().calls.contains(&Call::Click(ClickType::Left, point)));
        assert!(!engine.menu().is_open());
        // Back to sweeping for the next point.
        assert!(engine.point_scanner().is_active());
        assert_eq!(engine.point_scanner().chosen_point(), None);
    }

    #[test]
    fn click_selection_without_a_sweep_clicks_the_node() {
        // The sweep is not running, so a click selection routes to the
        // focused node and lands at its center.
        let (mut engine, _) = slider_menu_engine();
        engine.handle(Event::MenuSelection(Action::LeftClick));

        let center = Point::new(105.0, 75.0);
        assert!(engine
            .host()
            .calls
            .contains(&Call::Click(ClickType::Left, center)));
        assert!(!engine.menu().is_open());
    }

    #[test]
    fn menu_close_keeps_the_cursor() {
        // Closing the menu hides the surface but never moves the cursor;
        // the next switch press scans from where the menu was opened.
        let (mut engine, slider) = slider_menu_engine();
        assert_eq!(engine.navigator().current_node().target, Some(slider));

        engine.handle(Event::MenuSelection(Action::Settings));
        assert!(!engine.menu().is_open());
        assert_eq!(engine.navigator().current_node().target, Some(slider));

        let before = focus_count(&engine);
        engine.handle(Event::SwitchPressed(SwitchKey::Next));
        assert_eq!(focus_count(&engine), before + 1);
    }

    #[test]
    fn next_over_windows_probes_then_moves() {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let w1 = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
        );
        tree.insert(Some(w1), button(10.0, 10.0));
        let w2 = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(300.0, 0.0, 500.0, 200.0)),
        );
        tree.insert(Some(w2), button(310.0, 10.0));

        let mut engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        engine.handle(Event::SwitchPressed(SwitchKey::Next));
        let probe = engine.host().last_probe.expect("window candidate probes");
        assert_eq!(probe.window, w2);

        let before = focus_count(&engine);
        engine.handle(Event::ProbeResult {
            token: probe.token,
            occluded: false,
        });
        assert_eq!(focus_count(&engine), before + 1);
        assert_eq!(engine.navigator().current_node().target, Some(w2));

        // A stale answer later does nothing.
        engine.handle(Event::ProbeResult {
            token: probe.token,
            occluded: true,
        });
        assert_eq!(engine.navigator().current_node().target, Some(w2));
    }

    #[test]
    fn ticks_drive_auto_scan() {
        let (mut engine, _) = two_button_engine();
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // into the window
        engine.handle(Event::SettingChanged(Setting::PrimaryScanInterval(500)));
        engine.handle(Event::SettingChanged(Setting::AutoScanEnabled(true)));
        assert!(engine.auto_scan().is_running());

        let before = focus_count(&engine);
        engine.handle(Event::Tick { now_ms: 400 });
        assert_eq!(focus_count(&engine), before, "not due yet");
        engine.handle(Event::Tick { now_ms: 500 });
        assert_eq!(focus_count(&engine), before + 1, "tick moved the cursor");

        // A manual move restarts the countdown.
        engine.handle(Event::SwitchPressed(SwitchKey::Next));
        assert_eq!(engine.auto_scan().deadline(), Some(1000));

        // Zero interval is rejected and scanning goes on as before.
        engine.handle(Event::SettingChanged(Setting::PrimaryScanInterval(0)));
        assert_eq!(engine.auto_scan().rejected_config(), 1);
        assert!(engine.auto_scan().is_running());
    }

    #[test]
    fn back_button_select_dismisses_a_modal() {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let modal = tree.insert(
            Some(desktop),
            Element::new(Role::Window)
                .with_bounds(Rect::new(50.0, 50.0, 250.0, 250.0))
                .with_flags(ElementFlags::default() | ElementFlags::MODAL),
        );
        tree.insert(Some(modal), button(60.0, 60.0));

        let mut engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // into the modal
        engine.handle(Event::SwitchPressed(SwitchKey::Next)); // onto the back button
        assert_eq!(engine.navigator().current_node().kind, NodeKind::BackButton);

        engine.handle(Event::SwitchPressed(SwitchKey::Select));
        assert!(engine
            .host()
            .calls
            .contains(&Call::Key(KeyPress::plain(Key::Escape))));
        assert_eq!(engine.navigator().history_depth(), 0);
    }

    /// Desktop with a window (one multi-action text field) and a virtual
    /// keyboard with two keys.
    fn keyboard_engine() -> (Engine<RecordingHost>, ElementId) {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let w = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
        );
        let field = tree.insert(
            Some(w),
            Element::new(Role::TextField)
                .with_bounds(Rect::new(10.0, 10.0, 200.0, 40.0))
                .with_flags(ElementFlags::default() | ElementFlags::EDITABLE),
        );
        let keyboard = tree.insert(
            Some(desktop),
            Element::new(Role::Keyboard).with_bounds(Rect::new(0.0, 400.0, 400.0, 600.0)),
        );
        for x in [0.0, 40.0] {
            tree.insert(
                Some(keyboard),
                Element::new(Role::Key)
                    .with_bounds(Rect::new(x, 410.0, x + 30.0, 440.0))
                    .with_actions(PlatformActions::CLICK),
            );
        }
        let mut engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // into the window
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // field menu
        assert!(engine.menu().is_open());
        (engine, field)
    }

    #[test]
    fn keyboard_action_jumps_into_the_keyboard() {
        let (mut engine, _) = keyboard_engine();
        engine.handle(Event::MenuSelection(Action::Keyboard));

        assert!(!engine.menu().is_open());
        assert!(engine.host().calls.contains(&Call::KeyboardVisible(true)));
        assert!(engine.navigator().in_keyboard());

        // Selecting a key taps it with the standard hold.
        engine.handle(Event::SwitchPressed(SwitchKey::Select));
        assert!(engine.host().calls.iter().any(|c| matches!(
            c,
            Call::Tap(p, KEY_HOLD_MS) if *p == Point::new(15.0, 425.0)
        )));

        // Exiting through the back button hides the keyboard again.
        let back = engine
            .navigator()
            .current_group()
            .back_button_index()
            .unwrap();
        while engine.navigator().current_group().find_same(
            engine.navigator().current_node(),
        ) != Some(back)
        {
            engine.handle(Event::SwitchPressed(SwitchKey::Next));
        }
        engine.handle(Event::SwitchPressed(SwitchKey::Select));
        assert!(engine.host().calls.contains(&Call::KeyboardVisible(false)));
        assert!(!engine.navigator().in_keyboard());
    }

    #[test]
    fn text_navigation_uses_shifted_caret_keys_while_selecting() {
        let (mut engine, _) = keyboard_engine();
        engine.handle(Event::MenuSelection(Action::TextNavigation));
        assert_eq!(engine.menu().top().unwrap().kind, MenuKind::TextNavigation);

        engine.handle(Event::MenuSelection(Action::StartTextSelection));
        engine.handle(Event::MenuSelection(Action::MoveForwardOneChar));
        engine.handle(Event::MenuSelection(Action::MoveBackwardOneWord));
        engine.handle(Event::MenuSelection(Action::EndTextSelection));
        engine.handle(Event::MenuSelection(Action::MoveDownOneLine));

        let keys: Vec<KeyPress> = engine
            .host()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Key(k) => Some(*k),
                _ => None,
            })
            .collect();
        assert_eq!(
            keys,
            [
                KeyPress {
                    key: Key::ArrowRight,
                    ctrl: false,
                    shift: true
                },
                KeyPress {
                    key: Key::ArrowLeft,
                    ctrl: true,
                    shift: true
                },
                KeyPress {
                    key: Key::ArrowDown,
                    ctrl: false,
                    shift: false
                },
            ]
        );
        // The submenu stayed open through the repeatable movements.
        assert_eq!(engine.menu().top().unwrap().kind, MenuKind::TextNavigation);
    }

    #[test]
    fn scroll_menu_action_targets_the_scrollable_ancestor() {
        let mut tree = AxTree::new();
        let desktop = tree.insert(None, Element::new(Role::Desktop));
        let w = tree.insert(
            Some(desktop),
            Element::new(Role::Window).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
        );
        let list = tree.insert(
            Some(w),
            Element::new(Role::List)
                .with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0))
                .with_flags(ElementFlags::default() | ElementFlags::SCROLLABLE)
                .with_actions(PlatformActions::SCROLL_UP | PlatformActions::SCROLL_DOWN),
        );
        for i in 0..2 {
            tree.insert(Some(list), button(10.0, 10.0 + 50.0 * f64::from(i)));
        }

        let mut engine = Engine::new(RecordingHost::default(), tree, desktop).unwrap();
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // window
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // list group
        engine.handle(Event::SwitchPressed(SwitchKey::Select)); // button menu
        assert!(engine.menu().is_open());
        assert!(engine
            .menu()
            .top()
            .unwrap()
            .actions
            .contains(&Action::ScrollDown));

        engine.handle(Event::MenuSelection(Action::ScrollDown));
        assert!(engine
            .host()
            .calls
            .contains(&Call::Perform(list, PlatformActions::SCROLL_DOWN)));
        assert!(engine.menu().is_open(), "scrolling repeats");
    }

    #[test]
    fn platform_focus_change_moves_the_cursor() {
        let (mut engine, buttons) = two_button_engine();
        let before = focus_count(&engine);
        engine.handle(Event::FocusChanged { target: buttons[1] });
        assert_eq!(engine.navigator().current_node().target, Some(buttons[1]));
        assert_eq!(focus_count(&engine), before + 1);
    }

    #[test]
    fn tree_changes_resync_the_cursor() {
        let (mut engine, buttons) = two_button_engine();
        engine.handle(Event::SwitchPressed(SwitchKey::Select));
        engine.handle(Event::SwitchPressed(SwitchKey::Next));
        assert_eq!(engine.navigator().current_node().target, Some(buttons[1]));

        engine.tree_mut().remove(buttons[1]);
        engine.handle(Event::TreeChanged);
        assert_eq!(engine.navigator().current_node().target, Some(buttons[0]));
        // Scroll redraws the indication even without a repair.
        let before = focus_count(&engine);
        engine.handle(Event::Scroll);
        assert_eq!(focus_count(&engine), before + 1);
    }
}
