// Copyright 2025 the Scanpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The auto-scan state machine.

/// Timestamp-driven auto-scan timer.
///
/// The timer is *running* while it is enabled and a positive primary
/// interval is configured; while running it carries the deadline of the next
/// tick. Every successful focus move restarts the countdown so the user
/// always gets a full interval to react to the node they are looking at.
///
/// Two intervals exist: the primary interval, and an optional faster one
/// used while the cursor is inside the virtual keyboard (key-by-key entry
/// wants a quicker cadence). The keyboard interval falls back to the primary
/// one when unset.
///
/// Configuration setters validate their input: a zero interval is rejected,
/// the previous value is retained, and [`Self::rejected_config`] is bumped
/// so hosts can surface the misconfiguration.
#[derive(Clone, Debug, Default)]
pub struct AutoScan {
    /// Primary tick interval in ms; `0` means not configured.
    primary_interval_ms: u64,
    /// Interval while inside the virtual keyboard; `None` falls back to
    /// the primary interval.
    keyboard_interval_ms: Option<u64>,
    enabled: bool,
    in_keyboard: bool,
    /// Next tick deadline. `Some` exactly while running.
    deadline: Option<u64>,
    rejected_config: u32,
}

impl AutoScan {
    /// A disabled, unconfigured timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the timer is counting toward a tick.
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// The next tick deadline, while running.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// The interval currently in effect.
    pub fn interval_ms(&self) -> u64 {
        if self.in_keyboard {
            self.keyboard_interval_ms.unwrap_or(self.primary_interval_ms)
        } else {
            self.primary_interval_ms
        }
    }

    /// How many configuration values were rejected as invalid.
    pub fn rejected_config(&self) -> u32 {
        self.rejected_config
    }

    /// Set the primary interval. Rejects `0`, keeping the previous value.
    ///
    /// An interval change while running re-arms the countdown from `now`.
    pub fn set_primary_interval(&mut self, ms: u64, now: u64) -> bool {
        if ms == 0 {
            self.rejected_config += 1;
            return false;
        }
        self.primary_interval_ms = ms;
        self.rearm(now);
        true
    }

    /// Set or clear the keyboard interval. Rejects `Some(0)`, keeping the
    /// previous value.
    pub fn set_keyboard_interval(&mut self, ms: Option<u64>, now: u64) -> bool {
        if ms == Some(0) {
            self.rejected_config += 1;
            return false;
        }
        self.keyboard_interval_ms = ms;
        if self.in_keyboard {
            self.rearm(now);
        }
        true
    }

    /// Enable or disable auto-scan.
    ///
    /// Enabling arms the timer only when a positive primary interval is
    /// configured, and is idempotent: enabling an already-running timer does
    /// not reset its countdown. Disabling always disarms, whatever the
    /// configuration.
    pub fn set_enabled(&mut self, enabled: bool, now: u64) {
        if !enabled {
            self.enabled = false;
            self.deadline = None;
            return;
        }
        if self.enabled {
            return;
        }
        if self.primary_interval_ms == 0 {
            return;
        }
        self.enabled = true;
        self.deadline = Some(now + self.interval_ms());
    }

    /// Tell the timer whether the cursor is inside the virtual keyboard.
    ///
    /// A context change while running re-arms with the newly selected
    /// interval.
    pub fn set_in_keyboard(&mut self, in_keyboard: bool, now: u64) {
        if self.in_keyboard == in_keyboard {
            return;
        }
        self.in_keyboard = in_keyboard;
        self.rearm(now);
    }

    /// Restart the countdown after a successful focus move.
    pub fn note_focus_moved(&mut self, now: u64) {
        self.rearm(now);
    }

    /// Report whether a tick is due at `now`, scheduling the next one.
    ///
    /// The next deadline counts from `now`, not from the missed deadline,
    /// so a host that polls late never gets a burst of catch-up ticks.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval_ms());
                true
            }
            _ => false,
        }
    }

    fn rearm(&mut self, now: u64) {
        if self.deadline.is_some() {
            self.deadline = Some(now + self.interval_ms());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(primary: u64) -> AutoScan {
        let mut scan = AutoScan::new();
        assert!(scan.set_primary_interval(primary, 0));
        scan.set_enabled(true, 0);
        assert!(scan.is_running());
        scan
    }

    #[test]
    fn disabled_until_configured() {
        let mut scan = AutoScan::new();
        scan.set_enabled(true, 0);
        assert!(!scan.is_running(), "no interval, nothing to arm");
        assert!(!scan.poll(10_000));

        assert!(scan.set_primary_interval(500, 100));
        scan.set_enabled(true, 100);
        assert_eq!(scan.deadline(), Some(600));
    }

    #[test]
    fn enable_is_idempotent() {
        let mut scan = running(800);
        assert_eq!(scan.deadline(), Some(800));
        // Re-enabling mid-countdown must not push the deadline out.
        scan.set_enabled(true, 700);
        assert_eq!(scan.deadline(), Some(800));
    }

    #[test]
    fn disable_always_disarms() {
        let mut scan = running(800);
        scan.set_enabled(false, 100);
        assert!(!scan.is_running());
        assert!(!scan.poll(10_000), "no tick may fire after disable");
        // Disabling a disabled timer is fine too.
        scan.set_enabled(false, 200);
        assert!(!scan.is_running());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut scan = running(800);
        assert!(!scan.set_primary_interval(0, 100));
        assert_eq!(scan.interval_ms(), 800, "previous value retained");
        assert!(!scan.set_keyboard_interval(Some(0), 100));
        assert_eq!(scan.rejected_config(), 2);
        // The running countdown was not disturbed by rejected values.
        assert_eq!(scan.deadline(), Some(800));
    }

    #[test]
    fn interval_change_rearms_from_now() {
        let mut scan = running(800);
        assert!(scan.set_primary_interval(300, 500));
        assert_eq!(scan.deadline(), Some(800), "500 + new 300");
        assert!(scan.poll(800));
        assert_eq!(scan.deadline(), Some(1100));
    }

    #[test]
    fn focus_moves_restart_the_countdown() {
        let mut scan = running(800);
        scan.note_focus_moved(600);
        assert!(!scan.poll(800), "old deadline no longer applies");
        assert!(scan.poll(1400));
    }

    #[test]
    fn keyboard_context_selects_the_faster_interval() {
        let mut scan = running(800);
        assert!(scan.set_keyboard_interval(Some(300), 0));
        assert_eq!(scan.interval_ms(), 800);

        scan.set_in_keyboard(true, 1000);
        assert_eq!(scan.interval_ms(), 300);
        assert_eq!(scan.deadline(), Some(1300));

        scan.set_in_keyboard(false, 1300);
        assert_eq!(scan.deadline(), Some(2100));

        // Without a keyboard interval the primary one serves both contexts.
        assert!(scan.set_keyboard_interval(None, 2100));
        scan.set_in_keyboard(true, 2100);
        assert_eq!(scan.interval_ms(), 800);
    }

    #[test]
    fn late_polls_do_not_burst() {
        let mut scan = running(800);
        // The host wakes up long after several deadlines were missed.
        assert!(scan.poll(5000));
        assert!(!scan.poll(5001), "exactly one tick per due poll");
        assert_eq!(scan.deadline(), Some(5800));
    }
}
