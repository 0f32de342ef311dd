//! # Gamepad State Module
//!
//! This module handles parsing raw evdev events from the gamepad and
//! converting them into a structured [`ControlState`].
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range | Description |
//! |------|------------|-------|-------------|
//! | Left Stick X | ABS_X | 0-255 | Steering |
//! | Left Stick Y | ABS_Y | 0-255 | Unused |
//! | Right Stick X | ABS_RX | 0-255 | Unused |
//! | Right Stick Y | ABS_RY | 0-255 | Throttle |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code | Description |
//! |--------|------------|-------------|
//! | R1 | BTN_TR | Boost |
//!
//! The unused axes are still tracked so the state mirrors the physical
//! controller, but only steering, throttle and boost reach the wire
//! (see [`crate::proto::encoder`]).

use evdev::{AbsoluteAxisType, InputEvent, Key};

/// Raw axis value range reported by the gamepad.
pub const AXIS_MIN: i32 = 0;
/// Raw axis value range reported by the gamepad.
pub const AXIS_MAX: i32 = 255;
/// Raw axis center value.
pub const AXIS_CENTER: i32 = 128;

/// Represents the control-relevant state of the gamepad.
///
/// All analog values are stored as raw 8-bit stick values (0-255,
/// 128 = center). The state is mutated in place as input events arrive;
/// axes without a new event retain their previous value.
///
/// Sticks initialize at center so the first frame sent before any input
/// event commands neutral steering and throttle.
///
/// # Examples
///
/// ```
/// use rc_link::gamepad::state::ControlState;
///
/// let state = ControlState::default();
/// assert_eq!(state.left_stick_x, 128); // Centered
/// assert!(!state.boost);               // Not pressed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    /// Left stick X axis (steering). 0 = full left, 255 = full right.
    pub left_stick_x: u8,
    /// Left stick Y axis. Tracked but not transmitted.
    pub left_stick_y: u8,
    /// Right stick X axis. Tracked but not transmitted.
    pub right_stick_x: u8,
    /// Right stick Y axis (throttle, raw polarity). 0 = full up, 255 = full down.
    pub right_stick_y: u8,
    /// Boost button (R1). Widens the motor duty range on the receiver.
    pub boost: bool,
}

impl Default for ControlState {
    /// Creates a new control state with all sticks centered and boost released.
    fn default() -> Self {
        Self {
            left_stick_x: AXIS_CENTER as u8,
            left_stick_y: AXIS_CENTER as u8,
            right_stick_x: AXIS_CENTER as u8,
            right_stick_y: AXIS_CENTER as u8,
            boost: false,
        }
    }
}

impl ControlState {
    /// Creates a new control state with default (centered/released) values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parses raw evdev events and maintains the control state.
///
/// The `StateTracker` accumulates events from the gamepad and provides
/// a snapshot of the current state via [`StateTracker::state()`].
///
/// # Thread Safety
///
/// `StateTracker` is not thread-safe. Use from a single task/thread only.
///
/// # Examples
///
/// ```
/// use rc_link::gamepad::state::StateTracker;
///
/// let mut tracker = StateTracker::new();
/// // Process events from the gamepad...
/// let state = tracker.state();
/// println!("Steering: {}", state.left_stick_x);
/// ```
#[derive(Debug, Default)]
pub struct StateTracker {
    state: ControlState,
}

impl StateTracker {
    /// Creates a new tracker with default control state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the current control state.
    #[must_use]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Processes a single evdev input event and updates internal state.
    ///
    /// Handles absolute axis events (sticks) and key events (the boost
    /// button). All other events are ignored.
    ///
    /// # Arguments
    ///
    /// * `event` - The evdev input event to process
    pub fn process_event(&mut self, event: &InputEvent) {
        match event.kind() {
            evdev::InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
            }
            evdev::InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
            }
            _ => {
                // Ignore sync events and other event types
            }
        }
    }

    /// Processes an absolute axis event.
    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        let value = clamp_axis(value);

        match axis {
            AbsoluteAxisType::ABS_X => self.state.left_stick_x = value,
            AbsoluteAxisType::ABS_Y => self.state.left_stick_y = value,

            // Right stick reports as ABS_RX / ABS_RY on the DualShock
            AbsoluteAxisType::ABS_RX => self.state.right_stick_x = value,
            AbsoluteAxisType::ABS_RY => self.state.right_stick_y = value,

            _ => {
                // Ignore other axes (d-pad, gyro, accelerometer, etc.)
            }
        }
    }

    /// Processes a key/button event.
    fn process_key_event(&mut self, key: Key, pressed: bool) {
        if key == Key::BTN_TR {
            self.state.boost = pressed;
        }
        // Other buttons are not mapped
    }

    /// Resets all state to default (centered sticks, boost released).
    pub fn reset(&mut self) {
        self.state = ControlState::default();
    }
}

/// Clamps a raw axis value into the 8-bit wire range.
#[inline]
fn clamp_axis(value: i32) -> u8 {
    value.clamp(AXIS_MIN, AXIS_MAX) as u8
}
