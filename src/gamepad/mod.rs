//! # Gamepad Module
//!
//! Gamepad input handling for the transmitter endpoint.
//!
//! This module handles:
//! - Gamepad detection and connection via evdev
//! - Reading analog stick and button inputs
//! - Accumulating events into a [`state::ControlState`]

pub mod device;
pub mod state;
