//! # RC Link Library
//!
//! Drive a PWM-based RC car with a gamepad over a UDP control link.
//!
//! This library provides the core functionality for the two endpoints:
//! the transmitter encodes gamepad state into fixed-layout control
//! frames and fires them over UDP; the receiver decodes frames, maps
//! them to servo and motor duty cycles, and falls back to a zero-duty
//! failsafe when the link goes silent.

pub mod config;
pub mod control;
pub mod error;
pub mod gamepad;
pub mod link;
pub mod proto;
pub mod pwm;
