//! # Control Module
//!
//! Receiver-side control pipeline.
//!
//! This module handles:
//! - Mapping decoded control values to PWM duty commands
//! - The watchdog/failsafe state machine supervising the link
//! - Driving the actuator outputs per received frame

pub mod failsafe;
pub mod mapper;
pub mod pipeline;
