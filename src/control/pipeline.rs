//! # Control Pipeline Module
//!
//! Glues the decode -> map -> apply path together on the receiver.
//!
//! The pipeline owns the [`CommandMapper`], the [`Watchdog`] and the
//! PWM driver. The receive loop in the binary only moves datagrams and
//! timeout expiries into it, which keeps everything with invariants
//! unit-testable against a recording PWM fake.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{MotorConfig, ServoConfig};
use crate::control::failsafe::{LinkState, Watchdog};
use crate::control::mapper::{ActuatorCommand, CommandMapper};
use crate::error::Result;
use crate::proto::decoder::decode_frame;
use crate::pwm::{PwmChannel, PwmDriver};

/// Receiver-side control pipeline over a PWM driver.
pub struct ControlPipeline<P: PwmDriver> {
    mapper: CommandMapper,
    watchdog: Watchdog,
    pwm: P,
}

impl<P: PwmDriver> ControlPipeline<P> {
    /// Creates a pipeline in the active state.
    pub fn new(mapper: CommandMapper, pwm: P) -> Self {
        Self {
            mapper,
            watchdog: Watchdog::new(),
            pwm,
        }
    }

    /// Configures frequency and range on both output channels.
    ///
    /// Invoked once at startup, before the receive loop.
    ///
    /// # Errors
    ///
    /// Returns `Pwm` error if the driver rejects the configuration.
    pub fn configure_outputs(&mut self, servo: &ServoConfig, motor: &MotorConfig) -> Result<()> {
        self.pwm
            .set_frequency(PwmChannel::Servo, servo.pwm_frequency_hz)?;
        self.pwm.set_range(PwmChannel::Servo, servo.pwm_range)?;

        self.pwm
            .set_frequency(PwmChannel::Motor, motor.pwm_frequency_hz)?;
        self.pwm.set_range(PwmChannel::Motor, motor.pwm_range)?;

        info!(
            "PWM outputs configured: servo {} Hz / range {}, motor {} Hz / range {}",
            servo.pwm_frequency_hz, servo.pwm_range, motor.pwm_frequency_hz, motor.pwm_range
        );
        Ok(())
    }

    /// Processes one received datagram.
    ///
    /// Decodes the frame, refreshes the watchdog, maps the controls and
    /// applies the resulting duty cycles to both channels. Recovery
    /// from failsafe is immediate: the mapped command of this frame is
    /// what gets applied.
    ///
    /// # Errors
    ///
    /// Returns `Frame` error for a malformed datagram (the watchdog is
    /// *not* refreshed in that case) or `Pwm` error if applying the
    /// command fails.
    pub fn handle_frame(&mut self, datagram: &[u8], now: Instant) -> Result<ActuatorCommand> {
        let controls = decode_frame(datagram)?;

        if self.watchdog.frame_received(now) {
            info!("Control link recovered, resuming mapped output");
        }

        let command = self.mapper.map(&controls);
        debug!(
            "Controls steer={} throttle={} boost={} -> servo {} motor {}",
            controls.steer, controls.throttle, controls.boost, command.servo_duty, command.motor_duty
        );

        self.apply(command)?;
        Ok(command)
    }

    /// Processes an expired receive window.
    ///
    /// Forces both channels to zero duty (no pulses). The stop command
    /// is re-issued on every expiry while the link stays silent; the
    /// engage transition is logged once.
    ///
    /// # Errors
    ///
    /// Returns `Pwm` error if the stop command cannot be applied.
    pub fn handle_timeout(&mut self, now: Instant) -> Result<()> {
        if self.watchdog.timeout_expired(now) {
            warn!("Control link timed out, engaging failsafe (zero duty on both channels)");
        }

        self.apply(ActuatorCommand::off())
    }

    /// Applies a command to both channels.
    fn apply(&mut self, command: ActuatorCommand) -> Result<()> {
        self.pwm
            .set_duty_cycle(PwmChannel::Motor, command.motor_duty)?;
        self.pwm
            .set_duty_cycle(PwmChannel::Servo, command.servo_duty)?;
        Ok(())
    }

    /// Current link supervision state.
    pub fn link_state(&self) -> LinkState {
        self.watchdog.state()
    }
}
