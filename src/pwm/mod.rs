//! # PWM Output Module
//!
//! Drives the steering servo and motor ESC through GPIO PWM.
//!
//! The hardware is reached through the [`PwmDriver`] trait so the
//! control pipeline can be exercised in tests with a recording fake
//! instead of real pins. The concrete implementation uses `rppal`
//! software PWM on the Raspberry Pi.
//!
//! ## Duty semantics
//!
//! A channel is configured with a frequency and a range; a duty value
//! `d` then produces a pulse width of `period * d / range`. At 50 Hz
//! with range 20000 one duty unit is 1 µs of pulse width; with range
//! 2000 it is 10 µs. A duty of 0 stops PWM output entirely (no pulses),
//! which is distinct from commanding the range midpoint.

use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};
use tracing::debug;

use crate::error::{RcLinkError, Result};

/// Actuator output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PwmChannel {
    /// Steering servo.
    Servo,
    /// Motor ESC.
    Motor,
}

impl std::fmt::Display for PwmChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PwmChannel::Servo => write!(f, "servo"),
            PwmChannel::Motor => write!(f, "motor"),
        }
    }
}

/// Trait for PWM output operations
///
/// Frequency and range are set once at startup; duty cycles are set
/// continuously per received frame and on failsafe.
pub trait PwmDriver {
    /// Set the PWM frequency for a channel in Hz.
    fn set_frequency(&mut self, channel: PwmChannel, hz: u32) -> Result<()>;

    /// Set the duty-cycle range for a channel.
    fn set_range(&mut self, channel: PwmChannel, range: u32) -> Result<()>;

    /// Set the duty cycle for a channel. A duty of 0 stops output.
    fn set_duty_cycle(&mut self, channel: PwmChannel, duty: u32) -> Result<()>;
}

/// Per-channel output state for [`GpioPwm`].
struct ChannelOutput {
    pin: OutputPin,
    frequency_hz: u32,
    range: u32,
}

impl ChannelOutput {
    fn new(gpio: &Gpio, pin: u8) -> Result<Self> {
        let pin = gpio
            .get(pin)
            .map_err(|e| RcLinkError::Pwm(format!("Failed to acquire GPIO {}: {}", pin, e)))?
            .into_output();

        Ok(Self {
            pin,
            frequency_hz: 0,
            range: 0,
        })
    }
}

/// GPIO-backed PWM driver for the Raspberry Pi.
///
/// Acquiring a pin configures it as an output, which covers the
/// pin-mode setup the PWM channels need.
pub struct GpioPwm {
    servo: ChannelOutput,
    motor: ChannelOutput,
}

impl GpioPwm {
    /// Acquire the servo and motor GPIO pins.
    ///
    /// # Arguments
    ///
    /// * `servo_pin` - BCM pin number of the steering servo
    /// * `motor_pin` - BCM pin number of the motor ESC
    ///
    /// # Errors
    ///
    /// Returns `Pwm` error if the GPIO peripheral or either pin cannot
    /// be acquired (e.g., not running on a Pi, or pin already in use).
    pub fn new(servo_pin: u8, motor_pin: u8) -> Result<Self> {
        let gpio = Gpio::new()
            .map_err(|e| RcLinkError::Pwm(format!("Failed to open GPIO peripheral: {}", e)))?;

        Ok(Self {
            servo: ChannelOutput::new(&gpio, servo_pin)?,
            motor: ChannelOutput::new(&gpio, motor_pin)?,
        })
    }

    fn channel_mut(&mut self, channel: PwmChannel) -> &mut ChannelOutput {
        match channel {
            PwmChannel::Servo => &mut self.servo,
            PwmChannel::Motor => &mut self.motor,
        }
    }
}

impl PwmDriver for GpioPwm {
    fn set_frequency(&mut self, channel: PwmChannel, hz: u32) -> Result<()> {
        if hz == 0 {
            return Err(RcLinkError::Pwm(format!(
                "PWM frequency for {} channel must be non-zero",
                channel
            )));
        }
        self.channel_mut(channel).frequency_hz = hz;
        Ok(())
    }

    fn set_range(&mut self, channel: PwmChannel, range: u32) -> Result<()> {
        if range == 0 {
            return Err(RcLinkError::Pwm(format!(
                "PWM range for {} channel must be non-zero",
                channel
            )));
        }
        self.channel_mut(channel).range = range;
        Ok(())
    }

    fn set_duty_cycle(&mut self, channel: PwmChannel, duty: u32) -> Result<()> {
        let output = self.channel_mut(channel);

        if output.frequency_hz == 0 || output.range == 0 {
            return Err(RcLinkError::Pwm(format!(
                "{} channel used before frequency/range configuration",
                channel
            )));
        }

        if duty == 0 {
            // No pulses at all - the failsafe stop, not the midpoint
            output
                .pin
                .clear_pwm()
                .map_err(|e| RcLinkError::Pwm(format!("Failed to stop {} PWM: {}", channel, e)))?;
            debug!("Stopped PWM output on {} channel", channel);
            return Ok(());
        }

        let period_us = 1_000_000u64 / u64::from(output.frequency_hz);
        let pulse_us = period_us * u64::from(duty.min(output.range)) / u64::from(output.range);

        output
            .pin
            .set_pwm(
                Duration::from_micros(period_us),
                Duration::from_micros(pulse_us),
            )
            .map_err(|e| {
                RcLinkError::Pwm(format!("Failed to set {} duty cycle: {}", channel, e))
            })?;

        debug!(
            "Set {} duty to {} ({} us pulse / {} us period)",
            channel, duty, pulse_us, period_us
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::{PwmCall, RecordingPwm};
    use super::*;

    #[test]
    fn test_channel_display() {
        assert_eq!(PwmChannel::Servo.to_string(), "servo");
        assert_eq!(PwmChannel::Motor.to_string(), "motor");
    }

    #[test]
    fn test_recording_pwm_records_in_order() {
        let mut pwm = RecordingPwm::new();

        pwm.set_frequency(PwmChannel::Motor, 50).unwrap();
        pwm.set_range(PwmChannel::Motor, 20000).unwrap();
        pwm.set_duty_cycle(PwmChannel::Motor, 1500).unwrap();

        assert_eq!(
            pwm.calls(),
            vec![
                PwmCall::Frequency(PwmChannel::Motor, 50),
                PwmCall::Range(PwmChannel::Motor, 20000),
                PwmCall::Duty(PwmChannel::Motor, 1500),
            ]
        );
    }

    #[test]
    fn test_recording_pwm_clones_share_log() {
        let pwm = RecordingPwm::new();
        let mut handle = pwm.clone();

        handle.set_duty_cycle(PwmChannel::Servo, 150).unwrap();
        assert_eq!(pwm.last_duty(PwmChannel::Servo), Some(150));
    }

    #[test]
    fn test_recording_pwm_duties_filter_by_channel() {
        let mut pwm = RecordingPwm::new();

        pwm.set_duty_cycle(PwmChannel::Servo, 210).unwrap();
        pwm.set_duty_cycle(PwmChannel::Motor, 1400).unwrap();
        pwm.set_duty_cycle(PwmChannel::Servo, 90).unwrap();

        assert_eq!(pwm.duties(PwmChannel::Servo), vec![210, 90]);
        assert_eq!(pwm.duties(PwmChannel::Motor), vec![1400]);
    }

    // Integration test - only runs on a Raspberry Pi with free GPIO
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_gpio_pwm_with_real_hardware() {
        let mut pwm = GpioPwm::new(13, 12).expect("GPIO not available");

        pwm.set_frequency(PwmChannel::Servo, 50).unwrap();
        pwm.set_range(PwmChannel::Servo, 2000).unwrap();
        pwm.set_duty_cycle(PwmChannel::Servo, 150).unwrap();
        pwm.set_duty_cycle(PwmChannel::Servo, 0).unwrap();
    }
}
