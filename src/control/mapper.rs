//! # Command Mapper Module
//!
//! Maps decoded control values to PWM duty-cycle commands.
//!
//! ## Duty Assignments
//!
//! | Output | Input | Duty range |
//! |--------|-------|------------|
//! | Servo | steer 0-255 | 210 -> 90 (inverted) |
//! | Motor | throttle 0-255 | 1400-1600, 1000-2000 boosted |
//!
//! ## Calibration
//!
//! The servo output range is inverted (steer 0 maps to duty 210, steer
//! 255 to duty 90) to correct the physical mounting orientation of the
//! steering servo. The motor range is centered at 1500 (1.5 ms pulse =
//! ESC neutral) with a symmetric spread of ±100, widened to ±500 while
//! boost is held. These are calibration facts about the deployed
//! vehicle and live in [`ServoCalibration`] / [`MotorCalibration`]
//! rather than inline constants, so a differently-mounted servo or a
//! different ESC can be recalibrated through config alone.
//!
//! Boost widens the range but never shifts the center, so reaching the
//! braking end of the ESC range from a forward setting requires boost.
//! That asymmetry is part of the deployed control feel and is
//! deliberately preserved here.

use crate::config::{MotorConfig, ServoConfig};
use crate::proto::DecodedControls;

/// Servo duty endpoints for the steering axis.
///
/// `duty_full_left` is the duty commanded at steer 0, `duty_full_right`
/// at steer 255. The deployed values are inverted (210 down to 90).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCalibration {
    /// Duty at full-left stick deflection (steer = 0).
    pub duty_full_left: i64,
    /// Duty at full-right stick deflection (steer = 255).
    pub duty_full_right: i64,
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            duty_full_left: 210,
            duty_full_right: 90,
        }
    }
}

/// Motor duty calibration for the throttle axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCalibration {
    /// Duty at mid-stick, the ESC neutral point (1.5 ms pulse).
    pub center_duty: i64,
    /// Symmetric half-width of the commandable range without boost.
    pub duty_spread: i64,
    /// Spread multiplier applied while the boost button is held.
    pub boost_multiplier: i64,
}

impl Default for MotorCalibration {
    fn default() -> Self {
        Self {
            center_duty: 1500,
            duty_spread: 100,
            boost_multiplier: 5,
        }
    }
}

/// A PWM command for both actuator channels.
///
/// Derived per received frame, immediately applied and not retained.
/// `servo_duty` is in the servo channel's range (0-2000), `motor_duty`
/// in the motor channel's range (0-20000). A duty of 0 stops PWM output
/// entirely, which is distinct from "centered".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    /// Steering servo duty cycle.
    pub servo_duty: u32,
    /// Motor ESC duty cycle.
    pub motor_duty: u32,
}

impl ActuatorCommand {
    /// The failsafe command: no pulses on either channel.
    ///
    /// For the ESC this is the safe stop; the servo is left unpowered.
    #[must_use]
    pub fn off() -> Self {
        Self {
            servo_duty: 0,
            motor_duty: 0,
        }
    }
}

/// An affine transform from one closed numeric range to another.
///
/// Computed in floating point and truncated to integer (toward zero),
/// matching the behavior the actuator hardware was calibrated against.
/// The output range may be inverted (`out_lo > out_hi`), in which case
/// the mapping is strictly decreasing.
///
/// # Examples
///
/// ```
/// use rc_link::control::mapper::linear_map;
///
/// assert_eq!(linear_map(0, 0, 255, 210, 90), 210);
/// assert_eq!(linear_map(255, 0, 255, 210, 90), 90);
/// assert_eq!(linear_map(128, 0, 255, 1400, 1600), 1500);
/// ```
#[must_use]
pub fn linear_map(value: i64, in_lo: i64, in_hi: i64, out_lo: i64, out_hi: i64) -> i64 {
    let in_span = (in_hi - in_lo) as f64;
    let out_span = (out_hi - out_lo) as f64;
    let scaled = (value - in_lo) as f64 / in_span;

    (out_lo as f64 + scaled * out_span) as i64
}

/// Maps decoded controls to actuator commands.
///
/// # Examples
///
/// ```
/// use rc_link::control::mapper::CommandMapper;
/// use rc_link::proto::DecodedControls;
///
/// let mapper = CommandMapper::default();
/// let cmd = mapper.map(&DecodedControls::new(255, 255, false));
/// assert_eq!(cmd.servo_duty, 90);   // Full right
/// assert_eq!(cmd.motor_duty, 1600); // Full forward, no boost
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandMapper {
    servo: ServoCalibration,
    motor: MotorCalibration,
}

impl CommandMapper {
    /// Creates a mapper with explicit calibrations.
    #[must_use]
    pub fn new(servo: ServoCalibration, motor: MotorCalibration) -> Self {
        Self { servo, motor }
    }

    /// Creates a mapper from the servo/motor config sections.
    #[must_use]
    pub fn from_config(servo: &ServoConfig, motor: &MotorConfig) -> Self {
        Self::new(
            ServoCalibration {
                duty_full_left: i64::from(servo.duty_full_left),
                duty_full_right: i64::from(servo.duty_full_right),
            },
            MotorCalibration {
                center_duty: i64::from(motor.center_duty),
                duty_spread: i64::from(motor.duty_spread),
                boost_multiplier: i64::from(motor.boost_multiplier),
            },
        )
    }

    /// Maps decoded control values to a PWM command.
    ///
    /// Servo: linear map of steer over the (inverted) servo endpoints.
    /// Motor: linear map of throttle over `center ± spread`, with the
    /// spread multiplied while boost is held. Boost widens the range
    /// symmetrically; the center duty is identical in both states.
    #[must_use]
    pub fn map(&self, controls: &DecodedControls) -> ActuatorCommand {
        let multiplier = if controls.boost {
            self.motor.boost_multiplier
        } else {
            1
        };

        let servo_duty = linear_map(
            i64::from(controls.steer),
            0,
            255,
            self.servo.duty_full_left,
            self.servo.duty_full_right,
        );

        let half_width = self.motor.duty_spread * multiplier;
        let motor_duty = linear_map(
            i64::from(controls.throttle),
            0,
            255,
            self.motor.center_duty - half_width,
            self.motor.center_duty + half_width,
        );

        ActuatorCommand {
            servo_duty: servo_duty as u32,
            motor_duty: motor_duty as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(steer: u8, throttle: u8, boost: bool) -> DecodedControls {
        DecodedControls::new(steer, throttle, boost)
    }

    // ==================== linear_map Tests ====================

    #[test]
    fn test_linear_map_endpoints() {
        assert_eq!(linear_map(0, 0, 255, 1400, 1600), 1400);
        assert_eq!(linear_map(255, 0, 255, 1400, 1600), 1600);
    }

    #[test]
    fn test_linear_map_inverted_output_range() {
        assert_eq!(linear_map(0, 0, 255, 210, 90), 210);
        assert_eq!(linear_map(255, 0, 255, 210, 90), 90);
    }

    #[test]
    fn test_linear_map_truncates_toward_zero() {
        // 210 + (1/255) * -120 = 209.53 -> 209
        assert_eq!(linear_map(1, 0, 255, 210, 90), 209);
    }

    #[test]
    fn test_linear_map_identity() {
        for v in [0, 100, 255] {
            assert_eq!(linear_map(v, 0, 255, 0, 255), v);
        }
    }

    // ==================== Servo Mapping Tests ====================

    #[test]
    fn test_servo_endpoints() {
        let mapper = CommandMapper::default();

        assert_eq!(mapper.map(&controls(0, 128, false)).servo_duty, 210);
        assert_eq!(mapper.map(&controls(255, 128, false)).servo_duty, 90);
    }

    #[test]
    fn test_servo_mapping_strictly_decreasing() {
        let mapper = CommandMapper::default();

        let mut previous = i64::MAX;
        for steer in (0u8..=255).step_by(17) {
            let duty = i64::from(mapper.map(&controls(steer, 128, false)).servo_duty);
            assert!(
                duty < previous,
                "Servo duty must decrease with steer: {} at steer {}",
                duty,
                steer
            );
            previous = duty;
        }
    }

    #[test]
    fn test_servo_unaffected_by_boost() {
        let mapper = CommandMapper::default();

        let plain = mapper.map(&controls(40, 128, false));
        let boosted = mapper.map(&controls(40, 128, true));
        assert_eq!(plain.servo_duty, boosted.servo_duty);
    }

    // ==================== Motor Mapping Tests ====================

    #[test]
    fn test_motor_range_without_boost() {
        let mapper = CommandMapper::default();

        assert_eq!(mapper.map(&controls(128, 0, false)).motor_duty, 1400);
        assert_eq!(mapper.map(&controls(128, 255, false)).motor_duty, 1600);
    }

    #[test]
    fn test_motor_range_with_boost() {
        let mapper = CommandMapper::default();

        assert_eq!(mapper.map(&controls(128, 0, true)).motor_duty, 1000);
        assert_eq!(mapper.map(&controls(128, 255, true)).motor_duty, 2000);
    }

    #[test]
    fn test_motor_center_invariant_under_boost() {
        let mapper = CommandMapper::default();

        let plain = mapper.map(&controls(128, 128, false)).motor_duty as i64;
        let boosted = mapper.map(&controls(128, 128, true)).motor_duty as i64;

        // Mid-stick maps to (approximately) the center duty in both
        // states; only the spread changes with boost.
        assert!((plain - 1500).abs() <= 2, "plain center: {}", plain);
        assert!((boosted - 1500).abs() <= 2, "boosted center: {}", boosted);
    }

    #[test]
    fn test_boost_widens_range_fivefold() {
        let mapper = CommandMapper::default();

        let width = |boost: bool| {
            let lo = mapper.map(&controls(128, 0, boost)).motor_duty as i64;
            let hi = mapper.map(&controls(128, 255, boost)).motor_duty as i64;
            hi - lo
        };

        assert_eq!(width(false), 200);
        assert_eq!(width(true), 1000);
        assert_eq!(width(true), 5 * width(false));
    }

    // ==================== End-to-End and Config Tests ====================

    #[test]
    fn test_end_to_end_example() {
        // Decoded (steer=255, throttle=255, boost off) from the frame
        // 00 00 00 00 00 00 FF 00: servo 90, motor 1600.
        let mapper = CommandMapper::default();
        let cmd = mapper.map(&controls(255, 255, false));

        assert_eq!(cmd.servo_duty, 90);
        assert_eq!(cmd.motor_duty, 1600);
    }

    #[test]
    fn test_map_is_idempotent() {
        let mapper = CommandMapper::default();
        let c = controls(17, 200, true);

        assert_eq!(mapper.map(&c), mapper.map(&c));
    }

    #[test]
    fn test_from_config_matches_defaults() {
        let config = crate::config::Config::default();
        let mapper = CommandMapper::from_config(&config.servo, &config.motor);

        let c = controls(200, 73, true);
        assert_eq!(mapper.map(&c), CommandMapper::default().map(&c));
    }

    #[test]
    fn test_custom_calibration() {
        // A non-inverted servo mount
        let mapper = CommandMapper::new(
            ServoCalibration {
                duty_full_left: 90,
                duty_full_right: 210,
            },
            MotorCalibration::default(),
        );

        assert_eq!(mapper.map(&controls(0, 128, false)).servo_duty, 90);
        assert_eq!(mapper.map(&controls(255, 128, false)).servo_duty, 210);
    }

    #[test]
    fn test_off_command_is_all_zero() {
        let off = ActuatorCommand::off();
        assert_eq!(off.servo_duty, 0);
        assert_eq!(off.motor_duty, 0);
    }
}
