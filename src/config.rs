//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! The defaults reproduce the deployed vehicle's constants, so both
//! endpoints run without a config file present. The link section must
//! match exactly on both endpoints.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub gamepad: GamepadConfig,
    #[serde(default)]
    pub servo: ServoConfig,
    #[serde(default)]
    pub motor: MotorConfig,
}

/// UDP link configuration, shared by both endpoints
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Receiver address: the transmitter sends here, the receiver binds it.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Receive window per attempt; the failsafe window.
    #[serde(default = "default_receive_timeout_ms")]
    pub receive_timeout_ms: u64,
}

/// Gamepad configuration (transmitter endpoint)
#[derive(Debug, Deserialize, Clone)]
pub struct GamepadConfig {
    /// Explicit evdev device path; empty means auto-detect.
    #[serde(default)]
    pub device_path: String,
}

/// Steering servo output configuration (receiver endpoint)
#[derive(Debug, Deserialize, Clone)]
pub struct ServoConfig {
    #[serde(default = "default_servo_gpio_pin")]
    pub gpio_pin: u8,

    #[serde(default = "default_pwm_frequency_hz")]
    pub pwm_frequency_hz: u32,

    /// Duty range: 2000 at 50 Hz gives 10 us pulse-width resolution.
    #[serde(default = "default_servo_pwm_range")]
    pub pwm_range: u32,

    /// Duty at full-left stick. Larger than `duty_full_right` on the
    /// deployed vehicle because of the servo's mounting orientation.
    #[serde(default = "default_servo_duty_full_left")]
    pub duty_full_left: u32,

    /// Duty at full-right stick.
    #[serde(default = "default_servo_duty_full_right")]
    pub duty_full_right: u32,
}

/// Motor ESC output configuration (receiver endpoint)
#[derive(Debug, Deserialize, Clone)]
pub struct MotorConfig {
    #[serde(default = "default_motor_gpio_pin")]
    pub gpio_pin: u8,

    #[serde(default = "default_pwm_frequency_hz")]
    pub pwm_frequency_hz: u32,

    /// Duty range: 20000 at 50 Hz gives 1 us pulse-width resolution.
    #[serde(default = "default_motor_pwm_range")]
    pub pwm_range: u32,

    /// ESC neutral duty (1.5 ms pulse).
    #[serde(default = "default_motor_center_duty")]
    pub center_duty: u32,

    /// Half-width of the commandable duty range without boost.
    #[serde(default = "default_motor_duty_spread")]
    pub duty_spread: u32,

    /// Spread multiplier while boost is held.
    #[serde(default = "default_boost_multiplier")]
    pub boost_multiplier: u32,
}

// Default value functions
fn default_address() -> String { "192.168.1.101".to_string() }
fn default_port() -> u16 { 1337 }
fn default_receive_timeout_ms() -> u64 { 1000 }

fn default_pwm_frequency_hz() -> u32 { 50 }
fn default_servo_gpio_pin() -> u8 { 13 }
fn default_servo_pwm_range() -> u32 { 2000 }
fn default_servo_duty_full_left() -> u32 { 210 }
fn default_servo_duty_full_right() -> u32 { 90 }

fn default_motor_gpio_pin() -> u8 { 12 }
fn default_motor_pwm_range() -> u32 { 20000 }
fn default_motor_center_duty() -> u32 { 1500 }
fn default_motor_duty_spread() -> u32 { 100 }
fn default_boost_multiplier() -> u32 { 5 }

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            receive_timeout_ms: default_receive_timeout_ms(),
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            gpio_pin: default_servo_gpio_pin(),
            pwm_frequency_hz: default_pwm_frequency_hz(),
            pwm_range: default_servo_pwm_range(),
            duty_full_left: default_servo_duty_full_left(),
            duty_full_right: default_servo_duty_full_right(),
        }
    }
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            gpio_pin: default_motor_gpio_pin(),
            pwm_frequency_hz: default_pwm_frequency_hz(),
            pwm_range: default_motor_pwm_range(),
            center_duty: default_motor_center_duty(),
            duty_spread: default_motor_duty_spread(),
            boost_multiplier: default_boost_multiplier(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            gamepad: GamepadConfig::default(),
            servo: ServoConfig::default(),
            motor: MotorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_link::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, falling back to the
    /// built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but cannot be loaded.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::load(path)
        } else {
            info!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.link.address.is_empty() {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("link address cannot be empty"),
            ));
        }

        if self.link.port == 0 {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("link port cannot be 0"),
            ));
        }

        if self.link.receive_timeout_ms == 0 || self.link.receive_timeout_ms > 60000 {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("receive_timeout_ms must be between 1 and 60000"),
            ));
        }

        // Validate PWM configuration
        for (name, frequency, range) in [
            ("servo", self.servo.pwm_frequency_hz, self.servo.pwm_range),
            ("motor", self.motor.pwm_frequency_hz, self.motor.pwm_range),
        ] {
            if frequency == 0 || frequency > 500 {
                return Err(crate::error::RcLinkError::Config(toml::de::Error::custom(
                    format!("{} pwm_frequency_hz must be between 1 and 500", name),
                )));
            }
            if range == 0 {
                return Err(crate::error::RcLinkError::Config(toml::de::Error::custom(
                    format!("{} pwm_range must be greater than 0", name),
                )));
            }
        }

        if self.servo.gpio_pin == self.motor.gpio_pin {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("servo and motor cannot share a GPIO pin"),
            ));
        }

        // Validate servo calibration against its range
        if self.servo.duty_full_left > self.servo.pwm_range
            || self.servo.duty_full_right > self.servo.pwm_range
        {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("servo duty endpoints must be within pwm_range"),
            ));
        }

        // Validate motor calibration: the widest (boosted) range must
        // stay within the channel's duty range
        if self.motor.boost_multiplier == 0 {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("boost_multiplier must be at least 1"),
            ));
        }

        if self.motor.duty_spread == 0 {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom("duty_spread must be greater than 0"),
            ));
        }

        let max_half_width = self.motor.duty_spread * self.motor.boost_multiplier;
        if max_half_width > self.motor.center_duty
            || self.motor.center_duty + max_half_width > self.motor.pwm_range
        {
            return Err(crate::error::RcLinkError::Config(
                toml::de::Error::custom(
                    "boosted motor range (center_duty +/- duty_spread * boost_multiplier) must stay within pwm_range",
                ),
            ));
        }

        Ok(())
    }
}
