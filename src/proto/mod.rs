//! # Control Frame Protocol Module
//!
//! Wire format for the UDP control link between transmitter and receiver.
//!
//! This module handles:
//! - Frame layout constants (8-byte big-endian, semantic low 24 bits)
//! - Encoding gamepad state into control frames
//! - Decoding received datagrams back into control values

pub mod decoder;
pub mod encoder;

use crate::error::{RcLinkError, Result};

/// Control frame size in bytes.
///
/// The frame is the big-endian serialization of a u64. Only the low
/// 3 bytes carry data; the upper 5 bytes are reserved and always zero.
/// The width is kept at 8 bytes for wire compatibility with the
/// original deployed transmitter.
pub const FRAME_LEN: usize = 8;

/// Bit position of the boost flag within the frame integer.
pub const BOOST_BIT: u32 = 16;

/// Mask for the boost flag (bit 16).
pub const BOOST_MASK: u64 = 1 << BOOST_BIT;

/// Mask for the steering byte (bits 8-15).
pub const STEER_MASK: u64 = 0xFF00;

/// Mask for the throttle byte (bits 0-7).
pub const THROTTLE_MASK: u64 = 0xFF;

/// Control values decoded from a received frame.
///
/// `steer` is the left-stick X value as transmitted (0-255).
/// `throttle` is the right-stick Y value with polarity already
/// corrected by the decoder (0 = full reverse, 255 = full forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedControls {
    /// Steering axis, 0-255. 0 = full left deflection on the stick.
    pub steer: u8,

    /// Throttle axis, 0-255, polarity-corrected (up = more).
    pub throttle: u8,

    /// Boost flag (widens the motor duty range).
    pub boost: bool,
}

impl DecodedControls {
    /// Create decoded controls, validating nothing: all 8-bit values
    /// and the flag are valid by construction.
    #[must_use]
    pub fn new(steer: u8, throttle: u8, boost: bool) -> Self {
        Self {
            steer,
            throttle,
            boost,
        }
    }
}

/// Validate the length of a received datagram.
///
/// Datagrams that are not exactly [`FRAME_LEN`] bytes are rejected so
/// the receive loop can drop them and await the next frame.
///
/// # Errors
///
/// Returns [`RcLinkError::Frame`] if `len` differs from [`FRAME_LEN`].
pub fn check_frame_len(len: usize) -> Result<()> {
    if len != FRAME_LEN {
        return Err(RcLinkError::Frame(format!(
            "Unexpected datagram length: expected {} bytes, got {}",
            FRAME_LEN, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(FRAME_LEN, 8);
        assert_eq!(BOOST_MASK, 0x01_0000);
        assert_eq!(STEER_MASK, 0xFF00);
        assert_eq!(THROTTLE_MASK, 0xFF);
    }

    #[test]
    fn test_masks_are_disjoint() {
        assert_eq!(BOOST_MASK & STEER_MASK, 0);
        assert_eq!(BOOST_MASK & THROTTLE_MASK, 0);
        assert_eq!(STEER_MASK & THROTTLE_MASK, 0);
    }

    #[test]
    fn test_check_frame_len_accepts_exact() {
        assert!(check_frame_len(FRAME_LEN).is_ok());
    }

    #[test]
    fn test_check_frame_len_rejects_short() {
        let result = check_frame_len(3);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_frame_len_rejects_long() {
        let result = check_frame_len(9);
        assert!(result.is_err());
    }

    #[test]
    fn test_decoded_controls_new() {
        let controls = DecodedControls::new(255, 128, true);
        assert_eq!(controls.steer, 255);
        assert_eq!(controls.throttle, 128);
        assert!(controls.boost);
    }
}
