//! # Control Frame Decoder
//!
//! Decodes received datagrams back into control values.

use super::{check_frame_len, DecodedControls, BOOST_BIT, FRAME_LEN, STEER_MASK, THROTTLE_MASK};
use crate::error::Result;

/// Decode a received datagram into control values.
///
/// The datagram is interpreted as a big-endian u64:
///
/// ```text
/// 00000000 ... 0000000b xxxxxxxx yyyyyyyy
/// ```
///
/// `b` is the boost flag, `x` the steering byte and `y` the raw
/// throttle byte. The throttle is inverted (`255 - y`) so that pushing
/// the stick away from the operator yields higher values; the raw stick
/// reports full deflection when held *down*. This inversion is a fixed
/// property of the wire format, not a calibration option.
///
/// Bits outside the low 24-bit field are ignored.
///
/// # Arguments
///
/// * `datagram` - Received bytes, expected to be exactly 8 bytes
///
/// # Returns
///
/// * `Result<DecodedControls>` - Decoded controls, or a frame error
///
/// # Errors
///
/// Returns [`RcLinkError::Frame`](crate::error::RcLinkError::Frame) if
/// the datagram length differs from 8 bytes. Mismatched datagrams are
/// rejected outright rather than partially parsed.
///
/// # Examples
///
/// ```
/// use rc_link::proto::decoder::decode_frame;
///
/// let frame = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00];
/// let controls = decode_frame(&frame).unwrap();
/// assert_eq!(controls.steer, 255);
/// assert_eq!(controls.throttle, 255); // 255 - 0, polarity corrected
/// assert!(!controls.boost);
/// ```
pub fn decode_frame(datagram: &[u8]) -> Result<DecodedControls> {
    check_frame_len(datagram.len())?;

    let mut bytes = [0u8; FRAME_LEN];
    bytes.copy_from_slice(datagram);
    let msg = u64::from_be_bytes(bytes);

    let boost = (msg >> BOOST_BIT) & 1 == 1;
    let steer = ((msg & STEER_MASK) >> 8) as u8;
    let throttle = 255 - (msg & THROTTLE_MASK) as u8;

    Ok(DecodedControls::new(steer, throttle, boost))
}
