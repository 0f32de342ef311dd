//! # Control Frame Encoder
//!
//! Encodes gamepad state into 8-byte control frames for the UDP link.

use super::{BOOST_BIT, FRAME_LEN};
use crate::gamepad::state::ControlState;

/// Encode a control state into a complete 8-byte frame.
///
/// Only `left_stick_x`, `right_stick_y` and `boost` are transmitted.
/// The remaining axes are captured in [`ControlState`] but intentionally
/// not encoded: the control scheme steers with the left stick's
/// horizontal axis and throttles with the right stick's vertical axis.
///
/// The frame integer is laid out as
/// `boost << 16 | left_stick_x << 8 | right_stick_y`, serialized
/// big-endian. The throttle byte carries the *raw* stick value; polarity
/// correction happens on the receiver side.
///
/// # Arguments
///
/// * `state` - Latest gamepad control state
///
/// # Returns
///
/// * `[u8; 8]` - Complete frame, upper 5 bytes zero by construction
///
/// # Examples
///
/// ```
/// use rc_link::gamepad::state::ControlState;
/// use rc_link::proto::encoder::encode_frame;
///
/// let mut state = ControlState::default();
/// state.left_stick_x = 255;
/// state.right_stick_y = 0;
///
/// let frame = encode_frame(&state);
/// assert_eq!(frame, [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00]);
/// ```
#[must_use]
pub fn encode_frame(state: &ControlState) -> [u8; FRAME_LEN] {
    let joined = (u64::from(state.left_stick_x) << 8)
        | u64::from(state.right_stick_y)
        | (u64::from(state.boost) << BOOST_BIT);

    joined.to_be_bytes()
}
