//! # Watchdog / Failsafe Module
//!
//! State machine supervising the control link on the receiver.
//!
//! The receive timeout is the sole liveness signal on the link: the
//! protocol carries no sequence numbers or dedicated heartbeats, so an
//! expired receive window with no frame is what drives the transition
//! to failsafe. The next successfully decoded frame returns the link to
//! active with no debounce or hysteresis.

use std::time::{Duration, Instant};

/// Link supervision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Frames are arriving; mapped commands drive the actuators.
    Active,
    /// The link went silent; actuators are forced to zero duty.
    Failsafe,
}

/// Watchdog tracking time since the last valid frame.
///
/// Created at receiver startup in [`LinkState::Active`], updated on
/// every decoded frame and on every expired receive window.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use rc_link::control::failsafe::{LinkState, Watchdog};
///
/// let mut watchdog = Watchdog::new();
/// assert_eq!(watchdog.state(), LinkState::Active);
///
/// assert!(watchdog.timeout_expired(Instant::now()));
/// assert_eq!(watchdog.state(), LinkState::Failsafe);
///
/// assert!(watchdog.frame_received(Instant::now()));
/// assert_eq!(watchdog.state(), LinkState::Active);
/// ```
#[derive(Debug)]
pub struct Watchdog {
    state: LinkState,
    last_frame: Option<Instant>,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Creates a watchdog in the initial [`LinkState::Active`] state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LinkState::Active,
            last_frame: None,
        }
    }

    /// Records a successfully decoded frame.
    ///
    /// Returns `true` if this frame recovered the link from failsafe.
    /// Recovery is immediate: normal mapped output resumes with this
    /// very frame.
    pub fn frame_received(&mut self, now: Instant) -> bool {
        self.last_frame = Some(now);

        let recovered = self.state == LinkState::Failsafe;
        self.state = LinkState::Active;
        recovered
    }

    /// Records an expired receive window with no frame.
    ///
    /// Returns `true` on the `Active -> Failsafe` transition, i.e. only
    /// for the first expiry of a silence period; repeated expiries keep
    /// the state at failsafe and return `false`. The caller zeroes the
    /// actuators on *every* expiry regardless (the command is
    /// idempotent); the return value exists so the transition can be
    /// logged once.
    pub fn timeout_expired(&mut self, _now: Instant) -> bool {
        let engaged = self.state == LinkState::Active;
        self.state = LinkState::Failsafe;
        engaged
    }

    /// Current supervision state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Time elapsed since the last decoded frame, if any arrived yet.
    #[must_use]
    pub fn silence(&self, now: Instant) -> Option<Duration> {
        self.last_frame.map(|last| now.duration_since(last))
    }
}
