//! Display-refresh clock abstraction.
//!
//! Animations in this crate never read the system clock themselves. The
//! owner of a runner holds a [`FrameSource`], asks it for frames while
//! something is animating and forwards each delivered frame, together with
//! [`FrameSource::now`], to the runners it drives. Frame handlers answer with
//! [`FrameNanosControl`] to say whether they still need frames.
//!
//! [`ManualFrameSource`] replaces the display with a synthetic clock so that
//! whole gestures can be replayed deterministically.

use std::time::{Duration, Instant};

/// Whether a frame handler wants to receive the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameNanosControl {
    /// Keep delivering frames.
    Continue,
    /// Nothing left to animate.
    Stop,
}

impl FrameNanosControl {
    /// Combines two handlers' answers: frames continue while either needs
    /// them.
    pub fn or(self, other: FrameNanosControl) -> FrameNanosControl {
        match (self, other) {
            (FrameNanosControl::Stop, FrameNanosControl::Stop) => FrameNanosControl::Stop,
            _ => FrameNanosControl::Continue,
        }
    }
}

/// A per-display-refresh clock.
///
/// Implementations are driven from a single thread. A platform integration
/// calls its frame handler once per refresh for as long as the source is
/// active.
pub trait FrameSource {
    /// Timestamp of the current frame, measured from an arbitrary fixed
    /// origin.
    fn now(&self) -> Duration;

    /// Starts (or keeps) delivering frames.
    fn request_frames(&mut self);

    /// Stops delivering frames. Safe to call when already inactive.
    fn cancel_frames(&mut self);

    /// Whether frames are currently being delivered.
    fn is_active(&self) -> bool;
}

/// Frame source backed by the monotonic system clock.
#[derive(Debug, Clone)]
pub struct SystemFrameSource {
    origin: Instant,
    active: bool,
}

impl SystemFrameSource {
    /// Creates a source whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            active: false,
        }
    }
}

impl Default for SystemFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for SystemFrameSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn request_frames(&mut self) {
        self.active = true;
    }

    fn cancel_frames(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Deterministic frame source whose time only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualFrameSource {
    now: Duration,
    interval: Duration,
    active: bool,
    frames_delivered: u64,
}

impl ManualFrameSource {
    /// Refresh interval of a 60 Hz display.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_nanos(16_666_667);

    /// Creates a source at time zero ticking at 60 Hz.
    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_INTERVAL)
    }

    /// Creates a source at time zero with a custom refresh interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            interval,
            active: false,
            frames_delivered: 0,
        }
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Advances by one refresh interval and counts the frame.
    pub fn advance_frame(&mut self) -> Duration {
        self.now += self.interval;
        self.frames_delivered += 1;
        self.now
    }

    /// Number of frames produced by [`advance_frame`](Self::advance_frame).
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }
}

impl Default for ManualFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ManualFrameSource {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frames(&mut self) {
        self.active = true;
    }

    fn cancel_frames(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
