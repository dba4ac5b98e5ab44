//! Sheet position state machine.
//!
//! ## Usage
//!
//! [`PositionStateMachine`] owns the sheet position, broadcasts every change
//! to its subscribers and, when a drag ends, decides which detent to settle
//! on. It knows nothing about scroll views or display links: an adapter feeds
//! it drag events and frames and reads the position back.
//!
//! ```
//! use std::time::Duration;
//! use detent_ui::{Detent, Detents, Dp, FrameNanosControl, PositionStateMachine, Spring};
//!
//! let mut machine = PositionStateMachine::new(Detents::new(Dp(300.0), Dp(700.0)), Spring::DEFAULT);
//! machine.begin_drag();
//! machine.set_position(Dp(240.0));
//! let target = machine.end_drag(Dp(320.0), 0.0, Duration::ZERO);
//! assert_eq!(target, Some(Detent::Middle));
//!
//! let mut now = Duration::ZERO;
//! while machine.handle_frame(now) == FrameNanosControl::Continue {
//!     now += Duration::from_millis(16);
//! }
//! assert_eq!(machine.position(), Dp(300.0));
//! ```

use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    Dp, SheetConfig, SheetGeometry, Spring, SpringSimulator,
    frame::FrameNanosControl,
    runner::{AnimationResult, AnimationRunner, FrameOutcome},
};

/// One of the three rest positions of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detent {
    /// Collapsed: only the minimum visible strip shows.
    Bottom,
    /// Peek height.
    Middle,
    /// Fully expanded below the top safe area.
    Top,
}

/// Resolved positions of the three detents for the current geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detents {
    /// Collapsed position, always zero.
    pub bottom: Dp,
    /// Middle position.
    pub middle: Dp,
    /// Expanded position.
    pub top: Dp,
}

impl Detents {
    /// Creates detents with the bottom detent at zero.
    pub const fn new(middle: Dp, top: Dp) -> Self {
        Self {
            bottom: Dp::ZERO,
            middle,
            top,
        }
    }

    /// Computes detents from the container geometry.
    ///
    /// The top detent sits below the top safe area:
    /// `height − safe bottom − min visible height − safe top`.
    pub fn from_geometry(geometry: &SheetGeometry, config: &SheetConfig) -> Self {
        let top =
            geometry.content_inset_top(config.min_visible_height) - geometry.safe_area.top;
        if top < config.middle_height {
            warn!(
                top = top.0,
                middle = config.middle_height.0,
                "container too short, top detent is below the middle detent"
            );
        }
        Self::new(config.middle_height, top)
    }

    /// Position of `detent`.
    pub fn position(&self, detent: Detent) -> Dp {
        match detent {
            Detent::Bottom => self.bottom,
            Detent::Middle => self.middle,
            Detent::Top => self.top,
        }
    }

    /// Chooses the detent to settle on after a drag.
    ///
    /// `predicted` is where native deceleration would leave the sheet and
    /// `current` is where it is at release. Rules are checked in order:
    ///
    /// 1. predicted below half the middle detent settles at the bottom;
    /// 2. predicted below one and a half times the middle settles at the
    ///    middle;
    /// 3. predicted below the top settles at the top;
    /// 4. a fling past the top that started below one and a half times the
    ///    middle settles at the top.
    ///
    /// Anything else returns `None` and the sheet is left to native
    /// deceleration.
    pub fn resolve_release(&self, predicted: Dp, current: Dp) -> Option<Detent> {
        let near_middle = self.middle * 1.5;
        if predicted < self.middle / 2.0 {
            Some(Detent::Bottom)
        } else if predicted < near_middle {
            Some(Detent::Middle)
        } else if predicted < self.top {
            Some(Detent::Top)
        } else if current < near_middle && self.top < predicted {
            Some(Detent::Top)
        } else {
            None
        }
    }
}

/// Interaction phase of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPhase {
    /// At rest, or moving under native deceleration.
    Idle,
    /// Following the user's finger.
    Dragging,
    /// Animating onto a detent.
    Settling {
        /// Detent being settled on.
        target: Detent,
    },
}

/// Handle returned by [`PositionStateMachine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(Dp)>;

/// The animated value and everyone listening to it.
///
/// Kept separate from the machine so the settle step can borrow it while the
/// runner is borrowed by the machine.
struct PositionSink {
    position: Dp,
    observers: SmallVec<[(SubscriptionId, Observer); 2]>,
    next_id: u64,
}

impl PositionSink {
    fn publish(&mut self, position: Dp) {
        self.position = position;
        for (_, observer) in self.observers.iter_mut() {
            observer(position);
        }
    }
}

/// Owns the sheet position and decides where it settles.
pub struct PositionStateMachine {
    sink: PositionSink,
    phase: SheetPhase,
    detents: Detents,
    spring: Spring,
    runner: AnimationRunner<PositionSink>,
}

impl PositionStateMachine {
    /// Creates an idle machine resting at the bottom detent.
    pub fn new(detents: Detents, spring: Spring) -> Self {
        Self {
            sink: PositionSink {
                position: detents.bottom,
                observers: SmallVec::new(),
                next_id: 0,
            },
            phase: SheetPhase::Idle,
            detents,
            spring,
            runner: AnimationRunner::new(),
        }
    }

    /// Current position.
    pub fn position(&self) -> Dp {
        self.sink.position
    }

    /// Current phase.
    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    /// Whether a settle animation is in flight.
    pub fn is_settling(&self) -> bool {
        matches!(self.phase, SheetPhase::Settling { .. })
    }

    /// Current detents.
    pub fn detents(&self) -> Detents {
        self.detents
    }

    /// Spring used for settling.
    pub fn spring(&self) -> Spring {
        self.spring
    }

    /// Replaces the detents after a geometry change. An in-flight settle
    /// keeps its original target position.
    pub fn set_detents(&mut self, detents: Detents) {
        debug!(middle = detents.middle.0, top = detents.top.0, "detents updated");
        self.detents = detents;
    }

    /// Registers an observer called synchronously with every new position.
    pub fn subscribe(&mut self, observer: impl FnMut(Dp) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.sink.next_id);
        self.sink.next_id += 1;
        self.sink.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.sink.observers.len();
        self.sink.observers.retain(|(existing, _)| *existing != id);
        self.sink.observers.len() != before
    }

    /// Sets the position from direct manipulation or native deceleration and
    /// broadcasts it.
    pub fn set_position(&mut self, position: Dp) {
        self.sink.publish(position);
    }

    /// A drag started. Any settle animation stops immediately.
    pub fn begin_drag(&mut self) {
        if let SheetPhase::Settling { target } = self.phase {
            debug!(?target, position = self.position().0, "settle interrupted by drag");
        }
        self.runner.stop();
        self.phase = SheetPhase::Dragging;
    }

    /// A drag ended. Resolves the release against the detents and starts
    /// settling when a rule matches.
    ///
    /// `velocity` is in dp per second, positive towards the top detent.
    #[tracing::instrument(level = "debug", skip(self), fields(current = self.position().0))]
    pub fn end_drag(&mut self, predicted: Dp, velocity: f64, now: Duration) -> Option<Detent> {
        let target = self.detents.resolve_release(predicted, self.position());
        match target {
            Some(detent) => self.animate_to(detent, velocity, now),
            None => {
                debug!("release left to native deceleration");
                self.phase = SheetPhase::Idle;
            }
        }
        target
    }

    /// Settles onto `detent` from the current position, interrupting any
    /// animation in flight.
    pub fn settle_to(&mut self, detent: Detent, velocity: f64, now: Duration) {
        self.animate_to(detent, velocity, now);
    }

    /// Stops settling where the sheet currently is.
    pub fn stop(&mut self) {
        self.runner.stop();
        if self.is_settling() {
            self.phase = SheetPhase::Idle;
        }
    }

    /// Samples the settle animation for the frame at `now`.
    pub fn handle_frame(&mut self, now: Duration) -> FrameNanosControl {
        match self.runner.handle_frame(now, &mut self.sink) {
            FrameOutcome::Running => FrameNanosControl::Continue,
            FrameOutcome::Finished | FrameOutcome::Cancelled => {
                debug!(position = self.sink.position.0, "settled");
                self.phase = SheetPhase::Idle;
                FrameNanosControl::Stop
            }
            FrameOutcome::Paused | FrameOutcome::Idle => FrameNanosControl::Stop,
        }
    }

    fn animate_to(&mut self, detent: Detent, velocity: f64, now: Duration) {
        self.runner.stop();

        let target = self.detents.position(detent);
        let simulator = SpringSimulator::new(self.spring, self.position() - target, velocity);
        let duration = simulator.duration();
        debug!(
            ?detent,
            target = target.0,
            velocity,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "settling"
        );

        self.runner.start(
            move |sink: &mut PositionSink, elapsed| {
                if elapsed <= duration {
                    let position = target + simulator.translate(elapsed);
                    trace!(position = position.0, ?elapsed, "settle frame");
                    sink.publish(position);
                    AnimationResult::Running
                } else {
                    sink.publish(target);
                    AnimationResult::Finish
                }
            },
            now,
        );
        self.phase = SheetPhase::Settling { target: detent };
    }
}
