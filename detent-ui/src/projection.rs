//! Value-over-time animator for projected properties.
//!
//! A [`ProjectionAnimator`] moves a single scalar (`percent_complete`) along a
//! timing curve and pushes every new value out through its projector
//! callback. Unlike the spring, it settles exactly: the first frame past the
//! duration snaps to the final value.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc, time::Duration};
//! use detent_ui::ProjectionAnimator;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let mut animator = ProjectionAnimator::new(move |state| {
//!     sink.borrow_mut().push(state.percent_complete());
//! });
//!
//! animator.start(1.0, Duration::from_millis(200), |t| t.as_secs_f64() / 0.2, Duration::ZERO);
//! animator.handle_frame(Duration::from_millis(100));
//! animator.handle_frame(Duration::from_millis(250));
//! assert_eq!(*seen.borrow(), vec![0.5, 1.0]);
//! ```

use std::time::Duration;

use crate::frame::FrameNanosControl;

/// Observable state handed to the projector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionState {
    running: bool,
    percent_complete: f64,
}

impl ProjectionState {
    /// Whether an animation is advancing.
    pub fn running(&self) -> bool {
        self.running
    }

    /// The latest projected value.
    pub fn percent_complete(&self) -> f64 {
        self.percent_complete
    }
}

struct Animation {
    timing_curve: Box<dyn Fn(Duration) -> f64>,
    duration: Duration,
    start_at: Duration,
    final_value: f64,
}

type Projector = Box<dyn FnMut(&ProjectionState)>;

/// Animates one scalar and projects it through a callback.
pub struct ProjectionAnimator {
    projector: Projector,
    state: ProjectionState,
    current: Option<Animation>,
}

impl ProjectionAnimator {
    /// Creates an idle animator at `0.0`. The projector is its only output
    /// channel.
    pub fn new(projector: impl FnMut(&ProjectionState) + 'static) -> Self {
        Self {
            projector: Box::new(projector),
            state: ProjectionState::default(),
            current: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ProjectionState {
        self.state
    }

    /// Whether an animation is advancing.
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// The latest projected value.
    pub fn percent_complete(&self) -> f64 {
        self.state.percent_complete
    }

    /// Starts animating towards `value`.
    ///
    /// `timing_curve` maps elapsed time to the projected value; it is
    /// evaluated every frame until `duration` has passed.
    ///
    /// # Panics
    ///
    /// Panics if an animation is already running.
    pub fn start(
        &mut self,
        value: f64,
        duration: Duration,
        timing_curve: impl Fn(Duration) -> f64 + 'static,
        now: Duration,
    ) {
        assert!(
            !self.state.running,
            "ProjectionAnimator::start called while running; stop it first"
        );
        self.current = Some(Animation {
            timing_curve: Box::new(timing_curve),
            duration,
            start_at: now,
            final_value: value,
        });
        self.state.running = true;
    }

    /// Suspends the animation without projecting.
    pub fn pause(&mut self) {
        self.state.running = false;
    }

    /// Resumes a paused animation. Elapsed time is still measured from the
    /// original start.
    pub fn resume(&mut self) {
        if self.current.is_some() {
            self.state.running = true;
        }
    }

    /// Drops the animation, keeping the last value, and projects once.
    pub fn stop(&mut self) {
        self.current = None;
        self.state.running = false;
        self.project();
    }

    /// Sets the value directly and projects it.
    ///
    /// # Panics
    ///
    /// Panics if an animation is running.
    pub fn update(&mut self, percent: f64) {
        assert!(
            !self.state.running,
            "ProjectionAnimator::update called while running"
        );
        self.state.percent_complete = percent;
        self.project();
    }

    /// Advances the animation to the frame at `now`.
    pub fn handle_frame(&mut self, now: Duration) -> FrameNanosControl {
        if !self.state.running {
            return FrameNanosControl::Stop;
        }
        let Some(animation) = self.current.as_ref() else {
            self.state.running = false;
            return FrameNanosControl::Stop;
        };

        let elapsed = now.saturating_sub(animation.start_at);
        if elapsed > animation.duration {
            self.state.percent_complete = animation.final_value;
            self.stop();
            FrameNanosControl::Stop
        } else {
            self.state.percent_complete = (animation.timing_curve)(elapsed);
            self.project();
            FrameNanosControl::Continue
        }
    }

    fn project(&mut self) {
        (self.projector)(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn recording() -> (ProjectionAnimator, Rc<RefCell<Vec<ProjectionState>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let animator = ProjectionAnimator::new(move |state| sink.borrow_mut().push(*state));
        (animator, calls)
    }

    fn linear_over_200ms(t: Duration) -> f64 {
        t.as_secs_f64() / 0.2
    }

    #[test]
    fn late_frame_snaps_to_final_value() {
        let (mut animator, calls) = recording();
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
        assert!(animator.is_running());
        assert!(calls.borrow().is_empty());

        let control = animator.handle_frame(Duration::from_millis(250));
        assert_eq!(control, FrameNanosControl::Stop);
        assert_eq!(animator.percent_complete(), 1.0);
        assert_eq!(
            *calls.borrow(),
            vec![ProjectionState {
                running: false,
                percent_complete: 1.0
            }]
        );
    }

    #[test]
    fn frames_follow_the_timing_curve() {
        let (mut animator, calls) = recording();
        let start = Duration::from_secs(3);
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, start);

        animator.handle_frame(start + Duration::from_millis(50));
        animator.handle_frame(start + Duration::from_millis(150));
        assert!((animator.percent_complete() - 0.75).abs() < 1e-9);
        assert_eq!(calls.borrow().len(), 2);
        assert!(calls.borrow().iter().all(ProjectionState::running));

        // Exactly at the duration the curve is still sampled.
        let control = animator.handle_frame(start + Duration::from_millis(200));
        assert_eq!(control, FrameNanosControl::Continue);
        assert!((animator.percent_complete() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn update_projects_synchronously() {
        let (mut animator, calls) = recording();
        animator.update(0.4);
        assert_eq!(animator.percent_complete(), 0.4);
        assert_eq!(calls.borrow().len(), 1);
        assert!(!calls.borrow()[0].running());
    }

    #[test]
    #[should_panic(expected = "update called while running")]
    fn update_while_running_panics() {
        let (mut animator, _) = recording();
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
        animator.update(0.5);
    }

    #[test]
    #[should_panic(expected = "stop it first")]
    fn start_while_running_panics() {
        let (mut animator, _) = recording();
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
        animator.start(0.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
    }

    #[test]
    fn stop_keeps_value_and_projects_each_time() {
        let (mut animator, calls) = recording();
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
        animator.handle_frame(Duration::from_millis(100));
        animator.stop();
        animator.stop();

        assert!(!animator.is_running());
        assert_eq!(animator.percent_complete(), 0.5);
        let calls = calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], calls[2]);
        assert_eq!(animator.handle_frame(Duration::from_millis(150)), FrameNanosControl::Stop);
    }

    #[test]
    fn pause_suspends_frames() {
        let (mut animator, calls) = recording();
        animator.start(1.0, Duration::from_millis(200), linear_over_200ms, Duration::ZERO);
        animator.pause();
        assert_eq!(animator.handle_frame(Duration::from_millis(50)), FrameNanosControl::Stop);
        assert!(calls.borrow().is_empty());

        animator.resume();
        animator.handle_frame(Duration::from_millis(100));
        assert_eq!(animator.percent_complete(), 0.5);
    }

    #[test]
    fn resume_without_animation_stays_idle() {
        let (mut animator, _) = recording();
        animator.resume();
        assert!(!animator.is_running());
    }
}
