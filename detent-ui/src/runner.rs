//! Frame-driven step scheduler.
//!
//! An [`AnimationRunner`] samples one step function per frame. The step
//! receives a mutable context supplied by whoever delivers the frame, which
//! lets a state machine own both the runner and the value being animated
//! without the step closure borrowing either.
//!
//! # Sequencing
//!
//! Only one step may be installed at a time. Callers must [`stop`] (or let
//! the step finish) before calling [`start`] again; starting while running
//! panics.
//!
//! # Threading
//!
//! Steps are not required to be `Send`, so a runner holding one cannot leave
//! the thread that drives the frame clock.
//!
//! [`start`]: AnimationRunner::start
//! [`stop`]: AnimationRunner::stop

use std::time::Duration;

/// What a step asks the runner to do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationResult {
    /// Keep sampling.
    Running,
    /// Suspend frame delivery but keep the step for [`AnimationRunner::resume`].
    Pause,
    /// The animation reached its end.
    Finish,
    /// The animation gave up before reaching its end.
    Cancel,
}

/// What happened during a call to [`AnimationRunner::handle_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No step is installed; the frame was ignored.
    Idle,
    /// The step ran and wants more frames.
    Running,
    /// The step is suspended, either before this frame or by its own request.
    Paused,
    /// The step finished and was dropped.
    Finished,
    /// The step cancelled itself and was dropped.
    Cancelled,
}

type StepFn<C> = Box<dyn FnMut(&mut C, Duration) -> AnimationResult>;

/// Drives a step function once per frame until it finishes.
pub struct AnimationRunner<C = ()> {
    step: Option<StepFn<C>>,
    start_at: Duration,
    ticking: bool,
}

impl<C> AnimationRunner<C> {
    /// Creates an idle runner.
    pub fn new() -> Self {
        Self {
            step: None,
            start_at: Duration::ZERO,
            ticking: false,
        }
    }

    /// Whether frames are being sampled.
    pub fn is_running(&self) -> bool {
        self.ticking
    }

    /// Whether a step is installed, running or paused.
    pub fn has_animation(&self) -> bool {
        self.step.is_some()
    }

    /// Installs `step` and starts sampling it from `now`.
    ///
    /// # Panics
    ///
    /// Panics if the runner is already running. Stop it first.
    pub fn start<F>(&mut self, step: F, now: Duration)
    where
        F: FnMut(&mut C, Duration) -> AnimationResult + 'static,
    {
        assert!(
            !self.ticking,
            "AnimationRunner::start called while running; stop the current animation first"
        );
        self.step = Some(Box::new(step));
        self.start_at = now;
        self.ticking = true;
    }

    /// Suspends sampling. The step and its start time are kept.
    pub fn pause(&mut self) {
        self.ticking = false;
    }

    /// Resumes a paused step.
    ///
    /// The start time is not shifted by the paused interval: elapsed time
    /// keeps following the frame clock, so a resumed trajectory jumps ahead
    /// by however long it was paused.
    pub fn resume(&mut self) {
        if self.step.is_some() {
            self.ticking = true;
        }
    }

    /// Stops sampling and drops the step. Safe to call at any time.
    pub fn stop(&mut self) {
        self.ticking = false;
        self.step = None;
    }

    /// Samples the step for the frame at `now`.
    pub fn handle_frame(&mut self, now: Duration, cx: &mut C) -> FrameOutcome {
        if !self.ticking {
            return if self.step.is_some() {
                FrameOutcome::Paused
            } else {
                FrameOutcome::Idle
            };
        }
        let Some(step) = self.step.as_mut() else {
            self.ticking = false;
            return FrameOutcome::Idle;
        };

        let elapsed = now.saturating_sub(self.start_at);
        match step(cx, elapsed) {
            AnimationResult::Running => FrameOutcome::Running,
            AnimationResult::Pause => {
                self.ticking = false;
                FrameOutcome::Paused
            }
            AnimationResult::Finish => {
                self.stop();
                FrameOutcome::Finished
            }
            AnimationResult::Cancel => {
                self.stop();
                FrameOutcome::Cancelled
            }
        }
    }
}

impl<C> Default for AnimationRunner<C> {
    fn default() -> Self {
        Self::new()
    }
}
