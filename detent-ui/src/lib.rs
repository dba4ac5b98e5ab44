//! detent-ui is the interaction and animation core of a draggable,
//! three-detent bottom sheet.
//!
//! # Overview
//!
//! The crate is platform agnostic. A host integration (see
//! `detent-components`) feeds it drag events, geometry changes and display
//! frames, and renders whatever position it publishes.
//!
//! - [`Spring`] / [`SpringSimulator`]: closed-form critically damped
//!   trajectories and their settle time.
//! - [`FrameSource`]: the display-refresh clock, injectable for tests.
//! - [`AnimationRunner`]: samples a step function once per frame.
//! - [`ProjectionAnimator`]: drives a projected scalar along a timing curve.
//! - [`PositionStateMachine`]: owns the sheet position and picks the detent
//!   to settle on when a drag ends.
//!
//! # Settling a sheet
//!
//! ```
//! use std::time::Duration;
//! use detent_ui::{
//!     Detent, Detents, Dp, FrameNanosControl, FrameSource, ManualFrameSource,
//!     PositionStateMachine, Spring,
//! };
//!
//! let mut frames = ManualFrameSource::new();
//! let mut machine = PositionStateMachine::new(Detents::new(Dp(300.0), Dp(700.0)), Spring::DEFAULT);
//!
//! machine.begin_drag();
//! machine.set_position(Dp(520.0));
//! assert_eq!(machine.end_drag(Dp(690.0), 900.0, frames.now()), Some(Detent::Top));
//!
//! frames.request_frames();
//! while frames.is_active() {
//!     let now = frames.advance_frame();
//!     if machine.handle_frame(now) == FrameNanosControl::Stop {
//!         frames.cancel_frames();
//!     }
//! }
//! assert_eq!(machine.position(), Dp(700.0));
//! ```
//!
//! # Threading
//!
//! Everything here runs on the thread that owns the frame clock. Runners and
//! observers hold non-`Send` closures, so the compiler keeps them there.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod config;
pub mod dp;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod position;
pub mod projection;
pub mod runner;
pub mod spring;

pub use crate::{
    config::{SheetConfig, SheetDefaults},
    dp::Dp,
    error::ConfigError,
    frame::{FrameNanosControl, FrameSource, ManualFrameSource, SystemFrameSource},
    geometry::{SafeAreaInsets, SheetGeometry},
    position::{Detent, Detents, PositionStateMachine, SheetPhase, SubscriptionId},
    projection::{ProjectionAnimator, ProjectionState},
    runner::{AnimationResult, AnimationRunner, FrameOutcome},
    spring::{Spring, SpringSimulator},
};
