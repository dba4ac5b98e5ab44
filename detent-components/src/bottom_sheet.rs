//! A draggable bottom sheet with three detents over background content.
//!
//! ## Usage
//!
//! Host the sheet content in a platform scroll view whose content offset
//! doubles as the sheet position, wrap that view in a [`ScrollSurface`], and
//! forward its delegate callbacks and display frames to a
//! [`BottomSheetController`]. The controller decides where the sheet settles,
//! animates it there and keeps the derived visuals (corner rounding, status
//! bar curtain, background safe-area inset, scrim) in sync with the position.
//!
//! ```
//! use detent_components::bottom_sheet::{BottomSheetController, ScrollSurface};
//! use detent_ui::{
//!     Detent, Dp, FrameSource, ManualFrameSource, SafeAreaInsets, SheetConfig, SheetGeometry,
//! };
//!
//! #[derive(Default)]
//! struct Surface {
//!     offset: Dp,
//! }
//!
//! impl ScrollSurface for Surface {
//!     fn content_offset(&self) -> Dp {
//!         self.offset
//!     }
//!     fn set_content_offset(&mut self, offset: Dp) {
//!         self.offset = offset;
//!     }
//!     fn set_content_inset_top(&mut self, _inset: Dp) {}
//!     fn stop_deceleration(&mut self) {}
//! }
//!
//! # fn main() -> Result<(), detent_ui::ConfigError> {
//! let geometry = SheetGeometry::new(Dp(800.0), SafeAreaInsets::new(Dp(20.0), Dp(32.0)));
//! let mut sheet = BottomSheetController::new(
//!     SheetConfig::default(),
//!     geometry,
//!     Surface::default(),
//!     ManualFrameSource::new(),
//! )?;
//!
//! sheet.snap_to(Detent::Middle);
//! while sheet.frame_source().is_active() {
//!     sheet.frame_source_mut().advance_frame();
//!     sheet.on_frame();
//! }
//! assert_eq!(sheet.position(), Dp(300.0));
//! # Ok(())
//! # }
//! ```
use std::{cell::RefCell, rc::Rc, time::Duration};

use tracing::{debug, trace};

use detent_ui::{
    ConfigError, Detent, Detents, Dp, FrameNanosControl, FrameSource, PositionStateMachine,
    ProjectionAnimator, SheetConfig, SheetGeometry, SheetPhase, SubscriptionId,
};

use crate::animation::eased_transition;

/// The platform scroll view hosting the sheet.
///
/// Offsets follow the platform convention: an offset of `-content_inset_top`
/// shows the sheet collapsed, so `position = inset + offset`. Implementations
/// should not call back into the controller from these methods; the
/// controller already knows about every offset it writes.
pub trait ScrollSurface {
    /// Current vertical content offset.
    fn content_offset(&self) -> Dp;

    /// Moves the content without animation.
    fn set_content_offset(&mut self, offset: Dp);

    /// Sets the top content inset.
    fn set_content_inset_top(&mut self, inset: Dp);

    /// Cancels any native deceleration in progress, leaving the content where
    /// it is.
    fn stop_deceleration(&mut self);
}

/// Visual properties derived from the sheet position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedVisuals {
    /// Radius of the sheet's top corners; zero once it docks at the top.
    pub corner_radius: Dp,
    /// Opacity of the curtain covering the status bar area.
    pub curtain_opacity: f64,
    /// Extra bottom safe-area inset for the background content, so map
    /// controls stay above the sheet.
    pub content_bottom_inset: Dp,
}

/// Corner radius: full until the sheet comes within `max` of the top
/// detent, then shrinking to zero.
pub fn corner_radius_for(position: Dp, top: Dp, max: Dp) -> Dp {
    (top - position).clamp(Dp::ZERO, max)
}

/// Curtain opacity: fades in over the last half of the top safe area below
/// the top detent.
///
/// Without a top safe area the curtain is either fully shown (at or past the
/// top detent) or hidden.
pub fn curtain_opacity_for(position: Dp, top: Dp, safe_top: Dp) -> f64 {
    if safe_top <= Dp::ZERO {
        return if position >= top { 1.0 } else { 0.0 };
    }
    (1.0 - (top - position) / safe_top * 2.0).clamp(0.0, 1.0)
}

/// Bottom inset of the background content: follows the sheet up to the
/// middle detent.
pub fn content_bottom_inset_for(position: Dp, middle: Dp, min_visible_height: Dp) -> Dp {
    (middle + min_visible_height).min(position + min_visible_height)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct VisualLayout {
    detents: Detents,
    min_visible_height: Dp,
    max_corner_radius: Dp,
    safe_top: Dp,
}

impl VisualLayout {
    fn new(detents: Detents, config: &SheetConfig, geometry: &SheetGeometry) -> Self {
        Self {
            detents,
            min_visible_height: config.min_visible_height,
            max_corner_radius: config.max_corner_radius,
            safe_top: geometry.safe_area.top,
        }
    }

    fn derive(&self, position: Dp) -> DerivedVisuals {
        DerivedVisuals {
            corner_radius: corner_radius_for(
                position,
                self.detents.top,
                self.max_corner_radius,
            ),
            curtain_opacity: curtain_opacity_for(position, self.detents.top, self.safe_top),
            content_bottom_inset: content_bottom_inset_for(
                position,
                self.detents.middle,
                self.min_visible_height,
            ),
        }
    }
}

type VisualsObserver = Box<dyn FnMut(&DerivedVisuals)>;
type ScrimObservers = Rc<RefCell<Vec<Box<dyn FnMut(f64)>>>>;

struct VisualsHub {
    layout: VisualLayout,
    current: DerivedVisuals,
    observers: Vec<VisualsObserver>,
}

impl VisualsHub {
    fn refresh(&mut self, position: Dp) {
        self.current = self.layout.derive(position);
        for observer in self.observers.iter_mut() {
            observer(&self.current);
        }
    }
}

/// Connects a [`ScrollSurface`] and a [`FrameSource`] to a
/// [`PositionStateMachine`].
///
/// The controller owns the frame subscription: it requests frames when a
/// settle or scrim fade starts and cancels them once nothing animates.
pub struct BottomSheetController<S, F> {
    config: SheetConfig,
    content_inset_top: Dp,
    surface: S,
    frames: F,
    machine: PositionStateMachine,
    visuals: Rc<RefCell<VisualsHub>>,
    scrim: ProjectionAnimator,
    scrim_observers: ScrimObservers,
}

impl<S, F> BottomSheetController<S, F>
where
    S: ScrollSurface,
    F: FrameSource,
{
    /// Creates a controller with the sheet collapsed.
    ///
    /// Writes the content inset and the collapsed offset to `surface`.
    pub fn new(
        config: SheetConfig,
        geometry: SheetGeometry,
        mut surface: S,
        frames: F,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let detents = Detents::from_geometry(&geometry, &config);
        let mut machine = PositionStateMachine::new(detents, config.spring);

        let visuals = Rc::new(RefCell::new(VisualsHub {
            layout: VisualLayout::new(detents, &config, &geometry),
            current: DerivedVisuals::default(),
            observers: Vec::new(),
        }));
        visuals.borrow_mut().refresh(machine.position());
        let hub = Rc::clone(&visuals);
        machine.subscribe(move |position| hub.borrow_mut().refresh(position));

        let scrim_observers: ScrimObservers = Rc::new(RefCell::new(Vec::new()));
        let observers = Rc::clone(&scrim_observers);
        let scrim = ProjectionAnimator::new(move |state| {
            for observer in observers.borrow_mut().iter_mut() {
                observer(state.percent_complete());
            }
        });

        let content_inset_top = geometry.content_inset_top(config.min_visible_height);
        surface.set_content_inset_top(content_inset_top);
        surface.set_content_offset(machine.position() - content_inset_top);

        Ok(Self {
            config,
            content_inset_top,
            surface,
            frames,
            machine,
            visuals,
            scrim,
            scrim_observers,
        })
    }

    /// Current sheet position.
    pub fn position(&self) -> Dp {
        self.machine.position()
    }

    /// Current interaction phase.
    pub fn phase(&self) -> SheetPhase {
        self.machine.phase()
    }

    /// Detents for the current geometry.
    pub fn detents(&self) -> Detents {
        self.machine.detents()
    }

    /// Visuals for the current position.
    pub fn visuals(&self) -> DerivedVisuals {
        self.visuals.borrow().current
    }

    /// Current scrim opacity.
    pub fn scrim_opacity(&self) -> f64 {
        self.scrim.percent_complete()
    }

    /// Top content inset written to the surface.
    pub fn content_inset_top(&self) -> Dp {
        self.content_inset_top
    }

    /// The hosted scroll surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the hosted scroll surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The frame source driving animations.
    pub fn frame_source(&self) -> &F {
        &self.frames
    }

    /// Mutable access to the frame source.
    pub fn frame_source_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    /// Observes every position change.
    pub fn subscribe_position(&mut self, observer: impl FnMut(Dp) + 'static) -> SubscriptionId {
        self.machine.subscribe(observer)
    }

    /// Observes derived visuals, recomputed on every position change.
    pub fn observe_visuals(&mut self, observer: impl FnMut(&DerivedVisuals) + 'static) {
        self.visuals.borrow_mut().observers.push(Box::new(observer));
    }

    /// Observes scrim opacity changes.
    pub fn observe_scrim(&mut self, observer: impl FnMut(f64) + 'static) {
        self.scrim_observers.borrow_mut().push(Box::new(observer));
    }

    /// The container was laid out again or its safe area changed.
    ///
    /// A sheet resting on a detent moves with it; a sheet between detents is
    /// clamped into the new range and an in-flight settle restarts towards
    /// its detent's new position. During a drag the surface offset is read
    /// back against the new inset.
    pub fn on_geometry_changed(&mut self, geometry: SheetGeometry) {
        let previous = self.machine.detents();
        let detents = Detents::from_geometry(&geometry, &self.config);
        debug!(
            height = geometry.height.0,
            safe_top = geometry.safe_area.top.0,
            safe_bottom = geometry.safe_area.bottom.0,
            top = detents.top.0,
            "sheet geometry changed"
        );

        self.content_inset_top = geometry.content_inset_top(self.config.min_visible_height);
        self.surface.set_content_inset_top(self.content_inset_top);
        self.machine.set_detents(detents);
        self.visuals.borrow_mut().layout = VisualLayout::new(detents, &self.config, &geometry);

        let current = self.machine.position();
        let position = match self.machine.phase() {
            // The finger owns the offset; read it back against the new inset.
            SheetPhase::Dragging => {
                let dragged = self.content_inset_top + self.surface.content_offset();
                self.machine.set_position(dragged);
                return;
            }
            SheetPhase::Settling { target } => {
                self.machine.settle_to(target, 0.0, self.frames.now());
                self.frames.request_frames();
                current
            }
            SheetPhase::Idle => {
                let resting_on = [Detent::Bottom, Detent::Middle, Detent::Top]
                    .into_iter()
                    .find(|detent| previous.position(*detent) == current);
                match resting_on {
                    Some(detent) => detents.position(detent),
                    None => current.clamp(detents.bottom, detents.top),
                }
            }
        };
        self.surface
            .set_content_offset(position - self.content_inset_top);
        self.machine.set_position(position);
    }

    /// The user put a finger on the sheet. Interrupts any settle and freezes
    /// the scrim where it is.
    pub fn on_begin_dragging(&mut self) {
        self.machine.begin_drag();
        if self.scrim.is_running() {
            self.scrim.stop();
        }
        self.frames.cancel_frames();
    }

    /// The surface scrolled, by drag or native deceleration.
    ///
    /// Reports arriving while the controller is settling the sheet are
    /// ignored; the controller is the only writer then.
    pub fn on_scroll(&mut self) {
        let position = self.content_inset_top + self.surface.content_offset();
        if self.machine.is_settling() {
            trace!(position = position.0, "ignoring scroll report while settling");
            return;
        }
        self.machine.set_position(position);
    }

    /// The user lifted the finger.
    ///
    /// `target_offset` is where native deceleration would stop the content
    /// and `velocity` is in dp per second, positive towards the top. Returns
    /// the detent the sheet now settles on, or `None` when native
    /// deceleration keeps control.
    pub fn on_will_end_dragging(&mut self, target_offset: Dp, velocity: f64) -> Option<Detent> {
        let predicted = self.content_inset_top + target_offset;
        let now = self.frames.now();
        let target = self.machine.end_drag(predicted, velocity, now);
        if let Some(detent) = target {
            self.fade_scrim_for(detent, now);
            self.frames.request_frames();
        }
        target
    }

    /// Native deceleration is about to start. It is cancelled when the
    /// controller already animates the sheet.
    pub fn on_will_begin_decelerating(&mut self) {
        if self.machine.is_settling() {
            self.surface.stop_deceleration();
        }
    }

    /// Settles the sheet on `detent` from wherever it is.
    pub fn snap_to(&mut self, detent: Detent) {
        let now = self.frames.now();
        self.machine.settle_to(detent, 0.0, now);
        self.fade_scrim_for(detent, now);
        self.frames.request_frames();
    }

    /// Advances every animation to the current frame and writes the sheet
    /// position back to the surface.
    pub fn on_frame(&mut self) -> FrameNanosControl {
        let now = self.frames.now();

        let was_settling = self.machine.is_settling();
        let sheet = self.machine.handle_frame(now);
        if was_settling {
            self.surface
                .set_content_offset(self.machine.position() - self.content_inset_top);
        }
        let scrim = self.scrim.handle_frame(now);

        let control = sheet.or(scrim);
        if control == FrameNanosControl::Stop {
            self.frames.cancel_frames();
        }
        control
    }

    fn fade_scrim_for(&mut self, detent: Detent, now: Duration) {
        let target = match detent {
            Detent::Top => self.config.scrim_alpha,
            Detent::Bottom | Detent::Middle => 0.0,
        };
        if self.scrim.is_running() {
            self.scrim.stop();
        }
        let from = self.scrim.percent_complete();
        if (target - from).abs() <= f64::EPSILON {
            return;
        }
        let duration = self.config.scrim_duration;
        self.scrim
            .start(target, duration, eased_transition(from, target, duration), now);
    }
}
