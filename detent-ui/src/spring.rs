//! Closed-form damped spring model.
//!
//! ## Usage
//!
//! Build a [`SpringSimulator`] when a gesture is released and sample it once
//! per frame until [`SpringSimulator::duration`] has elapsed.
//!
//! ```
//! use std::time::Duration;
//! use detent_ui::{Dp, Spring, SpringSimulator};
//!
//! // Sheet at 120dp released towards the 300dp detent, moving up at 800dp/s.
//! let simulator = SpringSimulator::new(Spring::DEFAULT, Dp(120.0) - Dp(300.0), 800.0);
//! let settle = simulator.duration();
//! assert!(simulator.translate(settle).abs() < Dp::half_pixel());
//! assert_eq!(simulator.translate(Duration::ZERO), Dp(-180.0));
//! ```
//!
//! The trajectory is evaluated analytically, so sampling at an arbitrary
//! elapsed time costs the same as sampling every frame and dropped frames do
//! not accumulate error.

use std::{f64::consts::E, time::Duration};

use crate::{
    Dp,
    error::{ConfigError, ensure_positive},
};

/// Physical parameters of a damped harmonic oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Mass attached to the spring.
    pub mass: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Ratio of actual to critical damping. `1.0` approaches rest without
    /// overshooting.
    pub damping_ratio: f64,
}

impl Spring {
    /// Critically damped spring used for sheet settling: mass 1, stiffness
    /// 200, damping ratio 1.
    pub const DEFAULT: Spring = Spring::new(1.0, 200.0, 1.0);

    /// Creates a spring from its physical parameters.
    pub const fn new(mass: f64, stiffness: f64, damping_ratio: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping_ratio,
        }
    }

    /// Damping coefficient, `2·ratio·sqrt(mass·stiffness)`.
    pub fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * (self.mass * self.stiffness).sqrt()
    }

    /// Exponential decay rate of the envelope, `damping / (2·mass)`.
    pub fn beta(&self) -> f64 {
        self.damping() / (2.0 * self.mass)
    }

    /// Rejects parameters the closed-form solution cannot handle.
    ///
    /// Only critically damped and overdamped springs are accepted; the
    /// simulator has no oscillating branch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("spring mass", self.mass)?;
        ensure_positive("spring stiffness", self.stiffness)?;
        ensure_positive("spring damping ratio", self.damping_ratio)?;
        if self.damping_ratio < 1.0 {
            return Err(ConfigError::Underdamped(self.damping_ratio));
        }
        Ok(())
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Trajectory of a spring released with a displacement and a velocity.
///
/// The simulator always uses the critically damped solution
/// `x(t) = e^(−βt)·(c1 + c2·t)`; sheets are configured with a damping ratio
/// of one. `x` is the residual offset from the rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSimulator {
    spring: Spring,
    displacement: f64,
    initial_velocity: f64,
    threshold: f64,
}

impl SpringSimulator {
    /// Creates a simulator for `displacement = current − target` and an
    /// initial velocity in dp per second.
    ///
    /// The settle threshold defaults to half a physical pixel at the current
    /// global scale factor.
    pub fn new(spring: Spring, displacement: Dp, initial_velocity: f64) -> Self {
        Self {
            spring,
            displacement: displacement.0,
            initial_velocity,
            threshold: Dp::half_pixel().0,
        }
    }

    /// Overrides the settle threshold.
    pub fn with_threshold(mut self, threshold: Dp) -> Self {
        self.threshold = threshold.0;
        self
    }

    /// The spring driving this trajectory.
    pub fn spring(&self) -> Spring {
        self.spring
    }

    /// Signed distance from rest at `t = 0`.
    pub fn displacement(&self) -> Dp {
        Dp(self.displacement)
    }

    /// Velocity at `t = 0`, in dp per second.
    pub fn initial_velocity(&self) -> f64 {
        self.initial_velocity
    }

    /// Distance below which motion counts as settled.
    pub fn threshold(&self) -> Dp {
        Dp(self.threshold)
    }

    /// Time after which the residual offset stays below the threshold.
    ///
    /// Bounds each term of `x(t)` separately by half the threshold: the
    /// constant term through `|c1|·e^(−βt)`, the linear term through the
    /// maximum of `t·e^(−βt/2)`. A term with a zero coefficient yields a
    /// non-finite bound and contributes nothing.
    pub fn duration(&self) -> Duration {
        if self.displacement == 0.0 && self.initial_velocity == 0.0 {
            return Duration::ZERO;
        }

        let b = self.spring.beta();
        let t1 = 1.0 / b * (2.0 * self.c1().abs() / self.threshold).ln();
        let t2 = 2.0 / b * (4.0 * self.c2().abs() / (E * b * self.threshold)).ln();

        let seconds = [t1, t2]
            .into_iter()
            .filter(|t| t.is_finite())
            .fold(0.0_f64, f64::max);
        // Extremely soft springs never settle in representable time.
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Residual offset from the rest position after `elapsed`.
    pub fn translate(&self, elapsed: Duration) -> Dp {
        let t = elapsed.as_secs_f64();
        Dp((-self.spring.beta() * t).exp() * (self.c1() + self.c2() * t))
    }

    fn c1(&self) -> f64 {
        self.displacement
    }

    fn c2(&self) -> f64 {
        self.initial_velocity + self.spring.beta() * self.displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Dp = Dp(0.25);

    fn simulator(displacement: f64, velocity: f64) -> SpringSimulator {
        SpringSimulator::new(Spring::DEFAULT, Dp(displacement), velocity).with_threshold(THRESHOLD)
    }

    #[test]
    fn default_spring_is_critically_damped() {
        let spring = Spring::default();
        assert_eq!(spring, Spring::new(1.0, 200.0, 1.0));
        assert!((spring.damping() - 2.0 * 200.0_f64.sqrt()).abs() < 1e-9);
        assert!((spring.beta() - 200.0_f64.sqrt()).abs() < 1e-9);
        assert!(spring.validate().is_ok());
    }

    #[test]
    fn underdamped_spring_is_rejected() {
        assert_eq!(
            Spring::new(1.0, 100.0, 0.2).validate(),
            Err(ConfigError::Underdamped(0.2))
        );
        assert!(Spring::new(1.0, 100.0, 0.999).validate().is_err());
        assert!(Spring::new(1.0, 100.0, 1.5).validate().is_ok());
    }

    #[test]
    fn soft_spring_duration_saturates() {
        let spring = Spring::new(1e40, 1e-40, 1.0);
        assert!(spring.validate().is_ok());
        let sim = SpringSimulator::new(spring, Dp(-300.0), 0.0).with_threshold(THRESHOLD);
        assert_eq!(sim.duration(), Duration::MAX);
    }

    #[test]
    fn invalid_spring_is_rejected() {
        assert!(Spring::DEFAULT.validate().is_ok());
        assert_eq!(
            Spring::new(0.0, 200.0, 1.0).validate(),
            Err(ConfigError::NotPositive {
                name: "spring mass",
                value: 0.0
            })
        );
        assert!(Spring::new(1.0, f64::NAN, 1.0).validate().is_err());
        assert!(Spring::new(1.0, 200.0, -1.0).validate().is_err());
    }

    #[test]
    fn at_rest_has_zero_duration() {
        let sim = simulator(0.0, 0.0);
        assert_eq!(sim.duration(), Duration::ZERO);
        assert_eq!(sim.translate(Duration::ZERO), Dp::ZERO);
    }

    #[test]
    fn starts_at_displacement() {
        let sim = simulator(-180.0, 800.0);
        assert_eq!(sim.translate(Duration::ZERO), Dp(-180.0));
    }

    #[test]
    fn settles_within_threshold() {
        let cases = [
            (-300.0, 0.0),
            (300.0, 0.0),
            (-180.0, 800.0),
            (450.0, -2500.0),
            (0.0, 1500.0),
            (-652.0, -400.0),
            (1.0, 0.0),
            (0.1, 0.0),
        ];
        for (displacement, velocity) in cases {
            let sim = simulator(displacement, velocity);
            let duration = sim.duration();
            let residual = sim.translate(duration).abs();
            assert!(
                residual < THRESHOLD,
                "displacement {displacement}, velocity {velocity}: residual {residual} after {duration:?}"
            );
            // Stays settled afterwards.
            for extra_ms in [16, 100, 1000] {
                let later = duration + Duration::from_millis(extra_ms);
                assert!(sim.translate(later).abs() < THRESHOLD);
            }
        }
    }

    #[test]
    fn other_springs_settle_within_threshold() {
        let springs = [
            Spring::new(1.0, 80.0, 1.0),
            Spring::new(1.0, 900.0, 1.0),
            Spring::new(2.5, 200.0, 1.0),
            Spring::new(0.3, 50.0, 1.0),
            Spring::new(1.0, 200.0, 1.8),
        ];
        for spring in springs {
            for (displacement, velocity) in [(-300.0, 0.0), (400.0, -3000.0), (-50.0, -900.0)] {
                let sim = SpringSimulator::new(spring, Dp(displacement), velocity)
                    .with_threshold(THRESHOLD);
                let residual = sim.translate(sim.duration()).abs();
                assert!(
                    residual < THRESHOLD,
                    "{spring:?}, displacement {displacement}, velocity {velocity}: residual {residual}"
                );
            }
        }
    }

    #[test]
    fn sub_threshold_displacement_needs_no_time() {
        let sim = simulator(0.1, 0.0);
        assert_eq!(sim.duration(), Duration::ZERO);
    }

    #[test]
    fn magnitude_never_grows_after_peak() {
        // Velocity pointing away from rest produces a peak after release.
        let sim = simulator(-100.0, -1200.0);
        // x'(t) = 0 where t = 1/β − c1/c2.
        let beta = sim.spring().beta();
        let c2 = sim.initial_velocity() + beta * sim.displacement().0;
        let peak = Duration::from_secs_f64(1.0 / beta - sim.displacement().0 / c2);
        let end = sim.duration();
        assert!(peak < end);

        let mut previous = sim.translate(peak).abs();
        let mut t = peak;
        while t < end {
            t += Duration::from_millis(4);
            let current = sim.translate(t).abs();
            assert!(current <= previous + Dp(1e-9), "grew at {t:?}");
            previous = current;
        }
    }

    #[test]
    fn released_towards_rest_does_not_overshoot() {
        // No velocity: the residual keeps its sign for the whole trajectory.
        let sim = simulator(-300.0, 0.0);
        let end = sim.duration();
        let mut t = Duration::ZERO;
        while t <= end {
            assert!(sim.translate(t) <= Dp::ZERO);
            t += Duration::from_millis(8);
        }
    }

    #[test]
    fn larger_displacement_takes_longer() {
        assert!(simulator(-600.0, 0.0).duration() > simulator(-60.0, 0.0).duration());
    }
}
