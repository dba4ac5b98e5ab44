//! Easing curves for projected properties.

use std::time::Duration;

/// Standard ease-in-out cubic over `progress ∈ [0, 1]`.
///
/// Input outside the unit interval is clamped.
pub fn easing(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Timing curve that eases from `from` to `to` over `duration`.
///
/// Returned curves are meant for
/// [`ProjectionAnimator::start`](detent_ui::ProjectionAnimator::start). A zero
/// duration jumps straight to `to`.
pub fn eased_transition(from: f64, to: f64, duration: Duration) -> impl Fn(Duration) -> f64 {
    move |elapsed| {
        let raw = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / duration.as_secs_f64()
        };
        from + (to - from) * easing(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_and_symmetry() {
        assert_eq!(easing(0.0), 0.0);
        assert_eq!(easing(1.0), 1.0);
        assert_eq!(easing(0.5), 0.5);
        assert!((easing(0.25) + easing(0.75) - 1.0).abs() < 1e-12);
        assert_eq!(easing(-1.0), 0.0);
        assert_eq!(easing(3.0), 1.0);
    }

    #[test]
    fn easing_is_monotonic() {
        let samples: Vec<f64> = (0..=100).map(|i| easing(i as f64 / 100.0)).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn transition_interpolates_between_values() {
        let curve = eased_transition(0.32, 0.0, Duration::from_millis(300));
        assert!((curve(Duration::ZERO) - 0.32).abs() < 1e-12);
        assert!((curve(Duration::from_millis(150)) - 0.16).abs() < 1e-12);
        assert!(curve(Duration::from_millis(300)).abs() < 1e-12);

        let instant = eased_transition(0.0, 1.0, Duration::ZERO);
        assert_eq!(instant(Duration::ZERO), 1.0);
    }
}
