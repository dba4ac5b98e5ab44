//! # Density-Independent Pixels (Dp)
//!
//! This module provides the [`Dp`] type, the unit every sheet position,
//! detent and derived visual is expressed in.
//!
//! ## Overview
//!
//! Layout distances are measured in density-independent pixels. The platform
//! reports its display density once through [`set_scale_factor`]; after that
//! `Dp` values can be converted to physical pixels and back. The spring
//! simulator uses this to express its settle threshold as half a physical
//! pixel, see [`Dp::half_pixel`].
//!
//! ## Usage
//!
//! ```
//! use detent_ui::Dp;
//!
//! let middle = Dp(300.0);
//! let min_visible = Dp(48.0);
//!
//! assert_eq!(middle + min_visible, Dp(348.0));
//! assert_eq!((middle - Dp(400.0)).clamp(Dp::ZERO, Dp(6.0)), Dp::ZERO);
//! ```

use std::{
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    sync::OnceLock,
};

use parking_lot::RwLock;

/// Global scale factor for converting between density-independent pixels and
/// physical pixels.
///
/// The scale factor is the number of physical pixels per dp. When it has not
/// been initialized every conversion assumes `1.0`.
pub static SCALE_FACTOR: OnceLock<RwLock<f64>> = OnceLock::new();

/// Sets the global scale factor reported by the platform.
///
/// Non-finite or non-positive values are ignored and logged, the previous
/// factor stays in effect.
pub fn set_scale_factor(scale_factor: f64) {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        tracing::warn!(scale_factor, "ignoring invalid scale factor");
        return;
    }
    *SCALE_FACTOR
        .get_or_init(|| RwLock::new(1.0))
        .write() = scale_factor;
}

/// Returns the current global scale factor, `1.0` when unset.
pub fn scale_factor() -> f64 {
    SCALE_FACTOR.get().map(|lock| *lock.read()).unwrap_or(1.0)
}

/// Density-independent pixels (dp).
///
/// `Dp` wraps a single `f64` and implements the arithmetic operators, so
/// positions, detents and insets combine without unwrapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Zero dp.
    pub const ZERO: Dp = Dp(0.0);

    /// Creates a new `Dp` instance with the specified value.
    ///
    /// ```
    /// use detent_ui::Dp;
    ///
    /// const MIN_VISIBLE_HEIGHT: Dp = Dp::new(48.0);
    /// assert_eq!(MIN_VISIBLE_HEIGHT.0, 48.0);
    /// ```
    pub const fn new(value: f64) -> Self {
        Dp(value)
    }

    /// Converts this dp value to physical pixels.
    pub fn to_pixels_f64(&self) -> f64 {
        self.0 * scale_factor()
    }

    /// Creates a `Dp` value from physical pixels.
    pub fn from_pixels_f64(value: f64) -> Self {
        Dp(value / scale_factor())
    }

    /// Half a physical pixel expressed in dp.
    ///
    /// Motion closer than this to its target cannot be seen on screen.
    pub fn half_pixel() -> Self {
        Self::from_pixels_f64(0.5)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Dp(self.0.abs())
    }

    /// Restricts the value to `[min, max]`.
    ///
    /// Unlike [`f64::clamp`] this never panics; when `min > max` the result is
    /// `max`.
    pub fn clamp(self, min: Dp, max: Dp) -> Self {
        Dp(self.0.max(min.0).min(max.0))
    }

    /// Returns the smaller of two values.
    pub fn min(self, other: Dp) -> Self {
        Dp(self.0.min(other.0))
    }

    /// Returns the larger of two values.
    pub fn max(self, other: Dp) -> Self {
        Dp(self.0.max(other.0))
    }
}

impl fmt::Display for Dp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}dp", self.0)
    }
}

impl From<f64> for Dp {
    fn from(value: f64) -> Self {
        Dp::new(value)
    }
}

impl Add for Dp {
    type Output = Dp;

    fn add(self, rhs: Dp) -> Dp {
        Dp(self.0 + rhs.0)
    }
}

impl AddAssign for Dp {
    fn add_assign(&mut self, rhs: Dp) {
        self.0 += rhs.0;
    }
}

impl Sub for Dp {
    type Output = Dp;

    fn sub(self, rhs: Dp) -> Dp {
        Dp(self.0 - rhs.0)
    }
}

impl SubAssign for Dp {
    fn sub_assign(&mut self, rhs: Dp) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Dp {
    type Output = Dp;

    fn mul(self, rhs: f64) -> Dp {
        Dp(self.0 * rhs)
    }
}

impl Div<f64> for Dp {
    type Output = Dp;

    fn div(self, rhs: f64) -> Dp {
        Dp(self.0 / rhs)
    }
}

impl Div for Dp {
    type Output = f64;

    fn div(self, rhs: Dp) -> f64 {
        self.0 / rhs.0
    }
}

impl Neg for Dp {
    type Output = Dp;

    fn neg(self) -> Dp {
        Dp(-self.0)
    }
}
