//! Sheet configuration.
//!
//! ## Usage
//!
//! Start from [`SheetConfig::default`] and override what the host app needs.
//!
//! ```
//! use detent_ui::{Dp, SheetConfig, Spring};
//!
//! let config = SheetConfig::default()
//!     .middle_height(Dp(320.0))
//!     .spring(Spring::new(1.0, 260.0, 1.0));
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use derive_setters::Setters;

use crate::{
    Dp, Spring,
    error::{ConfigError, ensure_non_negative, ensure_positive},
};

/// Default values for [`SheetConfig`].
pub struct SheetDefaults;

impl SheetDefaults {
    /// Height of the sheet strip that stays visible when collapsed.
    pub const MIN_VISIBLE_HEIGHT: Dp = Dp(48.0);
    /// Offset of the middle detent above the collapsed position.
    pub const MIDDLE_HEIGHT: Dp = Dp(300.0);
    /// Corner radius of the sheet while it is below the top detent.
    pub const MAX_CORNER_RADIUS: Dp = Dp(6.0);
    /// Scrim opacity over the background content when expanded.
    pub const SCRIM_ALPHA: f64 = 0.32;
    /// Duration of the scrim fade.
    pub const SCRIM_DURATION: Duration = Duration::from_millis(300);
}

/// Tunable parameters of a bottom sheet.
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct SheetConfig {
    /// Height of the sheet strip that stays visible when collapsed.
    pub min_visible_height: Dp,
    /// Offset of the middle detent above the collapsed position.
    pub middle_height: Dp,
    /// Upper bound of the derived corner radius.
    pub max_corner_radius: Dp,
    /// Spring used to settle onto a detent.
    pub spring: Spring,
    /// Scrim opacity reached while the sheet rests at the top detent.
    pub scrim_alpha: f64,
    /// Duration of the scrim fade.
    pub scrim_duration: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            min_visible_height: SheetDefaults::MIN_VISIBLE_HEIGHT,
            middle_height: SheetDefaults::MIDDLE_HEIGHT,
            max_corner_radius: SheetDefaults::MAX_CORNER_RADIUS,
            spring: Spring::DEFAULT,
            scrim_alpha: SheetDefaults::SCRIM_ALPHA,
            scrim_duration: SheetDefaults::SCRIM_DURATION,
        }
    }
}

impl SheetConfig {
    /// Checks every parameter, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("minimum visible height", self.min_visible_height.0)?;
        ensure_positive("middle height", self.middle_height.0)?;
        ensure_non_negative("maximum corner radius", self.max_corner_radius.0)?;
        self.spring.validate()?;
        if !(0.0..=1.0).contains(&self.scrim_alpha) {
            return Err(ConfigError::ScrimAlpha(self.scrim_alpha));
        }
        Ok(())
    }
}
