//! Container geometry reported by the platform layout system.

use crate::Dp;

/// Insets of the container that content must not be obscured by.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SafeAreaInsets {
    /// Status bar / notch inset.
    pub top: Dp,
    /// Home indicator inset.
    pub bottom: Dp,
}

impl SafeAreaInsets {
    /// Creates insets from their top and bottom values.
    pub const fn new(top: Dp, bottom: Dp) -> Self {
        Self { top, bottom }
    }
}

/// Size and safe area of the container hosting the sheet.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    /// Full container height.
    pub height: Dp,
    /// Safe-area insets of the container.
    pub safe_area: SafeAreaInsets,
}

impl SheetGeometry {
    /// Creates a geometry value.
    pub const fn new(height: Dp, safe_area: SafeAreaInsets) -> Self {
        Self { height, safe_area }
    }

    /// Top content inset of the scroll surface: the distance from the top of
    /// the container to the collapsed sheet.
    ///
    /// A surface offset of `-inset` places the sheet at its collapsed
    /// position, so `position = inset + offset`.
    pub fn content_inset_top(&self, min_visible_height: Dp) -> Dp {
        self.height - self.safe_area.bottom - min_visible_height
    }
}
