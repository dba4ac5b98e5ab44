//! Presentation components built on `detent-ui`.
//!
//! # Usage
//!
//! Wrap the platform scroll view hosting the sheet in a
//! [`ScrollSurface`](bottom_sheet::ScrollSurface) and hand it, together with
//! a frame source, to a
//! [`BottomSheetController`](bottom_sheet::BottomSheetController). Forward
//! the scroll view's delegate callbacks and display frames to the
//! controller; it takes care of the rest.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod animation;
pub mod bottom_sheet;
