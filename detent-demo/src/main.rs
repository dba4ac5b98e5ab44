//! Replays a scripted bottom sheet session against a headless scroll surface.
//!
//! Run with `RUST_LOG=debug` to see every settle decision, or
//! `RUST_LOG=trace` for per-frame positions.

use detent_components::bottom_sheet::{BottomSheetController, ScrollSurface};
use detent_ui::{
    ConfigError, Detent, Dp, FrameSource, ManualFrameSource, SafeAreaInsets, SheetConfig,
    SheetGeometry,
};
use tracing::{info, warn};

/// Scroll view stand-in that just remembers what it was told.
#[derive(Debug, Default)]
struct HeadlessSurface {
    offset: Dp,
    inset: Dp,
    decelerating: bool,
}

impl ScrollSurface for HeadlessSurface {
    fn content_offset(&self) -> Dp {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Dp) {
        self.offset = offset;
    }

    fn set_content_inset_top(&mut self, inset: Dp) {
        self.inset = inset;
    }

    fn stop_deceleration(&mut self) {
        self.decelerating = false;
    }
}

type Sheet = BottomSheetController<HeadlessSurface, ManualFrameSource>;

const MAX_FRAMES: usize = 600;

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "warn,detent_demo=info,detent_components=info,detent_ui=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("info"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Moves the finger through `positions`, one scroll report each.
fn drag(sheet: &mut Sheet, positions: &[f64]) {
    sheet.on_begin_dragging();
    for &position in positions {
        let offset = Dp(position) - sheet.content_inset_top();
        sheet.surface_mut().offset = offset;
        sheet.on_scroll();
    }
}

/// Lifts the finger; `predicted` is where native deceleration would stop.
fn release(sheet: &mut Sheet, predicted: f64, velocity: f64) -> Option<Detent> {
    let target_offset = Dp(predicted) - sheet.content_inset_top();
    let target = sheet.on_will_end_dragging(target_offset, velocity);
    sheet.surface_mut().decelerating = true;
    sheet.on_will_begin_decelerating();
    if target.is_none() {
        // Let native deceleration finish where it predicted.
        sheet.surface_mut().offset = target_offset;
        sheet.surface_mut().decelerating = false;
        sheet.on_scroll();
    }
    info!(
        predicted,
        velocity,
        ?target,
        position = sheet.position().0,
        native_deceleration = sheet.surface().decelerating,
        "released"
    );
    target
}

/// Delivers frames until nothing animates, or at most `limit` frames.
fn pump(sheet: &mut Sheet, limit: usize) -> usize {
    let mut frames = 0;
    while sheet.frame_source().is_active() && frames < limit {
        sheet.frame_source_mut().advance_frame();
        sheet.on_frame();
        frames += 1;
    }
    frames
}

fn settle(sheet: &mut Sheet) {
    let frames = pump(sheet, MAX_FRAMES);
    if sheet.frame_source().is_active() {
        warn!(frames, "animations still running, giving up");
    }
    let visuals = sheet.visuals();
    info!(
        frames,
        position = sheet.position().0,
        corner_radius = visuals.corner_radius.0,
        curtain = visuals.curtain_opacity,
        content_inset = visuals.content_bottom_inset.0,
        scrim = sheet.scrim_opacity(),
        "settled"
    );
}

fn main() -> Result<(), ConfigError> {
    init_tracing();
    detent_ui::dp::set_scale_factor(3.0);

    let portrait = SheetGeometry::new(Dp(844.0), SafeAreaInsets::new(Dp(47.0), Dp(34.0)));
    let mut sheet = BottomSheetController::new(
        SheetConfig::default(),
        portrait,
        HeadlessSurface::default(),
        ManualFrameSource::new(),
    )?;
    info!(
        detents = ?sheet.detents(),
        content_inset = sheet.surface().inset.0,
        "sheet ready"
    );

    info!("pull up to the middle");
    drag(&mut sheet, &[40.0, 110.0, 190.0, 240.0]);
    release(&mut sheet, 330.0, 600.0);
    settle(&mut sheet);

    info!("fling past the top");
    drag(&mut sheet, &[320.0, 380.0]);
    release(&mut sheet, 1100.0, 2400.0);
    settle(&mut sheet);

    info!("grab the sheet while it collapses");
    sheet.snap_to(Detent::Bottom);
    pump(&mut sheet, 8);
    let grabbed = sheet.position().0;
    drag(&mut sheet, &[grabbed, 520.0]);
    release(&mut sheet, 610.0, 900.0);
    settle(&mut sheet);

    info!("drag between detents and let go slowly");
    drag(&mut sheet, &[560.0, 540.0]);
    release(&mut sheet, 540.0, 0.0);
    settle(&mut sheet);

    info!("rotate to landscape");
    let landscape = SheetGeometry::new(Dp(390.0), SafeAreaInsets::new(Dp(0.0), Dp(21.0)));
    sheet.on_geometry_changed(landscape);
    settle(&mut sheet);

    Ok(())
}
