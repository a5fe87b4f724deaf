//! # Rotary Knob
//!
//! A rotary dial control for egui: a track arc, tick-mark graduations, a value
//! indicator and optional numeric labels, driven by single-finger drags that
//! rotate a bounded value.
//!
//! ## Features
//! - Angle ↔ value mapping over any angle range and value range
//! - Drag tracking around the dial center, robust to the ±π seam
//! - Snapping to graduations when a drag ends, with an animated indicator
//! - Continuous or end-of-drag change notification
//! - Haptic feedback requests on graduation crossings
//! - Pointer, graduation-mark and circle indicators
//! - SVG and PNG export
//! - An eframe demo application

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod config;
mod constants;
mod export;
mod gesture;
mod knob;
pub mod mapping;
mod renderer;
mod types;
#[cfg(not(target_arch = "wasm32"))]
mod ui;
mod widget;

// Re-export public types and functions
pub use config::{ConfigError, KnobConfig};
pub use export::{build_svg, ExportError, ExportOptions};
#[cfg(not(target_arch = "wasm32"))]
pub use export::{encode_png, render_png};
pub use gesture::{angle_around, RotationGesture};
pub use knob::{Knob, ValueFormatter};
pub use renderer::{
    default_value_format, IndicatorAnimation, IndicatorShape, KnobGeometry, KnobRenderer,
    TickLayer, ValueLabel,
};
pub use types::*;
pub use widget::{KnobResponse, KnobWidget};
#[cfg(not(target_arch = "wasm32"))]
use ui::KnobDemoApp;

use thiserror::Error;

/// Errors that stop the demo application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    /// The async runtime used for file dialogs could not be created
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    /// eframe failed to open the window
    #[error(transparent)]
    Eframe(#[from] eframe::Error),
}

/// Runs the knob demo application with default settings.
///
/// This function initializes the egui application window and starts the main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an [`AppError`] if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use rotary_knob::run_app;
///
/// fn main() -> Result<(), rotary_knob::AppError> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), AppError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Rotary Knob",
        options,
        Box::new(|cc| Ok(Box::new(KnobDemoApp::new(cc)))),
    )?;
    Ok(())
}
