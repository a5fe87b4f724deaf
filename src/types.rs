//! Core data types shared by the knob, its renderer, and the egui widget.
//!
//! This module defines the angle and value ranges the knob maps between, the
//! indicator shape variants, label display options, and the gesture phases
//! driving the value state machine.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Angular span of the dial in radians, measured clockwise from the +x axis
/// (screen coordinates, y pointing down).
///
/// Angles are not normalized; `end` may be smaller than `start` or more than a
/// full turn away from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    /// Angle of the minimum value
    pub start: f32,
    /// Angle of the maximum value
    pub end: f32,
}

impl AngleRange {
    /// Creates a new angle range.
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Signed angular width, `end - start`.
    pub fn span(&self) -> f32 {
        self.end - self.start
    }

    /// Whether the range covers exactly one full turn.
    ///
    /// The last graduation and label coincide with the first one in that case
    /// and are skipped when drawing.
    pub fn is_full_circle(&self) -> bool {
        self.span() == TAU
    }
}

impl Default for AngleRange {
    fn default() -> Self {
        Self::new(0.0, TAU)
    }
}

/// Range of values the knob can take. Callers keep `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest allowed value
    pub min: f32,
    /// Largest allowed value
    pub max: f32,
}

impl ValueRange {
    /// Creates a new value range.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the range, `max - min`.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Clamps `value` into the range.
    ///
    /// Applies `max` after `min`, so an inverted range resolves to `max`
    /// instead of panicking like [`f32::clamp`].
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Shape used to show the current value on the dial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IndicatorType {
    /// A hand drawn from the center outwards
    Pointer {
        /// Stroke color
        color: Color32,
        /// Length from the center
        length: f32,
        /// Stroke width
        width: f32,
    },
    /// A tick on the outer edge, like a highlighted graduation
    Graduation {
        /// Stroke color
        color: Color32,
        /// Tick length measured inwards from the edge
        length: f32,
        /// Stroke width
        width: f32,
    },
    /// A filled dot just inside the graduations
    Circle {
        /// Fill color
        color: Color32,
        /// Dot radius
        radius: f32,
    },
}

impl Default for IndicatorType {
    fn default() -> Self {
        IndicatorType::Circle {
            color: Color32::RED,
            radius: crate::constants::DEFAULT_INDICATOR_RADIUS,
        }
    }
}

/// Which graduations get a value label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueDisplay {
    /// No labels
    None,
    /// One label per large graduation
    #[default]
    ForLargeGraduation,
    /// One label per minor graduation
    ForGraduation,
}

/// Text styling for value labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAttributes {
    /// Text color
    pub color: Color32,
    /// Font size in points
    pub font_size: f32,
}

impl Default for ValueAttributes {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            font_size: crate::constants::DEFAULT_VALUE_FONT_SIZE,
        }
    }
}

/// Phase of a drag gesture as seen by the knob's value state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// The drag was recognized
    Began,
    /// The finger moved
    Changed,
    /// The finger lifted
    Ended,
    /// The system interrupted the drag
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase finishes the gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// Side effects requested by a single gesture step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KnobEvents {
    /// A "value changed" notification fired
    pub value_changed: bool,
    /// A graduation boundary was crossed and haptic feedback should play
    pub feedback: bool,
}
