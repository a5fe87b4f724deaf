//! Linear mapping between the dial's angle range and its value range.
//!
//! These are pure functions; the [`Knob`](crate::Knob) combines them into the
//! gesture state machine.

use crate::types::{AngleRange, ValueRange};

/// Applies an angle delta to `current` and clamps the result.
pub fn angle_to_value(
    delta_angle: f32,
    current: f32,
    angles: AngleRange,
    values: ValueRange,
) -> f32 {
    let value = delta_angle / angles.span() * values.span() + current;
    values.clamp(value)
}

/// Indicator angle for `value`. The value is expected to be clamped already.
pub fn value_to_angle(value: f32, angles: AngleRange, values: ValueRange) -> f32 {
    (value - values.min) / values.span() * angles.span() + angles.start
}

/// Number of graduations used for snapping and feedback: the larger of the two counts.
pub fn graduation_count(graduations: u32, large_graduations: u32) -> u32 {
    graduations.max(large_graduations)
}

/// Value spacing between adjacent graduations, or `None` when there are no
/// graduations to snap to.
pub fn graduation_quantum(values: ValueRange, count: u32) -> Option<f32> {
    if count == 0 {
        return None;
    }
    Some(values.span() / count as f32)
}

/// Nearest multiple of `quantum`, rounding halves away from zero.
pub fn snap_to_quantum(value: f32, quantum: f32) -> f32 {
    (value / quantum).round() * quantum
}

/// Whether moving from `old` to `new` crosses a graduation boundary.
pub fn crosses_graduation(old: f32, new: f32, quantum: f32) -> bool {
    (new / quantum).floor() != (old / quantum).floor()
}
