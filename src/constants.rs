//! Shared crate-wide constants.
//! Centralizes default values for the knob's range, styling, and animation.

// Graduations
/// Upper bound for both graduation counts; setters clamp into `[0, MAX_GRADUATIONS]`.
pub const MAX_GRADUATIONS: u32 = 360;
/// Default number of minor graduations.
pub const DEFAULT_GRADUATIONS: u32 = 50;
/// Default number of large graduations.
pub const DEFAULT_LARGE_GRADUATIONS: u32 = 10;
/// Default minor graduation tick length (in points).
pub const DEFAULT_GRADUATION_LENGTH: f32 = 3.0;
/// Default minor graduation stroke width (in points).
pub const DEFAULT_GRADUATION_WIDTH: f32 = 1.0;
/// Default large graduation tick length (in points).
pub const DEFAULT_LARGE_GRADUATION_LENGTH: f32 = 6.0;
/// Default large graduation stroke width (in points).
pub const DEFAULT_LARGE_GRADUATION_WIDTH: f32 = 2.0;

// Track
/// Default stroke width of the track arc.
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
/// Number of polyline segments used per full turn when flattening the track arc.
pub const ARC_SEGMENTS_PER_TURN: f32 = 180.0;

// Indicator
/// Default radius of the circle indicator.
pub const DEFAULT_INDICATOR_RADIUS: f32 = 12.0;
/// Duration of the snap animation, in seconds.
pub const INDICATOR_ANIMATION_SECS: f64 = 0.25;

// Value labels
/// Default distance between the large graduations and the value labels.
pub const DEFAULT_VALUE_MARGIN: f32 = 15.0;
/// Default label font size.
pub const DEFAULT_VALUE_FONT_SIZE: f32 = 14.0;

// Widget
/// Side length of the square a knob allocates when no size is given.
pub const DEFAULT_KNOB_SIZE: f32 = 240.0;
