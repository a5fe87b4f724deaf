//! Knob configuration: every settable range, behaviour, and style property.
//!
//! A [`KnobConfig`] can be applied to a [`Knob`](crate::Knob) in one batch and
//! round-trips through JSON, which is how the demo app persists its settings.

use crate::constants::*;
use crate::mapping;
use crate::types::{AngleRange, IndicatorType, ValueAttributes, ValueDisplay, ValueRange};
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or storing a [`KnobConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON text could not be parsed into a config
    #[error("failed to parse knob config: {0}")]
    Parse(#[source] serde_json::Error),
    /// The config could not be serialized
    #[error("failed to serialize knob config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// All settable properties of a knob.
///
/// Missing fields take their default when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobConfig {
    /// Value at the start angle
    pub minimum_value: f32,
    /// Value at the end angle
    pub maximum_value: f32,
    /// Angle of the minimum value, in radians
    pub start_angle: f32,
    /// Angle of the maximum value, in radians
    pub end_angle: f32,

    /// Request haptic feedback when a drag crosses a graduation
    pub is_enable_feedback: bool,
    /// Snap to the nearest graduation when a drag ends
    pub is_graduations_aligned: bool,
    /// Notify on every drag sample instead of only when the drag ends
    pub is_continuous: bool,

    /// Track arc color
    pub track_color: Color32,
    /// Track arc stroke width
    pub line_width: f32,

    /// Number of minor graduations, in `[0, 360]`
    pub graduations: u32,
    /// Minor graduation tick length
    pub graduation_length: f32,
    /// Minor graduation stroke width
    pub graduation_width: f32,
    /// Minor graduation color
    pub graduation_color: Color32,

    /// Number of large graduations, in `[0, 360]`
    pub large_graduations: u32,
    /// Large graduation tick length
    pub large_graduation_length: f32,
    /// Large graduation stroke width
    pub large_graduation_width: f32,
    /// Large graduation color
    pub large_graduation_color: Color32,

    /// Indicator shape
    pub indicator_type: IndicatorType,

    /// Which graduations carry a value label
    pub value_display: ValueDisplay,
    /// Label text styling
    pub value_attributes: ValueAttributes,
    /// Gap between the large graduations and the labels
    pub value_margin: f32,
}

impl Default for KnobConfig {
    fn default() -> Self {
        let angles = AngleRange::default();
        let values = ValueRange::default();
        Self {
            minimum_value: values.min,
            maximum_value: values.max,
            start_angle: angles.start,
            end_angle: angles.end,
            is_enable_feedback: true,
            is_graduations_aligned: true,
            is_continuous: false,
            track_color: Color32::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            graduations: DEFAULT_GRADUATIONS,
            graduation_length: DEFAULT_GRADUATION_LENGTH,
            graduation_width: DEFAULT_GRADUATION_WIDTH,
            graduation_color: Color32::GRAY,
            large_graduations: DEFAULT_LARGE_GRADUATIONS,
            large_graduation_length: DEFAULT_LARGE_GRADUATION_LENGTH,
            large_graduation_width: DEFAULT_LARGE_GRADUATION_WIDTH,
            large_graduation_color: Color32::BLACK,
            indicator_type: IndicatorType::default(),
            value_display: ValueDisplay::default(),
            value_attributes: ValueAttributes::default(),
            value_margin: DEFAULT_VALUE_MARGIN,
        }
    }
}

/// Clamps a requested graduation count into `[0, MAX_GRADUATIONS]`.
pub fn clamp_graduations(count: i32) -> u32 {
    count.clamp(0, MAX_GRADUATIONS as i32) as u32
}

impl KnobConfig {
    /// Angle range of the dial.
    pub fn angle_range(&self) -> AngleRange {
        AngleRange::new(self.start_angle, self.end_angle)
    }

    /// Value range of the dial.
    pub fn value_range(&self) -> ValueRange {
        ValueRange::new(self.minimum_value, self.maximum_value)
    }

    /// Graduation count used for snapping and feedback.
    pub fn graduation_count(&self) -> u32 {
        mapping::graduation_count(self.graduations, self.large_graduations)
    }

    /// Value spacing between graduations, `None` without graduations.
    pub fn graduation_quantum(&self) -> Option<f32> {
        mapping::graduation_quantum(self.value_range(), self.graduation_count())
    }

    /// Number of label divisions selected by [`ValueDisplay`].
    pub fn value_label_count(&self) -> u32 {
        match self.value_display {
            ValueDisplay::None => 0,
            ValueDisplay::ForGraduation => self.graduations,
            ValueDisplay::ForLargeGraduation => self.large_graduations,
        }
    }

    /// Returns a copy with graduation counts clamped into range.
    pub fn sanitized(mut self) -> Self {
        self.graduations = self.graduations.min(MAX_GRADUATIONS);
        self.large_graduations = self.large_graduations.min(MAX_GRADUATIONS);
        self
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Deserialize a config from JSON, clamping graduation counts.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)
            .map(Self::sanitized)
            .map_err(ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_default_config() {
        let config = KnobConfig::default();
        assert_eq!(config.value_range(), ValueRange::new(0.0, 1.0));
        assert_eq!(config.angle_range(), AngleRange::new(0.0, TAU));
        assert!(config.is_enable_feedback);
        assert!(config.is_graduations_aligned);
        assert!(!config.is_continuous);
        assert_eq!(config.graduations, 50);
        assert_eq!(config.large_graduations, 10);
        assert_eq!(config.value_display, ValueDisplay::ForLargeGraduation);
        assert!(matches!(config.indicator_type, IndicatorType::Circle { radius, .. } if radius == 12.0));
    }

    #[test]
    fn test_clamp_graduations() {
        assert_eq!(clamp_graduations(-5), 0);
        assert_eq!(clamp_graduations(26), 26);
        assert_eq!(clamp_graduations(1000), 360);
    }

    #[test]
    fn test_label_count_follows_display() {
        let mut config = KnobConfig {
            graduations: 26,
            large_graduations: 13,
            ..KnobConfig::default()
        };
        assert_eq!(config.value_label_count(), 13);
        config.value_display = ValueDisplay::ForGraduation;
        assert_eq!(config.value_label_count(), 26);
        config.value_display = ValueDisplay::None;
        assert_eq!(config.value_label_count(), 0);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let config = KnobConfig::from_json(r#"{ "maximum_value": 260.0, "is_continuous": true }"#)
            .expect("partial config should parse");
        assert_eq!(config.maximum_value, 260.0);
        assert!(config.is_continuous);
        assert_eq!(config.graduations, DEFAULT_GRADUATIONS);
        assert_eq!(config.track_color, Color32::BLACK);
    }

    #[test]
    fn test_json_clamps_graduations() {
        let config = KnobConfig::from_json(r#"{ "graduations": 5000 }"#).expect("should parse");
        assert_eq!(config.graduations, MAX_GRADUATIONS);
    }

    #[test]
    fn test_json_persists_indicator_variant() {
        let config = KnobConfig {
            indicator_type: IndicatorType::Pointer {
                color: Color32::RED,
                length: 100.0,
                width: 4.0,
            },
            ..KnobConfig::default()
        };
        let json = config.to_json().expect("config should serialize");
        assert!(json.contains("Pointer"));
        assert_eq!(KnobConfig::from_json(&json).expect("should parse"), config);
    }

    #[test]
    fn test_invalid_json_reports_parse_error() {
        let err = KnobConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse knob config"));
    }
}
