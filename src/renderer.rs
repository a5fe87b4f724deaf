//! Retained dial geometry and indicator animation.
//!
//! The renderer keeps the flattened track arc, graduation ticks, indicator
//! shape and value labels for one knob. Configuration and size changes only
//! mark it dirty; the geometry is rebuilt once on the next paint, however many
//! properties changed in between.

use crate::config::KnobConfig;
use crate::constants::{ARC_SEGMENTS_PER_TURN, INDICATOR_ANIMATION_SECS};
use crate::types::{IndicatorType, ValueAttributes};
use eframe::egui::{self, emath::Rot2, Color32, Pos2, Rect, Stroke, Vec2};

/// A set of tick marks sharing one stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayer {
    /// Tick segments from the outer radius inwards
    pub segments: Vec<[Pos2; 2]>,
    /// Stroke used for every tick
    pub stroke: Stroke,
}

/// Indicator shape in the unrotated frame: offsets from the dial center with
/// angle zero pointing along +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorShape {
    /// A stroked line; pointers get round caps
    Line {
        /// Segment endpoints, relative to the center
        points: [Vec2; 2],
        /// Line stroke
        stroke: Stroke,
        /// Whether both ends are capped with a disc
        round_cap: bool,
    },
    /// A filled disc
    Dot {
        /// Disc center, relative to the dial center
        offset: Vec2,
        /// Disc radius
        radius: f32,
        /// Fill color
        color: Color32,
    },
}

impl IndicatorShape {
    fn from_config(config: &KnobConfig, width: f32) -> Self {
        let half_line = config.line_width / 2.0;
        match config.indicator_type {
            IndicatorType::Pointer { color, length, width: stroke_width } => IndicatorShape::Line {
                points: [Vec2::ZERO, egui::vec2(length, 0.0)],
                stroke: Stroke::new(stroke_width, color),
                round_cap: true,
            },
            IndicatorType::Graduation { color, length, width: stroke_width } => {
                let outer = width / 2.0 - half_line;
                IndicatorShape::Line {
                    points: [egui::vec2(outer - length, 0.0), egui::vec2(outer, 0.0)],
                    stroke: Stroke::new(stroke_width, color),
                    round_cap: true,
                }
            }
            IndicatorType::Circle { color, radius } => IndicatorShape::Dot {
                offset: egui::vec2(
                    width / 2.0 - radius * 2.0 - config.graduation_length - half_line,
                    0.0,
                ),
                radius,
                color,
            },
        }
    }

    /// Returns this shape rotated by `angle` around the origin.
    pub fn rotated(&self, angle: f32) -> Self {
        let rot = Rot2::from_angle(angle);
        match *self {
            IndicatorShape::Line { points, stroke, round_cap } => IndicatorShape::Line {
                points: [rot * points[0], rot * points[1]],
                stroke,
                round_cap,
            },
            IndicatorShape::Dot { offset, radius, color } => IndicatorShape::Dot {
                offset: rot * offset,
                radius,
                color,
            },
        }
    }
}

/// A value label anchored at its center.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    /// Center of the label text
    pub pos: Pos2,
    /// Value the label stands for
    pub value: f32,
    /// Formatted text
    pub text: String,
}

/// Everything needed to paint a knob at rest, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobGeometry {
    /// Rectangle the geometry was built for
    pub bounds: Rect,
    /// Flattened track arc
    pub track: Vec<Pos2>,
    /// Track stroke
    pub track_stroke: Stroke,
    /// Minor graduations, `None` when hidden
    pub graduations: Option<TickLayer>,
    /// Large graduations, `None` when hidden
    pub large_graduations: Option<TickLayer>,
    /// Indicator in the unrotated frame
    pub indicator: IndicatorShape,
    /// Value labels
    pub labels: Vec<ValueLabel>,
    /// Label styling
    pub label_attributes: ValueAttributes,
}

impl KnobGeometry {
    /// Builds the geometry of `config` laid out in `bounds`.
    pub fn build(config: &KnobConfig, bounds: Rect, formatter: &dyn Fn(f32) -> String) -> Self {
        Self {
            bounds,
            track: track_points(config, bounds),
            track_stroke: Stroke::new(config.line_width, config.track_color),
            graduations: tick_layer(
                config,
                bounds,
                config.graduations,
                config.graduation_length,
                Stroke::new(config.graduation_width, config.graduation_color),
            ),
            large_graduations: tick_layer(
                config,
                bounds,
                config.large_graduations,
                config.large_graduation_length,
                Stroke::new(config.large_graduation_width, config.large_graduation_color),
            ),
            indicator: IndicatorShape::from_config(config, bounds.width()),
            labels: value_labels(config, bounds, formatter),
            label_attributes: config.value_attributes,
        }
    }

    /// Indicator rotated to `angle` and placed on the dial center.
    pub fn indicator_at(&self, angle: f32) -> IndicatorShape {
        self.indicator.rotated(angle)
    }
}

fn tick_radius(config: &KnobConfig, bounds: Rect) -> f32 {
    bounds.width().min(bounds.height() - config.line_width) / 2.0
}

fn track_points(config: &KnobConfig, bounds: Rect) -> Vec<Pos2> {
    let center = bounds.center();
    let radius = bounds.width().min(bounds.height()) / 2.0;
    let angles = config.angle_range();
    let span = angles.span();
    let segments = ((span.abs() / std::f32::consts::TAU) * ARC_SEGMENTS_PER_TURN)
        .ceil()
        .max(1.0) as usize;
    (0..=segments)
        .map(|i| {
            let angle = angles.start + span * i as f32 / segments as f32;
            center + radius * Vec2::angled(angle)
        })
        .collect()
}

/// Number of marks for `count` divisions: one per division boundary, minus
/// the last one when it would land on top of the first.
fn mark_count(count: u32, full_circle: bool) -> u32 {
    if full_circle {
        count
    } else {
        count + 1
    }
}

fn tick_layer(
    config: &KnobConfig,
    bounds: Rect,
    count: u32,
    length: f32,
    stroke: Stroke,
) -> Option<TickLayer> {
    if count == 0 {
        return None;
    }
    let center = bounds.center();
    let radius = tick_radius(config, bounds);
    let angles = config.angle_range();
    let step = angles.span() / count as f32;
    let segments = (0..mark_count(count, angles.is_full_circle()))
        .map(|i| {
            let dir = Vec2::angled(angles.start + step * i as f32);
            [center + radius * dir, center + (radius - length) * dir]
        })
        .collect();
    Some(TickLayer { segments, stroke })
}

fn value_labels(
    config: &KnobConfig,
    bounds: Rect,
    formatter: &dyn Fn(f32) -> String,
) -> Vec<ValueLabel> {
    let count = config.value_label_count();
    if count == 0 {
        return Vec::new();
    }
    let center = bounds.center();
    let radius =
        tick_radius(config, bounds) - config.large_graduation_length - config.value_margin;
    let angles = config.angle_range();
    let values = config.value_range();
    let value_step = values.span() / count as f32;
    let angle_step = angles.span() / count as f32;
    (0..mark_count(count, angles.is_full_circle()))
        .map(|i| {
            let value = values.min + value_step * i as f32;
            ValueLabel {
                pos: center + radius * Vec2::angled(angles.start + angle_step * i as f32),
                value,
                text: formatter(value),
            }
        })
        .collect()
}

/// Default label text: one decimal place.
pub fn default_value_format(value: f32) -> String {
    format!("{value:.1}")
}

/// Keyframed rotation from the old indicator angle to the new one.
///
/// Runs through the midpoint at half time; each half is eased in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorAnimation {
    from: f32,
    mid: f32,
    to: f32,
    started_at: Option<f64>,
}

impl IndicatorAnimation {
    /// Creates an animation that starts on its first sample.
    pub fn new(from: f32, to: f32) -> Self {
        let lo = from.min(to);
        let hi = from.max(to);
        Self {
            from,
            mid: (hi - lo) / 2.0 + lo,
            to,
            started_at: None,
        }
    }

    /// Angle at `progress` in `[0, 1]`.
    pub fn angle_at(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        if t < 0.5 {
            lerp(self.from, self.mid, ease_in_out(t * 2.0))
        } else {
            lerp(self.mid, self.to, ease_in_out((t - 0.5) * 2.0))
        }
    }

    /// Samples the animation at absolute time `now` (seconds). Returns the
    /// angle and whether the animation is still running.
    pub fn sample(&mut self, now: f64) -> (f32, bool) {
        let started_at = *self.started_at.get_or_insert(now);
        let progress = ((now - started_at) / INDICATOR_ANIMATION_SECS) as f32;
        (self.angle_at(progress), progress < 1.0)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Owned render state of one knob.
#[derive(Debug, Clone)]
pub struct KnobRenderer {
    bounds: Rect,
    geometry: Option<KnobGeometry>,
    indicator_angle: f32,
    animation: Option<IndicatorAnimation>,
}

impl Default for KnobRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl KnobRenderer {
    /// Creates a renderer with no bounds yet; geometry is built on first use.
    pub fn new() -> Self {
        Self {
            bounds: Rect::NOTHING,
            geometry: None,
            indicator_angle: 0.0,
            animation: None,
        }
    }

    /// Marks the geometry stale.
    pub fn invalidate(&mut self) {
        self.geometry = None;
    }

    /// Whether the next access rebuilds the geometry.
    pub fn is_dirty(&self) -> bool {
        self.geometry.is_none()
    }

    /// Moves the dial to `bounds`, invalidating the geometry if it changed.
    pub fn update_bounds(&mut self, bounds: Rect) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.invalidate();
        }
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Geometry for the current bounds, rebuilding it if stale.
    pub fn geometry(
        &mut self,
        config: &KnobConfig,
        formatter: &dyn Fn(f32) -> String,
    ) -> &KnobGeometry {
        let bounds = self.bounds;
        self.geometry.get_or_insert_with(|| {
            log::trace!("rebuilding knob geometry for {bounds:?}");
            KnobGeometry::build(config, bounds, formatter)
        })
    }

    /// Rotates the indicator to `angle`, optionally animating from the
    /// previous target angle.
    pub fn set_indicator_angle(&mut self, angle: f32, animated: bool) {
        self.animation = animated.then(|| IndicatorAnimation::new(self.indicator_angle, angle));
        self.indicator_angle = angle;
    }

    /// Target angle of the indicator.
    pub fn indicator_angle(&self) -> f32 {
        self.indicator_angle
    }

    /// Whether an indicator animation is pending or running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Angle to draw at time `now`; finished animations are dropped.
    pub fn displayed_angle(&mut self, now: f64) -> f32 {
        match self.animation.as_mut().map(|animation| animation.sample(now)) {
            Some((angle, true)) => angle,
            Some((_, false)) => {
                self.animation = None;
                self.indicator_angle
            }
            None => self.indicator_angle,
        }
    }

    /// Paints the dial into `painter` at time `now`.
    ///
    /// Returns `true` while the indicator is animating so the caller can
    /// request another frame.
    pub fn paint(
        &mut self,
        painter: &egui::Painter,
        config: &KnobConfig,
        formatter: &dyn Fn(f32) -> String,
        now: f64,
    ) -> bool {
        let angle = self.displayed_angle(now);
        let geometry = self.geometry(config, formatter);
        paint_geometry(painter, geometry, angle);
        self.animation.is_some()
    }
}

/// Paints `geometry` with the indicator at `angle`.
///
/// Layer order: minor graduations, large graduations, track, indicator, labels.
pub fn paint_geometry(painter: &egui::Painter, geometry: &KnobGeometry, angle: f32) {
    for layer in [&geometry.graduations, &geometry.large_graduations]
        .into_iter()
        .flatten()
    {
        for segment in &layer.segments {
            painter.line_segment(*segment, layer.stroke);
        }
    }

    painter.add(egui::Shape::line(geometry.track.clone(), geometry.track_stroke));

    let center = geometry.bounds.center();
    match geometry.indicator_at(angle) {
        IndicatorShape::Line { points, stroke, round_cap } => {
            let ends = [center + points[0], center + points[1]];
            painter.line_segment(ends, stroke);
            if round_cap {
                for end in ends {
                    painter.circle_filled(end, stroke.width / 2.0, stroke.color);
                }
            }
        }
        IndicatorShape::Dot { offset, radius, color } => {
            painter.circle_filled(center + offset, radius, color);
        }
    }

    let font = egui::FontId::proportional(geometry.label_attributes.font_size);
    for label in &geometry.labels {
        painter.text(
            label.pos,
            egui::Align2::CENTER_CENTER,
            &label.text,
            font.clone(),
            geometry.label_attributes.color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueDisplay;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn bounds() -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(240.0, 240.0))
    }

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_full_circle_drops_overlapping_tick() {
        let config = KnobConfig {
            graduations: 10,
            large_graduations: 4,
            ..KnobConfig::default()
        };
        assert!(config.angle_range().is_full_circle());
        let geometry = KnobGeometry::build(&config, bounds(), &default_value_format);
        assert_eq!(geometry.graduations.map(|g| g.segments.len()), Some(10));
        assert_eq!(geometry.large_graduations.map(|g| g.segments.len()), Some(4));
    }

    #[test]
    fn test_partial_arc_includes_both_ends() {
        let config = KnobConfig {
            start_angle: -PI * 5.0 / 4.0,
            end_angle: PI / 4.0,
            graduations: 26,
            large_graduations: 13,
            ..KnobConfig::default()
        };
        let geometry = KnobGeometry::build(&config, bounds(), &default_value_format);
        let minor = geometry.graduations.expect("minor graduations visible");
        assert_eq!(minor.segments.len(), 27);
        assert_eq!(geometry.large_graduations.map(|g| g.segments.len()), Some(14));

        // First tick starts on the outer radius at the start angle.
        let radius = (240.0 - config.line_width) / 2.0;
        let expected = egui::pos2(120.0, 120.0) + radius * Vec2::angled(config.start_angle);
        assert!(approx(minor.segments[0][0], expected));
    }

    #[test]
    fn test_zero_graduations_are_hidden() {
        let config = KnobConfig {
            graduations: 0,
            large_graduations: 0,
            ..KnobConfig::default()
        };
        let geometry = KnobGeometry::build(&config, bounds(), &default_value_format);
        assert!(geometry.graduations.is_none());
        assert!(geometry.large_graduations.is_none());
        assert!(geometry.labels.is_empty());
    }

    #[test]
    fn test_track_follows_angle_range() {
        let config = KnobConfig {
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            ..KnobConfig::default()
        };
        let geometry = KnobGeometry::build(&config, bounds(), &default_value_format);
        let first = *geometry.track.first().expect("track has points");
        let last = *geometry.track.last().expect("track has points");
        assert!(approx(first, egui::pos2(240.0, 120.0)));
        assert!(approx(last, egui::pos2(120.0, 240.0)));
    }

    #[test]
    fn test_value_labels_for_large_graduations() {
        let config = KnobConfig {
            minimum_value: 0.0,
            maximum_value: 260.0,
            start_angle: -PI * 5.0 / 4.0,
            end_angle: PI / 4.0,
            graduations: 26,
            large_graduations: 13,
            value_display: ValueDisplay::ForLargeGraduation,
            ..KnobConfig::default()
        };
        let formatter = |v: f32| format!("{}", v as i32);
        let geometry = KnobGeometry::build(&config, bounds(), &formatter);
        assert_eq!(geometry.labels.len(), 14);
        assert_eq!(geometry.labels[0].text, "0");
        assert_eq!(geometry.labels[1].text, "20");
        assert_eq!(geometry.labels[13].text, "260");

        let radius = (240.0 - config.line_width) / 2.0
            - config.large_graduation_length
            - config.value_margin;
        let expected = egui::pos2(120.0, 120.0) + radius * Vec2::angled(config.start_angle);
        assert!(approx(geometry.labels[0].pos, expected));
    }

    #[test]
    fn test_default_label_format() {
        let config = KnobConfig {
            large_graduations: 5,
            ..KnobConfig::default()
        };
        let geometry = KnobGeometry::build(&config, bounds(), &default_value_format);
        let texts: Vec<_> = geometry.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["0.0", "0.2", "0.4", "0.6", "0.8"]);
    }

    #[test]
    fn test_indicator_variants() {
        let mut config = KnobConfig::default();
        config.indicator_type = IndicatorType::Pointer {
            color: Color32::RED,
            length: 100.0,
            width: 4.0,
        };
        let pointer = IndicatorShape::from_config(&config, 240.0).rotated(FRAC_PI_2);
        match pointer {
            IndicatorShape::Line { points, stroke, round_cap } => {
                assert!((points[1] - egui::vec2(0.0, 100.0)).length() < 1e-3);
                assert_eq!(stroke.width, 4.0);
                assert!(round_cap);
            }
            other => panic!("unexpected shape {other:?}"),
        }

        config.indicator_type = IndicatorType::Graduation {
            color: Color32::BLUE,
            length: 10.0,
            width: 2.0,
        };
        match IndicatorShape::from_config(&config, 240.0) {
            IndicatorShape::Line { points, .. } => {
                assert_eq!(points[0], egui::vec2(109.0, 0.0));
                assert_eq!(points[1], egui::vec2(119.0, 0.0));
            }
            other => panic!("unexpected shape {other:?}"),
        }

        config.indicator_type = IndicatorType::Circle {
            color: Color32::RED,
            radius: 12.0,
        };
        match IndicatorShape::from_config(&config, 240.0) {
            IndicatorShape::Dot { offset, radius, .. } => {
                assert_eq!(offset, egui::vec2(120.0 - 24.0 - 3.0 - 1.0, 0.0));
                assert_eq!(radius, 12.0);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_renderer_rebuilds_only_when_dirty() {
        let config = KnobConfig::default();
        let mut renderer = KnobRenderer::new();
        renderer.update_bounds(bounds());
        assert!(renderer.is_dirty());

        let first = renderer.geometry(&config, &default_value_format).clone();
        assert!(!renderer.is_dirty());

        renderer.update_bounds(bounds());
        assert!(!renderer.is_dirty());

        renderer.update_bounds(Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0)));
        assert!(renderer.is_dirty());
        let second = renderer.geometry(&config, &default_value_format).clone();
        assert_ne!(first.bounds, second.bounds);
    }

    #[test]
    fn test_animation_passes_through_midpoint() {
        let animation = IndicatorAnimation::new(TAU, 0.0);
        assert_eq!(animation.angle_at(0.0), TAU);
        assert!((animation.angle_at(0.5) - PI).abs() < 1e-6);
        assert_eq!(animation.angle_at(1.0), 0.0);
    }

    #[test]
    fn test_renderer_animation_finishes() {
        let mut renderer = KnobRenderer::new();
        renderer.set_indicator_angle(1.0, false);
        renderer.set_indicator_angle(2.0, true);
        assert!(renderer.is_animating());

        assert_eq!(renderer.displayed_angle(10.0), 1.0);
        let halfway = renderer.displayed_angle(10.0 + INDICATOR_ANIMATION_SECS / 2.0);
        assert!((halfway - 1.5).abs() < 1e-5);
        assert_eq!(renderer.displayed_angle(10.0 + INDICATOR_ANIMATION_SECS), 2.0);
        assert!(!renderer.is_animating());
    }
}
