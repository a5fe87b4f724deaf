//! The knob control: value state, gesture state machine, and host-facing setters.

use crate::config::{clamp_graduations, KnobConfig};
use crate::gesture::RotationGesture;
use crate::mapping;
use crate::renderer::{default_value_format, KnobGeometry, KnobRenderer};
use crate::types::{GesturePhase, IndicatorType, KnobEvents, ValueAttributes, ValueDisplay};
use eframe::egui::{self, Color32, Pos2, Rect};
use std::fmt;

/// Formats a value for its label.
pub type ValueFormatter = Box<dyn Fn(f32) -> String>;

/// A rotary dial holding a bounded value.
///
/// The knob owns its configuration, its current value, the drag tracker and
/// the retained render state. Setters only invalidate the render state; the
/// geometry is rebuilt on the next paint.
pub struct Knob {
    config: KnobConfig,
    value: f32,
    gesture: RotationGesture,
    renderer: KnobRenderer,
    value_formatter: Option<ValueFormatter>,
}

impl fmt::Debug for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Knob")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("gesture", &self.gesture)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl Default for Knob {
    fn default() -> Self {
        Self::new(KnobConfig::default())
    }
}

impl Knob {
    /// Creates a knob at its minimum value.
    pub fn new(config: KnobConfig) -> Self {
        let config = config.sanitized();
        let mut knob = Self {
            value: config.minimum_value,
            config,
            gesture: RotationGesture::new(),
            renderer: KnobRenderer::new(),
            value_formatter: None,
        };
        knob.sync_indicator();
        knob
    }

    /// Current configuration.
    pub fn config(&self) -> &KnobConfig {
        &self.config
    }

    /// Replaces the whole configuration in one batch.
    ///
    /// The value is re-clamped into the new range and the geometry is rebuilt
    /// once, on the next paint.
    pub fn apply_config(&mut self, config: KnobConfig) {
        self.config = config.sanitized();
        self.renderer.invalidate();
        self.set_value(self.value, false);
    }

    /// Current value, always within `[minimum_value, maximum_value]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the value programmatically, clamping it into range, and rotates
    /// the indicator to match.
    pub fn set_value(&mut self, value: f32, animated: bool) {
        self.value = self.config.value_range().clamp(value);
        let angle = mapping::value_to_angle(
            self.value,
            self.config.angle_range(),
            self.config.value_range(),
        );
        self.renderer.set_indicator_angle(angle, animated);
    }

    fn sync_indicator(&mut self) {
        self.set_value(self.value, false);
    }

    /// Runs one step of the gesture state machine with the delta angle swept
    /// since the previous sample.
    ///
    /// `Began`/`Changed` move the value and notify only in continuous mode.
    /// `Ended`/`Cancelled` snap to the nearest graduation when aligned and
    /// always notify, so continuous mode reports the final value twice.
    pub fn handle_gesture(&mut self, phase: GesturePhase, delta_angle: f32) -> KnobEvents {
        let mut events = KnobEvents::default();
        let new_value = mapping::angle_to_value(
            delta_angle,
            self.value,
            self.config.angle_range(),
            self.config.value_range(),
        );
        if new_value == self.value && phase == GesturePhase::Changed {
            return events;
        }

        if self.config.is_enable_feedback {
            if let Some(quantum) = self.config.graduation_quantum() {
                events.feedback = mapping::crosses_graduation(self.value, new_value, quantum);
            }
        }

        if phase.is_terminal() {
            if self.config.is_graduations_aligned {
                if let Some(quantum) = self.config.graduation_quantum() {
                    let target = mapping::snap_to_quantum(self.value, quantum);
                    log::debug!("snapping knob value {} to {}", self.value, target);
                    self.set_value(target, true);
                }
            }
            events.value_changed = true;
        } else {
            self.set_value(new_value, false);
            events.value_changed = self.config.is_continuous;
        }

        if events.value_changed {
            log::debug!("knob value changed to {} ({phase:?})", self.value);
        }
        events
    }

    /// Starts a drag at `point` around `center`.
    pub fn begin_drag(&mut self, point: Pos2, center: Pos2) {
        self.gesture.begin(point, center);
    }

    /// Feeds a drag sample and runs the state machine for `phase`.
    pub fn drag_to(&mut self, phase: GesturePhase, point: Pos2, center: Pos2) -> KnobEvents {
        let delta = self.gesture.move_to(point, center);
        self.handle_gesture(phase, delta)
    }

    /// Keeps the drag anchored to `point` without changing the value.
    pub fn follow_drag(&mut self, point: Pos2, center: Pos2) {
        self.gesture.follow(point, center);
    }

    /// Finishes the active drag (lift or cancel) with the last reported delta.
    pub fn end_drag(&mut self, phase: GesturePhase) -> KnobEvents {
        let events = self.handle_gesture(phase, self.gesture.delta_angle());
        self.gesture.end();
        events
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_active()
    }

    /// Target angle of the indicator.
    pub fn indicator_angle(&self) -> f32 {
        self.renderer.indicator_angle()
    }

    /// Formats `value` with the custom formatter, or one decimal by default.
    pub fn format_value(&self, value: f32) -> String {
        match &self.value_formatter {
            Some(formatter) => formatter(value),
            None => default_value_format(value),
        }
    }

    /// Lays the knob out in `bounds` and paints it at time `now`.
    ///
    /// Returns `true` while the indicator is still animating.
    pub fn paint(&mut self, painter: &egui::Painter, bounds: Rect, now: f64) -> bool {
        self.renderer.update_bounds(bounds);
        let Self { config, renderer, value_formatter, .. } = self;
        match value_formatter {
            Some(formatter) => renderer.paint(painter, config, &**formatter, now),
            None => renderer.paint(painter, config, &default_value_format, now),
        }
    }

    /// Builds a fresh geometry for `bounds` without touching the cached one.
    pub fn geometry_in(&self, bounds: Rect) -> KnobGeometry {
        let formatter = |value: f32| self.format_value(value);
        KnobGeometry::build(&self.config, bounds, &formatter)
    }

    fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    // Range

    /// Sets the value at the start angle; the current value is re-clamped.
    pub fn set_minimum_value(&mut self, minimum_value: f32) {
        self.config.minimum_value = minimum_value;
        self.invalidate();
        self.sync_indicator();
    }

    /// Sets the value at the end angle; the current value is re-clamped.
    pub fn set_maximum_value(&mut self, maximum_value: f32) {
        self.config.maximum_value = maximum_value;
        self.invalidate();
        self.sync_indicator();
    }

    /// Sets the angle of the minimum value, in radians.
    pub fn set_start_angle(&mut self, start_angle: f32) {
        self.config.start_angle = start_angle;
        self.invalidate();
        self.sync_indicator();
    }

    /// Sets the angle of the maximum value, in radians.
    pub fn set_end_angle(&mut self, end_angle: f32) {
        self.config.end_angle = end_angle;
        self.invalidate();
        self.sync_indicator();
    }

    // Behaviour

    /// Enables haptic feedback requests on graduation crossings.
    pub fn set_enable_feedback(&mut self, enabled: bool) {
        self.config.is_enable_feedback = enabled;
    }

    /// Enables snapping to graduations when a drag ends.
    pub fn set_graduations_aligned(&mut self, aligned: bool) {
        self.config.is_graduations_aligned = aligned;
    }

    /// Enables notifications on every drag sample.
    pub fn set_continuous(&mut self, continuous: bool) {
        self.config.is_continuous = continuous;
    }

    // Graduations

    /// Sets the number of minor graduations, clamped into `[0, 360]`.
    pub fn set_graduations(&mut self, count: i32) {
        self.config.graduations = clamp_graduations(count);
        self.invalidate();
    }

    /// Sets the number of large graduations, clamped into `[0, 360]`.
    pub fn set_large_graduations(&mut self, count: i32) {
        self.config.large_graduations = clamp_graduations(count);
        self.invalidate();
    }

    /// Sets the minor graduation tick length, width and color.
    pub fn set_graduation_style(&mut self, length: f32, width: f32, color: Color32) {
        self.config.graduation_length = length;
        self.config.graduation_width = width;
        self.config.graduation_color = color;
        self.invalidate();
    }

    /// Sets the large graduation tick length, width and color.
    pub fn set_large_graduation_style(&mut self, length: f32, width: f32, color: Color32) {
        self.config.large_graduation_length = length;
        self.config.large_graduation_width = width;
        self.config.large_graduation_color = color;
        self.invalidate();
    }

    // Track and indicator

    /// Sets the track arc color.
    pub fn set_track_color(&mut self, color: Color32) {
        self.config.track_color = color;
        self.invalidate();
    }

    /// Sets the track arc stroke width.
    pub fn set_line_width(&mut self, line_width: f32) {
        self.config.line_width = line_width;
        self.invalidate();
    }

    /// Sets the indicator shape.
    pub fn set_indicator_type(&mut self, indicator_type: IndicatorType) {
        self.config.indicator_type = indicator_type;
        self.invalidate();
    }

    // Labels

    /// Chooses which graduations get a value label.
    pub fn set_value_display(&mut self, value_display: ValueDisplay) {
        self.config.value_display = value_display;
        self.invalidate();
    }

    /// Installs a custom label formatter.
    pub fn set_value_formatter(&mut self, formatter: impl Fn(f32) -> String + 'static) {
        self.value_formatter = Some(Box::new(formatter));
        self.invalidate();
    }

    /// Sets the label text styling.
    pub fn set_value_attributes(&mut self, attributes: ValueAttributes) {
        self.config.value_attributes = attributes;
        self.invalidate();
    }

    /// Sets the gap between large graduations and labels.
    pub fn set_value_margin(&mut self, margin: f32) {
        self.config.value_margin = margin;
        self.invalidate();
    }
}
