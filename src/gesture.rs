//! Single-finger rotation tracking.
//!
//! Converts drag samples into incremental angles around the knob's center.

use eframe::egui::Pos2;
use std::f32::consts::PI;

/// Angle of `point` around `center`, in `[-π, π]`.
///
/// A point exactly on the center yields `0.0` (`atan2(0, 0)`).
pub fn angle_around(point: Pos2, center: Pos2) -> f32 {
    let offset = point - center;
    offset.y.atan2(offset.x)
}

/// Tracks one drag and reports the angle swept since the previous sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationGesture {
    prev_angle: f32,
    delta_angle: f32,
    active: bool,
}

impl RotationGesture {
    /// Creates an idle gesture tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a drag at `point`.
    pub fn begin(&mut self, point: Pos2, center: Pos2) {
        self.prev_angle = angle_around(point, center);
        self.delta_angle = 0.0;
        self.active = true;
    }

    /// Feeds a move sample and returns the reported delta angle.
    ///
    /// A raw delta outside `[-π, π]` means the finger crossed the atan2 seam;
    /// the sample still advances the reference angle but the previously
    /// reported delta is kept. Very fast swipes can be under-reported this way.
    pub fn move_to(&mut self, point: Pos2, center: Pos2) -> f32 {
        let touch_angle = angle_around(point, center);
        let new_delta = touch_angle - self.prev_angle;
        self.prev_angle = touch_angle;
        if new_delta > PI || new_delta < -PI {
            return self.delta_angle;
        }
        self.delta_angle = new_delta;
        self.delta_angle
    }

    /// Moves the reference angle to `point` without reporting a delta.
    ///
    /// Used while samples are not fed to the knob so the next accepted sample
    /// only covers the rotation made after it.
    pub fn follow(&mut self, point: Pos2, center: Pos2) {
        self.prev_angle = angle_around(point, center);
    }

    /// Finishes the drag and discards the sample state.
    pub fn end(&mut self) {
        self.delta_angle = 0.0;
        self.active = false;
    }

    /// Delta angle reported by the last accepted sample.
    pub fn delta_angle(&self) -> f32 {
        self.delta_angle
    }

    /// Whether a drag is being tracked.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
