//! egui integration for [`Knob`].
//!
//! Pointer drags on the knob's square are turned into rotation samples around
//! its center and fed through the knob's gesture state machine. The response
//! is marked changed exactly when the knob fires a value-changed notification.

use crate::constants::DEFAULT_KNOB_SIZE;
use crate::knob::Knob;
use crate::types::{GesturePhase, KnobEvents};
use eframe::egui;

/// Result of showing a [`KnobWidget`].
#[derive(Debug)]
pub struct KnobResponse {
    /// The widget response; `changed()` reports a value-changed notification
    pub response: egui::Response,
    /// Everything the knob requested this frame
    pub events: KnobEvents,
}

/// Draws a [`Knob`] and routes drags to it.
///
/// ```no_run
/// # use rotary_knob::{Knob, KnobWidget};
/// # fn ui(ui: &mut eframe::egui::Ui, knob: &mut Knob) {
/// if ui.add(KnobWidget::new(knob).size(180.0)).changed() {
///     println!("value: {}", knob.value());
/// }
/// # }
/// ```
#[must_use = "add it to a Ui with `ui.add(...)` or call `show`"]
pub struct KnobWidget<'a> {
    knob: &'a mut Knob,
    size: f32,
}

impl<'a> KnobWidget<'a> {
    /// Wraps `knob` with the default size.
    pub fn new(knob: &'a mut Knob) -> Self {
        Self {
            knob,
            size: DEFAULT_KNOB_SIZE,
        }
    }

    /// Side length of the square the knob occupies.
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Shows the knob and reports the events of this frame.
    pub fn show(self, ui: &mut egui::Ui) -> KnobResponse {
        let (rect, mut response) =
            ui.allocate_exact_size(egui::vec2(self.size, self.size), egui::Sense::click_and_drag());
        let center = rect.center();
        let knob = self.knob;
        let mut events = KnobEvents::default();

        let multi_touch = ui.input(|i| i.multi_touch().is_some());
        let pointer = response.interact_pointer_pos();

        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin()).or(pointer);
            if let (Some(origin), Some(pos)) = (origin, pointer) {
                knob.begin_drag(origin, center);
                merge(&mut events, knob.drag_to(GesturePhase::Began, pos, center));
            }
        } else if response.dragged() && knob.is_dragging() {
            if let Some(pos) = pointer {
                if multi_touch {
                    knob.follow_drag(pos, center);
                } else {
                    merge(&mut events, knob.drag_to(GesturePhase::Changed, pos, center));
                }
            }
        }

        if knob.is_dragging() {
            if response.drag_stopped() {
                merge(&mut events, knob.end_drag(GesturePhase::Ended));
            } else if !response.dragged() {
                log::debug!("knob drag interrupted");
                merge(&mut events, knob.end_drag(GesturePhase::Cancelled));
            }
        }

        if events.feedback {
            log::debug!("knob crossed a graduation");
        }
        if events.value_changed {
            response.mark_changed();
        }

        if ui.is_rect_visible(rect) {
            let now = ui.input(|i| i.time);
            if knob.paint(ui.painter(), rect, now) {
                ui.ctx().request_repaint();
            }
        }

        KnobResponse { response, events }
    }
}

fn merge(into: &mut KnobEvents, events: KnobEvents) {
    into.value_changed |= events.value_changed;
    into.feedback |= events.feedback;
}

impl egui::Widget for KnobWidget<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        self.show(ui).response
    }
}
