//! Demo application showing one knob and its settings.
//!
//! # Module Organization
//!
//! - `state` - The `KnobDemoApp` struct, persisted settings and demo defaults
//! - `export` - Save dialogs for SVG/PNG export

mod export;
mod state;

pub use state::KnobDemoApp;

use self::state::{ExportFormat, APP_STATE_KEY};
use crate::config::KnobConfig;
use crate::types::{IndicatorType, ValueDisplay};
use crate::widget::KnobWidget;
use eframe::egui;

impl eframe::App for KnobDemoApp {
    /// Persist settings and the current value between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.saved_value = self.knob.value();
        match self.to_json() {
            Ok(json) => {
                storage.set_string(APP_STATE_KEY, json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_exports(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("settings")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_settings(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_knob_panel(ui);
        });
    }
}

impl KnobDemoApp {
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Export SVG…").clicked() {
                self.pending_export = Some(ExportFormat::Svg);
            }
            if ui.button("Export PNG…").clicked() {
                self.pending_export = Some(ExportFormat::Png);
            }
            ui.separator();
            if ui.button("Reset").clicked() {
                self.reset();
            }
            ui.checkbox(&mut self.dark_mode, "Dark mode");
            if let Some(status) = &self.status {
                ui.separator();
                ui.label(status);
            }
        });
    }

    /// Draws the knob, its readout and the notification counters.
    pub fn draw_knob_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let shown = KnobWidget::new(&mut self.knob).show(ui);
            if shown.events.feedback {
                self.feedback_ticks += 1;
            }
            if shown.response.changed() {
                self.notifications += 1;
                self.last_notified = Some(self.knob.value());
                log::info!("value: {}", self.knob.value());
            }

            ui.add_space(8.0);
            ui.heading(self.knob.format_value(self.knob.value()));
            ui.label(format!(
                "{} notifications, {} graduation ticks",
                self.notifications, self.feedback_ticks
            ));
            if let Some(value) = self.last_notified {
                ui.label(format!("last notified value: {value:.2}"));
            }
        });
    }

    /// Draws the settings panel and applies any edits as one batch.
    pub fn draw_settings(&mut self, ui: &mut egui::Ui) {
        let mut config = self.config.clone();

        ui.heading("Range");
        egui::Grid::new("range").num_columns(2).show(ui, |ui| {
            ui.label("Minimum");
            ui.add(egui::DragValue::new(&mut config.minimum_value).speed(1.0));
            ui.end_row();
            ui.label("Maximum");
            ui.add(egui::DragValue::new(&mut config.maximum_value).speed(1.0));
            ui.end_row();
            ui.label("Start angle");
            ui.drag_angle(&mut config.start_angle);
            ui.end_row();
            ui.label("End angle");
            ui.drag_angle(&mut config.end_angle);
            ui.end_row();
        });

        ui.separator();
        ui.heading("Behaviour");
        ui.checkbox(&mut config.is_enable_feedback, "Graduation feedback");
        ui.checkbox(&mut config.is_graduations_aligned, "Snap to graduations");
        ui.checkbox(&mut config.is_continuous, "Continuous notifications");

        ui.separator();
        ui.heading("Graduations");
        egui::Grid::new("graduations").num_columns(2).show(ui, |ui| {
            ui.label("Graduations");
            ui.add(
                egui::DragValue::new(&mut config.graduations)
                    .range(0..=crate::constants::MAX_GRADUATIONS),
            );
            ui.end_row();
            ui.label("Large graduations");
            ui.add(
                egui::DragValue::new(&mut config.large_graduations)
                    .range(0..=crate::constants::MAX_GRADUATIONS),
            );
            ui.end_row();
            ui.label("Line width");
            ui.add(egui::Slider::new(&mut config.line_width, 0.5..=10.0));
            ui.end_row();
            ui.label("Track color");
            ui.color_edit_button_srgba(&mut config.track_color);
            ui.end_row();
        });

        ui.separator();
        ui.heading("Indicator");
        draw_indicator_settings(ui, &mut config);

        ui.separator();
        ui.heading("Labels");
        egui::ComboBox::from_id_salt("value_display")
            .selected_text(value_display_name(config.value_display))
            .show_ui(ui, |ui| {
                for option in [
                    ValueDisplay::None,
                    ValueDisplay::ForGraduation,
                    ValueDisplay::ForLargeGraduation,
                ] {
                    ui.selectable_value(&mut config.value_display, option, value_display_name(option));
                }
            });
        ui.add(egui::Slider::new(&mut config.value_margin, 0.0..=60.0).text("Margin"));
        ui.add(egui::Slider::new(&mut config.value_attributes.font_size, 6.0..=32.0).text("Font size"));

        ui.separator();
        ui.heading("Export");
        ui.add(egui::Slider::new(&mut self.export_options.png_scale, 0.25..=8.0).text("PNG scale"));
        ui.checkbox(&mut self.export_options.include_background, "Background");

        self.apply_settings(config);
    }
}

fn draw_indicator_settings(ui: &mut egui::Ui, config: &mut KnobConfig) {
    let current = indicator_name(&config.indicator_type);
    egui::ComboBox::from_id_salt("indicator_type")
        .selected_text(current)
        .show_ui(ui, |ui| {
            let color = indicator_color(&config.indicator_type);
            let options = [
                IndicatorType::Pointer { color, length: 100.0, width: 4.0 },
                IndicatorType::Graduation { color, length: 12.0, width: 3.0 },
                IndicatorType::Circle { color, radius: 12.0 },
            ];
            for option in options {
                let name = indicator_name(&option);
                if ui.selectable_label(name == current, name).clicked() && name != current {
                    config.indicator_type = option;
                }
            }
        });

    match &mut config.indicator_type {
        IndicatorType::Pointer { color, length, width }
        | IndicatorType::Graduation { color, length, width } => {
            ui.add(egui::Slider::new(length, 1.0..=150.0).text("Length"));
            ui.add(egui::Slider::new(width, 0.5..=12.0).text("Width"));
            ui.color_edit_button_srgba(color);
        }
        IndicatorType::Circle { color, radius } => {
            ui.add(egui::Slider::new(radius, 1.0..=40.0).text("Radius"));
            ui.color_edit_button_srgba(color);
        }
    }
}

fn indicator_name(indicator: &IndicatorType) -> &'static str {
    match indicator {
        IndicatorType::Pointer { .. } => "Pointer",
        IndicatorType::Graduation { .. } => "Graduation",
        IndicatorType::Circle { .. } => "Circle",
    }
}

fn indicator_color(indicator: &IndicatorType) -> egui::Color32 {
    match *indicator {
        IndicatorType::Pointer { color, .. }
        | IndicatorType::Graduation { color, .. }
        | IndicatorType::Circle { color, .. } => color,
    }
}

fn value_display_name(display: ValueDisplay) -> &'static str {
    match display {
        ValueDisplay::None => "None",
        ValueDisplay::ForGraduation => "Every graduation",
        ValueDisplay::ForLargeGraduation => "Large graduations",
    }
}

#[cfg(test)]
mod tests;
