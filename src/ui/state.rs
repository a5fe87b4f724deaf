//! Demo application state.
//!
//! Tracks the knob being shown, its persisted settings, change counters, and
//! the channel that export dialogs report back through.

use crate::config::KnobConfig;
use crate::export::ExportOptions;
use crate::knob::Knob;
use crate::types::IndicatorType;
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Storage key the app state is persisted under.
pub const APP_STATE_KEY: &str = "app_state";

/// Export format requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Vector image
    Svg,
    /// Raster image
    Png,
}

/// Messages sent from async export tasks back to the app.
#[derive(Debug)]
pub enum ExportResult {
    /// The file was written to the given path
    Saved(String),
    /// The user closed the dialog
    Cancelled,
    /// Export or writing failed
    Failed(String),
}

/// Configuration of the demo knob: 0 to 260 over a 270° sweep.
pub fn demo_config() -> KnobConfig {
    KnobConfig {
        minimum_value: 0.0,
        maximum_value: 260.0,
        start_angle: -PI * 5.0 / 4.0,
        end_angle: PI / 4.0,
        graduations: 26,
        large_graduations: 13,
        value_attributes: crate::types::ValueAttributes {
            color: Color32::BLACK,
            font_size: 16.0,
        },
        indicator_type: IndicatorType::Pointer {
            color: Color32::RED,
            length: 100.0,
            width: 4.0,
        },
        ..KnobConfig::default()
    }
}

/// Builds a knob for `config` with whole-number labels.
pub fn demo_knob(config: KnobConfig) -> Knob {
    let mut knob = Knob::new(config);
    knob.set_value_formatter(|value| format!("{}", value as i32));
    knob
}

/// The demo application: one knob plus a settings panel.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct KnobDemoApp {
    /// Knob settings, persisted between runs
    pub config: KnobConfig,
    /// Value restored on start
    pub saved_value: f32,
    /// Export settings
    pub export_options: ExportOptions,
    /// Whether to use dark visuals around the dial
    pub dark_mode: bool,
    /// The knob being shown
    #[serde(skip)]
    pub knob: Knob,
    /// Number of value-changed notifications seen
    #[serde(skip)]
    pub notifications: u32,
    /// Number of haptic feedback requests seen
    #[serde(skip)]
    pub feedback_ticks: u32,
    /// Value carried by the last notification
    #[serde(skip)]
    pub last_notified: Option<f32>,
    /// Status line shown under the toolbar
    #[serde(skip)]
    pub status: Option<String>,
    /// Export requested this frame
    #[serde(skip)]
    pub pending_export: Option<ExportFormat>,
    /// Channel for receiving export results from async contexts
    #[serde(skip)]
    pub export_sender: Option<Sender<ExportResult>>,
    /// Receiving end of the export channel
    #[serde(skip)]
    pub export_receiver: Option<Receiver<ExportResult>>,
}

impl Default for KnobDemoApp {
    fn default() -> Self {
        let (sender, receiver) = channel();
        let config = demo_config();
        Self {
            knob: demo_knob(config.clone()),
            config,
            saved_value: 0.0,
            export_options: ExportOptions::default(),
            dark_mode: false,
            notifications: 0,
            feedback_ticks: 0,
            last_notified: None,
            status: None,
            pending_export: None,
            export_sender: Some(sender),
            export_receiver: Some(receiver),
        }
    }
}

impl KnobDemoApp {
    /// Creates the app, restoring persisted state when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let restored = cc
            .storage
            .and_then(|storage| storage.get_string(APP_STATE_KEY))
            .and_then(|json| match Self::from_json(&json) {
                Ok(app) => Some(app),
                Err(err) => {
                    log::warn!("ignoring saved app state: {err}");
                    None
                }
            });
        restored.unwrap_or_default()
    }

    /// Serializes the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON and rebuilds the knob from it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let app: Self = serde_json::from_str(json)?;
        Ok(app.restored())
    }

    fn restored(mut self) -> Self {
        self.config = self.config.sanitized();
        self.knob = demo_knob(self.config.clone());
        self.knob.set_value(self.saved_value, false);
        self.saved_value = self.knob.value();
        self
    }

    /// Applies edited settings to the knob in one batch.
    pub fn apply_settings(&mut self, config: KnobConfig) {
        if config == self.config {
            return;
        }
        log::info!("applying knob settings");
        self.knob.apply_config(config.clone());
        self.config = self.knob.config().clone();
        self.saved_value = self.knob.value();
    }

    /// Restores the demo settings and moves the knob back to its minimum.
    pub fn reset(&mut self) {
        self.apply_settings(demo_config());
        self.knob.set_value(self.config.minimum_value, true);
        self.saved_value = self.knob.value();
        self.notifications = 0;
        self.feedback_ticks = 0;
        self.last_notified = None;
    }
}
