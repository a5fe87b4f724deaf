//! Export dialogs for the demo app.
//!
//! The image is built on the UI thread; the save dialog and the file write run
//! on the tokio runtime and report back through the app's channel.

use super::state::{ExportFormat, ExportResult, KnobDemoApp};
use crate::export::build_svg;
use eframe::egui;

impl KnobDemoApp {
    /// Processes finished exports and starts a requested one.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for requesting repaints
    pub fn handle_pending_exports(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = &self.export_receiver {
            while let Ok(result) = receiver.try_recv() {
                self.status = match result {
                    ExportResult::Saved(path) => {
                        log::info!("exported knob to {path}");
                        Some(format!("Saved {path}"))
                    }
                    ExportResult::Cancelled => None,
                    ExportResult::Failed(err) => {
                        log::error!("export failed: {err}");
                        Some(format!("Export failed: {err}"))
                    }
                };
            }
        }

        if let Some(format) = self.pending_export.take() {
            self.start_export(format, ctx);
        }
    }

    fn start_export(&mut self, format: ExportFormat, ctx: &egui::Context) {
        let (bytes, extension, filter) = match format {
            ExportFormat::Svg => (
                build_svg(&self.knob, &self.export_options).into_bytes(),
                "svg",
                "SVG",
            ),
            ExportFormat::Png => match crate::export::encode_png(&self.knob, &self.export_options) {
                Ok(bytes) => (bytes, "png", "PNG"),
                Err(err) => {
                    log::error!("{err}");
                    self.status = Some(err.to_string());
                    return;
                }
            },
        };

        let Some(sender) = self.export_sender.clone() else {
            return;
        };
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let result = match rfd::AsyncFileDialog::new()
                .add_filter(filter, &[extension])
                .set_file_name(format!("knob.{extension}"))
                .save_file()
                .await
            {
                Some(handle) => {
                    let path = handle.path().to_path_buf();
                    match std::fs::write(&path, &bytes) {
                        Ok(()) => ExportResult::Saved(path.display().to_string()),
                        Err(e) => ExportResult::Failed(e.to_string()),
                    }
                }
                None => ExportResult::Cancelled,
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }
}
