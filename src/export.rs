//! Export utilities: render a knob to SVG and PNG.
//!
//! Notes:
//! - SVG export is supported on all targets.
//! - PNG export rasterizes the SVG with resvg and is native only.

use crate::knob::Knob;
use crate::renderer::{IndicatorShape, KnobGeometry};
use eframe::egui::{self, Color32, Pos2, Rect, Stroke};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors raised while exporting a knob image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The generated SVG could not be parsed back
    #[error("failed to parse SVG for PNG export: {0}")]
    Svg(String),
    /// The requested image size is empty or too large
    #[error("failed to create pixmap {0}x{1}")]
    Pixmap(u32, u32),
    /// Writing the image failed
    #[error("failed to write image: {0}")]
    Write(String),
}

/// Options controlling knob export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Side length of the dial, in SVG units
    pub size: f32,
    /// Empty space around the dial
    pub margin_px: f32,
    /// Whether to fill the background
    pub include_background: bool,
    /// Background fill color
    pub background_color: Color32,
    /// Raster scale factor for PNG export
    pub png_scale: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            size: crate::constants::DEFAULT_KNOB_SIZE,
            margin_px: 16.0,
            include_background: true,
            background_color: Color32::WHITE,
            png_scale: 2.0,
        }
    }
}

impl ExportOptions {
    /// Output width and height in SVG units.
    pub fn canvas_size(&self) -> u32 {
        (self.size + 2.0 * self.margin_px.max(0.0)).ceil().max(1.0) as u32
    }
}

/// Builds an SVG document of `knob` with the indicator at its target angle.
pub fn build_svg(knob: &Knob, options: &ExportOptions) -> String {
    let margin = options.margin_px.max(0.0);
    let bounds = Rect::from_min_size(
        Pos2::new(margin, margin),
        egui::vec2(options.size, options.size),
    );
    let geometry = knob.geometry_in(bounds);
    svg_from_geometry(&geometry, knob.indicator_angle(), options)
}

fn svg_from_geometry(geometry: &KnobGeometry, angle: f32, options: &ExportOptions) -> String {
    let side = options.canvas_size();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{side}\" height=\"{side}\" viewBox=\"0 0 {side} {side}\">"
    );

    if options.include_background {
        let _ = writeln!(
            out,
            "<rect x=\"0\" y=\"0\" width=\"{side}\" height=\"{side}\" {} />",
            paint_attrs("fill", options.background_color)
        );
    }

    for layer in [&geometry.graduations, &geometry.large_graduations]
        .into_iter()
        .flatten()
    {
        let mut d = String::new();
        for [from, to] in &layer.segments {
            let _ = write!(d, "M{:.2},{:.2} L{:.2},{:.2} ", from.x, from.y, to.x, to.y);
        }
        let _ = writeln!(
            out,
            "<path d=\"{}\" fill=\"none\" {} />",
            d.trim_end(),
            stroke_attrs(layer.stroke)
        );
    }

    let points = geometry
        .track
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        "<polyline points=\"{points}\" fill=\"none\" {} />",
        stroke_attrs(geometry.track_stroke)
    );

    let center = geometry.bounds.center();
    match geometry.indicator_at(angle) {
        IndicatorShape::Line { points, stroke, round_cap } => {
            let from = center + points[0];
            let to = center + points[1];
            let cap = if round_cap { "round" } else { "butt" };
            let _ = writeln!(
                out,
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke-linecap=\"{cap}\" {} />",
                from.x,
                from.y,
                to.x,
                to.y,
                stroke_attrs(stroke)
            );
        }
        IndicatorShape::Dot { offset, radius, color } => {
            let c = center + offset;
            let _ = writeln!(
                out,
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" {} />",
                c.x,
                c.y,
                paint_attrs("fill", color)
            );
        }
    }

    let attributes = geometry.label_attributes;
    for label in &geometry.labels {
        let _ = writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" {}>{}</text>",
            label.pos.x,
            label.pos.y,
            attributes.font_size,
            paint_attrs("fill", attributes.color),
            escape_xml(&label.text)
        );
    }

    out.push_str("</svg>\n");
    out
}

fn paint_attrs(kind: &str, color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    format!(
        "{kind}=\"#{r:02x}{g:02x}{b:02x}\" {kind}-opacity=\"{}\"",
        a as f32 / 255.0
    )
}

fn stroke_attrs(stroke: Stroke) -> String {
    format!("{} stroke-width=\"{}\"", paint_attrs("stroke", stroke.color), stroke.width)
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

/// Rasterizes the knob's SVG into a pixmap scaled by `options.png_scale`.
#[cfg(not(target_arch = "wasm32"))]
pub fn render_png(knob: &Knob, options: &ExportOptions) -> Result<tiny_skia::Pixmap, ExportError> {
    use std::sync::Arc;

    let svg = build_svg(knob, options);

    let mut opt = usvg::Options::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    opt.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let scale = options.png_scale.clamp(0.25, 8.0);
    let out = ((options.canvas_size() as f32) * scale).round().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(out, out).ok_or(ExportError::Pixmap(out, out))?;

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Renders the knob to PNG bytes.
#[cfg(not(target_arch = "wasm32"))]
pub fn encode_png(knob: &Knob, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    render_png(knob, options)?
        .encode_png()
        .map_err(|e| ExportError::Write(e.to_string()))
}
