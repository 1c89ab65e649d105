// SPDX-License-Identifier: GPL-3.0-only

//! Draggable, resizable text overlay
//!
//! The label the user drags and pinches over the captured photo. Position
//! and size live in on-screen (view) coordinates; the export compositor
//! maps them to native image coordinates. Pan and pinch follow the
//! gesture model of the original screen: the gesture start captures a base
//! value and every update is relative to it, so a pinch scales linearly
//! rather than compounding per event.

pub mod font;

use crate::compositor::export::LabelFrame;
use crate::constants::{MAX_FONT_SCALE, MIN_FONT_SCALE};
use image::{Rgba, RgbaImage};

/// Label background (the original used a solid blue label)
const LABEL_BACKGROUND: Rgba<u8> = Rgba([30, 60, 200, 255]);
/// Label text color
const LABEL_FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The on-screen text label state
#[derive(Debug, Clone)]
pub struct TextOverlay {
    text: String,
    /// Top-left corner in view coordinates
    origin: (f32, f32),
    /// Pixels per font unit
    font_scale: f32,
    hidden: bool,
    /// Origin captured when a pan began
    pan_base: Option<(f32, f32)>,
    /// Font scale captured when a pinch began
    pinch_base: Option<f32>,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, font_scale: f32) -> Self {
        Self {
            text: text.into(),
            origin: (0.0, 0.0),
            font_scale: font_scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE),
            hidden: true,
            pan_base: None,
            pinch_base: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    /// Whole-pixel scale used for both layout and rasterization
    fn pixel_scale(&self) -> u32 {
        self.font_scale.round().max(1.0) as u32
    }

    /// On-screen size, derived from the text and font scale
    pub fn size(&self) -> (f32, f32) {
        let (w, h) = font::measure(&self.text);
        let scale = self.pixel_scale() as f32;
        (w as f32 * scale, h as f32 * scale)
    }

    /// On-screen bounds for the export compositor
    pub fn frame(&self) -> LabelFrame {
        let (w, h) = self.size();
        LabelFrame::new(self.origin.0, self.origin.1, w, h)
    }

    /// Center the label in a view of the given size
    pub fn center_in(&mut self, view_width: f32, view_height: f32) {
        let (w, h) = self.size();
        self.origin = ((view_width - w) / 2.0, (view_height - h) / 2.0);
    }

    /// Show or hide the label; showing re-centers it
    pub fn toggle(&mut self, view_width: f32, view_height: f32) {
        self.hidden = !self.hidden;
        self.center_in(view_width, view_height);
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Start of a pan gesture: remember where the label was
    pub fn begin_pan(&mut self) {
        self.pan_base = Some(self.origin);
    }

    /// Pan update with the translation since the gesture began
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let base = self.pan_base.unwrap_or(self.origin);
        self.origin = (base.0 + dx, base.1 + dy);
    }

    /// End of a pan gesture
    pub fn end_pan(&mut self) {
        self.pan_base = None;
    }

    /// Start of a pinch gesture: remember the font scale
    pub fn begin_pinch(&mut self) {
        self.pinch_base = Some(self.font_scale);
    }

    /// Pinch update with the cumulative gesture scale factor
    ///
    /// Scales relative to the gesture-start value so repeated updates stay
    /// linear instead of exponential.
    pub fn pinch(&mut self, factor: f32) {
        let base = self.pinch_base.unwrap_or(self.font_scale);
        self.font_scale = (base * factor).clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
    }

    /// End of a pinch gesture
    pub fn end_pinch(&mut self) {
        self.pinch_base = None;
    }

    /// Rasterize the label at its current on-screen bounds
    ///
    /// Solid background with the text drawn in scaled font-unit blocks.
    pub fn rasterize(&self) -> RgbaImage {
        let scale = self.pixel_scale();
        let (unit_w, unit_h) = font::measure(&self.text);
        let mut img =
            RgbaImage::from_pixel(unit_w * scale, unit_h * scale, LABEL_BACKGROUND);

        for (i, c) in self.text.chars().enumerate() {
            let Some(rows) = font::glyph(c) else {
                continue;
            };
            let cell_x = i as u32 * font::CELL_WIDTH + 1;
            for row in 0..font::GLYPH_HEIGHT {
                for col in 0..font::GLYPH_WIDTH {
                    if !font::glyph_bit(&rows, row, col) {
                        continue;
                    }
                    // Glyphs sit one padding row below the cell top
                    let px = (cell_x + col) * scale;
                    let py = (row + 1) * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            img.put_pixel(px + dx, py + dy, LABEL_FOREGROUND);
                        }
                    }
                }
            }
        }

        img
    }
}
