// SPDX-License-Identifier: GPL-3.0-only

//! Export compositing: flatten the text label onto the photo
//!
//! The label lives in on-screen coordinates; the photo is exported at its
//! native resolution. Both the label's position and its size are scaled by
//! `native_width / view_width` so relative placement and proportions
//! survive the resolution change.

use super::canvas::{Canvas, Rect};
use image::RgbaImage;
use tracing::debug;

/// On-screen bounds of the label, in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LabelFrame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The frame mapped into native image coordinates
    pub fn scaled(&self, ratio: f32) -> Rect {
        Rect::new(
            (self.x * ratio).round() as i64,
            (self.y * ratio).round() as i64,
            (self.width * ratio).round() as u32,
            (self.height * ratio).round() as u32,
        )
    }
}

/// Draw `label` over `base` at native resolution
///
/// `view_width` is the on-screen width the label frame is relative to.
/// The base is drawn first at full bounds, then the label at its scaled
/// frame. The inputs are not modified.
pub fn export_with_label(
    base: &RgbaImage,
    label: &RgbaImage,
    frame: LabelFrame,
    view_width: f32,
) -> RgbaImage {
    let (width, height) = base.dimensions();
    let mut canvas = Canvas::new(width, height);
    let bounds = canvas.full_bounds();
    canvas.draw_image(base, bounds);

    if view_width > 0.0 {
        let ratio = width as f32 / view_width;
        let dest = frame.scaled(ratio);
        debug!(?dest, ratio, "Placing label on export canvas");
        canvas.draw_image(label, dest);
    }

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_scaled_frame_concrete_case() {
        // W=1000, V=500: everything doubles
        let frame = LabelFrame::new(10.0, 20.0, 100.0, 30.0);
        let dest = frame.scaled(1000.0 / 500.0);
        assert_eq!(dest, Rect::new(20, 40, 200, 60));
    }

    #[test]
    fn test_export_places_label_scaled() {
        let base = RgbaImage::from_pixel(1000, 2000, Rgba([0, 0, 0, 255]));
        let label = RgbaImage::from_pixel(100, 30, Rgba([255, 255, 255, 255]));
        let frame = LabelFrame::new(10.0, 20.0, 100.0, 30.0);

        let out = export_with_label(&base, &label, frame, 500.0);
        assert_eq!(out.dimensions(), (1000, 2000));
        // Inside the scaled label rect (20,40)-(220,100)
        assert_eq!(out.get_pixel(20, 40).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(219, 99).0, [255, 255, 255, 255]);
        // Just outside it
        assert_eq!(out.get_pixel(19, 39).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(220, 100).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_export_at_native_view_width_is_one_to_one() {
        let base = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let label = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let frame = LabelFrame::new(5.0, 5.0, 10.0, 10.0);

        let out = export_with_label(&base, &label, frame, 50.0);
        assert_eq!(out.get_pixel(5, 5).0, [9, 9, 9, 255]);
        assert_eq!(out.get_pixel(14, 14).0, [9, 9, 9, 255]);
        assert_eq!(out.get_pixel(15, 15).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_zero_view_width_skips_label() {
        let base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let label = RgbaImage::from_pixel(5, 5, Rgba([255, 255, 255, 255]));
        let out = export_with_label(&base, &label, LabelFrame::new(0.0, 0.0, 5.0, 5.0), 0.0);
        assert_eq!(out, base);
    }
}
