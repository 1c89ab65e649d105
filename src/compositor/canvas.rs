// SPDX-License-Identifier: GPL-3.0-only

//! 2D compositing canvas
//!
//! The begin-canvas / draw-image / snapshot cycle of the platform canvas
//! service, implemented over the `image` crate. Drawing resizes the source
//! into the destination rect and alpha-composites it over whatever the
//! canvas already holds.

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Destination rectangle in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An in-progress composite
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Begin a transparent canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// The rect covering the whole canvas
    pub fn full_bounds(&self) -> Rect {
        Rect::new(0, 0, self.image.width(), self.image.height())
    }

    /// Draw `src` into `rect`, scaling when sizes differ
    pub fn draw_image(&mut self, src: &RgbaImage, rect: Rect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }

        if src.dimensions() == (rect.width, rect.height) {
            imageops::overlay(&mut self.image, src, rect.x, rect.y);
        } else {
            let scaled = imageops::resize(src, rect.width, rect.height, FilterType::Triangle);
            imageops::overlay(&mut self.image, &scaled, rect.x, rect.y);
        }
    }

    /// Snapshot the canvas as the final image
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_draw_full_bounds_replaces_opaque() {
        let mut canvas = Canvas::new(4, 4);
        let bounds = canvas.full_bounds();
        canvas.draw_image(&solid(4, 4, [10, 20, 30, 255]), bounds);
        canvas.draw_image(&solid(4, 4, [200, 0, 0, 255]), bounds);

        let out = canvas.into_image();
        assert_eq!(out.get_pixel(2, 2).0, [200, 0, 0, 255]);
    }

    #[test]
    fn test_transparent_overlay_keeps_base() {
        let mut canvas = Canvas::new(2, 2);
        let bounds = canvas.full_bounds();
        canvas.draw_image(&solid(2, 2, [10, 20, 30, 255]), bounds);
        canvas.draw_image(&solid(2, 2, [255, 255, 255, 0]), bounds);

        let out = canvas.into_image();
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_draw_scales_to_rect() {
        let mut canvas = Canvas::new(8, 8);
        // 1x1 source stretched over the full canvas
        canvas.draw_image(&solid(1, 1, [0, 255, 0, 255]), Rect::new(0, 0, 8, 8));

        let out = canvas.into_image();
        assert_eq!(out.get_pixel(7, 7).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_draw_at_offset() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_image(&solid(2, 2, [9, 9, 9, 255]), Rect::new(2, 2, 2, 2));

        let out = canvas.into_image();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(out.get_pixel(3, 3).0, [9, 9, 9, 255]);
    }
}
