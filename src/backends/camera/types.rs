// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way the selected camera faces
///
/// On hardware without an explicit facing notion this maps onto the
/// enumerated device list: the first device is treated as the back camera,
/// the second (when present) as the front camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraFacing {
    /// Rear camera (first enumerated device)
    #[default]
    Back,
    /// Front/selfie camera (second enumerated device)
    Front,
}

impl CameraFacing {
    /// The opposite facing
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }

    /// Position in the enumerated device list for this facing
    pub fn device_index(self) -> usize {
        match self {
            CameraFacing::Back => 0,
            CameraFacing::Front => 1,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
        }
    }
}

/// An enumerated camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable device name (e.g., the V4L2 card name)
    pub name: String,
    /// Device path (e.g., /dev/video0)
    pub path: String,
}

/// Pixel layout of raw frame data coming from a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    Rgba,
    /// 8-bit RGB, 3 bytes per pixel
    Rgb24,
    /// Packed 4:2:2 YUV, 4 bytes per 2 pixels
    Yuyv,
}

/// A single frame from a camera backend
///
/// Frame data is stored RGBA-converted or raw depending on the producing
/// backend; `to_rgba` normalizes either into an [`image::RgbaImage`].
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel bytes, layout per `format`
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Bytes per row
    pub stride: u32,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build an RGBA frame from an owned byte buffer
    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::Rgba,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Sample one pixel as RGB, clamping out-of-range coordinates
    pub fn sample_rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let data: &[u8] = &self.data;

        match self.format {
            PixelFormat::Rgba => {
                let idx = (y * self.stride + x * 4) as usize;
                if idx + 2 < data.len() {
                    (data[idx], data[idx + 1], data[idx + 2])
                } else {
                    (0, 0, 0)
                }
            }
            PixelFormat::Rgb24 => {
                let idx = (y * self.stride + x * 3) as usize;
                if idx + 2 < data.len() {
                    (data[idx], data[idx + 1], data[idx + 2])
                } else {
                    (0, 0, 0)
                }
            }
            PixelFormat::Yuyv => {
                // Packed 4:2:2: two pixels share chroma, Y0 U Y1 V
                let pair_x = (x & !1) as usize;
                let base = (y as usize) * (self.stride as usize) + pair_x * 2;
                if base + 3 >= data.len() {
                    return (0, 0, 0);
                }
                let luma = if x & 1 == 0 { data[base] } else { data[base + 2] };
                yuv_to_rgb(luma, data[base + 1], data[base + 3])
            }
        }
    }

    /// Convert the frame into an RGBA image regardless of source format
    pub fn to_rgba(&self) -> Option<image::RgbaImage> {
        match self.format {
            PixelFormat::Rgba if self.stride == self.width * 4 => {
                image::RgbaImage::from_raw(self.width, self.height, self.data.to_vec())
            }
            _ => {
                let mut out = image::RgbaImage::new(self.width, self.height);
                for (x, y, pixel) in out.enumerate_pixels_mut() {
                    let (r, g, b) = self.sample_rgb(x, y);
                    *pixel = image::Rgba([r, g, b, 255]);
                }
                Some(out)
            }
        }
    }
}

/// Convert YUV (BT.601) to RGB
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}
