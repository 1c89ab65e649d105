// SPDX-License-Identifier: GPL-3.0-only

//! Image orientation metadata and flattening
//!
//! A photo carries its pixels plus an orientation tag; flips and rotations
//! only touch the tag. [`flattened`] bakes the tag into the pixels, which
//! must happen before any byte-level encode so the saved file matches what
//! the screen showed.

use image::RgbaImage;
use image::imageops;

/// Orientation metadata relative to the stored pixel rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Pixels are already upright
    #[default]
    Up,
    /// Upright, mirrored horizontally
    UpMirrored,
    /// Rotated 180 degrees
    Down,
    /// Rotated 180 degrees and mirrored
    DownMirrored,
    /// Rotated 90 degrees counter-clockwise
    Left,
    /// Rotated 90 degrees counter-clockwise and mirrored
    LeftMirrored,
    /// Rotated 90 degrees clockwise
    Right,
    /// Rotated 90 degrees clockwise and mirrored
    RightMirrored,
}

impl Orientation {
    /// Orientation after a horizontal flip of the displayed image
    pub fn flipped_horizontally(self) -> Self {
        match self {
            Orientation::Up => Orientation::UpMirrored,
            Orientation::UpMirrored => Orientation::Up,
            Orientation::Down => Orientation::DownMirrored,
            Orientation::DownMirrored => Orientation::Down,
            Orientation::Left => Orientation::LeftMirrored,
            Orientation::LeftMirrored => Orientation::Left,
            Orientation::Right => Orientation::RightMirrored,
            Orientation::RightMirrored => Orientation::Right,
        }
    }

    /// Whether flattening is a no-op
    pub fn is_upright(self) -> bool {
        self == Orientation::Up
    }
}

/// Redraw `pixels` upright according to `orientation`
///
/// Pure function: `Up` returns the pixels unchanged (cloned), every other
/// tag applies the corresponding flip/rotation. The result always carries
/// an implicit `Up` tag.
pub fn flattened(pixels: &RgbaImage, orientation: Orientation) -> RgbaImage {
    match orientation {
        Orientation::Up => pixels.clone(),
        Orientation::UpMirrored => imageops::flip_horizontal(pixels),
        Orientation::Down => imageops::rotate180(pixels),
        Orientation::DownMirrored => imageops::flip_vertical(pixels),
        Orientation::Left => imageops::rotate90(pixels),
        Orientation::LeftMirrored => imageops::flip_horizontal(&imageops::rotate90(pixels)),
        Orientation::Right => imageops::rotate270(pixels),
        Orientation::RightMirrored => imageops::flip_horizontal(&imageops::rotate270(pixels)),
    }
}
