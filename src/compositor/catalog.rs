// SPDX-License-Identifier: GPL-3.0-only

//! Filter overlay catalog
//!
//! An ordered, fixed-size list of full-frame RGBA overlay images, immutable
//! once built. Overlays are loaded from `filter1.*`/`filter2.*` in a user
//! directory when configured; otherwise two built-in overlays are
//! synthesized so the app works out of the box.

use crate::constants::FILTER_CATALOG_SIZE;
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, warn};

/// Native size for synthesized overlays; they get resized to the base
/// image bounds at composite time anyway.
const BUILTIN_OVERLAY_SIZE: u32 = 512;

/// Fixed ordered list of overlay filter images
pub struct FilterCatalog {
    overlays: Vec<RgbaImage>,
}

impl FilterCatalog {
    /// Catalog from explicit overlay images
    pub fn new(overlays: Vec<RgbaImage>) -> Self {
        Self { overlays }
    }

    /// Catalog with the two built-in synthesized overlays
    pub fn builtin() -> Self {
        Self::new(vec![warm_tint_overlay(), cool_vignette_overlay()])
    }

    /// Load `filter1.*`/`filter2.*` from `dir`, synthesizing any that are
    /// missing or unreadable
    pub fn load_or_builtin(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::builtin();
        };

        let builtin = [warm_tint_overlay as fn() -> RgbaImage, cool_vignette_overlay];
        let overlays = (1..=FILTER_CATALOG_SIZE)
            .zip(builtin)
            .map(|(n, fallback)| {
                load_overlay(dir, n).unwrap_or_else(|| {
                    debug!(n, "Using built-in overlay");
                    fallback()
                })
            })
            .collect();
        Self::new(overlays)
    }

    /// Number of filters in the catalog
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Overlay image at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.overlays.get(index)
    }
}

fn load_overlay(dir: &Path, n: usize) -> Option<RgbaImage> {
    for ext in ["png", "jpg", "jpeg"] {
        let path = dir.join(format!("filter{}.{}", n, ext));
        if !path.exists() {
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                debug!(path = %path.display(), "Loaded filter overlay");
                return Some(img.to_rgba8());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load filter overlay");
            }
        }
    }
    None
}

/// Translucent warm tint over the whole frame
fn warm_tint_overlay() -> RgbaImage {
    RgbaImage::from_pixel(
        BUILTIN_OVERLAY_SIZE,
        BUILTIN_OVERLAY_SIZE,
        Rgba([255, 140, 40, 90]),
    )
}

/// Cool blue tint whose alpha grows toward the frame edges
fn cool_vignette_overlay() -> RgbaImage {
    let size = BUILTIN_OVERLAY_SIZE;
    let center = (size / 2) as f32;
    let max_dist = center * std::f32::consts::SQRT_2;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt() / max_dist;
        let alpha = (dist * 220.0).min(200.0) as u8;
        Rgba([30, 60, 160, alpha])
    })
}
