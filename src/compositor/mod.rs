// SPDX-License-Identifier: GPL-3.0-only

//! Filter selection and image compositing
//!
//! The core of the app: a captured photo, a fixed catalog of overlay
//! filters, and a circular selection over them with a "no filter" state.
//! Rendering draws the photo into a canvas of its own size and the selected
//! overlay on top of it, full-frame.
//!
//! # Modules
//!
//! - [`canvas`]: begin/draw/snapshot compositing over the `image` crate
//! - [`catalog`]: the fixed overlay list
//! - [`orientation`]: orientation metadata and flattening
//! - [`export`]: text-label flattening at native resolution

pub mod canvas;
pub mod catalog;
pub mod export;
pub mod orientation;

use canvas::Canvas;
use catalog::FilterCatalog;
use image::RgbaImage;
use orientation::Orientation;
use tracing::debug;

/// Which way to move the filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// Step to the next filter
    Next,
    /// Step to the previous filter
    Previous,
    /// Stay put; used to re-render after an external change such as a flip
    Current,
}

/// A captured photo: pixels plus orientation metadata
///
/// Flips only touch the metadata; [`CapturedPhoto::flattened`] bakes it in.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub pixels: RgbaImage,
    pub orientation: Orientation,
}

impl CapturedPhoto {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            orientation: Orientation::Up,
        }
    }

    pub fn with_orientation(pixels: RgbaImage, orientation: Orientation) -> Self {
        Self {
            pixels,
            orientation,
        }
    }

    /// Toggle the horizontal-mirror bit of the orientation tag
    pub fn flip_horizontal(&mut self) {
        self.orientation = self.orientation.flipped_horizontally();
    }

    /// Upright pixels with the orientation tag applied
    pub fn flattened(&self) -> RgbaImage {
        orientation::flattened(&self.pixels, self.orientation)
    }
}

/// Circular filter selection plus compositing
///
/// Selection is `None` for the "no filter" state and `Some(i)` for catalog
/// index `i`. Advancing past the last index wraps to no-filter; retreating
/// past no-filter wraps to the last index.
pub struct FilterCompositor {
    catalog: FilterCatalog,
    selection: Option<usize>,
}

impl FilterCompositor {
    pub fn new(catalog: FilterCatalog) -> Self {
        Self {
            catalog,
            selection: None,
        }
    }

    /// Current selection: `None` means no filter
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Number of filters in the catalog
    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Reset the selection to the no-filter state
    pub fn reset(&mut self) {
        self.selection = None;
    }

    /// Move the selection circularly; never fails
    pub fn advance(&mut self, direction: NavigationDirection) {
        let len = self.catalog.len();
        if len == 0 {
            self.selection = None;
            return;
        }

        self.selection = match direction {
            NavigationDirection::Next => match self.selection {
                None => Some(0),
                Some(i) if i + 1 >= len => None,
                Some(i) => Some(i + 1),
            },
            NavigationDirection::Previous => match self.selection {
                None => Some(len - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            },
            NavigationDirection::Current => self.selection,
        };

        debug!(selection = ?self.selection, "Filter selection changed");
    }

    /// Composite the current selection over the captured photo
    ///
    /// `None` when nothing has been captured (callers treat that as a no-op).
    /// With no filter selected the photo's upright pixels come back
    /// unchanged; otherwise the selected overlay is drawn over them,
    /// full-frame. The photo itself is never mutated.
    pub fn current_output(&self, photo: Option<&CapturedPhoto>) -> Option<RgbaImage> {
        let photo = photo?;
        let base = photo.flattened();

        let Some(index) = self.selection else {
            return Some(base);
        };
        let Some(overlay) = self.catalog.get(index) else {
            // Selection is always kept in range by advance(); a bad index
            // degrades to the unfiltered photo.
            return Some(base);
        };

        let (width, height) = base.dimensions();
        let mut canvas = Canvas::new(width, height);
        let bounds = canvas.full_bounds();
        canvas.draw_image(&base, bounds);
        canvas.draw_image(overlay, bounds);
        Some(canvas.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn compositor() -> FilterCompositor {
        FilterCompositor::new(FilterCatalog::builtin())
    }

    fn photo(width: u32, height: u32) -> CapturedPhoto {
        CapturedPhoto::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 130, 140, 255]),
        ))
    }

    #[test]
    fn test_next_cycles_through_sentinel() {
        let mut c = compositor();
        // catalog of 2: None -> 0 -> 1 -> None
        c.advance(NavigationDirection::Next);
        assert_eq!(c.selection(), Some(0));
        c.advance(NavigationDirection::Next);
        assert_eq!(c.selection(), Some(1));
        c.advance(NavigationDirection::Next);
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn test_sentinel_recurs_once_per_cycle() {
        let mut c = compositor();
        let cycle = c.catalog_len() + 1;
        let mut sentinel_hits = 0;
        for _ in 0..cycle {
            c.advance(NavigationDirection::Next);
            if c.selection().is_none() {
                sentinel_hits += 1;
            }
        }
        assert_eq!(sentinel_hits, 1);
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn test_previous_wraps_both_ways() {
        let mut c = compositor();
        c.advance(NavigationDirection::Previous);
        assert_eq!(c.selection(), Some(c.catalog_len() - 1));

        let mut c = compositor();
        c.advance(NavigationDirection::Next); // at 0
        c.advance(NavigationDirection::Previous);
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn test_current_leaves_selection_unchanged() {
        let mut c = compositor();
        c.advance(NavigationDirection::Next);
        c.advance(NavigationDirection::Current);
        assert_eq!(c.selection(), Some(0));
    }

    #[test]
    fn test_output_without_photo_is_none() {
        let c = compositor();
        assert!(c.current_output(None).is_none());
    }

    #[test]
    fn test_sentinel_output_is_pixel_identical() {
        let c = compositor();
        let p = photo(6, 4);
        let out = c.current_output(Some(&p)).unwrap();
        assert_eq!(out, p.pixels);
    }

    #[test]
    fn test_filtered_output_keeps_base_dimensions() {
        let mut c = compositor();
        let p = photo(10, 20);
        for _ in 0..c.catalog_len() {
            c.advance(NavigationDirection::Next);
            let out = c.current_output(Some(&p)).unwrap();
            assert_eq!(out.dimensions(), (10, 20));
        }
    }

    #[test]
    fn test_filtered_output_differs_from_base() {
        let mut c = compositor();
        let p = photo(8, 8);
        c.advance(NavigationDirection::Next);
        let out = c.current_output(Some(&p)).unwrap();
        assert_ne!(out, p.pixels);
    }

    #[test]
    fn test_compositing_does_not_mutate_photo() {
        let mut c = compositor();
        let p = photo(8, 8);
        let before = p.pixels.clone();
        c.advance(NavigationDirection::Next);
        let _ = c.current_output(Some(&p));
        assert_eq!(p.pixels, before);
    }

    #[test]
    fn test_flip_then_current_renders_flipped_base() {
        let c = compositor();
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let mut p = CapturedPhoto::new(img);

        p.flip_horizontal();
        let out = c.current_output(Some(&p)).unwrap();
        assert_eq!(out.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_empty_catalog_stays_at_sentinel() {
        let mut c = FilterCompositor::new(FilterCatalog::new(Vec::new()));
        c.advance(NavigationDirection::Next);
        assert_eq!(c.selection(), None);
        c.advance(NavigationDirection::Previous);
        assert_eq!(c.selection(), None);
    }
}
