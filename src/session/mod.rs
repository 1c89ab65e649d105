// SPDX-License-Identifier: GPL-3.0-only

//! The single screen's state and its input handlers
//!
//! Owns the captured photo, the filter compositor, and the text overlay,
//! and maps inputs (swipes, buttons) onto them. Everything here runs on
//! the UI loop; no other thread touches this state. Every handler is
//! best-effort: with nothing captured, handlers that need a photo do
//! nothing.

pub mod alerts;

use crate::backends::camera::types::CameraFacing;
use crate::compositor::orientation::Orientation;
use crate::compositor::{CapturedPhoto, FilterCompositor, NavigationDirection, export};
use crate::config::Config;
use crate::errors::ExportError;
use crate::overlay::TextOverlay;
use image::RgbaImage;
use tracing::{debug, info};

/// Which set of controls the screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    /// Live preview; capture and camera-switch controls visible
    Live,
    /// Reviewing a captured photo; filter/delete/export controls visible
    Review,
}

/// State of the capture screen
pub struct CaptureSession {
    compositor: FilterCompositor,
    photo: Option<CapturedPhoto>,
    overlay: TextOverlay,
    facing: CameraFacing,
    /// On-screen preview size in view coordinates
    view_size: (f32, f32),
    mirror_front_capture: bool,
}

impl CaptureSession {
    pub fn new(config: &Config, compositor: FilterCompositor, view_size: (f32, f32)) -> Self {
        Self {
            compositor,
            photo: None,
            overlay: TextOverlay::new(config.label_text.clone(), config.label_font_scale),
            facing: config.facing,
            view_size,
            mirror_front_capture: config.mirror_front_capture,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        if self.photo.is_some() {
            ScreenMode::Review
        } else {
            ScreenMode::Live
        }
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn overlay(&self) -> &TextOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut TextOverlay {
        &mut self.overlay
    }

    /// Current filter selection (`None` = no filter)
    pub fn selection(&self) -> Option<usize> {
        self.compositor.selection()
    }

    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.view_size = (width, height);
    }

    /// A capture finished: keep the photo and switch to review mode
    ///
    /// Front captures come mirrored when configured (selfie behavior); the
    /// orientation is baked in right away so the stored photo is upright.
    pub fn photo_captured(&mut self, image: RgbaImage) {
        let photo = if self.facing == CameraFacing::Front && self.mirror_front_capture {
            let mirrored = CapturedPhoto::with_orientation(image, Orientation::UpMirrored);
            CapturedPhoto::new(mirrored.flattened())
        } else {
            CapturedPhoto::new(image)
        };
        info!(
            width = photo.pixels.width(),
            height = photo.pixels.height(),
            facing = %self.facing,
            "Photo captured"
        );
        self.photo = Some(photo);
    }

    /// Swipe left: next filter
    pub fn swipe_left(&mut self) {
        self.compositor.advance(NavigationDirection::Next);
    }

    /// Swipe right: previous filter
    pub fn swipe_right(&mut self) {
        self.compositor.advance(NavigationDirection::Previous);
    }

    /// Swipe up: flip the photo horizontally and re-render
    pub fn swipe_up(&mut self) {
        if let Some(photo) = self.photo.as_mut() {
            photo.flip_horizontal();
            self.compositor.advance(NavigationDirection::Current);
            debug!(orientation = ?photo.orientation, "Photo flipped");
        }
    }

    /// Filter button: same as swiping left
    pub fn filter_button(&mut self) {
        self.swipe_left();
    }

    /// Label button: show/hide the overlay label, re-centered
    pub fn toggle_label(&mut self) {
        self.overlay.toggle(self.view_size.0, self.view_size.1);
    }

    /// Delete button: discard the photo and reset the screen
    pub fn delete(&mut self) {
        self.photo = None;
        self.overlay.hide();
        self.compositor.reset();
        info!("Photo discarded");
    }

    /// Switch between back and front cameras
    pub fn toggle_facing(&mut self) -> CameraFacing {
        self.facing = self.facing.toggled();
        self.facing
    }

    /// The image the preview shows right now
    ///
    /// `None` before a capture: the screen keeps showing the live stream.
    pub fn preview(&self) -> Option<RgbaImage> {
        self.compositor.current_output(self.photo.as_ref())
    }

    /// Flatten the current preview plus the label for export
    ///
    /// The label keeps its relative placement: its on-screen frame is
    /// scaled by native-width / view-width.
    pub fn export_image(&self) -> Result<RgbaImage, ExportError> {
        let base = self.preview().ok_or(ExportError::NoPhoto)?;

        if self.overlay.is_hidden() {
            return Ok(base);
        }

        let label = self.overlay.rasterize();
        Ok(export::export_with_label(
            &base,
            &label,
            self.overlay.frame(),
            self.view_size.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::catalog::FilterCatalog;
    use image::Rgba;

    fn session() -> CaptureSession {
        session_with_config(&Config::default())
    }

    fn session_with_config(config: &Config) -> CaptureSession {
        let compositor = FilterCompositor::new(FilterCatalog::builtin());
        CaptureSession::new(config, compositor, (500.0, 800.0))
    }

    fn capture(session: &mut CaptureSession, width: u32, height: u32) {
        session.photo_captured(RgbaImage::from_pixel(
            width,
            height,
            Rgba([50, 60, 70, 255]),
        ));
    }

    #[test]
    fn test_starts_in_live_mode() {
        let s = session();
        assert_eq!(s.mode(), ScreenMode::Live);
        assert!(s.preview().is_none());
    }

    #[test]
    fn test_capture_switches_to_review() {
        let mut s = session();
        capture(&mut s, 4, 4);
        assert_eq!(s.mode(), ScreenMode::Review);
        assert!(s.preview().is_some());
    }

    #[test]
    fn test_three_swipes_land_back_on_sentinel() {
        // capture -> Next x3 on a 2-element catalog: None -> 0 -> 1 -> None
        let mut s = session();
        capture(&mut s, 4, 4);
        s.swipe_left();
        s.swipe_left();
        s.swipe_left();
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn test_delete_resets_everything() {
        let mut s = session();
        capture(&mut s, 4, 4);
        s.swipe_left();
        s.toggle_label();
        assert!(!s.overlay().is_hidden());

        s.delete();
        assert_eq!(s.mode(), ScreenMode::Live);
        assert_eq!(s.selection(), None);
        assert!(s.overlay().is_hidden());
        assert!(s.preview().is_none());
    }

    #[test]
    fn test_delete_without_photo_is_noop() {
        let mut s = session();
        s.swipe_left();
        s.delete();
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn test_swipe_up_flips_preview() {
        let mut s = session();
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        s.photo_captured(img);

        s.swipe_up();
        let preview = s.preview().unwrap();
        assert_eq!(preview.get_pixel(1, 0).0, [255, 0, 0, 255]);

        // Flipping twice restores the original
        s.swipe_up();
        let preview = s.preview().unwrap();
        assert_eq!(preview.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_swipe_up_without_photo_is_noop() {
        let mut s = session();
        s.swipe_up();
        assert!(s.preview().is_none());
    }

    #[test]
    fn test_front_capture_is_mirrored() {
        let mut config = Config::default();
        config.facing = CameraFacing::Front;
        let mut s = session_with_config(&config);

        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        s.photo_captured(img);

        let preview = s.preview().unwrap();
        assert_eq!(preview.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_front_capture_unmirrored_when_disabled() {
        let mut config = Config::default();
        config.facing = CameraFacing::Front;
        config.mirror_front_capture = false;
        let mut s = session_with_config(&config);

        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        s.photo_captured(img);

        let preview = s.preview().unwrap();
        assert_eq!(preview.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_export_without_photo_fails_softly() {
        let s = session();
        assert!(matches!(s.export_image(), Err(ExportError::NoPhoto)));
    }

    #[test]
    fn test_export_with_hidden_label_is_preview() {
        let mut s = session();
        capture(&mut s, 8, 8);
        let export = s.export_image().unwrap();
        assert_eq!(export, s.preview().unwrap());
    }

    #[test]
    fn test_export_with_label_differs_from_preview() {
        let mut s = session();
        capture(&mut s, 500, 800);
        s.toggle_label();
        let export = s.export_image().unwrap();
        assert_eq!(export.dimensions(), (500, 800));
        assert_ne!(export, s.preview().unwrap());
    }

    #[test]
    fn test_toggle_facing_roundtrips() {
        let mut s = session();
        assert_eq!(s.toggle_facing(), CameraFacing::Front);
        assert_eq!(s.toggle_facing(), CameraFacing::Back);
    }
}
