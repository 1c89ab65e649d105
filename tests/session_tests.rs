// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture screen scenarios

use image::{Rgba, RgbaImage};
use snapcam::compositor::catalog::FilterCatalog;
use snapcam::{CaptureSession, Config, FilterCompositor, ScreenMode};

fn session() -> CaptureSession {
    let compositor = FilterCompositor::new(FilterCatalog::builtin());
    CaptureSession::new(&Config::default(), compositor, (500.0, 800.0))
}

fn capture(s: &mut CaptureSession) {
    s.photo_captured(RgbaImage::from_pixel(500, 800, Rgba([10, 20, 30, 255])));
}

#[test]
fn test_capture_then_three_next_swipes_cycle_to_sentinel() {
    // 0 -> 1 -> sentinel on a 2-element catalog
    let mut s = session();
    capture(&mut s);

    s.swipe_left();
    assert_eq!(s.selection(), Some(0));
    s.swipe_left();
    assert_eq!(s.selection(), Some(1));
    s.swipe_left();
    assert_eq!(s.selection(), None);
}

#[test]
fn test_delete_resets_regardless_of_selection() {
    for swipes in 0..3 {
        let mut s = session();
        capture(&mut s);
        for _ in 0..swipes {
            s.swipe_left();
        }
        s.toggle_label();

        s.delete();
        assert_eq!(s.mode(), ScreenMode::Live);
        assert_eq!(s.selection(), None);
        assert!(s.preview().is_none());
        assert!(s.overlay().is_hidden());
    }
}

#[test]
fn test_filter_survives_flip() {
    let mut s = session();
    capture(&mut s);
    s.swipe_left();
    let selected = s.selection();

    s.swipe_up();
    assert_eq!(s.selection(), selected);
    assert!(s.preview().is_some());
}

#[test]
fn test_export_dimensions_match_capture() {
    let mut s = session();
    capture(&mut s);
    s.swipe_left();
    s.toggle_label();

    let export = s.export_image().unwrap();
    assert_eq!(export.dimensions(), (500, 800));
}

#[test]
fn test_recapture_after_delete_starts_clean() {
    let mut s = session();
    capture(&mut s);
    s.swipe_left();
    s.delete();

    capture(&mut s);
    assert_eq!(s.selection(), None);
    // Sentinel preview is the raw capture again
    let preview = s.preview().unwrap();
    assert_eq!(preview.get_pixel(0, 0).0, [10, 20, 30, 255]);
}
