// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for filter cycling and compositing

use image::{Rgba, RgbaImage};
use snapcam::compositor::catalog::FilterCatalog;
use snapcam::compositor::export::{LabelFrame, export_with_label};
use snapcam::{CapturedPhoto, FilterCompositor, NavigationDirection};

fn compositor() -> FilterCompositor {
    FilterCompositor::new(FilterCatalog::builtin())
}

fn base_photo(width: u32, height: u32) -> CapturedPhoto {
    CapturedPhoto::new(RgbaImage::from_pixel(width, height, Rgba([80, 90, 100, 255])))
}

#[test]
fn test_next_returns_to_sentinel_once_per_cycle() {
    // For any run of catalog_len + 1 Next calls starting at the sentinel,
    // the selection lands on the sentinel exactly once
    let mut c = compositor();
    let cycle = c.catalog_len() + 1;

    for _ in 0..3 {
        let mut sentinel_hits = 0;
        for _ in 0..cycle {
            c.advance(NavigationDirection::Next);
            if c.selection().is_none() {
                sentinel_hits += 1;
            }
        }
        assert_eq!(sentinel_hits, 1);
    }
}

#[test]
fn test_previous_from_sentinel_is_last_index() {
    let mut c = compositor();
    c.advance(NavigationDirection::Previous);
    assert_eq!(c.selection(), Some(c.catalog_len() - 1));
}

#[test]
fn test_previous_from_zero_is_sentinel() {
    let mut c = compositor();
    c.advance(NavigationDirection::Next);
    assert_eq!(c.selection(), Some(0));
    c.advance(NavigationDirection::Previous);
    assert_eq!(c.selection(), None);
}

#[test]
fn test_sentinel_output_is_base_image() {
    let c = compositor();
    let photo = base_photo(12, 9);
    assert_eq!(c.current_output(Some(&photo)).unwrap(), photo.pixels);
}

#[test]
fn test_every_filter_preserves_dimensions() {
    let mut c = compositor();
    let photo = base_photo(33, 21);
    loop {
        c.advance(NavigationDirection::Next);
        let Some(index) = c.selection() else { break };
        let out = c.current_output(Some(&photo)).unwrap();
        assert_eq!(out.dimensions(), (33, 21), "filter {} changed size", index);
    }
}

#[test]
fn test_export_scaling_concrete_case() {
    // W=1000, H=2000, V=500: label at (10,20) size (100,30) lands at
    // (20,40) size (200,60)
    let base = RgbaImage::from_pixel(1000, 2000, Rgba([0, 0, 0, 255]));
    let label = RgbaImage::from_pixel(100, 30, Rgba([255, 255, 255, 255]));

    let out = export_with_label(
        &base,
        &label,
        LabelFrame::new(10.0, 20.0, 100.0, 30.0),
        500.0,
    );

    let white = [255, 255, 255, 255];
    let black = [0, 0, 0, 255];
    assert_eq!(out.get_pixel(20, 40).0, white);
    assert_eq!(out.get_pixel(219, 99).0, white);
    assert_eq!(out.get_pixel(19, 40).0, black);
    assert_eq!(out.get_pixel(20, 39).0, black);
    assert_eq!(out.get_pixel(220, 99).0, black);
    assert_eq!(out.get_pixel(219, 100).0, black);
}

#[test]
fn test_output_absent_without_capture() {
    let mut c = compositor();
    assert!(c.current_output(None).is_none());
    c.advance(NavigationDirection::Next);
    assert!(c.current_output(None).is_none());
}
