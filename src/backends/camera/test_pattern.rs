// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera backend
//!
//! Produces a moving color gradient so the app, tests, and CI can run on
//! machines without a camera. Frame pacing approximates 30 fps.

use super::types::{CameraDevice, CameraFrame};
use super::{CameraBackend, PreviewStream};
use crate::errors::CameraError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Backend producing synthetic gradient frames
pub struct TestPatternBackend {
    width: u32,
    height: u32,
}

impl Default for TestPatternBackend {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl TestPatternBackend {
    /// Backend with a custom frame size (tests use small frames)
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl CameraBackend for TestPatternBackend {
    fn name(&self) -> &'static str {
        "test-pattern"
    }

    fn enumerate(&self) -> Vec<CameraDevice> {
        // Two virtual devices so facing toggles have something to land on
        vec![
            CameraDevice {
                name: "Test pattern (back)".to_string(),
                path: "test:0".to_string(),
            },
            CameraDevice {
                name: "Test pattern (front)".to_string(),
                path: "test:1".to_string(),
            },
        ]
    }

    fn open_preview(&self, device: &CameraDevice) -> Result<PreviewStream, CameraError> {
        let (mut sender, receiver) = PreviewStream::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (width, height) = (self.width, self.height);
        // Phase offset distinguishes the two virtual devices visually
        let phase: u32 = if device.path.ends_with('1') { 128 } else { 0 };

        debug!(device = %device.path, width, height, "Starting test pattern stream");

        std::thread::spawn(move || {
            let mut tick: u32 = phase;
            while !stop_flag.load(Ordering::Relaxed) {
                let frame = render_pattern(width, height, tick);
                // A full channel just drops the frame, same as a slow consumer
                // of a real camera would miss frames.
                if sender.try_send(frame).is_err() && sender.is_closed() {
                    break;
                }
                tick = tick.wrapping_add(2);
                std::thread::sleep(FRAME_INTERVAL);
            }
        });

        Ok(PreviewStream::new(receiver, stop))
    }
}

fn render_pattern(width: u32, height: u32, tick: u32) -> CameraFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255 / width.max(1)) as u8).wrapping_add(tick as u8);
            let g = (y * 255 / height.max(1)) as u8;
            let b = 255u8.wrapping_sub(tick as u8);
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    CameraFrame::rgba(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerates_two_devices() {
        let backend = TestPatternBackend::default();
        assert_eq!(backend.enumerate().len(), 2);
    }

    #[test]
    fn test_pattern_frame_dimensions() {
        let frame = render_pattern(8, 4, 0);
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.data.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_stream_produces_frames() {
        let backend = TestPatternBackend::with_size(16, 16);
        let device = backend.enumerate().into_iter().next().unwrap();
        let mut stream = backend.open_preview(&device).unwrap();
        let frame = stream.wait_frame(Duration::from_secs(2)).unwrap();
        assert_eq!((frame.width, frame.height), (16, 16));
    }
}
