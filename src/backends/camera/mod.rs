// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! A backend enumerates devices and produces preview frames over a channel.
//! Two implementations exist: `v4l2` for real devices and `test_pattern` for
//! tests and machines without a camera.

pub mod test_pattern;
pub mod types;
pub mod v4l2;

use crate::constants::FRAME_CHANNEL_DEPTH;
use crate::errors::CameraError;
use futures::channel::mpsc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use types::{CameraDevice, CameraFrame};

/// Camera capture service seam
///
/// Implementations run frame production on their own thread and hand frames
/// over a bounded channel. Dropping the returned [`PreviewStream`] stops the
/// producer.
pub trait CameraBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Enumerate available camera devices, in stable order
    fn enumerate(&self) -> Vec<CameraDevice>;

    /// Start streaming preview frames from the given device
    fn open_preview(&self, device: &CameraDevice) -> Result<PreviewStream, CameraError>;
}

/// A running preview stream
///
/// Holds the receiving end of the frame channel and the producer's stop flag.
/// Dropping the stream signals the producer thread to exit.
pub struct PreviewStream {
    receiver: mpsc::Receiver<CameraFrame>,
    stop: Arc<AtomicBool>,
}

impl PreviewStream {
    pub(crate) fn new(receiver: mpsc::Receiver<CameraFrame>, stop: Arc<AtomicBool>) -> Self {
        Self { receiver, stop }
    }

    pub(crate) fn channel() -> (mpsc::Sender<CameraFrame>, mpsc::Receiver<CameraFrame>) {
        mpsc::channel(FRAME_CHANNEL_DEPTH)
    }

    /// Non-blocking receive of the next frame
    pub fn try_frame(&mut self) -> Option<CameraFrame> {
        self.receiver.try_next().ok().flatten()
    }

    /// Drain the channel and return the most recent frame, if any
    pub fn latest_frame(&mut self) -> Option<CameraFrame> {
        let mut latest = None;
        while let Some(frame) = self.try_frame() {
            latest = Some(frame);
        }
        latest
    }

    /// Block until a frame arrives or the timeout elapses
    ///
    /// Used by the headless capture path, not the interactive screen.
    pub fn wait_frame(&mut self, timeout: Duration) -> Option<CameraFrame> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(frame) = self.try_frame() {
                return Some(frame);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Drop for PreviewStream {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Pick the backend for this machine: V4L2 when it sees any device,
/// otherwise the synthetic test pattern.
pub fn default_backend() -> Box<dyn CameraBackend> {
    let v4l2 = v4l2::V4l2Backend::new();
    if v4l2.enumerate().is_empty() {
        info!("No V4L2 devices found, using test pattern backend");
        Box::new(test_pattern::TestPatternBackend::default())
    } else {
        Box::new(v4l2)
    }
}

/// Capture a single frame from a device (headless capture path)
pub fn capture_one(
    backend: &dyn CameraBackend,
    device: &CameraDevice,
    timeout: Duration,
) -> Result<CameraFrame, CameraError> {
    debug!(backend = backend.name(), device = %device.path, "Opening device for one-shot capture");
    let mut stream = backend.open_preview(device)?;
    stream
        .wait_frame(timeout)
        .ok_or_else(|| CameraError::BackendError("timed out waiting for a frame".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_pattern::TestPatternBackend;

    #[test]
    fn test_capture_one_from_test_pattern() {
        let backend = TestPatternBackend::default();
        let device = backend.enumerate().into_iter().next().unwrap();
        let frame = capture_one(&backend, &device, Duration::from_secs(2)).unwrap();
        assert!(frame.width > 0);
        assert!(frame.height > 0);
    }

    #[test]
    fn test_preview_stream_stops_producer_on_drop() {
        let backend = TestPatternBackend::default();
        let device = backend.enumerate().into_iter().next().unwrap();
        let stream = backend.open_preview(&device).unwrap();
        let stop = Arc::clone(&stream.stop);
        drop(stream);
        assert!(stop.load(Ordering::Relaxed));
    }
}
