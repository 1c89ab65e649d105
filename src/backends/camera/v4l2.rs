// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Enumerates `/dev/video*` capture nodes and streams frames via mmap
//! buffers. Frames are handed off in the device's native packed format
//! (YUYV/RGB24) or JPEG-decoded to RGBA for MJPG devices.

use super::types::{CameraDevice, CameraFrame, PixelFormat};
use super::{CameraBackend, PreviewStream};
use crate::errors::CameraError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

/// Fourcc preference order: cheap-to-convert formats first
const PREFERRED_FOURCCS: [&[u8; 4]; 3] = [b"RGB3", b"YUYV", b"MJPG"];

/// Number of mmap buffers for the capture stream
const BUFFER_COUNT: u32 = 4;

/// Camera backend over the kernel V4L2 API
#[derive(Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4l2Backend {
    fn name(&self) -> &'static str {
        "v4l2"
    }

    fn enumerate(&self) -> Vec<CameraDevice> {
        let mut devices = Vec::new();
        for node in v4l::context::enum_devices() {
            let path = node.path().to_string_lossy().to_string();
            // Metadata and output nodes also appear under /dev/video*;
            // only keep nodes that can actually stream video capture.
            let Ok(dev) = Device::with_path(node.path()) else {
                continue;
            };
            if dev.format().is_err() {
                continue;
            }
            let name = node.name().unwrap_or_else(|| path.clone());
            debug!(path = %path, name = %name, "Found V4L2 capture device");
            devices.push(CameraDevice { name, path });
        }
        devices.sort_by(|a, b| a.path.cmp(&b.path));
        devices
    }

    fn open_preview(&self, device: &CameraDevice) -> Result<PreviewStream, CameraError> {
        // Validate the device and settle the format up front; the producer
        // thread reopens it because the mmap stream borrows the device.
        let format = {
            let dev = Device::with_path(&device.path)
                .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
            negotiate_format(&dev)?
        };
        let pixel_format = pixel_format_for(&format.fourcc);
        info!(
            device = %device.path,
            width = format.width,
            height = format.height,
            fourcc = %format.fourcc,
            "Starting V4L2 preview stream"
        );

        let (mut sender, receiver) = PreviewStream::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (width, height) = (format.width, format.height);
        let path = device.path.clone();

        std::thread::spawn(move || {
            let dev = match Device::with_path(&path) {
                Ok(dev) => dev,
                Err(e) => {
                    warn!(path = %path, error = %e, "Reopening V4L2 device failed");
                    return;
                }
            };
            if let Err(e) = dev.set_format(&format) {
                warn!(path = %path, error = %e, "Applying negotiated format failed");
                return;
            }
            let mut stream = match MmapStream::with_buffers(&dev, Type::VideoCapture, BUFFER_COUNT)
            {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(path = %path, error = %e, "Starting mmap stream failed");
                    return;
                }
            };

            while !stop_flag.load(Ordering::Relaxed) {
                let (buf, _meta) = match stream.next() {
                    Ok(ok) => ok,
                    Err(e) => {
                        warn!(error = %e, "V4L2 stream read failed, stopping");
                        break;
                    }
                };

                let Some(frame) = frame_from_buffer(buf, width, height, pixel_format) else {
                    continue;
                };

                // Drop frames the consumer is too slow for
                if sender.try_send(frame).is_err() && sender.is_closed() {
                    break;
                }
            }
        });

        Ok(PreviewStream::new(receiver, stop))
    }
}

/// Pick a streamable format, preferring cheap-to-convert fourccs
fn negotiate_format(dev: &Device) -> Result<v4l::Format, CameraError> {
    let mut format = dev
        .format()
        .map_err(|e| CameraError::BackendError(e.to_string()))?;

    for fourcc in PREFERRED_FOURCCS {
        format.fourcc = FourCC::new(fourcc);
        if let Ok(applied) = dev.set_format(&format)
            && applied.fourcc == format.fourcc
        {
            return Ok(applied);
        }
    }

    // Fall back to whatever the driver currently has, if we understand it
    let current = dev
        .format()
        .map_err(|e| CameraError::BackendError(e.to_string()))?;
    if pixel_format_for(&current.fourcc).is_some() || current.fourcc == FourCC::new(b"MJPG") {
        Ok(current)
    } else {
        Err(CameraError::BackendError(format!(
            "unsupported pixel format {}",
            current.fourcc
        )))
    }
}

/// Map a fourcc onto a raw [`PixelFormat`]; `None` means compressed (MJPG)
fn pixel_format_for(fourcc: &FourCC) -> Option<PixelFormat> {
    match &fourcc.repr {
        b"RGB3" => Some(PixelFormat::Rgb24),
        b"YUYV" => Some(PixelFormat::Yuyv),
        b"RGBA" | b"AB24" => Some(PixelFormat::Rgba),
        _ => None,
    }
}

fn frame_from_buffer(
    buf: &[u8],
    width: u32,
    height: u32,
    pixel_format: Option<PixelFormat>,
) -> Option<CameraFrame> {
    match pixel_format {
        Some(format) => {
            let bytes_per_pixel = match format {
                PixelFormat::Rgba => 4,
                PixelFormat::Rgb24 => 3,
                PixelFormat::Yuyv => 2,
            };
            let stride = width * bytes_per_pixel;
            if (buf.len() as u32) < stride * height {
                warn!(len = buf.len(), "Short V4L2 buffer, dropping frame");
                return None;
            }
            Some(CameraFrame {
                width,
                height,
                data: Arc::from(buf.to_vec()),
                format,
                stride,
                captured_at: Instant::now(),
            })
        }
        None => {
            // MJPG: decode the JPEG payload to RGBA
            match image::load_from_memory(buf) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let (w, h) = rgba.dimensions();
                    Some(CameraFrame::rgba(w, h, rgba.into_raw()))
                }
                Err(e) => {
                    warn!(error = %e, "MJPG frame decode failed, dropping frame");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_mapping() {
        assert_eq!(
            pixel_format_for(&FourCC::new(b"YUYV")),
            Some(PixelFormat::Yuyv)
        );
        assert_eq!(
            pixel_format_for(&FourCC::new(b"RGB3")),
            Some(PixelFormat::Rgb24)
        );
        assert_eq!(pixel_format_for(&FourCC::new(b"MJPG")), None);
    }

    #[test]
    fn test_short_buffer_is_dropped() {
        let frame = frame_from_buffer(&[0u8; 10], 640, 480, Some(PixelFormat::Yuyv));
        assert!(frame.is_none());
    }
}
