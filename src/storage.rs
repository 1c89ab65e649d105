// SPDX-License-Identifier: GPL-3.0-only

//! Photo-library export
//!
//! Saves finished images into the user's pictures directory with a
//! timestamped filename. Callers hand in an already-flattened image; no
//! orientation metadata survives past this point.

use crate::constants::{APP_NAME, OutputFormat};
use crate::errors::ExportError;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory exported photos are written to
pub fn photo_directory() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Filename for a photo taken right now
fn timestamped_filename(format: OutputFormat) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("IMG_{}.{}", timestamp, format.extension())
}

/// Encode an image to the configured output format
///
/// JPEG cannot carry alpha, so the image is flattened to RGB first for it.
pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);

    let result = match format {
        OutputFormat::Png => image.write_to(&mut cursor, ImageFormat::Png),
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.write_to(&mut cursor, ImageFormat::Jpeg)
        }
    };

    result.map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
    debug!(format = format.display_name(), len = bytes.len(), "Encoded photo");
    Ok(bytes)
}

/// Write an encoded image to an explicit path
pub fn save_to_path(
    image: &RgbaImage,
    format: OutputFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = encode(image, format)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), "Photo saved");
    Ok(())
}

/// Save a photo into the library directory (async; completion reported
/// back as a `Result` so the screen can show success or failure)
pub async fn save_to_library(
    image: RgbaImage,
    format: OutputFormat,
) -> Result<PathBuf, ExportError> {
    let path = photo_directory().join(timestamped_filename(format));
    let save_path = path.clone();

    tokio::task::spawn_blocking(move || save_to_path(&image, format, &save_path))
        .await
        .map_err(|e| ExportError::SaveFailed(e.to_string()))??;

    Ok(path)
}
