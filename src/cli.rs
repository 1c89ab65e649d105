// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless camera operations
//!
//! - Listing available cameras
//! - Taking a photo without the interactive screen

use snapcam::backends::camera::{capture_one, default_backend};
use snapcam::constants::OutputFormat;
use snapcam::storage;
use std::path::PathBuf;
use std::time::Duration;

/// How long a one-shot capture waits for the first frame
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let backend = default_backend();
    let devices = backend.enumerate();

    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({} backend):", backend.name());
    println!();
    for (index, device) in devices.iter().enumerate() {
        println!("  [{}] {} ({})", index, device.name, device.path);
    }

    Ok(())
}

/// Take a photo with the given camera and save it
pub fn take_photo(
    camera: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = default_backend();
    let devices = backend.enumerate();

    let Some(device) = devices.get(camera) else {
        return Err(format!(
            "Camera index {} not found ({} available)",
            camera,
            devices.len()
        )
        .into());
    };

    println!("Capturing from {}...", device.name);
    let frame = capture_one(backend.as_ref(), device, CAPTURE_TIMEOUT)?;
    let image = frame
        .to_rgba()
        .ok_or("Captured frame could not be decoded")?;

    // Explicit output path keeps its extension's format; default goes to
    // the library directory as PNG
    match output {
        Some(path) => {
            let format = match path.extension().and_then(|e| e.to_str()) {
                Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
                _ => OutputFormat::Png,
            };
            storage::save_to_path(&image, format, &path)?;
            println!("Saved: {}", path.display());
        }
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            let path = runtime.block_on(storage::save_to_library(image, OutputFormat::Png))?;
            println!("Saved: {}", path.display());
        }
    }

    Ok(())
}
