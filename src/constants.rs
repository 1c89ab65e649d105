// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Application name, used for config and photo directories
pub const APP_NAME: &str = "snapcam";

/// Default text shown in the draggable overlay label
pub const DEFAULT_LABEL_TEXT: &str = "Hello World";

/// Default overlay label font scale (pixels per glyph row)
pub const DEFAULT_FONT_SCALE: f32 = 4.0;

/// Smallest usable font scale for the overlay label
pub const MIN_FONT_SCALE: f32 = 1.0;

/// Largest usable font scale for the overlay label
pub const MAX_FONT_SCALE: f32 = 24.0;

/// Number of overlay filters in the catalog
pub const FILTER_CATALOG_SIZE: usize = 2;

/// Preview frame channel depth (frames buffered between backend and screen)
pub const FRAME_CHANNEL_DEPTH: usize = 10;

/// Output format for exported photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG - lossless, larger files (default, keeps overlay edges crisp)
    #[default]
    Png,
    /// JPEG - lossy, smaller files
    Jpeg,
}

impl OutputFormat {
    /// All variants for UI iteration
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Jpeg];

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Display name for the format
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_catalog_size_matches_builtin_filters() {
        assert_eq!(FILTER_CATALOG_SIZE, 2);
    }
}
