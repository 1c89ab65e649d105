// SPDX-License-Identifier: GPL-3.0-only

//! Snapcam - a single-screen camera app
//!
//! Live camera preview, photo capture, two compositing filters cycled
//! circularly, a draggable text overlay, and export to the photo library.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: The screen's state and its input handlers
//! - [`compositor`]: Filter selection, compositing, orientation, export
//! - [`overlay`]: The draggable/resizable text label
//! - [`backends`]: Camera backend abstraction (V4L2 and test pattern)
//! - [`permissions`]: Camera/microphone authorization seam
//! - [`storage`]: Photo-library export
//! - [`terminal`]: Terminal rendering of the screen
//! - [`config`]: User configuration handling

pub mod backends;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod errors;
pub mod overlay;
pub mod permissions;
pub mod session;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use compositor::{CapturedPhoto, FilterCompositor, NavigationDirection};
pub use config::Config;
pub use session::{CaptureSession, ScreenMode};
