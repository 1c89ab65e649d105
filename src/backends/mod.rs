// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera capture
//!
//! The backend layer hides how preview frames are produced, so the rest of
//! the app only sees [`camera::CameraBackend`] and the frame channel:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Screen / Session               │
//! └────────────────────┬────────────────────────┘
//!                      │ CameraFrame channel
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │   ┌─────────────┐     ┌─────────────────┐   │
//! │   │    V4L2     │     │  Test pattern   │   │
//! │   └─────────────┘     └─────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```

pub mod camera;
