// SPDX-License-Identifier: GPL-3.0-only

//! Camera pipeline abstraction
//!
//! The real hardware pipeline is a vendor component graph (camera, preview
//! and encoder ports with their own format negotiation). The core treats it
//! as an opaque capability behind [`CameraPipeline`]: configure once at
//! startup, pull frames on demand, tear down once at exit.
//!
//! Teardown is idempotent and disables components in strict reverse order of
//! creation, tolerating any subset of them being unset after a partial
//! configure failure.

pub mod simulated;
pub mod types;

pub use simulated::SimulatedCamera;
pub use types::{FrameBuffer, Rgba};

use crate::errors::CameraError;

/// Capture configuration handed to the pipeline at startup
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// Opaque camera capability the core depends on
pub trait CameraPipeline {
    /// Build and enable the component graph for the requested format.
    ///
    /// Failure here is fatal; the caller aborts before entering the main
    /// loop. The pipeline object itself is the handle for later calls.
    fn configure(&mut self, config: &CameraConfig) -> Result<(), CameraError>;

    /// Pull one raw frame from the pipeline
    fn grab_frame(&mut self) -> Result<FrameBuffer, CameraError>;

    /// Disable and release every component, reverse acquisition order.
    ///
    /// Safe to call at any point, including after a partial configure
    /// failure or a second time.
    fn teardown(&mut self);
}
