// SPDX-License-Identifier: GPL-3.0-only

//! Hardware backend abstraction
//!
//! The capture core only ever talks to the camera through the
//! [`camera::CameraPipeline`] trait, so the vendor component graph stays
//! behind a narrow seam and the rest of the crate can run against the
//! simulated backend.

pub mod camera;

pub use camera::{CameraConfig, CameraPipeline, SimulatedCamera};
