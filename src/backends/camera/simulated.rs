// SPDX-License-Identifier: GPL-3.0-only

//! Simulated camera pipeline
//!
//! Stands in for the vendor component graph so the capture core can run and
//! be tested off-hardware. It mirrors the real pipeline's shape: three
//! components (camera, preview, encoder) brought up in order and torn down
//! in reverse, with each handle null-checked before it is touched.
//!
//! Frames are synthesized as a gradient that shifts with the frame count,
//! which makes consecutive captures distinguishable on disk.

use super::types::{FrameBuffer, Rgba};
use super::{CameraConfig, CameraPipeline};
use crate::errors::CameraError;
use tracing::{debug, info};

/// One component port of the simulated graph
#[derive(Debug)]
struct Port {
    name: &'static str,
}

impl Port {
    fn enable(name: &'static str) -> Self {
        debug!(port = name, "Port enabled");
        Self { name }
    }

    fn disable(self) {
        debug!(port = self.name, "Port disabled");
    }
}

/// Simulated camera pipeline
#[derive(Debug, Default)]
pub struct SimulatedCamera {
    camera: Option<Port>,
    preview: Option<Port>,
    encoder: Option<Port>,
    config: Option<CameraConfig>,
    frames_produced: u64,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraPipeline for SimulatedCamera {
    fn configure(&mut self, config: &CameraConfig) -> Result<(), CameraError> {
        if config.width == 0 || config.height == 0 {
            return Err(CameraError::ConfigurationFailed(format!(
                "invalid resolution {}x{}",
                config.width, config.height
            )));
        }

        // Acquisition order matters: teardown must mirror it in reverse.
        self.camera = Some(Port::enable("camera"));
        self.preview = Some(Port::enable("preview"));
        self.encoder = Some(Port::enable("encoder"));
        self.config = Some(*config);

        info!(
            width = config.width,
            height = config.height,
            quality = config.quality,
            "Camera pipeline configured"
        );
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<FrameBuffer, CameraError> {
        let config = self.config.ok_or(CameraError::Disconnected)?;

        let mut frame = FrameBuffer::new(config.width, config.height);
        let phase = (self.frames_produced * 8 % 256) as u32;
        for y in 0..config.height {
            for x in 0..config.width {
                frame.set_pixel(
                    x,
                    y,
                    Rgba {
                        r: ((x * 256 / config.width.max(1) + phase) % 256) as u8,
                        g: ((y * 256 / config.height.max(1)) % 256) as u8,
                        b: (phase % 256) as u8,
                        a: 0xff,
                    },
                );
            }
        }
        self.frames_produced += 1;
        Ok(frame)
    }

    fn teardown(&mut self) {
        // Reverse acquisition order; every handle may already be unset.
        if let Some(port) = self.encoder.take() {
            port.disable();
        }
        if let Some(port) = self.preview.take() {
            port.disable();
        }
        if let Some(port) = self.camera.take() {
            port.disable();
        }
        if self.config.take().is_some() {
            info!("Camera pipeline torn down");
        }
    }
}

impl Drop for SimulatedCamera {
    fn drop(&mut self) {
        self.teardown();
    }
}
