// SPDX-License-Identifier: GPL-3.0-only

//! Preview renderer abstraction
//!
//! The live preview runs on the GPU in the real tool; the capture core only
//! needs three operations from it: start, restart with a different scene,
//! and capture the current framebuffer into a caller-supplied sink. All of
//! them are blocking from the core's point of view.
//!
//! [`HeadlessRenderer`] is the in-tree implementation: it composites the
//! current scene on the CPU from camera frames and encodes JPEG at the
//! configured quality, which keeps the whole capture path runnable and
//! testable without a GPU surface.

use crate::backends::camera::{CameraPipeline, FrameBuffer, Rgba};
use crate::config::RunConfig;
use crate::errors::RenderError;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::io::Write;
use tracing::{debug, info};

/// Named rendering configuration the preview can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scene {
    /// Live camera image
    #[default]
    Live,
    /// Calibration test pattern
    Calibration,
}

impl Scene {
    /// The other scene; interactive mode alternates on every keypress
    pub fn toggled(self) -> Self {
        match self {
            Scene::Live => Scene::Calibration,
            Scene::Calibration => Scene::Live,
        }
    }
}

impl std::fmt::Display for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scene::Live => write!(f, "live"),
            Scene::Calibration => write!(f, "calibration"),
        }
    }
}

/// Preview renderer capability the core depends on
pub trait Renderer {
    /// Bring up the preview surface. Failure is fatal to the run.
    fn start(&mut self, config: &RunConfig) -> Result<(), RenderError>;

    /// Tear the preview down and bring it back up with a different scene
    fn restart(&mut self, scene: Scene);

    /// Currently active scene
    fn scene(&self) -> Scene;

    /// Render the current frame and write the encoded image into `sink`
    fn capture_to_stream(&mut self, sink: &mut dyn Write) -> Result<(), RenderError>;

    /// Render the current frame into an owned pixel buffer
    fn capture_to_buffer(&mut self) -> Result<FrameBuffer, RenderError>;

    /// Release the preview surface; idempotent
    fn stop(&mut self);
}

/// CPU-composited renderer over a camera pipeline
pub struct HeadlessRenderer<C: CameraPipeline> {
    camera: C,
    scene: Scene,
    width: u32,
    height: u32,
    quality: u8,
    add_raw: bool,
    running: bool,
}

impl<C: CameraPipeline> HeadlessRenderer<C> {
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            scene: Scene::default(),
            width: 0,
            height: 0,
            quality: 0,
            add_raw: false,
            running: false,
        }
    }

    /// Give the camera pipeline back for teardown after [`Renderer::stop`]
    pub fn into_camera(self) -> C {
        self.camera
    }

    /// Checkerboard pattern matching what the calibration scene shader draws
    fn calibration_pattern(&self) -> FrameBuffer {
        const SQUARE: u32 = 32;
        let mut frame = FrameBuffer::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let on = ((x / SQUARE) + (y / SQUARE)) % 2 == 0;
                let v = if on { 0xff } else { 0x00 };
                frame.set_pixel(
                    x,
                    y,
                    Rgba {
                        r: v,
                        g: v,
                        b: v,
                        a: 0xff,
                    },
                );
            }
        }
        frame
    }
}

impl<C: CameraPipeline> Renderer for HeadlessRenderer<C> {
    fn start(&mut self, config: &RunConfig) -> Result<(), RenderError> {
        if config.width == 0 || config.height == 0 {
            return Err(RenderError::StartFailed(format!(
                "invalid preview size {}x{}",
                config.width, config.height
            )));
        }
        self.width = config.width;
        self.height = config.height;
        self.quality = config.quality;
        self.add_raw = config.add_raw;
        self.running = true;
        info!(scene = %self.scene, "Renderer started");
        Ok(())
    }

    fn restart(&mut self, scene: Scene) {
        self.scene = scene;
        info!(scene = %self.scene, "Renderer restarted");
    }

    fn scene(&self) -> Scene {
        self.scene
    }

    fn capture_to_stream(&mut self, sink: &mut dyn Write) -> Result<(), RenderError> {
        let frame = self.capture_to_buffer()?;

        // JPEG carries no alpha channel, drop it before encoding.
        let rgb: Vec<u8> = frame
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut encoder = JpegEncoder::new_with_quality(&mut *sink, self.quality);
        encoder
            .encode(&rgb, frame.width(), frame.height(), ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::EncodingFailed(e.to_string()))?;

        if self.add_raw {
            sink.write_all(frame.as_bytes())
                .map_err(|e| RenderError::CaptureFailed(e.to_string()))?;
        }

        debug!(
            width = frame.width(),
            height = frame.height(),
            scene = %self.scene,
            "Frame captured to stream"
        );
        Ok(())
    }

    fn capture_to_buffer(&mut self) -> Result<FrameBuffer, RenderError> {
        if !self.running {
            return Err(RenderError::CaptureFailed("renderer not running".to_string()));
        }
        match self.scene {
            Scene::Live => self
                .camera
                .grab_frame()
                .map_err(|e| RenderError::CaptureFailed(e.to_string())),
            Scene::Calibration => Ok(self.calibration_pattern()),
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!("Renderer stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{CameraConfig, SimulatedCamera};
    use crate::config::AdvanceMode;

    fn test_config() -> RunConfig {
        RunConfig {
            width: 64,
            height: 48,
            quality: 85,
            add_raw: false,
            output: None,
            link: None,
            verbose: false,
            advance_mode: AdvanceMode::FreeRun,
        }
    }

    fn started_renderer() -> HeadlessRenderer<SimulatedCamera> {
        let config = test_config();
        let mut camera = SimulatedCamera::new();
        camera
            .configure(&CameraConfig {
                width: config.width,
                height: config.height,
                quality: config.quality,
            })
            .unwrap();
        let mut renderer = HeadlessRenderer::new(camera);
        renderer.start(&config).unwrap();
        renderer
    }

    #[test]
    fn scene_toggles_both_ways() {
        assert_eq!(Scene::Live.toggled(), Scene::Calibration);
        assert_eq!(Scene::Calibration.toggled(), Scene::Live);
    }

    #[test]
    fn capture_before_start_fails() {
        let mut renderer = HeadlessRenderer::new(SimulatedCamera::new());
        assert!(renderer.capture_to_buffer().is_err());
    }

    #[test]
    fn capture_to_stream_emits_jpeg() {
        let mut renderer = started_renderer();
        let mut out = Vec::new();
        renderer.capture_to_stream(&mut out).unwrap();
        // JPEG SOI marker
        assert_eq!(&out[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn raw_toggle_appends_pixel_data() {
        let config = RunConfig {
            add_raw: true,
            ..test_config()
        };
        let mut camera = SimulatedCamera::new();
        camera
            .configure(&CameraConfig {
                width: config.width,
                height: config.height,
                quality: config.quality,
            })
            .unwrap();
        let mut renderer = HeadlessRenderer::new(camera);
        renderer.start(&config).unwrap();

        let mut out = Vec::new();
        renderer.capture_to_stream(&mut out).unwrap();
        let raw_len = 64 * 48 * 4;
        assert!(out.len() > raw_len);
    }

    #[test]
    fn calibration_scene_renders_checkerboard() {
        let mut renderer = started_renderer();
        renderer.restart(Scene::Calibration);
        let frame = renderer.capture_to_buffer().unwrap();
        let white = frame.get_pixel(0, 0).unwrap();
        let black = frame.get_pixel(32, 0).unwrap();
        assert_eq!(white.r, 0xff);
        assert_eq!(black.r, 0x00);
    }
}
