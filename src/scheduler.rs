// SPDX-License-Identifier: GPL-3.0-only

//! Frame-advance scheduler
//!
//! Decides when the next frame is captured. Three policies:
//!
//! - **Interactive**: block on a line of operator input; a line starting
//!   with 'x' or 'X' stops the run, anything else captures and toggles the
//!   preview scene first.
//! - **Timelapse**: a long warm-up delay before frame 0 (auto-exposure
//!   settle), then the configured interval. Never self-terminates.
//! - **Free-run**: a short fixed pause, never self-terminates.
//!
//! The frame counter advances by exactly one per [`FrameScheduler::advance`]
//! call, on the stop path too (counter-then-decide), which keeps filename
//! numbering predictable even when a capture later fails.

use crate::config::AdvanceMode;
use crate::constants::{FREE_RUN_DELAY, TIMELAPSE_WARMUP};
use crate::gpu::Renderer;
use std::io::BufRead;
use std::time::Duration;
use tracing::{info, warn};

/// Delay applied before the scheduling decision for `frame`.
///
/// Pure so the warm-up/interval selection is testable without sleeping.
/// Interactive mode has no delay: it blocks on input instead.
pub fn delay_for_frame(mode: &AdvanceMode, frame: u64) -> Option<Duration> {
    match mode {
        AdvanceMode::Interactive => None,
        AdvanceMode::Timelapse { interval } => {
            if frame == 0 {
                Some(TIMELAPSE_WARMUP)
            } else {
                Some(*interval)
            }
        }
        AdvanceMode::FreeRun => Some(FREE_RUN_DELAY),
    }
}

/// Frame-advance state machine
pub struct FrameScheduler {
    mode: AdvanceMode,
    frame: u64,
    input: Box<dyn BufRead + Send>,
}

impl FrameScheduler {
    /// Scheduler reading operator input from stdin
    pub fn new(mode: AdvanceMode) -> Self {
        Self::with_input(mode, Box::new(std::io::BufReader::new(std::io::stdin())))
    }

    /// Scheduler with an injected input source (tests)
    pub fn with_input(mode: AdvanceMode, input: Box<dyn BufRead + Send>) -> Self {
        Self {
            mode,
            frame: 0,
            input,
        }
    }

    /// Frame counter value; the index of the most recent decision
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Make one scheduling decision.
    ///
    /// Returns `true` to capture the next frame, `false` to stop the run.
    /// Increments the frame counter exactly once either way. In interactive
    /// mode a capture decision also toggles the preview scene and restarts
    /// the renderer before returning.
    pub fn advance(&mut self, renderer: &mut dyn Renderer) -> bool {
        if let Some(delay) = delay_for_frame(&self.mode, self.frame) {
            std::thread::sleep(delay);
        }

        match self.mode {
            AdvanceMode::Interactive => {
                let mut line = String::new();
                let read = self.input.read_line(&mut line);
                self.frame += 1;
                match read {
                    Ok(0) => {
                        info!("End of operator input, stopping");
                        false
                    }
                    Ok(_) => {
                        if line.starts_with(['x', 'X']) {
                            info!(frame = self.frame, "Operator requested exit");
                            false
                        } else {
                            let scene = renderer.scene().toggled();
                            renderer.restart(scene);
                            true
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read operator input, stopping");
                        false
                    }
                }
            }
            AdvanceMode::Timelapse { .. } | AdvanceMode::FreeRun => {
                self.frame += 1;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::constants::DEFAULT_TIMELAPSE_INTERVAL;
    use crate::errors::RenderError;
    use crate::gpu::Scene;
    use std::io::Cursor;

    /// Records restarts so interactive scene toggling can be asserted
    struct RecordingRenderer {
        scene: Scene,
        restarts: Vec<Scene>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                scene: Scene::Live,
                restarts: Vec::new(),
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn start(&mut self, _config: &RunConfig) -> Result<(), RenderError> {
            Ok(())
        }

        fn restart(&mut self, scene: Scene) {
            self.scene = scene;
            self.restarts.push(scene);
        }

        fn scene(&self) -> Scene {
            self.scene
        }

        fn capture_to_stream(
            &mut self,
            _sink: &mut dyn std::io::Write,
        ) -> Result<(), RenderError> {
            Ok(())
        }

        fn capture_to_buffer(
            &mut self,
        ) -> Result<crate::backends::camera::FrameBuffer, RenderError> {
            Err(RenderError::CaptureFailed("not implemented".to_string()))
        }

        fn stop(&mut self) {}
    }

    fn interactive(input: &str) -> FrameScheduler {
        FrameScheduler::with_input(
            AdvanceMode::Interactive,
            Box::new(Cursor::new(input.as_bytes().to_vec())),
        )
    }

    #[test]
    fn keypress_captures_and_toggles_scene() {
        let mut scheduler = interactive("\n\n");
        let mut renderer = RecordingRenderer::new();

        assert!(scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), 1);
        assert_eq!(renderer.restarts, vec![Scene::Calibration]);

        assert!(scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), 2);
        assert_eq!(renderer.restarts, vec![Scene::Calibration, Scene::Live]);
    }

    #[test]
    fn exit_keypress_stops_but_still_counts() {
        let mut scheduler = interactive("X\n");
        let mut renderer = RecordingRenderer::new();

        assert!(!scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), 1);
        assert!(renderer.restarts.is_empty());
    }

    #[test]
    fn lowercase_exit_also_stops() {
        let mut scheduler = interactive("xyz\n");
        let mut renderer = RecordingRenderer::new();
        assert!(!scheduler.advance(&mut renderer));
    }

    #[test]
    fn exit_key_must_be_first_character() {
        // A line that merely contains 'x' after leading whitespace is an
        // ordinary capture keypress, not an exit request.
        let mut scheduler = interactive(" x\n");
        let mut renderer = RecordingRenderer::new();

        assert!(scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), 1);
        assert_eq!(renderer.restarts, vec![Scene::Calibration]);
    }

    #[test]
    fn end_of_input_stops() {
        let mut scheduler = interactive("");
        let mut renderer = RecordingRenderer::new();
        assert!(!scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), 1);
    }

    #[test]
    fn timelapse_applies_warmup_then_interval() {
        let mode = AdvanceMode::Timelapse {
            interval: DEFAULT_TIMELAPSE_INTERVAL,
        };
        assert_eq!(delay_for_frame(&mode, 0), Some(TIMELAPSE_WARMUP));
        assert_eq!(delay_for_frame(&mode, 1), Some(DEFAULT_TIMELAPSE_INTERVAL));
        assert_eq!(delay_for_frame(&mode, 2), Some(DEFAULT_TIMELAPSE_INTERVAL));
    }

    #[test]
    fn free_run_uses_short_fixed_delay() {
        assert_eq!(delay_for_frame(&AdvanceMode::FreeRun, 0), Some(FREE_RUN_DELAY));
        assert_eq!(delay_for_frame(&AdvanceMode::FreeRun, 100), Some(FREE_RUN_DELAY));
    }

    #[test]
    fn interactive_has_no_timed_delay() {
        assert_eq!(delay_for_frame(&AdvanceMode::Interactive, 0), None);
    }

    #[test]
    fn free_run_always_continues() {
        let mut scheduler = FrameScheduler::with_input(
            AdvanceMode::FreeRun,
            Box::new(Cursor::new(Vec::new())),
        );
        let mut renderer = RecordingRenderer::new();
        for expected in 1..=3 {
            assert!(scheduler.advance(&mut renderer));
            assert_eq!(scheduler.frame(), expected);
        }
    }
}
