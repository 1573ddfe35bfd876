// SPDX-License-Identifier: GPL-3.0-only

//! Still-capture pipeline
//!
//! Per-frame contract:
//!
//! 1. derive the temp/final filename pair for the frame — a pattern error
//!    is fatal and aborts the run;
//! 2. a destination of `-` bypasses filenames and renames entirely and
//!    streams straight to stdout;
//! 3. a destination that fails to open is a per-frame soft failure: warn
//!    and move on to the next scheduling decision;
//! 4. a capture failure is logged but the opened stream is still finalized,
//!    so whatever was written goes through the same temp-then-rename path;
//! 5. name allocations are per-frame locals, released before the next
//!    iteration, keeping at most one pair in flight.

use crate::config::RunConfig;
use crate::errors::AppResult;
use crate::gpu::Renderer;
use crate::output::{self, FilenamePair};
use crate::scheduler::FrameScheduler;
use crate::shutdown::ShutdownFlag;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, error, info, warn};

/// Orchestrates schedule → capture → finalize until the scheduler or the
/// shutdown flag stops the run
pub struct CapturePipeline<'a> {
    config: &'a RunConfig,
}

impl<'a> CapturePipeline<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Drive the main loop.
    ///
    /// Returns `Err` only for fatal conditions (filename pattern errors);
    /// per-frame I/O failures are logged and the loop keeps going.
    pub fn run(
        &self,
        scheduler: &mut FrameScheduler,
        renderer: &mut dyn Renderer,
        shutdown: &ShutdownFlag,
    ) -> AppResult<()> {
        loop {
            if shutdown.is_requested() {
                info!("Shutdown requested, leaving capture loop");
                return Ok(());
            }
            if !scheduler.advance(renderer) {
                info!(frames = scheduler.frame(), "Scheduler signalled stop");
                return Ok(());
            }
            self.capture_frame(renderer, scheduler.frame())?;
        }
    }

    /// Run one capture cycle for `frame`
    fn capture_frame(&self, renderer: &mut dyn Renderer, frame: u64) -> AppResult<()> {
        let Some(pattern) = self.config.output.as_deref() else {
            // Preview-only run: schedule frames but write nothing.
            debug!(frame, "No output configured, skipping write");
            return Ok(());
        };

        if self.config.writes_to_stdout() {
            return self.capture_to_stdout(renderer, frame);
        }

        // A malformed pattern cannot be recovered from mid-run.
        let pair = FilenamePair::derive(pattern, frame)?;

        let file = match File::create(&pair.temp_name) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    path = %pair.temp_name,
                    error = %e,
                    "Failed to open destination, skipping frame"
                );
                return Ok(());
            }
        };
        let mut writer = BufWriter::new(file);

        if let Err(e) = renderer.capture_to_stream(&mut writer) {
            // Finalization is unconditional once the stream opened; the
            // partial file still goes through temp-then-rename.
            error!(frame, path = %pair.temp_name, error = %e, "Capture failed");
        }

        output::finalize(writer, &pair, self.config.link.as_deref(), frame);
        Ok(())
    }

    fn capture_to_stdout(&self, renderer: &mut dyn Renderer, frame: u64) -> AppResult<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.capture_to_sink(renderer, frame, &mut lock);
        Ok(())
    }

    /// Stream the frame straight into `sink`: no filename generation and no
    /// rename step. Capture failures are per-frame and recoverable.
    fn capture_to_sink(&self, renderer: &mut dyn Renderer, frame: u64, sink: &mut dyn Write) {
        if let Err(e) = renderer.capture_to_stream(sink) {
            error!(frame, error = %e, "Capture to byte stream failed");
        }
        if let Err(e) = sink.flush() {
            error!(frame, error = %e, "Failed to flush byte stream");
        }
    }
}
