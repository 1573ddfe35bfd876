// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use std::process::ExitCode;
use stillcam::backends::camera::{CameraConfig, CameraPipeline};
use stillcam::cli::Cli;
use stillcam::config::RunConfig;
use stillcam::errors::{AppError, AppResult};
use stillcam::gpu::{HeadlessRenderer, Renderer};
use stillcam::pipelines::CapturePipeline;
use stillcam::scheduler::FrameScheduler;
use stillcam::shutdown::{self, ShutdownFlag};
use stillcam::SimulatedCamera;
use tracing::{error, info};

fn main() -> ExitCode {
    // Usage errors and --help exit here, before any camera or renderer
    // initialization.
    let config = Cli::parse().into_config();

    init_logging(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr.
///
/// Set RUST_LOG to override the level, e.g. RUST_LOG=debug or
/// RUST_LOG=stillcam=debug. Diagnostics go to stderr so the stdout
/// byte-stream mode stays clean; RunConfig has already forced verbosity off
/// for that mode.
fn init_logging(config: &RunConfig) {
    let default_filter = if config.verbose {
        "stillcam=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn run(config: &RunConfig) -> AppResult<()> {
    let shutdown = ShutdownFlag::new();
    shutdown::install_signal_handlers(&shutdown)
        .map_err(|e| AppError::Other(format!("Failed to install signal handler: {}", e)))?;

    // Acquisition order: camera first, then the preview renderer on top of
    // it. Teardown below mirrors it in reverse.
    let mut camera = SimulatedCamera::new();
    camera.configure(&CameraConfig {
        width: config.width,
        height: config.height,
        quality: config.quality,
    })?;

    let mut renderer = HeadlessRenderer::new(camera);
    if let Err(e) = renderer.start(config) {
        renderer.into_camera().teardown();
        return Err(e.into());
    }

    info!(
        width = config.width,
        height = config.height,
        mode = ?config.advance_mode,
        "Starting capture loop"
    );

    let mut scheduler = FrameScheduler::new(config.advance_mode);
    let pipeline = CapturePipeline::new(config);
    let result = pipeline.run(&mut scheduler, &mut renderer, &shutdown);

    renderer.stop();
    renderer.into_camera().teardown();

    result
}
