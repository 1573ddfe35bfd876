// SPDX-License-Identifier: GPL-3.0-only

//! stillcam - still-image capture with a live GPU preview
//!
//! This library holds the core of the capture tool:
//!
//! - [`scheduler`]: frame-advance state machine (keypress, timelapse,
//!   free-run)
//! - [`pipelines`]: per-frame capture orchestration
//! - [`output`]: durable temp-then-rename output and the "latest" link
//! - [`backends`]: camera pipeline abstraction
//! - [`gpu`]: preview renderer abstraction and scenes
//! - [`config`]: immutable run configuration
//! - [`shutdown`]: signal-driven orderly termination

pub mod backends;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gpu;
pub mod output;
pub mod pipelines;
pub mod scheduler;
pub mod shutdown;

// Re-export commonly used types
pub use backends::camera::{CameraConfig, CameraPipeline, FrameBuffer, SimulatedCamera};
pub use config::{AdvanceMode, RunConfig};
pub use errors::{AppError, AppResult};
pub use gpu::{HeadlessRenderer, Renderer, Scene};
pub use output::{FilenamePair, LinkTarget};
pub use pipelines::CapturePipeline;
pub use scheduler::FrameScheduler;
pub use shutdown::ShutdownFlag;
