// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines
//!
//! One pipeline today: still capture. Each loop iteration opens a
//! destination, asks the renderer for the current frame, and hands the
//! written temp file to the output manager for atomic finalization.

pub mod capture;

pub use capture::CapturePipeline;
