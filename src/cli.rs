// SPDX-License-Identifier: GPL-3.0-only

//! Command-line interface
//!
//! Parses flags into an immutable [`RunConfig`]. `--help` prints usage and
//! exits before any camera or renderer initialization; a bad flag exits with
//! clap's standard usage status.

use crate::config::{AdvanceMode, RunConfig};
use crate::constants::{
    DEFAULT_HEIGHT, DEFAULT_QUALITY, DEFAULT_TIMELAPSE_INTERVAL, DEFAULT_WIDTH,
};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "stillcam")]
#[command(about = "Capture still images from an SBC camera module with a live GPU preview")]
#[command(version)]
pub struct Cli {
    /// Capture width in pixels
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Capture height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// JPEG quality (0-100)
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUALITY)]
    pub quality: u8,

    /// Append raw sensor data after the encoded image
    #[arg(short = 'r', long)]
    pub raw: bool,

    /// Output filename pattern. May contain one frame-number placeholder
    /// (e.g. "img-%04d.jpg"); without a placeholder every frame overwrites
    /// the same file. Use "-" to stream to stdout.
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Keep a "latest" link pointing at the most recently completed frame
    #[arg(short = 'l', long = "latest")]
    pub link: Option<String>,

    /// Verbose diagnostics on stderr (ignored when streaming to stdout)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Wait for a keypress before each capture ('x' or 'X' exits)
    #[arg(short = 'k', long)]
    pub keypress: bool,

    /// Capture a frame every N milliseconds instead of free-running
    #[arg(short = 't', long = "timelapse", value_name = "MS", conflicts_with = "keypress")]
    pub timelapse_ms: Option<u64>,
}

impl Cli {
    /// Build the immutable run configuration from parsed flags.
    ///
    /// Verbosity is force-disabled when output is the stdout sentinel so
    /// diagnostics can never corrupt the image byte stream.
    pub fn into_config(self) -> RunConfig {
        let advance_mode = if self.keypress {
            AdvanceMode::Interactive
        } else if let Some(ms) = self.timelapse_ms {
            let interval = if ms == 0 {
                DEFAULT_TIMELAPSE_INTERVAL
            } else {
                Duration::from_millis(ms)
            };
            AdvanceMode::Timelapse { interval }
        } else {
            AdvanceMode::FreeRun
        };

        let stdout_mode = self.output.as_deref() == Some(crate::constants::STDOUT_SENTINEL);

        RunConfig {
            width: self.width,
            height: self.height,
            quality: self.quality.min(100),
            add_raw: self.raw,
            output: self.output,
            link: self.link,
            verbose: self.verbose && !stdout_mode,
            advance_mode,
        }
    }
}
