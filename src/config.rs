// SPDX-License-Identifier: GPL-3.0-only

//! Run configuration
//!
//! [`RunConfig`] is built once at startup from the command line and is
//! read-only for the rest of the process. It is passed by reference into
//! every entry point; there is no ambient global state.

use crate::constants::STDOUT_SENTINEL;
use std::time::Duration;

/// Frame-advance policy for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceMode {
    /// Block on operator keypress before every frame; 'x'/'X' exits
    Interactive,
    /// Capture at a fixed interval after an initial warm-up delay
    Timelapse { interval: Duration },
    /// Capture continuously with a short fixed pause between frames
    FreeRun,
}

/// Immutable per-process configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Capture width in pixels
    pub width: u32,
    /// Capture height in pixels
    pub height: u32,
    /// JPEG quality (0-100)
    pub quality: u8,
    /// Append the raw sensor frame after the encoded image
    pub add_raw: bool,
    /// Output filename pattern; may contain one frame-number placeholder
    /// (`%d` / `%0Nd`). `-` streams to stdout. `None` disables file output.
    pub output: Option<String>,
    /// "Latest" link pattern; `None` disables the link
    pub link: Option<String>,
    /// Verbose diagnostics on stderr
    pub verbose: bool,
    /// Frame-advance policy
    pub advance_mode: AdvanceMode,
}

impl RunConfig {
    /// Whether output is the stdout byte stream rather than a file.
    ///
    /// In this mode no filenames are generated and no rename happens.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_deref() == Some(STDOUT_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_sentinel_detected() {
        let config = RunConfig {
            width: 640,
            height: 480,
            quality: 85,
            add_raw: false,
            output: Some("-".to_string()),
            link: None,
            verbose: false,
            advance_mode: AdvanceMode::FreeRun,
        };
        assert!(config.writes_to_stdout());
    }

    #[test]
    fn file_pattern_is_not_stdout() {
        let config = RunConfig {
            width: 640,
            height: 480,
            quality: 85,
            add_raw: false,
            output: Some("img-%04d.jpg".to_string()),
            link: None,
            verbose: true,
            advance_mode: AdvanceMode::FreeRun,
        };
        assert!(!config.writes_to_stdout());
    }
}
