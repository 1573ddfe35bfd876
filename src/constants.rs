// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Default capture width in pixels (full sensor width on the v1 module)
pub const DEFAULT_WIDTH: u32 = 2592;

/// Default capture height in pixels
pub const DEFAULT_HEIGHT: u32 = 1944;

/// Default JPEG quality (0-100)
pub const DEFAULT_QUALITY: u8 = 85;

/// Suffix appended to a final filename to build its temp name.
///
/// Must be non-empty: the temp name and final name are never allowed to
/// collide, otherwise the rename step would lose its atomicity guarantee.
pub const TEMP_SUFFIX: &str = "~";

/// Sentinel filename that routes capture output to stdout
pub const STDOUT_SENTINEL: &str = "-";

/// Warm-up delay before the first timelapse frame, giving auto-exposure
/// time to settle before anything is written to disk
pub const TIMELAPSE_WARMUP: Duration = Duration::from_millis(2000);

/// Default delay between timelapse frames after warm-up
pub const DEFAULT_TIMELAPSE_INTERVAL: Duration = Duration::from_millis(500);

/// Pause between frames in free-run mode (~30 fps ceiling)
pub const FREE_RUN_DELAY: Duration = Duration::from_millis(30);
