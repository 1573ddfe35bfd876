// SPDX-License-Identifier: GPL-3.0-only

//! Durable output management
//!
//! Every frame is written to a temp name and renamed to its final name only
//! after the stream has been flushed and closed, so an observer polling the
//! output path never sees a partially written file. An optional "latest"
//! link is updated the same way: hard link to a temp name (symlink fallback
//! for cross-filesystem or permission cases), then rename over the link name.
//!
//! Rename and link failures are recoverable: they are logged with the OS
//! error and the run continues. A failed rename leaves the temp file on disk
//! for manual recovery; it is never deleted or truncated here.

use crate::constants::TEMP_SUFFIX;
use crate::errors::PatternError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::{debug, error, info, warn};

/// Final/temp filename pair for one frame
///
/// Derived deterministically from the output pattern and the frame counter.
/// At most one pair is in flight (unfinalized) per process at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePair {
    pub final_name: String,
    pub temp_name: String,
}

impl FilenamePair {
    /// Derive the pair for a frame from a filename pattern
    pub fn derive(pattern: &str, frame: u64) -> Result<Self, PatternError> {
        let final_name = expand_pattern(pattern, frame)?;
        let temp_name = format!("{}{}", final_name, TEMP_SUFFIX);
        Ok(Self {
            final_name,
            temp_name,
        })
    }
}

/// Final/temp link-name pair, materialized only when a link pattern is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub final_link: String,
    pub temp_link: String,
}

impl LinkTarget {
    /// Derive the link pair for a frame, using the same pattern rules as
    /// [`FilenamePair::derive`]
    pub fn derive(pattern: &str, frame: u64) -> Result<Self, PatternError> {
        let final_link = expand_pattern(pattern, frame)?;
        let temp_link = format!("{}{}", final_link, TEMP_SUFFIX);
        Ok(Self {
            final_link,
            temp_link,
        })
    }
}

/// Expand a filename pattern for a frame number.
///
/// Supports `%d`, `%u` and width/zero-pad forms like `%04d`, plus `%%` for a
/// literal percent. A pattern without any placeholder is returned verbatim:
/// every frame then overwrites the same final name, by design.
pub fn expand_pattern(pattern: &str, frame: u64) -> Result<String, PatternError> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(_) => {
                let mut spec = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        spec.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match chars.next() {
                    Some('d') | Some('u') => {
                        out.push_str(&format_frame(&spec, frame));
                    }
                    Some(conv) => {
                        spec.push(conv);
                        return Err(PatternError::UnsupportedConversion(format!("%{}", spec)));
                    }
                    None => return Err(PatternError::TruncatedConversion),
                }
            }
            None => return Err(PatternError::TruncatedConversion),
        }
    }

    Ok(out)
}

/// Format a frame number per the width/pad spec between `%` and the conversion
fn format_frame(spec: &str, frame: u64) -> String {
    if spec.is_empty() {
        return frame.to_string();
    }
    let zero_pad = spec.starts_with('0');
    let width: usize = spec.trim_start_matches('0').parse().unwrap_or(0);
    if zero_pad {
        format!("{:0width$}", frame, width = width)
    } else {
        format!("{:width$}", frame, width = width)
    }
}

/// Flush and close the open stream, then move the frame into place.
///
/// The stream is closed before the rename so every buffered byte reaches the
/// temp file first; renaming an unflushed file would not be atomic with
/// respect to content. Errors past this point are per-frame and recoverable.
pub fn finalize(
    writer: BufWriter<File>,
    pair: &FilenamePair,
    link_pattern: Option<&str>,
    frame: u64,
) {
    close_stream(writer, &pair.temp_name);

    match fs::rename(&pair.temp_name, &pair.final_name) {
        Ok(()) => {
            info!(frame, path = %pair.final_name, "Frame finalized");
        }
        Err(e) => {
            // Temp file is intentionally left behind for manual recovery.
            error!(
                from = %pair.temp_name,
                to = %pair.final_name,
                error = %e,
                "Failed to rename temp file"
            );
        }
    }

    if let Some(pattern) = link_pattern {
        update_latest_link(&pair.final_name, pattern, frame);
    }
}

fn close_stream(mut writer: BufWriter<File>, path: &str) {
    if let Err(e) = writer.flush() {
        error!(path = %path, error = %e, "Failed to flush output stream");
    }
    drop(writer);
}

/// Point the "latest" link at the most recently finalized frame.
///
/// Three-step chain: hard link final → temp link (symlink fallback), then
/// rename temp link → link name. Every failure here is logged and the run
/// continues; the already-renamed image is never rolled back.
fn update_latest_link(final_name: &str, link_pattern: &str, frame: u64) {
    let target = match LinkTarget::derive(link_pattern, frame) {
        Ok(target) => target,
        Err(e) => {
            error!(pattern = %link_pattern, error = %e, "Failed to derive link names");
            return;
        }
    };

    if let Err(e) = create_link(final_name, &target.temp_link) {
        error!(
            target = %final_name,
            link = %target.temp_link,
            error = %e,
            "Failed to create latest link"
        );
        return;
    }

    match fs::rename(&target.temp_link, &target.final_link) {
        Ok(()) => debug!(link = %target.final_link, target = %final_name, "Latest link updated"),
        Err(e) => {
            error!(
                from = %target.temp_link,
                to = %target.final_link,
                error = %e,
                "Failed to rename latest link"
            );
        }
    }
}

/// Hard link `target` at `link_path`, falling back to a symlink.
///
/// A stale temp link from an earlier failed chain is removed first, since
/// link creation fails if the path already exists.
fn create_link(target: &str, link_path: &str) -> std::io::Result<()> {
    if let Err(e) = fs::remove_file(link_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!(path = %link_path, error = %e, "Could not remove stale temp link");
        }
    }

    match fs::hard_link(target, link_path) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(
                target = %target,
                link = %link_path,
                error = %e,
                "Hard link failed, falling back to symlink"
            );
            symlink(target, link_path)
        }
    }
}

#[cfg(unix)]
fn symlink(target: &str, link_path: &str) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(not(unix))]
fn symlink(_target: &str, _link_path: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symbolic links not supported on this platform",
    ))
}
