// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture tool
//!
//! Failures fall into two buckets the pipeline treats differently:
//! fatal errors (malformed filename pattern, camera/renderer start failure)
//! abort the run, while per-frame I/O failures are logged and the loop moves
//! on to the next scheduling decision.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Top-level application error
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera pipeline errors
    Camera(CameraError),
    /// Preview renderer errors
    Render(RenderError),
    /// Output filename pattern could not be expanded
    Pattern(PatternError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera pipeline errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera device present
    NoCameraFound,
    /// Port/component configuration failed
    ConfigurationFailed(String),
    /// Camera disconnected during operation
    Disconnected,
}

/// Preview renderer errors
#[derive(Debug, Clone)]
pub enum RenderError {
    /// Renderer failed to start (GPU context, surface, or scene setup)
    StartFailed(String),
    /// Framebuffer capture failed
    CaptureFailed(String),
    /// Image encoding failed
    EncodingFailed(String),
}

/// Filename pattern errors
///
/// Always fatal: a pattern that cannot be expanded for one frame cannot be
/// trusted for any later frame either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `%` conversion other than a frame-number placeholder was found
    UnsupportedConversion(String),
    /// The pattern ends with a dangling `%`
    TruncatedConversion,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Render(e) => write!(f, "Render error: {}", e),
            AppError::Pattern(e) => write!(f, "Filename pattern error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::ConfigurationFailed(msg) => {
                write!(f, "Camera configuration failed: {}", msg)
            }
            CameraError::Disconnected => write!(f, "Camera disconnected"),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::StartFailed(msg) => write!(f, "Failed to start renderer: {}", msg),
            RenderError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            RenderError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnsupportedConversion(conv) => {
                write!(f, "unsupported conversion '{}'", conv)
            }
            PatternError::TruncatedConversion => write!(f, "pattern ends with a dangling '%'"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RenderError {}
impl std::error::Error for PatternError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl From<PatternError> for AppError {
    fn from(err: PatternError) -> Self {
        AppError::Pattern(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}
