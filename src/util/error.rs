//! Error types for leafmatch.
//!
//! Each failure domain has its own enum so callers can decide what is fatal:
//! decode and dataset errors abort the surrounding operation, while score
//! errors are absorbed per record by the matcher.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for leafmatch operations.
pub type LeafMatchResult<T> = std::result::Result<T, LeafMatchError>;

/// Malformed or absent image input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The sample buffer is shorter than the declared geometry needs.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The sample buffer is longer than the declared geometry allows.
    #[error("buffer too large: expected {expected}, got {got}")]
    BufferTooLarge { expected: usize, got: usize },
    /// Only three-channel color input can be normalized.
    #[error("unsupported channel count: {channels}")]
    UnsupportedChannels { channels: usize },
    /// The codec rejected the byte stream.
    #[error("image decode failed: {reason}")]
    Codec { reason: String },
}

/// Geometrically invalid comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Resampling to a zero-sized target was requested.
    #[error("invalid resize target: {width}x{height}")]
    InvalidResizeTarget { width: usize, height: usize },
    /// An input is smaller than one comparison window.
    #[error("{width}x{height} image is smaller than the {window}x{window} comparison window")]
    WindowTooLarge {
        window: usize,
        width: usize,
        height: usize,
    },
    /// The window size cannot produce a sample covariance.
    #[error("invalid comparison window: {window}")]
    InvalidWindow { window: usize },
    /// Both inputs must share dimensions once resampled.
    #[error("shape mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    ShapeMismatch {
        a_width: usize,
        a_height: usize,
        b_width: usize,
        b_height: usize,
    },
}

/// Malformed reference metadata or inaccessible storage.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("metadata file not found: {}", path.display())]
    MetadataNotFound { path: PathBuf },
    #[error("failed to read metadata {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },
    #[error("metadata must contain '{column}' column")]
    MissingColumn { column: &'static str },
    #[error("cannot list image directory {}: {reason}", path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },
}

/// Failure reported by a notification transport.
///
/// These never affect the match outcome.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("invalid notifier configuration: {reason}")]
    Configuration { reason: String },
    #[error("invalid address: {reason}")]
    Address { reason: String },
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },
    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

/// Errors that can occur when running leafmatch operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LeafMatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    /// Thresholds must be finite and within `[0, 1]`.
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_error_names_both_sizes() {
        let err = ScoreError::WindowTooLarge {
            window: 7,
            width: 4,
            height: 9,
        };
        assert_eq!(
            err.to_string(),
            "4x9 image is smaller than the 7x7 comparison window"
        );
    }

    #[test]
    fn umbrella_is_transparent() {
        let err: LeafMatchError = DatasetError::MissingColumn { column: "label" }.into();
        assert_eq!(err.to_string(), "metadata must contain 'label' column");
        assert!(matches!(err, LeafMatchError::Dataset(_)));
    }
}
