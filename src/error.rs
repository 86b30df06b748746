//! Error types for world generation.

use std::path::PathBuf;

/// Errors raised while configuring a generator or exporting its results.
///
/// `generate()` itself cannot fail; everything here is either a bad
/// configuration caught at construction or an I/O problem at the edges.
#[derive(Debug, thiserror::Error)]
pub enum WorldGenError {
    /// The world must be at least one cell wide.
    #[error("world size must be positive, got {0}")]
    InvalidWorldSize(usize),

    /// A setting is outside the range the pipeline can work with.
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// Failed to read a settings file from disk.
    #[error("failed to read settings from {}: {}", .path.display(), .source)]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a settings file.
    #[error("failed to parse settings from {}: {}", .path.display(), .source)]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize or write a settings file.
    #[error("failed to write settings to {}: {}", .path.display(), .reason)]
    ConfigWrite { path: PathBuf, reason: String },

    /// Failed to encode or save a raster image.
    #[error("failed to export image: {0}")]
    Image(#[from] image::ImageError),

    /// Generic filesystem failure while exporting.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorldGenError>;
