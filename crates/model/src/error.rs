//! Definition validation errors

use thiserror::Error;

/// Errors raised while constructing definition values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("grid dimensions must be positive: {width}x{height}x{depth}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        depth: usize,
    },

    #[error("run count must be positive")]
    InvalidRuns,

    #[error("pixel size must be positive")]
    InvalidPixelSize,
}
