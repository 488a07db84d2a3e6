//! Error types shared by the raster operations.

use thiserror::Error;

use crate::raster::PixelFormat;

/// Errors signaled by raster operations.
#[derive(Debug, Error)]
pub enum OpError {
    /// A crop region that collapsed to zero size after clamping, or was
    /// requested with a zero dimension.
    #[error("invalid crop region: {0}")]
    InvalidRegion(String),

    /// A parameter outside its valid range, such as a non-finite
    /// rotation angle or a stride smaller than one pixel row.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation cannot process the raster's pixel format.
    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(PixelFormat),
}

/// Result alias used across the crate.
pub type OpResult<T> = Result<T, OpError>;
