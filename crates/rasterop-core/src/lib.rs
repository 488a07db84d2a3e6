//! Rasterop Core - pixel-level raster operations.
//!
//! Three stateless operations over an in-memory [`Raster`] - cropping,
//! rotation and threshold filtration - each implemented by two competing
//! strategies so callers can compare their correctness and performance
//! trade-offs:
//!
//! - crop: [`crop_clamped`] shrinks an out-of-bounds request to the
//!   available extent; [`crop_canvas`] keeps the requested size and pads
//!   with the canvas default.
//! - rotate: [`rotate_smooth`] resamples with a cubic kernel onto a
//!   truncated bounding box; [`rotate_fast`] samples nearest-neighbor
//!   onto a rounded one and short-circuits zero angles.
//! - threshold: [`threshold_bytes`] sweeps the raw buffer uniformly;
//!   [`threshold_pixels`] applies a color rule per decoded pixel. Both
//!   mutate the given raster in place.
//!
//! The strategy is always selected explicitly by the caller; nothing is
//! dispatched on the input at runtime. Decoding and encoding image files
//! is the business of external collaborators - the interop seam is
//! [`Raster::from_rgba_image`] and friends.

pub mod canvas;
pub mod crop;
pub mod error;
pub mod raster;
pub mod rotate;
pub mod threshold;

pub use canvas::Interpolation;
pub use crop::{crop_canvas, crop_clamped};
pub use error::{OpError, OpResult};
pub use raster::{Frame, PixelFormat, Raster};
pub use rotate::{rotate_fast, rotate_smooth, rotated_bounds};
pub use threshold::{threshold_bytes, threshold_pixels};
