//! Region extraction with competing clamp-and-shrink and
//! pad-with-default strategies.
//!
//! Both strategies copy the overlapping region byte for byte and
//! preserve the source pixel format; they disagree, deliberately, on
//! requests that reach past the source:
//!
//! - [`crop_clamped`] shrinks the request to the available extent and
//!   fails when nothing is left.
//! - [`crop_canvas`] keeps the requested size and leaves the
//!   out-of-bounds area at the canvas default (transparent/black).
//!
//! The divergence is an observable design difference between the two
//! techniques, not something to unify.

use crate::canvas::Canvas;
use crate::error::{OpError, OpResult};
use crate::raster::Raster;

/// Clamp-and-shrink crop.
///
/// `width` and `height` may exceed the remaining source extent; they are
/// clamped to it, so the output can be smaller than requested. Returns
/// `InvalidRegion` when the clamped region is empty - a zero requested
/// dimension, or an origin at or past the source edge.
pub fn crop_clamped(
    source: &Raster,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> OpResult<Raster> {
    let clamped_w = width.min(source.width().saturating_sub(x));
    let clamped_h = height.min(source.height().saturating_sub(y));
    if clamped_w == 0 || clamped_h == 0 {
        return Err(OpError::InvalidRegion(format!(
            "region {width}x{height} at ({x}, {y}) leaves no pixels inside a {}x{} source",
            source.width(),
            source.height()
        )));
    }

    let bpp = source.format().bytes_per_pixel();
    let mut dest = Raster::new(clamped_w, clamped_h, source.format());
    for row in 0..clamped_h as usize {
        let src_off = (y as usize + row) * source.stride() + x as usize * bpp;
        let dst_off = row * dest.stride();
        let n = clamped_w as usize * bpp;
        dest.bytes_mut()[dst_off..dst_off + n]
            .copy_from_slice(&source.bytes()[src_off..src_off + n]);
    }
    Ok(dest)
}

/// Canvas-composite crop.
///
/// Allocates a canvas of the *requested* size, default-initialized to
/// transparent/black, and draws the overlapping source sub-rectangle
/// onto its origin through a scoped drawing context. A region reaching
/// past the source keeps the requested size, with the out-of-bounds
/// area left at the default; only a zero requested dimension is
/// `InvalidRegion`.
pub fn crop_canvas(
    source: &Raster,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> OpResult<Raster> {
    if width == 0 || height == 0 {
        return Err(OpError::InvalidRegion(format!(
            "requested region {width}x{height} is empty"
        )));
    }

    let mut dest = Raster::new(width, height, source.format());
    {
        let mut canvas = Canvas::for_raster(&mut dest);
        canvas.draw_region(source, x, y, width, height);
    }
    Ok(dest)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
