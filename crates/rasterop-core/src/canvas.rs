//! Scoped drawing context over a destination raster.
//!
//! [`Canvas`] is the drawing seam shared by rotation and canvas-composite
//! cropping. It holds a mutable borrow of the destination for the
//! duration of a drawing scope and releases it when dropped, so every
//! early return releases the destination too.
//!
//! Drawing through a transform uses inverse mapping: for each pixel in
//! the destination, the transform yields the source coordinates that
//! feed it, and a sampler turns those (usually non-integer) coordinates
//! into channel values.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Resampling method used when drawing through a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Nearest-neighbor sampling - fastest, no blending.
    #[default]
    Nearest,
    /// Catmull-Rom cubic sampling - high quality, blends edges out.
    Cubic,
}

/// Inverse mapping from destination pixels back to source coordinates
/// for a rotation about the source center, recentered on the
/// destination canvas.
///
/// Positive angles rotate clockwise in y-down raster coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RotateTransform {
    cos: f64,
    sin: f64,
    dst_cx: f64,
    dst_cy: f64,
    src_cx: f64,
    src_cy: f64,
}

impl RotateTransform {
    pub(crate) fn new(source: &Raster, dst_w: u32, dst_h: u32, angle_degrees: f32) -> Self {
        let radians = (angle_degrees as f64).to_radians();
        RotateTransform {
            cos: radians.cos(),
            sin: radians.sin(),
            dst_cx: dst_w as f64 / 2.0,
            dst_cy: dst_h as f64 / 2.0,
            src_cx: source.width() as f64 / 2.0,
            src_cy: source.height() as f64 / 2.0,
        }
    }

    /// Source coordinates feeding the center of destination pixel
    /// (dst_x, dst_y). A zero angle maps every pixel onto itself.
    #[inline]
    fn source_point(&self, dst_x: u32, dst_y: u32) -> (f64, f64) {
        let dx = dst_x as f64 + 0.5 - self.dst_cx;
        let dy = dst_y as f64 + 0.5 - self.dst_cy;
        // Inverse of "rotate by angle, recenter": rotate back by -angle.
        let sx = dx * self.cos + dy * self.sin + self.src_cx - 0.5;
        let sy = -dx * self.sin + dy * self.cos + self.src_cy - 0.5;
        (sx, sy)
    }
}

/// A drawing scope over a destination raster.
pub(crate) struct Canvas<'a> {
    dest: &'a mut Raster,
}

impl<'a> Canvas<'a> {
    pub(crate) fn for_raster(dest: &'a mut Raster) -> Self {
        Canvas { dest }
    }

    /// Copy the source sub-rectangle at (x, y) of the given size onto
    /// the destination origin, 1:1. The part of the rectangle that falls
    /// outside the source is not drawn; those destination pixels keep
    /// their current value.
    pub(crate) fn draw_region(&mut self, source: &Raster, x: u32, y: u32, width: u32, height: u32) {
        debug_assert_eq!(source.format(), self.dest.format());
        let bpp = source.format().bytes_per_pixel();
        let copy_w = width
            .min(source.width().saturating_sub(x))
            .min(self.dest.width()) as usize;
        let copy_h = height
            .min(source.height().saturating_sub(y))
            .min(self.dest.height()) as usize;

        for row in 0..copy_h {
            let src_off = (y as usize + row) * source.stride() + x as usize * bpp;
            let dst_off = row * self.dest.stride();
            let n = copy_w * bpp;
            self.dest.bytes_mut()[dst_off..dst_off + n]
                .copy_from_slice(&source.bytes()[src_off..src_off + n]);
        }
    }

    /// Resample the source through the inverse transform into every
    /// destination pixel.
    pub(crate) fn draw_transformed(
        &mut self,
        source: &Raster,
        transform: RotateTransform,
        interpolation: Interpolation,
    ) {
        debug_assert_eq!(source.format(), self.dest.format());
        let bpp = source.format().bytes_per_pixel();

        for dst_y in 0..self.dest.height() {
            for dst_x in 0..self.dest.width() {
                let (sx, sy) = transform.source_point(dst_x, dst_y);
                let sample = match interpolation {
                    Interpolation::Nearest => sample_nearest(source, sx, sy),
                    Interpolation::Cubic => sample_cubic(source, sx, sy),
                };
                self.dest
                    .pixel_mut(dst_x, dst_y)
                    .copy_from_slice(&sample[..bpp]);
            }
        }
    }
}

/// Sample the nearest source pixel, or the default (transparent/black)
/// when the point falls outside the source.
fn sample_nearest(source: &Raster, x: f64, y: f64) -> [u8; 4] {
    let px = x.round();
    let py = y.round();
    if px < 0.0 || py < 0.0 || px >= source.width() as f64 || py >= source.height() as f64 {
        return [0; 4];
    }
    let mut out = [0u8; 4];
    let bpp = source.format().bytes_per_pixel();
    out[..bpp].copy_from_slice(source.pixel(px as u32, py as u32));
    out
}

/// Sample a 4x4 Catmull-Rom neighborhood around the point. Taps outside
/// the source read as transparent/black, so content blends toward the
/// canvas default at the edges.
fn sample_cubic(source: &Raster, x: f64, y: f64) -> [u8; 4] {
    let w = source.width() as i64;
    let h = source.height() as i64;
    if x <= -2.0 || y <= -2.0 || x >= (w + 1) as f64 || y >= (h + 1) as f64 {
        return [0; 4];
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let mut sum = [0.0f64; 4];

    for ky in -1i64..=2 {
        let py = y0 as i64 + ky;
        let wy = cubic_weight(y - (y0 + ky as f64));
        if py < 0 || py >= h || wy == 0.0 {
            continue;
        }
        for kx in -1i64..=2 {
            let px = x0 as i64 + kx;
            let wx = cubic_weight(x - (x0 + kx as f64));
            if px < 0 || px >= w || wx == 0.0 {
                continue;
            }
            let weight = wx * wy;
            let pixel = source.pixel(px as u32, py as u32);
            for (acc, &channel) in sum.iter_mut().zip(pixel) {
                *acc += channel as f64 * weight;
            }
        }
    }

    let mut out = [0u8; 4];
    for (slot, acc) in out.iter_mut().zip(sum) {
        *slot = acc.clamp(0.0, 255.0).round() as u8;
    }
    out
}

/// Catmull-Rom kernel weight.
///
/// ```text
/// w(t) =  1.5|t|^3 - 2.5|t|^2 + 1           for |t| < 1
/// w(t) = -0.5|t|^3 + 2.5|t|^2 - 4|t| + 2    for 1 <= |t| < 2
/// w(t) =  0                                 otherwise
/// ```
///
/// Interpolating: w(0) = 1 and w(t) = 0 at every other integer, so
/// samples at integer coordinates reproduce the pixel exactly.
fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t < 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}
