//! Image rotation with competing fidelity and throughput strategies.
//!
//! Both strategies share the same geometry. The angle is taken as-is -
//! no modulo normalization, so negative angles and angles beyond 360
//! flow through the same trigonometry. The destination bounding box is
//! the minimal axis-aligned box containing the rotated rectangle:
//!
//! ```text
//! new_w = w * |cos| + h * |sin|
//! new_h = w * |sin| + h * |cos|
//! ```
//!
//! and the source is resampled through the inverse of "rotate about the
//! source center, recenter on the new canvas". Positive angles rotate
//! clockwise in y-down raster coordinates.
//!
//! The strategies differ in rounding, resampling and shortcuts:
//!
//! - [`rotate_smooth`] truncates the bounding box and resamples with a
//!   Catmull-Rom cubic kernel, blending edges toward the canvas default.
//! - [`rotate_fast`] rounds the bounding box to the nearest pixel,
//!   samples nearest-neighbor with no blending, and returns a plain copy
//!   for a zero angle without any transform work.

use crate::canvas::{Canvas, Interpolation, RotateTransform};
use crate::error::{OpError, OpResult};
use crate::raster::Raster;

fn checked_angle(angle_degrees: f32) -> OpResult<f64> {
    if !angle_degrees.is_finite() {
        return Err(OpError::InvalidParameter(format!(
            "rotation angle must be finite, got {angle_degrees}"
        )));
    }
    Ok((angle_degrees as f64).to_radians())
}

fn bounds(width: u32, height: u32, radians: f64) -> (f64, f64) {
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    let w = width as f64;
    let h = height as f64;
    (w * cos + h * sin, w * sin + h * cos)
}

/// Bounding box of the rotated source rectangle, rounded to the nearest
/// pixel.
///
/// The absolute values of sine and cosine make the box symmetric in the
/// angle's sign and quadrant: an angle and its negation, or an angle and
/// `angle + 360`, produce the same box.
///
/// # Example
///
/// ```
/// use rasterop_core::rotate::rotated_bounds;
///
/// // A 90-degree rotation swaps the dimensions.
/// let (w, h) = rotated_bounds(100, 50, 90.0);
/// assert_eq!(w, 50);
/// assert_eq!(h, 100);
/// ```
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f32) -> (u32, u32) {
    let radians = (angle_degrees as f64).to_radians();
    let (w, h) = bounds(width, height, radians);
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Fidelity-first rotation.
///
/// Cubic resampling of every channel onto a bounding box sized by
/// truncation. Out-of-bounds taps read as transparent/black, so the
/// rotated edges blend out instead of aliasing. There is no zero-angle
/// shortcut: at 0 degrees the transform reduces to the identity and the
/// output is pixel-identical to the source.
///
/// Returns `InvalidParameter` for a non-finite angle.
pub fn rotate_smooth(source: &Raster, angle_degrees: f32) -> OpResult<Raster> {
    let radians = checked_angle(angle_degrees)?;
    let (w, h) = bounds(source.width(), source.height(), radians);
    let dst_w = (w as u32).max(1);
    let dst_h = (h as u32).max(1);

    let mut dest = Raster::new(dst_w, dst_h, source.format());
    {
        let mut canvas = Canvas::for_raster(&mut dest);
        canvas.draw_transformed(
            source,
            RotateTransform::new(source, dst_w, dst_h, angle_degrees),
            Interpolation::Cubic,
        );
    }
    Ok(dest)
}

/// Throughput-first rotation.
///
/// Nearest-neighbor sampling onto a bounding box sized by rounding to
/// the nearest pixel, no blending. A zero angle short-circuits and
/// returns a copy of the source without any transform work.
///
/// Returns `InvalidParameter` for a non-finite angle.
pub fn rotate_fast(source: &Raster, angle_degrees: f32) -> OpResult<Raster> {
    checked_angle(angle_degrees)?;
    if angle_degrees == 0.0 {
        return Ok(source.clone());
    }

    let (dst_w, dst_h) = rotated_bounds(source.width(), source.height(), angle_degrees);
    let mut dest = Raster::new(dst_w, dst_h, source.format());
    {
        let mut canvas = Canvas::for_raster(&mut dest);
        canvas.draw_transformed(
            source,
            RotateTransform::new(source, dst_w, dst_h, angle_degrees),
            Interpolation::Nearest,
        );
    }
    Ok(dest)
}
