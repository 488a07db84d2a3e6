//! Threshold filtration with two deliberately different rules.
//!
//! The two strategies are not two implementations of one rule; they
//! binarize by different criteria and both mutate the raster they are
//! given in place:
//!
//! - [`threshold_bytes`] sweeps the raw byte buffer: every byte at or
//!   below the threshold becomes 0, every other byte 255 - all channels
//!   uniformly, alpha included.
//! - [`threshold_pixels`] walks pixels by coordinate and applies a color
//!   rule to the decoded R, G, B channels: any channel strictly below
//!   the threshold makes the pixel pure black, otherwise pure white,
//!   with alpha forced opaque.
//!
//! Both accept a [`Frame`] because a decoding collaborator may hand over
//! an image that is not raster-backed; in that case a fresh raster of
//! matching dimensions is returned instead of mutating what the caller
//! still owns.

use crate::error::{OpError, OpResult};
use crate::raster::{Frame, PixelFormat, Raster};

/// Per-byte threshold over the entire buffer, in place.
///
/// Applies `byte <= value ? 0 : 255` to every byte of the backing
/// buffer, row padding included - the sweep does not interpret pixel
/// boundaries at all. The raster handed in through the frame is mutated
/// and returned; its buffer allocation is reused, never copied.
///
/// A [`Frame::Deferred`] input yields a fresh default-initialized raster
/// of matching dimensions instead.
pub fn threshold_bytes(frame: Frame, value: u8) -> Raster {
    let mut raster = match frame {
        Frame::Raster(raster) => raster,
        Frame::Deferred {
            width,
            height,
            format,
        } => return Raster::new(width, height, format),
    };

    for byte in raster.bytes_mut() {
        *byte = if *byte <= value { 0 } else { 255 };
    }

    raster
}

/// Per-pixel color threshold, in place.
///
/// Walks the raster column by column and rewrites each pixel through its
/// decoded color channels: if any of R, G or B is strictly less than
/// `value`, the pixel becomes pure black, otherwise pure white. Alpha,
/// where present, is forced opaque either way.
///
/// Premultiplied buffers are rejected with `UnsupportedFormat`: their
/// channel bytes are alpha-scaled rather than decoded color values, so
/// the rule would misclassify them. Convert with
/// [`Raster::convert`](crate::Raster::convert) first.
///
/// A [`Frame::Deferred`] input yields a fresh default-initialized raster
/// of matching dimensions instead.
pub fn threshold_pixels(frame: Frame, value: u8) -> OpResult<Raster> {
    let mut raster = match frame {
        Frame::Raster(raster) => raster,
        Frame::Deferred {
            width,
            height,
            format,
        } => return Ok(Raster::new(width, height, format)),
    };

    if raster.format() == PixelFormat::Bgra8Premultiplied {
        return Err(OpError::UnsupportedFormat(raster.format()));
    }

    let has_alpha = raster.format().has_alpha();
    for x in 0..raster.width() {
        for y in 0..raster.height() {
            let pixel = raster.pixel_mut(x, y);
            let (b, g, r) = (pixel[0], pixel[1], pixel[2]);
            let level = if r < value || b < value || g < value {
                0
            } else {
                255
            };
            pixel[0] = level;
            pixel[1] = level;
            pixel[2] = level;
            if has_alpha {
                pixel[3] = 255;
            }
        }
    }

    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_maps_each_byte_uniformly() {
        let mut raster = Raster::new(2, 1, PixelFormat::Bgra8);
        raster.pixel_mut(0, 0).copy_from_slice(&[100, 200, 128, 60]);
        raster.pixel_mut(1, 0).copy_from_slice(&[129, 0, 255, 200]);

        let out = threshold_bytes(Frame::Raster(raster), 128);

        // 100 and 128 are at or below the threshold, 200 is above -
        // and the alpha bytes get the exact same treatment.
        assert_eq!(out.pixel(0, 0), &[0, 255, 0, 0]);
        assert_eq!(out.pixel(1, 0), &[255, 0, 255, 255]);
    }

    #[test]
    fn test_bytes_threshold_extremes() {
        let mut raster = Raster::new(1, 1, PixelFormat::Bgra8);
        raster.pixel_mut(0, 0).copy_from_slice(&[0, 1, 254, 255]);

        // Every byte is <= 255.
        let out = threshold_bytes(Frame::Raster(raster.clone()), 255);
        assert_eq!(out.pixel(0, 0), &[0, 0, 0, 0]);

        // Only exact zeros are <= 0.
        let out = threshold_bytes(Frame::Raster(raster), 0);
        assert_eq!(out.pixel(0, 0), &[0, 255, 255, 255]);
    }

    #[test]
    fn test_bytes_reuses_the_input_buffer() {
        let raster = Raster::new(8, 8, PixelFormat::Bgra8);
        let buffer_ptr = raster.bytes().as_ptr();

        let out = threshold_bytes(Frame::Raster(raster), 128);
        assert_eq!(out.bytes().as_ptr(), buffer_ptr);
    }

    #[test]
    fn test_bytes_sweeps_row_padding() {
        // 1x2 raster with 4 padding bytes per row, padding set to 7.
        let pixels = vec![200, 200, 200, 200, 7, 7, 7, 7, 100, 100, 100, 100, 7, 7, 7, 7];
        let raster = Raster::with_stride(1, 2, 8, PixelFormat::Bgra8, pixels).unwrap();

        let out = threshold_bytes(Frame::Raster(raster), 128);
        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
        assert_eq!(out.pixel(0, 1), &[0, 0, 0, 0]);
        // The raw sweep does not stop at the row's pixel data.
        assert_eq!(&out.bytes()[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_pixels_any_channel_below_goes_black() {
        let mut raster = Raster::new(2, 1, PixelFormat::Bgra8);
        // BGRA: R = 100 drags the pixel to black even though G and B pass.
        raster.pixel_mut(0, 0).copy_from_slice(&[200, 200, 100, 77]);
        // All channels at or above the threshold: white.
        raster.pixel_mut(1, 0).copy_from_slice(&[200, 200, 200, 77]);

        let out = threshold_pixels(Frame::Raster(raster), 128).unwrap();
        assert_eq!(out.pixel(0, 0), &[0, 0, 0, 255]);
        assert_eq!(out.pixel(1, 0), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_pixels_comparison_is_strict() {
        let mut raster = Raster::new(1, 1, PixelFormat::Bgra8);
        raster.pixel_mut(0, 0).copy_from_slice(&[128, 128, 128, 0]);

        // 128 is not strictly below 128, so the pixel is white - and
        // the alpha channel is forced opaque.
        let out = threshold_pixels(Frame::Raster(raster), 128).unwrap();
        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_pixels_on_opaque_format() {
        let mut raster = Raster::new(2, 2, PixelFormat::Bgr8);
        raster.pixel_mut(0, 0).copy_from_slice(&[10, 200, 200]);
        raster.pixel_mut(1, 1).copy_from_slice(&[200, 200, 200]);

        let out = threshold_pixels(Frame::Raster(raster), 128).unwrap();
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(out.pixel(1, 1), &[255, 255, 255]);
    }

    #[test]
    fn test_pixels_reuses_the_input_buffer() {
        let raster = Raster::new(8, 8, PixelFormat::Bgra8);
        let buffer_ptr = raster.bytes().as_ptr();

        let out = threshold_pixels(Frame::Raster(raster), 128).unwrap();
        assert_eq!(out.bytes().as_ptr(), buffer_ptr);
    }

    #[test]
    fn test_pixels_leaves_row_padding_alone() {
        let pixels = vec![200, 200, 200, 200, 7, 7, 7, 7];
        let raster = Raster::with_stride(1, 1, 8, PixelFormat::Bgra8, pixels).unwrap();

        let out = threshold_pixels(Frame::Raster(raster), 128).unwrap();
        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
        // Coordinate addressing never touches the padding.
        assert_eq!(&out.bytes()[4..8], &[7, 7, 7, 7]);
    }

    #[test]
    fn test_pixels_rejects_premultiplied() {
        let raster = Raster::new(2, 2, PixelFormat::Bgra8Premultiplied);
        let result = threshold_pixels(Frame::Raster(raster), 128);
        assert!(matches!(result, Err(OpError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_deferred_fallback_allocates_blank() {
        let deferred = Frame::Deferred {
            width: 5,
            height: 3,
            format: PixelFormat::Bgra8,
        };

        let out = threshold_bytes(deferred.clone(), 128);
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 3);
        assert!(out.bytes().iter().all(|&b| b == 0));

        let out = threshold_pixels(deferred, 128).unwrap();
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 3);
        assert!(out.bytes().iter().all(|&b| b == 0));
    }
}
