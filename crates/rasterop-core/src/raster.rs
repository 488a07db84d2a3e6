//! Core raster types: pixel formats, the [`Raster`] buffer, and the
//! [`Frame`] handed over by decoding collaborators.
//!
//! A `Raster` owns a contiguous byte buffer of exactly `stride * height`
//! bytes, where `stride >= width * bytes_per_pixel` and may include row
//! padding. Pixel (x, y) occupies the `bytes_per_pixel` bytes starting at
//! `y * stride + x * bytes_per_pixel`.

use serde::{Deserialize, Serialize};

use crate::error::{OpError, OpResult};

/// Pixel layout of a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 32-bit straight-alpha BGRA.
    #[default]
    Bgra8,
    /// 32-bit premultiplied-alpha BGRA.
    Bgra8Premultiplied,
    /// 24-bit opaque BGR, what alpha-less sources such as JPEG decode to.
    Bgr8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Bgra8Premultiplied => 4,
            PixelFormat::Bgr8 => 3,
        }
    }

    /// Whether the format carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        !matches!(self, PixelFormat::Bgr8)
    }
}

/// An in-memory pixel buffer with explicit width, height, stride and
/// pixel format.
#[derive(Debug, Clone)]
pub struct Raster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) stride: usize,
    pub(crate) format: PixelFormat,
    pub(crate) buf: Vec<u8>,
}

impl Raster {
    /// Allocate a zeroed raster (transparent for alpha formats, black
    /// otherwise) with a tight stride. Dimensions must be nonzero.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        debug_assert!(
            width > 0 && height > 0,
            "raster dimensions must be nonzero"
        );
        let stride = width as usize * format.bytes_per_pixel();
        Raster {
            width,
            height,
            stride,
            format,
            buf: vec![0; stride * height as usize],
        }
    }

    /// Wrap an existing tight-stride pixel buffer.
    pub fn from_vec(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> OpResult<Self> {
        let stride = width as usize * format.bytes_per_pixel();
        Self::with_stride(width, height, stride, format, pixels)
    }

    /// Wrap an existing pixel buffer with an explicit row stride.
    ///
    /// The buffer must hold exactly `stride * height` bytes and the
    /// stride must cover at least one row of pixels.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> OpResult<Self> {
        if width == 0 || height == 0 {
            return Err(OpError::InvalidParameter(format!(
                "raster dimensions {width}x{height} must be nonzero"
            )));
        }
        if stride < width as usize * format.bytes_per_pixel() {
            return Err(OpError::InvalidParameter(format!(
                "stride {stride} is smaller than a row of {width} {format:?} pixels"
            )));
        }
        if pixels.len() != stride * height as usize {
            return Err(OpError::InvalidParameter(format!(
                "buffer holds {} bytes, expected stride {stride} * height {height}",
                pixels.len()
            )));
        }
        Ok(Raster {
            width,
            height,
            stride,
            format,
            buf: pixels,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including any padding.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel layout of the buffer.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole byte buffer, padding included.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Mutable access to the whole byte buffer, padding included.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.stride + x as usize * self.format.bytes_per_pixel()
    }

    /// Borrow the bytes of pixel (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let off = self.offset(x, y);
        &self.buf[off..off + self.format.bytes_per_pixel()]
    }

    /// Mutably borrow the bytes of pixel (x, y).
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let bpp = self.format.bytes_per_pixel();
        let off = self.offset(x, y);
        &mut self.buf[off..off + bpp]
    }

    /// Reinterpret the pixels in another format, premultiplying,
    /// unpremultiplying, or adding/dropping alpha as needed.
    ///
    /// Converting to the current format returns a plain copy; otherwise
    /// the converted raster has a tight stride.
    pub fn convert(&self, target: PixelFormat) -> Raster {
        if target == self.format {
            return self.clone();
        }
        let mut dest = Raster::new(self.width, self.height, target);
        for y in 0..self.height {
            for x in 0..self.width {
                let [b, g, r, a] = self.decode(x, y);
                let out = dest.pixel_mut(x, y);
                match target {
                    PixelFormat::Bgra8 => out.copy_from_slice(&[b, g, r, a]),
                    PixelFormat::Bgra8Premultiplied => out.copy_from_slice(&[
                        premultiply(b, a),
                        premultiply(g, a),
                        premultiply(r, a),
                        a,
                    ]),
                    PixelFormat::Bgr8 => out.copy_from_slice(&[b, g, r]),
                }
            }
        }
        dest
    }

    /// Decode pixel (x, y) to straight-alpha BGRA channel values.
    fn decode(&self, x: u32, y: u32) -> [u8; 4] {
        let px = self.pixel(x, y);
        match self.format {
            PixelFormat::Bgra8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8Premultiplied => {
                let a = px[3];
                [
                    unpremultiply(px[0], a),
                    unpremultiply(px[1], a),
                    unpremultiply(px[2], a),
                    a,
                ]
            }
            PixelFormat::Bgr8 => [px[0], px[1], px[2], 255],
        }
    }

    /// Build a straight-alpha raster from a decoded RGBA buffer.
    pub fn from_rgba_image(image: image::RgbaImage) -> Raster {
        let (width, height) = image.dimensions();
        let mut raster = Raster::new(width, height, PixelFormat::Bgra8);
        for (pixel, src) in raster.buf.chunks_exact_mut(4).zip(image.pixels()) {
            let image::Rgba([r, g, b, a]) = *src;
            pixel.copy_from_slice(&[b, g, r, a]);
        }
        raster
    }

    /// Build an opaque raster from a decoded RGB buffer (e.g. a JPEG).
    pub fn from_rgb_image(image: image::RgbImage) -> Raster {
        let (width, height) = image.dimensions();
        let mut raster = Raster::new(width, height, PixelFormat::Bgr8);
        for (pixel, src) in raster.buf.chunks_exact_mut(3).zip(image.pixels()) {
            let image::Rgb([r, g, b]) = *src;
            pixel.copy_from_slice(&[b, g, r]);
        }
        raster
    }

    /// Convert to an RGBA buffer for the encoding collaborator.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let straight = self.convert(PixelFormat::Bgra8);
        let mut pixels =
            Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..straight.height {
            for x in 0..straight.width {
                let px = straight.pixel(x, y);
                pixels.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, pixels)
    }
}

#[inline]
fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 127) / 255) as u8
}

#[inline]
fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    if alpha == 0 {
        return 0;
    }
    ((channel as u32 * 255 + alpha as u32 / 2) / alpha as u32).min(255) as u8
}

/// An image handed over by a decoding collaborator.
///
/// Most decoders produce a materialized [`Raster`]; some hand back a
/// deferred reference that only knows its dimensions until pixels are
/// requested. Operations that mutate in place take a `Frame` so they can
/// fall back to allocating instead of mutating what isn't theirs.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A materialized raster the receiving operation may mutate.
    Raster(Raster),
    /// A reference whose pixels were never materialized.
    Deferred {
        width: u32,
        height: u32,
        format: PixelFormat,
    },
}

impl Frame {
    /// Width and height of the underlying image.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Raster(raster) => (raster.width, raster.height),
            Frame::Deferred { width, height, .. } => (*width, *height),
        }
    }

    /// Pixel layout of the underlying image.
    pub fn format(&self) -> PixelFormat {
        match self {
            Frame::Raster(raster) => raster.format,
            Frame::Deferred { format, .. } => *format,
        }
    }
}

impl From<Raster> for Frame {
    fn from(raster: Raster) -> Self {
        Frame::Raster(raster)
    }
}
