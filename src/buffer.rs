//! Decoded raster storage.
//!
//! A [`PixelBuffer`] owns interleaved `u8` samples in `(height, width, channels)`
//! order, the same layout the filters index as `image[[y, x, c]]`. Supported
//! layouts:
//!
//! | Channels | Layout |
//! |----------|--------|
//! | 1 | Grayscale |
//! | 2 | Grayscale + alpha |
//! | 3 | RGB |
//! | 4 | RGBA |
//!
//! Buffers also carry a logical `bounds` rectangle. Effects never change it;
//! [`PixelBuffer::export`] can crop the samples back to it before the result
//! is handed to an encoder.

use ndarray::{Array3, ArrayView3};

use crate::error::{EffectError, Result};

/// Largest channel count a buffer may carry (RGBA).
pub const MAX_CHANNELS: usize = 4;

/// Rectangle in sample coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge, `None` if it does not fit in `usize`.
    pub fn right(&self) -> Option<usize> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` if it does not fit in `usize`.
    pub fn bottom(&self) -> Option<usize> {
        self.y.checked_add(self.height)
    }

    /// True when the rectangle lies inside a `width x height` grid.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        matches!(self.right(), Some(r) if r <= width)
            && matches!(self.bottom(), Some(b) if b <= height)
    }
}

/// Options applied when a buffer is prepared for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    /// Crop everything outside the logical bounds.
    pub clip_to_bounds: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
    bounds: Rect,
}

fn validate_layout(width: usize, height: usize, channels: usize) -> Result<()> {
    if width == 0 {
        return Err(EffectError::invalid("width", "must be greater than 0"));
    }
    if height == 0 {
        return Err(EffectError::invalid("height", "must be greater than 0"));
    }
    if channels == 0 || channels > MAX_CHANNELS {
        return Err(EffectError::invalid(
            "channels",
            format!("must be between 1 and {MAX_CHANNELS}, got {channels}"),
        ));
    }
    Ok(())
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        validate_layout(width, height, channels)?;
        Ok(Self::from_valid(Array3::<u8>::zeros((height, width, channels))))
    }

    /// Wrap interleaved samples (row-major, channels innermost).
    pub fn from_raw(width: usize, height: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        validate_layout(width, height, channels)?;
        let expected = width * height * channels;
        if samples.len() != expected {
            return Err(EffectError::invalid(
                "samples",
                format!(
                    "expected {expected} samples for {width}x{height}x{channels}, got {}",
                    samples.len()
                ),
            ));
        }
        let data = Array3::from_shape_vec((height, width, channels), samples)
            .map_err(|e| EffectError::invalid("samples", e.to_string()))?;
        Ok(Self::from_valid(data))
    }

    /// Take ownership of an `(height, width, channels)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        validate_layout(width, height, channels)?;
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self::from_valid(data))
    }

    /// Build a buffer by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        validate_layout(width, height, channels)?;
        let data = Array3::from_shape_fn((height, width, channels), |(y, x, c)| f(x, y, c));
        Ok(Self::from_valid(data))
    }

    fn from_valid(data: Array3<u8>) -> Self {
        let (height, width, _) = data.dim();
        PixelBuffer {
            data,
            bounds: Rect::new(0, 0, width, height),
        }
    }

    /// Assemble an effect result with the same shape and bounds as `like`.
    pub(crate) fn assemble(like: &PixelBuffer, samples: Vec<u8>) -> Result<Self> {
        let data = Array3::from_shape_vec(like.data.dim(), samples).map_err(|e| {
            EffectError::processing(format!("cannot assemble output buffer: {e}"))
        })?;
        Ok(PixelBuffer {
            data,
            bounds: like.bounds,
        })
    }

    /// Restrict the logical bounds to `bounds`.
    pub fn with_bounds(mut self, bounds: Rect) -> Result<Self> {
        if bounds.is_empty() {
            return Err(EffectError::invalid("bounds", "must not be empty"));
        }
        if !bounds.fits_within(self.width(), self.height()) {
            return Err(EffectError::invalid(
                "bounds",
                format!(
                    "{bounds:?} exceeds the {}x{} sample grid",
                    self.width(),
                    self.height()
                ),
            ));
        }
        self.bounds = bounds;
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// Channels excluding a trailing alpha channel.
    pub fn color_channels(&self) -> usize {
        if self.has_alpha() {
            self.channels() - 1
        } else {
            self.channels()
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self.channels(), 2 | 4)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Samples per row.
    pub fn row_len(&self) -> usize {
        self.width() * self.channels()
    }

    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// Sample at `(x, y)` in `channel`.
    ///
    /// Panics when the coordinate is outside the sample grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[[y, x, channel]]
    }

    /// Overwrite a sample. Panics when the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: u8) {
        self.data[[y, x, channel]] = value;
    }

    pub fn as_array(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved samples, row-major.
    pub fn into_raw_vec(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    /// Copy of the samples inside the logical bounds.
    pub fn clipped(&self) -> PixelBuffer {
        let Rect {
            x: x0,
            y: y0,
            width,
            height,
        } = self.bounds;
        let data = Array3::from_shape_fn((height, width, self.channels()), |(y, x, c)| {
            self.data[[y + y0, x + x0, c]]
        });
        Self::from_valid(data)
    }

    /// Buffer to hand to an encoder.
    pub fn export(&self, options: SaveOptions) -> PixelBuffer {
        if options.clip_to_bounds {
            self.clipped()
        } else {
            self.clone()
        }
    }
}
