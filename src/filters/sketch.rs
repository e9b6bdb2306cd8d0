//! Pencil sketch.
//!
//! Grayscale, blur the inverted grayscale, then color-dodge the original
//! grayscale by the blurred inverse:
//!
//! ```text
//! blurred_inverse = blur(255 - gray)
//! result = min(255, gray * 255 / (255 - blurred_inverse))
//! ```
//!
//! Flat regions dodge to white; strokes survive where the blurred plane
//! differs from the local intensity.

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::{EffectError, Result};

use super::blur::GaussianBlur;
use super::core::sigma_for_kernel;
use super::grayscale::{broadcast_plane, intensity_plane};

#[derive(Debug, Clone, PartialEq)]
pub struct PencilSketch {
    blur_factor: usize,
    blur: GaussianBlur,
}

impl PencilSketch {
    /// # Arguments
    /// * `blur_factor` - Stroke softness, >= 1. The blur kernel spans
    ///   `2 * blur_factor + 1` taps.
    pub fn new(blur_factor: usize) -> Result<Self> {
        if blur_factor == 0 {
            return Err(EffectError::invalid("blur_factor", "must be at least 1"));
        }
        let kernel_size = blur_factor
            .checked_mul(2)
            .and_then(|k| k.checked_add(1))
            .ok_or_else(|| {
                EffectError::invalid("blur_factor", format!("{blur_factor} is too large"))
            })?;
        let blur = GaussianBlur::new(kernel_size, sigma_for_kernel(kernel_size))?;
        Ok(PencilSketch { blur_factor, blur })
    }

    pub fn blur_factor(&self) -> usize {
        self.blur_factor
    }

    /// Blur applied to the inverted grayscale plane.
    pub fn blur(&self) -> &GaussianBlur {
        &self.blur
    }
}

/// Color-dodge blend of one sample.
#[inline]
pub fn color_dodge(base: u8, blend: u8) -> u8 {
    if blend == 255 {
        return 255;
    }
    (base as u32 * 255 / (255 - blend as u32)).min(255) as u8
}

impl Effect for PencilSketch {
    fn name(&self) -> &'static str {
        "pencil"
    }

    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let gray = intensity_plane(image, channel)?;
        let inverted: Vec<u8> = gray.iter().map(|&v| 255 - v).collect();
        let inverted = PixelBuffer::from_raw(image.width(), image.height(), 1, inverted)?;
        let blurred = self.blur.apply(&inverted, ChannelSelector::All)?.into_raw_vec();

        let sketch: Vec<u8> = gray
            .iter()
            .zip(blurred.iter())
            .map(|(&g, &b)| color_dodge(g, b))
            .collect();

        broadcast_plane(image, &sketch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_blur_factor() {
        assert!(PencilSketch::new(0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_rejects_overflowing_blur_factor() {
        for blur_factor in [usize::MAX / 2 + 1, usize::MAX] {
            let err = PencilSketch::new(blur_factor).unwrap_err();
            match err {
                EffectError::InvalidParameter { name, .. } => assert_eq!(name, "blur_factor"),
                other => panic!("unexpected error {other:?}"),
            }
        }
        // Fits in usize but not in memory
        assert!(PencilSketch::new(usize::MAX / 2).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_derived_kernel() {
        let pencil = PencilSketch::new(3).unwrap();
        assert_eq!(pencil.blur().kernel_size(), 7);
        assert!((pencil.blur().sigma() - 7.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_dodge() {
        assert_eq!(color_dodge(100, 255), 255);
        assert_eq!(color_dodge(0, 0), 0);
        assert_eq!(color_dodge(100, 0), 100);
        assert_eq!(color_dodge(100, 155), 255);
        assert_eq!(color_dodge(50, 155), 127);
    }

    #[test]
    fn test_flat_regions_turn_white() {
        for value in [0u8, 40, 128, 255] {
            let img = PixelBuffer::from_fn(5, 5, 3, |_, _, _| value).unwrap();
            let out = PencilSketch::new(2).unwrap().apply(&img, ChannelSelector::All).unwrap();
            assert!(out.into_raw_vec().iter().all(|&v| v == 255), "value={value}");
        }
    }

    #[test]
    fn test_dark_stroke_survives() {
        // White canvas with a dark vertical line
        let img = PixelBuffer::from_fn(9, 9, 1, |x, _, _| if x == 4 { 0 } else { 255 }).unwrap();
        let out = PencilSketch::new(2).unwrap().apply(&img, ChannelSelector::All).unwrap();
        assert!(out.get(4, 4, 0) < 64);
        assert_eq!(out.get(0, 4, 0), 255);
    }

    #[test]
    fn test_preserves_alpha_and_dimensions() {
        let img = PixelBuffer::from_fn(6, 4, 4, |x, _, c| if c == 3 { 77 } else { (x * 40) as u8 }).unwrap();
        let out = PencilSketch::new(1).unwrap().apply(&img, ChannelSelector::All).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (6, 4, 4));
        assert_eq!(out.get(3, 2, 3), 77);
        assert_eq!(out.get(3, 2, 0), out.get(3, 2, 1));
    }
}
