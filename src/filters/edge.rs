//! Sobel edge detection with binary output.
//!
//! The gradient magnitude of the intensity plane is compared against a
//! threshold. Pixels above it are edges. Output is two-tone: edges are white
//! on black, or black on white when inverted (line-art style). Alpha, if
//! present, is preserved.

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::Result;

use super::core::gradient_magnitude;
use super::grayscale::{broadcast_plane, intensity_plane};

/// Value written for edge pixels when not inverted.
pub const EDGE: u8 = 255;
/// Value written for background pixels when not inverted.
pub const BACKGROUND: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sobel {
    threshold: u32,
    invert: bool,
}

impl Sobel {
    /// # Arguments
    /// * `threshold` - Magnitudes strictly above this are edges
    /// * `invert` - Swap edge and background values
    pub fn new(threshold: u32, invert: bool) -> Self {
        Sobel { threshold, invert }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Binary edge mask, one sample per pixel.
    pub fn edge_plane(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<Vec<u8>> {
        let plane = intensity_plane(image, channel)?;
        let magnitude = gradient_magnitude(&plane, image.width(), image.height())?;
        let threshold = self.threshold as f32;
        let (edge, background) = if self.invert {
            (BACKGROUND, EDGE)
        } else {
            (EDGE, BACKGROUND)
        };

        Ok(magnitude
            .into_iter()
            .map(|m| if m > threshold { edge } else { background })
            .collect())
    }
}

impl Effect for Sobel {
    fn name(&self) -> &'static str {
        "sobel"
    }

    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let mask = self.edge_plane(image, channel)?;
        broadcast_plane(image, &mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark left half, bright right half.
    fn step_image(channels: usize) -> PixelBuffer {
        PixelBuffer::from_fn(6, 4, channels, |x, _, c| {
            if channels == 4 && c == 3 {
                180
            } else if x >= 3 {
                220
            } else {
                20
            }
        })
        .unwrap()
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let img = PixelBuffer::from_fn(4, 4, 3, |_, _, _| 128).unwrap();
        let out = Sobel::new(0, false).apply(&img, ChannelSelector::All).unwrap();
        assert!(out.into_raw_vec().iter().all(|&v| v == BACKGROUND));
    }

    #[test]
    fn test_step_edge_detected() {
        let img = step_image(3);
        let out = Sobel::new(100, false).apply(&img, ChannelSelector::All).unwrap();
        for y in 0..4 {
            assert_eq!(out.get(2, y, 0), EDGE);
            assert_eq!(out.get(3, y, 1), EDGE);
            assert_eq!(out.get(0, y, 2), BACKGROUND);
            assert_eq!(out.get(5, y, 0), BACKGROUND);
        }
    }

    #[test]
    fn test_threshold_above_magnitude_suppresses_edges() {
        let img = step_image(1);
        // Max magnitude is 4 * 200 = 800
        let out = Sobel::new(800, false).apply(&img, ChannelSelector::All).unwrap();
        assert!(out.into_raw_vec().iter().all(|&v| v == BACKGROUND));
    }

    #[test]
    fn test_invert_is_complement() {
        let img = step_image(3);
        let plain = Sobel::new(50, false).apply(&img, ChannelSelector::All).unwrap();
        let inverted = Sobel::new(50, true).apply(&img, ChannelSelector::All).unwrap();
        for (a, b) in plain.into_raw_vec().iter().zip(inverted.into_raw_vec()) {
            assert_eq!(*a, 255 - b);
        }
    }

    #[test]
    fn test_preserves_alpha() {
        let img = step_image(4);
        let out = Sobel::new(50, true).apply(&img, ChannelSelector::All).unwrap();
        assert_eq!((out.width(), out.height()), (6, 4));
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(out.get(x, y, 3), 180);
            }
        }
    }

    #[test]
    fn test_selected_channel_drives_gradient() {
        // Only channel 1 carries the step
        let img = PixelBuffer::from_fn(6, 4, 3, |x, _, c| if c == 1 && x >= 3 { 255 } else { 0 }).unwrap();
        let on_green = Sobel::new(100, false).apply(&img, ChannelSelector::Only(1)).unwrap();
        let on_red = Sobel::new(100, false).apply(&img, ChannelSelector::Only(0)).unwrap();
        assert_eq!(on_green.get(2, 1, 0), EDGE);
        assert!(on_red.into_raw_vec().iter().all(|&v| v == BACKGROUND));
    }
}
