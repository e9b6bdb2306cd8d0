//! Color adjustment filters: Brightness.
//!
//! Pixel-wise operation that doesn't require spatial context. Alpha channel
//! (if present) is preserved unless selected explicitly.

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::Result;

use super::core::for_each_chunk;

// ============================================================================
// Brightness
// ============================================================================

/// Add a constant offset to every sample, saturating at 0 and 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    offset: i32,
}

impl Brightness {
    /// # Arguments
    /// * `offset` - Added to each sample; negative values darken
    pub fn new(offset: i32) -> Self {
        Brightness { offset }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl Effect for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let targets = channel.targets(image, false)?;
        let (width, channels) = (image.width(), image.channels());
        let input = image.as_array();
        let offset = self.offset;

        let mut output = vec![0u8; image.height() * image.row_len()];
        for_each_chunk(&mut output, image.row_len(), |y, row| {
            for x in 0..width {
                for c in 0..channels {
                    let v = input[[y, x, c]];
                    row[x * channels + c] = if targets.contains(&c) {
                        (v as i32).saturating_add(offset).clamp(0, 255) as u8
                    } else {
                        v
                    };
                }
            }
        });

        PixelBuffer::assemble(image, output)
    }
}
