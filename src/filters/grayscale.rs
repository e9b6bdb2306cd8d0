//! Intensity planes for the analysis filters.
//!
//! Sobel, pencil sketch and the oil painting histogram all work on one
//! scalar per pixel. For color layouts that scalar is ITU-R BT.709
//! luminosity; gray layouts use their single color channel; an explicit
//! channel selector reads that channel directly.

use crate::buffer::PixelBuffer;
use crate::effect::ChannelSelector;
use crate::error::Result;

/// ITU-R BT.709 luminosity coefficients
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    lum.round().clamp(0.0, 255.0) as u8
}

/// Extract one intensity sample per pixel, row-major.
pub fn intensity_plane(image: &PixelBuffer, channel: ChannelSelector) -> Result<Vec<u8>> {
    channel.validate(image)?;
    let input = image.as_array();
    let (width, height) = (image.width(), image.height());
    let mut plane = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let v = match channel {
                ChannelSelector::Only(c) => input[[y, x, c]],
                ChannelSelector::All if image.color_channels() >= 3 => {
                    luminance(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]])
                }
                ChannelSelector::All => input[[y, x, 0]],
            };
            plane.push(v);
        }
    }

    Ok(plane)
}

/// Write `plane` into every color channel of a copy of `image`, keeping alpha.
pub fn broadcast_plane(image: &PixelBuffer, plane: &[u8]) -> Result<PixelBuffer> {
    let channels = image.channels();
    let color_channels = image.color_channels();
    let input = image.as_array();
    let mut output = Vec::with_capacity(image.height() * image.row_len());

    for (i, &v) in plane.iter().enumerate() {
        let (y, x) = (i / image.width(), i % image.width());
        for c in 0..channels {
            output.push(if c < color_channels { v } else { input[[y, x, c]] });
        }
    }

    PixelBuffer::assemble(image, output)
}
