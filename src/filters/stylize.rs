//! Stylize filters: Oil Painting, Pixelate.
//!
//! These are artistic effect filters over `u8` images with 1-4 channels.
//! Work is split across rows (oil painting) or bands of tile rows
//! (pixelate) and written into a separate output buffer.

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::{EffectError, Result};

use super::core::{clamp_coord, for_each_chunk};
use super::grayscale::intensity_plane;

// ============================================================================
// Oil Painting
// ============================================================================

/// Mode filter with averaging.
///
/// For each pixel, neighbors in a `filter_size x filter_size` window are
/// sorted into `levels` intensity buckets. The most populated bucket wins
/// (lowest bucket on ties) and the pixel becomes the per-channel average of
/// the neighbors in that bucket.
///
/// Samples are 8-bit, so more than 256 levels cannot separate any further
/// intensities; the histogram is capped at [`OilPainting::MAX_BUCKETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OilPainting {
    filter_size: usize,
    levels: usize,
    buckets: usize,
}

impl OilPainting {
    /// Smallest accepted window is 4x4; 3x3 and below produce no visible
    /// stylization.
    pub const MIN_FILTER_SIZE: usize = 4;

    /// One bucket per possible intensity.
    pub const MAX_BUCKETS: usize = 256;

    pub fn new(filter_size: usize, levels: usize) -> Result<Self> {
        if filter_size < Self::MIN_FILTER_SIZE {
            return Err(EffectError::invalid(
                "filter_size",
                format!("must be greater than 3, got {filter_size}"),
            ));
        }
        if levels == 0 {
            return Err(EffectError::invalid("levels", "must be at least 1"));
        }
        Ok(OilPainting {
            filter_size,
            levels,
            buckets: levels.min(Self::MAX_BUCKETS),
        })
    }

    pub fn filter_size(&self) -> usize {
        self.filter_size
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of histogram buckets actually used.
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Bucket index for an intensity sample.
    #[inline]
    pub fn bucket(&self, intensity: u8) -> usize {
        (intensity as usize * self.buckets / 256).min(self.buckets - 1)
    }

    /// Window offsets `lo..=hi` around the center. Even sizes reach one
    /// further up/left than down/right.
    fn window(&self) -> (isize, isize) {
        let lo = (self.filter_size / 2) as isize;
        let hi = (self.filter_size - 1) as isize - lo;
        (lo, hi)
    }
}

impl Effect for OilPainting {
    fn name(&self) -> &'static str {
        "oil"
    }

    /// `All` buckets by luminance and averages every color channel; alpha is
    /// copied. `Only(c)` buckets and averages channel `c` alone.
    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let targets = channel.targets(image, false)?;
        let plane = intensity_plane(image, channel)?;
        let buckets: Vec<usize> = plane.iter().map(|&v| self.bucket(v)).collect();

        let (width, height, channels) = (image.width(), image.height(), image.channels());
        let input = image.as_array();
        let (lo, hi) = self.window();
        let levels = self.buckets;
        let row_len = image.row_len();

        let mut output = vec![0u8; height * row_len];
        for_each_chunk(&mut output, row_len, |y, row| {
            let mut counts = vec![0u32; levels];
            let mut sums = vec![0u64; levels * channels];

            for x in 0..width {
                counts.iter_mut().for_each(|v| *v = 0);
                sums.iter_mut().for_each(|v| *v = 0);

                for dy in -lo..=hi {
                    let sy = clamp_coord(y as isize + dy, height);
                    for dx in -lo..=hi {
                        let sx = clamp_coord(x as isize + dx, width);
                        let b = buckets[sy * width + sx];
                        counts[b] += 1;
                        for c in targets.clone() {
                            sums[b * channels + c] += input[[sy, sx, c]] as u64;
                        }
                    }
                }

                // Most frequent bucket; strict comparison keeps the lowest on ties
                let mut best = 0usize;
                for (b, &count) in counts.iter().enumerate() {
                    if count > counts[best] {
                        best = b;
                    }
                }
                let count = counts[best] as u64;

                for c in 0..channels {
                    row[x * channels + c] = if targets.contains(&c) {
                        ((sums[best * channels + c] + count / 2) / count) as u8
                    } else {
                        input[[y, x, c]]
                    };
                }
            }
        });

        PixelBuffer::assemble(image, output)
    }
}

// ============================================================================
// Pixelate
// ============================================================================

/// Replace each `block_size x block_size` tile with its per-channel average.
/// Tiles on the right and bottom edges are clipped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixelate {
    block_size: usize,
}

impl Pixelate {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(EffectError::invalid("block_size", "must be greater than 0"));
        }
        Ok(Pixelate { block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Effect for Pixelate {
    fn name(&self) -> &'static str {
        "pixelate"
    }

    /// `All` averages every channel, alpha included.
    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let targets = channel.targets(image, true)?;
        let (width, channels) = (image.width(), image.channels());
        let input = image.as_array();
        let block_size = self.block_size;
        let row_len = image.row_len();
        // Tiles never extend past the image, so neither does a band
        let band_rows = block_size.min(image.height());

        let mut output = vec![0u8; image.height() * row_len];
        for_each_chunk(&mut output, row_len * band_rows, |band, rows| {
            let by = band * band_rows;
            let bh = rows.len() / row_len;

            for bx in (0..width).step_by(block_size) {
                let bw = block_size.min(width - bx);
                let pixel_count = (bh * bw) as u64;

                for c in 0..channels {
                    if !targets.contains(&c) {
                        for y in 0..bh {
                            for x in bx..bx + bw {
                                rows[y * row_len + x * channels + c] = input[[by + y, x, c]];
                            }
                        }
                        continue;
                    }

                    // Compute average for this tile
                    let mut sum = 0u64;
                    for y in by..by + bh {
                        for x in bx..bx + bw {
                            sum += input[[y, x, c]] as u64;
                        }
                    }
                    let avg = ((sum + pixel_count / 2) / pixel_count) as u8;

                    // Fill tile with average
                    for y in 0..bh {
                        for x in bx..bx + bw {
                            rows[y * row_len + x * channels + c] = avg;
                        }
                    }
                }
            }
        });

        PixelBuffer::assemble(image, output)
    }
}
