//! Cartoon: a pipeline of other effects.
//!
//! 1. Gaussian blur smooths fine texture.
//! 2. Sobel on the blurred image produces an edge mask.
//! 3. Oil painting on the blurred image flattens color regions.
//! 4. Mask pixels are drawn as dark outlines over the painted image.
//!
//! Stages are held as `Box<dyn Effect>`, so any of them can be swapped for
//! another implementation with the same contract.

use std::time::Instant;

use log::debug;

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::{EffectError, Result};

use super::blur::GaussianBlur;
use super::core::sigma_for_kernel;
use super::edge::Sobel;
use super::stylize::OilPainting;

/// Outline value written to color channels of edge pixels.
pub const OUTLINE: u8 = 0;

/// Mask samples at or above this are edges.
pub const MASK_CUTOFF: u8 = 128;

/// Parameters for [`Cartoon::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CartoonConfig {
    /// Gaussian kernel size, positive and odd. Sigma is derived from it.
    pub blur_kernel_size: usize,
    /// Sobel magnitude threshold for outlines.
    pub edge_threshold: u32,
    /// Oil painting window, > 3.
    pub oil_filter_size: usize,
    /// Oil painting intensity buckets, >= 1.
    pub oil_levels: usize,
}

impl Default for CartoonConfig {
    fn default() -> Self {
        CartoonConfig {
            blur_kernel_size: 21,
            edge_threshold: 40,
            oil_filter_size: 15,
            oil_levels: 15,
        }
    }
}

/// Every intermediate buffer of one cartoon run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartoonStages {
    pub blurred: PixelBuffer,
    pub edges: PixelBuffer,
    pub painted: PixelBuffer,
    pub composite: PixelBuffer,
}

pub struct Cartoon {
    blur: Box<dyn Effect>,
    edges: Box<dyn Effect>,
    paint: Box<dyn Effect>,
}

impl std::fmt::Debug for Cartoon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartoon")
            .field("blur", &self.blur.name())
            .field("edges", &self.edges.name())
            .field("paint", &self.paint.name())
            .finish()
    }
}

impl Cartoon {
    pub fn new(config: CartoonConfig) -> Result<Self> {
        let blur = GaussianBlur::new(
            config.blur_kernel_size,
            sigma_for_kernel(config.blur_kernel_size),
        )
        .map_err(|e| rename_param(e, "kernel_size", "blur_kernel_size"))?;
        let edges = Sobel::new(config.edge_threshold, false);
        let paint = OilPainting::new(config.oil_filter_size, config.oil_levels).map_err(|e| {
            let e = rename_param(e, "filter_size", "oil_filter_size");
            rename_param(e, "levels", "oil_levels")
        })?;

        Ok(Self::from_stages(
            Box::new(blur),
            Box::new(edges),
            Box::new(paint),
        ))
    }

    /// Build from arbitrary stage effects. `edges` must produce a mask whose
    /// first channel is >= [`MASK_CUTOFF`] on outline pixels.
    pub fn from_stages(blur: Box<dyn Effect>, edges: Box<dyn Effect>, paint: Box<dyn Effect>) -> Self {
        Cartoon { blur, edges, paint }
    }

    /// Run the pipeline and keep every intermediate buffer.
    pub fn apply_staged(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<CartoonStages> {
        let start = Instant::now();

        let blurred = self.blur.apply(image, channel)?;
        check_stage(self.blur.name(), image, &blurred)?;
        debug!(
            "Cartoon {} stage {:.2} ms",
            self.blur.name(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let stage_start = Instant::now();
        let edges = self.edges.apply(&blurred, channel)?;
        check_stage(self.edges.name(), image, &edges)?;
        debug!(
            "Cartoon {} stage {:.2} ms",
            self.edges.name(),
            stage_start.elapsed().as_secs_f64() * 1000.0
        );

        let stage_start = Instant::now();
        let painted = self.paint.apply(&blurred, channel)?;
        check_stage(self.paint.name(), image, &painted)?;
        debug!(
            "Cartoon {} stage {:.2} ms",
            self.paint.name(),
            stage_start.elapsed().as_secs_f64() * 1000.0
        );

        let composite = composite_outlines(&painted, &edges)?;
        debug!(
            "Cartoon total {:.2} ms for {}x{}",
            start.elapsed().as_secs_f64() * 1000.0,
            image.width(),
            image.height()
        );

        Ok(CartoonStages {
            blurred,
            edges,
            painted,
            composite,
        })
    }
}

impl Effect for Cartoon {
    fn name(&self) -> &'static str {
        "cartoon"
    }

    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        Ok(self.apply_staged(image, channel)?.composite)
    }
}

/// Report stage parameter errors under the cartoon config field names.
fn rename_param(err: EffectError, from: &str, to: &'static str) -> EffectError {
    match err {
        EffectError::InvalidParameter { name, reason } if name == from => {
            EffectError::InvalidParameter { name: to, reason }
        }
        other => other,
    }
}

fn check_stage(stage: &str, input: &PixelBuffer, output: &PixelBuffer) -> Result<()> {
    if !output.same_size(input) {
        return Err(EffectError::processing(format!(
            "{stage} stage produced {}x{}, expected {}x{}",
            output.width(),
            output.height(),
            input.width(),
            input.height()
        )));
    }
    Ok(())
}

/// Draw mask pixels over `painted` as [`OUTLINE`] on every color channel.
/// Alpha comes from `painted`.
pub fn composite_outlines(painted: &PixelBuffer, mask: &PixelBuffer) -> Result<PixelBuffer> {
    check_stage("edge mask", painted, mask)?;

    let mut output = painted.clone();
    let color_channels = painted.color_channels();
    for y in 0..painted.height() {
        for x in 0..painted.width() {
            if mask.get(x, y, 0) >= MASK_CUTOFF {
                for c in 0..color_channels {
                    output.set(x, y, c, OUTLINE);
                }
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two flat color regions split vertically.
    fn two_tone() -> PixelBuffer {
        PixelBuffer::from_fn(16, 12, 3, |x, _, c| {
            if x < 8 {
                [200, 180, 160][c]
            } else {
                [30, 60, 90][c]
            }
        })
        .unwrap()
    }

    fn small_config() -> CartoonConfig {
        CartoonConfig {
            blur_kernel_size: 3,
            edge_threshold: 60,
            oil_filter_size: 4,
            oil_levels: 4,
        }
    }

    #[test]
    fn test_default_config() {
        let config = CartoonConfig::default();
        assert_eq!(config.blur_kernel_size, 21);
        assert_eq!(config.edge_threshold, 40);
        assert_eq!(config.oil_filter_size, 15);
        assert_eq!(config.oil_levels, 15);
        assert!(Cartoon::new(config).is_ok());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad_blur = CartoonConfig {
            blur_kernel_size: 4,
            ..small_config()
        };
        match Cartoon::new(bad_blur).unwrap_err() {
            EffectError::InvalidParameter { name, .. } => assert_eq!(name, "blur_kernel_size"),
            other => panic!("unexpected error {other:?}"),
        }

        let bad_oil = CartoonConfig {
            oil_filter_size: 3,
            ..small_config()
        };
        match Cartoon::new(bad_oil).unwrap_err() {
            EffectError::InvalidParameter { name, .. } => assert_eq!(name, "oil_filter_size"),
            other => panic!("unexpected error {other:?}"),
        }

        let bad_levels = CartoonConfig {
            oil_levels: 0,
            ..small_config()
        };
        match Cartoon::new(bad_levels).unwrap_err() {
            EffectError::InvalidParameter { name, .. } => assert_eq!(name, "oil_levels"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_outlines_on_region_boundary() {
        let img = two_tone();
        let out = Cartoon::new(small_config()).unwrap().apply(&img, ChannelSelector::All).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (16, 12, 3));

        // Boundary columns become outlines
        for c in 0..3 {
            assert_eq!(out.get(7, 6, c), OUTLINE);
            assert_eq!(out.get(8, 6, c), OUTLINE);
        }
        // Region interiors keep their flat color
        assert_eq!(out.get(1, 6, 0), 200);
        assert_eq!(out.get(14, 6, 2), 90);
    }

    #[test]
    fn test_staged_matches_apply() {
        let img = two_tone();
        let cartoon = Cartoon::new(small_config()).unwrap();
        let stages = cartoon.apply_staged(&img, ChannelSelector::All).unwrap();
        let direct = cartoon.apply(&img, ChannelSelector::All).unwrap();
        assert_eq!(stages.composite, direct);
        assert_eq!(
            stages.composite,
            composite_outlines(&stages.painted, &stages.edges).unwrap()
        );
    }

    #[test]
    fn test_composite_preserves_alpha() {
        let painted = PixelBuffer::from_fn(2, 1, 4, |_, _, c| if c == 3 { 90 } else { 200 }).unwrap();
        let mask = PixelBuffer::from_raw(2, 1, 1, vec![255, 0]).unwrap();
        let out = composite_outlines(&painted, &mask).unwrap();
        assert_eq!(out.into_raw_vec(), vec![0, 0, 0, 90, 200, 200, 200, 90]);
    }

    #[test]
    fn test_composite_dimension_mismatch() {
        let painted = PixelBuffer::new(4, 4, 3).unwrap();
        let mask = PixelBuffer::new(3, 4, 1).unwrap();
        let err = composite_outlines(&painted, &mask).unwrap_err();
        assert!(matches!(err, EffectError::ProcessingFailure(_)));
    }

    struct Shrink;

    impl Effect for Shrink {
        fn name(&self) -> &'static str {
            "shrink"
        }

        fn apply(&self, image: &PixelBuffer, _channel: ChannelSelector) -> Result<PixelBuffer> {
            PixelBuffer::new(image.width() - 1, image.height(), image.channels())
        }
    }

    #[test]
    fn test_mismatched_stage_is_processing_failure() {
        let cartoon = Cartoon::from_stages(
            Box::new(GaussianBlur::new(3, 1.0).unwrap()),
            Box::new(Shrink),
            Box::new(OilPainting::new(4, 2).unwrap()),
        );
        let err = cartoon.apply(&two_tone(), ChannelSelector::All).unwrap_err();
        assert!(matches!(err, EffectError::ProcessingFailure(_)));
    }
}
