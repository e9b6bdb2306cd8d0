//! Gaussian blur.
//!
//! Uses separable 2-pass convolution for efficiency: a `k x k` kernel costs
//! `2k` taps per sample instead of `k^2`. Borders replicate the nearest edge
//! sample.

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::Result;

use super::core::{convolve_separable, gaussian_kernel_1d};

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur {
    kernel_size: usize,
    sigma: f32,
    kernel: Vec<f32>,
}

impl GaussianBlur {
    /// # Arguments
    /// * `kernel_size` - Number of taps per pass, positive and odd
    /// * `sigma` - Standard deviation of the Gaussian, > 0
    pub fn new(kernel_size: usize, sigma: f32) -> Result<Self> {
        let kernel = gaussian_kernel_1d(kernel_size, sigma)?;
        Ok(GaussianBlur {
            kernel_size,
            sigma,
            kernel,
        })
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// The normalized 1D kernel applied on each pass.
    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }
}

impl Effect for GaussianBlur {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    /// `All` blurs every channel, alpha included.
    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        let targets = channel.targets(image, true)?;
        convolve_separable(image, &self.kernel, targets)
    }
}
