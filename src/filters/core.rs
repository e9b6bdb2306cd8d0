//! Core utilities shared by the convolution and neighborhood filters:
//! - Gaussian kernel generation
//! - Separable convolution with replicated-edge borders
//! - Sobel gradient magnitude
//! - Row-partitioned parallel execution

use std::ops::Range;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::{EffectError, Result};

/// Horizontal Sobel operator.
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical Sobel operator.
pub const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Check that `kernel_size` is odd and non-zero.
pub fn validate_kernel_size(name: &'static str, kernel_size: usize) -> Result<()> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(EffectError::invalid(
            name,
            format!("must be a positive odd number, got {kernel_size}"),
        ));
    }
    Ok(())
}

/// Check that `sigma` is finite and positive.
pub fn validate_sigma(sigma: f32) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EffectError::invalid(
            "sigma",
            format!("must be a finite value greater than 0, got {sigma}"),
        ));
    }
    Ok(())
}

/// Sigma for a kernel of `kernel_size` taps: the kernel spans 6 sigma
/// (99.7% of the distribution).
pub fn sigma_for_kernel(kernel_size: usize) -> f32 {
    kernel_size as f32 / 6.0
}

/// Generate a normalized 1D Gaussian kernel.
///
/// # Arguments
/// * `kernel_size` - Number of taps, positive and odd
/// * `sigma` - Standard deviation, finite and > 0
///
/// # Returns
/// Weights centered on `kernel_size / 2`, summing to 1.0
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Result<Vec<f32>> {
    validate_kernel_size("kernel_size", kernel_size)?;
    validate_sigma(sigma)?;

    let mut kernel: Vec<f32> = Vec::new();
    kernel.try_reserve_exact(kernel_size).map_err(|_| {
        EffectError::invalid("kernel_size", format!("{kernel_size} taps cannot be allocated"))
    })?;

    let half = kernel_size / 2;
    kernel.extend((0..kernel_size).map(|i| {
        let x = i as f32 - half as f32;
        (-x * x / (2.0 * sigma * sigma)).exp()
    }));

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    Ok(kernel)
}

/// Replicated-edge sampling: clamp `pos` into `[0, len)`.
#[inline]
pub fn clamp_coord(pos: isize, len: usize) -> usize {
    pos.clamp(0, len as isize - 1) as usize
}

/// Run `f(index, chunk)` over consecutive `chunk_len` slices of `buf`.
///
/// Chunks are processed on the rayon pool; wasm builds run them in order on
/// the calling thread.
pub(crate) fn for_each_chunk<T, F>(buf: &mut [T], chunk_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    #[cfg(not(target_arch = "wasm32"))]
    buf.par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(i, chunk)| f(i, chunk));

    #[cfg(target_arch = "wasm32")]
    buf.chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(i, chunk)| f(i, chunk));
}

/// Separable convolution of the `targets` channels with `kernel`.
///
/// Horizontal pass first, then vertical, accumulating in f32. Channels outside
/// `targets` are copied unchanged. Out-of-range taps read the nearest edge
/// sample.
pub fn convolve_separable(
    image: &PixelBuffer,
    kernel: &[f32],
    targets: Range<usize>,
) -> Result<PixelBuffer> {
    let (width, height, channels) = (image.width(), image.height(), image.channels());
    let input = image.as_array();
    let half = (kernel.len() / 2) as isize;
    let row_len = image.row_len();

    // Pass 1: horizontal
    let mut temp = vec![0.0f32; height * row_len];
    for_each_chunk(&mut temp, row_len, |y, row| {
        for x in 0..width {
            for c in 0..channels {
                row[x * channels + c] = if targets.contains(&c) {
                    kernel
                        .iter()
                        .enumerate()
                        .map(|(ki, &kv)| {
                            let sx = clamp_coord(x as isize + ki as isize - half, width);
                            input[[y, sx, c]] as f32 * kv
                        })
                        .sum()
                } else {
                    input[[y, x, c]] as f32
                };
            }
        }
    });

    // Pass 2: vertical
    let mut output = vec![0u8; height * row_len];
    for_each_chunk(&mut output, row_len, |y, row| {
        for x in 0..width {
            for c in 0..channels {
                let idx = x * channels + c;
                row[idx] = if targets.contains(&c) {
                    let sum: f32 = kernel
                        .iter()
                        .enumerate()
                        .map(|(ki, &kv)| {
                            let sy = clamp_coord(y as isize + ki as isize - half, height);
                            temp[sy * row_len + idx] * kv
                        })
                        .sum();
                    sum.round().clamp(0.0, 255.0) as u8
                } else {
                    input[[y, x, c]]
                };
            }
        }
    });

    PixelBuffer::assemble(image, output)
}

/// Sobel gradient magnitude of a single-channel plane.
///
/// Returns `sqrt(gx^2 + gy^2)` per sample, borders sampled by replication.
/// A plane whose length is not `width * height` is a `ProcessingFailure`.
pub fn gradient_magnitude(plane: &[u8], width: usize, height: usize) -> Result<Vec<f32>> {
    if width.checked_mul(height) != Some(plane.len()) || plane.is_empty() {
        return Err(EffectError::processing(format!(
            "gradient plane has {} samples, expected {width}x{height}",
            plane.len()
        )));
    }
    let mut magnitude = vec![0.0f32; plane.len()];

    for_each_chunk(&mut magnitude, width, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3 {
                let sy = clamp_coord(y as isize + ky as isize - 1, height);
                for kx in 0..3 {
                    let sx = clamp_coord(x as isize + kx as isize - 1, width);
                    let v = plane[sy * width + sx] as i32;
                    gx += v * SOBEL_X[ky][kx];
                    gy += v * SOBEL_Y[ky][kx];
                }
            }
            *out = ((gx * gx + gy * gy) as f32).sqrt();
        }
    });

    Ok(magnitude)
}
