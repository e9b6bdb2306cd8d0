//! pixelfx
//!
//! Pixel-level image effects over decoded `u8` rasters: brightness, pixelate,
//! Gaussian blur, Sobel edges, oil painting, pencil sketch and a cartoon
//! pipeline built from the others. Python bindings via PyO3 and WASM bindings
//! for JavaScript are available behind features.
//!
//! ## Image Format
//! A [`PixelBuffer`] holds `(height, width, channels)` samples:
//! - **Grayscale**: (height, width, 1)
//! - **Grayscale + alpha**: (height, width, 2)
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! ## Effect Contract
//! Every effect implements [`Effect::apply`]: it borrows the input, returns a
//! new buffer with identical dimensions, and fails only with an
//! [`EffectError`]. Parameters are validated when the effect is constructed.
//!
//! ```
//! use pixelfx::{ChannelSelector, Effect, PixelBuffer, Pixelate};
//!
//! let image = PixelBuffer::from_fn(4, 4, 1, |x, y, _| if (x + y) % 2 == 0 { 0 } else { 255 })?;
//! let out = Pixelate::new(2)?.apply(&image, ChannelSelector::All)?;
//! assert_eq!(out.get(0, 0, 0), 128);
//! # Ok::<(), pixelfx::EffectError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod effect;
pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{PixelBuffer, Rect, SaveOptions};
pub use config::EffectConfig;
pub use effect::{ChannelSelector, Effect};
pub use error::{EffectError, Result};
pub use filters::blur::GaussianBlur;
pub use filters::cartoon::{Cartoon, CartoonConfig, CartoonStages};
pub use filters::color_adjust::Brightness;
pub use filters::edge::Sobel;
pub use filters::sketch::PencilSketch;
pub use filters::stylize::{OilPainting, Pixelate};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::{
        Brightness, Cartoon, CartoonConfig, ChannelSelector, Effect, EffectError, GaussianBlur,
        OilPainting, PencilSketch, PixelBuffer, Pixelate, Sobel,
    };

    impl From<EffectError> for PyErr {
        fn from(err: EffectError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Apply `effect` to a (height, width, channels) uint8 array with the GIL released.
    fn run<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        effect: &dyn Effect,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = PixelBuffer::from_array(image.as_array().to_owned())?;
        let selector = ChannelSelector::from_index(channel);
        let result = py.allow_threads(|| effect.apply(&input, selector))?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Pixel-wise
    // ========================================================================

    /// Add `offset` to every color sample, clamping to 0-255.
    #[pyfunction]
    #[pyo3(signature = (image, offset, channel=0))]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        offset: i32,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &Brightness::new(offset), channel)
    }

    #[pyfunction]
    #[pyo3(signature = (image, block_size, channel=0))]
    pub fn pixelate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        block_size: usize,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &Pixelate::new(block_size)?, channel)
    }

    // ========================================================================
    // Convolution
    // ========================================================================

    /// Separable Gaussian blur. `kernel_size` must be odd.
    #[pyfunction]
    #[pyo3(signature = (image, kernel_size, sigma, channel=0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel_size: usize,
        sigma: f32,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &GaussianBlur::new(kernel_size, sigma)?, channel)
    }

    /// Binary Sobel edges.
    #[pyfunction]
    #[pyo3(signature = (image, threshold, invert=false, channel=0))]
    pub fn sobel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: u32,
        invert: bool,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &Sobel::new(threshold, invert), channel)
    }

    #[pyfunction]
    #[pyo3(signature = (image, blur_factor, channel=0))]
    pub fn pencil_sketch<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blur_factor: usize,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &PencilSketch::new(blur_factor)?, channel)
    }

    // ========================================================================
    // Stylize
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, filter_size, levels, channel=0))]
    pub fn oil_painting<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter_size: usize,
        levels: usize,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &OilPainting::new(filter_size, levels)?, channel)
    }

    #[pyfunction]
    #[pyo3(signature = (image, blur_kernel_size=21, edge_threshold=40, oil_filter_size=15, oil_levels=15, channel=0))]
    pub fn cartoon<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blur_kernel_size: usize,
        edge_threshold: u32,
        oil_filter_size: usize,
        oil_levels: usize,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let config = CartoonConfig {
            blur_kernel_size,
            edge_threshold,
            oil_filter_size,
            oil_levels,
        };
        run(py, image, &Cartoon::new(config)?, channel)
    }

    /// pixelfx Rust extension module
    #[pymodule]
    pub fn pixelfx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(pixelate, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sobel, m)?)?;
        m.add_function(wrap_pyfunction!(pencil_sketch, m)?)?;
        m.add_function(wrap_pyfunction!(oil_painting, m)?)?;
        m.add_function(wrap_pyfunction!(cartoon, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixelfx;
