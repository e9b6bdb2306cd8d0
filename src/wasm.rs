//! WebAssembly exports for pixelfx effects.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Each takes
//! the interleaved samples of an image plus its width, height and channel
//! count (1-4), and returns the processed samples in the same layout.
//! `channel` uses the numeric selector form: 0 for all channels, `i + 1` for
//! channel `i`.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::effect::{ChannelSelector, Effect};
use crate::error::EffectError;
use crate::filters::blur::GaussianBlur;
use crate::filters::cartoon::{Cartoon, CartoonConfig};
use crate::filters::color_adjust::Brightness;
use crate::filters::edge::Sobel;
use crate::filters::sketch::PencilSketch;
use crate::filters::stylize::{OilPainting, Pixelate};

fn to_js(err: EffectError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    effect: &dyn Effect,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, channels, data.to_vec()).map_err(to_js)?;
    let result = effect
        .apply(&input, ChannelSelector::from_index(channel))
        .map_err(to_js)?;
    Ok(result.into_raw_vec())
}

// ============================================================================
// Pixel-wise
// ============================================================================

#[wasm_bindgen]
pub fn brightness_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    offset: i32,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, channels, &Brightness::new(offset), channel)
}

#[wasm_bindgen]
pub fn pixelate_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    block_size: usize,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let effect = Pixelate::new(block_size).map_err(to_js)?;
    run(data, width, height, channels, &effect, channel)
}

// ============================================================================
// Convolution
// ============================================================================

#[wasm_bindgen]
pub fn gaussian_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
    sigma: f32,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let effect = GaussianBlur::new(kernel_size, sigma).map_err(to_js)?;
    run(data, width, height, channels, &effect, channel)
}

#[wasm_bindgen]
pub fn sobel_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    threshold: u32,
    invert: bool,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, channels, &Sobel::new(threshold, invert), channel)
}

#[wasm_bindgen]
pub fn pencil_sketch_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    blur_factor: usize,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let effect = PencilSketch::new(blur_factor).map_err(to_js)?;
    run(data, width, height, channels, &effect, channel)
}

// ============================================================================
// Stylize
// ============================================================================

#[wasm_bindgen]
pub fn oil_painting_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    filter_size: usize,
    levels: usize,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let effect = OilPainting::new(filter_size, levels).map_err(to_js)?;
    run(data, width, height, channels, &effect, channel)
}

#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn cartoon_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    blur_kernel_size: usize,
    edge_threshold: u32,
    oil_filter_size: usize,
    oil_levels: usize,
    channel: usize,
) -> Result<Vec<u8>, JsValue> {
    let effect = Cartoon::new(CartoonConfig {
        blur_kernel_size,
        edge_threshold,
        oil_filter_size,
        oil_levels,
    })
    .map_err(to_js)?;
    run(data, width, height, channels, &effect, channel)
}
