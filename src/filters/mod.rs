//! Effect implementations.
//!
//! ## Supported Formats
//!
//! All effects accept `u8` buffers with 1, 2, 3, or 4 channels:
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale8 | (H, W, 1) | Single luminance channel, 0-255 |
//! | GrayAlpha8 | (H, W, 2) | Luminance + alpha |
//! | RGB8 | (H, W, 3) | Red, green, blue |
//! | RGBA8 | (H, W, 4) | RGB + alpha |
//!
//! ## Architecture
//!
//! All effects follow these principles:
//! - **Non-mutating** - Input is borrowed; output is a new buffer of the same size
//! - **Validated up front** - Constructors reject bad parameters
//! - **Alpha preservation** - Color-only effects copy alpha unchanged
//! - **Thread-safe** - Rows or tile bands are processed in parallel with rayon
//!
//! ## Effect Categories
//!
//! - **Pixel-wise**: brightness
//! - **Convolution**: gaussian blur, sobel, pencil sketch
//! - **Stylize**: oil painting, pixelate
//! - **Composite**: cartoon (blur + sobel + oil painting)

pub mod core;
pub mod grayscale;

pub mod blur;
pub mod cartoon;
pub mod color_adjust;
pub mod edge;
pub mod sketch;
pub mod stylize;
