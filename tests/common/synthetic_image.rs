use pixelfx::PixelBuffer;

/// High-contrast checkerboard. Cells alternate between 32 and 220 on every
/// color channel; alpha, when present, is opaque.
pub fn checkerboard(width: usize, height: usize, cell: usize, channels: usize) -> PixelBuffer {
    assert!(cell > 0, "cell size must be positive");
    let alpha = matches!(channels, 2 | 4);
    PixelBuffer::from_fn(width, height, channels, |x, y, c| {
        if alpha && c == channels - 1 {
            255
        } else if ((x / cell) + (y / cell)) % 2 == 0 {
            32
        } else {
            220
        }
    })
    .expect("valid checkerboard dimensions")
}

/// Smooth diagonal ramp with a distinct offset per channel.
pub fn ramp(width: usize, height: usize, channels: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, channels, |x, y, c| {
        ((x * 9 + y * 5 + c * 40) % 256) as u8
    })
    .expect("valid ramp dimensions")
}

/// Pixels alternating 0 and 255 in both directions.
pub fn alternating(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, 1, |x, y, _| if (x + y) % 2 == 0 { 0 } else { 255 })
        .expect("valid alternating dimensions")
}
