use window_detector::image::GrayImageU8;

/// Black image with a single saturated pixel at `(x, y)`.
pub fn single_spot_u8(width: usize, height: usize, x: usize, y: usize) -> GrayImageU8 {
    assert!(x < width && y < height, "spot must lie inside the image");
    let mut img = GrayImageU8::zeros(width, height);
    img.set(x, y, 255);
    img
}

/// Black image with filled white squares given as `(x, y, side)`.
pub fn squares_u8(width: usize, height: usize, squares: &[(usize, usize, usize)]) -> GrayImageU8 {
    let mut img = GrayImageU8::zeros(width, height);
    for &(x0, y0, side) in squares {
        for y in y0..(y0 + side).min(height) {
            for x in x0..(x0 + side).min(width) {
                img.set(x, y, 255);
            }
        }
    }
    img
}

/// Deterministic pseudo-random texture (xorshift), values in `0..=255`.
pub fn noise_u8(width: usize, height: usize, seed: u32) -> GrayImageU8 {
    let mut state = seed.max(1);
    let data = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    GrayImageU8::new(width, height, data)
}
