//! Bilinear down-sampling into a reusable scratch buffer.
//!
//! The scanner resamples the same source image once per scale level. Instead
//! of allocating a fresh image per level, a [`ResampleBuffer`] is sized once
//! for the source and every level writes its (smaller) image into the front
//! of that allocation, packed with `stride == width`.
//!
//! Sampling follows the half-pixel-centre convention: destination pixel `d`
//! maps to source coordinate `(d + 0.5) * src/dst - 0.5`, clamped to the
//! image. Equal sizes therefore reproduce the source exactly.
use super::ImageU8;

/// Scratch buffer scoped to one scan; released when dropped.
#[derive(Debug, Default)]
pub struct ResampleBuffer {
    data: Vec<u8>,
    w: usize,
    h: usize,
}

impl ResampleBuffer {
    /// Allocate room for an image of `width × height` pixels.
    pub fn with_capacity(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            w: 0,
            h: 0,
        }
    }

    /// Number of pixels the buffer holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Resample `src` to `width × height` and return a view of the result.
    pub fn resample(&mut self, src: ImageU8<'_>, width: usize, height: usize) -> ImageU8<'_> {
        let needed = width * height;
        if needed > self.data.len() {
            self.data.resize(needed, 0);
        }
        self.w = width;
        self.h = height;
        resize_bilinear_into(src, &mut self.data[..needed], width, height);
        self.view()
    }

    /// View of the most recently resampled image.
    pub fn view(&self) -> ImageU8<'_> {
        ImageU8::new(self.w, self.h, &self.data[..self.w * self.h])
    }
}

/// Per-axis source taps: left index, right index and right-hand weight.
fn axis_taps(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let f = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (f.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let a = if i0 == last { 0.0 } else { f - i0 as f32 };
            (i0, i1, a)
        })
        .collect()
}

/// Resample `src` into the packed buffer `dst` of size `width × height`.
pub fn resize_bilinear_into(src: ImageU8<'_>, dst: &mut [u8], width: usize, height: usize) {
    debug_assert!(dst.len() >= width * height);
    if width == 0 || height == 0 {
        return;
    }
    if src.is_empty() {
        dst[..width * height].fill(0);
        return;
    }

    let xs = axis_taps(src.w, width);
    let ys = axis_taps(src.h, height);
    for (y, &(y0, y1, ay)) in ys.iter().enumerate() {
        let top = &src.data[y0 * src.stride..y0 * src.stride + src.w];
        let bottom = &src.data[y1 * src.stride..y1 * src.stride + src.w];
        let out = &mut dst[y * width..(y + 1) * width];
        for (px, &(x0, x1, ax)) in out.iter_mut().zip(xs.iter()) {
            let t = top[x0] as f32 + (top[x1] as f32 - top[x0] as f32) * ax;
            let b = bottom[x0] as f32 + (bottom[x1] as f32 - bottom[x0] as f32) * ax;
            let v = t + (b - t) * ay;
            *px = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}
