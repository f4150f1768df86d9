/// Borrowed 8-bit grayscale view with an explicit row stride.
///
/// Sub-windows share the parent's backing slice, so extracting a classifier
/// window never copies pixels.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view over `data` (`stride == w`).
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// True when the view covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Borrow the `w × h` rectangle whose top-left corner is `(x, y)`.
    ///
    /// Returns `None` when the rectangle does not fit inside this view.
    pub fn window(&self, x: usize, y: usize, w: usize, h: usize) -> Option<ImageU8<'a>> {
        if x + w > self.w || y + h > self.h {
            return None;
        }
        if w == 0 || h == 0 {
            return Some(ImageU8 {
                w,
                h,
                stride: self.stride,
                data: &[],
            });
        }
        let start = y * self.stride + x;
        let end = (y + h - 1) * self.stride + x + w;
        Some(ImageU8 {
            w,
            h,
            stride: self.stride,
            data: &self.data[start..end],
        })
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn window_shares_parent_rows() {
        let data: Vec<u8> = (0..30).collect();
        let img = ImageU8::new(6, 5, &data);
        let win = img.window(2, 1, 3, 2).expect("window fits");
        assert_eq!(win.row(0), &[8, 9, 10]);
        assert_eq!(win.row(1), &[14, 15, 16]);
        assert_eq!(win.get(2, 1), 16);
        assert!(win.as_slice().is_none());
    }

    #[test]
    fn window_outside_bounds_is_rejected() {
        let data = vec![0u8; 16];
        let img = ImageU8::new(4, 4, &data);
        assert!(img.window(2, 2, 3, 1).is_none());
        assert!(img.window(0, 4, 1, 1).is_none());
        assert!(img.window(1, 1, 3, 3).is_some());
    }
}
