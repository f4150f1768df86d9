//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned 8-bit gray buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageU8;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with stride and borrowed view conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    ///
    /// # Panics
    /// If `data` holds fewer than `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert!(
            data.len() >= width * height,
            "buffer of {} bytes cannot hold a {width}x{height} image",
            data.len()
        );
        let stride = width;
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Zero-filled image of the given size.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0; width * height])
    }

    /// Copy a (possibly strided) view into a packed buffer.
    pub fn from_view(view: ImageU8<'_>) -> Self {
        let mut data = Vec::with_capacity(view.w * view.h);
        for y in 0..view.h {
            let start = y * view.stride;
            data.extend_from_slice(&view.data[start..start + view.w]);
        }
        Self::new(view.w, view.h, data)
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// True for a zero-area image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.stride + x] = value;
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(GrayImageU8::new(width, height, data))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)
        .map_err(|e| format!("Failed to create parent of {}: {e}", path.display()))?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_view_packs_strided_rows() {
        let data: Vec<u8> = (0..20).collect();
        let img = ImageU8::new(5, 4, &data);
        let win = img.window(1, 1, 2, 2).unwrap();
        let owned = GrayImageU8::from_view(win);
        assert_eq!(owned.width(), 2);
        assert_eq!(owned.height(), 2);
        assert_eq!(owned.as_view().data, &[6, 7, 11, 12]);
    }

    #[test]
    fn zero_area_images_are_empty() {
        assert!(GrayImageU8::zeros(0, 10).is_empty());
        assert!(GrayImageU8::default().is_empty());
        assert!(!GrayImageU8::zeros(1, 1).is_empty());
    }
}
