//! Geometric scale progression for the sliding-window search.
//!
//! Level `k` uses `factor = scale_factor^k` (accumulated by repeated
//! multiplication). At each factor the native classifier window is kept
//! fixed and the image is shrunk instead:
//!
//! - `window = round(native * factor)`: object size in original pixels;
//! - `scaled = round(image / factor)`: size of the resampled image;
//! - `processing = scaled - native`: extent of valid window origins.
//!
//! The progression stops for good once `processing` is empty or `window`
//! exceeds the maximum object size; levels whose `window` is below the
//! minimum object size are skipped silently.
use super::params::{ScanError, ScanParams};
use crate::types::Size;

/// One admissible pyramid level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLevel {
    /// Exponent `k` of `factor = scale_factor^k`.
    pub index: usize,
    pub factor: f64,
    /// Native window mapped to original-image pixels.
    pub window: Size,
    /// Resampled image size.
    pub scaled: Size,
    /// Window origins satisfy `x < processing.width`, `y < processing.height`.
    pub processing: Size,
    /// Raster step in both axes.
    pub step: usize,
}

impl ScaleLevel {
    /// Number of windows a full raster of this level visits.
    pub fn window_count(&self) -> usize {
        self.processing.width.div_ceil(self.step) * self.processing.height.div_ceil(self.step)
    }
}

/// Stride used at `factor`: dense above 2×, every other origin otherwise.
pub fn step_for_factor(factor: f64) -> usize {
    if factor > 2.0 {
        1
    } else {
        2
    }
}

#[inline]
fn round_to_i64(v: f64) -> i64 {
    v.round() as i64
}

/// Iterator over admissible [`ScaleLevel`]s.
#[derive(Clone, Debug)]
pub struct ScaleLevels {
    image: Size,
    native: Size,
    min_object: Size,
    max_object: Size,
    scale_factor: f64,
    factor: f64,
    index: usize,
    done: bool,
}

impl ScaleLevels {
    pub fn new(image: Size, native: Size, params: &ScanParams) -> Result<Self, ScanError> {
        params.validate()?;
        if native.area() == 0 {
            return Err(ScanError::EmptyWindow {
                width: native.width,
                height: native.height,
            });
        }
        let min_side = params.min_size.max(0) as usize;
        let max_object = if params.max_size <= 0 {
            image
        } else {
            Size::square(params.max_size as usize)
        };
        Ok(Self {
            image,
            native,
            min_object: Size::square(min_side),
            max_object,
            scale_factor: params.scale_factor,
            factor: 1.0,
            index: 0,
            done: false,
        })
    }

    /// Maximum object size after resolving a non-positive `max_size`.
    pub fn max_object(&self) -> Size {
        self.max_object
    }
}

impl Iterator for ScaleLevels {
    type Item = ScaleLevel;

    fn next(&mut self) -> Option<ScaleLevel> {
        while !self.done {
            let factor = self.factor;
            let index = self.index;
            self.factor *= self.scale_factor;
            self.index += 1;

            let win_w = round_to_i64(self.native.width as f64 * factor);
            let win_h = round_to_i64(self.native.height as f64 * factor);
            let scaled_w = round_to_i64(self.image.width as f64 / factor);
            let scaled_h = round_to_i64(self.image.height as f64 / factor);
            let proc_w = scaled_w - self.native.width as i64;
            let proc_h = scaled_h - self.native.height as i64;

            if proc_w <= 0 || proc_h <= 0 {
                self.done = true;
                break;
            }
            if win_w > self.max_object.width as i64 || win_h > self.max_object.height as i64 {
                self.done = true;
                break;
            }
            if win_w < self.min_object.width as i64 || win_h < self.min_object.height as i64 {
                continue;
            }

            return Some(ScaleLevel {
                index,
                factor,
                window: Size::new(win_w as usize, win_h as usize),
                scaled: Size::new(scaled_w as usize, scaled_h as usize),
                processing: Size::new(proc_w as usize, proc_h as usize),
                step: step_for_factor(factor),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(image: Size, native: Size, params: ScanParams) -> Vec<ScaleLevel> {
        ScaleLevels::new(image, native, &params)
            .expect("valid parameters")
            .collect()
    }

    #[test]
    fn first_level_is_unscaled() {
        let lv = levels(Size::square(100), Size::square(20), ScanParams::default());
        let first = lv[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.factor, 1.0);
        assert_eq!(first.window, Size::square(20));
        assert_eq!(first.scaled, Size::square(100));
        assert_eq!(first.processing, Size::square(80));
        assert_eq!(first.step, 2);
    }

    #[test]
    fn progression_stops_before_processing_rect_vanishes() {
        let lv = levels(Size::square(100), Size::square(20), ScanParams::default());
        assert!(lv.len() > 3);
        for pair in lv.windows(2) {
            assert!(pair[1].factor > pair[0].factor);
            assert!(pair[1].window.width >= pair[0].window.width);
        }
        for level in &lv {
            assert!(level.processing.width > 0 && level.processing.height > 0);
            assert!(level.window.width <= 100);
            assert_eq!(level.step, if level.factor > 2.0 { 1 } else { 2 });
        }
        // round(100 / 1.2^9) = 19 < 20 ends the search.
        assert_eq!(lv.last().unwrap().index, 8);
    }

    #[test]
    fn small_windows_are_skipped_not_terminal() {
        let params = ScanParams {
            min_size: 30,
            ..Default::default()
        };
        let lv = levels(Size::square(200), Size::square(20), params);
        assert!(!lv.is_empty());
        assert!(lv[0].index > 0);
        assert!(lv.iter().all(|l| l.window.width >= 30));
    }

    #[test]
    fn max_size_caps_window_growth() {
        let params = ScanParams {
            max_size: 40,
            ..Default::default()
        };
        let lv = levels(Size::square(300), Size::square(20), params);
        assert!(lv.iter().all(|l| l.window.width <= 40));
        assert_eq!(lv.last().unwrap().window.width, 35);
    }

    #[test]
    fn min_size_beyond_image_yields_nothing() {
        let params = ScanParams {
            min_size: 500,
            ..Default::default()
        };
        assert!(levels(Size::square(100), Size::square(20), params).is_empty());
    }

    #[test]
    fn empty_image_yields_nothing() {
        assert!(levels(Size::new(0, 0), Size::square(20), ScanParams::default()).is_empty());
    }

    #[test]
    fn zero_area_window_is_an_error() {
        let err = ScaleLevels::new(Size::square(50), Size::new(0, 10), &ScanParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            ScanError::EmptyWindow {
                width: 0,
                height: 10
            }
        );
    }
}
