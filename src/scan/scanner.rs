//! Sliding-window scanner over the scale progression.
//!
//! For every admissible [`ScaleLevel`] the source image is resampled into the
//! scan's [`ResampleBuffer`] and the native-size window is rastered over the
//! processing rectangle. Windows are zero-copy views into that buffer, so a
//! window can never reach outside the resampled image. Positive scores are
//! mapped back to original-image coordinates and emitted as [`Candidate`]s.
//!
//! Two entry points share the per-row kernel:
//! - [`Scanner::candidates`] is lazy and yields candidates row by row;
//! - [`Scanner::scan_with_report`] collects everything and records per-level
//!   statistics. With the `parallel` feature it classifies the rows of a level
//!   concurrently; rows are concatenated in raster order so the output is the
//!   same as the sequential scan.
use super::levels::{ScaleLevel, ScaleLevels};
use super::params::{ScanError, ScanParams, ZeroScorePolicy};
use crate::classifier::Classifier;
use crate::diagnostics::{ScaleLevelReport, ScanReport};
use crate::image::{ImageU8, ResampleBuffer};
use crate::types::{Candidate, Rect, Size};
use log::debug;
use std::collections::VecDeque;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scanner bound to a classifier and a parameter set.
///
/// Holds no per-image state; one scanner can serve many images, also from
/// several threads.
pub struct Scanner<'c, C: Classifier + ?Sized> {
    classifier: &'c C,
    params: ScanParams,
}

impl<'c, C: Classifier + ?Sized> Scanner<'c, C> {
    /// Validates `params` eagerly so a bad scale factor never reaches a scan.
    pub fn new(classifier: &'c C, params: ScanParams) -> Result<Self, ScanError> {
        params.validate()?;
        Ok(Self { classifier, params })
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Scale levels visited for an image of `image` pixels.
    pub fn levels(&self, image: Size) -> Result<ScaleLevels, ScanError> {
        ScaleLevels::new(image, self.classifier.window_size(), &self.params)
    }

    /// Lazily enumerate candidates of `image`.
    pub fn candidates<'a>(&self, image: ImageU8<'a>) -> Result<Candidates<'a, C>, ScanError>
    where
        'c: 'a,
    {
        let levels = self.levels(Size::new(image.w, image.h))?;
        Ok(Candidates {
            classifier: self.classifier,
            native: self.classifier.window_size(),
            zero_score: self.params.zero_score,
            image,
            levels,
            buffer: ResampleBuffer::with_capacity(image.w, image.h),
            level: None,
            next_row: 0,
            pending: VecDeque::new(),
        })
    }

    /// Collect all candidates of `image`.
    pub fn scan(&self, image: ImageU8<'_>) -> Result<Vec<Candidate>, ScanError> {
        self.scan_with_report(image).map(|(candidates, _)| candidates)
    }

    /// Collect all candidates together with per-level statistics.
    pub fn scan_with_report(
        &self,
        image: ImageU8<'_>,
    ) -> Result<(Vec<Candidate>, ScanReport), ScanError> {
        let levels = self.levels(Size::new(image.w, image.h))?;
        let native = self.classifier.window_size();
        debug!(
            "Scanner::scan start w={} h={} window={}x{} scale_factor={}",
            image.w, image.h, native.width, native.height, self.params.scale_factor
        );
        let total_start = Instant::now();

        let mut buffer = ResampleBuffer::with_capacity(image.w, image.h);
        let mut candidates = Vec::new();
        let mut level_reports = Vec::new();
        for level in levels {
            let level_start = Instant::now();
            let scaled = buffer.resample(image, level.scaled.width, level.scaled.height);
            let before = candidates.len();
            let evaluated = self.scan_level(scaled, &level, &mut candidates);
            let found = candidates.len() - before;
            debug!(
                "  level {} factor={:.3} window={}x{} scaled={}x{} windows={} candidates={}",
                level.index,
                level.factor,
                level.window.width,
                level.window.height,
                level.scaled.width,
                level.scaled.height,
                evaluated,
                found
            );
            level_reports.push(ScaleLevelReport::new(
                &level,
                evaluated,
                found,
                level_start.elapsed().as_secs_f64() * 1000.0,
            ));
        }

        let report = ScanReport {
            image_width: image.w,
            image_height: image.h,
            window_width: native.width,
            window_height: native.height,
            levels: level_reports,
            candidates: candidates.len(),
            elapsed_ms: total_start.elapsed().as_secs_f64() * 1000.0,
        };
        Ok((candidates, report))
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_level(
        &self,
        scaled: ImageU8<'_>,
        level: &ScaleLevel,
        out: &mut Vec<Candidate>,
    ) -> usize {
        let native = self.classifier.window_size();
        let zero_score = self.params.zero_score;
        let mut evaluated = 0;
        for y in (0..level.processing.height).step_by(level.step) {
            evaluated += scan_row(self.classifier, scaled, native, level, y, zero_score, out);
        }
        evaluated
    }

    #[cfg(feature = "parallel")]
    fn scan_level(
        &self,
        scaled: ImageU8<'_>,
        level: &ScaleLevel,
        out: &mut Vec<Candidate>,
    ) -> usize {
        let native = self.classifier.window_size();
        let zero_score = self.params.zero_score;
        let rows: Vec<usize> = (0..level.processing.height).step_by(level.step).collect();
        let per_row: Vec<(Vec<Candidate>, usize)> = rows
            .par_iter()
            .map(|&y| {
                let mut found = Vec::new();
                let evaluated =
                    scan_row(self.classifier, scaled, native, level, y, zero_score, &mut found);
                (found, evaluated)
            })
            .collect();
        let mut evaluated = 0;
        for (found, count) in per_row {
            out.extend(found);
            evaluated += count;
        }
        evaluated
    }
}

/// Classify the windows of row `y` of `level`; returns the number evaluated.
fn scan_row<C: Classifier + ?Sized>(
    classifier: &C,
    scaled: ImageU8<'_>,
    native: Size,
    level: &ScaleLevel,
    y: usize,
    zero_score: ZeroScorePolicy,
    out: &mut Vec<Candidate>,
) -> usize {
    let step = level.step;
    let mut evaluated = 0;
    let mut x = 0;
    while x < level.processing.width {
        let Some(window) = scaled.window(x, y, native.width, native.height) else {
            break;
        };
        let score = classifier.classify(window);
        evaluated += 1;
        if score > 0.0 {
            out.push(Candidate {
                rect: to_original(x, y, level),
                factor: level.factor,
                score,
            });
        }
        x += step;
        if score == 0.0 && zero_score == ZeroScorePolicy::SkipAhead {
            x = x.max(2 * step);
        }
    }
    evaluated
}

/// Map a window origin at `level` back to original-image coordinates.
fn to_original(x: usize, y: usize, level: &ScaleLevel) -> Rect {
    Rect::new(
        (x as f64 * level.factor).round() as i32,
        (y as f64 * level.factor).round() as i32,
        level.window.width as i32,
        level.window.height as i32,
    )
}

/// Lazy candidate sequence returned by [`Scanner::candidates`].
///
/// Owns the scan's resample buffer; it is released when the iterator drops.
pub struct Candidates<'a, C: Classifier + ?Sized> {
    classifier: &'a C,
    native: Size,
    zero_score: ZeroScorePolicy,
    image: ImageU8<'a>,
    levels: ScaleLevels,
    buffer: ResampleBuffer,
    level: Option<ScaleLevel>,
    next_row: usize,
    pending: VecDeque<Candidate>,
}

impl<'a, C: Classifier + ?Sized> Iterator for Candidates<'a, C> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            let level = match self.level {
                Some(level) if self.next_row < level.processing.height => level,
                _ => {
                    let level = self.levels.next()?;
                    self.buffer
                        .resample(self.image, level.scaled.width, level.scaled.height);
                    self.level = Some(level);
                    self.next_row = 0;
                    continue;
                }
            };
            let y = self.next_row;
            self.next_row += level.step;
            let mut found = Vec::new();
            scan_row(
                self.classifier,
                self.buffer.view(),
                self.native,
                &level,
                y,
                self.zero_score,
                &mut found,
            );
            self.pending.extend(found);
        }
    }
}
