//! Detector pipeline driving one sample end-to-end.
//!
//! The [`WindowDetector`] owns a classifier and a parameter set. Feeding it a
//! [`Sample`] scans the image over the scale progression, groups the
//! candidates and turns every detection into an output record that shares the
//! input pixels.
//!
//! Typical usage:
//! ```no_run
//! use window_detector::{DetectorParams, LinearWindowClassifier, Sample, WindowDetector};
//! use window_detector::image::GrayImageU8;
//! use window_detector::types::Size;
//!
//! # fn example(gray: GrayImageU8) -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = LinearWindowClassifier::new(Size::square(20));
//! let detector = WindowDetector::new(classifier, DetectorParams::default())?;
//! for record in detector.process(&Sample::new(gray))? {
//!     println!("{:?} {:?}", record.metadata.primary_region, record.metadata.confidence);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::DetectorParams;
use super::sample::Sample;
use super::DetectError;
use crate::classifier::Classifier;
use crate::cluster::{group_candidates, group_candidates_with_stage};
use crate::diagnostics::{DetectionReport, InputDescriptor, TimingBreakdown};
use crate::image::ImageU8;
use crate::scan::Scanner;
use crate::types::{Detection, Size};
use log::debug;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sliding-window detector: scan, group, fall back to the whole image.
pub struct WindowDetector<C: Classifier> {
    classifier: C,
    params: DetectorParams,
}

impl<C: Classifier> WindowDetector<C> {
    /// Create a detector; invalid parameters are rejected here.
    pub fn new(classifier: C, params: DetectorParams) -> Result<Self, DetectError> {
        params.validate()?;
        Ok(Self { classifier, params })
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }

    pub fn into_classifier(self) -> C {
        self.classifier
    }

    /// Train the classifier on labelled samples (missing labels count as -1).
    pub fn train(&mut self, samples: &[Sample]) -> Result<(), DetectError> {
        let views: Vec<ImageU8<'_>> = samples.iter().map(|s| s.image.as_view()).collect();
        let labels: Vec<f32> = samples
            .iter()
            .map(|s| s.metadata.label.unwrap_or(-1.0))
            .collect();
        debug!("WindowDetector::train samples={}", samples.len());
        self.classifier.train(&views, &labels)?;
        Ok(())
    }

    /// Grouped detections of `image`, clipped to its extents. No fallback.
    pub fn detect(&self, image: ImageU8<'_>) -> Result<Vec<Detection>, DetectError> {
        let scanner = Scanner::new(&self.classifier, self.params.scan.clone())?;
        let candidates = scanner.scan(image)?;
        let detections = group_candidates(&candidates, &self.params.cluster)?;
        let size = Size::new(image.w, image.h);
        Ok(detections.into_iter().map(|d| clip(d, size)).collect())
    }

    /// Output records for one sample.
    pub fn process(&self, sample: &Sample) -> Result<Vec<Sample>, DetectError> {
        self.process_with_diagnostics(sample).map(|(records, _)| records)
    }

    /// Output records for one sample plus a report of every stage.
    pub fn process_with_diagnostics(
        &self,
        sample: &Sample,
    ) -> Result<(Vec<Sample>, DetectionReport), DetectError> {
        let image = sample.image.as_view();
        let enroll_all = sample.metadata.enroll_all;
        let input = InputDescriptor {
            width: image.w,
            height: image.h,
            enroll_all,
        };
        if image.is_empty() && !enroll_all {
            debug!("WindowDetector::process empty image, forwarding input");
            return Ok((vec![sample.clone()], DetectionReport::passthrough(input)));
        }

        debug!(
            "WindowDetector::process start w={} h={} enroll_all={}",
            image.w, image.h, enroll_all
        );
        let total_start = Instant::now();

        let scanner = Scanner::new(&self.classifier, self.params.scan.clone())?;
        let (candidates, scan_report) = scanner.scan_with_report(image)?;
        let (detections, cluster_stage) =
            group_candidates_with_stage(&candidates, &self.params.cluster)?;

        let size = Size::new(image.w, image.h);
        let mut detections: Vec<Detection> =
            detections.into_iter().map(|d| clip(d, size)).collect();
        let fallback = detections.is_empty() && !enroll_all;
        if fallback {
            debug!(
                "WindowDetector::process no detections, using whole image {}x{}",
                size.width, size.height
            );
            detections.push(Detection::fallback(size));
        }

        let records: Vec<Sample> = detections
            .iter()
            .map(|d| sample.with_region(d.rect, d.confidence))
            .collect();

        let mut timings =
            TimingBreakdown::with_total(total_start.elapsed().as_secs_f64() * 1000.0);
        timings.push("scan", scan_report.elapsed_ms);
        timings.push("cluster", cluster_stage.elapsed_ms);
        debug!(
            "WindowDetector::process done candidates={} records={} fallback={} total_ms={:.3}",
            candidates.len(),
            records.len(),
            fallback,
            timings.total_ms
        );

        let report = DetectionReport {
            input,
            detections,
            fallback,
            timings,
            scan: Some(scan_report),
            cluster: Some(cluster_stage),
        };
        Ok((records, report))
    }

    /// Process every sample; records are concatenated in input order.
    pub fn process_batch(&self, samples: &[Sample]) -> Result<Vec<Sample>, DetectError> {
        #[cfg(feature = "parallel")]
        let per_sample: Vec<Vec<Sample>> = samples
            .par_iter()
            .map(|s| self.process(s))
            .collect::<Result<_, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let per_sample: Vec<Vec<Sample>> = samples
            .iter()
            .map(|s| self.process(s))
            .collect::<Result<_, _>>()?;
        Ok(per_sample.into_iter().flatten().collect())
    }
}

fn clip(detection: Detection, size: Size) -> Detection {
    Detection {
        rect: detection.rect.clamp_to(size),
        ..detection
    }
}
