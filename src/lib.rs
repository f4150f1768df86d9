#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod types;

// Stage modules – public so tools can drive a single stage.
pub mod cluster;
pub mod config;
pub mod scan;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + records.
pub use crate::detector::{DetectError, DetectorParams, Metadata, Sample, WindowDetector};
pub use crate::types::{Candidate, Detection, Rect, Size};

// Classifier contract, reference model and persistence.
pub use crate::classifier::{
    load_classifier, store_classifier, Classifier, ClassifierError, LinearWindowClassifier,
};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::DetectionReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use std::path::Path;
/// use window_detector::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (640usize, 480usize);
/// let gray = GrayImageU8::zeros(w, h);
///
/// let mut classifier = LinearWindowClassifier::new(Size::square(24));
/// load_classifier(Path::new("model.json"), &mut classifier)?;
///
/// let det = WindowDetector::new(classifier, DetectorParams::default())?;
/// for record in det.process(&Sample::new(gray))? {
///     println!("{:?}", record.metadata.primary_region);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{GrayImageU8, ImageU8};
    pub use crate::{
        load_classifier, Classifier, DetectorParams, LinearWindowClassifier, Sample, Size,
        WindowDetector,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::cluster::{group_candidates, ClusterParams, Similarity};
    pub use crate::scan::{ScaleLevel, ScaleLevels, ScanParams, Scanner, ZeroScorePolicy};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        ClusterStage, InputDescriptor, ScaleLevelReport, ScanReport, StageTiming,
        TimingBreakdown,
    };
}
