//! Detection driver: one sample in, zero or more region records out.
//!
//! Overview
//! - Empty images are forwarded untouched unless the sample is being
//!   enrolled.
//! - Otherwise the image is scanned over the scale progression
//!   ([`crate::scan`]) and the candidates are grouped ([`crate::cluster`]).
//! - When nothing survives grouping and the sample is not being enrolled, a
//!   single detection covering the whole image with confidence `1` is used.
//! - Each detection becomes a record sharing the input pixels, with the
//!   rectangle appended to the box list and set as the primary region.
//!
//! Modules
//! - [`params`] – configuration used by the detector and CLI.
//! - `pipeline` – the [`WindowDetector`] implementation.
//! - `sample` – the [`Sample`]/[`Metadata`] record type.

pub mod params;
mod pipeline;
mod sample;

pub use params::DetectorParams;
pub use pipeline::WindowDetector;
pub use sample::{Metadata, Sample};

use crate::classifier::ClassifierError;
use crate::cluster::ClusterError;
use crate::scan::ScanError;

/// Failures surfaced by [`WindowDetector`].
#[derive(Debug)]
pub enum DetectError {
    Scan(ScanError),
    Cluster(ClusterError),
    Classifier(ClassifierError),
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::Scan(err) => write!(f, "scan failed: {err}"),
            DetectError::Cluster(err) => write!(f, "grouping failed: {err}"),
            DetectError::Classifier(err) => write!(f, "classifier failed: {err}"),
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectError::Scan(err) => Some(err),
            DetectError::Cluster(err) => Some(err),
            DetectError::Classifier(err) => Some(err),
        }
    }
}

impl From<ScanError> for DetectError {
    fn from(err: ScanError) -> Self {
        DetectError::Scan(err)
    }
}

impl From<ClusterError> for DetectError {
    fn from(err: ClusterError) -> Self {
        DetectError::Cluster(err)
    }
}

impl From<ClassifierError> for DetectError {
    fn from(err: ClassifierError) -> Self {
        DetectError::Classifier(err)
    }
}
