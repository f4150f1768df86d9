use crate::diagnostics::{ClusterStage, ScanReport, TimingBreakdown};
use crate::types::Detection;
use serde::Serialize;

/// Result produced by
/// [`WindowDetector::process_with_diagnostics`](crate::WindowDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub input: InputDescriptor,
    /// Detections handed to the output records (including the fallback).
    pub detections: Vec<Detection>,
    /// The whole-image rectangle was substituted for an empty result.
    pub fallback: bool,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterStage>,
}

impl DetectionReport {
    /// Report for an input passed through without scanning.
    pub fn passthrough(input: InputDescriptor) -> Self {
        Self {
            input,
            detections: Vec::new(),
            fallback: false,
            timings: TimingBreakdown::default(),
            scan: None,
            cluster: None,
        }
    }

    /// True when the input was forwarded untouched.
    pub fn is_passthrough(&self) -> bool {
        self.scan.is_none()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub enroll_all: bool,
}
