//! Diagnostics data model exposed by the detector and the CLI.
//!
//! `DetectionReport` is the main entry point returned by the detector. It
//! bundles the final detections with the scan statistics (one entry per
//! visited scale level), the grouping summary and stage timings.

pub mod cluster;
pub mod pipeline;
pub mod scan;
pub mod timing;

pub use cluster::ClusterStage;
pub use pipeline::{DetectionReport, InputDescriptor};
pub use scan::{ScaleLevelReport, ScanReport};
pub use timing::{StageTiming, TimingBreakdown};
