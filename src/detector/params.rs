//! Parameter types configuring the detector stages.
//!
//! The scan and grouping knobs live with their stages ([`ScanParams`],
//! [`ClusterParams`]); this module bundles them into the one value that a
//! detector and the CLI configuration carry around.

use super::DetectError;
use crate::cluster::ClusterParams;
use crate::scan::ScanParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
///
/// Defaults: `min_size = 20`, `max_size = -1` (whole image),
/// `scale_factor = 1.2`, `min_neighbors = 5`, `eps = 0.2`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Pyramid progression and search range.
    pub scan: ScanParams,
    /// Candidate grouping.
    pub cluster: ClusterParams,
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), DetectError> {
        self.scan.validate()?;
        self.cluster.validate()?;
        Ok(())
    }
}
