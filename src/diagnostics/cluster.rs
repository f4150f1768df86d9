use serde::{Deserialize, Serialize};

/// Outcome of the grouping stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStage {
    pub candidates: usize,
    pub classes: usize,
    /// Classes dropped for having fewer than `min_neighbors` members.
    pub rejected_small: usize,
    pub suppressed_nested: usize,
    pub detections: usize,
    pub elapsed_ms: f64,
}
