use crate::scan::ScaleLevel;
use serde::{Deserialize, Serialize};

/// Statistics for one visited scale level.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLevelReport {
    pub level_index: usize,
    pub factor: f64,
    pub window_width: usize,
    pub window_height: usize,
    pub scaled_width: usize,
    pub scaled_height: usize,
    pub step: usize,
    pub windows_evaluated: usize,
    pub candidates: usize,
    pub elapsed_ms: f64,
}

impl ScaleLevelReport {
    pub fn new(
        level: &ScaleLevel,
        windows_evaluated: usize,
        candidates: usize,
        elapsed_ms: f64,
    ) -> Self {
        Self {
            level_index: level.index,
            factor: level.factor,
            window_width: level.window.width,
            window_height: level.window.height,
            scaled_width: level.scaled.width,
            scaled_height: level.scaled.height,
            step: level.step,
            windows_evaluated,
            candidates,
            elapsed_ms,
        }
    }
}

/// Scan summary across all levels.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub image_width: usize,
    pub image_height: usize,
    pub window_width: usize,
    pub window_height: usize,
    pub levels: Vec<ScaleLevelReport>,
    pub candidates: usize,
    pub elapsed_ms: f64,
}

impl ScanReport {
    /// Total classifier invocations.
    pub fn windows_evaluated(&self) -> usize {
        self.levels.iter().map(|l| l.windows_evaluated).sum()
    }
}
