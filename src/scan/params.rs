//! Parameters for the scale-space scan.
use serde::{Deserialize, Serialize};

/// How the row cursor reacts to a classifier score of exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScorePolicy {
    /// Move the horizontal cursor forward to `step` before the regular
    /// increment. Only the first window of a row can trigger the jump, which
    /// then skips the second origin of that row.
    #[default]
    SkipAhead,
    /// Treat zero like any other non-positive score.
    Reject,
}

/// Search range and pyramid progression.
///
/// - `min_size`: smallest object side (pixels) worth scanning; smaller
///   window sizes are skipped but do not end the search.
/// - `max_size`: largest object side; non-positive means "image size".
/// - `scale_factor`: multiplicative step between pyramid levels (> 1).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub min_size: i32,
    pub max_size: i32,
    pub scale_factor: f64,
    pub zero_score: ZeroScorePolicy,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            min_size: 20,
            max_size: -1,
            scale_factor: 1.2,
            zero_score: ZeroScorePolicy::default(),
        }
    }
}

impl ScanParams {
    /// Reject configurations that could never advance the pyramid.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(ScanError::InvalidScaleFactor(self.scale_factor));
        }
        Ok(())
    }
}

/// Reasons a scan cannot start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanError {
    /// `scale_factor` must be finite and strictly greater than one.
    InvalidScaleFactor(f64),
    /// The classifier reports a zero-area native window.
    EmptyWindow { width: usize, height: usize },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::InvalidScaleFactor(factor) => {
                write!(f, "scale factor must be > 1 (got {factor})")
            }
            ScanError::EmptyWindow { width, height } => {
                write!(f, "classifier window {width}x{height} has no area")
            }
        }
    }
}

impl std::error::Error for ScanError {}
