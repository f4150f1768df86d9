//! Multi-scale sliding-window search.
//!
//! Overview
//! - [`levels`] derives the geometric scale progression: for each factor the
//!   image is shrunk so the classifier always sees its native window size.
//! - [`scanner`] resamples the image per level into one reusable buffer and
//!   rasters the classifier window over it, emitting positively scored
//!   windows mapped back to original coordinates.
//!
//! The scan is deterministic: the same image, parameters and model always
//! yield the same candidate sequence.

pub mod levels;
pub mod params;
pub mod scanner;

pub use levels::{step_for_factor, ScaleLevel, ScaleLevels};
pub use params::{ScanError, ScanParams, ZeroScorePolicy};
pub use scanner::{Candidates, Scanner};
