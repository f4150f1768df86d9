//! Window classifier contract used by the scanner.
//!
//! The scanner only needs four things from a model: a fixed native window
//! size, a scoring function, training, and (de)serialisation. Any model that
//! can provide them (boosted cascade, linear template, neural net) plugs in
//! through [`Classifier`]. The crate ships [`LinearWindowClassifier`] as a
//! small reference model for tools and tests.
//!
//! Scanning borrows the classifier immutably and training borrows it
//! mutably, so the borrow checker enforces the single-writer/many-reader
//! discipline within one process.

mod linear;
mod persist;

pub use linear::LinearWindowClassifier;
pub use persist::{load_classifier, store_classifier};

use crate::image::ImageU8;
use crate::types::Size;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Binary window classifier.
///
/// `classify` must be a pure function of the window and the current model;
/// it may be called concurrently from several threads.
pub trait Classifier: Send + Sync {
    /// Fit the model to `samples` with one label per sample (`> 0` positive).
    fn train(&mut self, samples: &[ImageU8<'_>], labels: &[f32]) -> Result<(), ClassifierError>;

    /// Score a window of exactly [`window_size`](Self::window_size) pixels.
    ///
    /// Positive scores accept the window; the magnitude is used as
    /// confidence when detections are aggregated.
    fn classify(&self, window: ImageU8<'_>) -> f32;

    /// Native window size the model was trained for.
    fn window_size(&self) -> Size;

    /// Serialise the model parameters.
    fn write(&self, writer: &mut dyn Write) -> Result<(), ClassifierError>;

    /// Replace the model parameters with ones read from `reader`.
    ///
    /// On error the previous model must be left untouched.
    fn read(&mut self, reader: &mut dyn Read) -> Result<(), ClassifierError>;
}

/// Failures raised by classifiers and their persistence helpers.
#[derive(Debug)]
pub enum ClassifierError {
    /// The model file could not be opened for reading.
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The model destination (or its directory) could not be created.
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stream-level failure while reading or writing model data.
    Io(std::io::Error),
    /// Model data was readable but malformed.
    Format(String),
    /// Training inputs were rejected or the fit did not converge.
    Training(String),
}

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierError::Open { path, source } => {
                write!(f, "unable to open model {}: {source}", path.display())
            }
            ClassifierError::Create { path, source } => {
                write!(f, "unable to create model file {}: {source}", path.display())
            }
            ClassifierError::Io(err) => write!(f, "model i/o failed: {err}"),
            ClassifierError::Format(msg) => write!(f, "malformed model: {msg}"),
            ClassifierError::Training(msg) => write!(f, "training failed: {msg}"),
        }
    }
}

impl std::error::Error for ClassifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifierError::Open { source, .. } | ClassifierError::Create { source, .. } => {
                Some(source)
            }
            ClassifierError::Io(err) => Some(err),
            ClassifierError::Format(_) | ClassifierError::Training(_) => None,
        }
    }
}

impl From<std::io::Error> for ClassifierError {
    fn from(err: std::io::Error) -> Self {
        ClassifierError::Io(err)
    }
}
