//! Load/store a classifier at a caller-supplied path.
//!
//! Path conventions belong to the embedding application; these helpers only
//! open the file, create missing parent directories on store, and surface
//! every failure to the caller.
use super::{Classifier, ClassifierError};
use crate::image::io::ensure_parent_dir;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read model parameters from `path` into `classifier`.
///
/// Fails with [`ClassifierError::Open`] when the file is missing or
/// unreadable; the classifier keeps its previous state on any error.
pub fn load_classifier<C: Classifier + ?Sized>(
    path: &Path,
    classifier: &mut C,
) -> Result<(), ClassifierError> {
    let file = File::open(path).map_err(|source| ClassifierError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    classifier.read(&mut reader)?;
    let size = classifier.window_size();
    debug!(
        "loaded classifier from {} window={}x{}",
        path.display(),
        size.width,
        size.height
    );
    Ok(())
}

/// Write `classifier` to `path`, creating parent directories as needed.
pub fn store_classifier<C: Classifier + ?Sized>(
    path: &Path,
    classifier: &C,
) -> Result<(), ClassifierError> {
    let create_err = |source| ClassifierError::Create {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(create_err)?;
    let file = File::create(path).map_err(create_err)?;
    let mut writer = BufWriter::new(file);
    classifier.write(&mut writer)?;
    writer.flush()?;
    debug!("stored classifier to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LinearWindowClassifier;
    use crate::types::Size;

    #[test]
    fn missing_model_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let mut clf = LinearWindowClassifier::new(Size::square(3));
        let err = load_classifier(&path, &mut clf).unwrap_err();
        assert!(matches!(err, ClassifierError::Open { .. }));
        assert!(err.to_string().contains("absent.json"));
        assert_eq!(clf.window_size(), Size::square(3));
    }

    #[test]
    fn malformed_model_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"window_width\": 2").unwrap();
        let mut clf = LinearWindowClassifier::new(Size::square(3));
        let err = load_classifier(&path, &mut clf).unwrap_err();
        assert!(matches!(err, ClassifierError::Format(_)));
    }

    #[test]
    fn store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("model.json");
        let clf = LinearWindowClassifier::from_parts(Size::new(2, 1), vec![0.5, -0.5], 0.1).unwrap();
        store_classifier(&path, &clf).unwrap();
        assert!(path.is_file());

        let mut restored = LinearWindowClassifier::new(Size::square(1));
        load_classifier(&path, &mut restored).unwrap();
        assert_eq!(restored.weights(), &[0.5, -0.5]);
    }

    #[test]
    fn unwritable_destination_is_a_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let clf = LinearWindowClassifier::new(Size::square(2));
        let err = store_classifier(&blocker.join("model.json"), &clf).unwrap_err();
        assert!(matches!(err, ClassifierError::Create { .. }));
    }
}
