//! Linear template classifier trained by ridge regression.
//!
//! Features are the window's pixels scaled to `[0, 1]` in row-major order.
//! The score is `w · x + b`; training regresses labels mapped to `±1` and
//! solves the regularised normal equations
//! `(XᵀX + λ·I) w = Xᵀy` (the bias column is not regularised).
use super::{Classifier, ClassifierError};
use crate::image::{resize_bilinear_into, ImageU8, ImageView};
use crate::types::Size;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const DEFAULT_RIDGE: f64 = 1e-2;

/// Linear window classifier. An untrained model rejects every window.
#[derive(Clone, Debug)]
pub struct LinearWindowClassifier {
    window: Size,
    weights: Vec<f32>,
    bias: f32,
    ridge: f64,
}

/// On-disk representation.
#[derive(Serialize, Deserialize)]
struct LinearModel {
    window_width: usize,
    window_height: usize,
    weights: Vec<f32>,
    bias: f32,
}

impl LinearWindowClassifier {
    /// Untrained classifier for windows of `window` pixels.
    pub fn new(window: Size) -> Self {
        Self {
            window,
            weights: vec![0.0; window.area()],
            bias: -1.0,
            ridge: DEFAULT_RIDGE,
        }
    }

    /// Build a classifier from explicit parameters (one weight per pixel).
    pub fn from_parts(window: Size, weights: Vec<f32>, bias: f32) -> Result<Self, ClassifierError> {
        if weights.len() != window.area() {
            return Err(ClassifierError::Format(format!(
                "expected {} weights for a {}x{} window, got {}",
                window.area(),
                window.width,
                window.height,
                weights.len()
            )));
        }
        Ok(Self {
            window,
            weights,
            bias,
            ridge: DEFAULT_RIDGE,
        })
    }

    /// Regularisation strength used by [`Classifier::train`].
    pub fn with_ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge.max(0.0);
        self
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Row-major `[0, 1]` features of `sample`, resized to the native window.
    fn features(&self, sample: ImageU8<'_>, scratch: &mut Vec<u8>) -> Vec<f64> {
        let (w, h) = (self.window.width, self.window.height);
        let view = if sample.w == w && sample.h == h {
            sample
        } else {
            scratch.resize(w * h, 0);
            resize_bilinear_into(sample, scratch, w, h);
            ImageU8::new(w, h, &scratch[..])
        };
        view.rows()
            .flat_map(|row| row.iter().map(|&v| v as f64 / 255.0))
            .collect()
    }
}

impl Classifier for LinearWindowClassifier {
    fn train(&mut self, samples: &[ImageU8<'_>], labels: &[f32]) -> Result<(), ClassifierError> {
        if samples.len() != labels.len() {
            return Err(ClassifierError::Training(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        let usable: Vec<usize> = (0..samples.len())
            .filter(|&i| !samples[i].is_empty())
            .collect();
        if usable.len() < samples.len() {
            warn!(
                "skipping {} empty training samples",
                samples.len() - usable.len()
            );
        }
        if usable.is_empty() {
            return Err(ClassifierError::Training("no usable samples".to_string()));
        }

        let dim = self.window.area();
        let mut x = DMatrix::<f64>::zeros(usable.len(), dim + 1);
        let mut y = DVector::<f64>::zeros(usable.len());
        let mut scratch = Vec::new();
        for (row, &i) in usable.iter().enumerate() {
            let feats = self.features(samples[i], &mut scratch);
            for (col, v) in feats.into_iter().enumerate() {
                x[(row, col)] = v;
            }
            x[(row, dim)] = 1.0;
            y[row] = if labels[i] > 0.0 { 1.0 } else { -1.0 };
        }

        let xt = x.transpose();
        let mut gram = &xt * &x;
        for d in 0..dim {
            gram[(d, d)] += self.ridge;
        }
        let rhs = &xt * &y;
        let solution = match gram.clone().cholesky() {
            Some(chol) => chol.solve(&rhs),
            None => gram
                .lu()
                .solve(&rhs)
                .ok_or_else(|| ClassifierError::Training("singular normal equations".into()))?,
        };

        self.weights = solution.iter().take(dim).map(|&v| v as f32).collect();
        self.bias = solution[dim] as f32;
        debug!(
            "trained linear classifier on {} samples ({} positive) bias={:.4}",
            usable.len(),
            usable.iter().filter(|&&i| labels[i] > 0.0).count(),
            self.bias
        );
        Ok(())
    }

    fn classify(&self, window: ImageU8<'_>) -> f32 {
        let (w, h) = (self.window.width, self.window.height);
        if window.w != w || window.h != h {
            return -1.0;
        }
        let mut score = self.bias;
        for (row, weights) in window.rows().zip(self.weights.chunks_exact(w)) {
            score += row
                .iter()
                .zip(weights)
                .map(|(&px, &wt)| px as f32 * (1.0 / 255.0) * wt)
                .sum::<f32>();
        }
        score
    }

    fn window_size(&self) -> Size {
        self.window
    }

    fn write(&self, writer: &mut dyn Write) -> Result<(), ClassifierError> {
        let model = LinearModel {
            window_width: self.window.width,
            window_height: self.window.height,
            weights: self.weights.clone(),
            bias: self.bias,
        };
        serde_json::to_writer_pretty(&mut *writer, &model)
            .map_err(|e| ClassifierError::Format(e.to_string()))?;
        Ok(())
    }

    fn read(&mut self, reader: &mut dyn Read) -> Result<(), ClassifierError> {
        let model: LinearModel =
            serde_json::from_reader(reader).map_err(|e| ClassifierError::Format(e.to_string()))?;
        let window = Size::new(model.window_width, model.window_height);
        if window.area() == 0 {
            return Err(ClassifierError::Format("zero-area window".to_string()));
        }
        let parsed = Self::from_parts(window, model.weights, model.bias)?;
        self.window = parsed.window;
        self.weights = parsed.weights;
        self.bias = parsed.bias;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(value: u8, size: usize) -> Vec<u8> {
        vec![value; size * size]
    }

    #[test]
    fn untrained_model_rejects_everything() {
        let clf = LinearWindowClassifier::new(Size::square(4));
        let data = patch(255, 4);
        assert!(clf.classify(ImageU8::new(4, 4, &data)) < 0.0);
    }

    #[test]
    fn training_separates_bright_from_dark_patches() {
        let bright: Vec<Vec<u8>> = (0..6).map(|i| patch(200 + i * 5, 4)).collect();
        let dark: Vec<Vec<u8>> = (0..6).map(|i| patch(10 + i * 5, 4)).collect();
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        for p in &bright {
            samples.push(ImageU8::new(4, 4, p));
            labels.push(1.0);
        }
        for p in &dark {
            samples.push(ImageU8::new(4, 4, p));
            labels.push(-1.0);
        }
        let mut clf = LinearWindowClassifier::new(Size::square(4)).with_ridge(1e-3);
        clf.train(&samples, &labels).expect("training succeeds");

        let hi = patch(230, 4);
        let lo = patch(20, 4);
        assert!(clf.classify(ImageU8::new(4, 4, &hi)) > 0.0);
        assert!(clf.classify(ImageU8::new(4, 4, &lo)) < 0.0);
    }

    #[test]
    fn training_rejects_mismatched_labels() {
        let p = patch(1, 4);
        let mut clf = LinearWindowClassifier::new(Size::square(4));
        let err = clf
            .train(&[ImageU8::new(4, 4, &p)], &[1.0, -1.0])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Training(_)));
    }

    #[test]
    fn read_keeps_previous_model_on_malformed_input() {
        let mut clf =
            LinearWindowClassifier::from_parts(Size::square(2), vec![1.0; 4], 0.5).unwrap();
        let mut bad = "{\"window_width\": 2, \"window_height\": 2, \"weights\": [1.0], \"bias\": 0}"
            .as_bytes();
        assert!(clf.read(&mut bad).is_err());
        assert_eq!(clf.weights(), &[1.0; 4]);
        assert_eq!(clf.bias(), 0.5);
    }

    #[test]
    fn write_then_read_restores_parameters() {
        let weights = vec![0.5, -1.0, 2.0, 0.0, 1.0, 3.0];
        let clf = LinearWindowClassifier::from_parts(Size::new(3, 2), weights, -0.25).unwrap();
        let mut bytes = Vec::new();
        clf.write(&mut bytes).unwrap();
        let mut restored = LinearWindowClassifier::new(Size::square(1));
        restored.read(&mut bytes.as_slice()).unwrap();
        assert_eq!(restored.window_size(), Size::new(3, 2));
        assert_eq!(restored.weights(), clf.weights());
        assert_eq!(restored.bias(), -0.25);
    }
}
