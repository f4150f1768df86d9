use std::io::{Read, Write};
use window_detector::image::ImageU8;
use window_detector::{Classifier, ClassifierError, Size};

/// Accepts a window only when its top-left pixel is saturated and its three
/// right/lower neighbours are black. Bilinear resampling blurs an isolated
/// spot, so only unscaled windows anchored exactly on the spot fire.
pub struct SpotClassifier {
    pub window: Size,
}

impl SpotClassifier {
    pub fn new(side: usize) -> Self {
        Self {
            window: Size::square(side),
        }
    }
}

impl Classifier for SpotClassifier {
    fn train(&mut self, _: &[ImageU8<'_>], _: &[f32]) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn classify(&self, window: ImageU8<'_>) -> f32 {
        let isolated = window.get(0, 0) == 255
            && window.get(1, 0) == 0
            && window.get(0, 1) == 0
            && window.get(1, 1) == 0;
        if isolated {
            1.0
        } else {
            -1.0
        }
    }

    fn window_size(&self) -> Size {
        self.window
    }

    fn write(&self, _: &mut dyn Write) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn read(&mut self, _: &mut dyn Read) -> Result<(), ClassifierError> {
        Ok(())
    }
}

/// Rejects everything.
pub struct NeverClassifier(pub Size);

impl Classifier for NeverClassifier {
    fn train(&mut self, _: &[ImageU8<'_>], _: &[f32]) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn classify(&self, _: ImageU8<'_>) -> f32 {
        -1.0
    }

    fn window_size(&self) -> Size {
        self.0
    }

    fn write(&self, _: &mut dyn Write) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn read(&mut self, _: &mut dyn Read) -> Result<(), ClassifierError> {
        Ok(())
    }
}
