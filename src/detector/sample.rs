use crate::image::GrayImageU8;
use crate::types::Rect;
use serde::Serialize;
use std::sync::Arc;

/// Metadata travelling with an image through the detector.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Enrollment mode: never substitute the whole image for a miss, and
    /// scan even when the image is empty.
    pub enroll_all: bool,
    /// Training label (`> 0` positive). Unlabelled samples train as negatives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<f32>,
    /// Detection confidence; `1.0` for the whole-image fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Bounding boxes attached to the sample, oldest first.
    pub rects: Vec<Rect>,
    /// Region selected by the detector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_region: Option<Rect>,
}

/// An image plus its metadata. The pixel buffer is shared between the input
/// and every record derived from it.
#[derive(Clone, Debug)]
pub struct Sample {
    pub image: Arc<GrayImageU8>,
    pub metadata: Metadata,
}

impl Sample {
    pub fn new(image: GrayImageU8) -> Self {
        Self {
            image: Arc::new(image),
            metadata: Metadata::default(),
        }
    }

    pub fn with_enroll_all(mut self, enroll_all: bool) -> Self {
        self.metadata.enroll_all = enroll_all;
        self
    }

    pub fn with_label(mut self, label: f32) -> Self {
        self.metadata.label = Some(label);
        self
    }

    /// Record derived from this sample for one detected region.
    pub fn with_region(&self, rect: Rect, confidence: f32) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.confidence = Some(confidence);
        metadata.rects.push(rect);
        metadata.primary_region = Some(rect);
        Self {
            image: Arc::clone(&self.image),
            metadata,
        }
    }
}
