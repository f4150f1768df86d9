use crate::types::Rect;
use serde::{Deserialize, Serialize};

/// Predicate deciding whether two windows describe the same object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    /// Intersection width over the smaller width and intersection height
    /// over the smaller height must both exceed `1 - eps`.
    #[default]
    Overlap,
    /// Every edge of one rectangle lies within
    /// `eps * (min width + min height) / 2` of the matching edge of the other.
    EdgeDistance,
}

impl Similarity {
    pub fn similar(self, a: &Rect, b: &Rect, eps: f32) -> bool {
        let min_w = a.width.min(b.width);
        let min_h = a.height.min(b.height);
        if min_w <= 0 || min_h <= 0 {
            return false;
        }
        match self {
            Similarity::Overlap => {
                let (iw, ih) = a.intersection_extent(b);
                let threshold = 1.0 - eps;
                iw as f32 / min_w as f32 > threshold && ih as f32 / min_h as f32 > threshold
            }
            Similarity::EdgeDistance => {
                let delta = eps * (min_w + min_h) as f32 * 0.5;
                let close = |p: i32, q: i32| ((p - q) as f32).abs() <= delta;
                close(a.x, b.x)
                    && close(a.y, b.y)
                    && close(a.right(), b.right())
                    && close(a.bottom(), b.bottom())
            }
        }
    }
}
