//! Grouping of raw candidates into detections.
//!
//! Candidates from neighbouring positions and scales are merged into
//! equivalence classes (transitive closure of a [`Similarity`] predicate).
//! Classes with fewer than `min_neighbors` members are treated as noise. Each
//! surviving class becomes one [`Detection`] whose rectangle is the rounded
//! coordinate-wise mean of its members and whose confidence is the sum of the
//! member scores.
//!
//! Detections are reported in discovery order (the position of each class's
//! first member in the input); class membership does not depend on the
//! input order.

mod partition;
mod similarity;

pub use partition::partition;
pub use similarity::Similarity;

use crate::diagnostics::ClusterStage;
use crate::types::{Candidate, Detection, Rect};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Weight applied to every member score. All candidates share the same level.
pub const REJECT_LEVEL: f32 = 1.0;

/// Parameters of the grouping stage.
///
/// - `min_neighbors`: minimum class size for a detection.
/// - `eps`: overlap tolerance; larger values merge more aggressively.
/// - `similarity`: predicate used to link two candidates.
/// - `suppress_nested`: drop detections lying inside a better supported one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    pub min_neighbors: usize,
    pub eps: f32,
    pub similarity: Similarity,
    pub suppress_nested: bool,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_neighbors: 5,
            eps: 0.2,
            similarity: Similarity::Overlap,
            suppress_nested: false,
        }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(ClusterError::InvalidEps(self.eps));
        }
        Ok(())
    }
}

/// Invalid grouping configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClusterError {
    InvalidEps(f32),
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterError::InvalidEps(eps) => {
                write!(f, "eps must be finite and non-negative (got {eps})")
            }
        }
    }
}

impl std::error::Error for ClusterError {}

/// Per-class accumulator.
#[derive(Clone, Copy, Default)]
struct ClassSum {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    score: f32,
    count: usize,
}

impl ClassSum {
    fn add(&mut self, c: &Candidate) {
        self.x += c.rect.x as f64;
        self.y += c.rect.y as f64;
        self.w += c.rect.width as f64;
        self.h += c.rect.height as f64;
        self.score += c.score;
        self.count += 1;
    }

    fn mean_rect(&self) -> Rect {
        let n = self.count as f64;
        Rect::new(
            (self.x / n).round() as i32,
            (self.y / n).round() as i32,
            (self.w / n).round() as i32,
            (self.h / n).round() as i32,
        )
    }
}

/// Group `candidates` into detections.
pub fn group_candidates(
    candidates: &[Candidate],
    params: &ClusterParams,
) -> Result<Vec<Detection>, ClusterError> {
    group_candidates_with_stage(candidates, params).map(|(detections, _)| detections)
}

/// Group `candidates` and report class statistics.
pub fn group_candidates_with_stage(
    candidates: &[Candidate],
    params: &ClusterParams,
) -> Result<(Vec<Detection>, ClusterStage), ClusterError> {
    params.validate()?;
    let start = Instant::now();

    let (labels, classes) = partition(candidates.len(), |i, j| {
        params
            .similarity
            .similar(&candidates[i].rect, &candidates[j].rect, params.eps)
    });

    let mut sums = vec![ClassSum::default(); classes];
    for (candidate, &label) in candidates.iter().zip(&labels) {
        sums[label].add(candidate);
    }

    let mut accepted: Vec<Detection> = sums
        .iter()
        .filter(|s| s.count >= params.min_neighbors)
        .map(|s| Detection {
            rect: s.mean_rect(),
            confidence: REJECT_LEVEL * s.score,
            neighbors: s.count,
        })
        .collect();
    let rejected_small = classes - accepted.len();

    let mut suppressed_nested = 0;
    if params.suppress_nested {
        let before = accepted.len();
        accepted = suppress_nested(accepted, params.eps);
        suppressed_nested = before - accepted.len();
    }

    let stage = ClusterStage {
        candidates: candidates.len(),
        classes,
        rejected_small,
        suppressed_nested,
        detections: accepted.len(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        "group_candidates candidates={} classes={} kept={} small={} nested={}",
        stage.candidates, stage.classes, stage.detections, rejected_small, suppressed_nested
    );
    Ok((accepted, stage))
}

/// Drop detections contained (within an `eps` margin) in a better supported
/// detection. Detections with fewer than three members are dropped when
/// nested in any other detection.
fn suppress_nested(detections: Vec<Detection>, eps: f32) -> Vec<Detection> {
    let keep: Vec<bool> = detections
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            !detections.iter().enumerate().any(|(j, outer)| {
                if i == j {
                    return false;
                }
                let dx = (outer.rect.width as f32 * eps).round() as i32;
                let dy = (outer.rect.height as f32 * eps).round() as i32;
                let r1 = &inner.rect;
                let r2 = &outer.rect;
                let inside = r1.x >= r2.x - dx
                    && r1.y >= r2.y - dy
                    && r1.right() <= r2.right() + dx
                    && r1.bottom() <= r2.bottom() + dy;
                inside && (outer.neighbors > inner.neighbors.max(3) || inner.neighbors < 3)
            })
        })
        .collect();
    detections
        .into_iter()
        .zip(keep)
        .filter_map(|(d, keep)| keep.then_some(d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(x: i32, y: i32, side: i32, score: f32) -> Candidate {
        Candidate {
            rect: Rect::new(x, y, side, side),
            factor: side as f64 / 20.0,
            score,
        }
    }

    fn params(min_neighbors: usize) -> ClusterParams {
        ClusterParams {
            min_neighbors,
            ..Default::default()
        }
    }

    #[test]
    fn single_candidate_forms_one_detection() {
        let dets = group_candidates(&[cand(10, 10, 20, 1.0)], &params(1)).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].rect, Rect::new(10, 10, 20, 20));
        assert_eq!(dets[0].confidence, 1.0);
        assert_eq!(dets[0].neighbors, 1);
    }

    #[test]
    fn small_classes_are_discarded() {
        let dets = group_candidates(&[cand(10, 10, 20, 1.0)], &params(2)).unwrap();
        assert!(dets.is_empty());
        assert!(group_candidates(&[], &params(1)).unwrap().is_empty());
    }

    #[test]
    fn neighbours_are_averaged_and_scores_summed() {
        let cands = [
            cand(10, 10, 20, 0.5),
            cand(12, 10, 20, 1.5),
            cand(11, 13, 22, 2.0),
            cand(80, 80, 20, 3.0),
        ];
        let (dets, stage) = group_candidates_with_stage(&cands, &params(3)).unwrap();
        assert_eq!(stage.classes, 2);
        assert_eq!(stage.rejected_small, 1);
        assert_eq!(dets.len(), 1);
        // mean x = 11, y = 11, w = h = 20.67 -> 21
        assert_eq!(dets[0].rect, Rect::new(11, 11, 21, 21));
        assert!((dets[0].confidence - 4.0).abs() < 1e-6);
        assert_eq!(dets[0].neighbors, 3);
    }

    #[test]
    fn membership_does_not_depend_on_input_order() {
        let mut cands = vec![
            cand(10, 10, 20, 1.0),
            cand(60, 60, 24, 1.0),
            cand(12, 11, 20, 1.0),
            cand(62, 58, 24, 1.0),
            cand(14, 12, 20, 1.0),
            cand(61, 61, 24, 1.0),
            cand(100, 5, 20, 1.0),
        ];
        let mut reference: Vec<Rect> = group_candidates(&cands, &params(2))
            .unwrap()
            .iter()
            .map(|d| d.rect)
            .collect();
        reference.sort_by_key(|r| (r.x, r.y));
        assert_eq!(reference.len(), 2);

        for shift in 1..cands.len() {
            cands.rotate_left(1);
            if shift % 2 == 0 {
                cands.reverse();
            }
            let mut got: Vec<Rect> = group_candidates(&cands, &params(2))
                .unwrap()
                .iter()
                .map(|d| d.rect)
                .collect();
            got.sort_by_key(|r| (r.x, r.y));
            assert_eq!(got, reference);
        }
    }

    #[test]
    fn output_follows_discovery_order() {
        let cands = [cand(70, 70, 20, 1.0), cand(5, 5, 20, 1.0)];
        let dets = group_candidates(&cands, &params(1)).unwrap();
        assert_eq!(dets[0].rect.x, 70);
        assert_eq!(dets[1].rect.x, 5);
    }

    #[test]
    fn nested_weak_detection_is_suppressed_when_enabled() {
        let mut cands: Vec<Candidate> = (0..5).map(|i| cand(i, 0, 60, 1.0)).collect();
        cands.push(cand(20, 20, 20, 1.0));
        // Overlap would merge a fully nested window into the large class.
        let mut p = ClusterParams {
            similarity: Similarity::EdgeDistance,
            ..params(1)
        };
        let plain = group_candidates(&cands, &p).unwrap();
        assert_eq!(plain.len(), 2);

        p.suppress_nested = true;
        let (dets, stage) = group_candidates_with_stage(&cands, &p).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].neighbors, 5);
        assert_eq!(stage.suppressed_nested, 1);
    }

    #[test]
    fn invalid_eps_is_rejected() {
        let p = ClusterParams {
            eps: -0.1,
            ..Default::default()
        };
        assert_eq!(
            group_candidates(&[], &p).unwrap_err(),
            ClusterError::InvalidEps(-0.1)
        );
    }
}
