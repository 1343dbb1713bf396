//! Sampled stroke geometry: an ordered polyline with per-sample width.
//!
//! Strokes are the authored geometry of edge cells. All parametric access
//! is by normalized arclength in [0,1], which is what the cut operation
//! hands out and what keeps slice lengths additive.

use crate::point::Point2;
use serde::{Deserialize, Serialize};

/// One polyline sample: a centerline position and the brush width there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSample {
    pub pos: Point2,
    pub width: f64,
}

impl StrokeSample {
    #[inline]
    pub fn new(pos: Point2, width: f64) -> Self {
        Self { pos, width }
    }

    #[inline]
    fn lerp(&self, other: StrokeSample, t: f64) -> StrokeSample {
        StrokeSample {
            pos: self.pos.lerp(other.pos, t),
            width: self.width + (other.width - self.width) * t,
        }
    }
}

/// An ordered stroke. At least two samples for a drawable stroke; a closed
/// (loop) stroke simply repeats its first position as its last.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    samples: Vec<StrokeSample>,
}

impl Stroke {
    pub fn new(samples: Vec<StrokeSample>) -> Self {
        Self { samples }
    }

    /// Straight two-sample stroke, handy for construction and tests.
    pub fn line(start: Point2, end: Point2, width: f64) -> Self {
        Self {
            samples: vec![StrokeSample::new(start, width), StrokeSample::new(end, width)],
        }
    }

    #[inline]
    pub fn samples(&self) -> &[StrokeSample] {
        &self.samples
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.len() < 2
    }

    pub fn start(&self) -> Option<StrokeSample> {
        self.samples.first().copied()
    }

    pub fn end(&self) -> Option<StrokeSample> {
        self.samples.last().copied()
    }

    /// Cumulative arclength at each sample; `cum[0] == 0`.
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut cum = Vec::with_capacity(self.samples.len());
        let mut acc = 0.0;
        cum.push(0.0);
        for w in self.samples.windows(2) {
            acc += w[0].pos.distance(w[1].pos);
            cum.push(acc);
        }
        cum
    }

    /// Total arclength of the centerline polyline.
    pub fn arclength(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| w[0].pos.distance(w[1].pos))
            .sum()
    }

    /// Interpolated sample at normalized arclength `t`, clamped to [0,1].
    pub fn sample_at(&self, t: f64) -> StrokeSample {
        if self.samples.is_empty() {
            return StrokeSample::default();
        }
        if self.samples.len() == 1 {
            return self.samples[0];
        }
        let cum = self.cumulative_lengths();
        let total = *cum.last().unwrap_or(&0.0);
        if total <= 0.0 {
            return self.samples[0];
        }
        let s = t.clamp(0.0, 1.0) * total;
        // Find the segment containing s.
        let mut i = match cum.binary_search_by(|c| c.partial_cmp(&s).unwrap_or(std::cmp::Ordering::Less)) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        if i + 1 >= self.samples.len() {
            i = self.samples.len() - 2;
        }
        let seg = cum[i + 1] - cum[i];
        let local = if seg > 0.0 { (s - cum[i]) / seg } else { 0.0 };
        self.samples[i].lerp(self.samples[i + 1], local)
    }

    /// Slice at sorted normalized parameters strictly inside (0,1).
    /// Returns `params.len() + 1` sub-strokes whose arclengths sum to the
    /// original; boundary samples are duplicated into both neighbors.
    pub fn split_at(&self, params: &[f64]) -> Vec<Stroke> {
        if params.is_empty() {
            return vec![self.clone()];
        }
        let cum = self.cumulative_lengths();
        let total = *cum.last().unwrap_or(&0.0);
        let mut pieces = Vec::with_capacity(params.len() + 1);
        let mut current = vec![self.sample_at(0.0)];
        let mut next_interior = 1usize;
        for &p in params {
            let s = p.clamp(0.0, 1.0) * total;
            // Carry interior samples strictly before the split point.
            while next_interior + 1 < self.samples.len() && cum[next_interior] < s {
                current.push(self.samples[next_interior]);
                next_interior += 1;
            }
            let boundary = self.sample_at(p);
            current.push(boundary);
            pieces.push(Stroke::new(current));
            current = vec![boundary];
        }
        // Tail: remaining interior samples plus the final endpoint.
        while next_interior + 1 < self.samples.len() {
            current.push(self.samples[next_interior]);
            next_interior += 1;
        }
        if let Some(last) = self.samples.last() {
            current.push(*last);
        }
        pieces.push(Stroke::new(current));
        pieces
    }

    /// Orientation flip.
    pub fn reversed(&self) -> Stroke {
        let mut samples = self.samples.clone();
        samples.reverse();
        Stroke::new(samples)
    }

    /// Join `other` onto the end of `self`. The strokes are expected to
    /// share an endpoint; `other`'s first sample is dropped to avoid a
    /// zero-length segment.
    pub fn concat(&self, other: &Stroke) -> Stroke {
        let mut samples = self.samples.clone();
        samples.extend(other.samples.iter().skip(1).copied());
        Stroke::new(samples)
    }

    /// Re-anchor the stroke so its endpoints exactly match `start`/`end`.
    /// Each sample is translated by the linear blend of the two endpoint
    /// corrections, weighted by normalized arclength.
    pub fn snapped(&self, start: Point2, end: Point2) -> Stroke {
        if self.samples.len() < 2 {
            return self.clone();
        }
        let d0 = start - self.samples[0].pos;
        let d1 = end - self.samples[self.samples.len() - 1].pos;
        let cum = self.cumulative_lengths();
        let total = *cum.last().unwrap_or(&0.0);
        let n = self.samples.len();
        let samples = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let t = if total > 0.0 {
                    cum[i] / total
                } else {
                    i as f64 / (n - 1) as f64
                };
                StrokeSample::new(s.pos + d0.lerp(d1, t), s.width)
            })
            .collect();
        Stroke::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "left={a} right={b}");
    }

    fn poly(points: &[(f64, f64)]) -> Stroke {
        Stroke::new(
            points
                .iter()
                .map(|&(x, y)| StrokeSample::new(Point2::new(x, y), 1.0))
                .collect(),
        )
    }

    #[test]
    fn arclength_of_polyline() {
        let s = poly(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        approx(s.arclength(), 7.0);
    }

    #[test]
    fn sample_at_midpoint() {
        let s = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        let mid = s.sample_at(0.5);
        approx(mid.pos.x, 5.0);
        approx(mid.pos.y, 0.0);
    }

    #[test]
    fn split_preserves_total_length() {
        let s = poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (8.0, 4.0)]);
        let total = s.arclength();
        let pieces = s.split_at(&[0.25, 0.6]);
        assert_eq!(pieces.len(), 3);
        let sum: f64 = pieces.iter().map(Stroke::arclength).sum();
        approx(sum, total);
        // Adjacent pieces share a boundary sample.
        assert_eq!(pieces[0].end(), pieces[1].start());
        assert_eq!(pieces[1].end(), pieces[2].start());
    }

    #[test]
    fn split_vertex_matches_sample() {
        let s = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        let pieces = s.split_at(&[0.3]);
        let v = s.sample_at(0.3);
        assert_eq!(pieces[0].end(), Some(v));
        assert_eq!(pieces[1].start(), Some(v));
        approx(v.pos.x, 3.0);
    }

    #[test]
    fn concat_of_split_reproduces_endpoints() {
        let s = poly(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        let pieces = s.split_at(&[0.5]);
        let joined = pieces[0].concat(&pieces[1]);
        assert_eq!(joined.start(), s.start());
        assert_eq!(joined.end(), s.end());
        approx(joined.arclength(), s.arclength());
    }

    #[test]
    fn snapped_hits_targets_exactly() {
        let s = poly(&[(0.0, 0.0), (5.0, 1.0), (10.0, 0.0)]);
        let snapped = s.snapped(Point2::new(1.0, 1.0), Point2::new(9.0, -1.0));
        assert_eq!(snapped.start().map(|x| x.pos), Some(Point2::new(1.0, 1.0)));
        assert_eq!(snapped.end().map(|x| x.pos), Some(Point2::new(9.0, -1.0)));
        // Widths untouched.
        assert_eq!(snapped.samples()[1].width, 1.0);
    }

    #[test]
    fn reversed_swaps_endpoints() {
        let s = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        let r = s.reversed();
        assert_eq!(r.start(), s.end());
        assert_eq!(r.end(), s.start());
    }
}
