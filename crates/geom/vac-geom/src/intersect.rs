//! Polyline intersection helpers used by the `intersect` operation.

use crate::point::Point2;
use crate::stroke::Stroke;

/// Intersection of segments `a0-a1` and `b0-b1`.
///
/// Returns the local parameters `(ta, tb)` in [0,1] along each segment.
/// Near-parallel segments (cross product below `tol`) report no
/// intersection; overlap handling is out of scope for the cut planner.
pub fn segment_intersection(
    a0: Point2,
    a1: Point2,
    b0: Point2,
    b1: Point2,
    tol: f64,
) -> Option<(f64, f64)> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() <= tol {
        return None;
    }
    let qp = b0 - a0;
    let ta = (qp.x * s.y - qp.y * s.x) / denom;
    let tb = (qp.x * r.y - qp.y * r.x) / denom;
    if (0.0..=1.0).contains(&ta) && (0.0..=1.0).contains(&tb) {
        Some((ta, tb))
    } else {
        None
    }
}

fn param_of(cum: &[f64], seg: usize, local: f64) -> f64 {
    let total = *cum.last().unwrap_or(&0.0);
    if total <= 0.0 {
        return 0.0;
    }
    let seg_len = cum[seg + 1] - cum[seg];
    ((cum[seg] + local * seg_len) / total).clamp(0.0, 1.0)
}

/// All intersections between two sampled strokes, as pairs of normalized
/// arclength parameters `(t_a, t_b)`.
pub fn polyline_intersections(a: &Stroke, b: &Stroke, tol: f64) -> Vec<(f64, f64)> {
    let sa = a.samples();
    let sb = b.samples();
    let ca = a.cumulative_lengths();
    let cb = b.cumulative_lengths();
    let mut hits = Vec::new();
    for i in 0..sa.len().saturating_sub(1) {
        for j in 0..sb.len().saturating_sub(1) {
            if let Some((ta, tb)) =
                segment_intersection(sa[i].pos, sa[i + 1].pos, sb[j].pos, sb[j + 1].pos, tol)
            {
                hits.push((param_of(&ca, i, ta), param_of(&cb, j, tb)));
            }
        }
    }
    hits
}

/// Self-intersections of one sampled stroke, as sorted parameter pairs.
/// Adjacent segments are skipped (they always touch at the shared sample).
pub fn self_intersections(a: &Stroke, tol: f64) -> Vec<(f64, f64)> {
    let sa = a.samples();
    let ca = a.cumulative_lengths();
    let n = sa.len().saturating_sub(1);
    let mut hits = Vec::new();
    for i in 0..n {
        for j in (i + 2)..n {
            // Skip the wrap-around adjacency of a closed polyline.
            if i == 0 && j == n - 1 && sa[0].pos == sa[n].pos {
                continue;
            }
            if let Some((ti, tj)) =
                segment_intersection(sa[i].pos, sa[i + 1].pos, sa[j].pos, sa[j + 1].pos, tol)
            {
                hits.push((param_of(&ca, i, ti), param_of(&ca, j, tj)));
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeSample;

    fn poly(points: &[(f64, f64)]) -> Stroke {
        Stroke::new(
            points
                .iter()
                .map(|&(x, y)| StrokeSample::new(Point2::new(x, y), 1.0))
                .collect(),
        )
    }

    #[test]
    fn crossing_segments() {
        let hit = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, -5.0),
            Point2::new(5.0, 5.0),
            1e-9,
        );
        let (ta, tb) = hit.unwrap();
        assert!((ta - 0.5).abs() < 1e-9);
        assert!((tb - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parallel_segments_miss() {
        assert!(segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(10.0, 1.0),
            1e-9,
        )
        .is_none());
    }

    #[test]
    fn cross_polylines() {
        let a = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = poly(&[(5.0, -5.0), (5.0, 5.0)]);
        let hits = polyline_intersections(&a, &b, 1e-9);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].0 - 0.5).abs() < 1e-9);
        assert!((hits[0].1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn figure_has_self_intersection() {
        // A zig that crosses itself once.
        let a = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, -5.0)]);
        let hits = self_intersections(&a, 1e-9);
        assert_eq!(hits.len(), 1);
    }
}
