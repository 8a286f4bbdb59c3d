//! Horizon surfaces extracted from a thresholded probability volume.
//!
//! A horizon is a 2.5-D surface: at most one depth pick per (inline,
//! crossline) trace column, stored together with the probability that
//! backed the pick. Coordinates are absolute cube indices (not relative to
//! the processed sub-region); conversion to survey line numbers and trace
//! time happens at dump time through [`crate::cube::CubeGeometry`].

pub mod io;

use nalgebra::{Matrix3, SymmetricEigen};
use serde::Serialize;
use std::collections::BTreeMap;

/// One depth pick: the selected sample index and its probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pick {
    pub depth: usize,
    pub prob: f32,
}

/// A connected surface, keyed by absolute (i1, i2) cube indices.
///
/// Immutable for callers once extraction is done; the ranker only assigns
/// the sequential `id` of surviving surfaces.
#[derive(Clone, Debug, Default)]
pub struct Horizon {
    /// Sequential identifier assigned by ranking; `None` until ranked.
    pub id: Option<usize>,
    points: BTreeMap<(usize, usize), Pick>,
}

impl Horizon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trace columns covered by the surface.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Record a pick for a column. When the column already has one, the
    /// higher-probability pick wins.
    pub fn insert_pick(&mut self, i1: usize, i2: usize, pick: Pick) {
        self.points
            .entry((i1, i2))
            .and_modify(|existing| {
                if pick.prob > existing.prob {
                    *existing = pick;
                }
            })
            .or_insert(pick);
    }

    /// Depth pick at a column, if the surface covers it.
    pub fn pick_at(&self, i1: usize, i2: usize) -> Option<Pick> {
        self.points.get(&(i1, i2)).copied()
    }

    /// Iterate `((i1, i2), pick)` in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &Pick)> {
        self.points.iter()
    }

    /// Mean depth index over all columns.
    pub fn mean_depth(&self) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.points.values().map(|p| p.depth as f64).sum();
        (sum / self.points.len() as f64) as f32
    }

    /// Minimum and maximum depth index covered by the surface.
    pub fn depth_range(&self) -> Option<(usize, usize)> {
        let mut depths = self.points.values().map(|p| p.depth);
        let first = depths.next()?;
        let (mut lo, mut hi) = (first, first);
        for d in depths {
            lo = lo.min(d);
            hi = hi.max(d);
        }
        Some((lo, hi))
    }

    /// Fit a plane to the point cloud and summarize its attitude.
    ///
    /// The 3×3 covariance of (i1, i2, depth) is eigendecomposed; the
    /// eigenvector of the smallest eigenvalue is the plane normal, and the
    /// smallest eigenvalue itself is the out-of-plane variance. Returns
    /// `None` for degenerate clouds (fewer than three columns or a
    /// non-finite decomposition).
    pub fn plane_fit(&self) -> Option<PlaneFit> {
        if self.points.len() < 3 {
            return None;
        }
        let count = self.points.len() as f64;
        let (mut cx, mut cy, mut cz) = (0.0f64, 0.0f64, 0.0f64);
        for (&(i1, i2), pick) in &self.points {
            cx += i1 as f64;
            cy += i2 as f64;
            cz += pick.depth as f64;
        }
        cx /= count;
        cy /= count;
        cz /= count;

        let mut m = [[0.0f64; 3]; 3];
        for (&(i1, i2), pick) in &self.points {
            let d = [i1 as f64 - cx, i2 as f64 - cy, pick.depth as f64 - cz];
            for r in 0..3 {
                for c in 0..3 {
                    m[r][c] += d[r] * d[c];
                }
            }
        }
        let cov = Matrix3::new(
            m[0][0] / count,
            m[0][1] / count,
            m[0][2] / count,
            m[1][0] / count,
            m[1][1] / count,
            m[1][2] / count,
            m[2][0] / count,
            m[2][1] / count,
            m[2][2] / count,
        );

        let eig = SymmetricEigen::new(cov);
        let mut min_idx = 0;
        for i in 1..3 {
            if eig.eigenvalues[i] < eig.eigenvalues[min_idx] {
                min_idx = i;
            }
        }
        let lambda_min = eig.eigenvalues[min_idx];
        if !lambda_min.is_finite() || lambda_min < 0.0 {
            return None;
        }
        let normal = eig.eigenvectors.column(min_idx);
        let norm = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if !norm.is_finite() || norm < 1e-9 {
            return None;
        }
        // Angle between the plane normal and the depth axis: 0° for a flat
        // horizon, growing with structural dip.
        let dip_rad = (normal[2].abs() / norm).clamp(0.0, 1.0).acos();
        Some(PlaneFit {
            dip_deg: dip_rad.to_degrees() as f32,
            rmse: lambda_min.sqrt() as f32,
        })
    }
}

/// Plane-fit summary of a horizon's attitude.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PlaneFit {
    /// Structural dip in degrees; 0 for a perfectly flat surface.
    pub dip_deg: f32,
    /// Root of the out-of-plane variance, in depth samples.
    pub rmse: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(depth: usize, prob: f32) -> Pick {
        Pick { depth, prob }
    }

    #[test]
    fn duplicate_column_keeps_stronger_pick() {
        let mut h = Horizon::new();
        h.insert_pick(3, 4, pick(10, 0.6));
        h.insert_pick(3, 4, pick(12, 0.9));
        h.insert_pick(3, 4, pick(11, 0.2));
        assert_eq!(h.len(), 1);
        assert_eq!(h.pick_at(3, 4), Some(pick(12, 0.9)));
    }

    #[test]
    fn flat_surface_has_zero_dip() {
        let mut h = Horizon::new();
        for i1 in 0..5 {
            for i2 in 0..5 {
                h.insert_pick(i1, i2, pick(20, 0.8));
            }
        }
        let fit = h.plane_fit().unwrap();
        assert!(fit.dip_deg.abs() < 1e-3, "dip={}", fit.dip_deg);
        assert!(fit.rmse < 1e-3);
    }

    #[test]
    fn dipping_surface_reports_positive_dip() {
        let mut h = Horizon::new();
        for i1 in 0..8 {
            for i2 in 0..8 {
                h.insert_pick(i1, i2, pick(10 + i1, 0.8));
            }
        }
        let fit = h.plane_fit().unwrap();
        assert!(fit.dip_deg > 30.0, "dip={}", fit.dip_deg);
    }

    #[test]
    fn depth_stats_cover_min_and_max() {
        let mut h = Horizon::new();
        h.insert_pick(0, 0, pick(5, 0.9));
        h.insert_pick(0, 1, pick(9, 0.9));
        h.insert_pick(1, 0, pick(7, 0.9));
        assert_eq!(h.depth_range(), Some((5, 9)));
        assert!((h.mean_depth() - 7.0).abs() < 1e-6);
    }
}
