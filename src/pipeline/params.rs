//! Parameter types configuring the prediction pipeline.
//!
//! Geometry (region, crop shape, stride) has no meaningful default and must
//! be set per run; the policy knobs (threshold, area share, overlap rule,
//! batch size) default to values that behave reasonably on typical cubes.
//! Everything is validated eagerly by [`PredictParams::validate`] before
//! any crop is loaded or any inference runs.

use crate::assemble::OverlapPolicy;
use crate::extract::ExtractOptions;
use crate::grid::Region3;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters controlling one prediction run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PredictParams {
    /// Cube region to predict on, per-axis `[min, max)`.
    pub region: Region3,
    /// Crop shape fed to the model, `[n1, n2, nd]`.
    pub crop_shape: [usize; 3],
    /// Stride between crop origins, `[s1, s2, sd]`.
    pub crop_stride: [usize; 3],
    /// Probability threshold for surface extraction, in `[0, 1]`.
    pub threshold: f32,
    /// Minimum surface footprint as a share of the region footprint,
    /// in `(0, 1]`.
    pub area_share: f32,
    /// Overlap resolution rule used during assembly.
    pub overlap: OverlapPolicy,
    /// Depth tolerance (samples) for joining adjacent columns.
    pub depth_tolerance: usize,
    /// Crops per inference call.
    pub batch_size: usize,
}

impl Default for PredictParams {
    fn default() -> Self {
        Self {
            region: Region3::new([0, 0, 0], [0, 0, 0]),
            crop_shape: [0, 0, 0],
            crop_stride: [0, 0, 0],
            threshold: 0.5,
            area_share: 0.05,
            overlap: OverlapPolicy::default(),
            depth_tolerance: 1,
            batch_size: 1,
        }
    }
}

impl PredictParams {
    /// Check the scalar parameters that the grid builder does not cover.
    ///
    /// Grid geometry itself is validated by [`crate::grid::build_grid`];
    /// together the two checks implement the fail-before-inference rule.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ParamsError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if !self.area_share.is_finite() || self.area_share <= 0.0 || self.area_share > 1.0 {
            return Err(ParamsError::InvalidAreaShare {
                value: self.area_share,
            });
        }
        if self.batch_size == 0 {
            return Err(ParamsError::ZeroBatchSize);
        }
        Ok(())
    }

    /// Extraction options derived from the scalar knobs.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            threshold: self.threshold,
            depth_tolerance: self.depth_tolerance,
        }
    }
}

/// Scalar parameter errors caught before the run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamsError {
    InvalidThreshold { value: f32 },
    InvalidAreaShare { value: f32 },
    ZeroBatchSize,
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::InvalidThreshold { value } => {
                write!(f, "threshold {value} outside the probability range [0, 1]")
            }
            ParamsError::InvalidAreaShare { value } => {
                write!(f, "area share {value} outside (0, 1]")
            }
            ParamsError::ZeroBatchSize => write!(f, "batch size must be at least 1"),
        }
    }
}

impl std::error::Error for ParamsError {}
