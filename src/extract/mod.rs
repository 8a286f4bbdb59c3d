//! Surface extraction from an assembled probability volume.
//!
//! The extractor turns dense per-sample probabilities into discrete
//! horizon surfaces in two steps:
//!
//! - Per trace column, the depth profile is thresholded into connected
//!   runs of samples at or above the threshold; each run contributes one
//!   candidate pick at its maximum-probability depth. Columns entirely
//!   below threshold contribute nothing.
//! - Candidate picks are grown into connected components: two picks join
//!   the same surface when their columns are 4-adjacent on the (i1, i2)
//!   grid and their depths differ by at most the configured tolerance.
//!   Growth is a stack-based region walk seeded in row-major column order
//!   and in increasing depth within a column, which makes the resulting
//!   partition deterministic.
//!
//! Surfaces store absolute cube indices; the caller passes the processed
//! region so picks are translated out of region-relative space on the fly.
//!
//! Ranking and the area-share filter live in [`ranking`].

mod extractor;
pub mod ranking;

use crate::grid::Region3;
use crate::horizon::Horizon;
use crate::volume::VolumeF32;
use extractor::HorizonExtractor;
use log::debug;
use serde::{Deserialize, Serialize};

pub use ranking::rank_and_filter;

/// Extraction thresholds and connectivity tolerances.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Minimum probability for a sample to participate in a pick.
    pub threshold: f32,
    /// Maximum depth difference (samples) between picks of adjacent
    /// columns belonging to the same surface.
    pub depth_tolerance: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            depth_tolerance: 1,
        }
    }
}

/// Reasons why extraction may fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExtractError {
    InvalidThreshold { value: f32 },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::InvalidThreshold { value } => {
                write!(f, "threshold {value} outside the probability range [0, 1]")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Trace the thresholded volume into disjoint horizon surfaces.
///
/// `assembled` must have the shape of `region.extent()`. The returned
/// surfaces are unranked (no ids) and in seed discovery order.
pub fn extract_horizons(
    assembled: &VolumeF32,
    region: &Region3,
    options: &ExtractOptions,
) -> Result<Vec<Horizon>, ExtractError> {
    if !options.threshold.is_finite() || !(0.0..=1.0).contains(&options.threshold) {
        return Err(ExtractError::InvalidThreshold {
            value: options.threshold,
        });
    }
    debug_assert_eq!(assembled.shape(), region.extent());

    let horizons =
        HorizonExtractor::new(assembled, *region, options.threshold, options.depth_tolerance)
            .extract();
    debug!(
        "extracted {} surfaces at threshold {}",
        horizons.len(),
        options.threshold
    );
    Ok(horizons)
}
