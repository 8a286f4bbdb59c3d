//! Reassembly of per-crop predictions into one region-sized volume.
//!
//! Each crop is scattered into the sub-region addressed by its window, in
//! window order. Overlapping windows are resolved by an explicit
//! [`OverlapPolicy`]; cells never written by any window stay at zero
//! probability. Output shape always equals the grid's region extent, and
//! the result is bit-identical across runs given the same inputs and
//! policy.

use crate::grid::CropGrid;
use crate::volume::VolumeF32;
use log::debug;
use serde::{Deserialize, Serialize};

/// Rule applied where crop windows overlap.
///
/// Crops are normalized independently before inference, so their
/// probabilities near window edges can disagree; `Max` keeps the strongest
/// response and avoids seams. `LastWrite` is the simpler alternative: the
/// window latest in grid order wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    #[default]
    Max,
    LastWrite,
}

/// Reasons why assembly may fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssembleError {
    PredictionCountMismatch {
        expected: usize,
        got: usize,
    },
    CropShapeMismatch {
        index: usize,
        expected: [usize; 3],
        got: [usize; 3],
    },
}

impl std::fmt::Display for AssembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssembleError::PredictionCountMismatch { expected, got } => write!(
                f,
                "prediction count {got} does not match grid_iters {expected}"
            ),
            AssembleError::CropShapeMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "crop {index} has shape {got:?}, window expects {expected:?}"
            ),
        }
    }
}

impl std::error::Error for AssembleError {}

/// Scatter `crops` back into a volume covering the grid's region.
///
/// `crops` must be index-aligned with `grid.windows()`; that ordering is
/// the only link between a prediction and its position.
pub fn assemble_crops(
    grid: &CropGrid,
    crops: &[VolumeF32],
    policy: OverlapPolicy,
) -> Result<VolumeF32, AssembleError> {
    if crops.len() != grid.grid_iters() {
        return Err(AssembleError::PredictionCountMismatch {
            expected: grid.grid_iters(),
            got: crops.len(),
        });
    }

    let extent = grid.region.extent();
    let mut out = VolumeF32::from_shape(extent);

    for (index, (window, crop)) in grid.windows().iter().zip(crops).enumerate() {
        if crop.shape() != window.shape {
            return Err(AssembleError::CropShapeMismatch {
                index,
                expected: window.shape,
                got: crop.shape(),
            });
        }
        let o1 = window.origin[0] - grid.region.min[0];
        let o2 = window.origin[1] - grid.region.min[1];
        let od = window.origin[2] - grid.region.min[2];
        for a in 0..window.shape[0] {
            for b in 0..window.shape[1] {
                let src_base = crop.idx(a, b, 0);
                let dst_base = out.idx(o1 + a, o2 + b, od);
                let src = &crop.data[src_base..src_base + window.shape[2]];
                let dst = &mut out.data[dst_base..dst_base + window.shape[2]];
                match policy {
                    OverlapPolicy::Max => {
                        for (d, s) in dst.iter_mut().zip(src) {
                            if *s > *d {
                                *d = *s;
                            }
                        }
                    }
                    OverlapPolicy::LastWrite => dst.copy_from_slice(src),
                }
            }
        }
    }

    debug!(
        "assembled {} crops into {:?} region ({:?})",
        crops.len(),
        extent,
        policy
    );
    Ok(out)
}
