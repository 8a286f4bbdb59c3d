#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod assemble;
pub mod config;
pub mod cube;
pub mod extract;
pub mod grid;
pub mod horizon;
pub mod model;
pub mod pipeline;
pub mod types;
pub mod volume;

// --- High-level re-exports -------------------------------------------------

// Main entry points: predictor + results.
pub use crate::pipeline::{
    persist_horizons, HorizonPredictor, PredictError, PredictParams, PredictionOutcome,
};
pub use crate::types::PredictionReport;

// Stage functions that are generally useful on their own.
pub use crate::assemble::{assemble_crops, OverlapPolicy};
pub use crate::extract::{extract_horizons, rank_and_filter, ExtractOptions};
pub use crate::grid::{build_grid, CropGrid, CropWindow, Region3};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use horizon_detector::prelude::*;
///
/// # fn main() {
/// let region = Region3::new([0, 0, 0], [10, 10, 5]);
/// let grid = build_grid(region, [5, 5, 5], [5, 5, 5]).unwrap();
/// println!("windows={}", grid.grid_iters());
/// # }
/// ```
pub mod prelude {
    pub use crate::assemble::OverlapPolicy;
    pub use crate::cube::{CubeGeometry, CubeSource, InMemoryCube};
    pub use crate::grid::{build_grid, Region3};
    pub use crate::horizon::Horizon;
    pub use crate::model::CropModel;
    pub use crate::pipeline::{persist_horizons, HorizonPredictor, PredictParams};
    pub use crate::types::PredictionReport;
    pub use crate::volume::VolumeF32;
}
