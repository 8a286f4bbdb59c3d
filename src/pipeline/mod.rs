//! Prediction pipeline orchestrating tiled inference end-to-end.
//!
//! The [`HorizonPredictor`] exposes a simple API: hand it a cube source and
//! a model and get back the ranked horizon surfaces plus a run summary.
//! Internally it validates parameters, builds the crop grid, drives batched
//! inference in window order, assembles the per-crop probabilities,
//! extracts and ranks surfaces, and reports milestones through the injected
//! printer.
//!
//! Stages run strictly in sequence; all `grid_iters` predictions are
//! collected before assembly starts. Every stage error is fatal for the
//! run: there is no retry and no partial-result salvage. With the
//! `parallel` cargo feature, per-crop normalization fans out over a rayon
//! pool; window order is never disturbed, which is what keeps predictions
//! aligned with their grid positions.
//!
//! Typical usage:
//! ```no_run
//! use horizon_detector::prelude::*;
//!
//! # fn example(cube: &InMemoryCube, model: &mut dyn CropModel) {
//! let params = PredictParams {
//!     region: Region3::new([0, 0, 0], [100, 100, 400]),
//!     crop_shape: [50, 50, 400],
//!     crop_stride: [25, 25, 400],
//!     ..Default::default()
//! };
//! let predictor = HorizonPredictor::new(params);
//! let outcome = predictor.run(cube, model, &|m| println!("{m}")).unwrap();
//! println!("kept {} horizons", outcome.report.horizons_kept);
//! # }
//! ```

pub mod params;
mod reporting;

pub use params::{ParamsError, PredictParams};
pub use reporting::Printer;

use crate::assemble::{assemble_crops, AssembleError};
use crate::cube::{CubeError, CubeGeometry, CubeSource};
use crate::extract::{extract_horizons, rank_and_filter, ExtractError};
use crate::grid::{build_grid, CropWindow, GridError};
use crate::horizon::{io::dump_horizon, Horizon};
use crate::model::{normalize_crop, CropModel, ModelError};
use crate::types::PredictionReport;
use crate::volume::VolumeF32;
use log::debug;
use std::path::Path;
use std::time::Instant;

/// Ranked surfaces plus the run summary.
#[derive(Clone, Debug)]
pub struct PredictionOutcome {
    pub horizons: Vec<Horizon>,
    pub report: PredictionReport,
}

/// Reasons why a prediction run may fail, by stage.
#[derive(Debug)]
pub enum PredictError {
    Params(ParamsError),
    Grid(GridError),
    Cube(CubeError),
    Model(ModelError),
    Assemble(AssembleError),
    Extract(ExtractError),
    Io(std::io::Error),
}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictError::Params(e) => write!(f, "invalid parameters: {e}"),
            PredictError::Grid(e) => write!(f, "grid construction failed: {e}"),
            PredictError::Cube(e) => write!(f, "crop loading failed: {e}"),
            PredictError::Model(e) => write!(f, "model inference failed: {e}"),
            PredictError::Assemble(e) => write!(f, "assembly failed: {e}"),
            PredictError::Extract(e) => write!(f, "surface extraction failed: {e}"),
            PredictError::Io(e) => write!(f, "i/o failed: {e}"),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictError::Params(e) => Some(e),
            PredictError::Grid(e) => Some(e),
            PredictError::Cube(e) => Some(e),
            PredictError::Model(e) => Some(e),
            PredictError::Assemble(e) => Some(e),
            PredictError::Extract(e) => Some(e),
            PredictError::Io(e) => Some(e),
        }
    }
}

impl From<ParamsError> for PredictError {
    fn from(e: ParamsError) -> Self {
        PredictError::Params(e)
    }
}

impl From<GridError> for PredictError {
    fn from(e: GridError) -> Self {
        PredictError::Grid(e)
    }
}

impl From<CubeError> for PredictError {
    fn from(e: CubeError) -> Self {
        PredictError::Cube(e)
    }
}

impl From<ModelError> for PredictError {
    fn from(e: ModelError) -> Self {
        PredictError::Model(e)
    }
}

impl From<AssembleError> for PredictError {
    fn from(e: AssembleError) -> Self {
        PredictError::Assemble(e)
    }
}

impl From<ExtractError> for PredictError {
    fn from(e: ExtractError) -> Self {
        PredictError::Extract(e)
    }
}

impl From<std::io::Error> for PredictError {
    fn from(e: std::io::Error) -> Self {
        PredictError::Io(e)
    }
}

/// Pipeline driver owning the run parameters.
pub struct HorizonPredictor {
    params: PredictParams,
}

impl HorizonPredictor {
    /// Create a predictor with the supplied parameters.
    pub fn new(params: PredictParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PredictParams {
        &self.params
    }

    /// Run the full pipeline: tile, predict, assemble, extract, rank.
    ///
    /// Persistence is separate (see [`persist_horizons`]); the returned
    /// surfaces are already numbered in descending-size order.
    pub fn run<C: CubeSource>(
        &self,
        cube: &C,
        model: &mut dyn CropModel,
        printer: &Printer,
    ) -> Result<PredictionOutcome, PredictError> {
        let total_start = Instant::now();
        self.params.validate()?;
        let grid = build_grid(
            self.params.region,
            self.params.crop_shape,
            self.params.crop_stride,
        )?;
        reporting::report_run_started(printer, &grid.region, grid.grid_iters());

        let infer_start = Instant::now();
        let mut predictions: Vec<VolumeF32> = Vec::with_capacity(grid.grid_iters());
        for batch in grid.windows().chunks(self.params.batch_size) {
            let crops = load_normalized_crops(cube, batch)?;
            let outputs = model.predict(&crops)?;
            if outputs.len() != crops.len() {
                return Err(ModelError::BatchLengthMismatch {
                    expected: crops.len(),
                    got: outputs.len(),
                }
                .into());
            }
            predictions.extend(outputs);
        }
        let inference_ms = reporting::ms_since(infer_start);

        let assemble_start = Instant::now();
        let assembled = assemble_crops(&grid, &predictions, self.params.overlap)?;
        let assemble_ms = reporting::ms_since(assemble_start);
        reporting::report_region_assembled(printer);

        let extract_start = Instant::now();
        let traced = extract_horizons(&assembled, &grid.region, &self.params.extract_options())?;
        let found = traced.len();
        let horizons = rank_and_filter(
            traced,
            grid.region.footprint_area(),
            self.params.area_share,
        );
        let extract_ms = reporting::ms_since(extract_start);
        reporting::report_horizons_labeled(printer, found, horizons.len());

        let report = PredictionReport {
            grid_iters: grid.grid_iters(),
            horizons_found: found,
            horizons_kept: horizons.len(),
            inference_ms,
            assemble_ms,
            extract_ms,
            latency_ms: reporting::ms_since(total_start),
        };
        debug!(
            "run finished: {} crops, {}/{} horizons, {:.1} ms",
            report.grid_iters, report.horizons_kept, report.horizons_found, report.latency_ms
        );
        Ok(PredictionOutcome { horizons, report })
    }
}

/// Write each ranked horizon to `dir` as `horizon_<id>`.
///
/// The directory is created if absent (a single attempt); everything else
/// propagates I/O errors unmodified. One milestone is reported per saved
/// surface.
pub fn persist_horizons(
    horizons: &[Horizon],
    geometry: &CubeGeometry,
    dir: &Path,
    printer: &Printer,
) -> Result<usize, PredictError> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)?;
    }
    let mut saved = 0usize;
    for horizon in horizons {
        let id = horizon.id.unwrap_or(saved);
        dump_horizon(horizon, geometry, &dir.join(format!("horizon_{id}")))?;
        reporting::report_horizon_saved(printer, id, horizon.len());
        saved += 1;
    }
    Ok(saved)
}

fn load_normalized_crops<C: CubeSource>(
    cube: &C,
    windows: &[CropWindow],
) -> Result<Vec<VolumeF32>, CubeError> {
    let mut crops = Vec::with_capacity(windows.len());
    for window in windows {
        crops.push(cube.load_crop(window)?);
    }
    normalize_batch(&mut crops);
    Ok(crops)
}

#[cfg(not(feature = "parallel"))]
fn normalize_batch(crops: &mut [VolumeF32]) {
    for crop in crops {
        normalize_crop(crop);
    }
}

#[cfg(feature = "parallel")]
fn normalize_batch(crops: &mut [VolumeF32]) {
    use rayon::prelude::*;

    // In-place over disjoint crops; window order is untouched, so the
    // downstream assembly alignment holds.
    crops.par_iter_mut().for_each(normalize_crop);
}
