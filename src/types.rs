use serde::Serialize;

/// Summary of one prediction run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PredictionReport {
    /// Number of crop windows the region was tiled into.
    pub grid_iters: usize,
    /// Surfaces traced before the area-share filter.
    pub horizons_found: usize,
    /// Surfaces surviving ranking and filtering.
    pub horizons_kept: usize,
    pub inference_ms: f64,
    pub assemble_ms: f64,
    pub extract_ms: f64,
    pub latency_ms: f64,
}
