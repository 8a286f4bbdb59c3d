//! Milestone reporting for the prediction pipeline.
//!
//! The pipeline reports progress through an injected printer and has no
//! knowledge of whether the callable writes to a console or a log sink;
//! milestone strings are the whole contract.

use crate::grid::Region3;
use std::time::Instant;

/// Milestone sink injected into a run.
pub type Printer = dyn Fn(&str);

pub(super) fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

pub(super) fn report_run_started(printer: &Printer, region: &Region3, grid_iters: usize) {
    printer(&format!(
        "assembling region {:?}..{:?} from {grid_iters} crops",
        region.min, region.max
    ));
}

pub(super) fn report_region_assembled(printer: &Printer) {
    printer("region assembled");
}

pub(super) fn report_horizons_labeled(printer: &Printer, found: usize, kept: usize) {
    printer(&format!("horizons labeled: {found} traced, {kept} kept"));
}

pub(super) fn report_horizon_saved(printer: &Printer, id: usize, columns: usize) {
    printer(&format!("horizon {id} saved ({columns} columns)"));
}
