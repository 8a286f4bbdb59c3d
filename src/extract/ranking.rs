//! Ranking and areal filtering of extracted surfaces.

use crate::horizon::Horizon;
use log::debug;

/// Sort surfaces by column count descending, keep those covering at least
/// `area_share` of the `footprint_area` columns, and number the survivors
/// `0..k`.
///
/// The sort is stable, so equal-size surfaces keep their extraction order
/// and re-ranking already-ranked output changes nothing. `area_share` is
/// expected in `(0, 1]`; the pipeline validates it before extraction runs.
pub fn rank_and_filter(
    mut horizons: Vec<Horizon>,
    footprint_area: usize,
    area_share: f32,
) -> Vec<Horizon> {
    horizons.sort_by(|a, b| b.len().cmp(&a.len()));

    let total = horizons.len();
    let mut kept: Vec<Horizon> = horizons
        .into_iter()
        .filter(|h| {
            footprint_area > 0 && h.len() as f64 / footprint_area as f64 >= area_share as f64
        })
        .collect();
    for (id, horizon) in kept.iter_mut().enumerate() {
        horizon.id = Some(id);
    }
    debug!(
        "kept {}/{} surfaces at area share {}",
        kept.len(),
        total,
        area_share
    );
    kept
}
