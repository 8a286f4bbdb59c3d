//! Per-crop normalization applied before inference.

use crate::volume::VolumeF32;

/// Z-score normalize a crop in place.
///
/// Each crop is standardized against its own mean and deviation, matching
/// how the model saw its training crops. The deviation is floored by
/// [`VolumeF32::mean_std`], so flat crops normalize to all zeros instead
/// of dividing by zero.
pub fn normalize_crop(crop: &mut VolumeF32) {
    let (mean, std) = crop.mean_std();
    for v in &mut crop.data {
        *v = (*v - mean) / std;
    }
}
