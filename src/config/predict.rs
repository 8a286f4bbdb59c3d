use crate::assemble::OverlapPolicy;
use crate::grid::Region3;
use crate::pipeline::PredictParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictConfig {
    pub cube_path: PathBuf,
    pub model_path: PathBuf,
    /// Output directory for numbered horizon files.
    pub predictions_path: PathBuf,
    /// GPU ordinal for inference; `None` runs on CPU.
    #[serde(default)]
    pub gpu_device: Option<u32>,
    /// Region bounds as per-axis `[min, max)` pairs.
    pub cube_crop: [[usize; 2]; 3],
    pub crop_shape: [usize; 3],
    pub crop_stride: [usize; 3],
    pub area_share: f32,
    pub threshold: f32,
    #[serde(default)]
    pub overlap: OverlapPolicy,
    #[serde(default = "default_depth_tolerance")]
    pub depth_tolerance: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Print milestones to stdout instead of the log file.
    #[serde(default)]
    pub print: bool,
    /// Log file used when `print` is off; defaults to `logs/predict.log`.
    #[serde(rename = "path_log", default)]
    pub path_log: Option<PathBuf>,
}

fn default_depth_tolerance() -> usize {
    1
}

fn default_batch_size() -> usize {
    1
}

impl PredictConfig {
    pub fn to_predict_params(&self) -> PredictParams {
        PredictParams {
            region: Region3::new(
                [
                    self.cube_crop[0][0],
                    self.cube_crop[1][0],
                    self.cube_crop[2][0],
                ],
                [
                    self.cube_crop[0][1],
                    self.cube_crop[1][1],
                    self.cube_crop[2][1],
                ],
            ),
            crop_shape: self.crop_shape,
            crop_stride: self.crop_stride,
            threshold: self.threshold,
            area_share: self.area_share,
            overlap: self.overlap,
            depth_tolerance: self.depth_tolerance,
            batch_size: self.batch_size,
        }
    }
}

pub fn load_config(path: &Path) -> Result<PredictConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: PredictConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
