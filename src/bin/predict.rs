//! Predict horizons on a part of a seismic cube and dump the largest ones.
//!
//! Driven by a JSON config (see `configs/predict.json`). The cube is read
//! as a raw little-endian f32 sample file with a `<cube>.json` geometry
//! sidecar describing line numbering, timing, and extents. Model loading
//! requires the `onnx` build feature.

use horizon_detector::config::predict::{self, PredictConfig};
use horizon_detector::cube::{CubeGeometry, InMemoryCube};
use horizon_detector::model::CropModel;
use horizon_detector::pipeline::Printer;
use horizon_detector::prelude::*;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = parse_cli()?;
    let config = predict::load_config(&config_path)?;
    let printer = build_printer(&config)?;

    let cube = load_raw_cube(&config.cube_path)?;
    let mut model = load_model(&config.model_path, config.gpu_device)?;

    let predictor = HorizonPredictor::new(config.to_predict_params());
    let outcome = predictor
        .run(&cube, model.as_mut(), printer.as_ref())
        .map_err(|e| e.to_string())?;
    persist_horizons(
        &outcome.horizons,
        cube.geometry(),
        &config.predictions_path,
        printer.as_ref(),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn parse_cli() -> Result<PathBuf, String> {
    let mut config_path = PathBuf::from("configs/predict.json");
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config_path" | "--config" => {
                config_path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| format!("{arg} requires a value"))?;
            }
            "--help" | "-h" => {
                println!("Usage: predict [--config_path <path>]");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(config_path)
}

/// Milestones go to stdout when `print` is set, otherwise to the log file,
/// mirroring where the rest of the log output lands.
fn build_printer(config: &PredictConfig) -> Result<Box<Printer>, String> {
    if config.print {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .init();
        return Ok(Box::new(|m: &str| println!("{m}")));
    }

    let log_path = config
        .path_log
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs/predict.log"));
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log dir {}: {e}", parent.display()))?;
    }
    let file = fs::File::create(&log_path)
        .map_err(|e| format!("Failed to create log file {}: {e}", log_path.display()))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file.try_clone().map_err(
            |e| format!("Failed to clone log handle: {e}"),
        )?)))
        .init();
    println!("logging to {}", log_path.display());

    let sink = Mutex::new(file);
    Ok(Box::new(move |m: &str| {
        if let Ok(mut f) = sink.lock() {
            let _ = writeln!(f, "{m}");
        }
    }))
}

/// Read a cube stored as raw little-endian f32 samples next to a JSON
/// geometry sidecar (`<cube>.json`).
fn load_raw_cube(path: &Path) -> Result<InMemoryCube, String> {
    let sidecar = sidecar_path(path);
    let geometry_json = fs::read_to_string(&sidecar)
        .map_err(|e| format!("Failed to read geometry {}: {e}", sidecar.display()))?;
    let geometry: CubeGeometry = serde_json::from_str(&geometry_json)
        .map_err(|e| format!("Failed to parse geometry {}: {e}", sidecar.display()))?;

    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read cube {}: {e}", path.display()))?;
    let expected = geometry.shape[0] * geometry.shape[1] * geometry.shape[2];
    if bytes.len() != expected * 4 {
        return Err(format!(
            "cube {} holds {} bytes, geometry expects {}",
            path.display(),
            bytes.len(),
            expected * 4
        ));
    }
    let mut volume = VolumeF32::from_shape(geometry.shape);
    for (sample, chunk) in volume.data.iter_mut().zip(bytes.chunks_exact(4)) {
        *sample = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(InMemoryCube::new(geometry, volume))
}

fn sidecar_path(cube: &Path) -> PathBuf {
    let mut name = cube.file_name().unwrap_or_default().to_os_string();
    name.push(".json");
    cube.with_file_name(name)
}

#[cfg(feature = "onnx")]
fn load_model(path: &Path, gpu_device: Option<u32>) -> Result<Box<dyn CropModel>, String> {
    use horizon_detector::model::{Device, OnnxCropModel};

    let device = match gpu_device {
        Some(id) => Device::Cuda(id),
        None => Device::Cpu,
    };
    let model = OnnxCropModel::load(path, device).map_err(|e| e.to_string())?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_model(path: &Path, _gpu_device: Option<u32>) -> Result<Box<dyn CropModel>, String> {
    Err(format!(
        "model support is not built in; rebuild with `--features onnx` to load {}",
        path.display()
    ))
}
