use horizon_detector::model::{CropModel, ModelError};
use horizon_detector::prelude::*;
use horizon_detector::volume::VolumeViewMut;

/// Demo model: paints a high probability on one flat depth plane.
struct FlatSheetModel {
    depth: usize,
}

impl CropModel for FlatSheetModel {
    fn predict(&mut self, batch: &[VolumeF32]) -> Result<Vec<VolumeF32>, ModelError> {
        Ok(batch
            .iter()
            .map(|crop| {
                let mut out = VolumeF32::from_shape(crop.shape());
                if self.depth < out.nd {
                    for (_, column) in out.columns_mut() {
                        column[self.depth] = 0.9;
                    }
                }
                out
            })
            .collect())
    }
}

fn main() {
    // Demo stub: runs the pipeline over a synthetic in-memory cube
    let geometry = CubeGeometry {
        iline_first: 1000,
        xline_first: 2000,
        delay_ms: 0.0,
        sample_ms: 2.0,
        shape: [40, 40, 60],
    };
    let cube = InMemoryCube::new(geometry, VolumeF32::new(40, 40, 60));

    let params = PredictParams {
        region: Region3::new([0, 0, 0], [40, 40, 60]),
        crop_shape: [20, 20, 60],
        crop_stride: [10, 10, 60],
        ..Default::default()
    };
    let predictor = HorizonPredictor::new(params);
    let mut model = FlatSheetModel { depth: 30 };

    match predictor.run(&cube, &mut model, &|m| println!("{m}")) {
        Ok(outcome) => {
            let r = &outcome.report;
            println!(
                "grid_iters={} found={} kept={} latency_ms={:.3}",
                r.grid_iters, r.horizons_found, r.horizons_kept, r.latency_ms
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
