mod common;

use common::synthetic_volume::{
    cube_with_plane, geometry, CountingModel, ScriptedModel, SigmoidModel,
};
use horizon_detector::grid::GridError;
use horizon_detector::pipeline::{ParamsError, PredictError};
use horizon_detector::prelude::*;
use std::fs;

fn silent(_: &str) {}

fn small_region_params() -> PredictParams {
    PredictParams {
        region: Region3::new([0, 0, 0], [10, 10, 5]),
        crop_shape: [5, 5, 5],
        crop_stride: [5, 5, 5],
        ..Default::default()
    }
}

fn zero_cube(shape: [usize; 3]) -> InMemoryCube {
    InMemoryCube::new(geometry(shape), VolumeF32::from_shape(shape))
}

/// Four all-zero predictions except one 0.9 spike in the first crop.
fn spiked_predictions() -> Vec<VolumeF32> {
    let mut crops = vec![VolumeF32::new(5, 5, 5); 4];
    crops[0].set(0, 0, 0, 0.9);
    crops
}

#[test]
fn exact_tiling_traces_the_single_spike() {
    let params = PredictParams {
        area_share: 0.001,
        ..small_region_params()
    };
    let cube = zero_cube([10, 10, 5]);
    let mut model = ScriptedModel::new(spiked_predictions());

    let outcome = HorizonPredictor::new(params)
        .run(&cube, &mut model, &silent)
        .unwrap();

    assert_eq!(outcome.report.grid_iters, 4);
    assert_eq!(outcome.report.horizons_found, 1);
    assert_eq!(outcome.report.horizons_kept, 1);
    let horizon = &outcome.horizons[0];
    assert_eq!(horizon.id, Some(0));
    assert_eq!(horizon.len(), 1);
    assert_eq!(horizon.pick_at(0, 0).unwrap().depth, 0);
}

#[test]
fn area_share_filter_rejects_the_single_spike() {
    let params = PredictParams {
        area_share: 0.5,
        ..small_region_params()
    };
    let cube = zero_cube([10, 10, 5]);
    let mut model = ScriptedModel::new(spiked_predictions());

    let outcome = HorizonPredictor::new(params)
        .run(&cube, &mut model, &silent)
        .unwrap();

    assert_eq!(outcome.report.horizons_found, 1);
    assert_eq!(outcome.report.horizons_kept, 0);
    assert!(outcome.horizons.is_empty());
}

#[test]
fn overlapping_grid_still_covers_the_region() {
    let params = PredictParams {
        crop_stride: [3, 3, 5],
        area_share: 0.001,
        ..small_region_params()
    };
    let cube = zero_cube([10, 10, 5]);
    let mut crops = vec![VolumeF32::new(5, 5, 5); 9];
    crops[0].set(0, 0, 0, 0.9);
    let mut model = ScriptedModel::new(crops);

    let outcome = HorizonPredictor::new(params)
        .run(&cube, &mut model, &silent)
        .unwrap();

    assert_eq!(outcome.report.grid_iters, 9);
    assert_eq!(outcome.report.horizons_kept, 1);
}

#[test]
fn dipping_plane_is_recovered_and_persisted() {
    let shape = [20, 20, 40];
    let cube = cube_with_plane(shape, |i1, _| 5 + i1 / 2);
    let params = PredictParams {
        region: Region3::new([0, 0, 0], [20, 20, 40]),
        crop_shape: [10, 10, 40],
        crop_stride: [5, 5, 40],
        ..Default::default()
    };

    let outcome = HorizonPredictor::new(params)
        .run(&cube, &mut SigmoidModel, &silent)
        .unwrap();

    assert_eq!(outcome.report.horizons_kept, 1);
    let horizon = &outcome.horizons[0];
    assert_eq!(horizon.len(), 400);
    assert_eq!(horizon.pick_at(0, 0).unwrap().depth, 5);
    assert_eq!(horizon.pick_at(19, 7).unwrap().depth, 14);
    let fit = horizon.plane_fit().unwrap();
    assert!(fit.dip_deg > 5.0, "dip={}", fit.dip_deg);

    let dir = std::env::temp_dir().join(format!("horizon_e2e_{}", std::process::id()));
    let saved = persist_horizons(&outcome.horizons, cube.geometry(), &dir, &silent).unwrap();
    assert_eq!(saved, 1);
    let contents = fs::read_to_string(dir.join("horizon_0")).unwrap();
    let first = contents.lines().next().unwrap();
    // Column (0, 0): inline 1000, crossline 2000, depth 5 -> 10 ms.
    assert_eq!(first, "1000\t2000\t10.00");
    assert_eq!(contents.lines().count(), 400);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn reruns_are_deterministic() {
    let cube = cube_with_plane([16, 16, 30], |i1, i2| 8 + (i1 + i2) / 4);
    let params = PredictParams {
        region: Region3::new([0, 0, 0], [16, 16, 30]),
        crop_shape: [8, 8, 30],
        crop_stride: [4, 4, 30],
        ..Default::default()
    };
    let predictor = HorizonPredictor::new(params);

    let first = predictor.run(&cube, &mut SigmoidModel, &silent).unwrap();
    let second = predictor.run(&cube, &mut SigmoidModel, &silent).unwrap();

    assert_eq!(
        first.report.horizons_found,
        second.report.horizons_found
    );
    assert_eq!(first.horizons.len(), second.horizons.len());
    for (a, b) in first.horizons.iter().zip(&second.horizons) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.len(), b.len());
        let picks_a: Vec<_> = a.iter().map(|(k, p)| (*k, p.depth)).collect();
        let picks_b: Vec<_> = b.iter().map(|(k, p)| (*k, p.depth)).collect();
        assert_eq!(picks_a, picks_b);
    }
}

#[test]
fn invalid_scalars_fail_before_any_inference() {
    let cube = zero_cube([10, 10, 5]);

    let mut model = CountingModel::new();
    let params = PredictParams {
        threshold: 1.5,
        ..small_region_params()
    };
    let err = HorizonPredictor::new(params)
        .run(&cube, &mut model, &silent)
        .unwrap_err();
    assert!(matches!(
        err,
        PredictError::Params(ParamsError::InvalidThreshold { .. })
    ));
    assert_eq!(model.calls, 0);

    let mut model = CountingModel::new();
    let params = PredictParams {
        crop_shape: [11, 5, 5],
        ..small_region_params()
    };
    let err = HorizonPredictor::new(params)
        .run(&cube, &mut model, &silent)
        .unwrap_err();
    assert!(matches!(
        err,
        PredictError::Grid(GridError::CropExceedsRegion { axis: 0, .. })
    ));
    assert_eq!(model.calls, 0);
}

#[test]
fn model_shape_drift_aborts_the_run() {
    let cube = zero_cube([10, 10, 5]);
    let wrong_shape = vec![VolumeF32::new(5, 5, 4); 4];
    let mut model = ScriptedModel::new(wrong_shape);

    let err = HorizonPredictor::new(small_region_params())
        .run(&cube, &mut model, &silent)
        .unwrap_err();
    assert!(matches!(err, PredictError::Assemble(_)));
}

#[test]
fn milestones_arrive_in_stage_order() {
    use std::sync::{Arc, Mutex};

    let cube = zero_cube([10, 10, 5]);
    let mut model = ScriptedModel::new(spiked_predictions());
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let printer = move |m: &str| sink.lock().unwrap().push(m.to_string());

    HorizonPredictor::new(small_region_params())
        .run(&cube, &mut model, &printer)
        .unwrap();

    drop(printer);
    let messages = Arc::try_unwrap(messages).unwrap().into_inner().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].contains("assembling region"));
    assert_eq!(messages[1], "region assembled");
    assert!(messages[2].starts_with("horizons labeled"));
}
