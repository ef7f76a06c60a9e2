//! End-to-end tests of the landform stages on synthetic terrain.

use approx::assert_relative_eq;
use geoform_algorithms::terrain::{
    classify_landforms, heat_load_index, hli, hli_bucket, landform_for_composite, landform_histogram,
    landform_pipeline, mean_tpi_bucket, remap_landforms_simple_raster, slope_bucket, tpi_bucket, HliParams,
    LandformClass, MultiscaleTpiParams, PipelineParams,
};
use geoform_core::io::{read_geotiff, write_geotiff};
use geoform_core::{GeoTransform, NativeEngine, Raster, RasterEngine, RasterSource, CRS};

fn constant(value: f64) -> Raster<f64> {
    let mut r = Raster::filled(11, 11, value);
    r.set_transform(GeoTransform::new(500_000.0, 4_000_000.0, 30.0, -30.0));
    r
}

/// Valley between two ridges running north-south, tilted toward the south
fn valley_dem(rows: usize, cols: usize) -> Raster<f64> {
    let mut dem = Raster::new(rows, cols);
    dem.set_transform(GeoTransform::new(500_000.0, 4_000_000.0, 30.0, -30.0));
    dem.set_crs(Some(CRS::from_epsg(32611)));
    let mid = (cols / 2) as f64;
    for row in 0..rows {
        for col in 0..cols {
            let across = (col as f64 - mid).abs() * 6.0;
            let along = row as f64 * -1.5;
            dem.set(row, col, 1200.0 + across + along).unwrap();
        }
    }
    dem
}

fn small_params() -> PipelineParams {
    PipelineParams {
        multiscale: MultiscaleTpiParams { radii: [1, 3, 9] },
        fine_radius: 2,
        ..Default::default()
    }
}

#[test]
fn test_reference_cell_classification() {
    // Slope 10°, south aspect, mean TPI -2, TPI -10 at cell (5, 5)
    let dem = constant(1500.0);
    let slope = constant(10.0);
    let aspect = constant(180.0);
    let mean_tpi = constant(-2.0);
    let tpi = constant(-10.0);

    let heat = hli(&slope, &aspect, HliParams::default()).unwrap();
    let h = heat.get(5, 5).unwrap();
    assert_relative_eq!(h, heat_load_index(10.0, 180.0), epsilon = 1e-12);

    assert_eq!(slope_bucket(10.0), Some(1000));
    assert_eq!(mean_tpi_bucket(-2.0), Some(10));
    assert_eq!(tpi_bucket(-10.0), Some(1));

    let composite = 1000 + hli_bucket(h).unwrap() + 10 + 1;
    let expected = landform_for_composite(composite);

    let landforms = classify_landforms(&dem, &slope, &heat, &mean_tpi, &tpi).unwrap();
    let code = landforms.get(5, 5).unwrap();
    match expected {
        Some(class) => assert_eq!(code, f64::from(class.code())),
        None => assert!(code.is_nan()),
    }
    assert_eq!(composite, 1311);
    assert_eq!(expected, Some(LandformClass::ValleyNarrow));
}

#[test]
fn test_masked_cell_masks_every_product() {
    let mut dem = valley_dem(40, 40);
    dem.set(20, 20, f64::NAN).unwrap();

    let p = landform_pipeline(&dem, small_params()).unwrap();
    for (name, raster) in [
        ("slope", &p.slope),
        ("aspect", &p.aspect),
        ("hli", &p.hli),
        ("tpi", &p.tpi),
        ("mean_tpi", &p.mean_tpi),
        ("landforms", &p.landforms),
    ] {
        assert!(raster.get(20, 20).unwrap().is_nan(), "{} not masked", name);
    }
}

#[test]
fn test_valley_floor_and_sides() {
    let dem = valley_dem(40, 41);
    let p = landform_pipeline(&dem, small_params()).unwrap();

    // Valley axis sits below every neighborhood
    let floor = p.landforms.get(20, 20).unwrap();
    let floor_class = LandformClass::from_value(floor).unwrap();
    assert_eq!(floor_class.group(), 3, "valley floor classified as {}", floor_class);

    assert!(p.tpi.get(20, 20).unwrap() < 0.0);
    assert!(p.mean_tpi.get(20, 20).unwrap() < 0.0);

    // Interior cells are all classified
    let hist = landform_histogram(&p.landforms);
    let classified: usize = hist.values().sum();
    assert!(classified >= 38 * 39);
}

#[test]
fn test_simple_remap_of_pipeline_output() {
    let dem = valley_dem(30, 31);
    let p = landform_pipeline(&dem, small_params()).unwrap();
    let simple = remap_landforms_simple_raster(&p.landforms).unwrap();

    for (&code, &group) in p.landforms.data().iter().zip(simple.data().iter()) {
        match LandformClass::from_value(code) {
            Some(class) => assert_eq!(group, f64::from(class.group())),
            None => assert!(group.is_nan()),
        }
    }
}

#[test]
fn test_landforms_survive_geotiff_roundtrip() {
    let dem = valley_dem(30, 31);
    let tmp = tempfile::tempdir().unwrap();
    let dem_path = tmp.path().join("dem.tif");
    write_geotiff(&dem, &dem_path, None).unwrap();

    let loaded = NativeEngine.load_raster(&RasterSource::File(dem_path)).unwrap();
    assert_eq!(loaded.crs().and_then(|c| c.epsg()), Some(32611));

    let p = landform_pipeline(&loaded, small_params()).unwrap();
    let out_path = tmp.path().join("landforms.tif");
    write_geotiff(&p.landforms, &out_path, None).unwrap();

    let back: Raster<f64> = read_geotiff(&out_path, None).unwrap();
    assert_eq!(back.shape(), p.landforms.shape());
    assert_eq!(back.transform(), dem.transform());
    for (a, b) in back.data().iter().zip(p.landforms.data().iter()) {
        assert!((a.is_nan() && b.is_nan()) || a == b);
    }
}
