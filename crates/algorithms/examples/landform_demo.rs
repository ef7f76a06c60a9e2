//! Landform demo: synthetic mountain range
//!
//! Builds a 300x300 DEM with two peaks, a saddle and a cliff band, runs the
//! landform pipeline and writes every product to `output/landform_demo/`.
//!
//! Run:
//!   cargo run -p geoform-algorithms --example landform_demo

use std::fs;
use std::path::Path;

use geoform_algorithms::terrain::{
    landform_histogram, landform_pipeline, remap_landforms_simple_raster, MultiscaleTpiParams, PipelineParams,
};
use geoform_core::io::write_geotiff;
use geoform_core::{GeoTransform, Raster, CRS};

const SIZE: usize = 300;

fn peak(row: usize, col: usize, r0: f64, c0: f64, height: f64, spread: f64) -> f64 {
    let d2 = (row as f64 - r0).powi(2) + (col as f64 - c0).powi(2);
    height * (-d2 / (2.0 * spread * spread)).exp()
}

fn main() {
    let out_dir = Path::new("output/landform_demo");
    fs::create_dir_all(out_dir).expect("Cannot create output directory");

    let mut dem = Raster::new(SIZE, SIZE);
    dem.set_transform(GeoTransform::new(400_000.0, 4_500_000.0, 30.0, -30.0));
    dem.set_crs(Some(CRS::from_epsg(32613)));

    for row in 0..SIZE {
        for col in 0..SIZE {
            let mut z = 1800.0 + row as f64 * 0.8;
            z += peak(row, col, 100.0, 90.0, 900.0, 35.0);
            z += peak(row, col, 110.0, 210.0, 700.0, 30.0);
            // Escarpment across the south of the grid
            if row > 240 {
                z -= 150.0;
            }
            dem.set(row, col, z).unwrap();
        }
    }

    let params = PipelineParams {
        multiscale: MultiscaleTpiParams::tripling(2),
        ..Default::default()
    };

    let products = landform_pipeline(&dem, params).expect("pipeline failed");
    let simple = remap_landforms_simple_raster(&products.landforms).expect("remap failed");

    let outputs = [
        ("dem.tif", &dem),
        ("slope.tif", &products.slope),
        ("aspect.tif", &products.aspect),
        ("hli.tif", &products.hli),
        ("tpi.tif", &products.tpi),
        ("mean_tpi.tif", &products.mean_tpi),
        ("landforms.tif", &products.landforms),
        ("landforms_simple.tif", &simple),
    ];
    for (name, raster) in outputs {
        write_geotiff(raster, out_dir.join(name), None).expect("write failed");
        println!("  wrote {}", name);
    }

    println!("\nLandform cell counts:");
    for (class, count) in landform_histogram(&products.landforms) {
        println!("  {:<24} {:>8}", class.to_string(), count);
    }
}
