//! Geoform CLI - landform classification from DEMs

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geoform_algorithms::terrain::{
    aspect, hli, landform_histogram, landform_pipeline, multiscale_tpi, remap_landforms_raster,
    remap_landforms_simple_raster, slope, topographic_position, AspectOutput, HliParams, LandformProducts,
    MultiscaleTpiParams, PipelineParams, SlopeParams, SlopeUnits,
};
use geoform_core::io::{write_geotiff, GeoTiffOptions};
use geoform_core::{Bounds, NativeEngine, Raster, RasterEngine, RasterSource};
use geoform_parallel::{set_num_threads, TiledProcessor};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geoform")]
#[command(author, version, about = "Landform classification from digital elevation models", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads (default: all cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Terrain derivatives and landform classification
    Terrain {
        #[command(subcommand)]
        algorithm: TerrainCommands,
    },
    /// Renumber a landform raster
    Remap {
        /// Landform raster (codes 11..42)
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Four groups (peaks/ridges/cliffs, upper slopes, lower slopes, valleys)
        /// instead of the dense 0..14 numbering
        #[arg(long)]
        simple: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Degrees,
    Percent,
    Radians,
}

impl From<UnitsArg> for SlopeUnits {
    fn from(u: UnitsArg) -> Self {
        match u {
            UnitsArg::Degrees => SlopeUnits::Degrees,
            UnitsArg::Percent => SlopeUnits::Percent,
            UnitsArg::Radians => SlopeUnits::Radians,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AngleArg {
    Degrees,
    Radians,
}

/// DEM preparation shared by the terrain commands
#[derive(clap::Args)]
struct DemArgs {
    /// Input DEM file
    input: PathBuf,
    /// Clip to a bounding box: min_x,min_y,max_x,max_y (raster CRS units)
    #[arg(long, value_delimiter = ',', num_args = 4, allow_hyphen_values = true)]
    bounds: Option<Vec<f64>>,
    /// Block-average the DEM by this factor before processing
    #[arg(long)]
    reduce: Option<usize>,
}

/// Multi-scale TPI radii, in cells or in ground units
#[derive(clap::Args)]
struct ScaleArgs {
    /// Three strictly increasing radii in cells
    #[arg(long, value_delimiter = ',', num_args = 3, conflicts_with = "radii_m")]
    radii: Option<Vec<usize>>,
    /// Three radii as ground distances (e.g. 270,810,2430 metres)
    #[arg(long = "radii-m", value_delimiter = ',', num_args = 3)]
    radii_m: Option<Vec<f64>>,
}

impl ScaleArgs {
    fn resolve(&self, cell_size: f64) -> Result<MultiscaleTpiParams> {
        let params = match (&self.radii, &self.radii_m) {
            (Some(r), _) => MultiscaleTpiParams {
                radii: to_triple(r).context("--radii needs three values")?,
            },
            (None, Some(d)) => {
                let distances = to_triple(d).context("--radii-m needs three values")?;
                MultiscaleTpiParams::from_distances(distances, cell_size)?
            }
            (None, None) => MultiscaleTpiParams::default(),
        };
        params.validate()?;
        Ok(params)
    }
}

fn to_triple<T: Copy>(values: &[T]) -> Option<[T; 3]> {
    match values {
        [a, b, c] => Some([*a, *b, *c]),
        _ => None,
    }
}

// ─── Terrain subcommands ────────────────────────────────────────────────

#[derive(Subcommand)]
enum TerrainCommands {
    /// Calculate slope from DEM
    Slope {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "degrees")]
        units: UnitsArg,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate aspect from DEM
    Aspect {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "degrees")]
        format: AngleArg,
    },
    /// Calculate the heat load index from DEM
    Hli {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        /// Site latitude in degrees (default: the published coefficients)
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate raw Topographic Position Index at one radius
    Tpi {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        /// Neighborhood radius in cells
        #[arg(short, long, default_value = "3")]
        radius: usize,
    },
    /// Mean of standardized TPI at three radii
    MeanTpi {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        #[command(flatten)]
        scales: ScaleArgs,
    },
    /// Classify landforms (codes 11..42)
    Landform {
        #[command(flatten)]
        dem: DemArgs,
        /// Output file
        output: PathBuf,
        #[command(flatten)]
        scales: ScaleArgs,
        /// Radius in cells of the fine-scale TPI
        #[arg(long, default_value = "3")]
        fine_radius: usize,
        /// Site latitude in degrees for the heat load index
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
        /// Process in square tiles of this many cells
        #[arg(long)]
        tile_size: Option<usize>,
        /// Write the four-group numbering instead of landform codes
        #[arg(long, conflicts_with = "dense")]
        simple: bool,
        /// Write the dense 0..14 numbering instead of landform codes
        #[arg(long)]
        dense: bool,
        /// Also write slope, aspect, hli, tpi and mean_tpi into this directory
        #[arg(long)]
        all_outputs: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_dem(args: &DemArgs) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let engine = NativeEngine;
    let mut dem = engine
        .load_raster(&RasterSource::File(args.input.clone()))
        .with_context(|| format!("Failed to read raster {}", args.input.display()))?;
    pb.finish_and_clear();

    if let Some(b) = &args.bounds {
        let [min_x, min_y, max_x, max_y] = match b.as_slice() {
            [a, b, c, d] => [*a, *b, *c, *d],
            _ => bail!("--bounds needs four values"),
        };
        dem = engine
            .clip(&dem, Bounds::new(min_x, min_y, max_x, max_y))
            .context("Failed to clip DEM")?;
    }
    if let Some(factor) = args.reduce {
        dem = engine
            .reduce_resolution(&dem, factor)
            .context("Failed to reduce DEM resolution")?;
    }

    info!("Input: {} x {} (cell size {})", dem.cols(), dem.rows(), dem.cell_size());
    Ok(dem)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    info!("{} saved to {} ({:.2?})", name, path.display(), elapsed);
}

fn hli_params(latitude: Option<f64>) -> Result<HliParams> {
    Ok(match latitude {
        Some(lat) => HliParams::from_latitude(lat)?,
        None => HliParams::default(),
    })
}

fn run_landform(dem: &Raster<f64>, params: PipelineParams, tile_size: Option<usize>) -> Result<LandformProducts> {
    let Some(tile_size) = tile_size else {
        return Ok(landform_pipeline(dem, params)?);
    };

    let processor = TiledProcessor::new(tile_size, params.halo());
    let outputs = processor.process_many_with_halo(dem, |window| {
        let p = landform_pipeline(window, params)?;
        Ok(vec![p.slope, p.aspect, p.hli, p.tpi, p.mean_tpi, p.landforms])
    })?;

    let Ok([slope, aspect, hli, tpi, mean_tpi, landforms]) = <[Raster<f64>; 6]>::try_from(outputs) else {
        bail!("tiled landform run returned an unexpected number of rasters");
    };
    Ok(LandformProducts {
        slope,
        aspect,
        hli,
        tpi,
        mean_tpi,
        landforms,
    })
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    if let Some(threads) = cli.threads {
        set_num_threads(threads);
    }

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_dem(&DemArgs {
                input: input.clone(),
                bounds: None,
                reduce: None,
            })?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
        }

        // ── Terrain ──────────────────────────────────────────────────
        Commands::Terrain { algorithm } => match algorithm {
            TerrainCommands::Slope {
                dem,
                output,
                units,
                z_factor,
            } => {
                let dem = read_dem(&dem)?;
                let start = Instant::now();
                let params = SlopeParams {
                    units: units.into(),
                    z_factor,
                };
                let result = slope(&dem, params).context("Failed to calculate slope")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Slope", &output, elapsed);
            }

            TerrainCommands::Aspect { dem, output, format } => {
                let dem = read_dem(&dem)?;
                let start = Instant::now();
                let format = match format {
                    AngleArg::Degrees => AspectOutput::Degrees,
                    AngleArg::Radians => AspectOutput::Radians,
                };
                let result = aspect(&dem, format).context("Failed to calculate aspect")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Aspect", &output, elapsed);
            }

            TerrainCommands::Hli {
                dem,
                output,
                latitude,
                z_factor,
            } => {
                let dem = read_dem(&dem)?;
                let params = hli_params(latitude)?;
                let start = Instant::now();
                let slope_deg = slope(
                    &dem,
                    SlopeParams {
                        units: SlopeUnits::Degrees,
                        z_factor,
                    },
                )
                .context("Failed to calculate slope")?;
                let aspect_deg = aspect(&dem, AspectOutput::Degrees).context("Failed to calculate aspect")?;
                let result = hli(&slope_deg, &aspect_deg, params).context("Failed to calculate heat load index")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("HLI", &output, elapsed);
            }

            TerrainCommands::Tpi { dem, output, radius } => {
                let dem = read_dem(&dem)?;
                let start = Instant::now();
                let result = topographic_position(&dem, radius).context("Failed to calculate TPI")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("TPI", &output, elapsed);
            }

            TerrainCommands::MeanTpi { dem, output, scales } => {
                let dem = read_dem(&dem)?;
                let params = scales.resolve(dem.cell_size())?;
                info!("Radii (cells): {:?}", params.radii);
                let start = Instant::now();
                let result = multiscale_tpi(&dem, params).context("Failed to calculate mean TPI")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Mean TPI", &output, elapsed);
            }

            TerrainCommands::Landform {
                dem,
                output,
                scales,
                fine_radius,
                latitude,
                z_factor,
                tile_size,
                simple,
                dense,
                all_outputs,
            } => {
                let dem = read_dem(&dem)?;
                let params = PipelineParams {
                    slope: SlopeParams {
                        units: SlopeUnits::Degrees,
                        z_factor,
                    },
                    hli: hli_params(latitude)?,
                    multiscale: scales.resolve(dem.cell_size())?,
                    fine_radius,
                    ..Default::default()
                };
                params.validate()?;
                info!(
                    "Radii (cells): {:?}, fine radius {}",
                    params.multiscale.radii, params.fine_radius
                );

                let start = Instant::now();
                let pb = spinner("Classifying landforms...");
                let products = run_landform(&dem, params, tile_size).context("Failed to classify landforms")?;
                pb.finish_and_clear();

                let result = if simple {
                    remap_landforms_simple_raster(&products.landforms)?
                } else if dense {
                    remap_landforms_raster(&products.landforms)?
                } else {
                    products.landforms.clone()
                };
                let elapsed = start.elapsed();
                write_result(&result, &output)?;

                if let Some(dir) = all_outputs {
                    fs::create_dir_all(&dir)
                        .with_context(|| format!("Failed to create {}", dir.display()))?;
                    for (name, raster) in [
                        ("slope.tif", &products.slope),
                        ("aspect.tif", &products.aspect),
                        ("hli.tif", &products.hli),
                        ("tpi.tif", &products.tpi),
                        ("mean_tpi.tif", &products.mean_tpi),
                        ("landforms.tif", &products.landforms),
                    ] {
                        write_result(raster, &dir.join(name))?;
                    }
                    info!("Intermediate rasters written to {}", dir.display());
                }

                done("Landforms", &output, elapsed);

                let histogram = landform_histogram(&products.landforms);
                let total: usize = histogram.values().sum();
                println!("\nLandform cells:");
                for (class, count) in histogram {
                    println!(
                        "  {:>2}  {:<20} {:>10} ({:.1}%)",
                        class.code(),
                        class.name(),
                        count,
                        100.0 * count as f64 / total.max(1) as f64
                    );
                }
            }
        },

        // ── Remap ────────────────────────────────────────────────────
        Commands::Remap { input, output, simple } => {
            let landforms = read_dem(&DemArgs {
                input,
                bounds: None,
                reduce: None,
            })?;
            let start = Instant::now();
            let result = if simple {
                remap_landforms_simple_raster(&landforms)?
            } else {
                remap_landforms_raster(&landforms)?
            };
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("Remap", &output, elapsed);
        }
    }

    Ok(())
}
