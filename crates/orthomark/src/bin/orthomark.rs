//! Command-line surface for raster inspection and registry listing.
//!
//! Detection itself needs a `DetectionCapability` implementation wired in
//! by the embedding application; the CLI covers the loader, normalizer
//! and dictionary registry.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use orthomark::core::{init_with_level, AffineTransform};
use orthomark::detect::builtins;
use orthomark::detect::rgb_to_gray;
use orthomark::raster::load_georaster;

#[derive(Parser)]
#[command(name = "orthomark", version, about = "Georeferenced fiducial marker tooling")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a GeoTIFF and print its detection-ready properties.
    Inspect {
        /// Path to the georeferenced raster.
        raster: PathBuf,

        /// Write the normalized grayscale image used for detection.
        #[arg(long, value_name = "PNG")]
        dump_gray: Option<PathBuf>,

        /// Emit the summary as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the supported marker dictionary identifiers.
    Dictionaries,
}

#[derive(Serialize)]
struct InspectSummary {
    path: String,
    width: usize,
    height: usize,
    crs: String,
    transform: AffineTransform,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = init_with_level(level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut cause = err.source();
            while let Some(c) = cause {
                eprintln!("  caused by: {c}");
                cause = c.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Inspect {
            raster,
            dump_gray,
            json,
        } => inspect(raster, dump_gray, json),
        Command::Dictionaries => {
            for name in builtins::dictionary_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn inspect(
    raster_path: PathBuf,
    dump_gray: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let raster = load_georaster(&raster_path)?;

    if json {
        let summary = InspectSummary {
            path: raster_path.display().to_string(),
            width: raster.image.width,
            height: raster.image.height,
            crs: raster.crs.clone(),
            transform: raster.transform,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let t = raster.transform;
        println!("raster:    {}", raster_path.display());
        println!("size:      {} x {}", raster.image.width, raster.image.height);
        println!("crs:       {}", raster.crs);
        println!("transform: a={} b={} c={} d={} e={} f={}", t.a, t.b, t.c, t.d, t.e, t.f);
        let (x0, y0) = t.pixel_to_geo(0.0, 0.0);
        let (x1, y1) = t.pixel_to_geo(
            raster.image.width as f64 - 1.0,
            raster.image.height as f64 - 1.0,
        );
        println!("extent:    ({x0}, {y0}) .. ({x1}, {y1})");
    }

    if let Some(out) = dump_gray {
        let gray = rgb_to_gray(&raster.image.view());
        image::save_buffer(
            &out,
            &gray.data,
            gray.width as u32,
            gray.height as u32,
            image::ColorType::L8,
        )?;
        log::info!("wrote grayscale image to {}", out.display());
    }

    Ok(())
}
