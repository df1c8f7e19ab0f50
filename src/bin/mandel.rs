extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
extern crate mandelmask;

use clap::{value_t, App, AppSettings, Arg, ArgMatches};
use failure::ResultExt;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use log::{debug, info};
use mandelmask::chart;
use mandelmask::{Config, EscapePolicy};
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_finite(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

const ROWS: &str = "rows";
const COLUMNS: &str = "columns";
const REAL_MIN: &str = "real-min";
const REAL_MAX: &str = "real-max";
const IMAG_MIN: &str = "imag-min";
const IMAG_MAX: &str = "imag-max";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const CELLS_PER_TASK: &str = "cells-per-task";
const EARLY_EXIT: &str = "early-exit";
const IMAGE: &str = "image";
const VERBOSE: &str = "verbose";

const MAX_CELLS_PER_AXIS: usize = 100_000;
const MAX_THREADS: usize = 1024;
const MAX_ITERATIONS: usize = 1_000_000_000;

fn bound(name: &'static str, default: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .required(false)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .default_value(default)
        .validator(|s| validate_finite(&s, "Window bounds must be finite numbers"))
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Draws the Mandelbrot set as a chart of dots")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name(ROWS)
                .required(false)
                .long(ROWS)
                .short("r")
                .takes_value(true)
                .default_value("63")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_CELLS_PER_AXIS,
                        "Could not parse row count",
                        &format!("Row count must be between 1 and {}", MAX_CELLS_PER_AXIS),
                    )
                })
                .help("Number of rows in the chart"),
        )
        .arg(
            Arg::with_name(COLUMNS)
                .required(false)
                .long(COLUMNS)
                .short("c")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_CELLS_PER_AXIS,
                        "Could not parse column count",
                        &format!("Column count must be between 1 and {}", MAX_CELLS_PER_AXIS),
                    )
                })
                .help("Number of columns in the chart"),
        )
        .arg(bound(REAL_MIN, "-2.0", "Left edge of the sampled window"))
        .arg(bound(REAL_MAX, "0.5", "Right edge of the sampled window"))
        .arg(bound(IMAG_MIN, "-1.5", "Lower edge of the sampled window"))
        .arg(bound(IMAG_MAX, "1.5", "Upper edge of the sampled window"))
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_ITERATIONS,
                        "Could not parse iteration count",
                        &format!("Iteration count must be between 1 and {}", MAX_ITERATIONS),
                    )
                })
                .help("Number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_THREADS,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", MAX_THREADS),
                    )
                })
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(CELLS_PER_TASK)
                .required(false)
                .long(CELLS_PER_TASK)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        std::usize::MAX,
                        "Could not parse cells per task",
                        "Cells per task must be at least 1",
                    )
                })
                .help("Number of consecutive cells handed to a thread at a time"),
        )
        .arg(
            Arg::with_name(EARLY_EXIT)
                .long(EARLY_EXIT)
                .help("Stop iterating a point as soon as it escapes"),
        )
        .arg(
            Arg::with_name(IMAGE)
                .required(false)
                .long(IMAGE)
                .short("o")
                .takes_value(true)
                .help("Also write the chart as a graymap image"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for even more"),
        )
        .get_matches()
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn config_from(matches: &ArgMatches) -> Result<Config, clap::Error> {
    let defaults = Config::default();
    let workers = if matches.is_present(THREADS) {
        value_t!(matches, THREADS, usize)?
    } else {
        defaults.workers
    };
    Ok(Config {
        rows: value_t!(matches, ROWS, usize)?,
        columns: value_t!(matches, COLUMNS, usize)?,
        real_min: value_t!(matches, REAL_MIN, f64)?,
        real_max: value_t!(matches, REAL_MAX, f64)?,
        imag_min: value_t!(matches, IMAG_MIN, f64)?,
        imag_max: value_t!(matches, IMAG_MAX, f64)?,
        iterations: value_t!(matches, ITERATIONS, usize)?,
        workers,
        cells_per_task: value_t!(matches, CELLS_PER_TASK, usize)?,
        escape_policy: if matches.is_present(EARLY_EXIT) {
            EscapePolicy::EarlyExit
        } else {
            EscapePolicy::FixedBudget
        },
    })
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let config = config_from(matches)?;
    debug!("{:?}", config);
    let grid = config.grid()?;
    info!(
        "sampling {}x{} cells over [{}, {}] x [{}, {}]i with {} iterations on {} threads",
        config.rows,
        config.columns,
        config.real_min,
        config.real_max,
        config.imag_min,
        config.imag_max,
        config.iterations,
        config.workers
    );

    let start = Instant::now();
    let mask = config.evaluator().evaluate(&grid, config.iterations)?;
    info!(
        "{} of {} cells stable, took {:?}",
        mask.stable_count(),
        mask.len(),
        start.elapsed()
    );

    let stdout = io::stdout();
    chart::write_ascii(&mask, &mut stdout.lock()).context("Could not write the chart")?;

    if let Some(outfile) = matches.value_of(IMAGE) {
        write_image(outfile, &chart::to_graymap(&mask), (mask.columns(), mask.rows()))
            .with_context(|_| format!("Could not write image {}", outfile))?;
        info!("wrote {}", outfile);
    }
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.occurrences_of(VERBOSE));

    if let Err(err) = run(&matches) {
        eprintln!("Render failure: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
