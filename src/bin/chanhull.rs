//! Benchmark driver: load a point file, time the selected hull algorithms and
//! optionally record the averages.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use chanhull::algorithms::convex_hull::parallel_chan::{self, ChanConfig};
use chanhull::algorithms::convex_hull::{chan, gift_wrapping, graham_scan, quickhull};
use chanhull::data::Point;
use chanhull::io;

#[derive(Parser, Debug)]
#[command(name = "chanhull")]
#[command(about = "Time sequential and parallel convex hull algorithms", long_about = None)]
struct Cli {
  /// Point file with one `x,y` pair per line
  #[arg(long, default_value = "input_points.txt")]
  input: PathBuf,

  /// Number of timed runs per algorithm
  #[arg(long, default_value_t = 1)]
  trials: u32,

  /// Only run this family of algorithms
  #[arg(long = "impl", value_enum)]
  implementation: Option<Family>,

  /// Reuse sub-hulls across attempts of parallel Chan
  #[arg(long)]
  coalesce: bool,

  /// Attempts of parallel Chan started together
  #[arg(long, default_value_t = 2)]
  simul_iters: u32,

  /// Sub-hull worker threads per attempt
  #[arg(long, default_value_t = 300)]
  workers: usize,

  /// Exponent t of the first group size 2^(2^t)
  #[arg(long, default_value_t = 3)]
  initial_exponent: u32,

  /// Append `name<TAB>trials<TAB>average ns<TAB>voi` rows to this file
  #[arg(long)]
  result_file: Option<PathBuf>,

  /// Variable of interest recorded next to each result row
  #[arg(long, default_value = "")]
  voi: String,

  /// Do not write `<name>.txt` hull files
  #[arg(long)]
  no_output: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Family {
  /// Jarvis march
  Jarv,
  /// Graham scan
  Grah,
  /// Chan's algorithm, sequential and parallel
  Chan,
  /// QuickHull, sequential and parallel
  Quic,
}

impl Cli {
  fn runs(&self, family: Family) -> bool {
    self.implementation.map_or(true, |only| only == family)
  }

  fn config(&self) -> ChanConfig {
    ChanConfig {
      initial_exponent: self.initial_exponent,
      max_workers: self.workers,
      simultaneous_guesses: self.simul_iters,
      coalesce: self.coalesce,
    }
  }
}

fn run_hull<F>(cli: &Cli, pts: &[Point], name: &str, method: F) -> Result<()>
where
  F: Fn(&[Point]) -> Result<Vec<Point>>,
{
  let mut total = Duration::ZERO;
  for _ in 0..cli.trials {
    let clock = Instant::now();
    let hull = method(pts).with_context(|| format!("{name} failed"))?;
    let elapsed = clock.elapsed();
    total += elapsed;

    println!();
    println!("{name} points on hull: {}", hull.len());
    println!("{name} {elapsed:?}");
    if !cli.no_output {
      let path = format!("{name}.txt");
      io::write_points(&path, &hull).with_context(|| format!("writing {path}"))?;
    }
  }

  if let Some(result_file) = &cli.result_file {
    let average = total.as_nanos() as f64 / f64::from(cli.trials.max(1));
    println!("Saving at {}", result_file.display());
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(result_file)
      .with_context(|| format!("opening {}", result_file.display()))?;
    writeln!(file, "{name}\t{}\t{average:.6}\t{}", cli.trials, cli.voi)?;
  }
  Ok(())
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();
  let config = cli.config();
  config.validate()?;

  let pts = io::read_points(&cli.input)
    .with_context(|| format!("reading points from {}", cli.input.display()))?;
  log::info!("{} points from {}", pts.len(), cli.input.display());

  if cli.runs(Family::Jarv) {
    run_hull(&cli, &pts, "serial_jarvis", |pts| {
      Ok(gift_wrapping::convex_hull(pts))
    })?;
  }
  if cli.runs(Family::Grah) {
    run_hull(&cli, &pts, "serial_graham", |pts| {
      Ok(graham_scan::convex_hull(pts.to_vec()))
    })?;
  }
  if cli.runs(Family::Chan) {
    run_hull(&cli, &pts, "serial_chans", |pts| {
      Ok(chan::convex_hull_from(pts, config.initial_exponent)?)
    })?;
    run_hull(&cli, &pts, "parallel_chans", |pts| {
      let (hull, metrics) = parallel_chan::convex_hull_with(pts, &config)?;
      if let Some(winner) = metrics.winner() {
        log::info!(
          "parallel_chans: {} rounds, group size {}, {} sub-hull points, {} coalesced",
          metrics.rounds,
          winner.group_size,
          winner.subhull_points,
          winner.coalesced_savings
        );
      }
      Ok(hull)
    })?;
  }
  if cli.runs(Family::Quic) {
    run_hull(&cli, &pts, "serial_qh", |pts| Ok(quickhull::convex_hull(pts)))?;
    run_hull(&cli, &pts, "parallel_qh", |pts| {
      Ok(quickhull::convex_hull_parallel(pts))
    })?;
  }
  Ok(())
}
