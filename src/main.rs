use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use percolation::config::Params;
use percolation::input::parse_script;
use percolation::{Percolation, render};

#[derive(Parser, Debug)]
#[command(name = "percolation", about = "N-by-N site percolation", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the sites listed in FILE (`N` then `row col` pairs) and report
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Estimate the percolation threshold by Monte-Carlo simulation
    Stats {
        #[arg(long, default_value_t = Params::default().n)]
        n: i64,
        #[arg(long, default_value_t = Params::default().trials)]
        trials: usize,
        #[arg(long, default_value_t = Params::default().seed)]
        seed: u64,
        /// Also save the percolated sample grid of trial 0 as a PNG
        #[arg(long, value_name = "PNG")]
        sample: Option<PathBuf>,
    },
    /// Replay FILE and save the resulting grid as a PNG
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "percolation.png")]
        out: PathBuf,
        /// Pixel size of one site
        #[arg(long, default_value_t = 8)]
        cell: usize,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Run { file } => {
            let perc = replay_file(&file)?;
            println!("{} open sites", perc.number_of_open_sites());
            if perc.percolates() {
                println!("percolates");
            } else {
                println!("does not percolate");
            }
        }
        Command::Stats {
            n,
            trials,
            seed,
            sample,
        } => {
            let params = Params { n, trials, seed };
            eprintln!("Running {} trials on a {}x{} grid, seed={}", trials, n, n, seed);

            let (stats, grid, timings) = percolation::experiment(&params)?;

            eprintln!("\nTimings:");
            for t in &timings {
                eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
            }

            println!("mean                    = {:.6}", stats.mean());
            println!("stddev                  = {:.6}", stats.stddev());
            println!(
                "95% confidence interval = [{:.6}, {:.6}]",
                stats.confidence_lo(),
                stats.confidence_hi()
            );

            if let Some(path) = sample {
                save_png(&path, &grid, 4)?;
            }
        }
        Command::Render { file, out, cell } => {
            let perc = replay_file(&file)?;
            save_png(&out, &perc, cell)?;
        }
    }
    Ok(())
}

fn replay_file(path: &Path) -> anyhow::Result<Percolation> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let script = parse_script(&text).with_context(|| format!("bad script {}", path.display()))?;
    info!(n = script.n, sites = script.sites.len(), "replaying script");
    let perc = script
        .replay()
        .with_context(|| format!("failed to replay {}", path.display()))?;
    Ok(perc)
}

fn save_png(path: &Path, perc: &Percolation, cell: usize) -> anyhow::Result<()> {
    let side = render::image_side(perc, cell) as u32;
    let rgba = render::render_sites(perc, cell);
    image::save_buffer(path, &rgba, side, side, image::ColorType::Rgba8)
        .with_context(|| format!("failed to save {}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format().with_target(true).compact();

    // RUST_LOG wins; otherwise warnings only so stdout stays the report
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("percolation=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).event_format(format))
        .with(filter)
        .init();
}
