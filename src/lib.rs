pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod percolation;
pub mod render;
pub mod rng;
pub mod stats;
pub mod union_find;

use std::time::Instant;

pub use config::Params;
pub use error::{InputError, PercolationError};
pub use percolation::{Percolation, SiteState};
pub use stats::ThresholdStats;
pub use union_find::DisjointSet;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Run the threshold experiment and one sample grid opened in the same random
/// order as trial 0, stopped at the moment it percolates.
pub fn experiment(
    params: &Params,
) -> Result<(ThresholdStats, Percolation, Vec<Timing>), PercolationError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Independent trials (parallel)
    let t = Instant::now();
    let stats = ThresholdStats::run(params)?;
    timings.push(Timing {
        name: "trials",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Replay trial 0 for display
    let t = Instant::now();
    let sample = sample_grid(params.n, params.seed)?;
    timings.push(Timing {
        name: "sample",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((stats, sample, timings))
}

/// The grid of trial 0 at the moment it first percolates.
pub fn sample_grid(n: i64, seed: u64) -> Result<Percolation, PercolationError> {
    let mut rng = rng::Rng::new(rng::trial_seed(seed, 0));
    stats::open_until_percolates(n, &mut rng)
}
