use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{CONFIDENCE_95, Params};
use crate::error::PercolationError;
use crate::percolation::{Percolation, validate_size};
use crate::rng::{Rng, trial_seed};

/// Open sites in a uniformly random order until the grid percolates.
pub fn open_until_percolates(n: i64, rng: &mut Rng) -> Result<Percolation, PercolationError> {
    let mut perc = Percolation::new(n)?;
    let side = perc.size();
    let mut order: Vec<usize> = (0..side * side).collect();
    rng.shuffle(&mut order);

    // Every site opened => percolates, so the loop always ends early
    for i in order {
        perc.open((i / side) as i64, (i % side) as i64)?;
        if perc.percolates() {
            break;
        }
    }
    Ok(perc)
}

/// Open fraction at the moment a randomly filled grid first percolates.
pub fn run_trial(n: i64, rng: &mut Rng) -> Result<f64, PercolationError> {
    Ok(open_until_percolates(n, rng)?.open_fraction())
}

/// Sample statistics of the percolation threshold over independent trials.
#[derive(Clone, Debug, Serialize)]
pub struct ThresholdStats {
    pub n: i64,
    thresholds: Vec<f64>,
    mean: f64,
    stddev: f64,
}

impl ThresholdStats {
    /// Runs `params.trials` trials in parallel. Trial `t` always uses the
    /// same seed, so results do not depend on the thread count.
    pub fn run(params: &Params) -> Result<Self, PercolationError> {
        if params.trials == 0 {
            return Err(PercolationError::InvalidTrials);
        }
        // Reject bad sizes before spawning work
        validate_size(params.n)?;

        let thresholds = (0..params.trials)
            .into_par_iter()
            .map(|t| {
                let mut rng = Rng::new(trial_seed(params.seed, t));
                let threshold = run_trial(params.n, &mut rng)?;
                debug!(trial = t, threshold, "trial finished");
                Ok(threshold)
            })
            .collect::<Result<Vec<f64>, PercolationError>>()?;

        let stats = Self::from_thresholds(params.n, thresholds);
        info!(
            n = params.n,
            trials = params.trials,
            mean = stats.mean,
            stddev = stats.stddev,
            "threshold experiment complete"
        );
        Ok(stats)
    }

    fn from_thresholds(n: i64, thresholds: Vec<f64>) -> Self {
        let t = thresholds.len() as f64;
        let mean = thresholds.iter().sum::<f64>() / t;
        let var = thresholds.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (t - 1.0);
        Self {
            n,
            thresholds,
            mean,
            stddev: var.sqrt(),
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn trials(&self) -> usize {
        self.thresholds.len()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation; NaN for a single trial.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    fn half_width(&self) -> f64 {
        CONFIDENCE_95 * self.stddev / (self.trials() as f64).sqrt()
    }

    pub fn confidence_lo(&self) -> f64 {
        self.mean - self.half_width()
    }

    pub fn confidence_hi(&self) -> f64 {
        self.mean + self.half_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: i64, trials: usize, seed: u64) -> Params {
        Params { n, trials, seed }
    }

    #[test]
    fn single_site_threshold_is_one() {
        let mut rng = Rng::new(3);
        assert_eq!(run_trial(1, &mut rng).unwrap(), 1.0);
    }

    #[test]
    fn trial_thresholds_are_fractions() {
        let mut rng = Rng::new(11);
        for _ in 0..20 {
            let t = run_trial(8, &mut rng).unwrap();
            // At least one full column (8 of 64) must be open to percolate
            assert!((0.125..=1.0).contains(&t), "threshold {t}");
        }
    }

    #[test]
    fn same_seed_same_result() {
        let a = ThresholdStats::run(&params(20, 16, 5)).unwrap();
        let b = ThresholdStats::run(&params(20, 16, 5)).unwrap();
        assert_eq!(a.thresholds(), b.thresholds());
        assert_eq!(a.mean(), b.mean());
    }

    #[test]
    fn mean_is_near_known_threshold() {
        let s = ThresholdStats::run(&params(64, 200, 42)).unwrap();
        assert_eq!(s.trials(), 200);
        assert!((0.56..0.63).contains(&s.mean()), "mean {}", s.mean());
        assert!(s.confidence_lo() < s.mean() && s.mean() < s.confidence_hi());
    }

    #[test]
    fn summary_of_known_samples() {
        let s = ThresholdStats::from_thresholds(2, vec![0.5, 0.75, 1.0]);
        assert!((s.mean() - 0.75).abs() < 1e-12);
        assert!((s.stddev() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn one_trial_has_undefined_spread() {
        let s = ThresholdStats::run(&params(4, 1, 0)).unwrap();
        assert!(s.stddev().is_nan());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            ThresholdStats::run(&params(10, 0, 0)).unwrap_err(),
            PercolationError::InvalidTrials
        );
        assert_eq!(
            ThresholdStats::run(&params(0, 5, 0)).unwrap_err(),
            PercolationError::InvalidSize { n: 0 }
        );
        assert_eq!(
            ThresholdStats::run(&params(1 << 40, 5, 0)).unwrap_err(),
            PercolationError::InvalidSize { n: 1 << 40 }
        );
    }

    #[test]
    fn serializes_summary_fields() {
        let s = ThresholdStats::from_thresholds(3, vec![0.5, 1.0]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["n"], 3);
        assert_eq!(v["mean"], 0.75);
        assert_eq!(v["thresholds"].as_array().unwrap().len(), 2);
    }
}
