use serde::Deserialize;

/// Threshold experiment parameters. Missing fields fall back to `Default`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Grid side length.
    pub n: i64,
    /// Independent Monte-Carlo trials.
    pub trials: usize,
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            n: 200,
            trials: 100,
            seed: 42,
        }
    }
}

/// z-score of the two-sided 95% confidence interval.
pub const CONFIDENCE_95: f64 = 1.96;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p: Params = serde_json::from_str(r#"{ "n": 20 }"#).unwrap();
        assert_eq!(p.n, 20);
        assert_eq!(p.trials, Params::default().trials);
        assert_eq!(p.seed, 42);
    }
}
