use thiserror::Error;

/// Failures raised by the percolation core and the threshold experiment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PercolationError {
    #[error("grid size must be positive, got {n}")]
    InvalidSize { n: i64 },

    #[error("site ({row}, {col}) is outside a {n}x{n} grid")]
    OutOfBounds { row: i64, col: i64, n: usize },

    #[error("label {label} is outside a union-find of {len} elements")]
    LabelOutOfRange { label: usize, len: usize },

    #[error("threshold experiment needs at least one trial")]
    InvalidTrials,
}

/// Failures while reading a site script (`N` followed by `row col` pairs).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("script is empty, expected a grid size")]
    Empty,

    #[error("token {index} is not an integer: {token:?}")]
    InvalidInteger { index: usize, token: String },

    #[error("row {row} has no matching column")]
    DanglingCoordinate { row: i64 },
}
