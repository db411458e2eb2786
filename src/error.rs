use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("target list {path}: no usable targets")]
    EmptyTargetList { path: PathBuf },

    #[error("entropy source failure: {0}")]
    Entropy(String),

    #[error("candidate key is not a valid secp256k1 scalar")]
    InvalidCandidate,

    #[error("match persistence failed after {attempts} attempts: {source}")]
    Persist {
        attempts: u32,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SweepError>;
