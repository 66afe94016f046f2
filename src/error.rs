use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the train and convert workflows.
///
/// Every variant is terminal for the run that produced it.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required source, target or input feature file (or directory) does not exist.
    #[error("Missing input file {path}")]
    MissingInputFile { path: PathBuf },
    /// A feature file exists but can not be read as a 2-D numeric array.
    #[error("Invalid input file {path}: {reason}")]
    InvalidInputFile { path: PathBuf, reason: String },
    /// Paired source and target files hold a different number of frames.
    #[error(
        "Frame count mismatch: {source_path} has {source_frames} frames but {target_path} has {target_frames}"
    )]
    FrameCountMismatch {
        source_path: PathBuf,
        source_frames: usize,
        target_path: PathBuf,
        target_frames: usize,
    },
    /// A vector length disagrees with the expected dimensionality.
    #[error("Dimension mismatch on {context}: expected {expected}, found {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// There is nothing to train or fit on.
    #[error("Empty dataset: {reason}")]
    EmptyDataset { reason: String },
    /// Zero-variance dimension found while the zero guard is disabled.
    #[error("Dimension {dimension} has zero variance and the zero guard is disabled")]
    ZeroVariance { dimension: usize },
    /// Features or statistics hold NaN or infinite values.
    #[error("Dimension {dimension} holds non-finite values")]
    NonFiniteFeatures { dimension: usize },
    /// A model or statistics file required for conversion does not exist.
    #[error("Missing artifact {path}")]
    MissingArtifact { path: PathBuf },
    /// A model or statistics file could not be parsed as expected.
    #[error("Corrupt artifact {path}: {reason}")]
    CorruptArtifact { path: PathBuf, reason: String },
    /// An artifact or output file could not be written.
    #[error("Unable to persist {path}: {reason}")]
    PersistenceError { path: PathBuf, reason: String },
    /// The regression backend failed while fitting or predicting.
    #[error("Model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<candle_core::Error> for ConvertError {
    fn from(err: candle_core::Error) -> Self {
        ConvertError::Model(err.to_string())
    }
}
