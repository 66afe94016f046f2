mod artifact_serde;
mod config;
mod constants;
mod error;
mod frames;
mod layout;
mod model_artifact;
mod nn;
mod normalization;
mod predictor;
mod progress;
mod store;
mod trainer;
pub use artifact_serde::{ArtifactLoad, ArtifactSave};
pub use config::FitConfig;
pub use config::McepNNConfig;
pub use config::NormalizationConfig;
pub use config::TrainConfig;
pub use error::{ConvertError, Result};
pub use frames::{FeatureVector, FramePair, FramePairLoader, FramePairs, PairedDataset};
pub use layout::{load_stats, save_stats, stats_files, ArtifactLayout};
pub use model_artifact::{ModelArtifact, ModelSchema};
pub use nn::{McepNN, ModelWeights, TensorData, TrainableModel, VectorPredictor};
pub use normalization::{NormalizationParameters, NormalizationStats};
pub use predictor::Predictor;
pub use progress::{format_elapsed, ProgressReporter};
pub use store::{ArrayStore, NpyArrayStore, StoreError};
pub use trainer::{TrainOutcome, TrainRequest, Trainer};
