use ndarray::Array2;

use crate::{config::FitConfig, error::Result, frames::FeatureVector, ModelArtifact};

/// Regression backend retrained by the [`Trainer`](crate::Trainer).
///
/// `inputs` and `labels` are already normalized and hold one frame per row,
/// with matching row order.
pub trait TrainableModel {
    /// Fits the model, starting from `base` when provided.
    /// Progress lines are reported through `on_log` while fitting.
    fn fit(
        &self,
        inputs: &Array2<f32>,
        labels: &Array2<f32>,
        base: Option<&ModelArtifact>,
        config: &FitConfig,
        on_log: &mut dyn FnMut(&str),
    ) -> Result<ModelArtifact>;
    /// Restores a predictor from an artifact produced by [`Self::fit`].
    fn predictor(&self, artifact: &ModelArtifact) -> Result<Box<dyn VectorPredictor>>;
}

/// Runs a trained model on one normalized frame at a time.
pub trait VectorPredictor {
    fn predict_one(&self, vector: &[f32]) -> Result<FeatureVector>;
}
