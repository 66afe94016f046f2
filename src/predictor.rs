use std::path::Path;

use log::{debug, info};
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::{
    artifact_serde::ArtifactLoad,
    error::{ConvertError, Result},
    layout::load_stats,
    normalization::NormalizationParameters,
    nn::{TrainableModel, VectorPredictor},
    store::{ArrayStore, StoreError},
    ModelArtifact,
};

/// Converts source feature frames into the target feature space:
/// normalize with the source statistics, run the model, denormalize with
/// the target statistics. Rows keep their order.
pub struct Predictor {
    model: Box<dyn VectorPredictor>,
    source_params: NormalizationParameters,
    target_params: NormalizationParameters,
}

impl Predictor {
    pub fn new(
        model: Box<dyn VectorPredictor>,
        source_params: NormalizationParameters,
        target_params: NormalizationParameters,
    ) -> Self {
        Predictor {
            model,
            source_params,
            target_params,
        }
    }
    /// Restores the statistics of both feature spaces and the trained model.
    pub fn load<S: ArrayStore, M: TrainableModel>(
        store: &S,
        backend: &M,
        model_path: &Path,
        source_stats_dir: &Path,
        target_stats_dir: &Path,
    ) -> Result<Self> {
        let source_params = load_stats(store, source_stats_dir)?;
        let target_params = load_stats(store, target_stats_dir)?;
        let artifact = ModelArtifact::load_from_file(model_path)?;
        artifact
            .schema
            .check_dims(source_params.dim(), target_params.dim())?;
        let model = backend.predictor(&artifact).map_err(|err| match err {
            ConvertError::Model(reason) => ConvertError::CorruptArtifact {
                path: model_path.to_path_buf(),
                reason,
            },
            err => err,
        })?;
        debug!(
            "Loaded {} model {} ({} -> {})",
            artifact.backend,
            model_path.display(),
            artifact.schema.input_dim,
            artifact.schema.output_dim
        );
        Ok(Predictor::new(model, source_params, target_params))
    }
    pub fn source_params(&self) -> &NormalizationParameters {
        &self.source_params
    }
    pub fn target_params(&self) -> &NormalizationParameters {
        &self.target_params
    }
    /// Converts every row of a frames x source dimensions matrix.
    pub fn predict_rows(&self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.convert_rows(input, "input features")
    }
    fn convert_rows(&self, input: ArrayView2<f32>, context: &str) -> Result<Array2<f32>> {
        if input.ncols() != self.source_params.dim() {
            return Err(ConvertError::DimensionMismatch {
                context: context.to_string(),
                expected: self.source_params.dim(),
                actual: input.ncols(),
            });
        }
        let target_dim = self.target_params.dim();
        let mut converted = Array2::zeros((input.nrows(), target_dim));
        for (index, (row, mut converted_row)) in input
            .rows()
            .into_iter()
            .zip(converted.rows_mut())
            .enumerate()
        {
            let normalized = self.source_params.forward(&row.to_vec())?;
            let output = self.model.predict_one(&normalized)?;
            if output.len() != target_dim {
                return Err(ConvertError::DimensionMismatch {
                    context: format!("model output for frame {}", index),
                    expected: target_dim,
                    actual: output.len(),
                });
            }
            converted_row.assign(&ArrayView1::from(
                self.target_params.inverse(&output)?.as_slice(),
            ));
        }
        Ok(converted)
    }
    /// Converts a feature file into a new feature file, returning the number of frames.
    pub fn convert_file<S: ArrayStore>(
        &self,
        store: &S,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<usize> {
        let input = store.load_matrix(input_path).map_err(|err| match err {
            StoreError::NotFound(path) => ConvertError::MissingInputFile { path },
            StoreError::Malformed { path, reason } | StoreError::Io { path, reason } => {
                ConvertError::InvalidInputFile { path, reason }
            }
        })?;
        let output = self.convert_rows(
            input.view(),
            &format!("input features {}", input_path.display()),
        )?;
        store
            .save_matrix(&output, output_path)
            .map_err(|err| ConvertError::PersistenceError {
                path: output_path.to_path_buf(),
                reason: err.to_string(),
            })?;
        info!(
            "Converted {} frames from {} into {}",
            output.nrows(),
            input_path.display(),
            output_path.display()
        );
        Ok(output.nrows())
    }
}
