use std::path::PathBuf;

use log::{debug, info};

use crate::{
    artifact_serde::{ArtifactLoad, ArtifactSave},
    config::TrainConfig,
    error::{ConvertError, Result},
    frames::FramePairLoader,
    layout::{save_stats, ArtifactLayout},
    normalization::{NormalizationParameters, NormalizationStats},
    nn::TrainableModel,
    progress::ProgressReporter,
    store::ArrayStore,
    ModelArtifact,
};

/// Inputs of a training run.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct TrainRequest {
    /// Artifact to retrain. A freshly initialized model is used when unset.
    pub base_model: Option<PathBuf>,
    /// Directory of source feature files.
    pub source_dir: PathBuf,
    /// Directory of target feature files, paired with the source ones by name order.
    pub target_dir: PathBuf,
    /// Directory receiving the model and the statistics.
    pub save_dir: PathBuf,
}

/// Result of a successful training run.
pub struct TrainOutcome {
    pub frames: usize,
    pub source_params: NormalizationParameters,
    pub target_params: NormalizationParameters,
    pub artifact: ModelArtifact,
    pub layout: ArtifactLayout,
}

/// Loads paired features, fits the normalization of both feature spaces,
/// retrains the model on normalized frames and persists everything.
///
/// Dataset and base model problems are reported before the model is fitted,
/// and nothing is written unless the fit succeeds.
pub struct Trainer<'a, S: ArrayStore, M: TrainableModel> {
    store: &'a S,
    model: &'a M,
    config: TrainConfig,
}

impl<'a, S: ArrayStore, M: TrainableModel> Trainer<'a, S, M> {
    pub fn new(store: &'a S, model: &'a M, config: TrainConfig) -> Self {
        Trainer {
            store,
            model,
            config,
        }
    }
    pub fn train(&self, request: &TrainRequest) -> Result<TrainOutcome> {
        info!(
            "Run train: {} -> {}",
            request.source_dir.display(),
            request.target_dir.display()
        );
        let dataset =
            FramePairLoader::new(self.store).load_dirs(&request.source_dir, &request.target_dir)?;
        let (source_dim, target_dim) = dataset.dims().ok_or_else(|| ConvertError::EmptyDataset {
            reason: "no frame pairs loaded".to_string(),
        })?;
        info!(
            "Train frames {} (source dims {}, target dims {}).",
            dataset.len(),
            source_dim,
            target_dim
        );
        let mut source_matrix = dataset.source_matrix();
        let mut target_matrix = dataset.target_matrix();
        let stats = NormalizationStats::new(self.config.normalization);
        let source_params = stats.fit_rows(source_matrix.view())?;
        let target_params = stats.fit_rows(target_matrix.view())?;
        source_params.forward_rows(&mut source_matrix)?;
        target_params.forward_rows(&mut target_matrix)?;
        let base = match &request.base_model {
            Some(path) => {
                let artifact = ModelArtifact::load_from_file(path)?;
                artifact.schema.check_dims(source_dim, target_dim)?;
                debug!("Retraining base model {}", path.display());
                Some(artifact)
            }
            None => None,
        };
        let mut reporter = ProgressReporter::new(self.config.fit.epochs);
        let artifact = self.model.fit(
            &source_matrix,
            &target_matrix,
            base.as_ref(),
            &self.config.fit,
            &mut |line| {
                reporter.observe(line);
            },
        )?;
        artifact.schema.check_dims(source_dim, target_dim)?;
        let layout = ArtifactLayout::new(&request.save_dir);
        artifact.save_to_file(&layout.model)?;
        save_stats(self.store, &source_params, &layout.source_stats)?;
        save_stats(self.store, &target_params, &layout.target_stats)?;
        info!("Model and statistics saved to {}", request.save_dir.display());
        Ok(TrainOutcome {
            frames: dataset.len(),
            source_params,
            target_params,
            artifact,
            layout,
        })
    }
}
