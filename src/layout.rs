use std::path::{Path, PathBuf};

use ndarray::Array1;

use crate::{
    constants::{
        MODEL_FILE_NAME, SOURCE_STATS_DIR, STATS_OFFSET_FILE, STATS_SCALE_FILE, TARGET_STATS_DIR,
    },
    error::{ConvertError, Result},
    normalization::NormalizationParameters,
    store::{ArrayStore, StoreError},
};

/// Files written by a training run under its save directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactLayout {
    pub model: PathBuf,
    pub source_stats: PathBuf,
    pub target_stats: PathBuf,
}

impl ArtifactLayout {
    pub fn new(save_dir: &Path) -> Self {
        ArtifactLayout {
            model: save_dir.join(MODEL_FILE_NAME),
            source_stats: save_dir.join(SOURCE_STATS_DIR),
            target_stats: save_dir.join(TARGET_STATS_DIR),
        }
    }
    /// Every file path of the layout, model first.
    pub fn files(&self) -> Vec<PathBuf> {
        let (source_offset, source_scale) = stats_files(&self.source_stats);
        let (target_offset, target_scale) = stats_files(&self.target_stats);
        vec![
            self.model.clone(),
            source_offset,
            source_scale,
            target_offset,
            target_scale,
        ]
    }
}

/// Offset and scale file paths inside a statistics directory.
pub fn stats_files(stats_dir: &Path) -> (PathBuf, PathBuf) {
    (
        stats_dir.join(STATS_OFFSET_FILE),
        stats_dir.join(STATS_SCALE_FILE),
    )
}

pub fn save_stats<S: ArrayStore>(
    store: &S,
    params: &NormalizationParameters,
    stats_dir: &Path,
) -> Result<()> {
    let (offset_path, scale_path) = stats_files(stats_dir);
    for (values, path) in [(params.offset(), offset_path), (params.scale(), scale_path)] {
        store
            .save_vector(&Array1::from(values.to_vec()), &path)
            .map_err(|err| ConvertError::PersistenceError {
                path,
                reason: err.to_string(),
            })?;
    }
    Ok(())
}

pub fn load_stats<S: ArrayStore>(store: &S, stats_dir: &Path) -> Result<NormalizationParameters> {
    let (offset_path, scale_path) = stats_files(stats_dir);
    let offset = load_stats_vector(store, &offset_path)?;
    let scale = load_stats_vector(store, &scale_path)?;
    NormalizationParameters::new(offset, scale).map_err(|err| ConvertError::CorruptArtifact {
        path: stats_dir.to_path_buf(),
        reason: err.to_string(),
    })
}

fn load_stats_vector<S: ArrayStore>(store: &S, path: &Path) -> Result<Vec<f32>> {
    store
        .load_vector(path)
        .map(|vector| vector.to_vec())
        .map_err(|err| match err {
            StoreError::NotFound(path) => ConvertError::MissingArtifact { path },
            StoreError::Malformed { path, reason } | StoreError::Io { path, reason } => {
                ConvertError::CorruptArtifact { path, reason }
            }
        })
}
