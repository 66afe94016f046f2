use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use super::{FramePairs, PairedDataset};
use crate::{
    constants::FEATURE_FILE_EXTENSION,
    error::{ConvertError, Result},
    store::{ArrayStore, StoreError},
};

/// Builds aligned frame pairs from source and target feature files.
///
/// Directories are paired by ascending filename order only; the loader does
/// not check that the n-th source file and the n-th target file belong to
/// the same recording.
pub struct FramePairLoader<'a, S: ArrayStore> {
    store: &'a S,
}

impl<'a, S: ArrayStore> FramePairLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        FramePairLoader { store }
    }
    /// Loads one source/target file pair, failing when their frame counts differ.
    pub fn load_pair(&self, source_path: &Path, target_path: &Path) -> Result<FramePairs> {
        let source = self.load_features(source_path)?;
        let target = self.load_features(target_path)?;
        if source.nrows() != target.nrows() {
            return Err(ConvertError::FrameCountMismatch {
                source_path: source_path.to_path_buf(),
                source_frames: source.nrows(),
                target_path: target_path.to_path_buf(),
                target_frames: target.nrows(),
            });
        }
        debug!(
            "Loaded {} frames from {} ({} dims) and {} ({} dims)",
            source.nrows(),
            source_path.display(),
            source.ncols(),
            target_path.display(),
            target.ncols()
        );
        Ok(FramePairs::new(source, target))
    }
    /// Loads every matched file pair of both directories into one dataset.
    pub fn load_dirs(&self, source_dir: &Path, target_dir: &Path) -> Result<PairedDataset> {
        let source_files = list_feature_files(source_dir)?;
        let target_files = list_feature_files(target_dir)?;
        if source_files.len() != target_files.len() {
            warn!(
                "{} holds {} feature files but {} holds {}, extra files are ignored",
                source_dir.display(),
                source_files.len(),
                target_dir.display(),
                target_files.len()
            );
        }
        let mut dataset = PairedDataset::new();
        for (source_path, target_path) in source_files.iter().zip(target_files.iter()) {
            let pairs = self.load_pair(source_path, target_path)?;
            dataset
                .extend_checked(pairs)
                .map_err(|err| match err {
                    ConvertError::DimensionMismatch {
                        context,
                        expected,
                        actual,
                    } => ConvertError::DimensionMismatch {
                        context: format!(
                            "{} of {} / {}",
                            context,
                            source_path.display(),
                            target_path.display()
                        ),
                        expected,
                        actual,
                    },
                    err => err,
                })?;
        }
        if dataset.is_empty() {
            return Err(ConvertError::EmptyDataset {
                reason: format!(
                    "no frames found in {} and {}",
                    source_dir.display(),
                    target_dir.display()
                ),
            });
        }
        Ok(dataset)
    }
    fn load_features(&self, path: &Path) -> Result<ndarray::Array2<f32>> {
        let features = self.store.load_matrix(path).map_err(|err| match err {
            StoreError::NotFound(path) => ConvertError::MissingInputFile { path },
            StoreError::Malformed { path, reason } | StoreError::Io { path, reason } => {
                ConvertError::InvalidInputFile { path, reason }
            }
        })?;
        if features.ncols() == 0 {
            return Err(ConvertError::InvalidInputFile {
                path: path.to_path_buf(),
                reason: "frames have no features".to_string(),
            });
        }
        Ok(features)
    }
}

/// Feature files of a directory sorted by file name.
fn list_feature_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|_| ConvertError::MissingInputFile {
        path: dir.to_path_buf(),
    })?;
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| ConvertError::InvalidInputFile {
                path: dir.to_path_buf(),
                reason: err.to_string(),
            })?
            .path();
        let is_feature_file = path
            .extension()
            .map(|ext| ext == FEATURE_FILE_EXTENSION)
            .unwrap_or(false);
        if path.is_file() && is_feature_file {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
