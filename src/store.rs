use std::{
    fs,
    path::{Path, PathBuf},
};

use ndarray::{Array1, Array2};
use ndarray_npy::{read_npy, write_npy, ReadNpyExt};
use thiserror::Error;

/// Failures reported by an [`ArrayStore`].
///
/// Callers translate them into the [`ConvertError`](crate::ConvertError)
/// that fits what was being loaded or saved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File {0} not found")]
    NotFound(PathBuf),
    #[error("File {path} is not a valid array: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("Unable to access {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Whole-file persistence of the numeric arrays handled by the converter:
/// 2-D feature matrices (frames x dimensions) and 1-D statistics vectors.
pub trait ArrayStore {
    fn load_matrix(&self, path: &Path) -> Result<Array2<f32>, StoreError>;
    fn load_vector(&self, path: &Path) -> Result<Array1<f32>, StoreError>;
    fn save_matrix(&self, array: &Array2<f32>, path: &Path) -> Result<(), StoreError>;
    fn save_vector(&self, array: &Array1<f32>, path: &Path) -> Result<(), StoreError>;
}

/// [`ArrayStore`] backed by numpy `.npy` files.
///
/// Arrays stored as `f64` are accepted and narrowed to `f32`.
/// Missing parent directories are created on save.
#[derive(Default, Clone, Copy)]
pub struct NpyArrayStore;

impl NpyArrayStore {
    pub fn new() -> Self {
        NpyArrayStore
    }
}

impl ArrayStore for NpyArrayStore {
    fn load_matrix(&self, path: &Path) -> Result<Array2<f32>, StoreError> {
        read_f32_or_f64::<Array2<f32>, Array2<f64>>(path, |array| array.mapv(|v| v as f32))
    }
    fn load_vector(&self, path: &Path) -> Result<Array1<f32>, StoreError> {
        read_f32_or_f64::<Array1<f32>, Array1<f64>>(path, |array| array.mapv(|v| v as f32))
    }
    fn save_matrix(&self, array: &Array2<f32>, path: &Path) -> Result<(), StoreError> {
        create_parent_dir(path)?;
        write_npy(path, array).map_err(|err| StoreError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
    fn save_vector(&self, array: &Array1<f32>, path: &Path) -> Result<(), StoreError> {
        create_parent_dir(path)?;
        write_npy(path, array).map_err(|err| StoreError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}

fn read_f32_or_f64<A: ReadNpyExt, B: ReadNpyExt>(
    path: &Path,
    narrow: impl FnOnce(B) -> A,
) -> Result<A, StoreError> {
    if !path.is_file() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    match read_npy::<_, A>(path) {
        Ok(array) => Ok(array),
        Err(err) => read_npy::<_, B>(path)
            .map(narrow)
            .map_err(|_| StoreError::Malformed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }),
    }
}

fn create_parent_dir(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|err| StoreError::Io {
                path: dir.to_path_buf(),
                reason: err.to_string(),
            })
        }
        _ => Ok(()),
    }
}
