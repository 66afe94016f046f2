use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
};

use ciborium::{de, ser};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ConvertError, Result};

pub trait ArtifactSave: Serialize {
    fn save_to_file(&self, path: &Path) -> Result<()> {
        let persistence_error = |reason: String| ConvertError::PersistenceError {
            path: path.to_path_buf(),
            reason,
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| persistence_error(err.to_string()))?;
        }
        let mut file = File::create(path).map_err(|err| persistence_error(err.to_string()))?;
        ser::into_writer(self, &mut file).map_err(|err| persistence_error(err.to_string()))?;
        Ok(())
    }
    fn save_to_buffer(&self) -> std::result::Result<Vec<u8>, String> {
        let mut bytes: Vec<u8> = Vec::new();
        ser::into_writer(self, &mut bytes).map_err(|err| err.to_string())?;
        Ok(bytes)
    }
}
pub trait ArtifactLoad: DeserializeOwned + Sized {
    /// Checks a freshly decoded value, returning the reason it is unusable.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
    fn load_from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConvertError::MissingArtifact {
                path: path.to_path_buf(),
            });
        }
        let corrupt_error = |reason: String| ConvertError::CorruptArtifact {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|err| corrupt_error(err.to_string()))?;
        let value: Self =
            de::from_reader(BufReader::new(file)).map_err(|err| corrupt_error(err.to_string()))?;
        value.validate().map_err(corrupt_error)?;
        Ok(value)
    }
    fn load_from_buffer(buffer: &[u8]) -> std::result::Result<Self, String> {
        let reader = BufReader::new(buffer);
        let value: Self = de::from_reader(reader).map_err(|err| err.to_string())?;
        value.validate()?;
        Ok(value)
    }
}
