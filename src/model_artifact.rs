use serde::{Deserialize, Serialize};

use crate::{
    artifact_serde::{ArtifactLoad, ArtifactSave},
    constants::{ARTIFACT_VERSION, MODEL_INPUT_NAME, MODEL_OUTPUT_NAME},
    error::{ConvertError, Result},
};

/// Input and output slots expected by a trained model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelSchema {
    pub input_name: String,
    pub input_dim: usize,
    pub output_name: String,
    pub output_dim: usize,
}

impl ModelSchema {
    pub fn new(input_dim: usize, output_dim: usize) -> Self {
        ModelSchema {
            input_name: MODEL_INPUT_NAME.to_string(),
            input_dim,
            output_name: MODEL_OUTPUT_NAME.to_string(),
            output_dim,
        }
    }
    /// Fails unless the schema maps `input_dim` features into `output_dim` features.
    pub fn check_dims(&self, input_dim: usize, output_dim: usize) -> Result<()> {
        if self.input_dim != input_dim {
            return Err(ConvertError::DimensionMismatch {
                context: format!("model input '{}'", self.input_name),
                expected: input_dim,
                actual: self.input_dim,
            });
        }
        if self.output_dim != output_dim {
            return Err(ConvertError::DimensionMismatch {
                context: format!("model output '{}'", self.output_name),
                expected: output_dim,
                actual: self.output_dim,
            });
        }
        Ok(())
    }
}

/// Trained regression model as produced by a [`TrainableModel`](crate::TrainableModel).
///
/// The payload is opaque to the pipeline, only the backend that produced it
/// knows how to read it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelArtifact {
    pub version: u32,
    pub backend: String,
    pub schema: ModelSchema,
    pub payload: Vec<u8>,
}

impl ModelArtifact {
    pub fn new(backend: &str, schema: ModelSchema, payload: Vec<u8>) -> Self {
        ModelArtifact {
            version: ARTIFACT_VERSION,
            backend: backend.to_string(),
            schema,
            payload,
        }
    }
}

impl ArtifactSave for ModelArtifact {}
impl ArtifactLoad for ModelArtifact {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.version == 0 || self.version > ARTIFACT_VERSION {
            return Err(format!("unsupported model version {}", self.version));
        }
        if self.schema.input_dim == 0 || self.schema.output_dim == 0 {
            return Err("model schema has empty slots".to_string());
        }
        Ok(())
    }
}
