use std::collections::HashMap;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder, VarMap};
use ciborium::{de, ser};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{mcep_nn_train::training_loop, TrainableModel, VectorPredictor};
use crate::{
    config::{FitConfig, McepNNConfig},
    constants::{MCEP_NN_BACKEND, MCEP_NN_LEAKY_SLOPE},
    error::{ConvertError, Result},
    frames::FeatureVector,
    ModelArtifact, ModelSchema,
};

#[derive(Serialize, Deserialize, Clone)]
pub struct TensorData {
    pub values: Vec<f32>,
    pub dims: Vec<usize>,
}
pub type ModelWeights = HashMap<String, TensorData>;

/// Payload stored inside the [`ModelArtifact`] of a mcep network.
#[derive(Serialize, Deserialize)]
struct McepNNPayload {
    hidden_size: usize,
    hidden_layers: usize,
    weights: ModelWeights,
}

/// Residual multi layer perceptron mapping normalized source frames into
/// normalized target frames, trained with candle on the cpu.
///
/// When source and target share dimensionality the input is added to the
/// network output, so the layers learn the difference between both spaces.
pub struct McepNN {
    config: McepNNConfig,
}

impl McepNN {
    pub fn new(config: McepNNConfig) -> Self {
        McepNN { config }
    }
}

impl Default for McepNN {
    fn default() -> Self {
        McepNN::new(McepNNConfig::default())
    }
}

impl TrainableModel for McepNN {
    fn fit(
        &self,
        inputs: &Array2<f32>,
        labels: &Array2<f32>,
        base: Option<&ModelArtifact>,
        config: &FitConfig,
        on_log: &mut dyn FnMut(&str),
    ) -> Result<ModelArtifact> {
        if inputs.nrows() != labels.nrows() {
            return Err(ConvertError::DimensionMismatch {
                context: "training labels".to_string(),
                expected: inputs.nrows(),
                actual: labels.nrows(),
            });
        }
        if inputs.nrows() == 0 {
            return Err(ConvertError::EmptyDataset {
                reason: "no frames to fit the model".to_string(),
            });
        }
        let schema = ModelSchema::new(inputs.ncols(), labels.ncols());
        let base_payload = match base {
            Some(artifact) => {
                artifact
                    .schema
                    .check_dims(schema.input_dim, schema.output_dim)?;
                Some(decode_payload(artifact)?)
            }
            None => None,
        };
        let (hidden_size, hidden_layers) = base_payload
            .as_ref()
            .map(|p| (p.hidden_size, p.hidden_layers))
            .unwrap_or((self.config.hidden_size, self.config.hidden_layers));
        let dev = Device::Cpu;
        let var_map = VarMap::new();
        let model = McepMlp::new(
            VarBuilder::from_varmap(&var_map, DType::F32, &dev),
            schema.input_dim,
            schema.output_dim,
            hidden_size,
            hidden_layers,
        )?;
        match base_payload {
            Some(payload) => load_weights(&var_map, &payload.weights)?,
            None => init_weights(&var_map, config.seed)?,
        }
        let train_features = to_tensor(inputs, &dev)?;
        let train_labels = to_tensor(labels, &dev)?;
        training_loop(&model, &var_map, &train_features, &train_labels, config, on_log)?;
        let payload = McepNNPayload {
            hidden_size,
            hidden_layers,
            weights: get_tensors_data(&var_map)?,
        };
        let mut bytes: Vec<u8> = Vec::new();
        ser::into_writer(&payload, &mut bytes).map_err(|err| ConvertError::Model(err.to_string()))?;
        Ok(ModelArtifact::new(MCEP_NN_BACKEND, schema, bytes))
    }

    fn predictor(&self, artifact: &ModelArtifact) -> Result<Box<dyn VectorPredictor>> {
        let payload = decode_payload(artifact)?;
        let dev = Device::Cpu;
        let var_map = VarMap::new();
        let model = McepMlp::new(
            VarBuilder::from_varmap(&var_map, DType::F32, &dev),
            artifact.schema.input_dim,
            artifact.schema.output_dim,
            payload.hidden_size,
            payload.hidden_layers,
        )?;
        load_weights(&var_map, &payload.weights)?;
        Ok(Box::new(McepNNPredictor {
            _var_map: var_map,
            model,
            input_dim: artifact.schema.input_dim,
        }))
    }
}

struct McepNNPredictor {
    _var_map: VarMap,
    model: McepMlp,
    input_dim: usize,
}

impl VectorPredictor for McepNNPredictor {
    fn predict_one(&self, vector: &[f32]) -> Result<FeatureVector> {
        if vector.len() != self.input_dim {
            return Err(ConvertError::DimensionMismatch {
                context: "model input".to_string(),
                expected: self.input_dim,
                actual: vector.len(),
            });
        }
        let output = Tensor::from_slice(vector, (1, vector.len()), &Device::Cpu)
            .and_then(|tensor| self.model.forward(&tensor))
            .and_then(|output| output.get(0))
            .and_then(|output| output.to_vec1::<f32>())?;
        Ok(output)
    }
}

pub(super) struct McepMlp {
    hidden: Vec<Linear>,
    output: Linear,
    residual: bool,
}

impl McepMlp {
    fn new(
        vs: VarBuilder,
        input_size: usize,
        output_size: usize,
        hidden_size: usize,
        hidden_layers: usize,
    ) -> candle_core::Result<Self> {
        let mut hidden = Vec::with_capacity(hidden_layers);
        let mut in_size = input_size;
        for i in 0..hidden_layers {
            hidden.push(candle_nn::linear(in_size, hidden_size, vs.pp(format!("ln{}", i + 1)))?);
            in_size = hidden_size;
        }
        let output = candle_nn::linear(in_size, output_size, vs.pp("out"))?;
        Ok(Self {
            hidden,
            output,
            residual: input_size == output_size,
        })
    }
}

impl Module for McepMlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut hs = xs.clone();
        for layer in &self.hidden {
            let ls = layer.forward(&hs)?;
            hs = ls.maximum(&ls.affine(MCEP_NN_LEAKY_SLOPE, 0.)?)?;
        }
        let ys = self.output.forward(&hs)?;
        if self.residual {
            ys.add(xs)
        } else {
            Ok(ys)
        }
    }
}

fn to_tensor(array: &Array2<f32>, dev: &Device) -> Result<Tensor> {
    let values: Vec<f32> = array.iter().copied().collect();
    Ok(Tensor::from_vec(values, array.dim(), dev)?)
}

fn decode_payload(artifact: &ModelArtifact) -> Result<McepNNPayload> {
    if artifact.backend != MCEP_NN_BACKEND {
        return Err(ConvertError::Model(format!(
            "expected a '{}' model, found '{}'",
            MCEP_NN_BACKEND, artifact.backend
        )));
    }
    de::from_reader(artifact.payload.as_slice())
        .map_err(|err| ConvertError::Model(format!("invalid {} payload: {}", MCEP_NN_BACKEND, err)))
}

/// Seeded uniform init for weight matrices, zeros for biases.
fn init_weights(var_map: &VarMap, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = var_map
        .data()
        .lock()
        .map_err(|_| ConvertError::Model("model variables are poisoned".to_string()))?;
    let mut names: Vec<&String> = data.keys().collect();
    names.sort();
    for name in names {
        let var = &data[name];
        let dims = var.dims().to_vec();
        let values: Vec<f32> = if dims.len() == 2 {
            let bound = 1. / (dims[1] as f32).sqrt();
            (0..var.elem_count())
                .map(|_| rng.random_range(-bound..bound))
                .collect()
        } else {
            vec![0.; var.elem_count()]
        };
        var.set(&Tensor::from_vec(values, dims.as_slice(), var.device())?)?;
    }
    Ok(())
}

fn get_tensors_data(var_map: &VarMap) -> Result<ModelWeights> {
    let data = var_map
        .data()
        .lock()
        .map_err(|_| ConvertError::Model("model variables are poisoned".to_string()))?;
    let mut model_weights: ModelWeights = HashMap::new();
    for (name, var) in data.iter() {
        model_weights.insert(
            name.to_string(),
            TensorData {
                values: var.flatten_all()?.to_vec1::<f32>()?,
                dims: var.dims().to_vec(),
            },
        );
    }
    Ok(model_weights)
}

fn load_weights(var_map: &VarMap, model_weights: &ModelWeights) -> Result<()> {
    let data = var_map
        .data()
        .lock()
        .map_err(|_| ConvertError::Model("model variables are poisoned".to_string()))?;
    for (name, var) in data.iter() {
        let tensor_data = model_weights
            .get(name)
            .filter(|tensor_data| tensor_data.dims.as_slice() == var.dims())
            .ok_or_else(|| ConvertError::Model(format!("incorrect model layer '{}'", name)))?;
        var.set(&Tensor::from_vec(
            tensor_data.values.clone(),
            tensor_data.dims.as_slice(),
            var.device(),
        )?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn small_nn() -> McepNN {
        McepNN::new(McepNNConfig {
            hidden_size: 8,
            hidden_layers: 2,
        })
    }

    fn fit_config() -> FitConfig {
        FitConfig {
            epochs: 3,
            batch_size: 16,
            ..FitConfig::default()
        }
    }

    #[test]
    fn it_fits_and_restores_a_predictor() {
        let inputs = Array2::from_shape_fn((40, 4), |(f, d)| ((f + d) as f32 / 10.).sin());
        let labels = Array2::from_shape_fn((40, 2), |(f, d)| ((f * d) as f32 / 10.).cos());
        let mut lines = Vec::new();
        let artifact = small_nn()
            .fit(&inputs, &labels, None, &fit_config(), &mut |line| {
                lines.push(line.to_string())
            })
            .unwrap();
        assert_eq!(artifact.schema, ModelSchema::new(4, 2));
        assert_eq!(lines.len(), 3);
        let predictor = small_nn().predictor(&artifact).unwrap();
        let output = predictor.predict_one(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn it_is_reproducible_with_the_same_seed() {
        let inputs = Array2::from_shape_fn((20, 3), |(f, d)| (f as f32 - d as f32) / 7.);
        let labels = inputs.clone();
        let first = small_nn()
            .fit(&inputs, &labels, None, &fit_config(), &mut |_| {})
            .unwrap();
        let second = small_nn()
            .fit(&inputs, &labels, None, &fit_config(), &mut |_| {})
            .unwrap();
        let probe = [0.5f32, -0.5, 0.25];
        let a = small_nn().predictor(&first).unwrap().predict_one(&probe).unwrap();
        let b = small_nn().predictor(&second).unwrap().predict_one(&probe).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn it_retrains_from_a_base_artifact() {
        let inputs = Array2::from_shape_fn((12, 2), |(f, d)| (f + d) as f32 / 12.);
        let labels = inputs.mapv(|v| v * 2.);
        let base = small_nn()
            .fit(&inputs, &labels, None, &fit_config(), &mut |_| {})
            .unwrap();
        // topology comes from the base model
        let retrained = McepNN::default()
            .fit(&inputs, &labels, Some(&base), &fit_config(), &mut |_| {})
            .unwrap();
        assert!(small_nn().predictor(&retrained).is_ok());
        let wrong_labels = Array2::<f32>::zeros((12, 3));
        assert!(matches!(
            small_nn().fit(&inputs, &wrong_labels, Some(&base), &fit_config(), &mut |_| {}),
            Err(ConvertError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn it_rejects_foreign_artifacts() {
        let artifact = ModelArtifact::new("identity", ModelSchema::new(2, 2), Vec::new());
        assert!(matches!(
            small_nn().predictor(&artifact),
            Err(ConvertError::Model(_))
        ));
    }
}
