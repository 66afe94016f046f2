mod mcep_nn;
mod mcep_nn_train;
mod trainable_model;

pub use mcep_nn::{McepNN, ModelWeights, TensorData};
pub use trainable_model::{TrainableModel, VectorPredictor};
