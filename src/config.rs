use crate::constants::{
    MCEP_NN_DEFAULT_HIDDEN_LAYERS, MCEP_NN_DEFAULT_HIDDEN_SIZE, NORMALIZATION_DEFAULT_EPSILON,
    TRAIN_DEFAULT_BATCH_SIZE, TRAIN_DEFAULT_EPOCHS, TRAIN_DEFAULT_LEARNING_RATE,
    TRAIN_DEFAULT_SEED,
};
/// Configures how normalization statistics are fitted.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy)]
pub struct NormalizationConfig {
    /// Replaces the scale of zero-variance dimensions by 1.
    /// When disabled, fitting data with a constant dimension fails.
    pub zero_guard: bool,
    /// Standard deviations lower or equal than this value are considered zero.
    pub epsilon: f32,
}
impl Default for NormalizationConfig {
    fn default() -> NormalizationConfig {
        NormalizationConfig {
            zero_guard: true,
            epsilon: NORMALIZATION_DEFAULT_EPSILON,
        }
    }
}
/// Configures a single call to the regression backend fit.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy)]
pub struct FitConfig {
    /// Number of passes over the training frames.
    pub epochs: usize,
    /// Seed for weight initialization and frame shuffling.
    pub seed: u64,
    /// Optimizer learning rate.
    pub learning_rate: f64,
    /// Frames per optimizer step.
    pub batch_size: usize,
}
impl Default for FitConfig {
    fn default() -> FitConfig {
        FitConfig {
            epochs: TRAIN_DEFAULT_EPOCHS,
            seed: TRAIN_DEFAULT_SEED,
            learning_rate: TRAIN_DEFAULT_LEARNING_RATE,
            batch_size: TRAIN_DEFAULT_BATCH_SIZE,
        }
    }
}
/// Encapsulates all the training configurations.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy, Default)]
pub struct TrainConfig {
    /// Configures the regression backend fit.
    pub fit: FitConfig,
    /// Configures the statistics fitted on both feature spaces.
    pub normalization: NormalizationConfig,
}
/// Configures the mcep network topology.
/// Ignored when retraining from a base model, which carries its own topology.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy)]
pub struct McepNNConfig {
    /// Units on each hidden layer.
    pub hidden_size: usize,
    /// Number of hidden layers.
    pub hidden_layers: usize,
}
impl Default for McepNNConfig {
    fn default() -> McepNNConfig {
        McepNNConfig {
            hidden_size: MCEP_NN_DEFAULT_HIDDEN_SIZE,
            hidden_layers: MCEP_NN_DEFAULT_HIDDEN_LAYERS,
        }
    }
}
