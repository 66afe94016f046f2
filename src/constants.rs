// artifact layout
pub const MODEL_FILE_NAME: &str = "Model";
pub const SOURCE_STATS_DIR: &str = "Source";
pub const TARGET_STATS_DIR: &str = "Target";
pub const STATS_OFFSET_FILE: &str = "Means.npy";
pub const STATS_SCALE_FILE: &str = "Vars.npy";
pub const FEATURE_FILE_EXTENSION: &str = "npy";
// model artifact
pub const ARTIFACT_VERSION: u32 = 1;
pub const MODEL_INPUT_NAME: &str = "X";
pub const MODEL_OUTPUT_NAME: &str = "Converted";
// training defaults
pub const TRAIN_DEFAULT_EPOCHS: usize = 20;
pub const TRAIN_DEFAULT_SEED: u64 = 555;
pub const TRAIN_DEFAULT_LEARNING_RATE: f64 = 1e-3;
pub const TRAIN_DEFAULT_BATCH_SIZE: usize = 256;
// normalization defaults
pub const NORMALIZATION_DEFAULT_EPSILON: f32 = 1e-8;
// mcep network
pub const MCEP_NN_BACKEND: &str = "mcep-nn";
pub const MCEP_NN_DEFAULT_HIDDEN_SIZE: usize = 500;
pub const MCEP_NN_DEFAULT_HIDDEN_LAYERS: usize = 3;
pub const MCEP_NN_LEAKY_SLOPE: f64 = 0.2;
// progress
pub const RETRAIN_COMPONENT: &str = "McepRetrainer";
pub const ELAPSED_MARKER: &str = "Elapsed";
