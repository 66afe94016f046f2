mod frame_pair;
mod frame_pair_loader;
mod paired_dataset;

pub use frame_pair::{FeatureVector, FramePair, FramePairs};
pub use frame_pair_loader::FramePairLoader;
pub use paired_dataset::PairedDataset;
