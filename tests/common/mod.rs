#![allow(dead_code)]
use std::{cell::Cell, path::Path};

use ndarray::Array2;
use rustvc::{
    ArrayStore, FitConfig, ModelArtifact, ModelSchema, NpyArrayStore, Result, TrainableModel,
    VectorPredictor,
};

pub fn init_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();
}

/// Writes a frames x dims matrix whose values encode their position.
pub fn write_features(dir: &Path, name: &str, frames: usize, dims: usize) {
    let array = Array2::from_shape_fn((frames, dims), |(f, d)| (f as f32).sin() * (d + 1) as f32);
    NpyArrayStore.save_matrix(&array, &dir.join(name)).unwrap();
}

/// Backend that records fit calls and predicts with a fixed function.
pub struct StubModel {
    pub fit_calls: Cell<usize>,
    predict: fn(&[f32]) -> Vec<f32>,
}

impl StubModel {
    pub fn identity() -> Self {
        StubModel {
            fit_calls: Cell::new(0),
            predict: |vector| vector.to_vec(),
        }
    }
    pub fn with(predict: fn(&[f32]) -> Vec<f32>) -> Self {
        StubModel {
            fit_calls: Cell::new(0),
            predict,
        }
    }
}

impl TrainableModel for StubModel {
    fn fit(
        &self,
        inputs: &Array2<f32>,
        labels: &Array2<f32>,
        _base: Option<&ModelArtifact>,
        config: &FitConfig,
        on_log: &mut dyn FnMut(&str),
    ) -> Result<ModelArtifact> {
        self.fit_calls.set(self.fit_calls.get() + 1);
        for epoch in 1..=config.epochs {
            on_log(&format!(
                "[Source=McepRetrainer] epoch {} train loss: 0.1. Elapsed 00:00:01.0000000.",
                epoch
            ));
        }
        Ok(ModelArtifact::new(
            "stub",
            ModelSchema::new(inputs.ncols(), labels.ncols()),
            Vec::new(),
        ))
    }
    fn predictor(&self, _artifact: &ModelArtifact) -> Result<Box<dyn VectorPredictor>> {
        Ok(Box::new(StubPredictor {
            predict: self.predict,
        }))
    }
}

pub struct StubPredictor {
    pub predict: fn(&[f32]) -> Vec<f32>,
}

impl VectorPredictor for StubPredictor {
    fn predict_one(&self, vector: &[f32]) -> Result<Vec<f32>> {
        Ok((self.predict)(vector))
    }
}
