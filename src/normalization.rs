use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::{
    config::NormalizationConfig,
    error::{ConvertError, Result},
    frames::FeatureVector,
};

/// Per dimension affine statistics of one feature space.
///
/// The forward transform is `(x - offset) / scale` and the inverse
/// `x * scale + offset`. Instances are immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizationParameters {
    offset: Vec<f32>,
    scale: Vec<f32>,
}

impl NormalizationParameters {
    /// Builds parameters from stored vectors, rejecting unusable scales.
    pub fn new(offset: Vec<f32>, scale: Vec<f32>) -> Result<Self> {
        if offset.len() != scale.len() {
            return Err(ConvertError::DimensionMismatch {
                context: "normalization scale".to_string(),
                expected: offset.len(),
                actual: scale.len(),
            });
        }
        if let Some(dimension) = offset
            .iter()
            .zip(scale.iter())
            .position(|(o, s)| !o.is_finite() || !s.is_finite())
        {
            return Err(ConvertError::NonFiniteFeatures { dimension });
        }
        if let Some(dimension) = scale.iter().position(|s| *s == 0.) {
            return Err(ConvertError::ZeroVariance { dimension });
        }
        Ok(NormalizationParameters { offset, scale })
    }
    pub fn offset(&self) -> &[f32] {
        &self.offset
    }
    pub fn scale(&self) -> &[f32] {
        &self.scale
    }
    pub fn dim(&self) -> usize {
        self.offset.len()
    }
    pub fn forward(&self, vector: &[f32]) -> Result<FeatureVector> {
        self.check_dim(vector.len(), "normalization input")?;
        Ok(vector
            .iter()
            .zip(self.offset.iter().zip(self.scale.iter()))
            .map(|(value, (offset, scale))| (value - offset) / scale)
            .collect())
    }
    pub fn inverse(&self, vector: &[f32]) -> Result<FeatureVector> {
        self.check_dim(vector.len(), "denormalization input")?;
        Ok(vector
            .iter()
            .zip(self.offset.iter().zip(self.scale.iter()))
            .map(|(value, (offset, scale))| value * scale + offset)
            .collect())
    }
    /// Applies [`Self::forward`] to every row in place.
    pub fn forward_rows(&self, rows: &mut Array2<f32>) -> Result<()> {
        self.check_dim(rows.ncols(), "normalization matrix")?;
        for mut row in rows.rows_mut() {
            for (value, (offset, scale)) in row
                .iter_mut()
                .zip(self.offset.iter().zip(self.scale.iter()))
            {
                *value = (*value - offset) / scale;
            }
        }
        Ok(())
    }
    /// Applies [`Self::inverse`] to every row in place.
    pub fn inverse_rows(&self, rows: &mut Array2<f32>) -> Result<()> {
        self.check_dim(rows.ncols(), "denormalization matrix")?;
        for mut row in rows.rows_mut() {
            for (value, (offset, scale)) in row
                .iter_mut()
                .zip(self.offset.iter().zip(self.scale.iter()))
            {
                *value = *value * scale + offset;
            }
        }
        Ok(())
    }
    fn check_dim(&self, actual: usize, context: &str) -> Result<()> {
        if actual != self.dim() {
            return Err(ConvertError::DimensionMismatch {
                context: context.to_string(),
                expected: self.dim(),
                actual,
            });
        }
        Ok(())
    }
}

/// Fits [`NormalizationParameters`] as the per dimension sample mean and
/// sample standard deviation of a set of feature vectors.
pub struct NormalizationStats {
    config: NormalizationConfig,
}

impl NormalizationStats {
    pub fn new(config: NormalizationConfig) -> Self {
        NormalizationStats { config }
    }
    pub fn fit(&self, vectors: &[FeatureVector]) -> Result<NormalizationParameters> {
        let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
        let mut rows = Array2::<f32>::zeros((vectors.len(), dim));
        for (index, (mut row, vector)) in rows.rows_mut().into_iter().zip(vectors).enumerate() {
            if vector.len() != dim {
                return Err(ConvertError::DimensionMismatch {
                    context: format!("statistics vector {}", index),
                    expected: dim,
                    actual: vector.len(),
                });
            }
            row.assign(&ArrayView1::from(vector.as_slice()));
        }
        self.fit_rows(rows.view())
    }
    /// Fits on the rows of a frames x dimensions matrix.
    pub fn fit_rows(&self, rows: ArrayView2<f32>) -> Result<NormalizationParameters> {
        let num_rows = rows.nrows();
        let offset = rows
            .mean_axis(Axis(0))
            .filter(|_| num_rows > 0)
            .ok_or_else(|| ConvertError::EmptyDataset {
                reason: "no vectors to fit normalization statistics".to_string(),
            })?;
        let ddof = if num_rows > 1 { 1. } else { 0. };
        let deviation = rows.std_axis(Axis(0), ddof);
        let mut scale = Vec::with_capacity(deviation.len());
        for (dimension, (mean, sigma)) in offset.iter().zip(deviation.iter()).enumerate() {
            if !mean.is_finite() || !sigma.is_finite() {
                return Err(ConvertError::NonFiniteFeatures { dimension });
            }
            if *sigma <= self.config.epsilon {
                if !self.config.zero_guard {
                    return Err(ConvertError::ZeroVariance { dimension });
                }
                scale.push(1.);
            } else {
                scale.push(*sigma);
            }
        }
        NormalizationParameters::new(offset.to_vec(), scale)
    }
}
