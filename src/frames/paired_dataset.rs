use ndarray::{Array2, ArrayView1};

use super::FramePair;
use crate::error::{ConvertError, Result};

/// Ordered frame pairs of a whole training corpus.
///
/// Every pair shares the source and target dimensionality of the first one.
#[derive(Default)]
pub struct PairedDataset {
    pairs: Vec<FramePair>,
}

impl PairedDataset {
    pub fn new() -> Self {
        PairedDataset { pairs: Vec::new() }
    }
    /// Appends frame pairs, validating them against the dataset dimensions.
    /// Nothing is appended when a pair is rejected.
    pub fn extend_checked<I: IntoIterator<Item = FramePair>>(&mut self, pairs: I) -> Result<()> {
        let mut incoming: Vec<FramePair> = pairs.into_iter().collect();
        let (source_dim, target_dim) = match self.dims() {
            Some(dims) => dims,
            None => match incoming.first() {
                Some(first) => (first.source.len(), first.target.len()),
                None => return Ok(()),
            },
        };
        for (offset, pair) in incoming.iter().enumerate() {
            let frame = self.pairs.len() + offset;
            if pair.source.len() != source_dim {
                return Err(ConvertError::DimensionMismatch {
                    context: format!("source frame {}", frame),
                    expected: source_dim,
                    actual: pair.source.len(),
                });
            }
            if pair.target.len() != target_dim {
                return Err(ConvertError::DimensionMismatch {
                    context: format!("target frame {}", frame),
                    expected: target_dim,
                    actual: pair.target.len(),
                });
            }
        }
        self.pairs.append(&mut incoming);
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
    pub fn pairs(&self) -> &[FramePair] {
        &self.pairs
    }
    /// Source and target dimensionality, taken from the first pair.
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.pairs
            .first()
            .map(|pair| (pair.source.len(), pair.target.len()))
    }
    /// All source vectors as rows, in dataset order.
    pub fn source_matrix(&self) -> Array2<f32> {
        let (source_dim, _) = self.dims().unwrap_or((0, 0));
        self.to_matrix(source_dim, |pair| &pair.source)
    }
    /// All target vectors as rows, in dataset order.
    pub fn target_matrix(&self) -> Array2<f32> {
        let (_, target_dim) = self.dims().unwrap_or((0, 0));
        self.to_matrix(target_dim, |pair| &pair.target)
    }
    fn to_matrix(&self, dim: usize, side: impl Fn(&FramePair) -> &Vec<f32>) -> Array2<f32> {
        let mut matrix = Array2::zeros((self.pairs.len(), dim));
        for (mut row, pair) in matrix.rows_mut().into_iter().zip(self.pairs.iter()) {
            // lengths were checked by extend_checked
            row.assign(&ArrayView1::from(side(pair).as_slice()));
        }
        matrix
    }
}
