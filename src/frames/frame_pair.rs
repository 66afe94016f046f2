use ndarray::Array2;

/// Features of one analysis frame in one feature space.
pub type FeatureVector = Vec<f32>;

/// Source and target features taken from the same frame index.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePair {
    pub source: FeatureVector,
    pub target: FeatureVector,
}

/// Lazy iterator over the frame pairs of one source/target file pair.
///
/// Built by [`FramePairLoader`](super::FramePairLoader) once both arrays
/// are known to hold the same number of frames.
pub struct FramePairs {
    source: Array2<f32>,
    target: Array2<f32>,
    index: usize,
}

impl FramePairs {
    pub(super) fn new(source: Array2<f32>, target: Array2<f32>) -> Self {
        FramePairs {
            source,
            target,
            index: 0,
        }
    }
    pub fn source_dim(&self) -> usize {
        self.source.ncols()
    }
    pub fn target_dim(&self) -> usize {
        self.target.ncols()
    }
}

impl Iterator for FramePairs {
    type Item = FramePair;

    fn next(&mut self) -> Option<FramePair> {
        if self.index >= self.source.nrows() {
            return None;
        }
        let pair = FramePair {
            source: self.source.row(self.index).to_vec(),
            target: self.target.row(self.index).to_vec(),
        };
        self.index += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.nrows() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FramePairs {}
