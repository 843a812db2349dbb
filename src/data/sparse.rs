//! Sparse sample storage.

use super::FeatureLookup;

/// Feature values of one sample, stored as sorted `(index, value)` pairs.
///
/// Indices are unique. Any index not stored is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseSample {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseSample {
    /// Create an empty sample (every feature missing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from pairs in any order.
    ///
    /// When an index repeats, the last value wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, f32)>,
    {
        let mut pairs: Vec<(u32, f32)> = pairs.into_iter().collect();
        // Stable sort keeps input order among equal indices.
        pairs.sort_by_key(|&(idx, _)| idx);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last = value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        Self { indices, values }
    }

    /// Number of stored (present) features.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no feature is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Stored feature indices, ascending.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Iterate over `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

impl FeatureLookup for SparseSample {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|pos| self.values[pos])
    }
}

impl FromIterator<(u32, f32)> for SparseSample {
    fn from_iter<I: IntoIterator<Item = (u32, f32)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
