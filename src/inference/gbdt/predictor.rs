//! Leaf-index predictor for tree ensembles.
//!
//! [`LeafPredictor`] maps samples to the leaf reached in every tree. One
//! sample yields one row of leaf positions in tree order; a batch yields a
//! `[n_samples, n_trees]` matrix.
//!
//! # Usage
//!
//! ```ignore
//! use gbtree_leaves::inference::gbdt::LeafPredictor;
//! use gbtree_leaves::Parallelism;
//!
//! let predictor = LeafPredictor::new(&ensemble);
//! let leaves = predictor.predict_row(&sample)?;
//! let matrix = predictor.predict_batch(&samples, Parallelism::Parallel)?;
//! ```

use ndarray::{Array2, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::data::FeatureLookup;
use crate::repr::gbdt::{Ensemble, NodeId, PredictError};
use crate::Parallelism;

/// Predictor returning leaf positions rather than leaf values.
///
/// Holds a shared borrow of the ensemble, so any number of predictors (or
/// threads using one predictor) can run at once.
#[derive(Debug, Clone, Copy)]
pub struct LeafPredictor<'e> {
    ensemble: &'e Ensemble,
}

impl<'e> LeafPredictor<'e> {
    /// Create a predictor for the given ensemble.
    #[inline]
    pub fn new(ensemble: &'e Ensemble) -> Self {
        Self { ensemble }
    }

    /// Get a reference to the underlying ensemble.
    #[inline]
    pub fn ensemble(&self) -> &'e Ensemble {
        self.ensemble
    }

    /// Number of outputs per sample.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.ensemble.n_trees()
    }

    /// Leaf position in each tree for one sample.
    pub fn predict_row<F>(&self, features: &F) -> Result<Vec<NodeId>, PredictError>
    where
        F: FeatureLookup + ?Sized,
    {
        self.ensemble.predict_leaves(features)
    }

    /// Leaf positions for a batch, shape `[samples.len(), n_trees]`.
    pub fn predict_batch<S>(
        &self,
        samples: &[S],
        parallelism: Parallelism,
    ) -> Result<Array2<NodeId>, PredictError>
    where
        S: FeatureLookup + Sync,
    {
        let mut output = Array2::<NodeId>::zeros((samples.len(), self.n_trees()));
        self.predict_batch_into(samples, parallelism, output.view_mut())?;
        Ok(output)
    }

    /// Leaf positions for a batch, written row by row into `output`.
    ///
    /// In parallel mode, when several samples fail, which error is returned
    /// is unspecified.
    ///
    /// # Panics
    ///
    /// Panics if `output` is not `[samples.len(), n_trees]`.
    pub fn predict_batch_into<S>(
        &self,
        samples: &[S],
        parallelism: Parallelism,
        mut output: ArrayViewMut2<'_, NodeId>,
    ) -> Result<(), PredictError>
    where
        S: FeatureLookup + Sync,
    {
        assert_eq!(
            output.dim(),
            (samples.len(), self.n_trees()),
            "output shape must be [n_samples, n_trees]"
        );

        let ensemble = self.ensemble;
        if parallelism.is_parallel() {
            output
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .zip(samples.par_iter())
                .try_for_each(|(row, sample)| ensemble.predict_leaves_into(sample, row))
        } else {
            output
                .axis_iter_mut(Axis(0))
                .zip(samples.iter())
                .try_for_each(|(row, sample)| ensemble.predict_leaves_into(sample, row))
        }
    }
}
