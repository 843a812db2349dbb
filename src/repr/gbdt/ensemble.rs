//! Ordered, immutable collection of trees.

use ndarray::ArrayViewMut1;

use crate::data::FeatureLookup;

use super::tree::{TraversalError, TreeValidationError};
use super::{NodeId, Tree};

/// A tree failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tree {tree} is malformed: {source}")]
pub struct EnsembleValidationError {
    pub tree: usize,
    #[source]
    pub source: TreeValidationError,
}

/// A tree could not be walked to a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("prediction failed in tree {tree}: {source}")]
pub struct PredictError {
    pub tree: usize,
    #[source]
    pub source: TraversalError,
}

/// Model-level metadata read from the file header sections.
///
/// None of it is needed to compute leaf indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnsembleMeta {
    /// Name of the objective component.
    pub objective: String,
    /// Name of the booster component.
    pub booster: String,
    /// Number of input features declared by the model.
    pub num_feature: i32,
    /// Number of output groups (classes for multiclass models).
    pub num_output_group: i32,
    /// Size of the per-leaf vector (0 for scalar leaves).
    pub size_leaf_vector: i32,
}

/// A loaded tree ensemble.
///
/// Tree order matches file order and fixes the order of prediction outputs.
/// There is no way to add or modify trees once the ensemble is built, so a
/// shared `&Ensemble` can serve any number of concurrent predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    trees: Box<[Tree]>,
    meta: EnsembleMeta,
}

impl Ensemble {
    /// Create an ensemble from trees in evaluation order.
    pub fn new(trees: Vec<Tree>) -> Self {
        Self {
            trees: trees.into_boxed_slice(),
            meta: EnsembleMeta::default(),
        }
    }

    /// Attach model metadata (builder pattern).
    pub fn with_meta(mut self, meta: EnsembleMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Tree at the given position.
    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    /// Iterate over trees in order.
    pub fn trees(&self) -> impl ExactSizeIterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Model metadata.
    #[inline]
    pub fn meta(&self) -> &EnsembleMeta {
        &self.meta
    }

    /// Total node count across all trees.
    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(Tree::n_nodes).sum()
    }

    /// Validate every tree, reporting the first failure.
    pub fn validate(&self) -> Result<(), EnsembleValidationError> {
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|source| EnsembleValidationError { tree: tree_idx, source })?;
        }
        Ok(())
    }

    /// Leaf position reached in each tree, in tree order.
    ///
    /// This is the leaf's node index, not its value.
    pub fn predict_leaves<F>(&self, features: &F) -> Result<Vec<NodeId>, PredictError>
    where
        F: FeatureLookup + ?Sized,
    {
        self.trees
            .iter()
            .enumerate()
            .map(|(tree_idx, tree)| {
                tree.traverse_to_leaf(features)
                    .map_err(|source| PredictError { tree: tree_idx, source })
            })
            .collect()
    }

    /// Like [`predict_leaves`](Self::predict_leaves), writing into `output`.
    ///
    /// On error, entries for trees before the failing one are already written.
    ///
    /// # Panics
    ///
    /// Panics if `output.len() != self.n_trees()`.
    pub fn predict_leaves_into<F>(
        &self,
        features: &F,
        mut output: ArrayViewMut1<'_, NodeId>,
    ) -> Result<(), PredictError>
    where
        F: FeatureLookup + ?Sized,
    {
        assert_eq!(
            output.len(),
            self.n_trees(),
            "output length must equal the number of trees"
        );

        for (tree_idx, (tree, slot)) in self.trees.iter().zip(output.iter_mut()).enumerate() {
            *slot = tree
                .traverse_to_leaf(features)
                .map_err(|source| PredictError { tree: tree_idx, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ndarray::Array1;

    use super::*;
    use crate::repr::gbdt::Node;

    fn stump(feature: u32, threshold: f32) -> Tree {
        Tree::new(vec![
            Node::split(feature, threshold, false, 1, 2),
            Node::leaf(-1.0),
            Node::leaf(1.0),
        ])
    }

    #[test]
    fn predicts_one_leaf_per_tree() {
        let ensemble = Ensemble::new(vec![stump(0, 0.5), stump(1, 0.5)]);
        let features: HashMap<u32, f32> = [(0, 0.1), (1, 0.9)].into_iter().collect();

        assert_eq!(ensemble.predict_leaves(&features), Ok(vec![1, 2]));
    }

    #[test]
    fn empty_ensemble_predicts_nothing() {
        let ensemble = Ensemble::new(vec![]);
        let features: HashMap<u32, f32> = HashMap::new();

        assert_eq!(ensemble.n_trees(), 0);
        assert_eq!(ensemble.predict_leaves(&features), Ok(vec![]));
    }

    #[test]
    fn predict_into_matches_predict() {
        let ensemble = Ensemble::new(vec![stump(0, 0.5), stump(1, 0.5), stump(0, 0.05)]);
        let features: HashMap<u32, f32> = [(0, 0.1)].into_iter().collect();

        let mut output = Array1::<NodeId>::zeros(3);
        ensemble
            .predict_leaves_into(&features, output.view_mut())
            .unwrap();

        assert_eq!(output.to_vec(), ensemble.predict_leaves(&features).unwrap());
    }

    #[test]
    fn error_names_failing_tree() {
        let broken = Tree::new(vec![Node::split(0, 0.5, false, 1, 9), Node::leaf(0.0)]);
        let ensemble = Ensemble::new(vec![stump(0, 0.5), broken]);
        let features: HashMap<u32, f32> = HashMap::new();

        let err = ensemble.predict_leaves(&features).unwrap_err();
        assert_eq!(err.tree, 1);
        assert!(matches!(err.source, TraversalError::ChildOutOfBounds { child: 9, .. }));

        let err = ensemble.validate().unwrap_err();
        assert_eq!(err.tree, 1);
    }

    #[test]
    fn node_count_sums_trees() {
        let ensemble = Ensemble::new(vec![stump(0, 0.5), Tree::new(vec![Node::leaf(0.0)])]);
        assert_eq!(ensemble.n_nodes(), 4);
    }
}
