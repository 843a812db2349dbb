//! Testing utilities for gbtree-leaves.
//!
//! Helpers for building trees by hand and comparing ensembles, usable from
//! both unit tests and integration tests.
//!
//! ```
//! use gbtree_leaves::testing::TreeBuilder;
//!
//! let mut builder = TreeBuilder::new();
//! let root = builder.add_split(3, 1.5, false);
//! let left = builder.add_leaf(-0.5);
//! let right = builder.add_leaf(0.5);
//! builder.set_children(root, left, right);
//! let tree = builder.build();
//!
//! assert_eq!(tree.n_nodes(), 3);
//! ```

use crate::repr::gbdt::{Ensemble, Node, NodeId, Tree, TreeMeta, NO_CHILD};

// =============================================================================
// Tree construction
// =============================================================================

/// Incremental tree builder.
///
/// Nodes are numbered in insertion order. Splits are created without
/// children and wired with [`set_children`](Self::set_children), which also
/// fills in the children's parent pointers.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    meta: TreeMeta,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split node. Returns the node index.
    pub fn add_split(&mut self, feature: u32, threshold: f32, default_left: bool) -> NodeId {
        self.push(Node::split(feature, threshold, default_left, NO_CHILD, NO_CHILD))
    }

    /// Add a leaf node. Returns the node index.
    pub fn add_leaf(&mut self, value: f32) -> NodeId {
        self.push(Node::leaf(value))
    }

    /// Point `split` at its children and record `split` as their parent.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn set_children(&mut self, split: NodeId, left: NodeId, right: NodeId) {
        let node = self.nodes[split as usize];
        self.nodes[split as usize] = Node::from_raw(
            node.parent(),
            left as i32,
            right as i32,
            node.raw_split_index(),
            node.payload(),
        );
        for child in [left, right] {
            let c = self.nodes[child as usize];
            self.nodes[child as usize] = c.with_parent(split as i32);
        }
    }

    /// Set the tree parameters carried with the tree.
    pub fn meta(&mut self, meta: TreeMeta) -> &mut Self {
        self.meta = meta;
        self
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build the tree.
    pub fn build(self) -> Tree {
        Tree::new(self.nodes).with_meta(self.meta)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let idx = self.nodes.len() as NodeId;
        self.nodes.push(node);
        idx
    }
}

/// A three-node tree: root split with two leaves at positions 1 and 2.
pub fn stump(feature: u32, threshold: f32, default_left: bool) -> Tree {
    let mut builder = TreeBuilder::new();
    let root = builder.add_split(feature, threshold, default_left);
    let left = builder.add_leaf(-1.0);
    let right = builder.add_leaf(1.0);
    builder.set_children(root, left, right);
    builder.build()
}

// =============================================================================
// Structural comparison
// =============================================================================

/// Assert that two ensembles have identical shape and identical decoded nodes.
///
/// Payloads are compared bit for bit, so NaN thresholds compare equal to
/// themselves.
///
/// # Panics
///
/// Panics with the first differing tree/node.
pub fn assert_ensembles_eq(actual: &Ensemble, expected: &Ensemble) {
    assert_eq!(
        actual.n_trees(),
        expected.n_trees(),
        "tree count mismatch - got {}, expected {}",
        actual.n_trees(),
        expected.n_trees()
    );

    for (t, (a, e)) in actual.trees().zip(expected.trees()).enumerate() {
        assert_eq!(a.n_nodes(), e.n_nodes(), "tree {t}: node count mismatch");
        for (n, (an, en)) in a.nodes().iter().zip(e.nodes()).enumerate() {
            let ctx = format!("tree {t} node {n}");
            assert_eq!(an.is_leaf(), en.is_leaf(), "{ctx}: is_leaf");
            assert_eq!(an.left_child(), en.left_child(), "{ctx}: left_child");
            assert_eq!(an.right_child(), en.right_child(), "{ctx}: right_child");
            assert_eq!(an.split_feature(), en.split_feature(), "{ctx}: split_feature");
            assert_eq!(an.default_goes_left(), en.default_goes_left(), "{ctx}: default_goes_left");
            assert_eq!(
                an.payload().to_bits(),
                en.payload().to_bits(),
                "{ctx}: payload {} vs {}",
                an.payload(),
                en.payload()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_wires_parents() {
        let mut builder = TreeBuilder::new();
        let root = builder.add_split(0, 0.5, true);
        let left = builder.add_leaf(1.0);
        let right = builder.add_split(1, 0.3, false);
        let rl = builder.add_leaf(2.0);
        let rr = builder.add_leaf(3.0);
        builder.set_children(root, left, right);
        builder.set_children(right, rl, rr);
        let tree = builder.build();

        assert_eq!(tree.node(0).parent(), NO_CHILD);
        assert_eq!(tree.node(1).parent(), 0);
        assert_eq!(tree.node(3).parent(), 2);
        assert_eq!(tree.node(2).left_child(), 3);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn stump_shape() {
        let tree = stump(4, 2.0, false);

        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.node(0).split_feature(), 4);
        assert!(!tree.node(0).default_goes_left());
    }

    #[test]
    #[should_panic(expected = "node count mismatch")]
    fn comparison_reports_node_count() {
        let a = Ensemble::new(vec![stump(0, 1.0, true)]);
        let b = Ensemble::new(vec![Tree::new(vec![Node::leaf(0.0)])]);
        assert_ensembles_eq(&a, &b);
    }
}
