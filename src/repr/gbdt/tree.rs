//! Tree storage, structural validation, and root-to-leaf traversal.
//!
//! A [`Tree`] is the node array of one booster tree, in file order. Node
//! position is node identity: child pointers are raw positions into the same
//! array, and the root is always position 0.

use crate::data::FeatureLookup;

use super::node::Node;
use super::NodeId;

// ============================================================================
// Errors
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes, so there is no root.
    #[error("tree has no nodes")]
    EmptyTree,
    /// A split node points outside the node array.
    #[error("node {node} has {side} child {child}, but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: i32,
        n_nodes: usize,
    },
    /// A cycle is reachable from the root.
    #[error("cycle through node {node} is reachable from the root")]
    CycleDetected { node: NodeId },
}

/// Errors raised while walking a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TraversalError {
    /// Tree has no nodes.
    #[error("cannot traverse a tree with no nodes")]
    EmptyTree,
    /// The walk reached a child pointer outside the node array.
    #[error("node {node} routes to child {child}, but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        child: i32,
        n_nodes: usize,
    },
    /// No leaf after visiting as many nodes as the tree holds.
    #[error("no leaf reached after {steps} steps")]
    CycleDetected { steps: usize },
}

// ============================================================================
// Tree
// ============================================================================

/// Per-tree statistics carried by the tree parameter block.
///
/// Informational only; traversal never reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TreeMeta {
    /// Number of nodes marked deleted (still present in the node array).
    pub num_deleted: i32,
    /// Maximum depth recorded by the trainer.
    pub max_depth: i32,
    /// Number of features used to build the tree.
    pub num_feature: i32,
    /// Size of the per-leaf vector (0 for scalar leaves).
    pub size_leaf_vector: i32,
}

/// Immutable node array of a single tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Box<[Node]>,
    meta: TreeMeta,
}

impl Tree {
    /// Create a tree from its nodes in array order.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_boxed_slice(),
            meta: TreeMeta::default(),
        }
    }

    /// Attach tree parameters (builder pattern).
    pub fn with_meta(mut self, meta: TreeMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Number of nodes, including deleted ones.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in array order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Node at the given position, if any.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Tree parameters read alongside the nodes.
    #[inline]
    pub fn meta(&self) -> &TreeMeta {
        &self.meta
    }

    /// Number of leaves in the node array.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Map a raw child pointer to a node position, rejecting out-of-range values.
    #[inline]
    fn child_position(&self, child: i32) -> Option<NodeId> {
        u32::try_from(child)
            .ok()
            .filter(|&c| (c as usize) < self.nodes.len())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check that every split reachable from the root points inside the tree
    /// and that no cycle is reachable.
    ///
    /// Unreachable nodes are accepted: the format keeps deleted nodes in place.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // 0 = unvisited, 1 = on the current path, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, bool)> = vec![(0, false)];

        while let Some((id, exiting)) = stack.pop() {
            let slot = id as usize;
            if exiting {
                color[slot] = 2;
                continue;
            }
            match color[slot] {
                1 => return Err(TreeValidationError::CycleDetected { node: id }),
                2 => continue,
                _ => {}
            }

            color[slot] = 1;
            stack.push((id, true));

            let node = &self.nodes[slot];
            if node.is_leaf() {
                continue;
            }

            let mut children = [0; 2];
            for (out, (side, raw)) in children
                .iter_mut()
                .zip([("left", node.left_child()), ("right", node.right_child())])
            {
                *out = self.child_position(raw).ok_or(TreeValidationError::ChildOutOfBounds {
                    node: id,
                    side,
                    child: raw,
                    n_nodes,
                })?;
            }

            for child in children.into_iter().rev() {
                if color[child as usize] == 1 {
                    return Err(TreeValidationError::CycleDetected { node: child });
                }
                stack.push((child, false));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Walk from the root to a leaf and return the leaf's position.
    ///
    /// At each split, a missing feature follows the node's default child.
    /// A present value goes left when `value < threshold` and right otherwise,
    /// so a value equal to the threshold goes right.
    ///
    /// The walk is bounded by the node count, so a malformed tree yields an
    /// error instead of looping or reading out of bounds.
    pub fn traverse_to_leaf<F>(&self, features: &F) -> Result<NodeId, TraversalError>
    where
        F: FeatureLookup + ?Sized,
    {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TraversalError::EmptyTree);
        }

        let mut id: NodeId = 0;
        for _ in 0..n_nodes {
            let node = &self.nodes[id as usize];
            if node.is_leaf() {
                return Ok(id);
            }

            let child = match features.feature(node.split_feature()) {
                None => node.default_child(),
                Some(value) if value < node.split_threshold() => node.left_child(),
                Some(_) => node.right_child(),
            };

            id = self
                .child_position(child)
                .ok_or(TraversalError::ChildOutOfBounds { node: id, child, n_nodes })?;
        }

        Err(TraversalError::CycleDetected { steps: n_nodes })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::repr::gbdt::NO_CHILD;

    /// ```text
    ///        [0] f0 < 0.5 (default left)
    ///        /          \
    ///    [1] leaf      [2] f1 < 0.3 (default right)
    ///                   /          \
    ///               [3] leaf      [4] leaf
    /// ```
    fn two_level_tree() -> Tree {
        Tree::new(vec![
            Node::split(0, 0.5, true, 1, 2),
            Node::leaf(1.0).with_parent(0),
            Node::split(1, 0.3, false, 3, 4).with_parent(0),
            Node::leaf(2.0).with_parent(2),
            Node::leaf(3.0).with_parent(2),
        ])
    }

    fn sample(pairs: &[(u32, f32)]) -> BTreeMap<u32, f32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn tree_structure() {
        let tree = two_level_tree();

        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert!(!tree.node(0).is_leaf());
        assert!(tree.node(1).is_leaf());
        assert!(tree.get(5).is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn traverse_left() {
        let tree = two_level_tree();
        assert_eq!(tree.traverse_to_leaf(&sample(&[(0, 0.3)])), Ok(1));
    }

    #[test]
    fn traverse_right_then_left() {
        let tree = two_level_tree();
        assert_eq!(tree.traverse_to_leaf(&sample(&[(0, 0.7), (1, 0.2)])), Ok(3));
    }

    #[test]
    fn traverse_tie_goes_right() {
        let tree = two_level_tree();
        assert_eq!(tree.traverse_to_leaf(&sample(&[(0, 0.5), (1, 0.3)])), Ok(4));
    }

    #[test]
    fn traverse_missing_uses_default() {
        let tree = two_level_tree();
        assert_eq!(tree.traverse_to_leaf(&sample(&[])), Ok(1));
        assert_eq!(tree.traverse_to_leaf(&sample(&[(0, 0.9)])), Ok(4));
    }

    #[test]
    fn single_leaf_root() {
        let tree = Tree::new(vec![Node::leaf(0.0)]);
        assert_eq!(tree.traverse_to_leaf(&sample(&[(3, 1.0)])), Ok(0));
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::new(vec![]);
        assert_eq!(tree.validate(), Err(TreeValidationError::EmptyTree));
        assert_eq!(tree.traverse_to_leaf(&sample(&[])), Err(TraversalError::EmptyTree));
    }

    #[test]
    fn child_out_of_bounds() {
        let tree = Tree::new(vec![Node::split(0, 1.0, true, 1, 7), Node::leaf(0.0)]);

        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::ChildOutOfBounds {
                node: 0,
                side: "right",
                child: 7,
                n_nodes: 2
            })
        );
        // The left branch never touches the bad pointer.
        assert_eq!(tree.traverse_to_leaf(&sample(&[(0, 0.0)])), Ok(1));
        assert_eq!(
            tree.traverse_to_leaf(&sample(&[(0, 2.0)])),
            Err(TraversalError::ChildOutOfBounds { node: 0, child: 7, n_nodes: 2 })
        );
    }

    #[test]
    fn negative_right_child_on_split() {
        let tree = Tree::new(vec![Node::split(0, 1.0, false, 1, NO_CHILD), Node::leaf(0.0)]);

        assert!(matches!(
            tree.validate(),
            Err(TreeValidationError::ChildOutOfBounds { side: "right", child: -1, .. })
        ));
        assert!(matches!(
            tree.traverse_to_leaf(&sample(&[])),
            Err(TraversalError::ChildOutOfBounds { child: -1, .. })
        ));
    }

    #[test]
    fn cycle_is_detected() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, true, 1, 2),
            Node::split(0, 1.0, true, 0, 2),
            Node::leaf(0.0),
        ]);

        assert!(matches!(tree.validate(), Err(TreeValidationError::CycleDetected { .. })));
        assert_eq!(
            tree.traverse_to_leaf(&sample(&[])),
            Err(TraversalError::CycleDetected { steps: 3 })
        );
    }

    #[test]
    fn self_loop_is_detected() {
        let tree = Tree::new(vec![Node::split(0, 1.0, true, 0, 1), Node::leaf(0.0)]);
        assert_eq!(tree.validate(), Err(TreeValidationError::CycleDetected { node: 0 }));
    }

    #[test]
    fn unreachable_nodes_are_allowed() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, true, 1, 2),
            Node::leaf(0.0),
            Node::leaf(1.0),
            // Deleted node left behind by pruning.
            Node::split(4, 2.0, false, 9, 9),
        ]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn shared_subtree_is_not_a_cycle() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, true, 1, 1),
            Node::leaf(0.0),
        ]);
        assert!(tree.validate().is_ok());
    }
}
