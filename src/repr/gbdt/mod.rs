//! Gradient-boosted decision tree (GBDT) representations.

/// Node identifier: a position in its tree's node array.
pub type NodeId = u32;

pub mod ensemble;
pub mod node;
pub mod tree;

pub use ensemble::{Ensemble, EnsembleMeta, EnsembleValidationError, PredictError};
pub use node::{pack_split_index, unpack_split_index, Node, MAX_FEATURE_INDEX, NO_CHILD};
pub use tree::{TraversalError, Tree, TreeMeta, TreeValidationError};
