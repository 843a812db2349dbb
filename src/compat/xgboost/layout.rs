//! On-disk layout of the legacy XGBoost binary gbtree model.
//!
//! # Format Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Learner parameters        (opaque, layout.learner_param)   │
//! │ Objective name            (u64 length + bytes)             │
//! │ Booster name              (u64 length + bytes)             │
//! │ GBTreeModelParam          (160 bytes)                      │
//! ├────────────────────────────────────────────────────────────┤
//! │ Per tree, num_trees times:                                 │
//! │   TreeParam               (148 bytes)                      │
//! │   Node                    (20 bytes × num_nodes)           │
//! │   NodeStat                (layout.node_stat × num_nodes)   │
//! │   Leaf vector             (u64 length + bytes, only when   │
//! │                            size_leaf_vector != 0)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ tree_info and other trailing metadata (not read)           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers and floats are little-endian.

use crate::repr::gbdt::Node;

/// Width of a length prefix in bytes.
pub const LENGTH_PREFIX_BYTES: usize = 8;

/// Width of one node record in bytes.
pub const NODE_BYTES: usize = Node::RECORD_BYTES;

// ============================================================================
// Versioned layout
// ============================================================================

/// Widths of the opaque sections, which depend on the writer's version.
///
/// The reader never looks inside these sections, it only skips them, so a
/// mismatched layout shows up as garbage counts or a truncation error rather
/// than a clean diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormatLayout {
    /// Width of the leading learner parameter block.
    pub learner_param_bytes: usize,
    /// Width of one per-node statistics record (loss change, hessian sum,
    /// base weight, leaf child count).
    pub node_stat_bytes: usize,
}

impl FormatLayout {
    /// Layout written by XGBoost 0.x binary dumps.
    pub const V0_LEGACY: Self = Self {
        learner_param_bytes: 136,
        node_stat_bytes: 16,
    };
}

impl Default for FormatLayout {
    fn default() -> Self {
        Self::V0_LEGACY
    }
}

// ============================================================================
// Parameter blocks
// ============================================================================

#[inline]
fn get_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
fn put_i32(buf: &mut [u8], at: usize, value: i32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Ensemble-level parameter block.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     num_trees
/// 4       4     num_roots
/// 8       4     num_feature
/// 12      4     padding
/// 16      8     num_pbuffer (deprecated)
/// 24      4     num_output_group
/// 28      4     size_leaf_vector
/// 32      128   reserved (32 × i32)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GBTreeModelParam {
    pub num_trees: i32,
    pub num_roots: i32,
    pub num_feature: i32,
    pub num_output_group: i32,
    pub size_leaf_vector: i32,
}

impl GBTreeModelParam {
    /// Width of the block in bytes.
    pub const BYTES: usize = 160;

    /// Decode from the little-endian block.
    pub fn from_le_bytes(buf: &[u8; Self::BYTES]) -> Self {
        Self {
            num_trees: get_i32(buf, 0),
            num_roots: get_i32(buf, 4),
            num_feature: get_i32(buf, 8),
            num_output_group: get_i32(buf, 24),
            size_leaf_vector: get_i32(buf, 28),
        }
    }

    /// Encode as a little-endian block with zeroed padding.
    pub fn to_le_bytes(&self) -> [u8; Self::BYTES] {
        let mut buf = [0u8; Self::BYTES];
        put_i32(&mut buf, 0, self.num_trees);
        put_i32(&mut buf, 4, self.num_roots);
        put_i32(&mut buf, 8, self.num_feature);
        put_i32(&mut buf, 24, self.num_output_group);
        put_i32(&mut buf, 28, self.size_leaf_vector);
        buf
    }
}

/// Per-tree parameter block.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     num_roots
/// 4       4     num_nodes
/// 8       4     num_deleted
/// 12      4     max_depth
/// 16      4     num_feature
/// 20      4     size_leaf_vector
/// 24      124   reserved (31 × i32)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeParam {
    pub num_roots: i32,
    pub num_nodes: i32,
    pub num_deleted: i32,
    pub max_depth: i32,
    pub num_feature: i32,
    pub size_leaf_vector: i32,
}

impl TreeParam {
    /// Width of the block in bytes.
    pub const BYTES: usize = 148;

    /// Decode from the little-endian block.
    pub fn from_le_bytes(buf: &[u8; Self::BYTES]) -> Self {
        Self {
            num_roots: get_i32(buf, 0),
            num_nodes: get_i32(buf, 4),
            num_deleted: get_i32(buf, 8),
            max_depth: get_i32(buf, 12),
            num_feature: get_i32(buf, 16),
            size_leaf_vector: get_i32(buf, 20),
        }
    }

    /// Encode as a little-endian block with zeroed padding.
    pub fn to_le_bytes(&self) -> [u8; Self::BYTES] {
        let mut buf = [0u8; Self::BYTES];
        put_i32(&mut buf, 0, self.num_roots);
        put_i32(&mut buf, 4, self.num_nodes);
        put_i32(&mut buf, 8, self.num_deleted);
        put_i32(&mut buf, 12, self.max_depth);
        put_i32(&mut buf, 16, self.num_feature);
        put_i32(&mut buf, 20, self.size_leaf_vector);
        buf
    }
}
