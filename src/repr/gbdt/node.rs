//! Packed tree node record.
//!
//! A [`Node`] mirrors the fixed 20-byte record of the XGBoost binary format:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     parent       (i32)
//! 4       4     left child   (i32, -1 = leaf)
//! 8       4     right child  (i32)
//! 12      4     split index  (u32, bit 31 = default left, bits 0..31 = feature)
//! 16      4     payload      (f32, threshold for splits, value for leaves)
//! ```
//!
//! The payload carries no tag of its own. Which interpretation applies is
//! decided by [`Node::is_leaf`].

/// Child index meaning "no child". A node whose left child is this value is a leaf.
pub const NO_CHILD: i32 = -1;

/// Bit of the split index word holding the default direction.
const DEFAULT_LEFT_BIT: u32 = 1 << 31;

/// Largest feature index that fits in a packed split index word.
pub const MAX_FEATURE_INDEX: u32 = DEFAULT_LEFT_BIT - 1;

/// Pack a feature index and a default direction into one split index word.
///
/// Feature bits above bit 30 are discarded.
#[inline]
pub const fn pack_split_index(feature: u32, default_left: bool) -> u32 {
    let flag = if default_left { DEFAULT_LEFT_BIT } else { 0 };
    (feature & MAX_FEATURE_INDEX) | flag
}

/// Split the packed word back into `(feature, default_left)`.
#[inline]
pub const fn unpack_split_index(word: u32) -> (u32, bool) {
    (word & MAX_FEATURE_INDEX, (word >> 31) != 0)
}

/// One vertex of a decision tree, stored exactly as on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Node {
    parent: i32,
    left: i32,
    right: i32,
    split_index: u32,
    payload: f32,
}

impl Node {
    /// Width of one node record in bytes.
    pub const RECORD_BYTES: usize = 20;

    /// Create a split node.
    pub fn split(feature: u32, threshold: f32, default_left: bool, left: i32, right: i32) -> Self {
        debug_assert!(feature <= MAX_FEATURE_INDEX, "feature index does not fit in 31 bits");
        Self {
            parent: NO_CHILD,
            left,
            right,
            split_index: pack_split_index(feature, default_left),
            payload: threshold,
        }
    }

    /// Create a leaf node.
    pub fn leaf(value: f32) -> Self {
        Self {
            parent: NO_CHILD,
            left: NO_CHILD,
            right: NO_CHILD,
            split_index: 0,
            payload: value,
        }
    }

    /// Build a node from its raw fields.
    pub const fn from_raw(parent: i32, left: i32, right: i32, split_index: u32, payload: f32) -> Self {
        Self {
            parent,
            left,
            right,
            split_index,
            payload,
        }
    }

    /// Set the parent pointer (builder pattern).
    pub fn with_parent(mut self, parent: i32) -> Self {
        self.parent = parent;
        self
    }

    /// Decode a node from its little-endian record.
    pub fn from_le_bytes(buf: &[u8; Self::RECORD_BYTES]) -> Self {
        let word = |at: usize| [buf[at], buf[at + 1], buf[at + 2], buf[at + 3]];
        Self {
            parent: i32::from_le_bytes(word(0)),
            left: i32::from_le_bytes(word(4)),
            right: i32::from_le_bytes(word(8)),
            split_index: u32::from_le_bytes(word(12)),
            payload: f32::from_le_bytes(word(16)),
        }
    }

    /// Encode the node as its little-endian record.
    pub fn to_le_bytes(&self) -> [u8; Self::RECORD_BYTES] {
        let mut buf = [0u8; Self::RECORD_BYTES];
        buf[0..4].copy_from_slice(&self.parent.to_le_bytes());
        buf[4..8].copy_from_slice(&self.left.to_le_bytes());
        buf[8..12].copy_from_slice(&self.right.to_le_bytes());
        buf[12..16].copy_from_slice(&self.split_index.to_le_bytes());
        buf[16..20].copy_from_slice(&self.payload.to_le_bytes());
        buf
    }

    /// Returns true if this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == NO_CHILD
    }

    /// Parent index as stored on disk. Not used for traversal.
    #[inline]
    pub fn parent(&self) -> i32 {
        self.parent
    }

    /// Raw left child index.
    #[inline]
    pub fn left_child(&self) -> i32 {
        self.left
    }

    /// Raw right child index. Meaningless for leaves.
    #[inline]
    pub fn right_child(&self) -> i32 {
        self.right
    }

    /// Child followed when the tested feature is missing.
    #[inline]
    pub fn default_child(&self) -> i32 {
        if self.default_left() {
            self.left
        } else {
            self.right
        }
    }

    /// Feature tested by this split.
    #[inline]
    pub fn split_feature(&self) -> u32 {
        self.split_index & MAX_FEATURE_INDEX
    }

    /// Whether a missing feature routes to the left child.
    #[inline]
    pub fn default_goes_left(&self) -> bool {
        (self.split_index >> 31) != 0
    }

    /// Alias of [`Node::default_goes_left`].
    #[inline]
    pub fn default_left(&self) -> bool {
        self.default_goes_left()
    }

    /// Packed split index word as stored on disk.
    #[inline]
    pub fn raw_split_index(&self) -> u32 {
        self.split_index
    }

    /// Split threshold. Only meaningful for split nodes.
    #[inline]
    pub fn split_threshold(&self) -> f32 {
        debug_assert!(!self.is_leaf(), "split_threshold called on a leaf");
        self.payload
    }

    /// Leaf output value. Only meaningful for leaves.
    #[inline]
    pub fn leaf_value(&self) -> f32 {
        debug_assert!(self.is_leaf(), "leaf_value called on a split node");
        self.payload
    }

    /// Raw payload, regardless of node kind.
    #[inline]
    pub fn payload(&self) -> f32 {
        self.payload
    }
}
