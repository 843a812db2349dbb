//! Reader for the legacy XGBoost binary gbtree model.
//!
//! The whole input is buffered and walked once with a cursor. Sections that
//! inference does not need are skipped by width, never decoded. See
//! [`layout`](super::layout) for the section order.
//!
//! # Example
//!
//! ```ignore
//! use gbtree_leaves::compat::xgboost::load_model;
//! use gbtree_leaves::config::LoadOptions;
//!
//! let ensemble = load_model("model.bin", &LoadOptions::default())?;
//! let leaves = ensemble.predict_leaves(&sample)?;
//! ```

use std::io::Read;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::config::LoadOptions;
use crate::repr::gbdt::{Ensemble, EnsembleMeta, Node, Tree, TreeMeta};

use super::error::ReadError;
use super::layout::{GBTreeModelParam, TreeParam, LENGTH_PREFIX_BYTES, NODE_BYTES};

// ============================================================================
// Byte cursor
// ============================================================================

/// Forward-only cursor over a byte buffer.
#[derive(Debug, Clone)]
struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn truncated(&self, section: &'static str, needed: usize) -> ReadError {
        ReadError::Truncated {
            section,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    /// Fail unless at least `n` bytes are left.
    fn ensure(&self, n: usize, section: &'static str) -> Result<(), ReadError> {
        if n > self.remaining() {
            return Err(self.truncated(section, n));
        }
        Ok(())
    }

    fn skip(&mut self, n: usize, section: &'static str) -> Result<(), ReadError> {
        self.ensure(n, section)?;
        self.pos += n;
        Ok(())
    }

    fn array<const N: usize>(&mut self, section: &'static str) -> Result<&'a [u8; N], ReadError> {
        let buf: &'a [u8] = self.buf;
        let head = buf[self.pos..]
            .first_chunk::<N>()
            .ok_or_else(|| self.truncated(section, N))?;
        self.pos += N;
        Ok(head)
    }

    fn read_u64(&mut self, section: &'static str) -> Result<u64, ReadError> {
        self.array::<LENGTH_PREFIX_BYTES>(section)
            .map(|b| u64::from_le_bytes(*b))
    }

    /// Read a length prefix and return the block it announces.
    fn length_prefixed(&mut self, section: &'static str) -> Result<&'a [u8], ReadError> {
        let len = self.read_u64(section)?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        self.ensure(len, section)?;

        let block = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(block)
    }
}

/// Reject negative counts.
fn count(field: &'static str, value: i32) -> Result<usize, ReadError> {
    usize::try_from(value).map_err(|_| ReadError::InvalidCount { field, value })
}

// ============================================================================
// Model reader
// ============================================================================

/// Sequential reader producing an [`Ensemble`] from a binary model buffer.
#[derive(Debug, Clone)]
pub struct ModelReader<'a> {
    cursor: ByteCursor<'a>,
    options: LoadOptions,
}

impl<'a> ModelReader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8], options: &LoadOptions) -> Self {
        Self {
            cursor: ByteCursor::new(bytes),
            options: *options,
        }
    }

    /// Bytes read or skipped so far.
    #[inline]
    pub fn bytes_consumed(&self) -> usize {
        self.cursor.pos
    }

    /// Bytes not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Read the header sections and every tree.
    ///
    /// Trailing sections after the last tree are left unread.
    pub fn read_ensemble(&mut self) -> Result<Ensemble, ReadError> {
        let layout = self.options.layout;

        self.cursor
            .skip(layout.learner_param_bytes, "learner parameters")?;
        let objective = self.cursor.length_prefixed("objective name")?;
        let objective = String::from_utf8_lossy(objective).into_owned();
        let booster = self.cursor.length_prefixed("booster name")?;
        let booster = String::from_utf8_lossy(booster).into_owned();

        let param = GBTreeModelParam::from_le_bytes(self.cursor.array("model parameters")?);
        let n_trees = count("num_trees", param.num_trees)?;

        // Every tree needs at least its parameter block, which bounds the
        // allocation for corrupt counts.
        let mut trees = Vec::with_capacity(n_trees.min(self.remaining() / TreeParam::BYTES));
        for tree_idx in 0..n_trees {
            trees.push(self.read_tree(tree_idx)?);
        }

        debug!(
            n_trees,
            objective = %objective,
            booster = %booster,
            bytes_consumed = self.bytes_consumed(),
            trailing_bytes = self.remaining(),
            "read binary gbtree model"
        );

        Ok(Ensemble::new(trees).with_meta(EnsembleMeta {
            objective,
            booster,
            num_feature: param.num_feature,
            num_output_group: param.num_output_group,
            size_leaf_vector: param.size_leaf_vector,
        }))
    }

    fn read_tree(&mut self, tree_idx: usize) -> Result<Tree, ReadError> {
        let param = TreeParam::from_le_bytes(self.cursor.array("tree parameters")?);
        let n_nodes = count("num_nodes", param.num_nodes)?;

        let node_bytes = n_nodes.checked_mul(NODE_BYTES).unwrap_or(usize::MAX);
        self.cursor.ensure(node_bytes, "nodes")?;
        let mut nodes = Vec::with_capacity(n_nodes);
        for _ in 0..n_nodes {
            nodes.push(Node::from_le_bytes(self.cursor.array("nodes")?));
        }

        let stat_bytes = n_nodes
            .checked_mul(self.options.layout.node_stat_bytes)
            .unwrap_or(usize::MAX);
        self.cursor.skip(stat_bytes, "node statistics")?;

        let leaf_vector_bytes = if param.size_leaf_vector != 0 {
            self.cursor.length_prefixed("leaf vector")?.len()
        } else {
            0
        };

        trace!(
            tree = tree_idx,
            n_nodes,
            max_depth = param.max_depth,
            leaf_vector_bytes,
            "read tree"
        );

        let tree = Tree::new(nodes).with_meta(TreeMeta {
            num_deleted: param.num_deleted,
            max_depth: param.max_depth,
            num_feature: param.num_feature,
            size_leaf_vector: param.size_leaf_vector,
        });

        if self.options.validate {
            tree.validate()
                .map_err(|source| ReadError::InvalidTree { tree: tree_idx, source })?;
        }

        Ok(tree)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Read an ensemble from an in-memory model.
pub fn read_model(bytes: &[u8], options: &LoadOptions) -> Result<Ensemble, ReadError> {
    let result = ModelReader::new(bytes, options).read_ensemble();
    if let Err(e) = &result {
        warn!(error = %e, total_bytes = bytes.len(), "failed to read binary gbtree model");
    }
    result
}

/// Read an ensemble from a stream. The stream is buffered in full first.
pub fn read_from<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Ensemble, ReadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    read_model(&bytes, options)
}

/// Read an ensemble from a file.
pub fn load_model<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Ensemble, ReadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).inspect_err(|e| {
        warn!(error = %e, path = %path.display(), "failed to open binary gbtree model");
    })?;
    debug!(path = %path.display(), total_bytes = bytes.len(), "loading binary gbtree model");
    read_model(&bytes, options)
}
