//! Writer for the legacy XGBoost binary gbtree model.
//!
//! Produces the layout that [`read_model`](super::read_model) consumes.
//! Sections the reader skips are written zero-filled: the learner parameter
//! block, node statistics, and the trailing `tree_info` array (every tree in
//! output group 0). A tree with a non-zero `size_leaf_vector` gets an empty
//! leaf-vector block.

use std::io::{Read, Write};

use crate::repr::gbdt::{Ensemble, Tree};

use super::error::WriteError;
use super::layout::{FormatLayout, GBTreeModelParam, TreeParam};

fn count_i32(field: &'static str, value: usize) -> Result<i32, WriteError> {
    i32::try_from(value).map_err(|_| WriteError::CountOverflow { field, value })
}

fn write_length_prefixed<W: Write>(writer: &mut W, block: &[u8]) -> Result<(), WriteError> {
    writer.write_all(&(block.len() as u64).to_le_bytes())?;
    writer.write_all(block)?;
    Ok(())
}

fn write_zeros<W: Write>(writer: &mut W, n: usize) -> Result<(), WriteError> {
    std::io::copy(&mut std::io::repeat(0).take(n as u64), writer)?;
    Ok(())
}

fn write_tree<W: Write>(writer: &mut W, tree: &Tree, layout: &FormatLayout) -> Result<(), WriteError> {
    let meta = tree.meta();
    let param = TreeParam {
        num_roots: 1,
        num_nodes: count_i32("num_nodes", tree.n_nodes())?,
        num_deleted: meta.num_deleted,
        max_depth: meta.max_depth,
        num_feature: meta.num_feature,
        size_leaf_vector: meta.size_leaf_vector,
    };
    writer.write_all(&param.to_le_bytes())?;

    for node in tree.nodes() {
        writer.write_all(&node.to_le_bytes())?;
    }
    write_zeros(writer, tree.n_nodes() * layout.node_stat_bytes)?;

    if meta.size_leaf_vector != 0 {
        write_length_prefixed(writer, &[])?;
    }
    Ok(())
}

/// Write `ensemble` in the binary layout.
pub fn write_model<W: Write>(
    writer: &mut W,
    ensemble: &Ensemble,
    layout: &FormatLayout,
) -> Result<(), WriteError> {
    let meta = ensemble.meta();
    let n_trees = count_i32("num_trees", ensemble.n_trees())?;

    write_zeros(writer, layout.learner_param_bytes)?;
    write_length_prefixed(writer, meta.objective.as_bytes())?;
    write_length_prefixed(writer, meta.booster.as_bytes())?;

    let param = GBTreeModelParam {
        num_trees: n_trees,
        num_roots: 1,
        num_feature: meta.num_feature,
        num_output_group: meta.num_output_group,
        size_leaf_vector: meta.size_leaf_vector,
    };
    writer.write_all(&param.to_le_bytes())?;

    for tree in ensemble.trees() {
        write_tree(writer, tree, layout)?;
    }

    // tree_info: output group per tree.
    write_zeros(writer, ensemble.n_trees() * 4)?;
    Ok(())
}

/// Serialize `ensemble` into a new buffer.
pub fn to_bytes(ensemble: &Ensemble, layout: &FormatLayout) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    write_model(&mut out, ensemble, layout)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::gbdt::{EnsembleMeta, Node, TreeMeta};

    #[test]
    fn section_sizes() {
        let tree = Tree::new(vec![
            Node::split(1, 0.5, true, 1, 2),
            Node::leaf(-0.1).with_parent(0),
            Node::leaf(0.1).with_parent(0),
        ]);
        let ensemble = Ensemble::new(vec![tree]).with_meta(EnsembleMeta {
            objective: "binary:logistic".into(),
            booster: "gbtree".into(),
            ..Default::default()
        });

        let layout = FormatLayout::V0_LEGACY;
        let bytes = to_bytes(&ensemble, &layout).unwrap();

        let expected = 136
            + (8 + "binary:logistic".len())
            + (8 + "gbtree".len())
            + GBTreeModelParam::BYTES
            + TreeParam::BYTES
            + 3 * (20 + 16)
            + 4;
        assert_eq!(bytes.len(), expected);
        assert_eq!(&bytes[136..144], &15u64.to_le_bytes());
    }

    #[test]
    fn leaf_vector_block_is_emitted() {
        let tree = Tree::new(vec![Node::leaf(0.0)]).with_meta(TreeMeta {
            size_leaf_vector: 2,
            ..Default::default()
        });
        let with_vector = to_bytes(&Ensemble::new(vec![tree]), &FormatLayout::V0_LEGACY).unwrap();
        let without = to_bytes(
            &Ensemble::new(vec![Tree::new(vec![Node::leaf(0.0)])]),
            &FormatLayout::V0_LEGACY,
        )
        .unwrap();

        assert_eq!(with_vector.len(), without.len() + 8);
    }
}
