//! Test case loading utilities for integration tests.
//!
//! Leaf test cases are JSON files under `tests/test-cases/leaves`, each
//! holding a hand-written ensemble, a list of samples, and the leaf position
//! every sample must reach in every tree.
//! For tree builders and ensemble comparison, use `gbtree_leaves::testing`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use gbtree_leaves::compat::xgboost::{to_bytes, FormatLayout};
use gbtree_leaves::repr::gbdt::EnsembleMeta;
use gbtree_leaves::{Ensemble, Node, NodeId, Tree};

// =============================================================================
// Logging
// =============================================================================

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gbtree_leaves=trace")),
        )
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Test Case Loading
// =============================================================================

/// Base directory for test cases.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Directory for leaf-index test cases.
pub fn leaves_dir() -> PathBuf {
    test_cases_dir().join("leaves")
}

/// Load a JSON file and deserialize it.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> T {
    let file =
        File::open(path).unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    serde_json::from_reader(file)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

/// Load `leaves/<name>.json`.
pub fn load_case(name: &str) -> LeafCase {
    load_json(&leaves_dir().join(format!("{name}.json")))
}

// =============================================================================
// Test Case Structures
// =============================================================================

/// One node as written in a test case.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSpec {
    Split {
        feature: u32,
        threshold: f32,
        default_left: bool,
        left: i32,
        right: i32,
    },
    Leaf(f64),
}

#[derive(Debug, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

/// A hand-written ensemble with expected leaf positions.
#[derive(Debug, Deserialize)]
pub struct LeafCase {
    pub description: String,
    #[serde(default)]
    pub objective: String,
    pub trees: Vec<TreeSpec>,
    /// Sparse samples keyed by feature index.
    pub samples: Vec<BTreeMap<u32, f32>>,
    /// `expected_leaves[sample][tree]`.
    pub expected_leaves: Vec<Vec<NodeId>>,
}

impl TreeSpec {
    /// Build the tree, filling parent pointers from the child pointers.
    pub fn build(&self) -> Tree {
        let mut parents = vec![-1; self.nodes.len()];
        for (idx, spec) in self.nodes.iter().enumerate() {
            if let NodeSpec::Split { left, right, .. } = *spec {
                for child in [left, right] {
                    if let Some(slot) = usize::try_from(child).ok().and_then(|c| parents.get_mut(c)) {
                        *slot = idx as i32;
                    }
                }
            }
        }

        let nodes = self
            .nodes
            .iter()
            .zip(parents)
            .map(|(spec, parent)| {
                let node = match *spec {
                    NodeSpec::Split {
                        feature,
                        threshold,
                        default_left,
                        left,
                        right,
                    } => Node::split(feature, threshold, default_left, left, right),
                    NodeSpec::Leaf(value) => Node::leaf(value as f32),
                };
                node.with_parent(parent)
            })
            .collect();

        Tree::new(nodes)
    }
}

impl LeafCase {
    pub fn ensemble(&self) -> Ensemble {
        Ensemble::new(self.trees.iter().map(TreeSpec::build).collect()).with_meta(EnsembleMeta {
            objective: self.objective.clone(),
            booster: "gbtree".into(),
            num_output_group: 1,
            ..Default::default()
        })
    }

    /// The case's ensemble in the binary format.
    pub fn model_bytes(&self) -> Vec<u8> {
        to_bytes(&self.ensemble(), &FormatLayout::V0_LEGACY)
            .unwrap_or_else(|e| panic!("{}: failed to write model: {e}", self.description))
    }
}
