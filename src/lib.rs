//! gbtree-leaves: leaf-index inference for XGBoost gbtree models.
//!
//! This crate loads tree ensembles stored in the legacy XGBoost binary format
//! and maps samples to the leaf position reached in every tree, the usual
//! input to leaf-embedding feature transforms.

pub mod compat;
pub mod config;
pub mod data;
pub mod inference;
pub mod repr;
pub mod testing;
pub mod utils;

pub use compat::{load_model, read_model, ReadError};
pub use config::LoadOptions;
pub use data::{FeatureLookup, SparseSample};
pub use inference::LeafPredictor;
pub use repr::gbdt::{Ensemble, Node, NodeId, PredictError, Tree};
pub use utils::Parallelism;
