//! Inference infrastructure for loaded tree ensembles.
//!
//! # Quick Start
//!
//! ```ignore
//! use gbtree_leaves::compat::xgboost::load_model;
//! use gbtree_leaves::config::LoadOptions;
//! use gbtree_leaves::inference::LeafPredictor;
//!
//! let ensemble = load_model("model.bin", &LoadOptions::default())?;
//! let predictor = LeafPredictor::new(&ensemble);
//! let leaves = predictor.predict_row(&sample)?;
//! ```

pub mod gbdt;

pub use gbdt::LeafPredictor;
