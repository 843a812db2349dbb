//! Tree ensemble inference.
//!
//! Single-sample traversal lives on [`Tree`](crate::repr::gbdt::Tree) and
//! [`Ensemble`](crate::repr::gbdt::Ensemble); this module adds the batch
//! [`LeafPredictor`].

mod predictor;

pub use predictor::LeafPredictor;
