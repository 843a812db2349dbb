//! External format compatibility.
//!
//! Loaders for models written by other frameworks, converted to the native
//! [`Ensemble`](crate::repr::gbdt::Ensemble).

pub mod xgboost;

pub use xgboost::{load_model, read_model, ReadError};
