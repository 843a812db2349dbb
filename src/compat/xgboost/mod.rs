//! XGBoost legacy binary model support.
//!
//! - [`read_model`] / [`read_from`] / [`load_model`]: binary model to [`Ensemble`]
//! - [`write_model`] / [`to_bytes`]: [`Ensemble`] to binary model
//!
//! [`Ensemble`]: crate::repr::gbdt::Ensemble

mod error;
pub mod layout;
mod reader;
mod writer;

pub use error::{ReadError, WriteError};
pub use layout::{FormatLayout, GBTreeModelParam, TreeParam};
pub use reader::{load_model, read_from, read_model, ModelReader};
pub use writer::{to_bytes, write_model};
