//! Sample input abstractions.
//!
//! The core abstraction is [`FeatureLookup`]: tree traversal asks a sample for
//! one feature at a time and treats `None` as missing.
//!
//! # Storage Types
//!
//! - [`SparseSample`]: sorted `(index, value)` pairs
//! - `BTreeMap<u32, f32>` / `HashMap<u32, f32>`: keyed samples
//! - `[f32]`: dense rows, NaN marks a missing value
//!
//! [`read_svmlight`] parses the `label idx:value ...` text format into
//! [`SparseSample`]s.

mod sparse;
mod svmlight;
mod traits;

pub use sparse::SparseSample;
pub use svmlight::{parse_svmlight_line, read_svmlight, LabeledSample, ParseError};
pub use traits::FeatureLookup;
