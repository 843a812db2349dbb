//! Load-time configuration.
//!
//! [`LoadOptions`] is generated with the `bon` builder:
//!
//! ```
//! use gbtree_leaves::config::LoadOptions;
//! use gbtree_leaves::compat::xgboost::FormatLayout;
//!
//! // All defaults: legacy layout, eager validation on
//! let options = LoadOptions::default();
//! assert!(options.validate);
//!
//! let options = LoadOptions::builder()
//!     .layout(FormatLayout { learner_param_bytes: 136, node_stat_bytes: 16 })
//!     .validate(false)
//!     .build();
//! assert!(!options.validate);
//! ```

use bon::Builder;

use crate::compat::xgboost::FormatLayout;

/// Options for reading a binary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(derive(Clone, Debug))]
pub struct LoadOptions {
    /// Widths of the skipped sections. Default: [`FormatLayout::V0_LEGACY`].
    #[builder(default)]
    pub layout: FormatLayout,

    /// Validate each tree's child pointers as it is read. Default: `true`.
    ///
    /// Prediction guards against malformed trees either way; validating on
    /// load moves the failure to the load call.
    #[builder(default = true)]
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
