//! Core trait for per-sample feature access.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Feature values of a single sample, addressed by feature index.
///
/// Tree traversal only ever asks "what is feature `i`?", so any keyed
/// container can act as a sample. `None` means the feature is missing for
/// this sample and the split's default direction applies.
///
/// # Missing Values
///
/// Keyed containers report missing only for absent keys; a stored NaN is a
/// present value (and, failing every `<` comparison, routes right). Dense
/// slices have no notion of an absent key, so they treat NaN and
/// out-of-range indices as missing.
pub trait FeatureLookup {
    /// Value of feature `index`, or `None` if missing.
    fn feature(&self, index: u32) -> Option<f32>;
}

impl<T: FeatureLookup + ?Sized> FeatureLookup for &T {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        (**self).feature(index)
    }
}

impl FeatureLookup for BTreeMap<u32, f32> {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.get(&index).copied()
    }
}

impl<S: BuildHasher> FeatureLookup for HashMap<u32, f32, S> {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.get(&index).copied()
    }
}

impl FeatureLookup for [f32] {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.get(index as usize).copied().filter(|v| !v.is_nan())
    }
}

impl<const N: usize> FeatureLookup for [f32; N] {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.as_slice().feature(index)
    }
}

impl FeatureLookup for Vec<f32> {
    #[inline]
    fn feature(&self, index: u32) -> Option<f32> {
        self.as_slice().feature(index)
    }
}
