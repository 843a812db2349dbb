//! In-memory model representations.

pub mod gbdt;
