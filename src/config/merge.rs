//! Merge policy shared by every loader entry point.

pub mod merge_policy;
