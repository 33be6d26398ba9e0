//! Regression stage of the pipeline.
//!
//! - `regressor`: feature/target partition, imputation, split, fit and scoring

pub mod regressor;

pub use regressor::*;
